use std::net::SocketAddr;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_keys: Vec<String>,
    pub lookup_url: String,
    pub opencellid_api_key: Option<String>,
    pub lookup_timeout_secs: u64,
    pub user_agent: String,
    pub latitude_path: String,
    pub longitude_path: String,
    pub gammu_bin: String,
    pub gammurc_path: Option<PathBuf>,
    pub modem_profile: u32,
    pub modem_connect_retries: u32,
    pub modem_connect_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("api_keys", &format!("[{} redacted]", self.api_keys.len()))
            .field("lookup_url", &self.lookup_url)
            .field(
                "opencellid_api_key",
                &self.opencellid_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("lookup_timeout_secs", &self.lookup_timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("latitude_path", &self.latitude_path)
            .field("longitude_path", &self.longitude_path)
            .field("gammu_bin", &self.gammu_bin)
            .field("gammurc_path", &self.gammurc_path)
            .field("modem_profile", &self.modem_profile)
            .field("modem_connect_retries", &self.modem_connect_retries)
            .field(
                "modem_connect_timeout_secs",
                &self.modem_connect_timeout_secs,
            )
            .finish()
    }
}
