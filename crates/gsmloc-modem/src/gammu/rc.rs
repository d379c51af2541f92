//! Discovery and parsing of gammu configuration files.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// Keys that name the modem device in a gammu profile.
const DEVICE_KEYS: [&str; 2] = ["device", "port"];

/// Returns the gammu section name for a profile index: `gammu` for the first
/// profile, `gammuN` for the rest.
#[must_use]
pub fn section_name(profile_index: u32) -> String {
    if profile_index == 0 {
        "gammu".to_string()
    } else {
        format!("gammu{profile_index}")
    }
}

/// The places gammu itself looks for its configuration, in lookup order.
#[must_use]
pub fn default_search_paths() -> Vec<PathBuf> {
    search_paths_from(|key| std::env::var(key).ok())
}

fn search_paths_from<F>(lookup: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Option<String>,
{
    let mut paths = Vec::new();
    let home = lookup("HOME").filter(|h| !h.is_empty());

    if let Some(xdg) = lookup("XDG_CONFIG_HOME").filter(|x| !x.is_empty()) {
        paths.push(Path::new(&xdg).join("gammu").join("config"));
    }
    if let Some(home) = &home {
        let home = Path::new(home);
        paths.push(home.join(".config").join("gammu").join("config"));
        paths.push(home.join(".gammurc"));
    }
    paths.push(PathBuf::from("/etc/gammurc"));
    paths.dedup();
    paths
}

/// A parsed gammu configuration file: sections of `key = value` pairs.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GammuRc {
    sections: HashMap<String, HashMap<String, String>>,
}

impl GammuRc {
    /// Parses INI-style text. Section and key names are case-insensitive;
    /// `#` and `;` start comment lines. Lines outside any section are ignored.
    #[must_use]
    pub fn parse(text: &str) -> Self {
        let mut sections: HashMap<String, HashMap<String, String>> = HashMap::new();
        let mut current: Option<String> = None;

        for line in text.lines().map(str::trim) {
            if line.is_empty() || line.starts_with('#') || line.starts_with(';') {
                continue;
            }
            if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
                let name = name.trim().to_ascii_lowercase();
                sections.entry(name.clone()).or_default();
                current = Some(name);
                continue;
            }
            let (Some(section), Some((key, value))) = (&current, line.split_once('=')) else {
                continue;
            };
            sections
                .entry(section.clone())
                .or_default()
                .insert(key.trim().to_ascii_lowercase(), value.trim().to_string());
        }

        Self { sections }
    }

    #[must_use]
    pub fn section(&self, name: &str) -> Option<&HashMap<String, String>> {
        self.sections.get(&name.to_ascii_lowercase())
    }

    /// Returns the device configured for `profile_index`, if the profile
    /// exists and names one.
    #[must_use]
    pub fn device(&self, profile_index: u32) -> Option<&str> {
        let section = self.section(&section_name(profile_index))?;
        DEVICE_KEYS
            .iter()
            .find_map(|k| section.get(*k))
            .map(String::as_str)
            .filter(|d| !d.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
# primary phone
[gammu]
device = /dev/ttyUSB0
connection = at

; bluetooth handset
[Gammu1]
Port = 00:11:22:33:44:55
connection = bluephonet

[gammu2]
connection = at
";

    #[test]
    fn section_names_follow_gammu_numbering() {
        assert_eq!(section_name(0), "gammu");
        assert_eq!(section_name(1), "gammu1");
        assert_eq!(section_name(12), "gammu12");
    }

    #[test]
    fn parse_reads_first_profile_device() {
        let rc = GammuRc::parse(SAMPLE);
        assert_eq!(rc.device(0), Some("/dev/ttyUSB0"));
        assert_eq!(
            rc.section("gammu").and_then(|s| s.get("connection")),
            Some(&"at".to_string())
        );
    }

    #[test]
    fn parse_is_case_insensitive_and_accepts_port() {
        let rc = GammuRc::parse(SAMPLE);
        assert_eq!(rc.device(1), Some("00:11:22:33:44:55"));
    }

    #[test]
    fn profile_without_device_has_none() {
        let rc = GammuRc::parse(SAMPLE);
        assert!(rc.section("gammu2").is_some());
        assert_eq!(rc.device(2), None);
    }

    #[test]
    fn missing_profile_has_none() {
        let rc = GammuRc::parse(SAMPLE);
        assert_eq!(rc.device(7), None);
    }

    #[test]
    fn search_paths_prefer_xdg_then_home_then_etc() {
        let paths = search_paths_from(|key| match key {
            "XDG_CONFIG_HOME" => Some("/xdg".to_string()),
            "HOME" => Some("/home/u".to_string()),
            _ => None,
        });
        assert_eq!(
            paths,
            vec![
                PathBuf::from("/xdg/gammu/config"),
                PathBuf::from("/home/u/.config/gammu/config"),
                PathBuf::from("/home/u/.gammurc"),
                PathBuf::from("/etc/gammurc"),
            ]
        );
    }

    #[test]
    fn search_paths_without_home_fall_back_to_etc() {
        let paths = search_paths_from(|_| None);
        assert_eq!(paths, vec![PathBuf::from("/etc/gammurc")]);
    }
}
