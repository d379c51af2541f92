//! Modem access for the gsmloc provider.
//!
//! A [`ModemSession`] drives one cell-identity reading through the
//! configure, connect, query, disconnect lifecycle on top of any
//! [`ModemBackend`]. [`GammuCli`] is the production backend; it shells out to
//! the `gammu` command line tool.

pub mod backend;
pub mod error;
pub mod gammu;
pub mod session;

pub use backend::ModemBackend;
pub use error::{BackendError, ModemError};
pub use gammu::GammuCli;
pub use session::{ModemSession, SessionSettings, SessionState};
