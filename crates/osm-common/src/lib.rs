//! OS Manager Common
//!
//! Ambient helpers shared by the platform library and the server binary:
//! - Logging initialisation (`tracing-subscriber`)
//! - Environment variable lookups

pub mod env;
pub mod logging;

pub use env::{parse_flag, Env, EnvError};
pub use logging::{init_logging, LogFormat};
