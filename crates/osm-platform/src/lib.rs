//! OS Manager Platform
//!
//! Core platform providing:
//! - Credential registration, login and bearer-token sessions
//! - Service order lifecycle with free status transitions
//! - Material requisitions with an approval stamp
//! - Dashboard aggregation over both collections
//! - MongoDB and in-memory stores behind the same repository traits

pub mod domain;
pub mod repository;
pub mod service;
pub mod api;
pub mod config;
pub mod error;

pub use domain::*;
pub use config::{PlatformConfig, StoreKind};
pub use error::PlatformError;
