//! Domain Models
//!
//! Persisted entities and the pure rules that govern them. Field names and
//! enum spellings match the stored documents exactly.

pub mod user;
pub mod service_order;
pub mod material;
pub mod summary;
pub mod timestamp;

pub use user::*;
pub use service_order::*;
pub use material::*;
pub use summary::*;
