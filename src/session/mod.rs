//! Session facade tying schemas, documents, index and persistence together.
//!
//! A [`SearchSession`] is the only entry point applications need: open it
//! with a [`SessionConfig`], register schemas, put and query documents, then
//! close it.

pub mod batch;
pub mod config;
pub mod core;
#[allow(clippy::module_inception)]
pub mod session;

// Re-export commonly used types
pub use batch::BatchResult;
pub use config::SessionConfig;
pub use self::core::{SessionCore, StorageInfo};
pub use session::SearchSession;
