//! Storage abstraction layer.
//!
//! Sessions persist their write-ahead log and snapshots through the
//! [`Storage`] trait, backed either by a directory on disk or by memory.

pub mod file;
pub mod memory;
pub mod traits;

// Re-export commonly used types
pub use file::*;
pub use memory::*;
pub use traits::*;
