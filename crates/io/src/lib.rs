//! Storage layer for the editor.
//!
//! - [`mmap::BaseStore`] gives read-only random access to the original file.
//! - [`atomic::write_atomic`] writes a destination file through a sibling
//!   temporary file so a failed save never leaves a half-written target.
pub mod atomic;
pub mod errors;
pub mod mmap;

pub use errors::{StoreError, StoreResult};
