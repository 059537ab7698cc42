//! In-memory backend for Goalline.
//!
//! Holds raw match documents of either schema era and serves them through
//! [`goalline_core::source::MatchSource`]. Documents can be loaded from a JSON
//! file or handed over directly; the store never writes anything back.

mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::MemoryStore;
