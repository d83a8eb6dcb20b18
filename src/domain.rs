//! Domain module - value types of a chat replay
//!
//! Modern Rust module organization (Rust 2018+ style):
//! - Each module is its own file in the domain/ directory
//! - Public exports are defined here for convenience

pub mod chat_message;
pub mod continuation;

pub use chat_message::{ChatMessage, MessageKind};
pub use continuation::{ContinuationToken, PagePhase};
