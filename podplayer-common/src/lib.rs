//! # podplayer common library
//!
//! Shared code for the podplayer crates:
//! - Notification types and the NotificationBus
//! - Error types
//! - Configuration file resolution
//! - Time unit helpers

pub mod config;
pub mod error;
pub mod events;
pub mod time;

pub use error::{Error, Result};
pub use events::{BufferRange, Notification, NotificationBus};
