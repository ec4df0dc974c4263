//! # podplayer audio player library (podplayer-ap)
//!
//! Bridges a playback engine and the application store of an audio player UI.
//!
//! **Architecture:**
//! - [`engine`]: engine command trait plus a per-engine ordered event channel
//! - [`adapter`]: translates engine events into notifications, relays
//!   requests as engine commands
//! - [`store`] and [`tabs`]: state and reducers
//! - [`session`]: one store + one adapter, driven by a request channel

pub mod adapter;
pub mod config;
pub mod engine;
pub mod error;
pub mod request;
pub mod session;
pub mod store;
pub mod tabs;

pub use error::{Error, Result};
pub use request::Request;
pub use session::PlayerSession;
