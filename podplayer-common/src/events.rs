//! Notification types and the NotificationBus
//!
//! A `Notification` describes one state change for the application store.
//! Notifications originate either from the playback adapter (translated engine
//! events) or from the adapter's own error reporting.

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// A buffered span of media, `[start, end]` in milliseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BufferRange(pub f64, pub f64);

/// State-change notifications consumed by the application store
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Notification {
    /// Playback position changed
    SetPlaytime { ms: f64 },

    /// Media duration became known or changed
    SetDuration { ms: f64 },

    /// Buffered ranges changed
    SetBuffer { ranges: Vec<BufferRange> },

    /// Engine started playing
    PlayEvent,

    /// Engine paused
    PauseEvent,

    /// Media loaded and ready
    Loaded,

    /// Engine failed to load media
    ErrorLoad,

    /// Engine is buffering
    Loading,

    /// Playback reached the end of the media
    EndEvent,

    /// Initialization was requested without any audio files
    ErrorMissingAudioFiles,
}

impl Notification {
    /// Event type name, as it appears in the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Notification::SetPlaytime { .. } => "SetPlaytime",
            Notification::SetDuration { .. } => "SetDuration",
            Notification::SetBuffer { .. } => "SetBuffer",
            Notification::PlayEvent => "PlayEvent",
            Notification::PauseEvent => "PauseEvent",
            Notification::Loaded => "Loaded",
            Notification::ErrorLoad => "ErrorLoad",
            Notification::Loading => "Loading",
            Notification::EndEvent => "EndEvent",
            Notification::ErrorMissingAudioFiles => "ErrorMissingAudioFiles",
        }
    }

    /// True for notifications that report a failure
    pub fn is_error(&self) -> bool {
        matches!(
            self,
            Notification::ErrorLoad | Notification::ErrorMissingAudioFiles
        )
    }
}

/// Fan-out of notifications to observers (loggers, printers, UIs)
///
/// Backed by `tokio::broadcast`:
/// - Publishing never blocks
/// - Slow observers lag and lose the oldest notifications
///
/// The store is never fed through the bus; it receives every notification
/// directly from the session, in order. Observers that must not miss anything
/// should not rely on the bus.
///
/// # Examples
///
/// ```
/// use podplayer_common::events::{Notification, NotificationBus};
///
/// let bus = NotificationBus::new(100);
/// let mut rx = bus.subscribe();
///
/// bus.emit_lossy(Notification::PlayEvent);
/// assert_eq!(rx.try_recv().unwrap(), Notification::PlayEvent);
/// ```
#[derive(Clone)]
pub struct NotificationBus {
    tx: broadcast::Sender<Notification>,
}

impl NotificationBus {
    /// Creates a new bus buffering up to `capacity` notifications per observer
    pub fn new(capacity: usize) -> Self {
        let (tx, _) = broadcast::channel(capacity);
        Self { tx }
    }

    /// Subscribe to all future notifications
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.tx.subscribe()
    }

    /// Emit a notification, ignoring the absence of observers
    pub fn emit_lossy(&self, notification: Notification) {
        let _ = self.tx.send(notification);
    }

    /// Current number of observers
    pub fn subscriber_count(&self) -> usize {
        self.tx.receiver_count()
    }
}
