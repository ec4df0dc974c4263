//! Playback engine contract
//!
//! The engine is an external component: it plays media and reports what it is
//! doing in seconds. Commands go in through [`PlaybackEngine`]; events come out
//! through an [`EngineEventSender`] handed over at construction time.
//!
//! Each engine instance gets its own unbounded FIFO channel, so events are
//! observed in emission order with nothing coalesced or dropped. When the
//! receiving side ([`EngineEvents`]) is dropped, further emissions are
//! discarded: an engine that has been replaced can no longer reach the store.

pub mod simulated;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

pub use simulated::{SimulatedEngine, SimulatedEngineFactory};

/// Audio file descriptor handed to the engine on initialization
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFile {
    pub url: String,
    pub mime_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub size: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

impl AudioFile {
    pub fn new(url: impl Into<String>, mime_type: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            mime_type: mime_type.into(),
            size: None,
            title: None,
        }
    }
}

/// Engine-native events, all time values in seconds
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    PlaytimeUpdate(f64),
    DurationChange(f64),
    /// Buffered `(start, end)` spans in seconds
    BufferChange(Vec<(f64, f64)>),
    Play,
    Pause,
    Loaded,
    Error,
    Buffering,
    End,
}

/// Creates the channel connecting one engine instance to its adapter
pub fn event_channel() -> (EngineEventSender, EngineEvents) {
    let (tx, rx) = mpsc::unbounded_channel();
    (EngineEventSender { tx }, EngineEvents { rx })
}

/// Engine side of the event channel
#[derive(Debug, Clone)]
pub struct EngineEventSender {
    tx: mpsc::UnboundedSender<EngineEvent>,
}

impl EngineEventSender {
    /// Emit an event
    ///
    /// Returns false once the adapter has dropped this engine; the event is
    /// discarded.
    pub fn emit(&self, event: EngineEvent) -> bool {
        self.tx.send(event).is_ok()
    }

    /// True once nobody listens to this engine anymore
    pub fn is_orphaned(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Adapter side of the event channel
///
/// An ordered, non-restartable stream of engine events.
#[derive(Debug)]
pub struct EngineEvents {
    rx: mpsc::UnboundedReceiver<EngineEvent>,
}

impl EngineEvents {
    /// Wait for the next event
    ///
    /// Returns `None` once the engine and every clone of its sender are gone.
    pub async fn next(&mut self) -> Option<EngineEvent> {
        self.rx.recv().await
    }

    /// Take the next already-emitted event without waiting
    pub fn try_next(&mut self) -> Option<EngineEvent> {
        self.rx.try_recv().ok()
    }
}

/// Command interface of a playback engine
///
/// Commands are fire-and-forget: the engine reports the outcome through its
/// event channel. Implementations must not block.
pub trait PlaybackEngine: Send {
    fn play(&mut self);
    fn pause(&mut self);
    fn restart(&mut self);
    /// Seek to `seconds` from the start of the media
    fn set_playtime(&mut self, seconds: f64);
    fn set_volume(&mut self, level: f64);
    fn set_rate(&mut self, rate: f64);
    fn mute(&mut self);
    fn unmute(&mut self);
    fn load(&mut self);
}

/// Constructs engine instances for a list of audio files
pub trait EngineFactory: Send {
    fn create(&self, audio: &[AudioFile], events: EngineEventSender) -> Box<dyn PlaybackEngine>;
}
