//! Application store
//!
//! Holds the playback state and the tab state. The playback state changes
//! only through notifications (from the adapter) and the few user requests
//! that carry a value the store tracks itself (seek, volume, rate, mute).

use crate::adapter::Dispatch;
use crate::request::Request;
use crate::tabs::{self, TabsState};
use podplayer_common::events::{BufferRange, Notification};
use serde::Serialize;
use tracing::trace;

pub const MIN_RATE: f64 = 0.5;
pub const MAX_RATE: f64 = 4.0;

/// Playback failure recorded in the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PlaybackError {
    /// The engine could not load the media
    Load,
    /// Initialization was requested without audio files
    MissingAudioFiles,
}

/// Playback state as seen by the UI; all times in milliseconds
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackState {
    pub playtime: f64,
    pub duration: f64,
    pub buffer: Vec<BufferRange>,
    pub playing: bool,
    pub paused: bool,
    pub loading: bool,
    pub loaded: bool,
    pub ended: bool,
    pub error: Option<PlaybackError>,
    pub volume: f64,
    pub rate: f64,
    pub muted: bool,
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self {
            playtime: 0.0,
            duration: 0.0,
            buffer: Vec::new(),
            playing: false,
            paused: false,
            loading: false,
            loaded: false,
            ended: false,
            error: None,
            volume: 1.0,
            rate: 1.0,
            muted: false,
        }
    }
}

impl PlaybackState {
    /// Apply one notification
    pub fn apply(&mut self, notification: &Notification) {
        match notification {
            Notification::SetPlaytime { ms } => self.playtime = ms.max(0.0),
            Notification::SetDuration { ms } => self.duration = ms.max(0.0),
            Notification::SetBuffer { ranges } => self.buffer = ranges.clone(),
            Notification::PlayEvent => {
                self.playing = true;
                self.paused = false;
                self.loading = false;
                self.ended = false;
            }
            Notification::PauseEvent => {
                self.playing = false;
                self.paused = true;
            }
            Notification::Loaded => {
                self.loaded = true;
                self.loading = false;
                self.error = None;
            }
            Notification::ErrorLoad => {
                self.error = Some(PlaybackError::Load);
                self.loading = false;
                self.playing = false;
            }
            Notification::Loading => self.loading = true,
            Notification::EndEvent => {
                self.playing = false;
                self.paused = false;
                self.ended = true;
            }
            Notification::ErrorMissingAudioFiles => {
                self.error = Some(PlaybackError::MissingAudioFiles);
            }
        }
    }

    /// Apply the value-carrying parts of a user request
    pub fn apply_request(&mut self, request: &Request) {
        match request {
            Request::Initialize { audio } if !audio.is_empty() => *self = PlaybackState {
                volume: self.volume,
                rate: self.rate,
                muted: self.muted,
                ..PlaybackState::default()
            },
            Request::SetPlaytime { ms } => self.playtime = ms.max(0.0),
            Request::SetVolume { level } => self.volume = level.clamp(0.0, 1.0),
            Request::SetRate { rate } => self.rate = rate.clamp(MIN_RATE, MAX_RATE),
            Request::Mute => self.muted = true,
            Request::Unmute => self.muted = false,
            _ => {}
        }
    }
}

/// Combined application state
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppState {
    pub playback: PlaybackState,
    pub tabs: TabsState,
}

/// Owner of the application state
#[derive(Debug)]
pub struct Store {
    state: AppState,
}

impl Store {
    pub fn new<S: AsRef<str>>(tab_names: &[S]) -> Self {
        Self {
            state: AppState {
                playback: PlaybackState::default(),
                tabs: TabsState::initial(tab_names),
            },
        }
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn playback(&self) -> &PlaybackState {
        &self.state.playback
    }

    pub fn tabs(&self) -> &TabsState {
        &self.state.tabs
    }

    /// Reduce a user request into the state
    pub fn reduce(&mut self, request: &Request) {
        trace!(request = request.kind(), "Reducing request");
        self.state.playback.apply_request(request);
        self.state.tabs = tabs::reduce(std::mem::take(&mut self.state.tabs), request);
    }
}

impl Dispatch for Store {
    fn dispatch(&mut self, notification: Notification) {
        trace!(notification = notification.kind(), "Applying notification");
        self.state.playback.apply(&notification);
    }
}
