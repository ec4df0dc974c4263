//! Inbound requests
//!
//! Everything the UI can ask of the player. A request is reduced into the
//! store first, then offered to the playback adapter and the tab reducer.

use crate::engine::AudioFile;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    /// Set up a new engine for the given audio files
    Initialize {
        #[serde(default)]
        audio: Vec<AudioFile>,
    },
    Play,
    Pause,
    /// Jump back to the start and play
    Restart,
    /// Seek to a position in milliseconds
    SetPlaytime { ms: f64 },
    SetVolume { level: f64 },
    SetRate { rate: f64 },
    Mute,
    Unmute,
    Load,
    /// Flip the visibility of one tab
    ToggleTab { name: String },
    /// Replace the whole tab state
    SetTabs { value: serde_json::Value },
}

impl Request {
    /// Request type name, as it appears in the serialized `type` tag
    pub fn kind(&self) -> &'static str {
        match self {
            Request::Initialize { .. } => "Initialize",
            Request::Play => "Play",
            Request::Pause => "Pause",
            Request::Restart => "Restart",
            Request::SetPlaytime { .. } => "SetPlaytime",
            Request::SetVolume { .. } => "SetVolume",
            Request::SetRate { .. } => "SetRate",
            Request::Mute => "Mute",
            Request::Unmute => "Unmute",
            Request::Load => "Load",
            Request::ToggleTab { .. } => "ToggleTab",
            Request::SetTabs { .. } => "SetTabs",
        }
    }
}

/// One line of a request script: an optional delay, then the request
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScriptStep {
    /// Milliseconds to wait before issuing the request
    #[serde(default)]
    pub wait_ms: u64,

    #[serde(flatten)]
    pub request: Request,
}

/// Parse a JSON-lines request script, skipping blank lines and `#` comments
pub fn parse_script(content: &str) -> crate::Result<Vec<ScriptStep>> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(|line| serde_json::from_str(line).map_err(Into::into))
        .collect()
}
