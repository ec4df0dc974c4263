//! Test helpers for podplayer-ap integration tests
//!
//! - RecordingEngine: logs every command it receives, emits nothing by itself
//! - RecordingFactory: builds RecordingEngines and keeps their event senders
//!   so tests can emit engine events on their behalf

#![allow(dead_code)]

use podplayer_ap::engine::{AudioFile, EngineEventSender, EngineFactory, PlaybackEngine};
use std::sync::{Arc, Mutex};

/// A command received by an engine
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Play,
    Pause,
    Restart,
    SetPlaytime(f64),
    SetVolume(f64),
    SetRate(f64),
    Mute,
    Unmute,
    Load,
}

/// Shared view of everything the factory and its engines did
#[derive(Debug, Default)]
struct Recording {
    /// (engine index, call)
    calls: Vec<(usize, Call)>,
    senders: Vec<EngineEventSender>,
    sources: Vec<Vec<AudioFile>>,
}

pub struct RecordingEngine {
    index: usize,
    recording: Arc<Mutex<Recording>>,
}

impl RecordingEngine {
    fn record(&self, call: Call) {
        self.recording.lock().unwrap().calls.push((self.index, call));
    }
}

impl PlaybackEngine for RecordingEngine {
    fn play(&mut self) {
        self.record(Call::Play);
    }
    fn pause(&mut self) {
        self.record(Call::Pause);
    }
    fn restart(&mut self) {
        self.record(Call::Restart);
    }
    fn set_playtime(&mut self, seconds: f64) {
        self.record(Call::SetPlaytime(seconds));
    }
    fn set_volume(&mut self, level: f64) {
        self.record(Call::SetVolume(level));
    }
    fn set_rate(&mut self, rate: f64) {
        self.record(Call::SetRate(rate));
    }
    fn mute(&mut self) {
        self.record(Call::Mute);
    }
    fn unmute(&mut self) {
        self.record(Call::Unmute);
    }
    fn load(&mut self) {
        self.record(Call::Load);
    }
}

/// Factory handle; clones share the same recording
#[derive(Clone, Default)]
pub struct RecordingFactory {
    recording: Arc<Mutex<Recording>>,
}

impl RecordingFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of engines created so far
    pub fn created(&self) -> usize {
        self.recording.lock().unwrap().senders.len()
    }

    /// All calls, in order, across engines
    pub fn calls(&self) -> Vec<(usize, Call)> {
        self.recording.lock().unwrap().calls.clone()
    }

    /// Calls received by the most recently created engine
    pub fn calls_to_latest(&self) -> Vec<Call> {
        let recording = self.recording.lock().unwrap();
        let latest = recording.senders.len().saturating_sub(1);
        recording
            .calls
            .iter()
            .filter(|(index, _)| *index == latest)
            .map(|(_, call)| call.clone())
            .collect()
    }

    /// Event sender of the engine with the given creation index
    pub fn sender(&self, index: usize) -> EngineEventSender {
        self.recording.lock().unwrap().senders[index].clone()
    }

    /// Event sender of the most recently created engine
    pub fn latest_sender(&self) -> EngineEventSender {
        let recording = self.recording.lock().unwrap();
        recording
            .senders
            .last()
            .cloned()
            .expect("no engine created yet")
    }

    /// Audio files handed to the engine with the given creation index
    pub fn sources(&self, index: usize) -> Vec<AudioFile> {
        self.recording.lock().unwrap().sources[index].clone()
    }
}

impl EngineFactory for RecordingFactory {
    fn create(&self, audio: &[AudioFile], events: EngineEventSender) -> Box<dyn PlaybackEngine> {
        let mut recording = self.recording.lock().unwrap();
        let index = recording.senders.len();
        recording.senders.push(events);
        recording.sources.push(audio.to_vec());
        Box::new(RecordingEngine {
            index,
            recording: Arc::clone(&self.recording),
        })
    }
}

pub fn episode() -> Vec<AudioFile> {
    vec![
        AudioFile::new("https://example.org/ep1.mp3", "audio/mpeg"),
        AudioFile::new("https://example.org/ep1.ogg", "audio/ogg"),
    ]
}
