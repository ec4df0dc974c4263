//! Simulated playback engine
//!
//! Behaves like a media element without producing sound: it tracks a virtual
//! position, reports load progress, and advances playtime on a timer while
//! playing. Used by the binary and by tests that need a live engine.

use super::{AudioFile, EngineEvent, EngineEventSender, EngineFactory, PlaybackEngine};
use crate::config::SimulatedEngineConfig;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

const MIN_RATE: f64 = 0.1;

#[derive(Debug)]
struct SimState {
    playtime: f64,
    duration: f64,
    rate: f64,
    volume: f64,
    muted: bool,
    playing: bool,
    loaded: bool,
}

/// Engine with a virtual clock
pub struct SimulatedEngine {
    sources: Vec<AudioFile>,
    events: EngineEventSender,
    shared: Arc<Mutex<SimState>>,
    tick: Duration,
    ticker: Option<JoinHandle<()>>,
}

impl SimulatedEngine {
    pub fn new(audio: &[AudioFile], events: EngineEventSender, config: &SimulatedEngineConfig) -> Self {
        Self {
            sources: audio.to_vec(),
            events,
            shared: Arc::new(Mutex::new(SimState {
                playtime: 0.0,
                duration: config.duration_secs.max(0.0),
                rate: 1.0,
                volume: 1.0,
                muted: false,
                playing: false,
                loaded: false,
            })),
            tick: Duration::from_millis(config.tick_ms.max(1)),
            ticker: None,
        }
    }

    /// Current virtual position in seconds
    pub fn playtime(&self) -> f64 {
        self.state().playtime
    }

    pub fn volume(&self) -> f64 {
        self.state().volume
    }

    pub fn rate(&self) -> f64 {
        self.state().rate
    }

    pub fn is_muted(&self) -> bool {
        self.state().muted
    }

    pub fn is_playing(&self) -> bool {
        self.state().playing
    }

    fn state(&self) -> std::sync::MutexGuard<'_, SimState> {
        self.shared.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn has_playable_source(&self) -> bool {
        self.sources.iter().any(|f| !f.url.trim().is_empty())
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();

        // Without a runtime the position only moves on explicit seeks
        let Ok(handle) = tokio::runtime::Handle::try_current() else {
            debug!("No tokio runtime, simulated playtime will not advance");
            return;
        };

        let shared = Arc::clone(&self.shared);
        let events = self.events.clone();
        let tick = self.tick;

        self.ticker = Some(handle.spawn(async move {
            let mut interval = tokio::time::interval(tick);
            // First tick completes immediately
            interval.tick().await;

            loop {
                interval.tick().await;

                let (position, ended) = {
                    let mut state = shared.lock().unwrap_or_else(PoisonError::into_inner);
                    if !state.playing {
                        break;
                    }
                    let advanced = state.playtime + tick.as_secs_f64() * state.rate;
                    state.playtime = advanced.min(state.duration);
                    let ended = state.playtime >= state.duration;
                    if ended {
                        state.playing = false;
                    }
                    (state.playtime, ended)
                };

                trace!(position, "Simulated tick");
                if !events.emit(EngineEvent::PlaytimeUpdate(position)) {
                    break;
                }
                if ended {
                    events.emit(EngineEvent::End);
                    break;
                }
            }
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(ticker) = self.ticker.take() {
            ticker.abort();
        }
    }
}

impl PlaybackEngine for SimulatedEngine {
    fn play(&mut self) {
        if !self.state().loaded {
            self.load();
            if !self.state().loaded {
                return;
            }
        }

        {
            let mut state = self.state();
            if state.playtime >= state.duration {
                state.playtime = 0.0;
            }
            state.playing = true;
        }
        self.events.emit(EngineEvent::Play);
        self.start_ticker();
    }

    fn pause(&mut self) {
        self.stop_ticker();
        let was_playing = std::mem::replace(&mut self.state().playing, false);
        if was_playing {
            self.events.emit(EngineEvent::Pause);
        }
    }

    fn restart(&mut self) {
        self.set_playtime(0.0);
    }

    fn set_playtime(&mut self, seconds: f64) {
        let position = {
            let mut state = self.state();
            state.playtime = seconds.clamp(0.0, state.duration);
            state.playtime
        };
        self.events.emit(EngineEvent::PlaytimeUpdate(position));
    }

    fn set_volume(&mut self, level: f64) {
        self.state().volume = level.clamp(0.0, 1.0);
    }

    fn set_rate(&mut self, rate: f64) {
        self.state().rate = rate.max(MIN_RATE);
    }

    fn mute(&mut self) {
        self.state().muted = true;
    }

    fn unmute(&mut self) {
        self.state().muted = false;
    }

    fn load(&mut self) {
        self.events.emit(EngineEvent::Buffering);

        if !self.has_playable_source() {
            warn!("Simulated engine has no playable source");
            self.events.emit(EngineEvent::Error);
            return;
        }

        let duration = {
            let mut state = self.state();
            state.loaded = true;
            state.duration
        };
        self.events.emit(EngineEvent::DurationChange(duration));
        self.events.emit(EngineEvent::BufferChange(vec![(0.0, duration)]));
        self.events.emit(EngineEvent::Loaded);
    }
}

impl Drop for SimulatedEngine {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}

/// Builds [`SimulatedEngine`]s from a shared configuration
#[derive(Debug, Clone, Default)]
pub struct SimulatedEngineFactory {
    config: SimulatedEngineConfig,
}

impl SimulatedEngineFactory {
    pub fn new(config: SimulatedEngineConfig) -> Self {
        Self { config }
    }
}

impl EngineFactory for SimulatedEngineFactory {
    fn create(&self, audio: &[AudioFile], events: EngineEventSender) -> Box<dyn PlaybackEngine> {
        debug!(sources = audio.len(), "Creating simulated engine");
        Box::new(SimulatedEngine::new(audio, events, &self.config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{event_channel, EngineEvents};

    fn config() -> SimulatedEngineConfig {
        SimulatedEngineConfig {
            duration_secs: 10.0,
            tick_ms: 100,
        }
    }

    fn drain(rx: &mut EngineEvents) -> Vec<EngineEvent> {
        std::iter::from_fn(|| rx.try_next()).collect()
    }

    fn engine() -> (SimulatedEngine, EngineEvents) {
        let (tx, rx) = event_channel();
        let audio = vec![AudioFile::new("https://example.org/ep1.mp3", "audio/mpeg")];
        (SimulatedEngine::new(&audio, tx, &config()), rx)
    }

    #[test]
    fn test_load_reports_progress() {
        let (mut engine, mut rx) = engine();
        engine.load();

        assert_eq!(
            drain(&mut rx),
            vec![
                EngineEvent::Buffering,
                EngineEvent::DurationChange(10.0),
                EngineEvent::BufferChange(vec![(0.0, 10.0)]),
                EngineEvent::Loaded,
            ]
        );
    }

    #[test]
    fn test_load_without_source_reports_error() {
        let (tx, mut rx) = event_channel();
        let audio = vec![AudioFile::new("  ", "audio/mpeg")];
        let mut engine = SimulatedEngine::new(&audio, tx, &config());

        engine.play();

        assert_eq!(drain(&mut rx), vec![EngineEvent::Buffering, EngineEvent::Error]);
        assert!(!engine.is_playing());
    }

    #[test]
    fn test_play_loads_first() {
        let (mut engine, mut rx) = engine();
        engine.play();

        let events = drain(&mut rx);
        assert_eq!(events.first(), Some(&EngineEvent::Buffering));
        assert_eq!(events.last(), Some(&EngineEvent::Play));
        assert!(engine.is_playing());
    }

    #[test]
    fn test_pause_only_reports_when_playing() {
        let (mut engine, mut rx) = engine();
        engine.pause();
        assert!(drain(&mut rx).is_empty());

        engine.play();
        drain(&mut rx);
        engine.pause();
        assert_eq!(drain(&mut rx), vec![EngineEvent::Pause]);
    }

    #[test]
    fn test_set_playtime_clamps_to_duration() {
        let (mut engine, mut rx) = engine();
        engine.set_playtime(42.0);
        engine.set_playtime(-1.0);

        assert_eq!(
            drain(&mut rx),
            vec![EngineEvent::PlaytimeUpdate(10.0), EngineEvent::PlaytimeUpdate(0.0)]
        );
    }

    #[test]
    fn test_restart_seeks_to_start() {
        let (mut engine, mut rx) = engine();
        engine.set_playtime(5.0);
        engine.restart();

        assert_eq!(engine.playtime(), 0.0);
        assert_eq!(drain(&mut rx).last(), Some(&EngineEvent::PlaytimeUpdate(0.0)));
    }

    #[test]
    fn test_volume_rate_mute_are_silent() {
        let (mut engine, mut rx) = engine();
        engine.set_volume(1.7);
        engine.set_rate(1.5);
        engine.mute();

        assert_eq!(engine.volume(), 1.0);
        assert_eq!(engine.rate(), 1.5);
        assert!(engine.is_muted());
        assert!(drain(&mut rx).is_empty());

        engine.unmute();
        assert!(!engine.is_muted());
    }

    #[tokio::test(start_paused = true)]
    async fn test_ticker_advances_until_end() {
        let (tx, mut rx) = event_channel();
        let audio = vec![AudioFile::new("https://example.org/ep1.mp3", "audio/mpeg")];
        let mut engine = SimulatedEngine::new(
            &audio,
            tx,
            &SimulatedEngineConfig {
                duration_secs: 0.3,
                tick_ms: 100,
            },
        );

        engine.play();
        drain(&mut rx);

        let mut updates = Vec::new();
        loop {
            match rx.next().await {
                Some(EngineEvent::PlaytimeUpdate(s)) => updates.push(s),
                Some(EngineEvent::End) => break,
                other => panic!("Unexpected event: {:?}", other),
            }
        }

        assert_eq!(updates.len(), 3);
        assert!(updates.windows(2).all(|w| w[0] < w[1]));
        assert!((updates[2] - 0.3).abs() < 1e-9);
        assert!(!engine.is_playing());
    }
}
