//! Playback adapter
//!
//! Owns the live playback engine and keeps it in step with the store:
//! - **Engine → store:** engine events are translated into [`Notification`]s
//!   (seconds become milliseconds) and handed out in emission order
//! - **Store → engine:** requests are relayed as engine commands
//!
//! The adapter holds at most one engine. `Initialize` replaces it; the old
//! engine's event channel is dropped with it, so nothing it emits afterwards
//! reaches the store.
//!
//! Commands that arrive while no engine is live are ignored. UI requests can
//! race ahead of initialization, and that is not an error.

use crate::engine::{
    event_channel, AudioFile, EngineEvent, EngineEvents, EngineFactory, PlaybackEngine,
};
use crate::error::{Error, Result};
use crate::request::Request;
use crate::store::PlaybackState;
use podplayer_common::events::{BufferRange, Notification};
use podplayer_common::time::{millis_to_seconds, seconds_to_millis};
use tracing::{debug, info, warn};

/// Receiver of notifications produced by the adapter
pub trait Dispatch {
    fn dispatch(&mut self, notification: Notification);
}

impl Dispatch for Vec<Notification> {
    fn dispatch(&mut self, notification: Notification) {
        self.push(notification);
    }
}

/// Translate one engine event into the notification the store understands
///
/// Pure: time values are scaled from seconds to milliseconds, everything else
/// maps one-to-one.
pub fn translate(event: EngineEvent) -> Notification {
    match event {
        EngineEvent::PlaytimeUpdate(seconds) => Notification::SetPlaytime {
            ms: seconds_to_millis(seconds),
        },
        EngineEvent::DurationChange(seconds) => Notification::SetDuration {
            ms: seconds_to_millis(seconds),
        },
        EngineEvent::BufferChange(ranges) => Notification::SetBuffer {
            ranges: ranges
                .into_iter()
                .map(|(start, end)| BufferRange(seconds_to_millis(start), seconds_to_millis(end)))
                .collect(),
        },
        EngineEvent::Play => Notification::PlayEvent,
        EngineEvent::Pause => Notification::PauseEvent,
        EngineEvent::Loaded => Notification::Loaded,
        EngineEvent::Error => Notification::ErrorLoad,
        EngineEvent::Buffering => Notification::Loading,
        EngineEvent::End => Notification::EndEvent,
    }
}

/// A live engine together with the receiving end of its event channel
struct EngineHandle {
    engine: Box<dyn PlaybackEngine>,
    events: EngineEvents,
    generation: u64,
    /// Set once every sender of this engine is gone
    exhausted: bool,
}

pub struct PlayerAdapter {
    factory: Box<dyn EngineFactory>,
    current: Option<EngineHandle>,
    generation: u64,
}

impl PlayerAdapter {
    pub fn new(factory: impl EngineFactory + 'static) -> Self {
        Self {
            factory: Box::new(factory),
            current: None,
            generation: 0,
        }
    }

    /// True while an engine is live
    pub fn has_engine(&self) -> bool {
        self.current.is_some()
    }

    /// Number of engines created so far
    ///
    /// The live engine, if any, is the one with this generation. Keeps
    /// counting across teardown.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Handle one inbound request
    ///
    /// Only `Initialize` with an empty file list fails; the failure has
    /// already been dispatched as `ErrorMissingAudioFiles` when this returns.
    /// Tab requests are not the adapter's business and pass through.
    pub fn handle(
        &mut self,
        request: &Request,
        state: &PlaybackState,
        dispatch: &mut impl Dispatch,
    ) -> Result<()> {
        match request {
            Request::Initialize { audio } => self.initialize(audio, dispatch)?,
            Request::Play => {
                let seconds = millis_to_seconds(state.playtime);
                self.with_engine("play", |engine| {
                    engine.set_playtime(seconds);
                    engine.play();
                });
            }
            Request::Pause => self.with_engine("pause", |engine| engine.pause()),
            Request::Restart => self.with_engine("restart", |engine| {
                engine.restart();
                engine.play();
            }),
            Request::SetPlaytime { ms } => {
                let seconds = millis_to_seconds(*ms);
                self.with_engine("set_playtime", |engine| engine.set_playtime(seconds));
            }
            Request::SetVolume { level } => {
                self.with_engine("set_volume", |engine| engine.set_volume(*level))
            }
            Request::SetRate { rate } => self.with_engine("set_rate", |engine| engine.set_rate(*rate)),
            Request::Mute => self.with_engine("mute", |engine| engine.mute()),
            Request::Unmute => self.with_engine("unmute", |engine| engine.unmute()),
            Request::Load => self.with_engine("load", |engine| engine.load()),
            Request::ToggleTab { .. } | Request::SetTabs { .. } => {}
        }
        Ok(())
    }

    /// Replace the live engine with a new one for `audio`
    pub fn initialize(&mut self, audio: &[AudioFile], dispatch: &mut impl Dispatch) -> Result<()> {
        if audio.is_empty() {
            warn!("Initialize requested without audio files");
            dispatch.dispatch(Notification::ErrorMissingAudioFiles);
            return Err(Error::MissingAudioFiles);
        }

        // Drop the previous engine (and its channel) before building the next
        if let Some(previous) = self.current.take() {
            debug!(generation = previous.generation, "Replacing playback engine");
        }

        let (sender, events) = event_channel();
        let engine = self.factory.create(audio, sender);
        self.generation += 1;
        self.current = Some(EngineHandle {
            engine,
            events,
            generation: self.generation,
            exhausted: false,
        });

        info!(
            generation = self.generation,
            sources = audio.len(),
            "Playback engine initialized"
        );
        Ok(())
    }

    /// Drop the live engine, if any
    pub fn teardown(&mut self) {
        if let Some(handle) = self.current.take() {
            info!(generation = handle.generation, "Playback engine torn down");
        }
    }

    /// Wait for the next engine event and translate it
    ///
    /// Never resolves while no engine is live or the live engine has gone
    /// quiet for good, which makes it safe to poll from `select!`.
    pub async fn next_notification(&mut self) -> Notification {
        loop {
            match self.current.as_mut() {
                Some(handle) if !handle.exhausted => match handle.events.next().await {
                    Some(event) => return translate(event),
                    None => {
                        debug!(generation = handle.generation, "Engine event stream ended");
                        handle.exhausted = true;
                    }
                },
                _ => std::future::pending::<()>().await,
            }
        }
    }

    /// Translate every event the live engine has emitted so far, in order
    pub fn drain(&mut self) -> Vec<Notification> {
        let Some(handle) = self.current.as_mut() else {
            return Vec::new();
        };
        std::iter::from_fn(|| handle.events.try_next())
            .map(translate)
            .collect()
    }

    fn with_engine(&mut self, command: &str, f: impl FnOnce(&mut dyn PlaybackEngine)) {
        match self.current.as_mut() {
            Some(handle) => {
                debug!(command, generation = handle.generation, "Relaying command to engine");
                f(handle.engine.as_mut());
            }
            None => debug!(command, "No live engine, command ignored"),
        }
    }
}
