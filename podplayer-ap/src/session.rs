//! Player session
//!
//! A session ties one store to one playback adapter. Every request is first
//! reduced into the store, then relayed by the adapter; every engine event is
//! translated by the adapter and applied to the store, then published on the
//! notification bus for observers.
//!
//! Sessions are independent: each owns its engine, so several can coexist and
//! dropping a session tears its engine down.

use crate::adapter::{Dispatch, PlayerAdapter};
use crate::config::PlayerConfig;
use crate::engine::{EngineFactory, SimulatedEngineFactory};
use crate::error::Error;
use crate::request::Request;
use crate::store::{AppState, Store};
use podplayer_common::events::{Notification, NotificationBus};
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info, instrument, trace, warn};
use uuid::Uuid;

pub struct PlayerSession {
    id: Uuid,
    store: Store,
    adapter: PlayerAdapter,
    bus: NotificationBus,
}

impl PlayerSession {
    pub fn new(config: &PlayerConfig, factory: impl EngineFactory + 'static) -> Self {
        let id = Uuid::new_v4();
        debug!(session = %id, tabs = ?config.tabs, "Creating player session");
        Self {
            id,
            store: Store::new(&config.tabs),
            adapter: PlayerAdapter::new(factory),
            bus: NotificationBus::new(config.bus_capacity),
        }
    }

    /// Session driving a [`SimulatedEngine`](crate::engine::SimulatedEngine)
    pub fn simulated(config: &PlayerConfig) -> Self {
        Self::new(config, SimulatedEngineFactory::new(config.engine.clone()))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> &AppState {
        self.store.state()
    }

    pub fn adapter(&self) -> &PlayerAdapter {
        &self.adapter
    }

    /// Observe every notification applied to the store from now on
    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.bus.subscribe()
    }

    /// Handle one request synchronously
    ///
    /// Events the engine emitted before the request are applied first, so a
    /// replaced engine loses nothing it already reported and `Play` pushes the
    /// latest playtime. Engine events the request causes are not applied here;
    /// they are picked up by [`pump`](Self::pump) or by the [`run`](Self::run)
    /// loop.
    pub fn submit(&mut self, request: Request) {
        debug!(session = %self.id, request = request.kind(), "Request received");
        let pending = self.pump();
        if pending > 0 {
            trace!(session = %self.id, pending, "Applied engine events ahead of request");
        }
        self.store.reduce(&request);

        let mut emitted: Vec<Notification> = Vec::new();
        match self.adapter.handle(&request, self.store.playback(), &mut emitted) {
            Ok(()) => {}
            Err(Error::MissingAudioFiles) => {
                warn!(session = %self.id, "Player not initialized: no audio files")
            }
            Err(e) => warn!(session = %self.id, "Request {} failed: {}", request.kind(), e),
        }

        for notification in emitted {
            self.publish(notification);
        }
    }

    /// Apply every engine event emitted so far; returns how many were applied
    pub fn pump(&mut self) -> usize {
        let notifications = self.adapter.drain();
        let count = notifications.len();
        for notification in notifications {
            self.publish(notification);
        }
        count
    }

    /// Process requests and engine events until the request channel closes
    ///
    /// Engine events take priority over requests, so a request always sees a
    /// store that reflects everything the engine reported before it.
    #[instrument(name = "session", skip_all, fields(id = %self.id))]
    pub async fn run(&mut self, mut requests: mpsc::Receiver<Request>) {
        info!(observers = self.bus.subscriber_count(), "Session started");

        loop {
            tokio::select! {
                biased;

                notification = self.adapter.next_notification() => {
                    self.publish(notification);
                }
                request = requests.recv() => match request {
                    Some(request) => self.submit(request),
                    None => break,
                },
            }
        }

        let remaining = self.pump();
        debug!(remaining, "Applied trailing engine events");
        info!("Session finished");
    }

    /// Drop the engine; the store keeps its last state
    pub fn shutdown(&mut self) {
        self.adapter.teardown();
    }

    fn publish(&mut self, notification: Notification) {
        if notification.is_error() {
            warn!(session = %self.id, "Playback error: {}", notification.kind());
        }
        self.store.dispatch(notification.clone());
        self.bus.emit_lossy(notification);
    }
}
