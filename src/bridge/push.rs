use super::Bridge;
use super::marshal::PendingPush;
use super::routing::SurfaceId;
use crate::engine::MediaEngine;
use crate::types::message::HostMessage;
use crate::types::playback_state::PlaybackState;

impl<E: MediaEngine> Bridge<E> {
    pub fn current_state(&self) -> PlaybackState {
        PlaybackState::from_snapshot(
            &self.engine.snapshot(),
            self.session.is_some(),
            self.seek_dragging,
        )
    }

    /// Send the current state to every surface that renders it.
    pub fn push_state(&self) {
        if self.closed {
            return;
        }
        self.broadcast_state(&HostMessage::State(self.current_state()));
    }

    /// Send an all-zero state, whatever the engine says.
    pub fn push_reset_state(&self) {
        if self.closed {
            return;
        }
        self.broadcast_state(&HostMessage::State(PlaybackState::reset()));
    }

    /// Apply engine events drained from the marshal slot on the UI thread.
    pub fn on_engine_events(&mut self, pending: PendingPush) {
        if let Some(error) = &pending.last_error {
            tracing::warn!("engine reported: {error}");
        }
        if pending.lifecycle || (pending.time_changed && !self.seek_dragging) {
            self.push_state();
        }
    }

    fn broadcast_state(&self, message: &HostMessage) {
        let Some(json) = self.encode(message) else {
            return;
        };
        for target in self.layout.state_targets() {
            self.send_json(target, &json);
        }
    }

    pub(super) fn post(&self, target: SurfaceId, message: &HostMessage) {
        if let Some(json) = self.encode(message) {
            self.send_json(target, &json);
        }
    }

    fn encode(&self, message: &HostMessage) -> Option<String> {
        match message.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                tracing::error!("failed to encode {:?}: {e}", message);
                None
            }
        }
    }

    fn send_json(&self, target: SurfaceId, json: &str) {
        for (id, sink) in &self.sinks {
            if *id != target {
                continue;
            }
            if let Err(e) = sink.post_json(json) {
                tracing::trace!("{e}");
            }
        }
    }
}
