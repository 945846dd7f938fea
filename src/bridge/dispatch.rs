use super::Bridge;
use super::routing::SurfaceId;
use crate::engine::MediaEngine;
use crate::types::message::{
    ERROR_BAD_MESSAGE, ERROR_INVALID_URL, HostMessage, IntentMessage, STATUS_LOADING,
    STATUS_NO_MEDIA, parse_media_url,
};
use crate::types::session::MediaSession;

impl<E: MediaEngine> Bridge<E> {
    /// Handle one raw message from a control surface.
    pub fn handle_message(&mut self, origin: SurfaceId, raw: &str) {
        if self.closed {
            return;
        }
        let intent = match IntentMessage::parse(raw) {
            Ok(Some(intent)) => intent,
            Ok(None) => {
                tracing::trace!(surface = origin.name(), "ignoring untyped message");
                return;
            }
            Err(e) => {
                tracing::debug!(surface = origin.name(), "bad message: {e}");
                self.post(origin, &HostMessage::error(ERROR_BAD_MESSAGE));
                return;
            }
        };
        if !self.layout.accepts(origin, intent.kind()) {
            tracing::debug!(
                surface = origin.name(),
                "{} does not host {}",
                origin.name(),
                intent.kind().tag()
            );
            return;
        }
        self.dispatch(origin, intent);
    }

    pub fn dispatch(&mut self, origin: SurfaceId, intent: IntentMessage) {
        tracing::debug!(surface = origin.name(), "intent {:?}", intent);
        match intent {
            IntentMessage::Load { url } => self.load(origin, &url),
            IntentMessage::Remove => self.remove(origin),
            IntentMessage::Play => self.play_or_resume(origin),
            IntentMessage::Pause => self.pause(),
            IntentMessage::TogglePlayPause => {
                if self.session.is_some() && self.engine.status().is_playing() {
                    self.pause();
                } else {
                    self.play_or_resume(origin);
                }
            }
            IntentMessage::SeekStart => self.seek_dragging = true,
            IntentMessage::SeekEnd { pos } => self.seek_end(pos),
            IntentMessage::RequestState => self.push_state(),
        }
    }

    fn load(&mut self, origin: SurfaceId, raw_url: &str) {
        let Some(url) = parse_media_url(raw_url) else {
            self.post(origin, &HostMessage::error(ERROR_INVALID_URL));
            return;
        };

        self.stop_engine();
        self.dispose_session();

        let media = match self.engine.create_media(&url) {
            Ok(media) => media,
            Err(e) => {
                tracing::warn!(%url, "could not create media: {e}");
                self.post(origin, &HostMessage::error(format!("Could not open media: {e}")));
                self.push_state();
                return;
            }
        };
        let session = MediaSession::new(url, media);
        tracing::info!(session = %session.id, url = %session.url, "loading media");
        if let Some(media) = session.media() {
            let result = self.engine.play_media(media);
            self.swallow("play media", result);
        }
        self.session = Some(session);

        self.post(origin, &HostMessage::status(STATUS_LOADING));
        self.push_state();
    }

    fn remove(&mut self, origin: SurfaceId) {
        self.stop_engine();
        self.dispose_session();
        self.post(origin, &HostMessage::status(""));
        self.push_reset_state();
    }

    fn play_or_resume(&mut self, origin: SurfaceId) {
        if self.session.is_none() {
            self.post(origin, &HostMessage::status(STATUS_NO_MEDIA));
            return;
        }
        let result = self.engine.set_pause(false);
        self.swallow("unpause", result);
        let result = self.engine.play();
        self.swallow("play", result);
        self.push_state();
    }

    fn pause(&mut self) {
        if self.session.is_none() {
            return;
        }
        let result = self.engine.set_pause(true);
        self.swallow("pause", result);
        self.push_state();
    }

    fn seek_end(&mut self, pos: Option<f64>) {
        self.seek_dragging = false;
        let Some(pos) = pos else {
            return;
        };
        let pos = pos.clamp(0.0, 1.0);

        // Absolute time needs a known length; otherwise fall back to the
        // engine's fractional seek.
        let length = self.engine.length();
        let result = if length > 0 {
            self.engine.set_time((pos * length as f64).round() as u64)
        } else {
            self.engine.set_position(pos as f32)
        };
        self.swallow("seek", result);
        self.push_state();
    }

    pub(super) fn stop_engine(&mut self) {
        let result = self.engine.stop();
        self.swallow("stop", result);
    }

    pub(super) fn dispose_session(&mut self) {
        if let Some(mut session) = self.session.take() {
            session.dispose();
        }
    }
}
