//! State sync bridge between the media engine and the control surfaces.
//!
//! Inbound: JSON intents from a surface are decoded, checked against the
//! layout's routing table and turned into engine calls (`dispatch`).
//! Outbound: the engine is read into a [`PlaybackState`] and pushed to every
//! state-rendering surface on each timer tick and engine event (`push`).
//!
//! The bridge lives on the UI thread. Engine events reach it through
//! [`marshal`]; nothing here takes a lock.
//!
//! [`PlaybackState`]: crate::types::playback_state::PlaybackState

pub mod channel;
mod dispatch;
pub mod marshal;
mod push;
pub mod routing;
pub mod ticker;

use crate::engine::{EngineError, MediaEngine};
use crate::types::session::MediaSession;
use channel::SurfaceSink;
use routing::{Layout, SurfaceId};

pub struct Bridge<E: MediaEngine> {
    engine: E,
    session: Option<MediaSession<E::Media>>,
    seek_dragging: bool,
    layout: Layout,
    sinks: Vec<(SurfaceId, Box<dyn SurfaceSink>)>,
    closed: bool,
}

impl<E: MediaEngine> Bridge<E> {
    pub fn new(engine: E, layout: Layout) -> Self {
        Bridge {
            engine,
            session: None,
            seek_dragging: false,
            layout,
            sinks: Vec::new(),
            closed: false,
        }
    }

    pub fn attach(&mut self, id: SurfaceId, sink: Box<dyn SurfaceSink>) {
        if self.layout.role(id).is_none() {
            tracing::warn!("{} is not part of the {:?} layout", id.name(), self.layout);
        }
        self.sinks.push((id, sink));
    }

    #[cfg(test)]
    pub fn session(&self) -> Option<&MediaSession<E::Media>> {
        self.session.as_ref()
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }

    #[cfg(test)]
    pub fn is_seek_dragging(&self) -> bool {
        self.seek_dragging
    }

    pub fn is_closed(&self) -> bool {
        self.closed
    }

    #[cfg(test)]
    pub fn engine(&self) -> &E {
        &self.engine
    }

    #[cfg(test)]
    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    /// Engine failures never reach the user; the next tick resyncs the UI.
    fn swallow(&self, op: &'static str, result: Result<(), EngineError>) {
        if let Err(e) = result {
            tracing::debug!("{op} failed: {e}");
        }
    }

    /// Best-effort teardown: stop the engine, dispose the session, dispose
    /// the engine. Each step runs even if the one before it failed.
    pub fn shutdown(&mut self) {
        if self.closed {
            return;
        }
        self.closed = true;
        self.stop_engine();
        self.dispose_session();
        if let Err(e) = self.engine.shutdown() {
            tracing::debug!("engine shutdown failed: {e}");
        }
        tracing::info!("bridge shut down");
    }
}
