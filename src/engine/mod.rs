//! The media engine seam.
//!
//! The bridge only talks to playback through [`MediaEngine`]. The production
//! implementation wraps a GStreamer `playbin`; tests drive a scripted fake.

pub mod gst_engine;

#[cfg(test)]
pub mod fake;

use std::sync::Arc;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine initialisation failed: {0}")]
    Init(String),
    #[error("state change to {0} failed")]
    StateChange(&'static str),
    #[error("seek failed: {0}")]
    Seek(String),
    #[error("{0} is not supported by this engine")]
    Unsupported(&'static str),
    #[error("engine has been shut down")]
    ShutDown,
}

/// Coarse playback status as reported by the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineStatus {
    #[default]
    Idle,
    Opening,
    Buffering,
    Playing,
    Paused,
    Stopped,
    Ended,
    Error,
}

impl EngineStatus {
    /// Opening and buffering count as playing so the surface shows "Pause".
    pub fn is_playing(self) -> bool {
        matches!(
            self,
            EngineStatus::Playing | EngineStatus::Buffering | EngineStatus::Opening
        )
    }
}

/// Lifecycle events. These may fire on any engine thread.
#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Playing,
    Paused,
    Stopped,
    EndReached,
    TimeChanged,
    Error(String),
}

pub type EventCallback = Arc<dyn Fn(EngineEvent) + Send + Sync>;

/// Point-in-time readings. Time and length are in milliseconds; negative
/// values mean the engine does not know.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EngineSnapshot {
    pub time_ms: i64,
    pub length_ms: i64,
    pub position: f32,
    pub status: EngineStatus,
}

pub trait MediaEngine {
    /// Handle for one loaded source. Dropping it releases the media.
    type Media;

    fn set_event_callback(&mut self, callback: EventCallback);

    fn create_media(&mut self, url: &Url) -> Result<Self::Media, EngineError>;
    fn play_media(&mut self, media: &Self::Media) -> Result<(), EngineError>;

    fn play(&mut self) -> Result<(), EngineError>;
    fn set_pause(&mut self, paused: bool) -> Result<(), EngineError>;
    fn stop(&mut self) -> Result<(), EngineError>;

    fn set_time(&mut self, time_ms: u64) -> Result<(), EngineError>;
    fn set_position(&mut self, position: f32) -> Result<(), EngineError>;

    fn time(&self) -> i64;
    fn length(&self) -> i64;
    fn position(&self) -> f32;
    fn status(&self) -> EngineStatus;

    /// Release the engine itself. Further calls fail with [`EngineError::ShutDown`].
    fn shutdown(&mut self) -> Result<(), EngineError>;

    fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            time_ms: self.time(),
            length_ms: self.length(),
            position: self.position(),
            status: self.status(),
        }
    }
}
