use std::cell::Cell;
use std::rc::Rc;

use url::Url;

use super::{EngineError, EngineEvent, EngineStatus, EventCallback, MediaEngine};

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    CreateMedia(String),
    PlayMedia(String),
    Play,
    SetPause(bool),
    Stop,
    SetTime(u64),
    SetPosition(f32),
    Shutdown,
}

#[derive(Debug)]
pub struct FakeMedia {
    pub url: String,
    released: Rc<Cell<usize>>,
}

impl Drop for FakeMedia {
    fn drop(&mut self) {
        self.released.set(self.released.get() + 1);
    }
}

/// Scripted engine that records every call and lets tests set readings.
#[derive(Default)]
pub struct FakeEngine {
    pub calls: Vec<Call>,
    pub time_ms: i64,
    pub length_ms: i64,
    pub position: f32,
    pub status: EngineStatus,
    pub fail_transport: bool,
    pub callback: Option<EventCallback>,
    /// Media handles dropped so far.
    pub released: Rc<Cell<usize>>,
    /// Value of `released` at each `create_media` call.
    pub released_at_create: Vec<usize>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit(&self, event: EngineEvent) {
        if let Some(callback) = &self.callback {
            callback(event);
        }
    }

    pub fn count(&self, wanted: &Call) -> usize {
        self.calls.iter().filter(|c| *c == wanted).count()
    }

    fn transport(&mut self, call: Call) -> Result<(), EngineError> {
        self.calls.push(call);
        if self.fail_transport {
            Err(EngineError::StateChange("fake"))
        } else {
            Ok(())
        }
    }
}

impl MediaEngine for FakeEngine {
    type Media = FakeMedia;

    fn set_event_callback(&mut self, callback: EventCallback) {
        self.callback = Some(callback);
    }

    fn create_media(&mut self, url: &Url) -> Result<FakeMedia, EngineError> {
        self.calls.push(Call::CreateMedia(url.to_string()));
        self.released_at_create.push(self.released.get());
        Ok(FakeMedia {
            url: url.to_string(),
            released: Rc::clone(&self.released),
        })
    }

    fn play_media(&mut self, media: &FakeMedia) -> Result<(), EngineError> {
        self.calls.push(Call::PlayMedia(media.url.clone()));
        self.status = EngineStatus::Opening;
        Ok(())
    }

    fn play(&mut self) -> Result<(), EngineError> {
        self.transport(Call::Play)?;
        self.status = EngineStatus::Playing;
        Ok(())
    }

    fn set_pause(&mut self, paused: bool) -> Result<(), EngineError> {
        self.transport(Call::SetPause(paused))?;
        if paused {
            self.status = EngineStatus::Paused;
        }
        Ok(())
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.transport(Call::Stop)?;
        self.status = EngineStatus::Stopped;
        Ok(())
    }

    fn set_time(&mut self, time_ms: u64) -> Result<(), EngineError> {
        self.transport(Call::SetTime(time_ms))?;
        self.time_ms = time_ms as i64;
        Ok(())
    }

    fn set_position(&mut self, position: f32) -> Result<(), EngineError> {
        self.transport(Call::SetPosition(position))?;
        self.position = position;
        Ok(())
    }

    fn time(&self) -> i64 {
        self.time_ms
    }

    fn length(&self) -> i64 {
        self.length_ms
    }

    fn position(&self) -> f32 {
        self.position
    }

    fn status(&self) -> EngineStatus {
        self.status
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        self.transport(Call::Shutdown)
    }
}
