//! GStreamer-backed media engine.
//!
//! A single `playbin` does source selection, demuxing, decoding and audio
//! output. Video goes to an RGBA `appsink` whose samples are copied into the
//! shared [`FrameStore`] for the UI to upload. Lifecycle events are read from
//! the bus on whatever thread posts them and forwarded to the registered
//! callback.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use parking_lot::Mutex;
use url::Url;

use super::{EngineError, EngineEvent, EngineStatus, EventCallback, MediaEngine};
use crate::renderer::frame_store::{FrameStore, VideoFrame};

const PLAYBIN_NAME: &str = "moviestream-playbin";

// Stream-time granularity of TimeChanged events.
const TIME_EVENT_STEP_MS: u64 = 100;

#[derive(Debug)]
pub struct GstMedia {
    uri: String,
}

#[derive(Default)]
struct Shared {
    callback: Mutex<Option<EventCallback>>,
    eos: AtomicBool,
    errored: AtomicBool,
    buffering: AtomicBool,
    last_time_step: AtomicU64,
}

impl Shared {
    fn emit(&self, event: EngineEvent) {
        // Clone out of the lock so the callback never runs under it.
        let callback = self.callback.lock().clone();
        if let Some(callback) = callback {
            callback(event);
        }
    }

    fn handle_bus_message(&self, msg: &gst::Message) {
        match msg.view() {
            gst::MessageView::StateChanged(change) => {
                let from_playbin = msg
                    .src()
                    .map(|src| src.name().as_str() == PLAYBIN_NAME)
                    .unwrap_or(false);
                if !from_playbin {
                    return;
                }
                tracing::trace!("playbin state: {:?} -> {:?}", change.old(), change.current());
                match change.current() {
                    gst::State::Playing => self.emit(EngineEvent::Playing),
                    gst::State::Paused if change.old() == gst::State::Playing => {
                        self.emit(EngineEvent::Paused)
                    }
                    _ => {}
                }
            }
            gst::MessageView::Eos(_) => {
                self.eos.store(true, Ordering::Relaxed);
                self.emit(EngineEvent::EndReached);
            }
            gst::MessageView::Error(err) => {
                self.errored.store(true, Ordering::Relaxed);
                tracing::warn!("playback error: {} ({:?})", err.error(), err.debug());
                self.emit(EngineEvent::Error(err.error().to_string()));
            }
            gst::MessageView::Buffering(buffering) => {
                let percent = buffering.percent();
                tracing::debug!("buffering: {}%", percent);
                self.buffering.store(percent < 100, Ordering::Relaxed);
            }
            _ => {}
        }
    }

    fn on_frame(&self, timestamp_ms: u64) {
        let step = timestamp_ms / TIME_EVENT_STEP_MS;
        if self.last_time_step.swap(step, Ordering::Relaxed) != step {
            self.emit(EngineEvent::TimeChanged);
        }
    }

    fn reset_stream_flags(&self) {
        self.eos.store(false, Ordering::Relaxed);
        self.errored.store(false, Ordering::Relaxed);
        self.buffering.store(false, Ordering::Relaxed);
        self.last_time_step.store(u64::MAX, Ordering::Relaxed);
    }
}

pub struct GstEngine {
    playbin: gst::Element,
    frames: FrameStore,
    shared: Arc<Shared>,
    target: gst::State,
    has_media: bool,
    shut_down: bool,
}

impl GstEngine {
    pub fn new(frames: FrameStore) -> Result<Self, EngineError> {
        gst::init().map_err(|e| EngineError::Init(format!("GStreamer init failed: {e}")))?;

        let playbin = gst::ElementFactory::make("playbin")
            .name(PLAYBIN_NAME)
            .build()
            .map_err(|e| EngineError::Init(format!("Failed to create playbin: {e}")))?;

        let appsink = gst_app::AppSink::builder()
            .caps(
                &gst_video::VideoCapsBuilder::new()
                    .format(gst_video::VideoFormat::Rgba)
                    .build(),
            )
            .max_buffers(1)
            .drop(true)
            .build();

        let shared = Arc::new(Shared::default());

        let frames_cb = frames.clone();
        let shared_cb = Arc::clone(&shared);
        appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    match frame_from_sample(&sample) {
                        Some(frame) => {
                            let timestamp_ms = frame.timestamp_ms;
                            frames_cb.publish(frame);
                            shared_cb.on_frame(timestamp_ms);
                        }
                        None => tracing::debug!("dropping undecodable sample"),
                    }
                    Ok(gst::FlowSuccess::Ok)
                })
                .build(),
        );
        playbin.set_property("video-sink", appsink.to_value());

        let bus = playbin
            .bus()
            .ok_or_else(|| EngineError::Init("playbin has no bus".to_string()))?;
        let shared_bus = Arc::clone(&shared);
        bus.set_sync_handler(move |_bus, msg| {
            shared_bus.handle_bus_message(msg);
            gst::BusSyncReply::Drop
        });

        tracing::info!("GStreamer engine ready ({})", gst::version_string());

        Ok(GstEngine {
            playbin,
            frames,
            shared,
            target: gst::State::Null,
            has_media: false,
            shut_down: false,
        })
    }

    fn change_state(&mut self, state: gst::State, label: &'static str) -> Result<(), EngineError> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        self.playbin
            .set_state(state)
            .map_err(|_| EngineError::StateChange(label))?;
        self.target = state;
        Ok(())
    }

    fn seek_to(&mut self, time_ms: u64) -> Result<(), EngineError> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        self.playbin
            .seek_simple(
                gst::SeekFlags::FLUSH | gst::SeekFlags::KEY_UNIT,
                gst::ClockTime::from_mseconds(time_ms),
            )
            .map_err(|e| EngineError::Seek(e.to_string()))?;
        self.shared.eos.store(false, Ordering::Relaxed);
        Ok(())
    }
}

fn frame_from_sample(sample: &gst::Sample) -> Option<VideoFrame> {
    let caps = sample.caps()?;
    let info = gst_video::VideoInfo::from_caps(caps).ok()?;
    let buffer = sample.buffer()?;
    let timestamp_ms = buffer.pts().map(|pts| pts.mseconds()).unwrap_or(0);
    let map = buffer.map_readable().ok()?;
    let stride = usize::try_from(*info.stride().first()?).ok()?;
    VideoFrame::from_strided_rgba(
        map.as_slice(),
        info.width(),
        info.height(),
        stride,
        timestamp_ms,
    )
}

impl MediaEngine for GstEngine {
    type Media = GstMedia;

    fn set_event_callback(&mut self, callback: EventCallback) {
        *self.shared.callback.lock() = Some(callback);
    }

    fn create_media(&mut self, url: &Url) -> Result<GstMedia, EngineError> {
        if self.shut_down {
            return Err(EngineError::ShutDown);
        }
        Ok(GstMedia {
            uri: url.as_str().to_string(),
        })
    }

    fn play_media(&mut self, media: &GstMedia) -> Result<(), EngineError> {
        // playbin only accepts a new uri at READY or below
        self.change_state(gst::State::Null, "NULL")?;
        self.frames.clear();
        self.shared.reset_stream_flags();
        self.playbin.set_property("uri", media.uri.as_str());
        self.has_media = true;
        self.change_state(gst::State::Playing, "PLAYING")
    }

    fn play(&mut self) -> Result<(), EngineError> {
        if !self.has_media {
            return Err(EngineError::StateChange("PLAYING"));
        }
        if self.shared.eos.load(Ordering::Relaxed) {
            // Playing again after end-of-stream restarts from the top.
            self.seek_to(0)?;
        }
        self.change_state(gst::State::Playing, "PLAYING")
    }

    fn set_pause(&mut self, paused: bool) -> Result<(), EngineError> {
        if !self.has_media {
            return Err(EngineError::StateChange("PAUSED"));
        }
        if paused {
            self.change_state(gst::State::Paused, "PAUSED")
        } else {
            self.change_state(gst::State::Playing, "PLAYING")
        }
    }

    fn stop(&mut self) -> Result<(), EngineError> {
        self.change_state(gst::State::Null, "NULL")?;
        self.shared.reset_stream_flags();
        self.frames.clear();
        self.shared.emit(EngineEvent::Stopped);
        Ok(())
    }

    fn set_time(&mut self, time_ms: u64) -> Result<(), EngineError> {
        self.seek_to(time_ms)
    }

    fn set_position(&mut self, position: f32) -> Result<(), EngineError> {
        let length = self.length();
        if length <= 0 {
            return Err(EngineError::Unsupported("fractional seek without a known duration"));
        }
        let time_ms = (f64::from(position.clamp(0.0, 1.0)) * length as f64).round() as u64;
        self.seek_to(time_ms)
    }

    fn time(&self) -> i64 {
        self.playbin
            .query_position::<gst::ClockTime>()
            .map(|t| t.mseconds() as i64)
            .unwrap_or(-1)
    }

    fn length(&self) -> i64 {
        self.playbin
            .query_duration::<gst::ClockTime>()
            .map(|t| t.mseconds() as i64)
            .unwrap_or(-1)
    }

    fn position(&self) -> f32 {
        let length = self.length();
        if length <= 0 {
            return 0.0;
        }
        (self.time().max(0) as f64 / length as f64) as f32
    }

    fn status(&self) -> EngineStatus {
        if self.shut_down {
            return EngineStatus::Stopped;
        }
        if self.shared.errored.load(Ordering::Relaxed) {
            return EngineStatus::Error;
        }
        if self.shared.eos.load(Ordering::Relaxed) {
            return EngineStatus::Ended;
        }
        let buffering = self.shared.buffering.load(Ordering::Relaxed);
        match self.target {
            gst::State::Playing if buffering => EngineStatus::Buffering,
            gst::State::Playing if self.playbin.current_state() == gst::State::Playing => {
                EngineStatus::Playing
            }
            gst::State::Playing => EngineStatus::Opening,
            gst::State::Paused => EngineStatus::Paused,
            _ if self.has_media => EngineStatus::Stopped,
            _ => EngineStatus::Idle,
        }
    }

    fn shutdown(&mut self) -> Result<(), EngineError> {
        if self.shut_down {
            return Ok(());
        }
        self.shared.callback.lock().take();
        let result = self
            .playbin
            .set_state(gst::State::Null)
            .map(|_| ())
            .map_err(|_| EngineError::StateChange("NULL"));
        self.shut_down = true;
        self.has_media = false;
        self.frames.clear();
        tracing::info!("GStreamer engine shut down");
        result
    }
}

impl Drop for GstEngine {
    fn drop(&mut self) {
        let _ = self.playbin.set_state(gst::State::Null);
    }
}
