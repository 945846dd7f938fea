use eframe::egui;
use serde_json::{Value, json};
use std::path::Path;
use std::time::{Duration, Instant};
use url::Url;

use crate::bridge::channel::SurfaceEnd;
use crate::bridge::routing::SurfaceRole;
use crate::types::message::IntentKind;

/// Resolution of the seek slider.
pub const SEEK_MAX: f64 = 1000.0;
pub const HIDE_AFTER: Duration = Duration::from_millis(2500);

const ERROR_COLOR: egui::Color32 = egui::Color32::from_rgb(0xff, 0x6b, 0x6b);

pub fn format_time(ms: u64) -> String {
    let s = ms / 1000;
    let h = s / 3600;
    let m = (s % 3600) / 60;
    let ss = s % 60;
    if h > 0 {
        format!("{h}:{m:02}:{ss:02}")
    } else {
        format!("{m}:{ss:02}")
    }
}

/// What a surface displays. Updated only from host messages and local input.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceView {
    pub url_input: String,
    pub message: String,
    pub message_is_error: bool,
    pub is_playing: bool,
    pub time_text: String,
    pub seek_value: f64,
    pub dragging: bool,
}

impl Default for SurfaceView {
    fn default() -> Self {
        SurfaceView {
            url_input: String::new(),
            message: String::new(),
            message_is_error: false,
            is_playing: false,
            time_text: "00:00 / 00:00".to_string(),
            seek_value: 0.0,
            dragging: false,
        }
    }
}

impl SurfaceView {
    pub fn set_message(&mut self, text: &str, is_error: bool) {
        self.message = text.to_string();
        self.message_is_error = is_error;
    }

    pub fn apply_host_json(&mut self, raw: &str) {
        match serde_json::from_str::<Value>(raw) {
            Ok(message) => self.apply_host_message(&message),
            Err(e) => tracing::debug!("surface got unreadable message: {e}"),
        }
    }

    pub fn apply_host_message(&mut self, message: &Value) {
        let text = message.get("message").and_then(Value::as_str).unwrap_or("");
        match message.get("type").and_then(Value::as_str) {
            Some("error") => {
                let text = if text.is_empty() { "Error" } else { text };
                self.set_message(text, true);
            }
            Some("status") => self.set_message(text, false),
            Some("state") => self.apply_state(message),
            _ => {}
        }
    }

    fn apply_state(&mut self, state: &Value) {
        self.is_playing = state
            .get("isPlaying")
            .and_then(Value::as_bool)
            .unwrap_or(false);

        let time_ms = state.get("timeMs").and_then(Value::as_u64).unwrap_or(0);
        let length_ms = state.get("lengthMs").and_then(Value::as_u64).unwrap_or(0);
        self.time_text = if length_ms > 0 {
            format!("{} / {}", format_time(time_ms), format_time(length_ms))
        } else {
            format!("{} / --:--", format_time(time_ms))
        };

        if let Some(pos) = state.get("pos").and_then(Value::as_f64) {
            if !self.dragging && pos >= 0.0 {
                self.seek_value = (pos * SEEK_MAX).round().clamp(0.0, SEEK_MAX);
            }
        }

        let has_media = state
            .get("hasMedia")
            .and_then(Value::as_bool)
            .unwrap_or(false);
        if !has_media {
            self.seek_value = 0.0;
            self.time_text = "00:00 / 00:00".to_string();
            self.is_playing = false;
        }
    }
}

/// Tracks pointer, wheel, touch and keyboard activity so the bars can hide
/// when idle.
#[derive(Debug, Clone)]
pub struct AutoHide {
    last_activity: Instant,
    hide_after: Duration,
}

impl AutoHide {
    pub fn new(now: Instant) -> Self {
        AutoHide {
            last_activity: now,
            hide_after: HIDE_AFTER,
        }
    }

    pub fn touch(&mut self, now: Instant) {
        self.last_activity = now;
    }

    pub fn is_visible(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.last_activity) < self.hide_after
    }

    pub fn time_until_hidden(&self, now: Instant) -> Option<Duration> {
        let deadline = self.last_activity + self.hide_after;
        (now < deadline).then(|| deadline - now)
    }
}

/// Whether this frame's input should wake the bars.
pub fn is_user_activity(input: &egui::InputState) -> bool {
    input.pointer.is_moving()
        || input.pointer.any_down()
        || !input.keys_down.is_empty()
        || input.raw_scroll_delta != egui::Vec2::ZERO
        || input
            .events
            .iter()
            .any(|event| matches!(event, egui::Event::Touch { .. }))
}

/// One control surface. It sees the host only through its channel: every
/// action is sent as a JSON intent and every display change comes back as a
/// host message.
pub struct ControlSurface {
    role: SurfaceRole,
    end: SurfaceEnd,
    view: SurfaceView,
}

impl ControlSurface {
    pub fn new(role: SurfaceRole, end: SurfaceEnd) -> Self {
        let surface = ControlSurface {
            role,
            end,
            view: SurfaceView::default(),
        };
        if role.accepts.contains(&IntentKind::RequestState) {
            surface.post(json!({"type": "requestState"}));
        }
        surface
    }

    pub fn role(&self) -> &SurfaceRole {
        &self.role
    }

    pub fn view(&self) -> &SurfaceView {
        &self.view
    }

    fn post(&self, intent: Value) {
        if let Err(e) = self.end.send(intent.to_string()) {
            tracing::trace!("{e}");
        }
    }

    /// Apply everything the host has posted since the last frame.
    pub fn pump(&mut self) {
        while let Some(raw) = self.end.try_recv() {
            self.view.apply_host_json(&raw);
        }
    }

    pub fn request_load(&mut self) {
        self.view.set_message("", false);
        let url = self.view.url_input.trim().to_string();
        self.post(json!({"type": "load", "url": url}));
    }

    pub fn request_remove(&mut self) {
        self.view.set_message("", false);
        self.post(json!({"type": "remove"}));
    }

    pub fn load_path(&mut self, path: &Path) {
        match Url::from_file_path(path) {
            Ok(url) => {
                self.view.url_input = url.to_string();
                self.request_load();
            }
            Err(()) => self
                .view
                .set_message(&format!("Cannot open {}", path.display()), true),
        }
    }

    pub fn toggle_play(&mut self) {
        let kind = if self.view.is_playing { "pause" } else { "play" };
        self.post(json!({ "type": kind }));
    }

    pub fn begin_seek(&mut self) {
        self.view.dragging = true;
        self.post(json!({"type": "seekStart"}));
    }

    pub fn end_seek(&mut self) {
        self.view.dragging = false;
        let pos = self.view.seek_value / SEEK_MAX;
        self.post(json!({"type": "seekEnd", "pos": pos}));
    }

    fn show_message(&self, ui: &mut egui::Ui) {
        if self.view.message.is_empty() {
            return;
        }
        if self.view.message_is_error {
            ui.colored_label(ERROR_COLOR, &self.view.message);
        } else {
            ui.label(&self.view.message);
        }
    }

    /// URL field with Load / Browse / Remove.
    pub fn show_source_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let field_width = (ui.available_width() - 220.0).max(120.0);
            let response = ui.add(
                egui::TextEdit::singleline(&mut self.view.url_input)
                    .hint_text("Paste a media URL")
                    .desired_width(field_width),
            );
            let submitted = response.lost_focus() && ui.input(|i| i.key_pressed(egui::Key::Enter));
            if ui.button("Load").clicked() || submitted {
                self.request_load();
            }
            if ui.button("Browse…").clicked() {
                if let Some(path) = rfd::FileDialog::new()
                    .add_filter("Media", &["mp4", "mkv", "webm", "mov", "avi", "mp3", "ogg", "flac"])
                    .pick_file()
                {
                    self.load_path(&path);
                }
            }
            if ui.button("Remove").clicked() {
                self.request_remove();
            }
        });
        self.show_message(ui);
    }

    /// Play/pause button, seek slider and time label.
    pub fn show_transport_controls(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            let label = if self.view.is_playing { "Pause" } else { "Play" };
            if ui.button(label).clicked() {
                self.toggle_play();
            }

            ui.spacing_mut().slider_width = (ui.available_width() - 140.0).max(80.0);
            let response = ui.add(
                egui::Slider::new(&mut self.view.seek_value, 0.0..=SEEK_MAX).show_value(false),
            );
            if response.drag_started() {
                self.begin_seek();
            }
            if response.drag_stopped() {
                self.end_seek();
            } else if response.clicked() {
                self.begin_seek();
                self.end_seek();
            }

            ui.label(&self.view.time_text);
        });
        if !self.role.hosts_source_controls() {
            self.show_message(ui);
        }
    }
}
