use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use eframe::egui;

use crate::bridge::Bridge;
use crate::bridge::channel::{HostEnd, surface_channel};
use crate::bridge::marshal::{EventSlot, UiMarshal};
use crate::bridge::ticker::StateTicker;
use crate::engine::gst_engine::GstEngine;
use crate::engine::{EngineError, MediaEngine};
use crate::renderer::frame_store::FrameStore;
use crate::types::config::AppConfig;
use crate::ui::control_surface::{AutoHide, ControlSurface, is_user_activity};
use crate::ui::video_player::VideoPlayer;

pub struct MovieStreamApp {
    bridge: Bridge<GstEngine>,
    host_ends: Vec<HostEnd>,
    surfaces: Vec<ControlSurface>,
    events: Arc<EventSlot>,
    ticker: StateTicker,
    video_player: VideoPlayer,
    auto_hide: AutoHide,
}

impl MovieStreamApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: &AppConfig) -> Result<Self, EngineError> {
        let frames = FrameStore::new();
        let mut engine = GstEngine::new(frames.clone())?;

        let events = EventSlot::new();
        let repaint = cc.egui_ctx.clone();
        engine.set_event_callback(
            UiMarshal::new(&events, move || repaint.request_repaint()).into_callback(),
        );

        let mut bridge = Bridge::new(engine, config.layout);
        let mut host_ends = Vec::new();
        let mut surfaces = Vec::new();
        for role in config.layout.roles() {
            let (host, surface) = surface_channel(role.id);
            bridge.attach(role.id, Box::new(host.sink()));
            host_ends.push(host);
            surfaces.push(ControlSurface::new(*role, surface));
        }

        let now = Instant::now();
        let mut ticker = StateTicker::new(config.tick_interval());
        ticker.start(now);

        Ok(Self {
            bridge,
            host_ends,
            surfaces,
            events,
            ticker,
            video_player: VideoPlayer::new(frames),
            auto_hide: AutoHide::new(now),
        })
    }

    /// Route everything that arrived since the last frame.
    fn sync(&mut self, now: Instant) {
        if let Some(pending) = self.events.take() {
            self.bridge.on_engine_events(pending);
        }
        for host in &self.host_ends {
            for raw in host.drain() {
                self.bridge.handle_message(host.id, &raw);
            }
        }
        if self.ticker.poll(now) {
            self.bridge.push_state();
        }
        for surface in &mut self.surfaces {
            surface.pump();
        }
    }

    fn handle_dropped_files(&mut self, ctx: &egui::Context) {
        let dropped: Vec<PathBuf> = ctx.input(|i| {
            i.raw
                .dropped_files
                .iter()
                .filter_map(|file| file.path.clone())
                .collect()
        });
        let Some(path) = dropped.first() else {
            return;
        };
        if let Some(surface) = self
            .surfaces
            .iter_mut()
            .find(|s| s.role().hosts_source_controls())
        {
            surface.load_path(path);
        }
    }

    fn show_bars(&mut self, ctx: &egui::Context) {
        let width = (ctx.screen_rect().width() - 32.0).max(200.0);
        for surface in &mut self.surfaces {
            let name = surface.role().id.name();
            if surface.role().hosts_source_controls() {
                egui::Area::new(egui::Id::new((name, "source")))
                    .anchor(egui::Align2::CENTER_TOP, egui::vec2(0.0, 8.0))
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.set_width(width);
                            surface.show_source_controls(ui);
                        });
                    });
            }
            if surface.role().hosts_transport_controls() {
                egui::Area::new(egui::Id::new((name, "transport")))
                    .anchor(egui::Align2::CENTER_BOTTOM, egui::vec2(0.0, -8.0))
                    .show(ctx, |ui| {
                        egui::Frame::popup(ui.style()).show(ui, |ui| {
                            ui.set_width(width);
                            surface.show_transport_controls(ui);
                        });
                    });
            }
        }
    }

    /// Stop the timer, then let the bridge stop the engine, dispose the
    /// session and dispose the engine.
    fn close(&mut self) {
        if !self.ticker.is_running() && self.bridge.is_closed() {
            return;
        }
        self.ticker.stop();
        self.bridge.shutdown();
        self.video_player.clear();
    }
}

impl eframe::App for MovieStreamApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        let now = Instant::now();
        self.sync(now);
        self.handle_dropped_files(ctx);

        if ctx.input(is_user_activity) {
            self.auto_hide.touch(now);
        }

        if self.bridge.has_session() {
            self.video_player.update_texture(ctx);
        } else {
            self.video_player.clear();
        }

        egui::CentralPanel::default()
            .frame(egui::Frame::default().fill(egui::Color32::BLACK))
            .show(ctx, |ui| self.video_player.show(ui));

        let dragging = self.surfaces.iter().any(|s| s.view().dragging);
        if self.auto_hide.is_visible(now) || dragging {
            self.show_bars(ctx);
        }

        // Keep the state timer and the auto-hide deadline ticking without input.
        let mut wait = self
            .ticker
            .time_until_due(now)
            .unwrap_or_else(|| self.ticker.period());
        if let Some(hide_in) = self.auto_hide.time_until_hidden(now) {
            wait = wait.min(hide_in);
        }
        ctx.request_repaint_after(wait);
    }
}

impl Drop for MovieStreamApp {
    fn drop(&mut self) {
        self.close();
    }
}
