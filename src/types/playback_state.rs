use serde::Serialize;

use crate::engine::EngineSnapshot;

/// Slider sentinel telling the surface to leave its seek control alone.
pub const POS_DRAGGING: f64 = -1.0;

/// The state pushed to control surfaces on every tick. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlaybackState {
    pub has_media: bool,
    pub is_playing: bool,
    pub time_ms: u64,
    pub length_ms: u64,
    pub pos: f64,
}

impl PlaybackState {
    /// All fields zeroed, regardless of what the engine reports.
    pub fn reset() -> Self {
        Self {
            has_media: false,
            is_playing: false,
            time_ms: 0,
            length_ms: 0,
            pos: 0.0,
        }
    }

    pub fn from_snapshot(snapshot: &EngineSnapshot, has_media: bool, seek_dragging: bool) -> Self {
        let time_ms = snapshot.time_ms.max(0) as u64;
        let length_ms = snapshot.length_ms.max(0) as u64;

        let pos = if seek_dragging {
            POS_DRAGGING
        } else if length_ms > 0 {
            (time_ms as f64 / length_ms as f64).clamp(0.0, 1.0)
        } else {
            let raw = f64::from(snapshot.position);
            if raw.is_nan() { 0.0 } else { raw.clamp(0.0, 1.0) }
        };

        Self {
            has_media,
            is_playing: snapshot.status.is_playing(),
            time_ms,
            length_ms,
            pos,
        }
    }
}

impl Default for PlaybackState {
    fn default() -> Self {
        Self::reset()
    }
}
