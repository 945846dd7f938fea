use parking_lot::Mutex;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct VideoFrame {
    pub data: Vec<u8>, // Tightly packed RGBA
    pub width: u32,
    pub height: u32,
    pub timestamp_ms: u64,
}

impl VideoFrame {
    /// Copy a possibly padded RGBA plane into a tightly packed frame.
    pub fn from_strided_rgba(
        plane: &[u8],
        width: u32,
        height: u32,
        stride: usize,
        timestamp_ms: u64,
    ) -> Option<Self> {
        let row = width as usize * 4;
        if stride < row || plane.len() < stride * (height as usize).saturating_sub(1) + row {
            return None;
        }
        let mut data = Vec::with_capacity(row * height as usize);
        for y in 0..height as usize {
            let start = y * stride;
            data.extend_from_slice(&plane[start..start + row]);
        }
        Some(VideoFrame {
            data,
            width,
            height,
            timestamp_ms,
        })
    }
}

/// Holds only the newest decoded frame. Written from the streaming thread,
/// read from the UI thread.
#[derive(Clone, Default)]
pub struct FrameStore {
    latest: Arc<Mutex<Option<VideoFrame>>>,
}

impl FrameStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn publish(&self, frame: VideoFrame) {
        *self.latest.lock() = Some(frame);
    }

    /// Take the newest frame if one arrived since the last call.
    pub fn take(&self) -> Option<VideoFrame> {
        self.latest.lock().take()
    }

    pub fn clear(&self) {
        self.latest.lock().take();
    }
}
