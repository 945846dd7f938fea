//! Re-posting engine events onto the UI thread.
//!
//! Engine callbacks fire on GStreamer threads. They never touch the bridge
//! directly: each event is folded into a single pending slot and the UI is
//! woken. The UI thread drains the slot on its next frame. Only the latest
//! state matters, so the slot never grows. Once the owner drops the slot,
//! posts are discarded.

use parking_lot::Mutex;
use std::sync::{Arc, Weak};

use crate::engine::{EngineEvent, EventCallback};

/// What the UI thread owes the surfaces after draining the slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PendingPush {
    /// A playing/paused/stopped/end/error event arrived; always push.
    pub lifecycle: bool,
    /// Only time advanced; push unless the user is dragging the slider.
    pub time_changed: bool,
    pub last_error: Option<String>,
}

impl PendingPush {
    fn merge(&mut self, event: EngineEvent) {
        match event {
            EngineEvent::TimeChanged => self.time_changed = true,
            EngineEvent::Error(message) => {
                self.lifecycle = true;
                self.last_error = Some(message);
            }
            EngineEvent::Playing
            | EngineEvent::Paused
            | EngineEvent::Stopped
            | EngineEvent::EndReached => self.lifecycle = true,
        }
    }
}

#[derive(Default)]
pub struct EventSlot {
    pending: Mutex<Option<PendingPush>>,
}

impl EventSlot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn take(&self) -> Option<PendingPush> {
        self.pending.lock().take()
    }
}

/// Sending half held by engine threads.
#[derive(Clone)]
pub struct UiMarshal {
    slot: Weak<EventSlot>,
    wake: Arc<dyn Fn() + Send + Sync>,
}

impl UiMarshal {
    pub fn new(slot: &Arc<EventSlot>, wake: impl Fn() + Send + Sync + 'static) -> Self {
        UiMarshal {
            slot: Arc::downgrade(slot),
            wake: Arc::new(wake),
        }
    }

    /// Fold `event` into the slot and wake the UI. Returns false when the
    /// owner is gone and the event was dropped.
    pub fn post(&self, event: EngineEvent) -> bool {
        let Some(slot) = self.slot.upgrade() else {
            tracing::trace!("dropping {:?}: UI is gone", event);
            return false;
        };
        slot.pending
            .lock()
            .get_or_insert_with(PendingPush::default)
            .merge(event);
        (self.wake)();
        true
    }

    pub fn into_callback(self) -> EventCallback {
        Arc::new(move |event| {
            self.post(event);
        })
    }
}
