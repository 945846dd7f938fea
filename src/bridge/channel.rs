use crossbeam_channel::{Receiver, Sender, TryRecvError, unbounded};
use thiserror::Error;

use super::routing::SurfaceId;

#[derive(Debug, Error)]
pub enum SurfaceError {
    #[error("surface {0} has detached")]
    Detached(&'static str),
}

/// Host-to-surface direction of a message channel. Carries serialized JSON.
pub trait SurfaceSink {
    fn post_json(&self, json: &str) -> Result<(), SurfaceError>;
}

/// The host's end of one surface channel.
pub struct HostEnd {
    pub id: SurfaceId,
    outbound: Sender<String>,
    inbound: Receiver<String>,
}

/// The surface's end of one surface channel.
pub struct SurfaceEnd {
    pub id: SurfaceId,
    outbound: Sender<String>,
    inbound: Receiver<String>,
}

pub fn surface_channel(id: SurfaceId) -> (HostEnd, SurfaceEnd) {
    let (to_surface, from_host) = unbounded();
    let (to_host, from_surface) = unbounded();
    (
        HostEnd {
            id,
            outbound: to_surface,
            inbound: from_surface,
        },
        SurfaceEnd {
            id,
            outbound: to_host,
            inbound: from_host,
        },
    )
}

impl HostEnd {
    /// Messages the surface has sent since the last call.
    pub fn drain(&self) -> Vec<String> {
        self.inbound.try_iter().collect()
    }

    pub fn sink(&self) -> ChannelSink {
        ChannelSink {
            id: self.id,
            outbound: self.outbound.clone(),
        }
    }
}

impl SurfaceEnd {
    pub fn send(&self, json: String) -> Result<(), SurfaceError> {
        self.outbound
            .send(json)
            .map_err(|_| SurfaceError::Detached(self.id.name()))
    }

    pub fn try_recv(&self) -> Option<String> {
        match self.inbound.try_recv() {
            Ok(json) => Some(json),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

pub struct ChannelSink {
    id: SurfaceId,
    outbound: Sender<String>,
}

impl SurfaceSink for ChannelSink {
    fn post_json(&self, json: &str) -> Result<(), SurfaceError> {
        self.outbound
            .send(json.to_string())
            .map_err(|_| SurfaceError::Detached(self.id.name()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_both_directions() {
        let (host, surface) = surface_channel(SurfaceId::Overlay);
        surface.send(r#"{"type":"play"}"#.to_string()).unwrap();
        surface.send(r#"{"type":"pause"}"#.to_string()).unwrap();
        assert_eq!(host.drain().len(), 2);
        assert!(host.drain().is_empty());

        host.sink().post_json(r#"{"type":"status","message":""}"#).unwrap();
        assert!(surface.try_recv().is_some());
        assert!(surface.try_recv().is_none());
    }

    #[test]
    fn test_detached_surface_is_an_error() {
        let (host, surface) = surface_channel(SurfaceId::BottomBar);
        let sink = host.sink();
        drop(surface);
        assert!(matches!(
            sink.post_json("{}"),
            Err(SurfaceError::Detached("bottom-bar"))
        ));
    }
}
