use serde::Serialize;
use serde_json::Value;
use std::path::Path;
use thiserror::Error;
use url::Url;

use crate::types::playback_state::PlaybackState;

pub const STATUS_LOADING: &str = "Loading...";
pub const STATUS_NO_MEDIA: &str = "No media loaded.";
pub const ERROR_INVALID_URL: &str = "Invalid URL.";
pub const ERROR_BAD_MESSAGE: &str = "Bad message from UI.";

/// Messages the host posts to a control surface.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum HostMessage {
    Status { message: String },
    Error { message: String },
    State(PlaybackState),
}

impl HostMessage {
    pub fn status(message: impl Into<String>) -> Self {
        HostMessage::Status {
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        HostMessage::Error {
            message: message.into(),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IntentKind {
    Load,
    Remove,
    Play,
    Pause,
    TogglePlayPause,
    SeekStart,
    SeekEnd,
    RequestState,
}

impl IntentKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        let kind = match tag {
            "load" => IntentKind::Load,
            "remove" => IntentKind::Remove,
            "play" => IntentKind::Play,
            "pause" => IntentKind::Pause,
            "togglePlayPause" => IntentKind::TogglePlayPause,
            "seekStart" => IntentKind::SeekStart,
            "seekEnd" => IntentKind::SeekEnd,
            "requestState" => IntentKind::RequestState,
            _ => return None,
        };
        Some(kind)
    }

    pub fn tag(self) -> &'static str {
        match self {
            IntentKind::Load => "load",
            IntentKind::Remove => "remove",
            IntentKind::Play => "play",
            IntentKind::Pause => "pause",
            IntentKind::TogglePlayPause => "togglePlayPause",
            IntentKind::SeekStart => "seekStart",
            IntentKind::SeekEnd => "seekEnd",
            IntentKind::RequestState => "requestState",
        }
    }
}

/// A decoded control-surface intent.
///
/// `load` keeps the raw (trimmed) url so the dispatcher can report an
/// invalid one; `seekEnd` keeps `pos` optional because a missing position
/// still clears the drag flag.
#[derive(Debug, Clone, PartialEq)]
pub enum IntentMessage {
    Load { url: String },
    Remove,
    Play,
    Pause,
    TogglePlayPause,
    SeekStart,
    SeekEnd { pos: Option<f64> },
    RequestState,
}

#[derive(Debug, Error)]
pub enum MessageError {
    #[error("message is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("message is not a JSON object")]
    NotAnObject,
    #[error("`type` is not a string")]
    TypeNotString,
    #[error("field `{field}` of `{kind}` has the wrong type")]
    FieldType { kind: &'static str, field: &'static str },
}

impl IntentMessage {
    pub fn kind(&self) -> IntentKind {
        match self {
            IntentMessage::Load { .. } => IntentKind::Load,
            IntentMessage::Remove => IntentKind::Remove,
            IntentMessage::Play => IntentKind::Play,
            IntentMessage::Pause => IntentKind::Pause,
            IntentMessage::TogglePlayPause => IntentKind::TogglePlayPause,
            IntentMessage::SeekStart => IntentKind::SeekStart,
            IntentMessage::SeekEnd { .. } => IntentKind::SeekEnd,
            IntentMessage::RequestState => IntentKind::RequestState,
        }
    }

    /// Decode a raw surface message.
    ///
    /// `Ok(None)` means the `type` is missing, null, blank or unknown and the
    /// message must be ignored without a reply. Tags match exactly.
    pub fn parse(raw: &str) -> Result<Option<Self>, MessageError> {
        let value: Value = serde_json::from_str(raw)?;
        Self::from_value(&value)
    }

    pub fn from_value(value: &Value) -> Result<Option<Self>, MessageError> {
        let Some(object) = value.as_object() else {
            return Err(MessageError::NotAnObject);
        };
        let tag = match object.get("type") {
            None | Some(Value::Null) => return Ok(None),
            Some(Value::String(tag)) => tag.as_str(),
            Some(_) => return Err(MessageError::TypeNotString),
        };
        if tag.trim().is_empty() {
            return Ok(None);
        }
        let Some(kind) = IntentKind::from_tag(tag) else {
            return Ok(None);
        };

        let intent = match kind {
            IntentKind::Load => {
                let url = match value.get("url") {
                    None | Some(Value::Null) => String::new(),
                    Some(Value::String(url)) => url.trim().to_string(),
                    Some(_) => {
                        return Err(MessageError::FieldType {
                            kind: kind.tag(),
                            field: "url",
                        });
                    }
                };
                IntentMessage::Load { url }
            }
            IntentKind::SeekEnd => {
                let pos = match value.get("pos") {
                    None => None,
                    Some(pos) => Some(pos.as_f64().ok_or(MessageError::FieldType {
                        kind: kind.tag(),
                        field: "pos",
                    })?),
                };
                IntentMessage::SeekEnd { pos }
            }
            IntentKind::Remove => IntentMessage::Remove,
            IntentKind::Play => IntentMessage::Play,
            IntentKind::Pause => IntentMessage::Pause,
            IntentKind::TogglePlayPause => IntentMessage::TogglePlayPause,
            IntentKind::SeekStart => IntentMessage::SeekStart,
            IntentKind::RequestState => IntentMessage::RequestState,
        };
        Ok(Some(intent))
    }
}

/// Resolve the url of a `load` intent to an absolute URI.
///
/// Absolute filesystem paths are accepted and turned into `file://` URIs.
pub fn parse_media_url(raw: &str) -> Option<Url> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    // `C:\videos\a.mp4` would otherwise parse as scheme `c`.
    if looks_like_drive_path(raw) || Path::new(raw).is_absolute() {
        if let Ok(url) = Url::from_file_path(raw) {
            return Some(url);
        }
    }
    Url::parse(raw).ok()
}

fn looks_like_drive_path(raw: &str) -> bool {
    let bytes = raw.as_bytes();
    bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && matches!(bytes[2], b'\\' | b'/')
}
