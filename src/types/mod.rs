pub mod config;
pub mod message;
pub mod playback_state;
pub mod session;
