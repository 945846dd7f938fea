pub mod app;
pub mod control_surface;
pub mod video_player;
