pub mod atmosphere;
pub mod display;
pub mod player;
pub mod setup;

pub use atmosphere::sync_atmosphere_settings;
pub use display::sync_vsync_settings;
pub use player::update_player_fill_light;
pub use setup::setup;
