pub mod glide;
pub mod input;
pub mod player;
pub mod plugin;
pub mod ron;
pub use crate::ron as ron_loader;
pub mod settings;
pub mod world;

pub use plugin::{GlidePlugin, GlideSet};
