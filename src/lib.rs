pub mod config;
pub mod hud;
pub mod input;
pub mod menubar;
pub mod player;
pub mod proximity;
pub mod renderer;
pub mod ride;
pub mod scene;
pub mod timeline;
pub mod types;
