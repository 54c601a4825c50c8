#![forbid(unsafe_code)]
#![cfg_attr(not(debug_assertions), deny(warnings))] // Forbid warnings in release builds
#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod assets;
pub mod config;
pub mod font;
pub mod tick;

pub use app::ClockApp;
pub use assets::{AssetDir, AssetError};
pub use config::{Config, ConfigError};
