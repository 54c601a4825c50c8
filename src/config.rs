use std::path::PathBuf;

use eframe::egui::Color32;

use crate::assets::AssetDir;

pub const DEFAULT_COLOR: &str = "#00C15D";
pub const DEFAULT_FONT_FILE: &str = "DynaPuff.ttf";
pub const DEFAULT_TIME_SIZE: f32 = 30.0;
pub const DEFAULT_DATE_SIZE: f32 = 22.0;
pub const DEFAULT_TIME_FORMAT: &str = "%H:%M:%S";
pub const DEFAULT_DATE_FORMAT: &str = "%A %Y-%m-%d";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} is not a valid hex color: {value:?} ({reason})")]
    Color {
        var: &'static str,
        value: String,
        reason: String,
    },
    #[error("{var} is not a valid size: {value:?}")]
    Size {
        var: &'static str,
        value: String,
        #[source]
        source: std::num::ParseFloatError,
    },
}

/// Session configuration, read once at startup.
///
/// Absent variables take the documented defaults; malformed values are a
/// startup error rather than silently substituted. Format patterns are not
/// validated here, matching the formatting primitive's own semantics.
#[derive(Debug, Clone)]
pub struct Config {
    pub color: Color32,
    pub font_path: PathBuf,
    pub time_text_size: f32,
    pub date_text_size: f32,
    pub time_format: String,
    pub date_format: String,
}

impl Config {
    pub fn from_env(assets: &AssetDir) -> Result<Self, ConfigError> {
        Self::from_lookup(assets, |var| std::env::var(var).ok())
    }

    fn from_lookup(
        assets: &AssetDir,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            color: parse_color("CLOCK_COLOR", lookup("CLOCK_COLOR"))?,
            font_path: lookup("CLOCK_FONT")
                .map(PathBuf::from)
                .unwrap_or_else(|| assets.path_of(DEFAULT_FONT_FILE)),
            time_text_size: parse_size("CLOCK_TEXT_SIZE", lookup("CLOCK_TEXT_SIZE"), DEFAULT_TIME_SIZE)?,
            date_text_size: parse_size("CLOCK_DATE_SIZE", lookup("CLOCK_DATE_SIZE"), DEFAULT_DATE_SIZE)?,
            time_format: lookup("CLOCK_TIME_FORMAT").unwrap_or_else(|| DEFAULT_TIME_FORMAT.to_owned()),
            date_format: lookup("CLOCK_DATE_FORMAT").unwrap_or_else(|| DEFAULT_DATE_FORMAT.to_owned()),
        })
    }
}

fn parse_color(var: &'static str, value: Option<String>) -> Result<Color32, ConfigError> {
    let value = value.unwrap_or_else(|| DEFAULT_COLOR.to_owned());
    Color32::from_hex(&value).map_err(|err| ConfigError::Color {
        var,
        reason: format!("{err:?}"),
        value,
    })
}

fn parse_size(var: &'static str, value: Option<String>, default: f32) -> Result<f32, ConfigError> {
    match value {
        None => Ok(default),
        Some(value) => value.parse().map_err(|source| ConfigError::Size { var, value, source }),
    }
}
