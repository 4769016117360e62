use std::{fmt, path::Path, str::FromStr, time::Duration};

use serde::{Deserialize, Serialize};

use crate::{Result, VolumeWaveError};

/// Top-level configuration structure for the application.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub wave: WaveConfig,
    pub volume: VolumeConfig,
    /// Refresh rate the host drives the animation at.
    pub frame_rate: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            wave: WaveConfig::default(),
            volume: VolumeConfig::default(),
            frame_rate: 60,
        }
    }
}

impl AppConfig {
    /// Reads a JSON configuration file. Missing keys fall back to defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())?;
        Self::from_json(&raw)
    }

    pub fn from_json(raw: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(raw)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.frame_rate == 0 {
            return Err(VolumeWaveError::InvalidConfig("frame rate must be positive"));
        }
        self.volume.validate()?;
        self.wave.validate()
    }

    /// Time budget for a single frame at the configured rate.
    pub fn frame_interval(&self) -> Duration {
        Duration::from_micros(1_000_000 / u64::from(self.frame_rate.max(1)))
    }
}

/// Appearance and animation settings for a single wave view.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WaveConfig {
    /// Bar width in density-independent units.
    pub bar_width: f32,
    /// Gap between bars in density-independent units.
    pub bar_offset: f32,
    pub highlight_color: Color,
    pub base_color: Color,
    /// Start with the animation paused by the user.
    pub paused: bool,
    /// Pixels per density-independent unit.
    pub density: f32,
    /// Length of one progress sweep of the ticker, in milliseconds.
    pub period_ms: u64,
    pub corner_radius: f32,
}

impl Default for WaveConfig {
    fn default() -> Self {
        Self {
            bar_width: 4.0,
            bar_offset: 8.0,
            highlight_color: Color::from_argb(0xFF5A_82E6),
            base_color: Color::from_argb(0xFFD8_D8D8),
            paused: false,
            density: 1.0,
            period_ms: 1000,
            corner_radius: 6.0,
        }
    }
}

impl WaveConfig {
    pub fn bar_width_px(&self) -> f32 {
        dp_to_px(self.bar_width, self.density) as f32
    }

    pub fn bar_offset_px(&self) -> f32 {
        dp_to_px(self.bar_offset, self.density) as f32
    }

    pub fn period(&self) -> Duration {
        Duration::from_millis(self.period_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.density > 0.0) {
            return Err(VolumeWaveError::InvalidConfig("density must be positive"));
        }
        if self.bar_width < 0.0 || self.bar_offset < 0.0 {
            return Err(VolumeWaveError::InvalidConfig(
                "bar width and offset cannot be negative",
            ));
        }
        if self.bar_width_px() + self.bar_offset_px() <= 0.0 {
            return Err(VolumeWaveError::InvalidConfig(
                "bar width plus offset must cover at least one pixel",
            ));
        }
        Ok(())
    }
}

/// Settings for the built-in volume source used by the demo host.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VolumeConfig {
    pub initial: i32,
    pub max: i32,
}

impl Default for VolumeConfig {
    fn default() -> Self {
        Self { initial: 7, max: 15 }
    }
}

impl VolumeConfig {
    pub fn validate(&self) -> Result<()> {
        if self.max < 0 {
            return Err(VolumeWaveError::InvalidConfig("max volume cannot be negative"));
        }
        Ok(())
    }
}

/// Converts density-independent units to whole pixels, rounding half up.
pub fn dp_to_px(dp: f32, density: f32) -> i32 {
    (dp * density + 0.5) as i32
}

/// Packed `0xAARRGGBB` color.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(u32);

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0xFF00_0000),
    ("darkgray", 0xFF44_4444),
    ("darkgrey", 0xFF44_4444),
    ("gray", 0xFF88_8888),
    ("grey", 0xFF88_8888),
    ("lightgray", 0xFFCC_CCCC),
    ("lightgrey", 0xFFCC_CCCC),
    ("white", 0xFFFF_FFFF),
    ("red", 0xFFFF_0000),
    ("green", 0xFF00_FF00),
    ("blue", 0xFF00_00FF),
    ("yellow", 0xFFFF_FF00),
    ("cyan", 0xFF00_FFFF),
    ("magenta", 0xFFFF_00FF),
    ("aqua", 0xFF00_FFFF),
    ("fuchsia", 0xFFFF_00FF),
    ("lime", 0xFF00_FF00),
    ("maroon", 0xFF80_0000),
    ("navy", 0xFF00_0080),
    ("olive", 0xFF80_8000),
    ("purple", 0xFF80_0080),
    ("silver", 0xFFC0_C0C0),
    ("teal", 0xFF00_8080),
];

impl Color {
    pub const fn from_argb(argb: u32) -> Self {
        Self(argb)
    }

    pub const fn argb(self) -> u32 {
        self.0
    }

    pub const fn alpha(self) -> u8 {
        (self.0 >> 24) as u8
    }

    pub const fn red(self) -> u8 {
        (self.0 >> 16) as u8
    }

    pub const fn green(self) -> u8 {
        (self.0 >> 8) as u8
    }

    pub const fn blue(self) -> u8 {
        self.0 as u8
    }
}

impl FromStr for Color {
    type Err = VolumeWaveError;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || VolumeWaveError::InvalidColor(s.to_string());
        if let Some(hex) = s.strip_prefix('#') {
            let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
            return match hex.len() {
                6 => Ok(Self(0xFF00_0000 | value)),
                8 => Ok(Self(value)),
                _ => Err(invalid()),
            };
        }

        let name = s.to_ascii_lowercase();
        NAMED_COLORS
            .iter()
            .find(|(known, _)| *known == name)
            .map(|(_, argb)| Self(*argb))
            .ok_or_else(invalid)
    }
}

impl TryFrom<String> for Color {
    type Error = VolumeWaveError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(value: Color) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

impl fmt::Debug for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Color({self})")
    }
}
