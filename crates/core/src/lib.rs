//! Core library for the volume wave visualiser.
//!
//! A row of bars bounces up and down to suggest a waveform while the leftmost
//! bars are highlighted in proportion to the media volume. The crate holds
//! the animation engine and the lifecycle glue; drawing and volume
//! observation are reached through the [`Canvas`] and [`VolumeSource`]
//! traits so any host can plug in.

pub mod animation;
pub mod column;
pub mod config;
pub mod error;
pub mod field;
pub mod render;
pub mod ticker;
pub mod view;
pub mod volume;

pub use animation::{AnimationState, Invalidate, WaveAnimationController};
pub use column::Column;
pub use config::{dp_to_px, AppConfig, Color, VolumeConfig, WaveConfig};
pub use error::{Result, VolumeWaveError};
pub use field::{highlight_count_for, ColumnField, FieldSnapshot};
pub use render::{Bar, Canvas, Rect, WaveRenderer};
pub use ticker::{FrameTicker, RepeatingProgress, Ticker, DEFAULT_PERIOD};
pub use view::{RedrawFlag, WaveView};
pub use volume::{SharedVolume, SubscriptionId, VolumeLevel, VolumeSource, VolumeSubscription};
