/// Result alias that carries the custom [`VolumeWaveError`] type.
pub type Result<T> = std::result::Result<T, VolumeWaveError>;

/// Common error type for the core crate.
///
/// The animation engine itself never fails; these variants cover the
/// surrounding surface: loading configuration, parsing colors and talking to
/// whatever backend implements a [`Canvas`](crate::render::Canvas).
#[derive(Debug, thiserror::Error)]
pub enum VolumeWaveError {
    /// Free-form message, mostly surfaced by host backends.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// Configuration file could not be decoded.
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    /// Color literal that is neither hex nor a known color name.
    #[error("unknown color `{0}`")]
    InvalidColor(String),
    /// Configuration decoded fine but holds values the view cannot use.
    #[error("invalid configuration: {0}")]
    InvalidConfig(&'static str),
}

impl VolumeWaveError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for VolumeWaveError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for VolumeWaveError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}
