use crate::ooxml::error::{DocumentError, Result};
use serde::{Deserialize, Serialize};

/// What to do when plain text does not split into one segment per slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MismatchPolicy {
    /// Write the whole text into the first slot and keep the others
    #[default]
    CollapseIntoFirst,
    /// Fail with a slot count mismatch
    Reject,
}

/// Per-session settings.
///
/// ```
/// use ooxml_splice::{MismatchPolicy, SessionOptions};
///
/// let options = SessionOptions::from_yaml("mismatch_policy: reject\ncompression_level: 9\n").unwrap();
/// assert_eq!(options.mismatch_policy, MismatchPolicy::Reject);
/// assert_eq!(options.compression_level, Some(9));
/// assert!(options.preserve_edge_whitespace);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionOptions {
    /// Deflate level for re-serialized parts; `None` uses the codec default
    pub compression_level: Option<i64>,
    pub mismatch_policy: MismatchPolicy,
    /// Mark `w:t` leaves `xml:space="preserve"` when written text has edge whitespace
    pub preserve_edge_whitespace: bool,
}

impl Default for SessionOptions {
    fn default() -> Self {
        Self {
            compression_level: None,
            mismatch_policy: MismatchPolicy::default(),
            preserve_edge_whitespace: true,
        }
    }
}

impl SessionOptions {
    /// Load options from YAML; missing keys take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_saphyr::from_str(yaml)
            .map_err(|e| DocumentError::Config(format!("Failed to parse session options: {}", e)))
    }

    /// Render the options as YAML.
    pub fn to_yaml(&self) -> Result<String> {
        serde_saphyr::to_string(self)
            .map_err(|e| DocumentError::Config(format!("Failed to serialize session options: {}", e)))
    }

    pub fn with_mismatch_policy(mut self, policy: MismatchPolicy) -> Self {
        self.mismatch_policy = policy;
        self
    }

    pub fn with_compression_level(mut self, level: Option<i64>) -> Self {
        self.compression_level = level;
        self
    }
}
