//! Display labels for process instances.
//!
//! Instances of the same program usually differ only by their install path,
//! e.g. `/clover/prod/tr/thor-alpha/bin/thor`. Stripping the shared prefix
//! and suffix leaves the short product label (`alpha`) used in the summary.

pub const DEFAULT_LABEL_PREFIX: &str = "/clover/prod/tr/thor-";
pub const DEFAULT_LABEL_SUFFIX: &str = "/bin/thor";

/// Prefix and suffix removed from a command to form its label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelRule {
    pub prefix: String,
    pub suffix: String,
}

impl Default for LabelRule {
    fn default() -> Self {
        Self::new(DEFAULT_LABEL_PREFIX, DEFAULT_LABEL_SUFFIX)
    }
}

impl LabelRule {
    pub fn new(prefix: impl Into<String>, suffix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            suffix: suffix.into(),
        }
    }

    /// Strips the prefix and suffix when present.
    ///
    /// A command that consists only of prefix and suffix keeps its full text.
    pub fn apply(&self, command: &str) -> String {
        let mut label = command;
        if !self.prefix.is_empty() {
            label = label.strip_prefix(self.prefix.as_str()).unwrap_or(label);
        }
        if !self.suffix.is_empty() {
            label = label.strip_suffix(self.suffix.as_str()).unwrap_or(label);
        }

        if label.is_empty() {
            command.to_string()
        } else {
            label.to_string()
        }
    }
}
