//! Loader configuration for turning configuration text into buildable systems.

use serde::{Deserialize, Serialize};

use crate::error::{Result, RiggingError};

/// Options controlling reference normalization and validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RiggingConfig {
    /// Marker prefix identifying textual references, key name follows it.
    pub reference_prefix: String,
    /// Validate every reference in the configuration before building,
    /// including references held by keys outside the requested closure.
    pub strict_references: bool,
}

impl RiggingConfig {
    /// Returns the marker without trailing whitespace.
    ///
    /// A string is treated as a reference when it starts with this tag.
    #[must_use]
    pub fn reference_tag(&self) -> &str {
        self.reference_prefix.trim_end()
    }

    /// Checks that the options are usable.
    ///
    /// # Errors
    ///
    /// Returns [`RiggingError::Config`] if the reference tag is empty, since
    /// every string would then be read as a reference.
    pub fn validate(&self) -> Result<()> {
        if self.reference_tag().is_empty() {
            return Err(RiggingError::Config {
                message: "reference prefix must not be empty".to_owned(),
            });
        }
        Ok(())
    }
}

impl Default for RiggingConfig {
    fn default() -> Self {
        Self {
            reference_prefix: crate::constants::REF_PREFIX.to_owned(),
            strict_references: false,
        }
    }
}
