//! Frame trigger policies

use crate::config::Config;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// What starts a frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub enum RefreshPolicy {
    /// Render after reset and after every buffer change, once the receiver
    /// has been quiet for the idle-refresh time
    #[default]
    Internal,
    /// Render only on a CR byte
    External,
}

impl RefreshPolicy {
    /// Policy selected by the configuration
    pub const fn from_config(config: &Config) -> Self {
        if config.ext_refresh {
            RefreshPolicy::External
        } else {
            RefreshPolicy::Internal
        }
    }

    /// Check if buffer changes schedule a frame
    pub const fn follows_buffer(&self) -> bool {
        matches!(self, RefreshPolicy::Internal)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_config() {
        let config = Config::from_register(0b0100_0000);
        assert_eq!(RefreshPolicy::from_config(&config), RefreshPolicy::External);
        assert!(!RefreshPolicy::External.follows_buffer());

        let config = Config::default();
        assert_eq!(RefreshPolicy::from_config(&config), RefreshPolicy::Internal);
        assert!(RefreshPolicy::Internal.follows_buffer());
    }
}
