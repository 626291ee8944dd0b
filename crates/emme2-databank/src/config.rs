//! Configuration for opening a databank

use crate::word::ByteOrder;
use serde::{Deserialize, Serialize};

/// Configuration for opening a databank
///
/// Databank words are stored in the byte order of the host that wrote the
/// file. That order is not recorded anywhere in the file, so it has to be
/// supplied here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabankConfig {
    /// Byte order of every word in the file (default: little endian)
    pub byte_order: ByteOrder,

    /// Open the file without write access (default: true)
    pub read_only: bool,
}

impl Default for DatabankConfig {
    fn default() -> Self {
        Self {
            byte_order: ByteOrder::default(),
            read_only: true,
        }
    }
}

impl DatabankConfig {
    /// Create a read-only, little-endian configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the byte order used to decode words
    #[must_use]
    pub const fn with_byte_order(mut self, byte_order: ByteOrder) -> Self {
        self.byte_order = byte_order;
        self
    }

    /// Open the file read-only or read-write
    #[must_use]
    pub const fn with_read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        self
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = DatabankConfig::new();
        assert_eq!(config.byte_order, ByteOrder::Little);
        assert!(config.read_only);
    }

    #[test]
    fn test_builder() {
        let config = DatabankConfig::new()
            .with_byte_order(ByteOrder::Big)
            .with_read_only(false);
        assert_eq!(config.byte_order, ByteOrder::Big);
        assert!(!config.read_only);
    }

    #[test]
    fn test_deserialize_partial() {
        let config: DatabankConfig =
            serde_json::from_str(r#"{ "byte_order": "big" }"#).expect("valid config");
        assert_eq!(config.byte_order, ByteOrder::Big);
        assert!(config.read_only);

        let config: DatabankConfig = serde_json::from_str("{}").expect("valid config");
        assert_eq!(config, DatabankConfig::default());
    }
}
