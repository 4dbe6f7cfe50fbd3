//! Configuration for huffcodec

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Largest input the 32-bit length field can describe.
pub const MAX_STREAM_LEN: usize = u32::MAX as usize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Reassign leaf symbols within the built tree shape before deriving codes.
    /// Off by default: the plain builder tree gives the reference byte stream.
    pub optimize_tree: bool,
    pub max_input_size: usize,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            optimize_tree: false,
            max_input_size: 100 * 1024 * 1024, // 100 MB
        }
    }
}

impl CodecConfig {
    /// Parse a JSON config; missing fields take their defaults.
    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Read and parse a JSON config file.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// The effective input limit, never above what the length field can hold.
    pub fn input_limit(&self) -> usize {
        self.max_input_size.min(MAX_STREAM_LEN)
    }
}
