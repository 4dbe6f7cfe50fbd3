//! huffcodec: byte-alphabet Huffman codec with a self-describing tree header.
//!
//! The pipeline:
//! - frequency analysis over the input bytes
//! - prefix tree construction with a fixed, reproducible merge order
//! - optional shape-preserving leaf reassignment
//! - code table derivation and bit packing
//! - a postorder node-list header so the decoder can rebuild the tree
//!
//! [`Codec`] drives the pipeline over memory buffers and files. The lower
//! modules are pure functions over their inputs and do no logging.

pub mod bitpack;
pub mod codes;
pub mod config;
pub mod error;
pub mod format;
pub mod frequency;
pub mod optimize;
pub mod serialize;
pub mod tree;

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info};

use crate::codes::CodeTable;
use crate::config::CodecConfig;
use crate::error::{CodecError, Result};
use crate::frequency::FrequencyTable;
use crate::tree::HuffmanTree;

/// Summary of one compression run
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CompressionReport {
    pub original_size: usize,
    pub compressed_size: usize,
    pub ratio: f64,
    pub distinct_symbols: usize,
    pub node_count: usize,
    pub bits_per_symbol: f64,
    pub entropy_bits: f64,
}

/// The codec driver
#[derive(Debug, Clone, Default)]
pub struct Codec {
    config: CodecConfig,
}

impl Codec {
    /// Create a codec with the given configuration
    pub fn new(config: CodecConfig) -> Self {
        Self { config }
    }

    /// The active configuration
    pub fn config(&self) -> &CodecConfig {
        &self.config
    }

    /// Compress `data` into a header + bitstream buffer.
    pub fn compress(&self, data: &[u8]) -> Result<Vec<u8>> {
        self.compress_with_report(data).map(|(stream, _)| stream)
    }

    /// Compress `data` and summarize the run.
    pub fn compress_with_report(&self, data: &[u8]) -> Result<(Vec<u8>, CompressionReport)> {
        if data.is_empty() {
            return Err(CodecError::EmptyInput);
        }
        let limit = self.config.input_limit();
        if data.len() > limit {
            return Err(CodecError::InputTooLarge {
                size: data.len(),
                limit,
            });
        }

        let freq = FrequencyTable::from_bytes(data);
        debug!(symbols = freq.len(), total = freq.total(), "frequency table built");

        let mut tree = HuffmanTree::build(&freq)?;
        if self.config.optimize_tree {
            optimize::improve_tree(&mut tree, &freq)?;
        }
        tree.number_nodes();

        let codes = CodeTable::from_tree(&tree)?;
        let records = serialize::serialize_tree(&tree)?;
        let payload = bitpack::pack(data, &codes)?;
        // input_limit keeps the length within u32
        let original_len = u32::try_from(data.len()).map_err(|_| CodecError::InputTooLarge {
            size: data.len(),
            limit,
        })?;
        let stream = format::write_stream(&records, original_len, &payload)?;

        let report = CompressionReport {
            original_size: data.len(),
            compressed_size: stream.len(),
            ratio: stream.len() as f64 / data.len() as f64,
            distinct_symbols: freq.len(),
            node_count: records.len(),
            bits_per_symbol: codes.avg_length(&freq),
            entropy_bits: freq.entropy(),
        };
        debug!(
            nodes = report.node_count,
            bits_per_symbol = report.bits_per_symbol,
            entropy = report.entropy_bits,
            "stream encoded"
        );

        Ok((stream, report))
    }

    /// Decompress a buffer produced by [`Codec::compress`].
    pub fn decompress(&self, data: &[u8]) -> Result<Vec<u8>> {
        let stream = format::read_stream(data)?;
        let len = stream.original_len as usize;
        let limit = self.config.input_limit();
        if len > limit {
            return Err(CodecError::InputTooLarge { size: len, limit });
        }

        let tree = serialize::deserialize_tree(&stream.records)?;
        debug!(nodes = stream.records.len(), len, "tree rebuilt from header");
        bitpack::unpack(&tree, stream.payload, len)
    }

    /// Compress `input` into `output`. Nothing is written unless the whole
    /// stream was produced.
    pub fn compress_file(&self, input: &Path, output: &Path) -> Result<CompressionReport> {
        let start = Instant::now();
        let data = std::fs::read(input)?;
        let (stream, report) = self.compress_with_report(&data)?;
        std::fs::write(output, &stream)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            original = report.original_size,
            compressed = report.compressed_size,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "compressed"
        );
        Ok(report)
    }

    /// Decompress `input` into `output`, returning the restored size.
    pub fn decompress_file(&self, input: &Path, output: &Path) -> Result<usize> {
        let start = Instant::now();
        let data = std::fs::read(input)?;
        let restored = self.decompress(&data)?;
        std::fs::write(output, &restored)?;
        info!(
            input = %input.display(),
            output = %output.display(),
            restored = restored.len(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "uncompressed"
        );
        Ok(restored.len())
    }
}
