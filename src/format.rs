//! Encoded stream layout.
//!
//! ```text
//! byte 0           : node_count (N)
//! bytes 1..4N      : N node records, 4 bytes each, postorder
//! bytes (4N+1)..+4 : original length, uint32 little-endian
//! remaining bytes  : packed code bitstream, zero-padded to byte boundary
//! ```

use crate::error::{CodecError, Result};
use crate::serialize::{bytes_to_records, records_to_bytes, NodeRecord, RECORD_LEN};

pub const COUNT_LEN: usize = 1;
pub const SIZE_LEN: usize = 4;

/// A parsed stream; the payload borrows from the input buffer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedStream<'a> {
    pub records: Vec<NodeRecord>,
    pub original_len: u32,
    pub payload: &'a [u8],
}

pub fn size_to_bytes(size: u32) -> [u8; SIZE_LEN] {
    size.to_le_bytes()
}

pub fn bytes_to_size(buf: [u8; SIZE_LEN]) -> u32 {
    u32::from_le_bytes(buf)
}

/// Assemble the full stream. Fails before producing anything if the node
/// count does not fit its byte.
pub fn write_stream(records: &[NodeRecord], original_len: u32, payload: &[u8]) -> Result<Vec<u8>> {
    let count = u8::try_from(records.len()).map_err(|_| CodecError::HeaderOverflow(records.len()))?;

    let mut output =
        Vec::with_capacity(COUNT_LEN + records.len() * RECORD_LEN + SIZE_LEN + payload.len());
    output.push(count);
    output.extend_from_slice(&records_to_bytes(records));
    output.extend_from_slice(&size_to_bytes(original_len));
    output.extend_from_slice(payload);
    Ok(output)
}

pub fn read_stream(buf: &[u8]) -> Result<EncodedStream<'_>> {
    let Some((&count, rest)) = buf.split_first() else {
        return Err(CodecError::TruncatedHeader {
            expected: COUNT_LEN + SIZE_LEN,
            actual: 0,
        });
    };
    let count = count as usize;

    let header_len = COUNT_LEN + count * RECORD_LEN + SIZE_LEN;
    if buf.len() < header_len {
        return Err(CodecError::TruncatedHeader {
            expected: header_len,
            actual: buf.len(),
        });
    }

    let (node_bytes, rest) = rest.split_at(count * RECORD_LEN);
    let (size_bytes, payload) = rest.split_at(SIZE_LEN);
    let records = bytes_to_records(node_bytes)?;
    let original_len = bytes_to_size([size_bytes[0], size_bytes[1], size_bytes[2], size_bytes[3]]);

    Ok(EncodedStream {
        records,
        original_len,
        payload,
    })
}
