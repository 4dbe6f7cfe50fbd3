//! Bit-level packing of code sequences into bytes, most significant bit first.

use std::io;

use bitstream_io::{BigEndian, BitRead, BitReader, BitWrite, BitWriter};

use crate::codes::CodeTable;
use crate::error::{CodecError, Result};
use crate::tree::HuffmanTree;

/// Concatenate the code of every byte of `data` and split the bits into
/// bytes. A trailing partial byte is padded with zero bits.
pub fn pack(data: &[u8], codes: &CodeTable) -> Result<Vec<u8>> {
    let mut writer = BitWriter::endian(Vec::with_capacity(data.len() / 2), BigEndian);
    for &b in data {
        let code = codes.get(b).ok_or(CodecError::UnknownSymbol(b))?;
        for &bit in code.bits() {
            writer.write_bit(bit)?;
        }
    }
    writer.byte_align()?;
    Ok(writer.into_writer())
}

/// Decode exactly `len` symbols from `packed` by walking `tree` per bit
/// (0 = left, 1 = right), restarting at the root after every leaf.
/// Bits left over after the last symbol are padding and ignored.
pub fn unpack(tree: &HuffmanTree, packed: &[u8], len: usize) -> Result<Vec<u8>> {
    // every symbol costs at least one bit
    let mut out = Vec::with_capacity(len.min(packed.len().saturating_mul(8)));
    if len == 0 {
        return Ok(out);
    }

    let root = tree.root();
    let mut node = root;
    let mut reader = BitReader::endian(packed, BigEndian);

    while out.len() < len {
        let bit = match reader.read_bit() {
            Ok(bit) => bit,
            Err(e) if e.kind() == io::ErrorKind::UnexpectedEof => {
                return Err(CodecError::TruncatedStream {
                    expected: len,
                    decoded: out.len(),
                });
            }
            Err(e) => return Err(e.into()),
        };
        let Some((left, right)) = node.children() else {
            return Err(CodecError::MalformedTree(format!(
                "bit path descends from a leaf after {} symbols",
                out.len()
            )));
        };
        node = if bit { right } else { left };
        if let Some(symbol) = node.symbol() {
            out.push(symbol);
            node = root;
        }
    }

    Ok(out)
}

/// Bit `bit_num` of `byte`, counting from the least significant bit.
pub fn get_bit(byte: u8, bit_num: u8) -> u8 {
    (byte >> bit_num) & 1
}

/// Eight-character bit string of `byte`, most significant bit first.
pub fn byte_to_bits(byte: u8) -> String {
    (0..8).rev().map(|n| if get_bit(byte, n) == 1 { '1' } else { '0' }).collect()
}

/// Byte made of up to eight leading `bits`, right-padded with zeros.
pub fn bits_to_byte(bits: &[bool]) -> u8 {
    bits.iter()
        .take(8)
        .enumerate()
        .fold(0u8, |acc, (pos, &bit)| acc | ((bit as u8) << (7 - pos)))
}
