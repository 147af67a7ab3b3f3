// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! BITMAPFILEHEADER + BITMAPINFOHEADER parsing and serialization.
//!
//! Layout of the 54 bytes we care about (all fields little-endian):
//!
//! ```text
//! @0   [2] "BM"
//! @2   [4] file size
//! @6   [4] reserved
//! @10  [4] pixel data offset
//! @14  [4] info header size (40)
//! @18  [4] width  (i32)
//! @22  [4] height (i32, positive = bottom-up)
//! @26  [2] color planes (1)
//! @28  [2] bits per pixel
//! @30  [4] compression
//! @34  [4] raw image size
//! @38 [16] resolution / palette fields (written as zero)
//! ```

use super::error::{BmpError, Result};

pub const FILE_HEADER_SIZE: usize = 14;
pub const INFO_HEADER_SIZE: usize = 40;
/// Combined header size; also the canonical pixel data offset on write.
pub const HEADER_SIZE: usize = FILE_HEADER_SIZE + INFO_HEADER_SIZE;

pub const BITS_PER_PIXEL: u16 = 24;
pub const BYTES_PER_PIXEL: usize = 3;
/// BI_RGB.
pub const COMPRESSION_NONE: u32 = 0;

const MAGIC: [u8; 2] = *b"BM";

/// The header fields that matter for a 24-bit uncompressed bitmap.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BmpHeader {
    pub width: i32,
    pub height: i32,
    pub data_offset: u32,
}

impl BmpHeader {
    /// Parse and validate the fixed 54-byte header at the start of `data`.
    pub fn parse(data: &[u8]) -> Result<Self> {
        if data.len() < HEADER_SIZE {
            return Err(BmpError::Truncated { needed: HEADER_SIZE, actual: data.len() });
        }
        if data[0..2] != MAGIC {
            return Err(BmpError::InvalidMagic);
        }

        let data_offset = read_u32(data, 10);
        let width = read_i32(data, 18);
        let height = read_i32(data, 22);
        let bits_per_pixel = read_u16(data, 28);
        let compression = read_u32(data, 30);

        if bits_per_pixel != BITS_PER_PIXEL {
            return Err(BmpError::UnsupportedBitDepth(bits_per_pixel));
        }
        if compression != COMPRESSION_NONE {
            return Err(BmpError::UnsupportedCompression(compression));
        }
        if width <= 0 || height <= 0 {
            return Err(BmpError::InvalidDimensions { width, height });
        }
        if (data_offset as usize) < HEADER_SIZE {
            return Err(BmpError::InvalidDataOffset(data_offset));
        }

        Ok(Self { width, height, data_offset })
    }

    /// Serialize a canonical header for a pixel array of `image_size` bytes.
    pub fn to_bytes(&self, image_size: usize) -> [u8; HEADER_SIZE] {
        let mut out = [0u8; HEADER_SIZE];
        out[0..2].copy_from_slice(&MAGIC);
        write_u32(&mut out, 2, (HEADER_SIZE + image_size) as u32);
        write_u32(&mut out, 10, HEADER_SIZE as u32);
        write_u32(&mut out, 14, INFO_HEADER_SIZE as u32);
        write_u32(&mut out, 18, self.width as u32);
        write_u32(&mut out, 22, self.height as u32);
        write_u16(&mut out, 26, 1);
        write_u16(&mut out, 28, BITS_PER_PIXEL);
        write_u32(&mut out, 30, COMPRESSION_NONE);
        write_u32(&mut out, 34, image_size as u32);
        out
    }
}

/// Bytes per stored row, padded to a 4-byte boundary.
pub fn row_size(width: i32) -> usize {
    (width as usize * BYTES_PER_PIXEL + 3) & !3
}

fn read_u16(buf: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([buf[offset], buf[offset + 1]])
}

fn read_u32(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn read_i32(buf: &[u8], offset: usize) -> i32 {
    read_u32(buf, offset) as i32
}

fn write_u16(buf: &mut [u8], offset: usize, val: u16) {
    buf[offset..offset + 2].copy_from_slice(&val.to_le_bytes());
}

fn write_u32(buf: &mut [u8], offset: usize, val: u32) {
    buf[offset..offset + 4].copy_from_slice(&val.to_le_bytes());
}
