// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Pure-Rust 24-bit BMP pixel store.
//!
//! Reads and writes uncompressed bottom-up bitmaps and exposes the raw,
//! row-padded BGR pixel array directly. Steganographic embedding operates on
//! that flat buffer; pixel-coordinate access is provided for everything else.
//!
//! Supports:
//! - 24 bits per pixel, BI_RGB (no compression)
//! - Arbitrary pixel data offsets on read (gaps after the header are skipped)
//! - Byte-exact pixel array round-trip
//!
//! Does NOT support:
//! - Palette-indexed, 16/32-bit or compressed bitmaps -- rejected at parse time
//! - Top-down (negative height) bitmaps -- rejected at parse time

pub mod error;
pub mod header;

use std::fs;
use std::path::Path;

use error::{BmpError, Result};
use header::{BmpHeader, BYTES_PER_PIXEL, HEADER_SIZE};

/// An RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// A 24-bit bitmap held entirely in memory.
///
/// The pixel buffer keeps the on-disk layout: rows bottom-to-top, each row
/// `row_size` bytes long (BGR triplets followed by zero padding to a 4-byte
/// boundary). Pixel `(x, y)` lives at `(height - 1 - y) * row_size + x * 3`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BitmapImage {
    width: i32,
    height: i32,
    row_size: usize,
    pixel_data: Vec<u8>,
}

impl BitmapImage {
    /// Create a black image of the given size.
    pub fn new(width: i32, height: i32) -> Result<Self> {
        let len = pixel_array_len(width, height)?;
        Ok(Self {
            width,
            height,
            row_size: header::row_size(width),
            pixel_data: vec![0u8; len],
        })
    }

    /// Parse a BMP file from bytes.
    ///
    /// Bytes between the header and the declared pixel data offset are
    /// skipped. Trailing bytes after the pixel array are ignored.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        let hdr = BmpHeader::parse(data)?;
        let len = pixel_array_len(hdr.width, hdr.height)?;

        let start = hdr.data_offset as usize;
        let end = start
            .checked_add(len)
            .ok_or(BmpError::InvalidDimensions { width: hdr.width, height: hdr.height })?;
        if data.len() < end {
            return Err(BmpError::Truncated { needed: end, actual: data.len() });
        }

        Ok(Self {
            width: hdr.width,
            height: hdr.height,
            row_size: header::row_size(hdr.width),
            pixel_data: data[start..end].to_vec(),
        })
    }

    /// Read and parse a BMP file from disk.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = fs::read(path)?;
        Self::from_bytes(&data)
    }

    /// Serialize with a canonical 54-byte header followed by the pixel
    /// buffer verbatim.
    pub fn to_bytes(&self) -> Vec<u8> {
        let hdr = BmpHeader {
            width: self.width,
            height: self.height,
            data_offset: HEADER_SIZE as u32,
        };
        let mut out = Vec::with_capacity(HEADER_SIZE + self.pixel_data.len());
        out.extend_from_slice(&hdr.to_bytes(self.pixel_data.len()));
        out.extend_from_slice(&self.pixel_data);
        out
    }

    /// Serialize and write to disk.
    pub fn write<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        fs::write(path, self.to_bytes())?;
        Ok(())
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Stored row length in bytes, including padding.
    pub fn row_size(&self) -> usize {
        self.row_size
    }

    /// The raw row-padded BGR pixel array.
    pub fn pixel_data(&self) -> &[u8] {
        &self.pixel_data
    }

    /// Mutable access to the raw pixel array. Its length cannot change.
    pub fn pixel_data_mut(&mut self) -> &mut [u8] {
        &mut self.pixel_data
    }

    /// An independent copy of the pixel array.
    pub fn clone_pixel_buffer(&self) -> Vec<u8> {
        self.pixel_data.clone()
    }

    /// Replace the pixel array with a buffer of identical length.
    pub fn set_pixel_data(&mut self, data: Vec<u8>) -> Result<()> {
        if data.len() != self.pixel_data.len() {
            return Err(BmpError::BufferLengthMismatch {
                expected: self.pixel_data.len(),
                actual: data.len(),
            });
        }
        self.pixel_data = data;
        Ok(())
    }

    /// Buffer offset of the blue byte of pixel `(x, y)`.
    pub fn offset(&self, x: i32, y: i32) -> Result<usize> {
        if x < 0 || x >= self.width || y < 0 || y >= self.height {
            return Err(BmpError::PixelOutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok((self.height - 1 - y) as usize * self.row_size + x as usize * BYTES_PER_PIXEL)
    }

    pub fn get_pixel(&self, x: i32, y: i32) -> Result<Rgb> {
        let i = self.offset(x, y)?;
        let p = &self.pixel_data[i..i + BYTES_PER_PIXEL];
        Ok(Rgb::new(p[2], p[1], p[0]))
    }

    pub fn set_pixel(&mut self, x: i32, y: i32, rgb: Rgb) -> Result<()> {
        let i = self.offset(x, y)?;
        self.pixel_data[i..i + BYTES_PER_PIXEL].copy_from_slice(&[rgb.b, rgb.g, rgb.r]);
        Ok(())
    }
}

/// `row_size * height`, rejecting non-positive or overflowing dimensions.
fn pixel_array_len(width: i32, height: i32) -> Result<usize> {
    if width <= 0 || height <= 0 {
        return Err(BmpError::InvalidDimensions { width, height });
    }
    (width as usize)
        .checked_mul(BYTES_PER_PIXEL)
        .and_then(|w| w.checked_add(3))
        .map(|w| w & !3)
        .and_then(|row| row.checked_mul(height as usize))
        .ok_or(BmpError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_image_has_padded_rows() {
        let img = BitmapImage::new(5, 3).unwrap();
        assert_eq!(img.row_size(), 16);
        assert_eq!(img.pixel_data().len(), 48);
        assert!(img.row_size() >= 5 * 3);
    }

    #[test]
    fn new_rejects_zero_size() {
        assert!(matches!(BitmapImage::new(0, 4), Err(BmpError::InvalidDimensions { .. })));
        assert!(matches!(BitmapImage::new(4, -1), Err(BmpError::InvalidDimensions { .. })));
    }

    #[test]
    fn pixel_offsets_are_bottom_up() {
        let img = BitmapImage::new(3, 2).unwrap();
        // Row size 12. y=0 is the last stored row.
        assert_eq!(img.offset(0, 0).unwrap(), 12);
        assert_eq!(img.offset(2, 0).unwrap(), 18);
        assert_eq!(img.offset(0, 1).unwrap(), 0);
        assert_eq!(img.offset(1, 1).unwrap(), 3);
    }

    #[test]
    fn set_get_pixel_stores_bgr() {
        let mut img = BitmapImage::new(2, 2).unwrap();
        img.set_pixel(1, 0, Rgb::new(0x11, 0x22, 0x33)).unwrap();
        assert_eq!(img.get_pixel(1, 0).unwrap(), Rgb::new(0x11, 0x22, 0x33));
        let i = img.offset(1, 0).unwrap();
        assert_eq!(&img.pixel_data()[i..i + 3], &[0x33, 0x22, 0x11]);
    }

    #[test]
    fn out_of_bounds_pixel_is_index_error() {
        let mut img = BitmapImage::new(2, 2).unwrap();
        for (x, y) in [(-1, 0), (0, -1), (2, 0), (0, 2)] {
            let err = img.get_pixel(x, y).unwrap_err();
            assert!(err.is_index_error(), "({x}, {y}) should be out of bounds");
            assert!(img.set_pixel(x, y, Rgb::default()).is_err());
        }
    }

    #[test]
    fn bytes_roundtrip_preserves_pixels() {
        let mut img = BitmapImage::new(3, 3).unwrap();
        for (i, b) in img.pixel_data_mut().iter_mut().enumerate() {
            *b = (i * 7) as u8;
        }
        let bytes = img.to_bytes();
        assert_eq!(bytes.len(), 54 + 36);
        let back = BitmapImage::from_bytes(&bytes).unwrap();
        assert_eq!(back, img);
    }

    #[test]
    fn from_bytes_skips_to_data_offset() {
        let img = BitmapImage::new(1, 1).unwrap();
        let mut bytes = img.to_bytes();
        // Move the pixel array 6 bytes further and patch the offset.
        bytes.splice(54..54, [0xEE; 6]);
        bytes[10..14].copy_from_slice(&60u32.to_le_bytes());
        bytes[54 + 6] = 0x42;
        let parsed = BitmapImage::from_bytes(&bytes).unwrap();
        assert_eq!(parsed.pixel_data()[0], 0x42);
    }

    #[test]
    fn truncated_pixel_data_rejected() {
        let img = BitmapImage::new(4, 4).unwrap();
        let bytes = img.to_bytes();
        let short = &bytes[..bytes.len() - 1];
        assert!(matches!(
            BitmapImage::from_bytes(short),
            Err(BmpError::Truncated { .. })
        ));
    }

    #[test]
    fn clone_pixel_buffer_is_independent() {
        let img = BitmapImage::new(2, 1).unwrap();
        let mut copy = img.clone_pixel_buffer();
        copy[0] = 0xFF;
        assert_eq!(img.pixel_data()[0], 0);
    }

    #[test]
    fn set_pixel_data_rejects_wrong_length() {
        let mut img = BitmapImage::new(2, 2).unwrap();
        assert!(matches!(
            img.set_pixel_data(vec![0; 3]),
            Err(BmpError::BufferLengthMismatch { expected: 16, actual: 3 })
        ));
        img.set_pixel_data(vec![1; 16]).unwrap();
        assert_eq!(img.pixel_data(), &[1u8; 16][..]);
    }
}
