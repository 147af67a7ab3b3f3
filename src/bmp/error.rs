// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for BMP parsing, encoding and pixel addressing.

use thiserror::Error;

/// Errors that can occur while reading, writing or addressing a bitmap.
#[derive(Debug, Error)]
pub enum BmpError {
    /// Input is shorter than the 54-byte header or the declared pixel array.
    #[error("truncated BMP data: need {needed} bytes, got {actual}")]
    Truncated { needed: usize, actual: usize },
    /// Missing `BM` signature at the start of the file.
    #[error("missing BM signature (not a BMP file)")]
    InvalidMagic,
    /// Only 24 bits per pixel is supported.
    #[error("unsupported bit depth: {0} bpp (only 24 is supported)")]
    UnsupportedBitDepth(u16),
    /// Only uncompressed (BI_RGB) bitmaps are supported.
    #[error("unsupported compression method: {0} (only uncompressed is supported)")]
    UnsupportedCompression(u32),
    /// Width or height is zero, negative (top-down) or too large to address.
    #[error("invalid dimensions: {width}x{height}")]
    InvalidDimensions { width: i32, height: i32 },
    /// Pixel data offset points inside the header.
    #[error("invalid pixel data offset: {0}")]
    InvalidDataOffset(u32),
    /// Pixel coordinate outside the image.
    #[error("pixel ({x}, {y}) out of bounds for {width}x{height} image")]
    PixelOutOfBounds { x: i32, y: i32, width: i32, height: i32 },
    /// Replacement pixel buffer does not match `row_size * height`.
    #[error("pixel buffer length mismatch: expected {expected}, got {actual}")]
    BufferLengthMismatch { expected: usize, actual: usize },
    /// Underlying file I/O failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl BmpError {
    /// `true` for coordinate errors, `false` for container/format errors.
    pub fn is_index_error(&self) -> bool {
        matches!(self, Self::PixelOutOfBounds { .. })
    }
}

pub type Result<T> = std::result::Result<T, BmpError>;
