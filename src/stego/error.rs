// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Error types for the steganography pipeline.
//!
//! [`StegoError`] covers all failure modes from BMP parsing through
//! encryption and frame extraction. [`ErrorKind`] groups them into the
//! diagnostic categories a caller maps to user-facing messages.

use thiserror::Error;

use crate::bmp::error::BmpError;
use crate::stego::config::ConfigError;
use crate::stego::crypto::CryptoError;

/// Errors that can occur during steganographic embedding or extraction.
#[derive(Debug, Error)]
pub enum StegoError {
    /// The cover image could not be parsed, or a pixel access was out of range.
    #[error("invalid bitmap: {0}")]
    InvalidBitmap(#[from] BmpError),
    /// The stream does not fit in the cover's eligible bytes.
    #[error("message too large for this image: need {needed} bytes of cover, have {available}")]
    MessageTooLarge { needed: usize, available: usize },
    /// Decoded length prefix is non-positive or cannot fit in the cover.
    #[error("no hidden data found")]
    NoHiddenData,
    /// A frame cannot carry an empty payload (its length prefix would read as "no data").
    #[error("payload is empty")]
    EmptyPayload,
    /// The extracted stream is structurally inconsistent.
    #[error("corrupted frame: {0}")]
    FrameCorrupted(&'static str),
    /// Unknown selector name or crypto options without a password.
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Cipher setup or decryption failed (wrong password or corrupted data).
    #[error("cryptography error: {0}")]
    Crypto(#[from] CryptoError),
    /// File I/O outside the bitmap codec.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Diagnostic category of a [`StegoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or unsupported BMP.
    Format,
    /// Cover too small for the payload.
    Capacity,
    /// Decoded length is non-positive or the frame is inconsistent.
    Framing,
    /// Unknown method/algorithm/mode name, or missing password.
    Config,
    /// Pixel coordinate out of bounds.
    Index,
    /// Decryption or cipher setup failure.
    Crypto,
    /// File system failure.
    Io,
}

impl StegoError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidBitmap(BmpError::Io(_)) => ErrorKind::Io,
            Self::InvalidBitmap(e) if e.is_index_error() => ErrorKind::Index,
            Self::InvalidBitmap(_) => ErrorKind::Format,
            Self::MessageTooLarge { .. } => ErrorKind::Capacity,
            Self::NoHiddenData | Self::EmptyPayload | Self::FrameCorrupted(_) => ErrorKind::Framing,
            Self::Config(_) => ErrorKind::Config,
            Self::Crypto(_) => ErrorKind::Crypto,
            Self::Io(_) => ErrorKind::Io,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_are_distinct_per_category() {
        let cases = [
            (StegoError::from(BmpError::UnsupportedBitDepth(8)), ErrorKind::Format),
            (
                StegoError::from(BmpError::PixelOutOfBounds { x: 9, y: 0, width: 1, height: 1 }),
                ErrorKind::Index,
            ),
            (StegoError::MessageTooLarge { needed: 10, available: 1 }, ErrorKind::Capacity),
            (StegoError::NoHiddenData, ErrorKind::Framing),
            (StegoError::FrameCorrupted("x"), ErrorKind::Framing),
            (StegoError::from(ConfigError::MissingPassword), ErrorKind::Config),
            (StegoError::from(CryptoError::BadPadding), ErrorKind::Crypto),
        ];
        for (err, kind) in cases {
            assert_eq!(err.kind(), kind, "{err}");
        }
    }

    #[test]
    fn bitmap_io_maps_to_io() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        assert_eq!(StegoError::from(BmpError::Io(io)).kind(), ErrorKind::Io);
    }
}
