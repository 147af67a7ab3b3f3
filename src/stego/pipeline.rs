// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Embed/extract pipeline.
//!
//! Embedding:
//! 1. Frame the payload with its length and extension
//! 2. If encryption is configured, encrypt the frame and wrap it with the
//!    ciphertext length
//! 3. Write the resulting stream into the cover with the selected method
//!
//! Extraction runs the same steps in reverse. Without encryption the stream
//! ends at the extension terminator; with encryption it ends at the declared
//! ciphertext length.

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::bmp::BitmapImage;
use crate::stego::config::StegoConfig;
use crate::stego::crypto::CryptoEngine;
use crate::stego::error::StegoError;
use crate::stego::frame::{self, InnerFrame};

/// Hide `payload` (with its file `extension`, no leading dot) in `cover`.
///
/// # Errors
/// - [`StegoError::EmptyPayload`] if `payload` is empty.
/// - [`StegoError::Config`] if the encryption settings are invalid.
/// - [`StegoError::MessageTooLarge`] if the framed payload does not fit.
pub fn embed(
    payload: &[u8],
    extension: &str,
    cover: BitmapImage,
    config: &StegoConfig,
) -> Result<BitmapImage, StegoError> {
    let inner = frame::build_inner_frame(payload, extension)?;

    let stream = match &config.encryption {
        None => inner,
        Some(enc) => {
            let engine = CryptoEngine::new(enc)?;
            let ciphertext = engine.encrypt(&inner)?;
            frame::wrap_encrypted(&ciphertext)?
        }
    };

    debug!(
        method = %config.method,
        encrypted = config.encryption.is_some(),
        payload_len = payload.len(),
        stream_len = stream.len(),
        capacity = config.method.capacity(&cover),
        "embedding stream"
    );

    config.method.embed(&stream, cover)
}

/// Recover the hidden payload and its extension from `image`.
///
/// # Errors
/// - [`StegoError::NoHiddenData`] if the image does not carry a frame for
///   this method.
/// - [`StegoError::FrameCorrupted`] if a frame starts but is inconsistent.
/// - [`StegoError::Crypto`] if decryption fails.
pub fn extract(image: &BitmapImage, config: &StegoConfig) -> Result<InnerFrame, StegoError> {
    let encrypted = config.encryption.is_some();
    let stream = config.method.extract(image, !encrypted)?;
    debug!(method = %config.method, encrypted, stream_len = stream.len(), "extracted stream");

    match &config.encryption {
        None => frame::parse_inner_frame(&stream),
        Some(enc) => {
            let engine = CryptoEngine::new(enc)?;
            let ciphertext = frame::strip_encrypted_length(&stream)?;
            let inner = engine.decrypt(ciphertext)?;
            frame::parse_inner_frame(&inner)
        }
    }
}

/// Hide the file at `input` in the BMP at `cover` and write the result to
/// `output`.
///
/// Nothing is written unless embedding succeeds.
pub fn embed_file(
    input: impl AsRef<Path>,
    cover: impl AsRef<Path>,
    output: impl AsRef<Path>,
    config: &StegoConfig,
) -> Result<(), StegoError> {
    let input = input.as_ref();
    let payload = fs::read(input)?;
    let extension = file_extension(input);
    let image = BitmapImage::load(cover.as_ref())?;

    let stego = embed(&payload, &extension, image, config)?;
    stego.write(output.as_ref())?;

    debug!(output = %output.as_ref().display(), "wrote stego image");
    Ok(())
}

/// Extract the file hidden in the BMP at `stego` and write it to
/// `output_stem` plus the recovered extension.
///
/// Returns the path written. An extension containing a path separator is
/// rejected rather than written outside `output_stem`'s directory.
pub fn extract_file(
    stego: impl AsRef<Path>,
    output_stem: impl AsRef<Path>,
    config: &StegoConfig,
) -> Result<PathBuf, StegoError> {
    let image = BitmapImage::load(stego.as_ref())?;
    let hidden = extract(&image, config)?;
    if hidden.extension.contains(['/', '\\']) {
        return Err(StegoError::FrameCorrupted("extension contains a path separator"));
    }

    let mut name = OsString::from(output_stem.as_ref().as_os_str());
    name.push(hidden.file_suffix());
    let path = PathBuf::from(name);

    fs::write(&path, &hidden.payload)?;
    debug!(output = %path.display(), bytes = hidden.payload.len(), "wrote extracted file");
    Ok(path)
}

/// Text after the last dot of the file name, or empty if it has none.
///
/// Dotfiles keep their name as the extension (`.bashrc` gives `bashrc`).
fn file_extension(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.rsplit_once('.').map(|(_, ext)| ext.to_string()))
        .unwrap_or_default()
}
