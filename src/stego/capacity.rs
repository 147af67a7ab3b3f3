// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Payload capacity estimation.
//!
//! Computes the largest file that fits in a cover for a given method,
//! extension and encryption setting. The estimate is exact: a payload of
//! [`max_payload_len`] bytes embeds, one more byte does not.

use crate::bmp::BitmapImage;
use crate::stego::config::EncryptionConfig;
use crate::stego::crypto;
use crate::stego::frame::{self, LENGTH_PREFIX_LEN, MAX_FRAME_LEN};
use crate::stego::method::StegMethod;

/// Length of the embedded stream for a payload of `payload_len` bytes.
pub fn stream_len(
    payload_len: usize,
    extension_len: usize,
    encryption: Option<&EncryptionConfig>,
) -> usize {
    let inner = frame::inner_frame_len(payload_len, extension_len);
    match encryption {
        None => inner,
        Some(enc) => LENGTH_PREFIX_LEN + crypto::ciphertext_len(enc.algorithm, enc.mode, inner),
    }
}

/// Largest payload, in bytes, that `image` can carry with `method`.
///
/// Returns 0 when not even a one-byte payload fits.
pub fn max_payload_len(
    image: &BitmapImage,
    method: StegMethod,
    extension_len: usize,
    encryption: Option<&EncryptionConfig>,
) -> usize {
    let capacity = method.capacity(image);
    let framing = frame::inner_frame_len(0, extension_len);

    let max_inner = match encryption {
        None => capacity,
        Some(enc) if enc.mode.is_padded() => {
            // PKCS#7 always adds at least one byte, so the inner frame must
            // stay strictly below the largest whole number of blocks.
            let block = enc.algorithm.block_len();
            let room = capacity.saturating_sub(LENGTH_PREFIX_LEN);
            (room / block * block).saturating_sub(1)
        }
        Some(_) => capacity.saturating_sub(LENGTH_PREFIX_LEN),
    };

    max_inner.saturating_sub(framing).min(MAX_FRAME_LEN)
}
