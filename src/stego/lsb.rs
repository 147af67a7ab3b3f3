// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Uniform LSB embedding: every pixel byte carries the same number of
//! low-order bits (1 for LSB1, 4 for LSB4), in buffer order.

use crate::bmp::BitmapImage;
use crate::stego::bits;
use crate::stego::error::StegoError;

/// Bytes of stream the cover can carry at `width` bits per pixel byte.
pub fn capacity(image: &BitmapImage, width: u32) -> usize {
    image.pixel_data().len() * width as usize / 8
}

/// Overwrite the low `width` bits of consecutive pixel bytes with `stream`.
///
/// Bytes past the end of the stream are left untouched.
pub fn embed(stream: &[u8], mut cover: BitmapImage, width: u32) -> Result<BitmapImage, StegoError> {
    let needed = stream.len() * (8 / width) as usize;
    let available = cover.pixel_data().len();
    if needed > available {
        return Err(StegoError::MessageTooLarge { needed, available });
    }

    let keep = !bits::low_mask(width);
    for (byte, chunk) in cover.pixel_data_mut().iter_mut().zip(bits::chunks(stream, width)) {
        *byte = (*byte & keep) | chunk;
    }
    Ok(cover)
}

/// Read back a length-prefixed stream.
pub fn extract(image: &BitmapImage, width: u32, has_trailer: bool) -> Result<Vec<u8>, StegoError> {
    let mask = bits::low_mask(width);
    let chunks = image.pixel_data().iter().map(|&b| b & mask);
    bits::collect(chunks, width, has_trailer, capacity(image, width))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grey(width: i32, height: i32, value: u8) -> BitmapImage {
        let mut img = BitmapImage::new(width, height).unwrap();
        img.pixel_data_mut().fill(value);
        img
    }

    #[test]
    fn lsb1_touches_only_bit_zero() {
        let stream = [0, 0, 0, 1, 0b1010_1010];
        let cover = grey(8, 8, 0x80);
        let stego = embed(&stream, cover.clone(), 1).unwrap();
        for (a, b) in cover.pixel_data().iter().zip(stego.pixel_data()) {
            assert_eq!(a & 0xFE, b & 0xFE);
        }
        // Bits of 0xAA start at byte 32.
        assert_eq!(&stego.pixel_data()[32..36], &[0x81, 0x80, 0x81, 0x80]);
        assert_eq!(extract(&stego, 1, false).unwrap(), stream);
    }

    #[test]
    fn lsb4_packs_two_bytes_per_nibble_pair() {
        let stream = [0, 0, 0, 2, 0x3C, 0xA5];
        let stego = embed(&stream, grey(4, 4, 0xFF), 4).unwrap();
        assert_eq!(&stego.pixel_data()[8..12], &[0xF3, 0xFC, 0xFA, 0xF5]);
        assert!(stego.pixel_data()[12..].iter().all(|&b| b == 0xFF));
        assert_eq!(extract(&stego, 4, false).unwrap(), stream);
    }

    #[test]
    fn capacity_counts_padding_bytes() {
        // 1 pixel wide: 3 bytes + 1 padding per row.
        let img = grey(1, 8, 0);
        assert_eq!(img.pixel_data().len(), 32);
        assert_eq!(capacity(&img, 1), 4);
        assert_eq!(capacity(&img, 4), 16);
    }

    #[test]
    fn oversize_stream_rejected() {
        let img = grey(1, 8, 0);
        let err = embed(&[1u8; 5], img, 1).unwrap_err();
        assert!(matches!(err, StegoError::MessageTooLarge { needed: 40, available: 32 }));
    }

    #[test]
    fn stream_at_exact_capacity_fits() {
        let img = grey(1, 8, 0);
        assert!(embed(&[1u8; 16], img, 4).is_ok());
    }

    #[test]
    fn clean_cover_has_no_hidden_data() {
        assert!(matches!(extract(&grey(8, 8, 0x10), 1, true), Err(StegoError::NoHiddenData)));
    }
}
