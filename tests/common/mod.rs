// Copyright (c) 2026 Christoph Gaffga
// SPDX-License-Identifier: GPL-3.0-only
// https://github.com/cgaffga/phasmcore

//! Shared fixtures for integration tests.

#![allow(dead_code)]

use rand_chacha::rand_core::{RngCore, SeedableRng};
use rand_chacha::ChaCha8Rng;
use stego_bmp::BitmapImage;
use tracing_subscriber::EnvFilter;

/// Route library `tracing` events to the test output (`RUST_LOG=debug`).
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Deterministic random pixel noise.
pub fn noise_cover(width: i32, height: i32, seed: u64) -> BitmapImage {
    let mut img = BitmapImage::new(width, height).unwrap();
    ChaCha8Rng::seed_from_u64(seed).fill_bytes(img.pixel_data_mut());
    img
}

/// Deterministic random payload bytes.
pub fn random_payload(len: usize, seed: u64) -> Vec<u8> {
    let mut buf = vec![0u8; len];
    ChaCha8Rng::seed_from_u64(seed).fill_bytes(&mut buf);
    buf
}
