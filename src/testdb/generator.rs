//! Mock data generator for creating realistic test files
//!
//! This module generates mock file content that mimics real image files
//! with proper headers, so the native encoder's format check sees what it
//! would see on a device.
//!
//! Note: Content sizes are kept small. The headers are realistic enough for
//! format detection without needing megabytes of actual pixel data.

use std::collections::hash_map::DefaultHasher;
use std::fs;
use std::hash::{Hash, Hasher};
use std::io;
use std::path::{Path, PathBuf};

/// Default content size for JPEG test files
pub const TEST_JPEG_SIZE: usize = 2 * 1024;

/// Default content size for PNG test files
pub const TEST_PNG_SIZE: usize = 1024;

/// Mock data generator for creating realistic file content
pub struct MockDataGenerator;

impl MockDataGenerator {
    // =========================================================================
    // JPEG GENERATION
    // =========================================================================

    /// Generate a minimal JPEG header
    pub fn generate_jpeg_header(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        Self::push_jfif_header(&mut data);

        while data.len() < size.saturating_sub(2) {
            data.push(0x00);
        }

        // JPEG EOI (End of Image) marker
        data.extend_from_slice(&[0xFF, 0xD9]);
        data
    }

    /// Generate JPEG with deterministic content based on seed
    pub fn generate_jpeg_with_seed(size: usize, seed: u64) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);
        Self::push_jfif_header(&mut data);
        Self::fill_seeded(&mut data, size.saturating_sub(2), seed);

        // JPEG EOI marker
        data.extend_from_slice(&[0xFF, 0xD9]);
        data.truncate(size);
        data
    }

    fn push_jfif_header(data: &mut Vec<u8>) {
        // SOI (Start of Image) marker
        data.extend_from_slice(&[0xFF, 0xD8]);

        // APP0 marker (JFIF)
        data.extend_from_slice(&[0xFF, 0xE0]);
        data.extend_from_slice(&[0x00, 0x10]); // Length
        data.extend_from_slice(b"JFIF\0");
        data.extend_from_slice(&[0x01, 0x01]); // Version 1.1
        data.extend_from_slice(&[0x00]); // Aspect ratio units
        data.extend_from_slice(&[0x00, 0x01]); // X density
        data.extend_from_slice(&[0x00, 0x01]); // Y density
        data.extend_from_slice(&[0x00, 0x00]); // Thumbnail size
    }

    // =========================================================================
    // PNG GENERATION
    // =========================================================================

    /// Generate a minimal PNG header
    pub fn generate_png_header(size: usize) -> Vec<u8> {
        let mut data = Vec::with_capacity(size);

        // PNG signature
        data.extend_from_slice(&[0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A]);

        // IHDR chunk
        let ihdr_data: [u8; 13] = [
            0x00, 0x00, 0x00, 0x64, // Width: 100
            0x00, 0x00, 0x00, 0x64, // Height: 100
            0x08, // Bit depth: 8
            0x02, // Color type: RGB
            0x00, // Compression
            0x00, // Filter
            0x00, // Interlace
        ];
        data.extend_from_slice(&13u32.to_be_bytes());
        data.extend_from_slice(b"IHDR");
        data.extend_from_slice(&ihdr_data);
        // CRC placeholder
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);

        while data.len() < size.saturating_sub(12) {
            data.push(0x00);
        }

        // IEND chunk
        data.extend_from_slice(&[0x00, 0x00, 0x00, 0x00]);
        data.extend_from_slice(b"IEND");
        data.extend_from_slice(&[0xAE, 0x42, 0x60, 0x82]);

        data.truncate(size);
        data
    }

    /// Generate PNG with seed
    pub fn generate_png_with_seed(size: usize, seed: u64) -> Vec<u8> {
        let mut data = Self::generate_png_header(size.min(50));
        Self::fill_seeded(&mut data, size, seed);
        data.truncate(size);
        data
    }

    // =========================================================================
    // UTILITY FUNCTIONS
    // =========================================================================

    /// Append deterministic pseudo-random bytes until `data` is `len` long
    fn fill_seeded(data: &mut Vec<u8>, len: usize, seed: u64) {
        let mut hasher = DefaultHasher::new();
        seed.hash(&mut hasher);
        let mut current = hasher.finish();

        while data.len() < len {
            current = current.wrapping_mul(6364136223846793005).wrapping_add(1);
            data.push((current >> 33) as u8);
        }
    }

    /// Generate content for a file based on extension
    pub fn generate_for_extension_with_seed(extension: &str, size: usize, seed: u64) -> Vec<u8> {
        match extension.to_lowercase().as_str() {
            "jpg" | "jpeg" => Self::generate_jpeg_with_seed(size, seed),
            "png" => Self::generate_png_with_seed(size, seed),
            _ => {
                // Not an image the encoder recognizes
                let mut data = b"plain text, not a picture\n".to_vec();
                Self::fill_seeded(&mut data, size, seed);
                data.truncate(size);
                data
            }
        }
    }

    /// Generate a photo library batch
    ///
    /// 80% JPEG, 20% PNG, named like a phone camera roll.
    pub fn generate_photo_library(total_files: usize) -> Vec<(String, Vec<u8>)> {
        (0..total_files)
            .map(|i| {
                let (ext, size) = match i % 5 {
                    0..=3 => ("JPG", TEST_JPEG_SIZE),
                    _ => ("PNG", TEST_PNG_SIZE),
                };
                let filename = format!("IMG_{:04}.{}", i, ext);
                let content = Self::generate_for_extension_with_seed(ext, size, i as u64);
                (filename, content)
            })
            .collect()
    }

    /// Write a generated photo library into `dir`
    ///
    /// Returns the written paths in generation order.
    pub fn write_library(dir: &Path, total_files: usize) -> io::Result<Vec<PathBuf>> {
        fs::create_dir_all(dir)?;
        Self::generate_photo_library(total_files)
            .into_iter()
            .map(|(name, content)| {
                let path = dir.join(name);
                fs::write(&path, content)?;
                Ok(path)
            })
            .collect()
    }
}
