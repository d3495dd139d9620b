#![allow(dead_code)]

use std::io::Cursor;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use base64::Engine as _;
use wavyte_player::{ImageCrateDecoder, ImageDecoder, PlayerResult, PreparedImage};

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

pub fn png_bytes(width: u32, height: u32, rgba: [u8; 4]) -> Vec<u8> {
    let data = rgba.repeat((width * height) as usize);
    let img = image::RgbaImage::from_raw(width, height, data).unwrap();
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

pub fn png_base64(rgba: [u8; 4]) -> String {
    base64::engine::general_purpose::STANDARD.encode(png_bytes(1, 1, rgba))
}

/// Smallest payload that sniffs as MPEG audio.
pub fn id3_bytes() -> Vec<u8> {
    let mut bytes = b"ID3".to_vec();
    bytes.extend_from_slice(&[4, 0, 0, 0, 0, 0, 0]);
    bytes
}

/// Real decoder that counts how often it runs.
#[derive(Default)]
pub struct CountingDecoder {
    calls: AtomicUsize,
}

impl CountingDecoder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl ImageDecoder for CountingDecoder {
    fn decode(&self, bytes: &[u8]) -> PlayerResult<PreparedImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        ImageCrateDecoder.decode(bytes)
    }
}
