use std::sync::Arc;

use anyhow::Context;
use base64::Engine as _;

use crate::assets::store::PreparedImage;
use crate::foundation::error::{PlayerError, PlayerResult};

const PNG_MAGIC: &[u8] = &[0x89, b'P', b'N', b'G'];
const JPEG_MAGIC: &[u8] = &[0xFF, 0xD8, 0xFF];
const ID3_MAGIC: &[u8] = b"ID3";

/// Resource kind inferred from a payload's leading bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PayloadKind {
    /// PNG or JPEG raster image.
    Image,
    /// ID3-tagged compressed audio.
    Audio,
}

/// Classify an encoded payload by its magic prefix.
///
/// Returns `None` for anything that is neither a known raster image nor known audio.
pub fn sniff_payload(bytes: &[u8]) -> Option<PayloadKind> {
    if bytes.starts_with(PNG_MAGIC) || bytes.starts_with(JPEG_MAGIC) {
        Some(PayloadKind::Image)
    } else if bytes.starts_with(ID3_MAGIC) {
        Some(PayloadKind::Audio)
    } else {
        None
    }
}

/// Decode a standard-alphabet base64 string, tolerating surrounding whitespace.
pub fn decode_base64(s: &str) -> PlayerResult<Vec<u8>> {
    base64::engine::general_purpose::STANDARD
        .decode(s.trim())
        .map_err(|e| PlayerError::decode(format!("invalid base64 payload: {e}")))
}

/// Host image decoder seam.
///
/// Implementations run on worker threads; a decoder that never returns stalls the
/// prepare that spawned it until its timeout fires.
pub trait ImageDecoder: Send + Sync {
    /// Decode encoded bytes into premultiplied RGBA8.
    fn decode(&self, bytes: &[u8]) -> PlayerResult<PreparedImage>;
}

/// Default decoder backed by the `image` crate.
#[derive(Clone, Copy, Debug, Default)]
pub struct ImageCrateDecoder;

impl ImageDecoder for ImageCrateDecoder {
    fn decode(&self, bytes: &[u8]) -> PlayerResult<PreparedImage> {
        decode_image(bytes)
    }
}

/// Decode PNG/JPEG bytes into a premultiplied [`PreparedImage`].
pub fn decode_image(bytes: &[u8]) -> PlayerResult<PreparedImage> {
    let dyn_img = image::load_from_memory(bytes).context("decode image from memory")?;
    let rgba = dyn_img.to_rgba8();
    let (width, height) = rgba.dimensions();

    let mut rgba8_premul = rgba.into_raw();
    premultiply_rgba8_in_place(&mut rgba8_premul);

    Ok(PreparedImage {
        width,
        height,
        rgba8_premul: Arc::new(rgba8_premul),
    })
}

fn premultiply_rgba8_in_place(rgba: &mut [u8]) {
    for px in rgba.chunks_exact_mut(4) {
        let a = px[3] as u16;
        if a == 0 {
            px[0] = 0;
            px[1] = 0;
            px[2] = 0;
            continue;
        }
        px[0] = ((px[0] as u16 * a + 127) / 255) as u8;
        px[1] = ((px[1] as u16 * a + 127) / 255) as u8;
        px[2] = ((px[2] as u16 * a + 127) / 255) as u8;
    }
}

#[cfg(test)]
#[path = "../../tests/unit/assets/decode.rs"]
mod tests;
