use std::sync::Arc;

use crate::foundation::core::Canvas;

/// Premultiplied RGBA8 raster target, row-major and tightly packed.
///
/// Used both for the visible output and the offscreen scratch target.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Transparent surface of the given size. Zero-sized surfaces are allowed.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            data: vec![0; byte_len(width, height)],
        }
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current dimensions.
    pub fn size(&self) -> Canvas {
        Canvas {
            width: self.width,
            height: self.height,
        }
    }

    /// Raw pixel bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Mutable raw pixel bytes, for compositors.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Read one pixel, `None` when out of bounds.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y as usize * self.width as usize + x as usize) * 4;
        Some([
            self.data[i],
            self.data[i + 1],
            self.data[i + 2],
            self.data[i + 3],
        ])
    }

    /// Reset every pixel to transparent black.
    pub fn clear(&mut self) {
        self.data.fill(0);
    }

    /// Change dimensions. Always leaves the surface cleared, even if the size is unchanged.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width == self.width && height == self.height {
            self.clear();
            return;
        }
        self.width = width;
        self.height = height;
        self.data.clear();
        self.data.resize(byte_len(width, height), 0);
    }

    /// Return `true` if every pixel is fully transparent.
    pub fn is_transparent(&self) -> bool {
        self.data.iter().all(|&b| b == 0)
    }

    /// Copy `src` onto `self` at the origin, 1:1, clipped to the overlap.
    pub fn blit(&mut self, src: &Surface) {
        copy_rows(
            &mut self.data,
            self.width,
            self.height,
            &src.data,
            src.width,
            src.height,
        );
    }

    /// Copy a cached snapshot onto `self` at its native size, clipped to the overlap.
    pub fn blit_snapshot(&mut self, snap: &FrameSnapshot) {
        copy_rows(
            &mut self.data,
            self.width,
            self.height,
            &snap.data,
            snap.width,
            snap.height,
        );
    }

    /// Capture the current contents.
    pub fn snapshot(&self) -> FrameSnapshot {
        FrameSnapshot {
            width: self.width,
            height: self.height,
            data: Arc::from(self.data.as_slice()),
        }
    }
}

/// Immutable copy of a rasterized frame, kept in the frame cache.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FrameSnapshot {
    width: u32,
    height: u32,
    data: Arc<[u8]>,
}

impl FrameSnapshot {
    /// Native width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Native height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Premultiplied RGBA8 bytes.
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

fn byte_len(width: u32, height: u32) -> usize {
    (width as usize)
        .saturating_mul(height as usize)
        .saturating_mul(4)
}

fn copy_rows(dst: &mut [u8], dst_w: u32, dst_h: u32, src: &[u8], src_w: u32, src_h: u32) {
    let w = dst_w.min(src_w) as usize;
    let h = dst_h.min(src_h) as usize;
    if w == 0 || h == 0 {
        return;
    }
    let row = w * 4;
    let dst_stride = dst_w as usize * 4;
    let src_stride = src_w as usize * 4;
    for y in 0..h {
        let d = y * dst_stride;
        let s = y * src_stride;
        dst[d..d + row].copy_from_slice(&src[s..s + row]);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/surface.rs"]
mod tests;
