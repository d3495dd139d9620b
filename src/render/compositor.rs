use crate::assets::store::{ImageCache, PreparedImage};
use crate::foundation::core::{Affine, FrameIndex, Point, Rect};
use crate::foundation::error::PlayerResult;
use crate::render::composite::over;
use crate::render::surface::Surface;
use crate::scene::model::AnimationDesc;
use crate::scene::overlay::{DynamicOverlay, DynamicOverlays};

/// Paints one frame of an animation onto a surface.
///
/// The renderer hands over a freshly cleared offscreen surface sized to the visible
/// output. Implementations must paint synchronously and completely before returning.
pub trait Compositor {
    /// Paint `frame` of `anim` onto `surface`.
    fn render(
        &mut self,
        surface: &mut Surface,
        images: &ImageCache,
        overlays: &DynamicOverlays,
        anim: &AnimationDesc,
        frame: FrameIndex,
    ) -> PlayerResult<()>;
}

impl<F> Compositor for F
where
    F: FnMut(
        &mut Surface,
        &ImageCache,
        &DynamicOverlays,
        &AnimationDesc,
        FrameIndex,
    ) -> PlayerResult<()>,
{
    fn render(
        &mut self,
        surface: &mut Surface,
        images: &ImageCache,
        overlays: &DynamicOverlays,
        anim: &AnimationDesc,
        frame: FrameIndex,
    ) -> PlayerResult<()> {
        self(surface, images, overlays, anim, frame)
    }
}

/// Built-in compositor for [`AnimationDesc::sprites`].
///
/// Sprites are painted in order with nearest-neighbour sampling and premultiplied
/// source-over. Design-space geometry is scaled to the surface size.
#[derive(Clone, Copy, Debug, Default)]
pub struct SpriteCompositor;

impl Compositor for SpriteCompositor {
    fn render(
        &mut self,
        surface: &mut Surface,
        images: &ImageCache,
        overlays: &DynamicOverlays,
        anim: &AnimationDesc,
        frame: FrameIndex,
    ) -> PlayerResult<()> {
        let to_surface = Affine::scale_non_uniform(
            f64::from(surface.width()) / f64::from(anim.canvas.width),
            f64::from(surface.height()) / f64::from(anim.canvas.height),
        );

        for sprite in &anim.sprites {
            let Some(sf) = usize::try_from(frame.0)
                .ok()
                .and_then(|i| sprite.frames.get(i))
            else {
                continue;
            };
            if sf.alpha <= 0.0 || sf.layout.width <= 0.0 || sf.layout.height <= 0.0 {
                continue;
            }

            let image = match overlays.get(&sprite.image_key) {
                Some(DynamicOverlay::Hidden) => continue,
                Some(DynamicOverlay::Image(img)) => img,
                None => match images.get(&sprite.image_key) {
                    Some(img) => img,
                    None => {
                        tracing::trace!(key = %sprite.image_key, "sprite image missing, skipped");
                        continue;
                    }
                },
            };
            if image.width == 0 || image.height == 0 {
                continue;
            }

            let transform = sf.transform.map(Affine::new).unwrap_or(Affine::IDENTITY);
            let to_layout = Affine::translate((sf.layout.x, sf.layout.y))
                * Affine::scale_non_uniform(
                    sf.layout.width / f64::from(image.width),
                    sf.layout.height / f64::from(image.height),
                );
            draw_image(
                surface,
                image,
                to_surface * transform * to_layout,
                sf.alpha as f32,
            );
        }
        Ok(())
    }
}

fn draw_image(surface: &mut Surface, image: &PreparedImage, xf: Affine, opacity: f32) {
    if xf.determinant().abs() < 1e-12 {
        return;
    }
    let inv = xf.inverse();
    let (iw, ih) = (f64::from(image.width), f64::from(image.height));
    let bbox = xf.transform_rect_bbox(Rect::new(0.0, 0.0, iw, ih));

    let (sw, sh) = (surface.width(), surface.height());
    let x0 = bbox.x0.floor().max(0.0) as u32;
    let y0 = bbox.y0.floor().max(0.0) as u32;
    let x1 = bbox.x1.ceil().min(f64::from(sw)) as u32;
    let y1 = bbox.y1.ceil().min(f64::from(sh)) as u32;

    let stride = sw as usize * 4;
    let data = surface.data_mut();
    for y in y0..y1 {
        for x in x0..x1 {
            let p = inv * Point::new(f64::from(x) + 0.5, f64::from(y) + 0.5);
            if p.x < 0.0 || p.y < 0.0 || p.x >= iw || p.y >= ih {
                continue;
            }
            let Some(src) = image.pixel(p.x as u32, p.y as u32) else {
                continue;
            };
            let i = y as usize * stride + x as usize * 4;
            let dst = [data[i], data[i + 1], data[i + 2], data[i + 3]];
            data[i..i + 4].copy_from_slice(&over(dst, src, opacity));
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/render/compositor.rs"]
mod tests;
