use std::time::Duration;

use super::*;
use crate::assets::store::PreparedImage;
use crate::foundation::core::Canvas;
use crate::scene::model::{AssetSource, Payload};

struct SleepyDecoder(Duration);

impl ImageDecoder for SleepyDecoder {
    fn decode(&self, _bytes: &[u8]) -> PlayerResult<PreparedImage> {
        std::thread::sleep(self.0);
        Ok(PreparedImage::solid(1, 1, [255; 4]))
    }
}

fn anim_with_image() -> AnimationDesc {
    let mut anim = AnimationDesc::new(Canvas::new(2, 2).unwrap(), 30, 4).unwrap();
    anim.insert_asset("img", AssetSource::Image(Payload::new(b"x".to_vec())));
    anim
}

#[test]
fn draw_before_prepare_is_rejected() {
    let mut r = Renderer::new(2, 2, RendererOpts::default()).unwrap();
    assert!(matches!(
        r.draw_frame(FrameIndex(0)),
        Err(PlayerError::Validation(_))
    ));
}

#[test]
fn draw_while_pending_is_rejected_then_allowed() {
    let mut r = Renderer::builder(2, 2)
        .image_decoder(Arc::new(SleepyDecoder(Duration::from_millis(50))))
        .build()
        .unwrap();
    let ticket = r.begin_prepare(anim_with_image()).unwrap();
    assert!(!r.is_ready());
    assert!(r.draw_frame(FrameIndex(0)).is_err());

    let report = r.finish_prepare(ticket).unwrap();
    assert_eq!(report.decoded, 1);
    assert!(r.is_ready());
    assert_eq!(r.draw_frame(FrameIndex(0)).unwrap(), DrawOutcome::Composited);
}

#[test]
fn poll_reports_progress_without_blocking() {
    let mut r = Renderer::builder(2, 2)
        .image_decoder(Arc::new(SleepyDecoder(Duration::from_millis(100))))
        .build()
        .unwrap();
    let ticket = r.begin_prepare(anim_with_image()).unwrap();
    assert_eq!(r.poll_prepare(ticket).unwrap(), None);

    let mut report = None;
    for _ in 0..200 {
        if let Some(done) = r.poll_prepare(ticket).unwrap() {
            report = Some(done);
            break;
        }
        std::thread::sleep(Duration::from_millis(10));
    }
    assert_eq!(report.unwrap().images, 1);
    // A finished ticket keeps answering with the same report.
    assert_eq!(r.finish_prepare(ticket).unwrap().images, 1);
}

#[test]
fn older_ticket_is_superseded() {
    let mut r = Renderer::new(2, 2, RendererOpts::default()).unwrap();
    let first = r
        .begin_prepare(AnimationDesc::new(Canvas::new(2, 2).unwrap(), 30, 1).unwrap())
        .unwrap();
    let second = r
        .begin_prepare(AnimationDesc::new(Canvas::new(2, 2).unwrap(), 30, 1).unwrap())
        .unwrap();
    assert_eq!(second.generation(), first.generation() + 1);
    assert!(matches!(
        r.finish_prepare(first),
        Err(PlayerError::Superseded {
            generation: 1,
            current: 2
        })
    ));
    assert!(r.finish_prepare(second).is_ok());
}

#[test]
fn out_of_range_frame_is_rejected() {
    let mut r = Renderer::new(2, 2, RendererOpts::default()).unwrap();
    r.prepare(AnimationDesc::new(Canvas::new(2, 2).unwrap(), 30, 3).unwrap())
        .unwrap();
    assert!(r.draw_frame(FrameIndex(2)).is_ok());
    assert!(matches!(
        r.draw_frame(FrameIndex(3)),
        Err(PlayerError::Validation(_))
    ));
}

#[test]
fn failed_prepare_refuses_further_waits() {
    let mut r = Renderer::builder(2, 2)
        .opts(RendererOpts {
            decode_timeout_ms: 10,
            ..RendererOpts::default()
        })
        .image_decoder(Arc::new(SleepyDecoder(Duration::from_millis(300))))
        .build()
        .unwrap();
    let ticket = r.begin_prepare(anim_with_image()).unwrap();
    assert!(matches!(
        r.finish_prepare(ticket),
        Err(PlayerError::DecodeStall { .. })
    ));
    assert!(matches!(
        r.finish_prepare(ticket),
        Err(PlayerError::Validation(_))
    ));
    assert!(r.draw_frame(FrameIndex(0)).is_err());
}

#[test]
fn clear_and_resize_reset_the_target() {
    let mut r = Renderer::builder(2, 2)
        .compositor(
            |s: &mut Surface,
             _: &ImageCache,
             _: &DynamicOverlays,
             _: &AnimationDesc,
             _: FrameIndex|
             -> PlayerResult<()> {
                s.data_mut().fill(255);
                Ok(())
            },
        )
        .build()
        .unwrap();
    r.prepare(AnimationDesc::new(Canvas::new(2, 2).unwrap(), 30, 1).unwrap())
        .unwrap();
    r.draw_frame(FrameIndex(0)).unwrap();
    assert!(!r.target().is_transparent());
    r.clear();
    assert!(r.target().is_transparent());

    r.resize_target(3, 1);
    r.draw_frame(FrameIndex(0)).unwrap();
    assert_eq!(r.target().size(), Canvas { width: 3, height: 1 });
    assert_eq!(r.target().pixel(2, 0), Some([255; 4]));
}
