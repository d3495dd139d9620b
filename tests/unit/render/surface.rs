use super::*;

fn filled(w: u32, h: u32, px: [u8; 4]) -> Surface {
    let mut s = Surface::new(w, h);
    for chunk in s.data_mut().chunks_exact_mut(4) {
        chunk.copy_from_slice(&px);
    }
    s
}

#[test]
fn resize_same_size_still_clears() {
    let mut s = filled(2, 2, [9, 9, 9, 9]);
    s.resize(2, 2);
    assert!(s.is_transparent());
    s.resize(3, 1);
    assert_eq!(s.data().len(), 12);
    assert!(s.is_transparent());
}

#[test]
fn blit_clips_to_overlap() {
    let src = filled(3, 3, [1, 2, 3, 4]);
    let mut dst = Surface::new(2, 4);
    dst.blit(&src);
    assert_eq!(dst.pixel(1, 2), Some([1, 2, 3, 4]));
    assert_eq!(dst.pixel(0, 3), Some([0, 0, 0, 0]));
}

#[test]
fn snapshot_round_trips_through_blit() {
    let mut src = Surface::new(2, 1);
    src.data_mut()[4..8].copy_from_slice(&[10, 20, 30, 40]);
    let snap = src.snapshot();
    assert_eq!((snap.width(), snap.height()), (2, 1));

    src.clear();
    let mut dst = Surface::new(2, 1);
    dst.blit_snapshot(&snap);
    assert_eq!(dst.pixel(1, 0), Some([10, 20, 30, 40]));
    assert!(src.is_transparent());
}
