use super::*;

#[test]
fn from_json_accepts_bare_and_tagged_assets() {
    let json = r#"{
        "canvas": { "width": 10, "height": 8 },
        "fps": 20,
        "frames": 3,
        "images": {
            "logo": "iVBORw0KGgo=",
            "bgm": { "kind": "audio", "data": "SUQz" },
            "pic": { "kind": "image", "data": "/9j/" }
        },
        "sprites": [
            {
                "image_key": "logo",
                "frames": [
                    { "alpha": 1.0, "layout": { "x": 0, "y": 0, "width": 4, "height": 4 } },
                    { "alpha": 0.5, "layout": { "x": 1, "y": 1, "width": 4, "height": 4 },
                      "transform": [1, 0, 0, 1, 2, 0] }
                ]
            }
        ]
    }"#;
    let desc = AnimationDesc::from_json_str(json).unwrap();
    assert_eq!(desc.frames, 3);
    assert!(matches!(desc.images["logo"], AssetSource::Encoded(_)));
    let AssetSource::Audio(audio) = &desc.images["bgm"] else {
        panic!("expected audio payload");
    };
    assert_eq!(audio.bytes(), b"ID3");
    assert!(matches!(desc.images["pic"], AssetSource::Image(_)));
    assert_eq!(desc.sprites[0].frames[1].transform, Some([1.0, 0.0, 0.0, 1.0, 2.0, 0.0]));
    assert!(desc.dynamic_elements.is_empty());
}

#[test]
fn non_base64_payload_is_kept_as_empty_encoded_entry() {
    let json = r#"{ "canvas": { "width": 1, "height": 1 }, "fps": 1, "frames": 1,
                    "images": {
                        "url": "https://cdn.example/img.png",
                        "tagged": { "kind": "image", "data": "%%%" },
                        "ok": "SUQz"
                    } }"#;
    let desc = AnimationDesc::from_json_str(json).unwrap();
    assert_eq!(desc.images.len(), 3);
    for key in ["url", "tagged"] {
        let AssetSource::Encoded(payload) = &desc.images[key] else {
            panic!("{key} should fall back to an encoded entry");
        };
        assert!(payload.bytes().is_empty());
    }
    assert!(matches!(&desc.images["ok"], AssetSource::Encoded(p) if p.bytes() == b"ID3"));
}

#[test]
fn from_json_rejects_empty_animation() {
    let empty = r#"{ "canvas": { "width": 1, "height": 1 }, "fps": 1, "frames": 0 }"#;
    assert!(matches!(
        AnimationDesc::from_json_str(empty),
        Err(PlayerError::Validation(_))
    ));
}

#[test]
fn dynamic_elements_are_host_injected() {
    let mut desc = AnimationDesc::new(Canvas::new(2, 2).unwrap(), 30, 1).unwrap();
    desc.set_dynamic_image("avatar", PreparedImage::solid(1, 1, [255; 4]));
    desc.set_dynamic_hidden("badge");
    assert!(matches!(
        desc.dynamic_elements["avatar"],
        DynamicOverlay::Image(_)
    ));
    assert_eq!(desc.dynamic_elements["badge"], DynamicOverlay::Hidden);
    assert!(desc.contains_frame(FrameIndex(0)));
    assert!(!desc.contains_frame(FrameIndex(1)));
}
