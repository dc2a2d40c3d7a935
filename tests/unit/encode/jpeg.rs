use super::*;

fn canvas(w: u32, h: u32) -> RgbImage {
    RgbImage::from_fn(w, h, |x, y| image::Rgb([(x * 7) as u8, (y * 5) as u8, 128]))
}

fn spec() -> PrintSpec {
    PrintSpec::preset("8.5x11").unwrap()
}

#[test]
fn jpeg_starts_with_soi_and_jfif() {
    let bytes = encode_jpeg(
        &canvas(32, 16),
        EncodeSettings {
            quality: 80,
            dpi: None,
        },
    )
    .unwrap();
    assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
    assert_eq!(&bytes[6..11], b"JFIF\0");
    assert_eq!(&bytes[bytes.len() - 2..], &[0xFF, 0xD9]);

    let decoded = image::load_from_memory(&bytes).unwrap();
    assert_eq!((decoded.width(), decoded.height()), (32, 16));
}

#[test]
fn print_pass_writes_the_dpi_tag() {
    let bytes = encode_jpeg(
        &canvas(16, 16),
        EncodeSettings {
            quality: 90,
            dpi: Some(200),
        },
    )
    .unwrap();
    // JFIF APP0: units byte then big-endian X/Y density.
    assert_eq!(bytes[13], 1);
    assert_eq!(&bytes[14..16], &200u16.to_be_bytes());
    assert_eq!(&bytes[16..18], &200u16.to_be_bytes());
}

#[test]
fn higher_quality_is_not_smaller() {
    let img = canvas(64, 64);
    let lo = encode_jpeg(&img, EncodeSettings { quality: 30, dpi: None }).unwrap();
    let hi = encode_jpeg(&img, EncodeSettings { quality: 95, dpi: None }).unwrap();
    assert!(hi.len() >= lo.len());
}

#[test]
fn encoding_is_deterministic() {
    let img = canvas(40, 30);
    let settings = EncodeSettings {
        quality: 90,
        dpi: Some(200),
    };
    assert_eq!(
        encode_jpeg(&img, settings).unwrap(),
        encode_jpeg(&img, settings).unwrap()
    );
}

#[test]
fn bad_quality_and_empty_canvas_are_encode_errors() {
    let err = encode_jpeg(&canvas(4, 4), EncodeSettings { quality: 0, dpi: None }).unwrap_err();
    assert_eq!(err.category(), "encode_error");
    let err = encode_jpeg(
        &canvas(4, 4),
        EncodeSettings {
            quality: 101,
            dpi: None,
        },
    )
    .unwrap_err();
    assert_eq!(err.category(), "encode_error");
    assert!(encode_jpeg(&RgbImage::new(0, 0), EncodeSettings { quality: 80, dpi: None }).is_err());
}

#[test]
fn downscale_caps_the_long_side() {
    let out = downscale_to_fit(&canvas(400, 100), 200);
    assert_eq!(out.dimensions(), (200, 50));
    let same = downscale_to_fit(&canvas(100, 60), 200);
    assert_eq!(same.dimensions(), (100, 60));
}

#[test]
fn artifact_metadata_follows_the_plan() {
    let spec = spec();
    let art = build_artifact(
        &canvas(20, 10),
        &ArtifactPlan {
            mode: RenderMode::Final,
            variant: Variant::Print,
            settings: EncodeSettings {
                quality: 90,
                dpi: Some(200),
            },
            disposition: Disposition::Attachment,
            spec: &spec,
        },
    )
    .unwrap();
    assert_eq!(art.format, ArtifactFormat::Jpeg);
    assert_eq!(art.mime_type(), "image/jpeg");
    assert_eq!((art.width, art.height), (20, 10));
    assert_eq!(art.dpi, Some(200));
    assert_eq!(art.file_name, "print-8.5x11.jpg");
    assert!(!art.is_empty());

    let mut h = Fnv1a64::new_default();
    h.write_bytes(&art.bytes);
    assert_eq!(art.fingerprint, h.finish());

    let json = serde_json::to_value(&art).unwrap();
    assert_eq!(json["variant"], "print");
    assert_eq!(json["disposition"], "attachment");
    assert!(json.get("bytes").is_none());
}

#[test]
fn preview_file_names() {
    let spec = PrintSpec::new(8.0, 10.0).unwrap();
    assert_eq!(file_name_for(Variant::Preview, &spec), "print-preview-8x10.jpg");
    assert_eq!(
        file_name_for(Variant::DisplayPreview, &spec),
        "print-preview-8x10.jpg"
    );
}
