//! Image payload handling for the posture monitor: base64 decoding, JPEG
//! re-encoding, baseline storage and landmark overlays.

use std::io::Cursor;
use std::path::{Path, PathBuf};

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use thiserror::Error;
use uuid::Uuid;

use crate::posture::landmarks::{LandmarkSet, KEY_LANDMARKS};

pub const JPEG_QUALITY: u8 = 85;

const DOT_RADIUS: i64 = 4;
const KEY_DOT_RADIUS: i64 = 6;
/// Normalised coordinates outside this range are not drawn.
const DRAWABLE_RANGE: std::ops::RangeInclusive<f64> = -1.0..=2.0;
const DOT_COLOR: Rgb<u8> = Rgb([0, 200, 0]);
const KEY_DOT_COLOR: Rgb<u8> = Rgb([230, 40, 40]);

#[derive(Debug, Error)]
pub enum ImagePayloadError {
    #[error("image is not valid base64: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("could not decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("could not store image: {0}")]
    Io(#[from] std::io::Error),
}

/// Decodes a base64 image, accepting an optional `data:image/...;base64,` prefix.
pub fn decode_base64_image(payload: &str) -> Result<Vec<u8>, ImagePayloadError> {
    let trimmed = payload.trim();
    let encoded = match trimmed.split_once(";base64,") {
        Some((prefix, data)) if prefix.starts_with("data:") => data,
        _ => trimmed,
    };
    Ok(STANDARD.decode(encoded.trim())?)
}

pub fn load(bytes: &[u8]) -> Result<DynamicImage, ImagePayloadError> {
    Ok(image::load_from_memory(bytes)?)
}

/// Re-encodes as RGB JPEG at [`JPEG_QUALITY`].
pub fn to_jpeg(img: &DynamicImage) -> Result<Vec<u8>, ImagePayloadError> {
    let rgb = DynamicImage::ImageRgb8(img.to_rgb8());
    let mut jpeg = Vec::new();
    rgb.write_to(&mut Cursor::new(&mut jpeg), ImageOutputFormat::Jpeg(JPEG_QUALITY))?;
    Ok(jpeg)
}

/// Shrinks the image to fit inside `max_side` x `max_side`, keeping the aspect ratio.
pub fn fit_within(img: DynamicImage, max_side: u32) -> DynamicImage {
    if img.width() <= max_side && img.height() <= max_side {
        img
    } else {
        img.thumbnail(max_side, max_side)
    }
}

pub fn to_data_url(jpeg: &[u8]) -> String {
    format!("data:image/jpeg;base64,{}", STANDARD.encode(jpeg))
}

/// Writes a baseline JPEG as `base_posture_<hex>.jpg` under `dir`.
pub async fn save_baseline(dir: &Path, jpeg: &[u8]) -> Result<PathBuf, ImagePayloadError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(format!("base_posture_{}.jpg", Uuid::new_v4().simple()));
    tokio::fs::write(&path, jpeg).await?;
    Ok(path)
}

/// Draws every landmark as a filled dot; key joints are larger and red.
pub fn draw_landmarks(img: &DynamicImage, landmarks: &LandmarkSet) -> RgbImage {
    let mut canvas = img.to_rgb8();
    let (w, h) = (canvas.width() as f64, canvas.height() as f64);

    for (idx, point) in landmarks.iter().enumerate() {
        let drawable = point.is_finite()
            && DRAWABLE_RANGE.contains(&point.x)
            && DRAWABLE_RANGE.contains(&point.y);
        if !drawable {
            continue;
        }
        let (radius, color) = if KEY_LANDMARKS.contains(&idx) {
            (KEY_DOT_RADIUS, KEY_DOT_COLOR)
        } else {
            (DOT_RADIUS, DOT_COLOR)
        };
        let cx = (point.x * w).round() as i64;
        let cy = (point.y * h).round() as i64;
        fill_circle(&mut canvas, cx, cy, radius, color);
    }
    canvas
}

fn fill_circle(canvas: &mut RgbImage, cx: i64, cy: i64, radius: i64, color: Rgb<u8>) {
    let (w, h) = (canvas.width() as i64, canvas.height() as i64);
    for dy in -radius..=radius {
        for dx in -radius..=radius {
            if dx * dx + dy * dy > radius * radius {
                continue;
            }
            let (x, y) = (cx + dx, cy + dy);
            if (0..w).contains(&x) && (0..h).contains(&y) {
                canvas.put_pixel(x as u32, y as u32, color);
            }
        }
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::posture::landmarks::fixtures::upright;

    #[test]
    fn test_decode_accepts_data_url_and_bare_base64() {
        let bare = STANDARD.encode(b"hello");
        assert_eq!(decode_base64_image(&bare).unwrap(), b"hello");
        let url = format!("data:image/png;base64,{bare}");
        assert_eq!(decode_base64_image(&url).unwrap(), b"hello");
    }

    #[test]
    fn test_decode_rejects_garbage() {
        assert!(matches!(
            decode_base64_image("not base64 at all!"),
            Err(ImagePayloadError::Base64(_))
        ));
    }

    #[test]
    fn test_load_rejects_non_image_bytes() {
        assert!(matches!(load(b"plain text"), Err(ImagePayloadError::Decode(_))));
    }

    #[test]
    fn test_jpeg_round_trip_keeps_dimensions() {
        let url = fixtures::grey_data_url(40, 30);
        let bytes = decode_base64_image(&url).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        let img = load(&bytes).unwrap();
        assert_eq!((img.width(), img.height()), (40, 30));
    }

    #[test]
    fn test_fit_within_shrinks_large_images_only() {
        let big = DynamicImage::ImageRgb8(RgbImage::new(2048, 1024));
        let fitted = fit_within(big, 1024);
        assert_eq!((fitted.width(), fitted.height()), (1024, 512));

        let small = DynamicImage::ImageRgb8(RgbImage::new(100, 50));
        let kept = fit_within(small, 1024);
        assert_eq!((kept.width(), kept.height()), (100, 50));
    }

    #[test]
    fn test_draw_landmarks_marks_key_joints() {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, Rgb([0, 0, 0])));
        let drawn = draw_landmarks(&img, &upright());
        // nose sits at (0.5, 0.25) → (32, 16)
        assert_eq!(*drawn.get_pixel(32, 16), KEY_DOT_COLOR);
        assert_eq!(*drawn.get_pixel(0, 63), Rgb([0, 0, 0]));
    }

    #[test]
    fn test_draw_landmarks_clips_points_outside_image() {
        use crate::posture::landmarks::Landmark;
        let img = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        let set = LandmarkSet::new(vec![Landmark::new(-1.0, 2.0, 0.0), Landmark::new(1.0, 1.0, 0.0)]);
        let drawn = draw_landmarks(&img, &set);
        assert_eq!(drawn.dimensions(), (10, 10));
    }

    #[test]
    fn test_draw_landmarks_skips_far_away_points() {
        use crate::posture::landmarks::Landmark;
        let img = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
        let set = LandmarkSet::new(vec![
            Landmark::new(1e300, 0.5, 0.0),
            Landmark::new(0.5, -1e300, 0.0),
            Landmark::new(f64::MAX, f64::MAX, 0.0),
        ]);
        let drawn = draw_landmarks(&img, &set);
        assert!(drawn.pixels().all(|p| *p == Rgb([0, 0, 0])));
    }

    #[tokio::test]
    async fn test_save_baseline_names_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = save_baseline(dir.path(), b"jpeg").await.unwrap();
        let name = path.file_name().unwrap().to_str().unwrap();
        assert!(name.starts_with("base_posture_"));
        assert!(name.ends_with(".jpg"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"jpeg");
    }
}
