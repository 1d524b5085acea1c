//! Frames: a snapshot scaled and placed for display

use image::imageops::FilterType;
use image::RgbaImage;
use ssm_core::{Error, ImageKey, Result, RotationState, ZoomFactor};

/// Window title for a rotation state
pub fn window_title(state: &RotationState) -> String {
    format!("Secure Share Model - {}", state)
}

/// One displayable image
///
/// At zoom `z` the snapshot is conceptually stretched to `canvas × z` and
/// centered, so it overflows the canvas once zoomed in. Only the part that
/// lands on the canvas is kept in `image`.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    /// The visible part of the scaled snapshot
    pub image: RgbaImage,
    /// Top-left corner of `image` on the canvas
    pub offset: (i64, i64),
    /// Size of the whole snapshot at this zoom
    pub scaled: (u32, u32),
    /// Top-left corner of the whole scaled snapshot; negative once zoomed in
    pub scaled_offset: (i64, i64),
    pub key: ImageKey,
    pub state: RotationState,
    pub zoom: ZoomFactor,
}

impl Frame {
    /// Decode `bytes` and scale them to fill the canvas at `zoom`
    ///
    /// The source region that maps onto the canvas is cropped first and only
    /// that region is resampled, so the work stays canvas-sized at any zoom.
    pub fn compose(
        bytes: &[u8],
        key: ImageKey,
        state: RotationState,
        zoom: ZoomFactor,
        canvas: (u32, u32),
    ) -> Result<Self> {
        let decoded = image::load_from_memory(bytes)
            .map_err(|e| Error::Decode(format!("cannot decode {}: {}", key, e)))?;

        let scaled = (
            zoom.scale(canvas.0).max(1),
            zoom.scale(canvas.1).max(1),
        );
        let scaled_offset = (
            centered(canvas.0, scaled.0),
            centered(canvas.1, scaled.1),
        );

        let (x, width) = visible_span(decoded.width(), canvas.0, scaled.0);
        let (y, height) = visible_span(decoded.height(), canvas.1, scaled.1);
        let image = decoded
            .crop_imm(x, y, width, height)
            .resize_exact(
                scaled.0.min(canvas.0).max(1),
                scaled.1.min(canvas.1).max(1),
                FilterType::Lanczos3,
            )
            .to_rgba8();

        Ok(Self {
            image,
            offset: (scaled_offset.0.max(0), scaled_offset.1.max(0)),
            scaled,
            scaled_offset,
            key,
            state,
            zoom,
        })
    }

    pub fn title(&self) -> String {
        window_title(&self.state)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Floor of half the difference, so odd leftovers go to the far side
fn centered(canvas: u32, length: u32) -> i64 {
    (i64::from(canvas) - i64::from(length)).div_euclid(2)
}

/// Start and length of the source pixels that end up on the canvas
///
/// `source` pixels are stretched to `scaled` and the middle `canvas` of
/// those stay visible.
fn visible_span(source: u32, canvas: u32, scaled: u32) -> (u32, u32) {
    if scaled <= canvas || source == 0 {
        return (0, source);
    }

    let (source, canvas, scaled) = (u64::from(source), u64::from(canvas), u64::from(scaled));
    let hidden = (scaled - canvas) / 2;
    let start = (hidden * source / scaled).min(source - 1);
    let length = (canvas * source).div_ceil(scaled).clamp(1, source - start);
    (start as u32, length as u32)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, ImageFormat, Rgb, RgbImage};
    use std::io::Cursor;

    fn png(width: u32, height: u32) -> Vec<u8> {
        let image = RgbImage::from_pixel(width, height, Rgb([10, 200, 30]));
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(image)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();
        bytes
    }

    fn compose(zoom: ZoomFactor) -> Frame {
        let state = RotationState::from_degrees(0, 45, 315).unwrap();
        Frame::compose(&png(30, 20), ImageKey::from_state(&state), state, zoom, (120, 80)).unwrap()
    }

    #[test]
    fn test_original_size_fills_canvas() {
        let frame = compose(ZoomFactor::new());
        assert_eq!(frame.dimensions(), (120, 80));
        assert_eq!(frame.offset, (0, 0));
        assert_eq!(frame.title(), "Secure Share Model - X:0 / Y:45 / Z:315");
    }

    #[test]
    fn test_zoomed_frame_is_centered() {
        let mut zoom = ZoomFactor::new();
        zoom.zoom_in();
        zoom.zoom_in();
        let frame = compose(zoom);

        assert_eq!(frame.scaled, (144, 96));
        assert_eq!(frame.scaled_offset, (-12, -8));
        assert_eq!(frame.dimensions(), (120, 80));
        assert_eq!(frame.offset, (0, 0));
    }

    #[test]
    fn test_deep_zoom_stays_canvas_sized() {
        // Red border around a green middle
        let source = RgbImage::from_fn(30, 20, |x, y| {
            if (10..20).contains(&x) && (6..14).contains(&y) {
                Rgb([0, 255, 0])
            } else {
                Rgb([255, 0, 0])
            }
        });
        let mut bytes = Vec::new();
        DynamicImage::ImageRgb8(source)
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .unwrap();

        let mut zoom = ZoomFactor::new();
        for _ in 0..1000 {
            zoom.zoom_in();
        }
        let state = RotationState::origin();
        let frame =
            Frame::compose(&bytes, ImageKey::from_state(&state), state, zoom, (120, 80)).unwrap();

        assert_eq!(frame.scaled, (12120, 8080));
        assert_eq!(frame.dimensions(), (120, 80));
        assert!(frame.image.pixels().all(|p| p.0 == [0, 255, 0, 255]));
    }

    #[test]
    fn test_visible_span() {
        assert_eq!(visible_span(30, 120, 120), (0, 30));
        assert_eq!(visible_span(30, 120, 144), (2, 25));
        assert_eq!(visible_span(30, 120, 12120), (14, 1));
    }

    #[test]
    fn test_odd_overflow_floors() {
        assert_eq!(centered(120, 133), -7);
        assert_eq!(centered(120, 100), 10);
    }

    #[test]
    fn test_garbage_is_decode_error() {
        let state = RotationState::origin();
        let err = Frame::compose(
            b"not a png",
            ImageKey::from_state(&state),
            state,
            ZoomFactor::new(),
            (120, 80),
        )
        .unwrap_err();
        assert!(matches!(err, Error::Decode(_)));
    }
}
