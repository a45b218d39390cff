//! Image ingestion and the per-pixel color math shared by the scorers.
//!
//! Channel conventions mirror 8-bit OpenCV so thresholds carry over unchanged:
//! hue is in `[0, 180)`, saturation and value in `[0, 255]`, and LAB is scaled
//! to `L in [0, 255]` with `a`/`b` offset by 128.

use image::{GrayImage, Luma, Rgb, RgbImage};

use super::error::AnalysisError;

/// Decode an uploaded buffer into an RGB image.
pub fn decode(bytes: &[u8]) -> Result<RgbImage, AnalysisError> {
    let img = image::load_from_memory(bytes).map_err(|e| AnalysisError::Decode(e.to_string()))?;
    let rgb = img.to_rgb8();
    if rgb.width() == 0 || rgb.height() == 0 {
        return Err(AnalysisError::ZeroDimensions);
    }
    Ok(rgb)
}

/// JPEG bytes for a stored result image.
pub fn encode_jpeg(img: &RgbImage) -> Result<Vec<u8>, AnalysisError> {
    let mut buf = std::io::Cursor::new(Vec::new());
    img.write_to(&mut buf, image::ImageFormat::Jpeg)
        .map_err(|e| AnalysisError::Encode(e.to_string()))?;
    Ok(buf.into_inner())
}

fn saturate(v: f64) -> u8 {
    v.round().clamp(0.0, 255.0) as u8
}

/// ITU-R BT.601 luma.
pub fn gray_of(px: &Rgb<u8>) -> u8 {
    let [r, g, b] = px.0;
    saturate(0.299 * r as f64 + 0.587 * g as f64 + 0.114 * b as f64)
}

pub fn to_gray(img: &RgbImage) -> GrayImage {
    let mut out = GrayImage::new(img.width(), img.height());
    for (x, y, px) in img.enumerate_pixels() {
        out.put_pixel(x, y, Luma([gray_of(px)]));
    }
    out
}

/// `(h, s, v)` with `h` in `[0, 180)`.
pub fn hsv_of(px: &Rgb<u8>) -> (u8, u8, u8) {
    let [r, g, b] = px.0.map(|c| c as f64);
    let v = r.max(g).max(b);
    let min = r.min(g).min(b);
    let diff = v - min;
    let s = if v > 0.0 { 255.0 * diff / v } else { 0.0 };
    let mut h = if diff == 0.0 {
        0.0
    } else if v == r {
        60.0 * (g - b) / diff
    } else if v == g {
        120.0 + 60.0 * (b - r) / diff
    } else {
        240.0 + 60.0 * (r - g) / diff
    };
    if h < 0.0 {
        h += 360.0;
    }
    let h = (h / 2.0).round();
    let h = if h >= 180.0 { 0.0 } else { h };
    (h as u8, saturate(s), v as u8)
}

fn srgb_to_linear(c: u8) -> f64 {
    let c = c as f64 / 255.0;
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn lab_f(t: f64) -> f64 {
    if t > 0.008856 {
        t.cbrt()
    } else {
        7.787 * t + 16.0 / 116.0
    }
}

/// `(l, a, b)` in the 8-bit encoding.
pub fn lab_of(px: &Rgb<u8>) -> (u8, u8, u8) {
    let [r, g, b] = px.0.map(srgb_to_linear);

    // D65 white point
    let x = (0.412453 * r + 0.357580 * g + 0.180423 * b) / 0.950456;
    let y = 0.212671 * r + 0.715160 * g + 0.072169 * b;
    let z = (0.019334 * r + 0.119193 * g + 0.950227 * b) / 1.088754;

    let l = if y > 0.008856 { 116.0 * y.cbrt() - 16.0 } else { 903.3 * y };
    let (fx, fy, fz) = (lab_f(x), lab_f(y), lab_f(z));
    let a = 500.0 * (fx - fy) + 128.0;
    let bb = 200.0 * (fy - fz) + 128.0;

    (saturate(l * 255.0 / 100.0), saturate(a), saturate(bb))
}

/// Mean of the HSV value channel over the whole image.
pub fn brightness(img: &RgbImage) -> f64 {
    let values: Vec<f64> = img.pixels().map(|p| hsv_of(p).2 as f64).collect();
    super::stats::mean(&values)
}

fn reflect101(i: i64, n: i64) -> u32 {
    if n == 1 {
        return 0;
    }
    let mut i = i;
    if i < 0 {
        i = -i;
    }
    if i >= n {
        i = 2 * n - 2 - i;
    }
    i as u32
}

/// 3x3 four-neighbour Laplacian with reflect-101 borders, as `f64` samples.
pub fn laplacian(gray: &GrayImage) -> Vec<f64> {
    let (w, h) = (gray.width() as i64, gray.height() as i64);
    let at = |x: i64, y: i64| gray.get_pixel(reflect101(x, w), reflect101(y, h)).0[0] as f64;
    let mut out = Vec::with_capacity((w * h) as usize);
    for y in 0..h {
        for x in 0..w {
            out.push(at(x - 1, y) + at(x + 1, y) + at(x, y - 1) + at(x, y + 1) - 4.0 * at(x, y));
        }
    }
    out
}

/// Pixel rectangle in source coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Crop `img` to `rect`, clipped to the image bounds.
pub fn crop(img: &RgbImage, rect: Rect) -> Result<RgbImage, AnalysisError> {
    let x0 = rect.x.min(img.width());
    let y0 = rect.y.min(img.height());
    let x1 = rect.x.saturating_add(rect.width).min(img.width());
    let y1 = rect.y.saturating_add(rect.height).min(img.height());
    if x1 <= x0 || y1 <= y0 {
        return Err(AnalysisError::EmptyFaceRegion);
    }
    Ok(image::imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image())
}

/// Sub-rectangle given by fractional row and column bounds. May be empty.
pub fn fractional_region(img: &RgbImage, rows: (f64, f64), cols: (f64, f64)) -> RgbImage {
    let (w, h) = (img.width() as f64, img.height() as f64);
    let y0 = (h * rows.0) as u32;
    let y1 = (h * rows.1) as u32;
    let x0 = (w * cols.0) as u32;
    let x1 = (w * cols.1) as u32;
    if x1 <= x0 || y1 <= y0 {
        return RgbImage::new(0, 0);
    }
    image::imageops::crop_imm(img, x0, y0, x1 - x0, y1 - y0).to_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsv_matches_8bit_conventions() {
        assert_eq!(hsv_of(&Rgb([255, 0, 0])), (0, 255, 255));
        assert_eq!(hsv_of(&Rgb([0, 255, 0])), (60, 255, 255));
        assert_eq!(hsv_of(&Rgb([0, 0, 255])), (120, 255, 255));
        assert_eq!(hsv_of(&Rgb([128, 128, 128])), (0, 0, 128));
        assert_eq!(hsv_of(&Rgb([0, 0, 0])), (0, 0, 0));
    }

    #[test]
    fn lab_of_neutral_colors_has_centered_chroma() {
        let (l, a, b) = lab_of(&Rgb([255, 255, 255]));
        assert_eq!(l, 255);
        assert!((a as i32 - 128).abs() <= 1);
        assert!((b as i32 - 128).abs() <= 1);

        let (l, a, b) = lab_of(&Rgb([0, 0, 0]));
        assert_eq!((l, a, b), (0, 128, 128));
    }

    #[test]
    fn lab_of_red_is_strongly_positive_a() {
        let (_, a, _) = lab_of(&Rgb([255, 0, 0]));
        assert!(a > 200, "a = {a}");
    }

    #[test]
    fn gray_uses_bt601_weights() {
        assert_eq!(gray_of(&Rgb([255, 255, 255])), 255);
        assert_eq!(gray_of(&Rgb([255, 0, 0])), 76);
        assert_eq!(gray_of(&Rgb([0, 255, 0])), 150);
        assert_eq!(gray_of(&Rgb([0, 0, 255])), 29);
    }

    #[test]
    fn laplacian_of_flat_image_is_zero() {
        let gray = GrayImage::from_pixel(5, 4, Luma([90]));
        assert!(laplacian(&gray).iter().all(|v| *v == 0.0));
    }

    #[test]
    fn laplacian_handles_single_pixel() {
        let gray = GrayImage::from_pixel(1, 1, Luma([200]));
        assert_eq!(laplacian(&gray), vec![0.0]);
    }

    #[test]
    fn brightness_of_uniform_image() {
        let img = RgbImage::from_pixel(4, 4, Rgb([10, 140, 30]));
        assert_eq!(brightness(&img), 140.0);
    }

    #[test]
    fn crop_clips_to_bounds() {
        let img = RgbImage::new(10, 10);
        let out = crop(&img, Rect { x: 6, y: 6, width: 10, height: 10 }).unwrap();
        assert_eq!(out.dimensions(), (4, 4));
        assert!(crop(&img, Rect { x: 10, y: 0, width: 3, height: 3 }).is_err());
    }

    #[test]
    fn fractional_region_truncates_like_slicing() {
        let img = RgbImage::new(100, 20);
        let roi = fractional_region(&img, (0.55, 0.75), (0.25, 0.75));
        assert_eq!(roi.dimensions(), (50, 4));
    }

    #[test]
    fn jpeg_encoding_decodes_back() {
        let img = RgbImage::from_pixel(8, 6, Rgb([120, 90, 70]));
        let bytes = encode_jpeg(&img).unwrap();
        assert_eq!(&bytes[..2], &[0xFF, 0xD8]);
        assert_eq!(decode(&bytes).unwrap().dimensions(), (8, 6));
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(matches!(decode(b"not an image"), Err(AnalysisError::Decode(_))));
    }
}
