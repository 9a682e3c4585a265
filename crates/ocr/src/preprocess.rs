use image::{DynamicImage, GrayImage, Luma, RgbImage};
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum PreprocessError {
    #[error("Invalid image: {0}")]
    Decode(#[from] image::ImageError),
    #[error("Invalid image: {width}x{height} has no pixels")]
    EmptyImage { width: u32, height: u32 },
    #[error("Invalid normalizer parameters: {0}")]
    InvalidParams(String),
}

/// Bilateral filter settings. Defaults match the values the poster scraper
/// was tuned with for photographed posters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizerParams {
    /// Neighborhood diameter in pixels.
    pub diameter: u32,
    /// Intensity difference at which neighbors stop contributing.
    pub sigma_color: f32,
    /// Spatial falloff of neighbor weights.
    pub sigma_space: f32,
}

impl Default for NormalizerParams {
    fn default() -> Self {
        Self { diameter: 11, sigma_color: 17.0, sigma_space: 17.0 }
    }
}

/// Largest neighborhood diameter accepted from configuration.
pub const MAX_DIAMETER: u32 = 255;

impl NormalizerParams {
    pub fn validate(&self) -> Result<(), PreprocessError> {
        if self.diameter == 0 {
            return Err(PreprocessError::InvalidParams("diameter must be at least 1".into()));
        }
        if self.diameter > MAX_DIAMETER {
            return Err(PreprocessError::InvalidParams(format!(
                "diameter must be at most {MAX_DIAMETER}, got {}",
                self.diameter
            )));
        }
        for (name, sigma) in [("sigma_color", self.sigma_color), ("sigma_space", self.sigma_space)] {
            if !sigma.is_finite() || sigma <= 0.0 {
                return Err(PreprocessError::InvalidParams(format!(
                    "{name} must be a positive number, got {sigma}"
                )));
            }
        }
        Ok(())
    }
}

/// Grayscale conversion followed by an edge-preserving bilateral filter.
///
/// The spatial kernel and the intensity weight table are computed once at
/// construction so the same normalizer can be reused across posters.
#[derive(Debug, Clone)]
pub struct ImageNormalizer {
    params: NormalizerParams,
    /// `(dx, dy, spatial_weight)` for every offset inside the disc.
    offsets: Vec<(i32, i32, f32)>,
    /// Weight indexed by absolute intensity difference.
    color_weights: [f32; 256],
}

impl ImageNormalizer {
    pub fn new(params: NormalizerParams) -> Result<Self, PreprocessError> {
        params.validate()?;

        let radius = (params.diameter / 2) as i32;
        let space_coeff = -0.5 / (params.sigma_space * params.sigma_space);
        let color_coeff = -0.5 / (params.sigma_color * params.sigma_color);

        let mut offsets = Vec::new();
        for dy in -radius..=radius {
            for dx in -radius..=radius {
                let dist_sq = (dx * dx + dy * dy) as f32;
                if dist_sq > (radius * radius) as f32 {
                    continue;
                }
                offsets.push((dx, dy, (dist_sq * space_coeff).exp()));
            }
        }

        let mut color_weights = [0.0f32; 256];
        for (diff, w) in color_weights.iter_mut().enumerate() {
            let d = diff as f32;
            *w = (d * d * color_coeff).exp();
        }

        Ok(Self { params, offsets, color_weights })
    }

    pub fn params(&self) -> &NormalizerParams {
        &self.params
    }

    /// Normalize an 8-bit RGB image into a grayscale image of the same size.
    pub fn normalize(&self, img: &RgbImage) -> Result<GrayImage, PreprocessError> {
        let (width, height) = img.dimensions();
        if width == 0 || height == 0 {
            return Err(PreprocessError::EmptyImage { width, height });
        }
        let gray = to_grayscale(img);
        let smoothed = self.bilateral(&gray);
        debug!(width, height, diameter = self.params.diameter, "normalized image");
        Ok(smoothed)
    }

    /// Like [`normalize`](Self::normalize), for images of any decoded color type.
    pub fn normalize_dynamic(&self, img: &DynamicImage) -> Result<GrayImage, PreprocessError> {
        if img.width() == 0 || img.height() == 0 {
            return Err(PreprocessError::EmptyImage { width: img.width(), height: img.height() });
        }
        self.normalize(&img.to_rgb8())
    }

    fn bilateral(&self, gray: &GrayImage) -> GrayImage {
        let (w, h) = (gray.width() as i64, gray.height() as i64);
        GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
            let center = gray.get_pixel(x, y)[0];
            let mut sum = 0.0f32;
            let mut weight_sum = 0.0f32;

            for &(dx, dy, spatial) in &self.offsets {
                let nx = x as i64 + dx as i64;
                let ny = y as i64 + dy as i64;
                if nx < 0 || ny < 0 || nx >= w || ny >= h {
                    continue;
                }
                let v = gray.get_pixel(nx as u32, ny as u32)[0];
                let weight = spatial * self.color_weights[center.abs_diff(v) as usize];
                sum += v as f32 * weight;
                weight_sum += weight;
            }

            // The center offset always contributes weight 1.0, so weight_sum > 0.
            Luma([(sum / weight_sum).round().clamp(0.0, 255.0) as u8])
        })
    }
}

/// ITU-R BT.601 luminance.
pub fn to_grayscale(rgb: &RgbImage) -> GrayImage {
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        Luma([luma.round().clamp(0.0, 255.0) as u8])
    })
}

/// Decode raw image bytes (PNG / JPEG / WEBP / ...) and reject empty images.
pub fn decode(data: &[u8]) -> Result<DynamicImage, PreprocessError> {
    let img = image::load_from_memory(data)?;
    ensure_not_empty(img)
}

/// Open and decode an image file.
pub fn load(path: &Path) -> Result<DynamicImage, PreprocessError> {
    let img = image::open(path)?;
    ensure_not_empty(img)
}

fn ensure_not_empty(img: DynamicImage) -> Result<DynamicImage, PreprocessError> {
    if img.width() == 0 || img.height() == 0 {
        return Err(PreprocessError::EmptyImage { width: img.width(), height: img.height() });
    }
    Ok(img)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ImageBuffer, Rgb, Rgba, RgbaImage};
    use std::io::Cursor;

    fn normalizer() -> ImageNormalizer {
        ImageNormalizer::new(NormalizerParams::default()).unwrap()
    }

    fn solid_rgb(width: u32, height: u32, value: u8) -> RgbImage {
        ImageBuffer::from_fn(width, height, |_, _| Rgb([value, value, value]))
    }

    #[test]
    fn grayscale_uses_bt601_weights() {
        let img: RgbImage = ImageBuffer::from_fn(5, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            2 => Rgb([0, 0, 255]),
            3 => Rgb([255, 255, 255]),
            _ => Rgb([0, 0, 0]),
        });
        let gray = to_grayscale(&img);
        let values: Vec<u8> = gray.pixels().map(|p| p[0]).collect();
        assert_eq!(values, vec![76, 150, 29, 255, 0]);
    }

    #[test]
    fn output_keeps_input_dimensions() {
        let out = normalizer().normalize(&solid_rgb(37, 19, 90)).unwrap();
        assert_eq!(out.dimensions(), (37, 19));
    }

    #[test]
    fn uniform_image_is_unchanged() {
        let out = normalizer().normalize(&solid_rgb(16, 16, 128)).unwrap();
        assert!(out.pixels().all(|p| p[0] == 128));
    }

    #[test]
    fn hard_edge_survives_smoothing() {
        let img: RgbImage = ImageBuffer::from_fn(20, 20, |x, _| {
            if x < 10 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) }
        });
        let out = normalizer().normalize(&img).unwrap();
        assert_eq!(out.get_pixel(9, 10)[0], 0);
        assert_eq!(out.get_pixel(10, 10)[0], 255);
    }

    #[test]
    fn speckle_is_pulled_towards_background() {
        let mut img = solid_rgb(21, 21, 120);
        img.put_pixel(10, 10, Rgb([110, 110, 110]));
        let out = normalizer().normalize(&img).unwrap();
        let center = out.get_pixel(10, 10)[0];
        assert!(center >= 115, "center was {center}");
    }

    #[test]
    fn diameter_one_is_identity() {
        let params = NormalizerParams { diameter: 1, ..NormalizerParams::default() };
        let n = ImageNormalizer::new(params).unwrap();
        let img: RgbImage = ImageBuffer::from_fn(8, 8, |x, y| {
            let v = ((x * 31 + y * 17) % 256) as u8;
            Rgb([v, v, v])
        });
        let out = n.normalize(&img).unwrap();
        assert_eq!(out, to_grayscale(&img));
    }

    #[test]
    fn empty_image_is_rejected() {
        let err = normalizer().normalize(&RgbImage::new(0, 4)).unwrap_err();
        assert!(matches!(err, PreprocessError::EmptyImage { width: 0, height: 4 }));
    }

    #[test]
    fn invalid_params_are_rejected() {
        let zero = NormalizerParams { diameter: 0, ..NormalizerParams::default() };
        assert!(ImageNormalizer::new(zero).is_err());
        let flat = NormalizerParams { sigma_color: 0.0, ..NormalizerParams::default() };
        assert!(ImageNormalizer::new(flat).is_err());
        let nan = NormalizerParams { sigma_space: f32::NAN, ..NormalizerParams::default() };
        assert!(ImageNormalizer::new(nan).is_err());
        let huge = NormalizerParams { diameter: 100_000, ..NormalizerParams::default() };
        assert!(matches!(ImageNormalizer::new(huge), Err(PreprocessError::InvalidParams(_))));
    }

    #[test]
    fn largest_diameter_is_accepted() {
        let widest = NormalizerParams { diameter: MAX_DIAMETER, ..NormalizerParams::default() };
        let out = ImageNormalizer::new(widest).unwrap().normalize(&solid_rgb(3, 3, 40)).unwrap();
        assert!(out.pixels().all(|p| p[0] == 40));
    }

    #[test]
    fn rgba_input_is_accepted() {
        let img: RgbaImage = ImageBuffer::from_fn(6, 3, |_, _| Rgba([10, 20, 30, 255]));
        let out = normalizer().normalize_dynamic(&DynamicImage::ImageRgba8(img)).unwrap();
        assert_eq!(out.dimensions(), (6, 3));
    }

    #[test]
    fn decode_png_bytes() {
        let mut png = Vec::new();
        DynamicImage::ImageRgb8(solid_rgb(4, 4, 200))
            .write_to(&mut Cursor::new(&mut png), image::ImageFormat::Png)
            .unwrap();
        let img = decode(&png).unwrap();
        assert_eq!((img.width(), img.height()), (4, 4));
    }

    #[test]
    fn decode_garbage_is_invalid_image() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, PreprocessError::Decode(_)));
        assert!(err.to_string().starts_with("Invalid image"));
    }
}
