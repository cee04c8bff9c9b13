//! Image preprocessing for the local OCR engine
//!
//! Product labels are usually phone photos: small, low contrast and a little
//! soft. The default preset corrects for that before recognition.

use crate::error::ScanError;
use image::{imageops::FilterType, DynamicImage, GenericImageView, GrayImage, Luma};
use imageproc::filter::filter3x3;

/// Assumed source DPI when scaling toward 300 DPI
const UPSCALE_FACTOR: f32 = 300.0 / 72.0;
/// Maximum dimension to avoid memory issues
const MAX_DIMENSION: u32 = 4000;
/// Images whose longest side already exceeds this are left at their size
const LARGE_ENOUGH: u32 = 1600;

/// Preprocessing preset names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum Preset {
    /// Hand the image to the engine untouched
    None,
    /// Grayscale only
    Minimal,
    /// Grayscale, upscale, contrast stretch, sharpen
    #[default]
    Default,
}

impl Preset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::None => "none",
            Self::Minimal => "minimal",
            Self::Default => "default",
        }
    }

    pub fn apply(&self, image: DynamicImage) -> Result<DynamicImage, ScanError> {
        match self {
            Self::None => Ok(image),
            Self::Minimal => Ok(DynamicImage::ImageLuma8(image.to_luma8())),
            Self::Default => {
                let gray = DynamicImage::ImageLuma8(image.to_luma8());
                let resized = upscale(gray)?;
                let stretched = stretch_contrast(resized.to_luma8());
                Ok(DynamicImage::ImageLuma8(sharpen(&stretched)))
            }
        }
    }
}

/// Scale small photos up toward 300 DPI, never past `MAX_DIMENSION`
fn upscale(image: DynamicImage) -> Result<DynamicImage, ScanError> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(ScanError::RecognitionFailure(
            "Image has zero width or height".to_string(),
        ));
    }

    let longest = width.max(height);
    if longest >= LARGE_ENOUGH {
        return Ok(image);
    }

    let scale = UPSCALE_FACTOR.min(MAX_DIMENSION as f32 / longest as f32);
    let new_width = (width as f32 * scale) as u32;
    let new_height = (height as f32 * scale) as u32;

    Ok(image.resize(new_width, new_height, FilterType::Lanczos3))
}

/// Map the darkest pixel to 0 and the brightest to 255
fn stretch_contrast(gray: GrayImage) -> GrayImage {
    let (lo, hi) = gray
        .pixels()
        .fold((u8::MAX, u8::MIN), |(lo, hi), p| (lo.min(p.0[0]), hi.max(p.0[0])));

    if hi <= lo {
        return gray;
    }

    let range = (hi - lo) as f32;
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let v = gray.get_pixel(x, y).0[0];
        Luma([((v - lo) as f32 / range * 255.0).round() as u8])
    })
}

fn sharpen(gray: &GrayImage) -> GrayImage {
    let kernel: [f32; 9] = [0.0, -1.0, 0.0, -1.0, 5.0, -1.0, 0.0, -1.0, 0.0];
    filter3x3(gray, &kernel)
}
