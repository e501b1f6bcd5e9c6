//! Ticket code rendering.

use std::io::Cursor;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use image::{GrayImage, ImageFormat, Luma};
use qrcode::{Color, QrCode};

use crate::error::CodeGenError;

/// Renders a text payload into an image artifact.
///
/// Implementations are pure: no storage access, and the same payload always
/// yields the same bytes.
pub trait CodeGenerator: Send + Sync {
    /// Renders `payload` and returns the encoded image bytes.
    fn generate(&self, payload: &str) -> Result<Vec<u8>, CodeGenError>;

    /// Renders `payload` as a `data:` URL suitable for an `<img>` tag.
    fn generate_data_url(&self, payload: &str) -> Result<String, CodeGenError> {
        let bytes = self.generate(payload)?;
        Ok(format!("data:image/png;base64,{}", STANDARD.encode(bytes)))
    }
}

/// QR code generator producing greyscale PNGs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QrCodeGenerator {
    module_scale: u32,
    quiet_zone: u32,
}

impl QrCodeGenerator {
    pub const DEFAULT_MODULE_SCALE: u32 = 8;
    pub const MAX_MODULE_SCALE: u32 = 32;
    pub const QUIET_ZONE_MODULES: u32 = 4;

    pub fn new() -> Self {
        Self::with_module_scale(Self::DEFAULT_MODULE_SCALE)
    }

    /// Creates a generator drawing each module as a `scale`×`scale` square.
    /// The scale is clamped to `1..=MAX_MODULE_SCALE`.
    pub fn with_module_scale(scale: u32) -> Self {
        Self {
            module_scale: scale.clamp(1, Self::MAX_MODULE_SCALE),
            quiet_zone: Self::QUIET_ZONE_MODULES,
        }
    }

    pub fn module_scale(&self) -> u32 {
        self.module_scale
    }

    /// Pixel side of the rendered image for a code `modules` wide.
    fn side_length(&self, modules: u32) -> Result<u32, CodeGenError> {
        self.quiet_zone
            .checked_mul(2)
            .and_then(|margin| margin.checked_add(modules))
            .and_then(|width| width.checked_mul(self.module_scale))
            .ok_or_else(|| {
                CodeGenError::Encoding(format!(
                    "{modules} modules at scale {} exceed the image size limit",
                    self.module_scale
                ))
            })
    }
}

impl Default for QrCodeGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl CodeGenerator for QrCodeGenerator {
    fn generate(&self, payload: &str) -> Result<Vec<u8>, CodeGenError> {
        let code = QrCode::new(payload.as_bytes())
            .map_err(|e| CodeGenError::Encoding(e.to_string()))?;

        let modules = code.width() as u32;
        let scale = self.module_scale;
        let side = self.side_length(modules)?;
        let mut image = GrayImage::from_pixel(side, side, Luma([255]));

        for (index, color) in code.to_colors().into_iter().enumerate() {
            if color != Color::Dark {
                continue;
            }
            let index = index as u32;
            let left = (index % modules + self.quiet_zone) * scale;
            let top = (index / modules + self.quiet_zone) * scale;
            for y in top..top + scale {
                for x in left..left + scale {
                    image.put_pixel(x, y, Luma([0]));
                }
            }
        }

        let mut bytes = Vec::new();
        image
            .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
            .map_err(|e| CodeGenError::Encoding(e.to_string()))?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    fn decode(bytes: &[u8]) -> String {
        let image = image::load_from_memory(bytes).unwrap().to_luma8();
        let mut prepared = rqrr::PreparedImage::prepare_from_greyscale(
            image.width() as usize,
            image.height() as usize,
            |x, y| image.get_pixel(x as u32, y as u32).0[0],
        );
        let grids = prepared.detect_grids();
        assert_eq!(grids.len(), 1);
        let (_, content) = grids[0].decode().unwrap();
        content
    }

    #[test]
    fn generates_png() {
        let bytes = QrCodeGenerator::new().generate("hello").unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn output_is_deterministic() {
        let generator = QrCodeGenerator::new();
        let payload = "ORDER:1\nBUYER:Ana\nEVENT:Concierto\nPRICE:50.00\nQTY:2";
        assert_eq!(
            generator.generate(payload).unwrap(),
            generator.generate(payload).unwrap()
        );
    }

    #[test]
    fn decoded_code_reproduces_payload() {
        let payload = "ORDER:12\nBUYER:Jose Perez\nEVENT:Teatro\nPRICE:19.99\nQTY:3";
        let bytes = QrCodeGenerator::new().generate(payload).unwrap();
        assert_eq!(decode(&bytes), payload);
    }

    #[test]
    fn empty_payload_still_renders() {
        let bytes = QrCodeGenerator::new().generate("").unwrap();
        assert!(bytes.starts_with(PNG_SIGNATURE));
    }

    #[test]
    fn oversized_payload_is_an_encoding_error() {
        let payload = "x".repeat(8000);
        let result = QrCodeGenerator::new().generate(&payload);
        assert!(matches!(result, Err(CodeGenError::Encoding(_))));
    }

    #[test]
    fn image_size_follows_module_scale() {
        let bytes = QrCodeGenerator::with_module_scale(2)
            .generate("hi")
            .unwrap();
        let image = image::load_from_memory(&bytes).unwrap().to_luma8();
        // Version 1 code: 21 modules plus a 4-module quiet zone on each side
        assert_eq!(image.width(), (21 + 8) * 2);
    }

    #[test]
    fn module_scale_is_clamped() {
        assert_eq!(QrCodeGenerator::with_module_scale(0).module_scale(), 1);
        assert_eq!(
            QrCodeGenerator::with_module_scale(u32::MAX / 8).module_scale(),
            QrCodeGenerator::MAX_MODULE_SCALE
        );
    }

    #[test]
    fn largest_scale_still_renders() {
        let generator = QrCodeGenerator::with_module_scale(u32::MAX);
        let bytes = generator.generate("x").unwrap();
        let image = image::load_from_memory(&bytes).unwrap().to_luma8();
        assert_eq!(image.width(), (21 + 8) * QrCodeGenerator::MAX_MODULE_SCALE);
    }

    #[test]
    fn oversized_dimensions_are_an_encoding_error() {
        let generator = QrCodeGenerator::new();
        assert_eq!(generator.side_length(21).unwrap(), (21 + 8) * 8);
        assert!(matches!(
            generator.side_length(u32::MAX),
            Err(CodeGenError::Encoding(_))
        ));
    }

    #[test]
    fn data_url_wraps_png_base64() {
        let url = QrCodeGenerator::new().generate_data_url("hola").unwrap();
        assert!(url.starts_with("data:image/png;base64,iVBORw0KGgo"));
    }
}
