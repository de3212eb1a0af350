use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine as _};
use image::{DynamicImage, GrayImage, ImageFormat, Luma};
use qrcode::render::svg;
use qrcode::{Color, EcLevel, QrCode};

use crate::error::{PixError, Result};
use crate::models::pix::PixResult;

pub const PNG_DATA_URI_PREFIX: &str = "data:image/png;base64,";

// Modules of white border required around the symbol.
const QUIET_ZONE: u32 = 4;

/// Encodes payloads as QR symbols (error correction M) and renders them.
#[derive(Debug, Clone, Copy)]
pub struct QrRenderer {
    min_size: u32,
}

impl Default for QrRenderer {
    fn default() -> Self {
        Self { min_size: 256 }
    }
}

impl QrRenderer {
    pub fn with_min_size(min_size: u32) -> Self {
        Self { min_size }
    }

    fn encode(&self, payload: &str) -> Result<QrCode> {
        QrCode::with_error_correction_level(payload.as_bytes(), EcLevel::M)
            .map_err(|e| PixError::Render(e.to_string()))
    }

    pub fn svg(&self, payload: &str) -> Result<String> {
        let code = self.encode(payload)?;
        Ok(code
            .render::<svg::Color>()
            .min_dimensions(self.min_size, self.min_size)
            .dark_color(svg::Color("#000000"))
            .light_color(svg::Color("#ffffff"))
            .build())
    }

    pub fn png(&self, payload: &str) -> Result<Vec<u8>> {
        let code = self.encode(payload)?;
        let width = code.width() as u32;
        let colors = code.to_colors();

        let modules = width + 2 * QUIET_ZONE;
        let scale = self.min_size.div_ceil(modules).max(1);
        let side = modules * scale;

        let img = GrayImage::from_fn(side, side, |x, y| {
            let (mx, my) = (x / scale, y / scale);
            let inside = (QUIET_ZONE..QUIET_ZONE + width).contains(&mx)
                && (QUIET_ZONE..QUIET_ZONE + width).contains(&my);
            if inside {
                let idx = ((my - QUIET_ZONE) * width + (mx - QUIET_ZONE)) as usize;
                if colors[idx] == Color::Dark {
                    return Luma([0u8]);
                }
            }
            Luma([255u8])
        });

        encode_png(&DynamicImage::ImageLuma8(img))
    }

    pub fn png_data_uri(&self, payload: &str) -> Result<String> {
        let png = self.png(payload)?;
        Ok(format!("{}{}", PNG_DATA_URI_PREFIX, STANDARD.encode(png)))
    }

    /// Both renderings for a finished payload.
    pub fn render(&self, payload: &str) -> Result<PixResult> {
        Ok(PixResult {
            code: payload.to_string(),
            qr_svg: self.svg(payload)?,
            qr_png: self.png_data_uri(payload)?,
        })
    }
}

pub(crate) fn encode_png(img: &DynamicImage) -> Result<Vec<u8>> {
    let mut buf = Cursor::new(Vec::new());
    img.write_to(&mut buf, ImageFormat::Png)
        .map_err(|e| PixError::Render(e.to_string()))?;
    Ok(buf.into_inner())
}

/// Raw PNG bytes from a `data:image/png;base64,` URI (the prefix is
/// optional).
pub fn decode_png_data_uri(uri: &str) -> Result<Vec<u8>> {
    let data = uri.strip_prefix(PNG_DATA_URI_PREFIX).unwrap_or(uri);
    STANDARD
        .decode(data)
        .map_err(|e| PixError::Render(format!("invalid base64 PNG: {}", e)))
}
