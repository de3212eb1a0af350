use std::collections::HashMap;
use std::path::{Path, PathBuf};

use image::imageops::{self, FilterType};
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};
use tracing::{debug, warn};

use crate::error::{PixError, Result};
use crate::render::qr::encode_png;

// White border painted around the QR square on the template.
const QUIET_ZONE_PX: u32 = 20;
// The QR takes this share of the square; the rest is margin.
const FILL_RATIO: f64 = 0.90;

/// Where the QR code goes on a template image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplatePosition {
    pub x: u32,
    pub y: u32,
    pub size: u32,
    pub filename: String,
}

/// Named templates and the directory their images live in.
#[derive(Debug, Clone)]
pub struct TemplateRegistry {
    dir: PathBuf,
    templates: HashMap<String, TemplatePosition>,
}

impl TemplateRegistry {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into(), templates: HashMap::new() }
    }

    /// The registry shipped with the service.
    pub fn with_defaults(dir: impl Into<PathBuf>) -> Self {
        Self::new(dir).with_template(
            "template_pix_1",
            TemplatePosition { x: 250, y: 400, size: 200, filename: "template_pix_1.png".into() },
        )
    }

    pub fn with_template(mut self, name: impl Into<String>, position: TemplatePosition) -> Self {
        self.templates.insert(name.into(), position);
        self
    }

    pub fn get(&self, name: &str) -> Option<&TemplatePosition> {
        self.templates.get(name)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

/// Paints a QR code onto a branded template.
#[derive(Debug, Clone)]
pub struct TemplateCompositor {
    registry: TemplateRegistry,
}

impl TemplateCompositor {
    pub fn new(registry: TemplateRegistry) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &TemplateRegistry {
        &self.registry
    }

    pub fn apply(&self, qr_png: &[u8], template_name: &str) -> Result<Vec<u8>> {
        let position = self.registry.get(template_name).ok_or_else(|| {
            warn!(template = template_name, "template not registered");
            PixError::Template(format!("template not found: {}", template_name))
        })?;

        let path = self.registry.dir.join(&position.filename);
        if !path.exists() {
            warn!(path = %path.display(), "template file missing");
            return Err(PixError::Template(format!(
                "template file not found: {}",
                position.filename
            )));
        }

        let qr = image::load_from_memory_with_format(qr_png, ImageFormat::Png)
            .map_err(|e| PixError::Template(format!("invalid QR PNG: {}", e)))?
            .to_rgba8();
        let mut canvas = image::open(&path)
            .map_err(|e| PixError::Template(format!("cannot read {}: {}", path.display(), e)))?
            .to_rgba8();

        fill_rect(
            &mut canvas,
            position.x.saturating_sub(QUIET_ZONE_PX),
            position.y.saturating_sub(QUIET_ZONE_PX),
            position.size + 2 * QUIET_ZONE_PX,
            Rgba([255, 255, 255, 255]),
        );

        let new_size = ((position.size as f64) * FILL_RATIO) as u32;
        let margin = (position.size - new_size) / 2;
        let resized = imageops::resize(&qr, new_size, new_size, FilterType::Lanczos3);
        imageops::overlay(
            &mut canvas,
            &resized,
            (position.x + margin) as i64,
            (position.y + margin) as i64,
        );

        debug!(template = template_name, "template composited");
        encode_png(&DynamicImage::ImageRgba8(canvas))
    }
}

// Square fill clipped to the canvas.
fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, side: u32, color: Rgba<u8>) {
    let x_end = (x + side).min(canvas.width());
    let y_end = (y + side).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::qr::QrRenderer;

    fn write_template(dir: &Path, name: &str) {
        let img = RgbaImage::from_pixel(800, 800, Rgba([20, 80, 160, 255]));
        img.save(dir.join(name)).unwrap();
    }

    #[test]
    fn composites_qr_inside_quiet_zone() {
        let dir = tempfile::tempdir().unwrap();
        write_template(dir.path(), "template_pix_1.png");
        let compositor = TemplateCompositor::new(TemplateRegistry::with_defaults(dir.path()));

        let qr = QrRenderer::default().png("00020101021126").unwrap();
        let out = compositor.apply(&qr, "template_pix_1").unwrap();
        let img = image::load_from_memory(&out).unwrap().to_rgba8();

        assert_eq!(img.dimensions(), (800, 800));
        // Quiet zone is white, outside it the template survives.
        assert_eq!(img.get_pixel(235, 385), &Rgba([255, 255, 255, 255]));
        assert_eq!(img.get_pixel(100, 100), &Rgba([20, 80, 160, 255]));
        // Some dark modules landed in the square.
        let dark = (260..440)
            .flat_map(|x| (410..590).map(move |y| (x, y)))
            .any(|(x, y)| img.get_pixel(x, y).0[0] < 64);
        assert!(dark);
    }

    #[test]
    fn unknown_template_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = TemplateCompositor::new(TemplateRegistry::with_defaults(dir.path()));
        let err = compositor.apply(&[], "nope").unwrap_err();
        assert!(matches!(err, PixError::Template(msg) if msg.contains("nope")));
    }

    #[test]
    fn missing_template_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let compositor = TemplateCompositor::new(TemplateRegistry::with_defaults(dir.path()));
        let qr = QrRenderer::default().png("x").unwrap();
        let err = compositor.apply(&qr, "template_pix_1").unwrap_err();
        assert!(matches!(err, PixError::Template(msg) if msg.contains("template_pix_1.png")));
    }

    #[test]
    fn registry_is_explicit_configuration() {
        let registry = TemplateRegistry::new("/tmp/t").with_template(
            "small",
            TemplatePosition { x: 0, y: 0, size: 50, filename: "s.png".into() },
        );
        assert_eq!(registry.get("small").map(|p| p.size), Some(50));
        assert!(registry.get("template_pix_1").is_none());
        assert_eq!(registry.names().collect::<Vec<_>>(), vec!["small"]);
    }
}
