pub mod qr;
pub mod template;

pub use qr::{decode_png_data_uri, QrRenderer, PNG_DATA_URI_PREFIX};
pub use template::{TemplateCompositor, TemplatePosition, TemplateRegistry};
