pub mod emv;
pub mod error;
pub mod models;
pub mod render;
pub mod validation;

pub use error::{PixError, Result};
pub use models::pix::{PixRequest, PixResult};

use emv::{PixPayloadBuilder, PointOfInitiation};
use render::QrRenderer;
use validation::{rules, ValidationEngine};

pub fn get_standard_validator() -> ValidationEngine {
    ValidationEngine::new()
        .add_rule(rules::RuleNameRequired)
        .add_rule(rules::RuleKeyRequired)
        .add_rule(rules::RuleKeyLength)
        .add_rule(rules::RuleCityRequired)
        .add_rule(rules::RuleAmountNonNegative)
        .add_rule(rules::RuleAmountLength)
}

/// Builds the static BR Code string for a request.
pub fn generate_payload(request: &PixRequest) -> Result<String> {
    PixPayloadBuilder::new()
        .initiation(PointOfInitiation::Static)
        .build(request)
        .map(|payload| payload.into_string())
}

/// Builds the payload and renders both QR images for it.
pub fn generate(request: &PixRequest, renderer: &QrRenderer) -> Result<PixResult> {
    let payload = generate_payload(request)?;
    renderer.render(&payload)
}
