use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::emv::amount::amount_value;
use crate::emv::catalog::{MERCHANT_CITY, MERCHANT_NAME, PURPOSE, REFERENCE_LABEL};
use crate::emv::sanitize::sanitize;

// ---------------------------------------------------------------------------
// The Input: PixRequest
// Field names on the wire follow the public API (Portuguese).
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PixRequest {
    // Beneficiary name, max 25 after sanitization
    #[serde(rename = "nome")]
    pub name: String,

    // PIX key (email, phone, CPF/CNPJ or random key), passed through verbatim
    #[serde(rename = "chave")]
    pub key: String,

    // Beneficiary city, max 15 after sanitization
    #[serde(rename = "cidade")]
    pub city: String,

    #[serde(rename = "valor", default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,

    // Reference label (62/05), max 25
    #[serde(rename = "identificador", default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,

    // Purpose of transaction (62/08), max 50
    #[serde(rename = "descricao", default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl PixRequest {
    pub fn new(name: impl Into<String>, key: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            city: city.into(),
            ..Default::default()
        }
    }

    pub fn with_amount(mut self, amount: f64) -> Self {
        self.amount = Some(amount);
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.identifier = Some(identifier.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// The request as it will be encoded: free text sanitized to catalog
    /// limits, amount formatted, empty optionals collapsed to `None`.
    pub fn sanitized(&self) -> SanitizedRequest {
        let non_empty = |s: String| if s.is_empty() { None } else { Some(s) };

        SanitizedRequest {
            name: sanitize(&self.name, MERCHANT_NAME.max_len),
            key: self.key.clone(),
            city: sanitize(&self.city, MERCHANT_CITY.max_len),
            raw_amount: self.amount,
            amount: amount_value(self.amount),
            reference_label: self
                .identifier
                .as_deref()
                .map(|s| sanitize(s, REFERENCE_LABEL.max_len))
                .and_then(non_empty),
            purpose: self
                .description
                .as_deref()
                .map(|s| sanitize(s, PURPOSE.max_len))
                .and_then(non_empty),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SanitizedRequest {
    pub name: String,
    pub key: String,
    pub city: String,
    /// Amount as submitted, kept for validation.
    pub raw_amount: Option<f64>,
    /// Field 54 value; `None` when the field is omitted.
    pub amount: Option<String>,
    pub reference_label: Option<String>,
    pub purpose: Option<String>,
}

// ---------------------------------------------------------------------------
// The Output: PixResult
// Produced once per generation request and never mutated afterwards.
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PixResult {
    #[serde(rename = "codigo_pix")]
    pub code: String,

    #[serde(rename = "qrcode_svg")]
    pub qr_svg: String,

    // data:image/png;base64,...
    #[serde(rename = "qrcode_png")]
    pub qr_png: String,
}

// ---------------------------------------------------------------------------
// The Record: one persisted generation
// ---------------------------------------------------------------------------
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PixRecord {
    pub id: i64,
    #[serde(rename = "nome")]
    pub name: String,
    #[serde(rename = "chave")]
    pub key: String,
    #[serde(rename = "cidade")]
    pub city: String,
    #[serde(rename = "valor", skip_serializing_if = "Option::is_none", default)]
    pub amount: Option<f64>,
    #[serde(rename = "identificador", skip_serializing_if = "Option::is_none", default)]
    pub identifier: Option<String>,
    #[serde(rename = "descricao", skip_serializing_if = "Option::is_none", default)]
    pub description: Option<String>,
    #[serde(rename = "codigo_pix")]
    pub code: String,
    #[serde(rename = "qrcode_svg")]
    pub qr_svg: String,
    #[serde(rename = "qrcode_png")]
    pub qr_png: String,
    #[serde(rename = "criado_em")]
    pub created_at: DateTime<Utc>,
}

/// A record that has not been stored yet (no id, no timestamp).
#[derive(Debug, Clone, PartialEq)]
pub struct NewPixRecord {
    pub request: PixRequest,
    pub result: PixResult,
}

impl PixRecord {
    pub fn result(&self) -> PixResult {
        PixResult {
            code: self.code.clone(),
            qr_svg: self.qr_svg.clone(),
            qr_png: self.qr_png.clone(),
        }
    }
}
