use std::fmt;

use crate::emv::catalog::{
    ADDITIONAL_DATA, AMOUNT, CATEGORY_CODE, CATEGORY_CODE_VALUE, COUNTRY, COUNTRY_BR, CRC, CURRENCY,
    CURRENCY_BRL, GUI, INITIATION_METHOD, MERCHANT_ACCOUNT, MERCHANT_CITY, MERCHANT_NAME,
    PAYLOAD_FORMAT, PAYLOAD_FORMAT_VALUE, PIX_GUI, PIX_KEY, PURPOSE, REFERENCE_LABEL,
    REFERENCE_LABEL_PLACEHOLDER,
};
use crate::emv::crc::{crc16_hex, CRC_PREFIX};
use crate::emv::tlv::{emit, EncodedField, TlvWriter};
use crate::error::{PixError, Result};
use crate::models::pix::{PixRequest, SanitizedRequest};
use crate::validation::ValidationEngine;

/// Field 01. Only static codes are generated today; the dynamic variant
/// exists so both share the same assembly path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointOfInitiation {
    #[default]
    Static,
    Dynamic,
}

impl PointOfInitiation {
    pub fn code(self) -> &'static str {
        match self {
            PointOfInitiation::Static => "11",
            PointOfInitiation::Dynamic => "12",
        }
    }
}

/// A complete BR Code: the ordered top-level fields, CRC last.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixPayload {
    fields: Vec<EncodedField>,
    text: String,
}

impl PixPayload {
    pub fn as_str(&self) -> &str {
        &self.text
    }

    pub fn fields(&self) -> &[EncodedField] {
        &self.fields
    }

    pub fn crc(&self) -> &str {
        &self.text[self.text.len() - 4..]
    }

    pub fn into_string(self) -> String {
        self.text
    }
}

impl fmt::Display for PixPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

pub struct PixPayloadBuilder {
    initiation: PointOfInitiation,
    validator: ValidationEngine,
}

impl Default for PixPayloadBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl PixPayloadBuilder {
    pub fn new() -> Self {
        Self {
            initiation: PointOfInitiation::Static,
            validator: crate::get_standard_validator(),
        }
    }

    pub fn initiation(mut self, initiation: PointOfInitiation) -> Self {
        self.initiation = initiation;
        self
    }

    pub fn validator(mut self, validator: ValidationEngine) -> Self {
        self.validator = validator;
        self
    }

    /// Sanitizes and validates the request, then assembles the payload.
    pub fn build(&self, request: &PixRequest) -> Result<PixPayload> {
        let fields = request.sanitized();
        self.validator.validate(&fields)?;
        self.assemble(&fields)
    }

    /// Emits fields in catalog encounter order:
    /// 00, 01, 26, 52, 53, 58, 59, 60, 54, 62, then 63.
    pub fn assemble(&self, f: &SanitizedRequest) -> Result<PixPayload> {
        let mut writer = TlvWriter::new();

        writer
            .field(&PAYLOAD_FORMAT, PAYLOAD_FORMAT_VALUE)?
            .field(&INITIATION_METHOD, self.initiation.code())?
            .template(&MERCHANT_ACCOUNT, |account| {
                account.field(&GUI, PIX_GUI)?.field(&PIX_KEY, &f.key)?;
                Ok(())
            })?
            .field(&CATEGORY_CODE, CATEGORY_CODE_VALUE)?
            .field(&CURRENCY, CURRENCY_BRL)?
            .field(&COUNTRY, COUNTRY_BR)?
            .field(&MERCHANT_NAME, &f.name)?
            .field(&MERCHANT_CITY, &f.city)?
            .field(&AMOUNT, f.amount.as_deref().unwrap_or_default())?
            .template(&ADDITIONAL_DATA, |data| {
                let label = f.reference_label.as_deref().unwrap_or(REFERENCE_LABEL_PLACEHOLDER);
                data.field(&REFERENCE_LABEL, label)?
                    .field(&PURPOSE, f.purpose.as_deref().unwrap_or_default())?;
                Ok(())
            })?;

        let mut text = writer.encode();
        text.push_str(CRC_PREFIX);
        let crc = crc16_hex(text.as_bytes());
        text.push_str(&crc);

        let mut fields = writer.fields().to_vec();
        let crc_field = emit(CRC.id, &crc)?.ok_or_else(|| PixError::EncodingOverflow {
            id: CRC.id.to_string(),
            len: 0,
            max: CRC.max_len,
        })?;
        fields.push(crc_field);

        Ok(PixPayload { fields, text })
    }
}
