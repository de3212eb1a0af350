use std::fmt;

use crate::emv::catalog::FieldSpec;
use crate::error::{PixError, Result};

/// Largest value a two-digit decimal length prefix can describe.
pub const MAX_VALUE_LEN: usize = 99;

/// One EMV `id + length + value` triplet.
///
/// Only constructed through [`emit`], so `length` always equals the
/// zero-padded byte length of `value` and `value` is never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedField {
    id: String,
    length: String,
    value: String,
}

impl EncodedField {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn length(&self) -> &str {
        &self.length
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for EncodedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.id, self.length, self.value)
    }
}

/// Encodes a single field. An empty value is not an error: the field is
/// simply left out of the payload.
pub fn emit(id: &str, value: &str) -> Result<Option<EncodedField>> {
    if value.is_empty() {
        return Ok(None);
    }
    if value.len() > MAX_VALUE_LEN {
        return Err(PixError::EncodingOverflow {
            id: id.to_string(),
            len: value.len(),
            max: MAX_VALUE_LEN,
        });
    }

    Ok(Some(EncodedField {
        id: id.to_string(),
        length: format!("{:02}", value.len()),
        value: value.to_string(),
    }))
}

/// Accumulates fields for one TLV level. Nested templates (26, 62) are
/// written with a child writer whose output becomes the parent's value,
/// so every level goes through the same encoder.
#[derive(Debug, Default)]
pub struct TlvWriter {
    fields: Vec<EncodedField>,
}

impl TlvWriter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Writes a scalar field, checking the catalog limit as well as the
    /// length-prefix ceiling.
    pub fn field(&mut self, spec: &FieldSpec, value: &str) -> Result<&mut Self> {
        if value.len() > spec.max_len {
            return Err(PixError::EncodingOverflow {
                id: spec.id.to_string(),
                len: value.len(),
                max: spec.max_len,
            });
        }
        if let Some(field) = emit(spec.id, value)? {
            self.fields.push(field);
        }
        Ok(self)
    }

    /// Writes a template field. If the closure writes nothing the template
    /// is omitted along with it.
    pub fn template<F>(&mut self, spec: &FieldSpec, build: F) -> Result<&mut Self>
    where
        F: FnOnce(&mut TlvWriter) -> Result<()>,
    {
        let mut nested = TlvWriter::new();
        build(&mut nested)?;
        let value = nested.encode();
        self.field(spec, &value)
    }

    pub fn fields(&self) -> &[EncodedField] {
        &self.fields
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn encode(&self) -> String {
        self.fields.iter().map(ToString::to_string).collect()
    }
}
