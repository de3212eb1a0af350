use crate::emv::catalog::{self, FieldKind, CATALOG};
use crate::emv::crc::{crc16_hex, CRC_PREFIX};
use crate::error::{PixError, Result};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedField {
    pub id: String,
    pub value: String,
}

impl ParsedField {
    /// Sub-fields of a template field (26, 62). Scalar and unknown ids
    /// yield `None`.
    pub fn nested(&self) -> Option<Result<Vec<ParsedField>>> {
        match catalog::lookup(CATALOG, &self.id)?.kind {
            FieldKind::Template(_) => Some(parse_fields(&self.value)),
            FieldKind::Scalar => None,
        }
    }
}

/// Splits one TLV level into its fields.
pub fn parse_fields(input: &str) -> Result<Vec<ParsedField>> {
    let mut fields = Vec::new();
    let mut offset = 0;

    while offset < input.len() {
        let header = input
            .get(offset..offset + 4)
            .ok_or_else(|| malformed(offset, "truncated field header"))?;
        if !header.is_ascii() {
            return Err(malformed(offset, "non-ASCII field header"));
        }
        let (id, len) = header.split_at(2);

        if !id.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(offset, &format!("non-numeric id '{}'", id)));
        }
        if !len.bytes().all(|b| b.is_ascii_digit()) {
            return Err(malformed(offset + 2, &format!("non-numeric length '{}'", len)));
        }
        let len: usize = len
            .parse()
            .map_err(|_| malformed(offset + 2, &format!("non-numeric length '{}'", len)))?;

        let start = offset + 4;
        let value = input
            .get(start..start + len)
            .ok_or_else(|| malformed(start, &format!("field {} declares {} bytes", id, len)))?;

        fields.push(ParsedField { id: id.to_string(), value: value.to_string() });
        offset = start + len;
    }

    Ok(fields)
}

/// Checks the trailing CRC and the TLV structure of a complete payload.
pub fn verify_payload(payload: &str) -> Result<Vec<ParsedField>> {
    if payload.len() < CRC_PREFIX.len() + 4 || !payload.is_char_boundary(payload.len() - 4) {
        return Err(malformed(0, "payload too short to carry a CRC"));
    }

    let (checked, found) = payload.split_at(payload.len() - 4);
    if !checked.ends_with(CRC_PREFIX) {
        return Err(malformed(checked.len().saturating_sub(4), "missing CRC field 6304"));
    }

    let expected = crc16_hex(checked.as_bytes());
    if !expected.eq_ignore_ascii_case(found) {
        return Err(PixError::Checksum { expected, found: found.to_string() });
    }

    let fields = parse_fields(payload)?;
    match fields.last() {
        Some(last) if last.id == catalog::CRC.id => Ok(fields),
        _ => Err(malformed(0, "CRC is not the last field")),
    }
}

fn malformed(offset: usize, reason: &str) -> PixError {
    PixError::Malformed { offset, reason: reason.to_string() }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "00020101021126370014BR.GOV.BCB.PIX0115maria@email.com\
                           5204000053039865802BR5914MARIA OLIVEIRA6014RIO DE JANEIRO\
                           62070503***6304F98D";

    #[test]
    fn verifies_a_valid_payload() {
        let fields = verify_payload(MINIMAL).unwrap();
        let ids: Vec<_> = fields.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["00", "01", "26", "52", "53", "58", "59", "60", "62", "63"]);
        assert_eq!(fields[6].value, "MARIA OLIVEIRA");
    }

    #[test]
    fn lowercase_crc_is_accepted() {
        let lower = MINIMAL.replace("F98D", "f98d");
        assert!(verify_payload(&lower).is_ok());
    }

    #[test]
    fn detects_tampering() {
        let tampered = MINIMAL.replace("MARIA", "MARIO");
        match verify_payload(&tampered) {
            Err(PixError::Checksum { found, .. }) => assert_eq!(found, "F98D"),
            other => panic!("expected checksum error, got {:?}", other),
        }
    }

    #[test]
    fn nested_fields_are_decoded() {
        let fields = parse_fields(MINIMAL).unwrap();
        let account = fields.iter().find(|f| f.id == "26").unwrap();
        let nested = account.nested().unwrap().unwrap();
        assert_eq!(nested[0].value, "BR.GOV.BCB.PIX");
        assert_eq!(nested[1].value, "maria@email.com");

        let name = fields.iter().find(|f| f.id == "59").unwrap();
        assert!(name.nested().is_none());
    }

    #[test]
    fn truncated_input_is_malformed() {
        assert!(matches!(parse_fields("5913JOSE"), Err(PixError::Malformed { offset: 4, .. })));
        assert!(matches!(parse_fields("59"), Err(PixError::Malformed { .. })));
        assert!(matches!(parse_fields("AB02xx"), Err(PixError::Malformed { .. })));
        assert!(matches!(verify_payload("0002"), Err(PixError::Malformed { .. })));
    }

    #[test]
    fn signed_length_is_malformed() {
        assert!(matches!(parse_fields("59+3ABC"), Err(PixError::Malformed { offset: 2, .. })));
        assert!(matches!(parse_fields("59 3ABC"), Err(PixError::Malformed { offset: 2, .. })));
    }
}
