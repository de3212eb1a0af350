// ---------------------------------------------------------------------------
// BR Code field catalog (EMV-MPM as profiled by the Banco Central do Brasil)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldKind {
    Scalar,
    /// Value is itself a TLV sequence described by the nested table.
    Template(&'static [FieldSpec]),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldSpec {
    pub id: &'static str,
    pub name: &'static str,
    pub required: bool,
    pub max_len: usize,
    pub kind: FieldKind,
}

impl FieldSpec {
    const fn scalar(id: &'static str, name: &'static str, required: bool, max_len: usize) -> Self {
        Self { id, name, required, max_len, kind: FieldKind::Scalar }
    }

    const fn template(
        id: &'static str,
        name: &'static str,
        required: bool,
        fields: &'static [FieldSpec],
    ) -> Self {
        Self { id, name, required, max_len: 99, kind: FieldKind::Template(fields) }
    }
}

/// Globally unique identifier for PIX inside the merchant account template.
pub const PIX_GUI: &str = "BR.GOV.BCB.PIX";

// Merchant Account Information (26) sub-fields
pub const GUI: FieldSpec = FieldSpec::scalar("00", "gui", true, 32);
pub const PIX_KEY: FieldSpec = FieldSpec::scalar("01", "pix_key", true, 77);

pub const MERCHANT_ACCOUNT_FIELDS: &[FieldSpec] = &[GUI, PIX_KEY];

// Additional Data Field (62) sub-fields
pub const REFERENCE_LABEL: FieldSpec = FieldSpec::scalar("05", "reference_label", false, 25);
pub const PURPOSE: FieldSpec = FieldSpec::scalar("08", "purpose_of_transaction", false, 50);

pub const ADDITIONAL_DATA_FIELDS: &[FieldSpec] = &[REFERENCE_LABEL, PURPOSE];

/// Reference label used when the request carries no transaction identifier.
pub const REFERENCE_LABEL_PLACEHOLDER: &str = "***";

// Top level
pub const PAYLOAD_FORMAT: FieldSpec = FieldSpec::scalar("00", "payload_format_indicator", true, 2);
pub const INITIATION_METHOD: FieldSpec = FieldSpec::scalar("01", "point_of_initiation", true, 2);
pub const MERCHANT_ACCOUNT: FieldSpec =
    FieldSpec::template("26", "merchant_account_information", true, MERCHANT_ACCOUNT_FIELDS);
pub const CATEGORY_CODE: FieldSpec = FieldSpec::scalar("52", "merchant_category_code", true, 4);
pub const CURRENCY: FieldSpec = FieldSpec::scalar("53", "transaction_currency", true, 3);
pub const AMOUNT: FieldSpec = FieldSpec::scalar("54", "transaction_amount", false, 13);
pub const COUNTRY: FieldSpec = FieldSpec::scalar("58", "country_code", true, 2);
pub const MERCHANT_NAME: FieldSpec = FieldSpec::scalar("59", "merchant_name", true, 25);
pub const MERCHANT_CITY: FieldSpec = FieldSpec::scalar("60", "merchant_city", true, 15);
pub const ADDITIONAL_DATA: FieldSpec =
    FieldSpec::template("62", "additional_data_field", false, ADDITIONAL_DATA_FIELDS);
pub const CRC: FieldSpec = FieldSpec::scalar("63", "crc16", true, 4);

pub const PAYLOAD_FORMAT_VALUE: &str = "01";
pub const CATEGORY_CODE_VALUE: &str = "0000";
pub const CURRENCY_BRL: &str = "986";
pub const COUNTRY_BR: &str = "BR";

/// Top-level fields in the order the builder emits them.
pub const CATALOG: &[FieldSpec] = &[
    PAYLOAD_FORMAT,
    INITIATION_METHOD,
    MERCHANT_ACCOUNT,
    CATEGORY_CODE,
    CURRENCY,
    COUNTRY,
    MERCHANT_NAME,
    MERCHANT_CITY,
    AMOUNT,
    ADDITIONAL_DATA,
    CRC,
];

pub fn lookup(table: &'static [FieldSpec], id: &str) -> Option<&'static FieldSpec> {
    table.iter().find(|spec| spec.id == id)
}
