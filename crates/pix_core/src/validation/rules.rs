use crate::emv::catalog::{AMOUNT, PIX_KEY};
use crate::error::PixError;
use crate::models::pix::SanitizedRequest;
use crate::validation::{ValidationIssue, ValidationRule};

fn issue(rule: &dyn ValidationRule, error: PixError) -> Vec<ValidationIssue> {
    vec![ValidationIssue { code: rule.rule_id().to_string(), error }]
}

// =========================================================================
// RULE: PIX-001
// "Merchant name (59) is mandatory and must survive sanitization"
// =========================================================================
pub struct RuleNameRequired;

impl ValidationRule for RuleNameRequired {
    fn rule_id(&self) -> &str { "PIX-001" }

    fn check(&self, request: &SanitizedRequest) -> Vec<ValidationIssue> {
        if request.name.is_empty() {
            return issue(self, PixError::MissingField("nome"));
        }
        Vec::new()
    }
}

// =========================================================================
// RULE: PIX-002
// "PIX key (26/01) is mandatory"
// The key grammar (email, phone, CPF/CNPJ, EVP) is not checked here.
// =========================================================================
pub struct RuleKeyRequired;

impl ValidationRule for RuleKeyRequired {
    fn rule_id(&self) -> &str { "PIX-002" }

    fn check(&self, request: &SanitizedRequest) -> Vec<ValidationIssue> {
        if request.key.trim().is_empty() {
            return issue(self, PixError::MissingField("chave"));
        }
        Vec::new()
    }
}

// =========================================================================
// RULE: PIX-003
// "PIX key must fit the merchant account sub-field (max 77)"
// =========================================================================
pub struct RuleKeyLength;

impl ValidationRule for RuleKeyLength {
    fn rule_id(&self) -> &str { "PIX-003" }

    fn check(&self, request: &SanitizedRequest) -> Vec<ValidationIssue> {
        if request.key.len() > PIX_KEY.max_len {
            return issue(
                self,
                PixError::Validation {
                    field: "chave",
                    message: format!(
                        "key has {} bytes, maximum is {}",
                        request.key.len(),
                        PIX_KEY.max_len
                    ),
                },
            );
        }
        Vec::new()
    }
}

// =========================================================================
// RULE: PIX-004
// "Merchant city (60) is mandatory and must survive sanitization"
// =========================================================================
pub struct RuleCityRequired;

impl ValidationRule for RuleCityRequired {
    fn rule_id(&self) -> &str { "PIX-004" }

    fn check(&self, request: &SanitizedRequest) -> Vec<ValidationIssue> {
        if request.city.is_empty() {
            return issue(self, PixError::MissingField("cidade"));
        }
        Vec::new()
    }
}

// =========================================================================
// RULE: PIX-005
// "Amount, when present, must be a finite non-negative number"
// Zero is accepted and simply omits field 54.
// =========================================================================
pub struct RuleAmountNonNegative;

impl ValidationRule for RuleAmountNonNegative {
    fn rule_id(&self) -> &str { "PIX-005" }

    fn check(&self, request: &SanitizedRequest) -> Vec<ValidationIssue> {
        match request.raw_amount {
            Some(v) if !v.is_finite() || v < 0.0 => {
                issue(self, PixError::InvalidAmount(format!("{} is not a non-negative amount", v)))
            }
            _ => Vec::new(),
        }
    }
}

// =========================================================================
// RULE: PIX-006
// "Formatted amount must fit field 54 (max 13)"
// =========================================================================
pub struct RuleAmountLength;

impl ValidationRule for RuleAmountLength {
    fn rule_id(&self) -> &str { "PIX-006" }

    fn check(&self, request: &SanitizedRequest) -> Vec<ValidationIssue> {
        match &request.amount {
            Some(value) if value.len() > AMOUNT.max_len => issue(
                self,
                PixError::InvalidAmount(format!(
                    "{} has {} characters, maximum is {}",
                    value,
                    value.len(),
                    AMOUNT.max_len
                )),
            ),
            _ => Vec::new(),
        }
    }
}
