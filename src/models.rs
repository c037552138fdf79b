use crate::errors::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Minimum requested loan amount accepted by the form, in won.
pub const MIN_LOAN_AMOUNT: u64 = 100_000;

/// Raw lead-capture form payload as posted by the landing page.
///
/// Transient: constructed from the request body, validated, rendered into a
/// notification message and discarded. Never persisted.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadSubmission {
    pub name: String,
    pub phone: String,
    pub biz_type: BusinessType,
    /// Requested sum; the form may post it as a number or as formatted
    /// numeric text ("1,000,000원").
    pub amount: Value,
    pub region: String,
}

/// Applicant business type.
///
/// The landing page posts the Korean wire values; the English spellings are
/// accepted as aliases for API callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum BusinessType {
    #[serde(rename = "개인사업자", alias = "individual proprietor")]
    IndividualProprietor,
    #[serde(rename = "법인사업자", alias = "corporate entity")]
    CorporateEntity,
}

impl BusinessType {
    /// Label rendered into the notification message.
    pub fn label(&self) -> &'static str {
        match self {
            BusinessType::IndividualProprietor => "개인사업자",
            BusinessType::CorporateEntity => "법인사업자",
        }
    }
}

/// A lead that passed every field constraint and is ready to be rendered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedLead {
    pub name: String,
    pub phone: String,
    pub biz_type: BusinessType,
    pub amount: u64,
    pub region: String,
}

impl LeadSubmission {
    /// Validates the submission, fail-fast in field order.
    ///
    /// Checks, in order: `name`, `phone`, `amount` (parsed amount must be at
    /// least [`MIN_LOAN_AMOUNT`]), `region`. The first violation is reported
    /// and no further checks run.
    pub fn validate(self) -> Result<ValidatedLead, AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::Validation("name required".to_string()));
        }
        if self.phone.trim().is_empty() {
            return Err(AppError::Validation("phone required".to_string()));
        }
        let amount = match parse_amount(&self.amount) {
            Some(n) if n >= MIN_LOAN_AMOUNT => n,
            _ => return Err(AppError::Validation("amount required".to_string())),
        };
        if self.region.trim().is_empty() {
            return Err(AppError::Validation("region required".to_string()));
        }

        Ok(ValidatedLead {
            name: self.name,
            phone: self.phone,
            biz_type: self.biz_type,
            amount,
            region: self.region,
        })
    }
}

/// Derives the numeric amount from the raw field by stripping every
/// non-digit character before parsing, so `"1,000,000원"` parses to
/// `1000000`. Returns `None` when no digits remain.
pub fn parse_amount(raw: &Value) -> Option<u64> {
    match raw {
        Value::Number(n) => n.as_u64().or_else(|| {
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0)
                .map(|f| f as u64)
        }),
        Value::String(s) => {
            let digits: String = s.chars().filter(|c| c.is_ascii_digit()).collect();
            if digits.is_empty() {
                None
            } else {
                digits.parse().ok()
            }
        }
        _ => None,
    }
}

/// Acknowledgement returned by the dispatcher on overall success.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchAck {
    /// Number of recipients the message was delivered to (primary included).
    pub delivered: usize,
}
