//! Domain records exchanged with the codec's collaborators.

use crate::amount::Amount;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// The paying institution, as supplied by the record source.
///
/// Only `rnc` and `college` reach the header line. The quarterly billing days
/// and the bank account are carried for the collaborators that own them.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct InstitutionInfo {
    /// Tax id.
    pub rnc: String,

    /// Display name.
    pub college: String,

    #[serde(default)]
    pub first_quarter_day: String,

    #[serde(default)]
    pub second_quarter_day: String,

    #[serde(default)]
    pub bank_account: String,
}

impl InstitutionInfo {
    /// Creates an institution with just the fields the header needs.
    pub fn new(rnc: impl Into<String>, college: impl Into<String>) -> Self {
        InstitutionInfo {
            rnc: rnc.into(),
            college: college.into(),
            first_quarter_day: String::new(),
            second_quarter_day: String::new(),
            bank_account: String::new(),
        }
    }
}

/// One employee to be paid, in the order it should appear in the file.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmployeePaymentEntry {
    /// Identity document number.
    pub doc_number: String,

    /// Identity document type, a single character.
    pub doc_type: String,

    /// Full name.
    pub name: String,

    /// Job title.
    pub job_title: String,

    /// Amount to pay.
    pub full_payment: Amount,
}

impl EmployeePaymentEntry {
    pub fn new(
        doc_number: impl Into<String>,
        doc_type: impl Into<String>,
        name: impl Into<String>,
        job_title: impl Into<String>,
        full_payment: Amount,
    ) -> Self {
        EmployeePaymentEntry {
            doc_number: doc_number.into(),
            doc_type: doc_type.into(),
            name: name.into(),
            job_title: job_title.into(),
            full_payment,
        }
    }
}

/// A payment read back from a body line.
///
/// `received_at` is stamped when the line is decoded; it is not part of the
/// line itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecodedPayment {
    pub doc_number: String,
    pub doc_type: char,
    pub amount: Amount,
    pub received_at: NaiveDateTime,
}
