//! Typed header, body and footer lines.
//!
//! Each line kind renders itself through the shared layout table and parses
//! itself back by fixed offsets. Parsing checks the whole shape first and
//! only then extracts typed fields.

use crate::amount::Amount;
use crate::error::{LayoutError, Result};
use crate::layout::{body_field, footer_field, header_field, BODY, FOOTER, HEADER};
use crate::record::DecodedPayment;
use chrono::{NaiveDate, NaiveDateTime};

const DATE_FORMAT: &str = "%Y%m%d";

/// Tag `E`: the first line of every file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderLine {
    pub college: String,
    pub tax_id: String,
    pub date: NaiveDate,
}

impl HeaderLine {
    pub fn render(&self) -> Result<String> {
        let date = self.date.format(DATE_FORMAT).to_string();
        HEADER.compose(&[self.college.as_str(), self.tax_id.as_str(), date.as_str()])
    }

    /// Parses a header line found at 1-based position `line_no`.
    ///
    /// A line with the wrong tag, width or a non-digit date is
    /// `MalformedHeader`; eight digits that are not a calendar date are
    /// `InvalidDate`.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let date_field = HEADER.slice(line, header_field::DATE);
        if !HEADER.frames(line) || !is_digits(date_field) {
            return Err(LayoutError::MalformedHeader {
                line: line_no,
                raw: line.to_string(),
            });
        }

        let date = parse_date(date_field).ok_or_else(|| LayoutError::InvalidDate {
            line: line_no,
            raw: date_field.to_string(),
        })?;

        Ok(HeaderLine {
            college: HEADER.slice(line, header_field::COLLEGE).trim().to_string(),
            tax_id: HEADER.slice(line, header_field::TAX_ID).trim().to_string(),
            date,
        })
    }
}

/// Tag `D`: one payment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BodyLine {
    pub doc_number: String,
    pub doc_type: char,
    pub name: String,
    pub job_title: String,
    pub full_payment: Amount,
}

impl BodyLine {
    pub fn render(&self) -> Result<String> {
        let doc_type = self.doc_type.to_string();
        let amount = self.full_payment.to_string();
        BODY.compose(&[
            self.doc_number.as_str(),
            doc_type.as_str(),
            self.name.as_str(),
            self.job_title.as_str(),
            amount.as_str(),
        ])
    }

    /// Parses a body line found at 1-based position `line_no`.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let malformed = || LayoutError::MalformedLine {
            line: line_no,
            raw: line.to_string(),
        };

        if !BODY.frames(line) {
            return Err(malformed());
        }

        let doc_number = BODY.slice(line, body_field::DOC_NUMBER).trim();
        if doc_number.is_empty() {
            return Err(malformed());
        }

        let doc_type = match BODY.slice(line, body_field::DOC_TYPE).chars().next() {
            Some(c) if !c.is_ascii_whitespace() => c,
            _ => return Err(malformed()),
        };

        // Right-justified: leading spaces, then `digits.dd` to the last column.
        let amount_field = BODY.slice(line, body_field::FULL_PAYMENT);
        let full_payment = Amount::parse_exact(amount_field.trim_start_matches(' '))
            .ok_or_else(|| LayoutError::InvalidAmount {
                line: line_no,
                raw: amount_field.to_string(),
            })?;

        Ok(BodyLine {
            doc_number: doc_number.to_string(),
            doc_type,
            name: BODY.slice(line, body_field::NAME).trim().to_string(),
            job_title: BODY.slice(line, body_field::JOB_TITLE).trim().to_string(),
            full_payment,
        })
    }

    /// Converts into the payment record handed to a sink.
    pub fn into_payment(self, received_at: NaiveDateTime) -> DecodedPayment {
        DecodedPayment {
            doc_number: self.doc_number,
            doc_type: self.doc_type,
            amount: self.full_payment,
            received_at,
        }
    }
}

/// Tag `S`: the last line, carrying the body line count.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FooterLine {
    pub count: u64,
}

impl FooterLine {
    pub fn render(&self) -> Result<String> {
        FOOTER.compose(&[self.count.to_string().as_str()])
    }

    /// Parses a footer line found at 1-based position `line_no`.
    pub fn parse(line: &str, line_no: usize) -> Result<Self> {
        let count_field = FOOTER.slice(line, footer_field::BODY_COUNT);
        let count = if FOOTER.frames(line) && is_digits(count_field) {
            count_field.parse::<u64>().ok()
        } else {
            None
        };

        count
            .map(|count| FooterLine { count })
            .ok_or_else(|| LayoutError::MalformedLine {
                line: line_no,
                raw: line.to_string(),
            })
    }
}

fn is_digits(field: &str) -> bool {
    !field.is_empty() && field.bytes().all(|b| b.is_ascii_digit())
}

fn parse_date(field: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(field, DATE_FORMAT).ok()
}
