//! CSV-backed record source and payment sink.
//!
//! These are the collaborators around the codec: they supply the institution
//! and the employees to encode, and receive the payments a decode produced.

use crate::amount::Amount;
use crate::decoder::{decode_reader, DecodedLayout};
use crate::error::{LayoutError, Result};
use crate::record::{DecodedPayment, EmployeePaymentEntry, InstitutionInfo};
use csv::{ReaderBuilder, Trim};
use log::{debug, info};
use serde::Deserialize;
use std::io::{BufRead, Read, Write};

/// Raw employee row as read from CSV.
///
/// `active` is optional and defaults to `true`; inactive rows are skipped.
#[derive(Debug, Deserialize)]
struct EmployeeRecord {
    doc_number: String,
    doc_type: String,
    name: String,
    job_title: String,
    full_payment: Amount,
    #[serde(default = "default_active")]
    active: bool,
}

fn default_active() -> bool {
    true
}

impl EmployeeRecord {
    fn into_entry(self) -> EmployeePaymentEntry {
        EmployeePaymentEntry {
            doc_number: self.doc_number,
            doc_type: self.doc_type,
            name: self.name,
            job_title: self.job_title,
            full_payment: self.full_payment,
        }
    }
}

/// Reads the institution from the first data row of a CSV source.
pub fn read_institution<R: Read>(reader: R) -> Result<InstitutionInfo> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);

    match csv_reader.deserialize::<InstitutionInfo>().next() {
        Some(Ok(institution)) => Ok(institution),
        Some(Err(e)) => Err(LayoutError::InvalidRecord {
            row: 2,
            message: e.to_string(),
        }),
        None => Err(LayoutError::InvalidRecord {
            row: 2,
            message: "no institution row".to_string(),
        }),
    }
}

/// Reads the active employees from a CSV source, in file order.
///
/// Any row that fails to parse fails the whole read, since silently
/// dropping an employee would leave them unpaid.
pub fn read_entries<R: Read>(reader: R) -> Result<Vec<EmployeePaymentEntry>> {
    let mut csv_reader = ReaderBuilder::new().trim(Trim::All).from_reader(reader);
    let mut entries = Vec::new();

    for (row_idx, result) in csv_reader.deserialize::<EmployeeRecord>().enumerate() {
        let row_num = row_idx + 2; // 1-indexed, accounting for header row

        let record = result.map_err(|e| LayoutError::InvalidRecord {
            row: row_num,
            message: e.to_string(),
        })?;

        if !record.active {
            debug!("Row {}: Skipping inactive employee {}", row_num, record.doc_number);
            continue;
        }

        entries.push(record.into_entry());
    }

    Ok(entries)
}

/// Receives decoded payments for persistence.
pub trait PaymentSink {
    fn accept(&mut self, payment: &DecodedPayment) -> Result<()>;

    /// Called once after the last payment.
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

impl PaymentSink for Vec<DecodedPayment> {
    fn accept(&mut self, payment: &DecodedPayment) -> Result<()> {
        self.push(payment.clone());
        Ok(())
    }
}

/// Writes payments as CSV rows: `doc_number,doc_type,amount,received_at`.
pub struct CsvPaymentSink<W: Write> {
    writer: csv::Writer<W>,
}

impl<W: Write> CsvPaymentSink<W> {
    pub fn new(writer: W) -> Self {
        CsvPaymentSink {
            writer: csv::Writer::from_writer(writer),
        }
    }
}

impl<W: Write> PaymentSink for CsvPaymentSink<W> {
    fn accept(&mut self, payment: &DecodedPayment) -> Result<()> {
        self.writer.serialize(payment)?;
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        self.writer.flush()?;
        Ok(())
    }
}

/// Decodes a whole file and only then hands its payments to `sink`.
///
/// A file that fails validation delivers nothing to the sink.
pub fn decode_into<R: BufRead, S: PaymentSink>(reader: R, sink: &mut S) -> Result<DecodedLayout> {
    let layout = decode_reader(reader)?;

    for payment in &layout.payments {
        sink.accept(payment)?;
    }
    sink.finish()?;

    info!("Stored {} payment(s)", layout.payments.len());
    Ok(layout)
}
