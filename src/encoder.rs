//! Builds a layout file from an institution and its payment entries.
//!
//! Encoding is all-or-nothing: the first entry that cannot be represented
//! fails the whole call and no lines are returned.

use crate::error::{LayoutError, Result};
use crate::layout::{body_field, header_field, LineLayout, BODY, HEADER};
use crate::line::{BodyLine, FooterLine, HeaderLine};
use crate::record::{EmployeePaymentEntry, InstitutionInfo};
use chrono::{Local, NaiveDate};
use log::{debug, warn};
use std::io::Write;

/// Encodes `entries` dated with today's local date.
pub fn encode(
    institution: &InstitutionInfo,
    entries: &[EmployeePaymentEntry],
) -> Result<Vec<String>> {
    encode_on(institution, entries, Local::now().date_naive())
}

/// Encodes `entries` with an explicit header date.
///
/// Returns the header, one body line per entry in the order given, and a
/// footer whose count is the number of body lines actually produced.
pub fn encode_on(
    institution: &InstitutionInfo,
    entries: &[EmployeePaymentEntry],
    date: NaiveDate,
) -> Result<Vec<String>> {
    let mut lines = Vec::with_capacity(entries.len() + 2);

    lines.push(header_for(institution, date)?.render()?);

    let mut count: u64 = 0;
    for entry in entries {
        lines.push(body_for(entry)?.render()?);
        count += 1;
    }

    lines.push(FooterLine { count }.render()?);

    debug!(
        "Encoded {} payment(s) for {} dated {}",
        count,
        institution.college.trim(),
        date
    );

    Ok(lines)
}

/// Writes lines to a sink, one per `\n`-terminated line.
pub fn write_lines<W: Write>(mut writer: W, lines: &[String]) -> Result<()> {
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

fn header_for(institution: &InstitutionInfo, date: NaiveDate) -> Result<HeaderLine> {
    let college = text("college", &institution.college)?;
    required("college", college)?;
    display(&HEADER, header_field::COLLEGE, college);

    let tax_id = text("tax id", &institution.rnc)?;
    required("tax id", tax_id)?;
    identifier(&HEADER, header_field::TAX_ID, tax_id)?;

    Ok(HeaderLine {
        college: college.to_string(),
        tax_id: tax_id.to_string(),
        date,
    })
}

fn body_for(entry: &EmployeePaymentEntry) -> Result<BodyLine> {
    let doc_number = text("doc number", &entry.doc_number)?;
    required("doc number", doc_number)?;
    identifier(&BODY, body_field::DOC_NUMBER, doc_number)?;

    let doc_type = text("doc type", &entry.doc_type)?;
    let mut chars = doc_type.chars();
    let doc_type = match (chars.next(), chars.next()) {
        (Some(c), None) => c,
        _ => {
            return Err(LayoutError::InvalidInput {
                field: "doc type",
                message: format!("expected a single character, got {:?}", entry.doc_type),
            })
        }
    };

    let name = text("name", &entry.name)?;
    required("name", name)?;
    display(&BODY, body_field::NAME, name);

    let job_title = text("job title", &entry.job_title)?;
    display(&BODY, body_field::JOB_TITLE, job_title);

    if entry.full_payment.is_negative() {
        return Err(LayoutError::InvalidInput {
            field: "full payment",
            message: format!("negative amount {} for {}", entry.full_payment, doc_number),
        });
    }

    Ok(BodyLine {
        doc_number: doc_number.to_string(),
        doc_type,
        name: name.to_string(),
        job_title: job_title.to_string(),
        full_payment: entry.full_payment,
    })
}

/// Trims a text value and checks it is printable ASCII.
fn text<'a>(field: &'static str, value: &'a str) -> Result<&'a str> {
    let value = value.trim();
    if value.chars().all(|c| c.is_ascii() && !c.is_ascii_control()) {
        Ok(value)
    } else {
        Err(LayoutError::InvalidInput {
            field,
            message: format!("{:?} is not printable ASCII", value),
        })
    }
}

fn required(field: &'static str, value: &str) -> Result<()> {
    if value.is_empty() {
        return Err(LayoutError::InvalidInput {
            field,
            message: "must not be empty".to_string(),
        });
    }
    Ok(())
}

/// Identifiers cannot be truncated without changing who they identify.
fn identifier(layout: &LineLayout, index: usize, value: &str) -> Result<()> {
    let spec = &layout.fields[index];
    if value.len() > spec.width {
        return Err(LayoutError::InvalidInput {
            field: spec.name,
            message: format!("{:?} is longer than {} characters", value, spec.width),
        });
    }
    Ok(())
}

fn display(layout: &LineLayout, index: usize, value: &str) {
    let spec = &layout.fields[index];
    if value.len() > spec.width {
        warn!(
            "Truncating {} {:?} to {} characters",
            spec.name, value, spec.width
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::amount::Amount;
    use crate::layout::{BODY_WIDTH, FOOTER_WIDTH, HEADER_WIDTH};
    use std::str::FromStr;

    fn institution() -> InstitutionInfo {
        InstitutionInfo::new("101202303", "Ferreteria Americana")
    }

    fn entry(doc_number: &str, name: &str, amount: &str) -> EmployeePaymentEntry {
        EmployeePaymentEntry::new(
            doc_number,
            "1",
            name,
            "Analista",
            Amount::from_str(amount).unwrap(),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn test_single_entry_layout() {
        let lines = encode_on(
            &institution(),
            &[entry("40212345678", "Juan Perez", "15000.00")],
            date(),
        )
        .unwrap();

        assert_eq!(lines.len(), 3);
        assert_eq!(
            lines[0],
            format!("E{:<30}{:<10}20261019", "Ferreteria Americana", "101202303")
        );
        assert_eq!(
            lines[1],
            format!(
                "D402123456781{:<50}{:<30}    15000.00",
                "Juan Perez", "Analista"
            )
        );
        assert_eq!(lines[2], "S000000001");
    }

    #[test]
    fn test_widths_hold_for_every_line() {
        let entries = vec![
            entry("1", "A", "0"),
            entry("40212345678", &"N".repeat(80), "999999999.99"),
            entry("123", "Maria", "10.005"),
        ];
        let lines = encode_on(&institution(), &entries, date()).unwrap();

        assert_eq!(lines[0].len(), HEADER_WIDTH);
        for body in &lines[1..4] {
            assert_eq!(body.len(), BODY_WIDTH);
        }
        assert_eq!(lines[4].len(), FOOTER_WIDTH);
        assert_eq!(lines[4], "S000000003");
        assert!(lines[3].ends_with("       10.01"));
    }

    #[test]
    fn test_zero_entries() {
        let lines = encode_on(&institution(), &[], date()).unwrap();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[1], "S000000000");
    }

    #[test]
    fn test_long_name_is_truncated() {
        let name: String = ('a'..='z').cycle().take(60).collect();
        let lines = encode_on(&institution(), &[entry("1", &name, "1")], date()).unwrap();
        assert_eq!(&lines[1][13..63], &name[..50]);
    }

    #[test]
    fn test_short_doc_number_is_padded() {
        let lines = encode_on(&institution(), &[entry("402", "Juan", "1")], date()).unwrap();
        assert_eq!(&lines[1][1..12], "402        ");
    }

    #[test]
    fn test_rejects_empty_identifiers() {
        let err = encode_on(&institution(), &[entry("   ", "Juan", "1")], date()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidInput {
                field: "doc number",
                ..
            }
        ));

        let err = encode_on(&institution(), &[entry("402", "", "1")], date()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput { field: "name", .. }));

        let err = encode_on(&InstitutionInfo::new("", "X"), &[], date()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput { field: "tax id", .. }));
    }

    #[test]
    fn test_rejects_overlong_identifiers() {
        let err =
            encode_on(&institution(), &[entry("402123456789", "Juan", "1")], date()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidInput {
                field: "doc number",
                ..
            }
        ));
    }

    #[test]
    fn test_rejects_bad_doc_type() {
        let mut bad = entry("402", "Juan", "1");
        bad.doc_type = "CE".to_string();
        let err = encode_on(&institution(), &[bad], date()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput { field: "doc type", .. }));
    }

    #[test]
    fn test_rejects_non_ascii_and_negative_amounts() {
        let err = encode_on(&institution(), &[entry("402", "José", "1")], date()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidInput { field: "name", .. }));

        let err = encode_on(&institution(), &[entry("402", "Jose", "-1")], date()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidInput {
                field: "full payment",
                ..
            }
        ));

        let err =
            encode_on(&institution(), &[entry("402", "Jose", "1000000000")], date()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::InvalidInput {
                field: "full payment",
                ..
            }
        ));
    }

    #[test]
    fn test_write_lines_terminates_each_line() {
        let mut out = Vec::new();
        write_lines(&mut out, &["E1".to_string(), "S2".to_string()]).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "E1\nS2\n");
    }
}
