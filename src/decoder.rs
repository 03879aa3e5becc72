//! Validating decoder for layout files.
//!
//! A single forward pass drives an explicit state machine:
//!
//! ```text
//! ExpectHeader --E--> ExpectBodyOrFooter --S--> Done
//!                        |    ^
//!                        +-D--+
//! ```
//!
//! Decoding stops at the first line that does not fit the current state and
//! returns no partial result.

use crate::amount::Amount;
use crate::error::{LayoutError, Result};
use crate::line::{BodyLine, FooterLine, HeaderLine};
use crate::record::DecodedPayment;
use chrono::{Local, NaiveDateTime};
use log::{debug, info};
use std::io::BufRead;

/// A fully validated layout file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLayout {
    pub header: HeaderLine,
    pub payments: Vec<DecodedPayment>,
    pub footer: FooterLine,
}

impl DecodedLayout {
    /// Sum of every decoded payment.
    pub fn total(&self) -> Amount {
        let mut total = Amount::ZERO;
        for payment in &self.payments {
            total += payment.amount;
        }
        total
    }
}

enum State {
    ExpectHeader,
    ExpectBodyOrFooter(HeaderLine),
    Done(HeaderLine, FooterLine),
}

/// Decodes lines, stamping every payment with the current local time.
pub fn decode<I, S>(lines: I) -> Result<DecodedLayout>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    decode_at(lines, Local::now().naive_local())
}

/// Decodes lines, stamping every payment with `received_at`.
pub fn decode_at<I, S>(lines: I, received_at: NaiveDateTime) -> Result<DecodedLayout>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut state = State::ExpectHeader;
    let mut payments = Vec::new();
    let mut line_no = 0;

    for raw in lines {
        line_no += 1;
        let line = strip_terminator(raw.as_ref());

        state = match state {
            State::ExpectHeader => {
                let header = HeaderLine::parse(line, line_no)?;
                debug!(
                    "Line {}: header for {} dated {}",
                    line_no, header.college, header.date
                );
                State::ExpectBodyOrFooter(header)
            }
            State::ExpectBodyOrFooter(header) => match line.chars().next() {
                Some('D') => {
                    let body = BodyLine::parse(line, line_no)?;
                    debug!(
                        "Line {}: payment of {} to {}",
                        line_no, body.full_payment, body.doc_number
                    );
                    payments.push(body.into_payment(received_at));
                    State::ExpectBodyOrFooter(header)
                }
                Some('S') => {
                    let footer = FooterLine::parse(line, line_no)?;
                    if footer.count != payments.len() as u64 {
                        return Err(LayoutError::FooterCountMismatch {
                            line: line_no,
                            declared: footer.count,
                            actual: payments.len(),
                        });
                    }
                    State::Done(header, footer)
                }
                _ => return Err(malformed(line, line_no)),
            },
            State::Done(..) => return Err(malformed(line, line_no)),
        };
    }

    match state {
        State::ExpectHeader => Err(LayoutError::MissingHeader),
        State::ExpectBodyOrFooter(_) => Err(LayoutError::MissingFooter { line: line_no }),
        State::Done(header, footer) => {
            let layout = DecodedLayout {
                header,
                payments,
                footer,
            };
            info!(
                "Decoded {} payment(s) totalling {} for {}",
                layout.footer.count,
                layout.total(),
                layout.header.college
            );
            Ok(layout)
        }
    }
}

/// Decodes every line of a reader, stamping payments with the current time.
///
/// Only read failures surface as `LayoutError::Io`. A line that is not valid
/// UTF-8 is decoded lossily, so it fails the ASCII shape check at its own
/// line number like any other malformed line.
pub fn decode_reader<R: BufRead>(mut reader: R) -> Result<DecodedLayout> {
    let mut lines = Vec::new();
    let mut buf = Vec::new();

    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        lines.push(String::from_utf8_lossy(&buf).into_owned());
    }

    decode(lines)
}

fn strip_terminator(line: &str) -> &str {
    let line = line.strip_suffix('\n').unwrap_or(line);
    line.strip_suffix('\r').unwrap_or(line)
}

fn malformed(line: &str, line_no: usize) -> LayoutError {
    LayoutError::MalformedLine {
        line: line_no,
        raw: line.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use std::io::Cursor;

    const FOOTER_ONE: &str = "S000000001";

    fn header() -> String {
        format!("E{:<30}{:<10}20261019", "Ferreteria Americana", "101202303")
    }

    fn body(doc_number: &str, amount: &str) -> String {
        format!(
            "D{:<11}1{:<50}{:<30}{:>12}",
            doc_number, "Juan Perez", "Analista", amount
        )
    }

    fn lines(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    fn at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 10, 19)
            .unwrap()
            .and_hms_opt(8, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_decode_valid_file() {
        let input = lines(&[&header(), &body("40212345678", "15000.00"), FOOTER_ONE]);
        let layout = decode_at(&input, at()).unwrap();

        assert_eq!(layout.header.tax_id, "101202303");
        assert_eq!(layout.header.college, "Ferreteria Americana");
        assert_eq!(layout.footer.count, 1);
        assert_eq!(layout.payments.len(), 1);
        assert_eq!(layout.payments[0].doc_number, "40212345678");
        assert_eq!(layout.payments[0].doc_type, '1');
        assert_eq!(layout.payments[0].received_at, at());
        assert_eq!(layout.total().to_string(), "15000.00");
    }

    #[test]
    fn test_decode_empty_body() {
        let layout = decode_at(lines(&[&header(), "S000000000"]), at()).unwrap();
        assert!(layout.payments.is_empty());
    }

    #[test]
    fn test_crlf_terminators_accepted() {
        let text = format!(
            "{}\r\n{}\r\n{}\r\n",
            header(),
            body("402", "1.00"),
            FOOTER_ONE
        );
        let layout = decode_reader(Cursor::new(text)).unwrap();
        assert_eq!(layout.payments[0].doc_number, "402");
    }

    #[test]
    fn test_invalid_utf8_reports_line() {
        let mut bad_body = body("402", "1.00").into_bytes();
        bad_body[20] = 0xff;

        let mut input = header().into_bytes();
        input.push(b'\n');
        input.extend_from_slice(&bad_body);
        input.push(b'\n');
        input.extend_from_slice(FOOTER_ONE.as_bytes());
        input.push(b'\n');

        let err = decode_reader(Cursor::new(input)).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_invalid_utf8_header_reports_line() {
        let mut bad_header = header().into_bytes();
        bad_header[5] = 0xc3;
        bad_header.push(b'\n');
        bad_header.extend_from_slice(b"S000000000\n");

        let err = decode_reader(Cursor::new(bad_header)).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_empty_input() {
        let input: Vec<String> = Vec::new();
        assert!(matches!(
            decode_at(input, at()),
            Err(LayoutError::MissingHeader)
        ));
    }

    #[test]
    fn test_body_before_header() {
        let err = decode_at(lines(&[&body("402", "1.00"), FOOTER_ONE]), at()).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedHeader { line: 1, .. }));
    }

    #[test]
    fn test_unknown_tag() {
        let err = decode_at(lines(&[&header(), "X123", FOOTER_ONE]), at()).unwrap_err();
        match err {
            LayoutError::MalformedLine { line, raw } => {
                assert_eq!(line, 2);
                assert_eq!(raw, "X123");
            }
            other => panic!("Expected MalformedLine, got {:?}", other),
        }
    }

    #[test]
    fn test_second_header_is_malformed() {
        let err = decode_at(lines(&[&header(), &header(), FOOTER_ONE]), at()).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_short_body_line() {
        let mut short = body("402", "1.00");
        short.pop();
        let err = decode_at(lines(&[&header(), &short, FOOTER_ONE]), at()).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedLine { line: 2, .. }));
    }

    #[test]
    fn test_bad_amount_reports_line() {
        let input = lines(&[
            &header(),
            &body("1", "1.00"),
            &body("2", "abc"),
            "S000000002",
        ]);
        let err = decode_at(input, at()).unwrap_err();
        assert!(matches!(err, LayoutError::InvalidAmount { line: 3, .. }));
    }

    #[test]
    fn test_footer_count_mismatch() {
        let input = lines(&[&header(), &body("1", "1.00"), "S000000002"]);
        let err = decode_at(input, at()).unwrap_err();
        assert!(matches!(
            err,
            LayoutError::FooterCountMismatch {
                line: 3,
                declared: 2,
                actual: 1
            }
        ));
    }

    #[test]
    fn test_missing_footer() {
        let err = decode_at(lines(&[&header(), &body("1", "1.00")]), at()).unwrap_err();
        assert!(matches!(err, LayoutError::MissingFooter { line: 2 }));
    }

    #[test]
    fn test_line_after_footer() {
        let input = lines(&[
            &header(),
            &body("1", "1.00"),
            FOOTER_ONE,
            &body("2", "1.00"),
        ]);
        let err = decode_at(input, at()).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedLine { line: 4, .. }));
    }

    #[test]
    fn test_blank_line_after_footer() {
        let err = decode_at(lines(&[&header(), "S000000000", ""]), at()).unwrap_err();
        assert!(matches!(err, LayoutError::MalformedLine { line: 3, .. }));
    }
}
