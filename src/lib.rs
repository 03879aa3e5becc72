//! # Payroll Layout
//!
//! Encoder and validating decoder for the fixed-width payroll layout
//! exchanged with the paying bank: one header line, one body line per
//! payment, and one footer line carrying the payment count.
//!
//! ## Design Principles
//!
//! - **One width table**: `layout` drives both encoding and decoding offsets
//! - **Fixed-point money**: 2 decimal places via `rust_decimal`
//! - **Explicit state machine**: header first, footer last, nothing after
//! - **All or nothing**: the first bad line fails the decode with its position
//!
//! ## Example
//!
//! ```
//! use payroll_layout::{decode, encode, Amount, EmployeePaymentEntry, InstitutionInfo};
//! use std::str::FromStr;
//!
//! let institution = InstitutionInfo::new("101202303", "Ferreteria Americana");
//! let entries = vec![EmployeePaymentEntry::new(
//!     "40212345678",
//!     "1",
//!     "Juan Perez",
//!     "Analista",
//!     Amount::from_str("15000.00").unwrap(),
//! )];
//!
//! let lines = encode(&institution, &entries).unwrap();
//! assert_eq!(lines[2], "S000000001");
//!
//! let layout = decode(&lines).unwrap();
//! assert_eq!(layout.payments[0].doc_number, "40212345678");
//! ```

pub mod amount;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod layout;
pub mod line;
pub mod record;
pub mod storage;

pub use amount::Amount;
pub use decoder::{decode, decode_at, decode_reader, DecodedLayout};
pub use encoder::{encode, encode_on, write_lines};
pub use error::{LayoutError, Result};
pub use line::{BodyLine, FooterLine, HeaderLine};
pub use record::{DecodedPayment, EmployeePaymentEntry, InstitutionInfo};
pub use storage::{decode_into, read_entries, read_institution, CsvPaymentSink, PaymentSink};
