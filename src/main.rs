//! Payroll Layout CLI
//!
//! Exports a payroll layout file from CSV records, or imports one back into
//! CSV payments after validating it.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- export institution.csv employees.csv > layout.txt
//! cargo run -- import layout.txt > payments.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `debug` or `info` to control logging verbosity

use payroll_layout::{
    decode_into, encode, read_entries, read_institution, write_lines, CsvPaymentSink,
    LayoutError, Result,
};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    let command = args.get(1).ok_or(LayoutError::MissingArgument)?;

    match command.as_str() {
        "export" => {
            let institution_path = args.get(2).ok_or(LayoutError::MissingArgument)?;
            let employees_path = args.get(3).ok_or(LayoutError::MissingArgument)?;
            export(institution_path, employees_path)
        }
        "import" => {
            let layout_path = args.get(2).ok_or(LayoutError::MissingArgument)?;
            import(layout_path)
        }
        other => Err(LayoutError::UnknownCommand(other.to_string())),
    }
}

fn export(institution_path: &str, employees_path: &str) -> Result<()> {
    let institution = read_institution(BufReader::new(File::open(institution_path)?))?;
    let entries = read_entries(BufReader::new(File::open(employees_path)?))?;

    if entries.is_empty() {
        return Err(LayoutError::NoEntries);
    }

    let lines = encode(&institution, &entries)?;

    let stdout = io::stdout();
    let handle = stdout.lock();
    write_lines(handle, &lines)?;

    Ok(())
}

fn import(layout_path: &str) -> Result<()> {
    let reader = BufReader::new(File::open(layout_path)?);

    let stdout = io::stdout();
    let mut sink = CsvPaymentSink::new(stdout.lock());
    decode_into(reader, &mut sink)?;

    Ok(())
}
