//! Delimited-text spreadsheets (CSV and TSV).
//!
//! The matrix codec only needs rows of cell strings, so the physical table is
//! exchanged as CSV or TSV through the `csv` crate. Rows may differ in width;
//! short rows read as if padded with empty cells.

use std::io::{BufRead, Write};

use crate::{error::Error, formats::SpreadsheetFormat, traits::Parser};

/// A sheet of string cells, header row included.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Spreadsheet {
    pub records: Vec<Vec<String>>,
}

impl Spreadsheet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_records(records: Vec<Vec<String>>) -> Self {
        Self { records }
    }

    pub fn header(&self) -> Option<&[String]> {
        self.records.first().map(Vec::as_slice)
    }

    pub fn rows(&self) -> &[Vec<String>] {
        self.records.get(1..).unwrap_or_default()
    }
}

impl Parser for Spreadsheet {
    type Options = SpreadsheetFormat;

    fn from_reader<R: BufRead>(reader: R, options: &SpreadsheetFormat) -> Result<Self, Error> {
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(false)
            .flexible(true)
            .delimiter(options.delimiter())
            .from_reader(reader);

        let mut records = Vec::new();
        for result in rdr.records() {
            let record = result.map_err(Error::CsvParse)?;
            records.push(record.iter().map(str::to_string).collect());
        }
        Ok(Spreadsheet { records })
    }

    fn to_writer<W: Write>(&self, writer: W, options: &SpreadsheetFormat) -> Result<(), Error> {
        let mut wtr = csv::WriterBuilder::new()
            .flexible(true)
            .delimiter(options.delimiter())
            .from_writer(writer);
        for record in &self.records {
            wtr.write_record(record).map_err(Error::CsvParse)?;
        }
        wtr.flush().map_err(Error::Io)?;
        Ok(())
    }
}
