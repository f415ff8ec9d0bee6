//! CSV loading and chunked CSV writing for tables

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use csv::{Reader, Writer};

use super::{Table, Value};
use crate::error::{Result, SummaryError};

/// Upper bound on rows written between flushes
pub const MAX_WRITE_CHUNK: usize = 200_000;

/// Rows per write chunk for a table of `rows` rows
pub fn chunk_size(rows: usize) -> usize {
    rows.min(MAX_WRITE_CHUNK).max(1)
}

impl Table {
    /// Load a CSV file, failing with `what` if it is absent or has no data rows
    pub fn from_csv_path<P: AsRef<Path>>(path: P, what: &str) -> Result<Table> {
        let path = path.as_ref();
        let missing = || SummaryError::MissingTable {
            what: what.to_string(),
            path: path.to_path_buf(),
        };
        if !path.is_file() {
            return Err(missing());
        }
        let table = Self::from_csv_reader(File::open(path)?)?;
        if table.is_empty() {
            return Err(missing());
        }
        Ok(table)
    }

    /// Load CSV from any reader (e.g. string buffer). Headers are lower-cased.
    pub fn from_csv_reader<R: Read>(reader: R) -> Result<Table> {
        let mut csv_reader = Reader::from_reader(reader);
        let names: Vec<String> = csv_reader
            .headers()?
            .iter()
            .map(|h| h.trim().to_lowercase())
            .collect();

        let mut columns: Vec<Vec<Value>> = vec![Vec::new(); names.len()];
        for result in csv_reader.records() {
            let record = result?;
            for (column, field) in columns.iter_mut().zip(record.iter()) {
                column.push(Value::parse(field));
            }
        }

        let mut table = Table::new();
        for (name, values) in names.into_iter().zip(columns) {
            table = table.with_column(name, values)?;
        }
        Ok(table)
    }

    /// Write the table as CSV, creating or truncating `path`
    pub fn write_csv<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.write_csv_to(File::create(path)?)
    }

    /// Write the table as CSV to any writer, flushing every chunk
    pub fn write_csv_to<W: Write>(&self, writer: W) -> Result<()> {
        let mut writer = Writer::from_writer(writer);
        writer.write_record(self.column_names())?;

        let columns = self
            .column_names()
            .iter()
            .map(|n| self.column(n))
            .collect::<Result<Vec<_>>>()?;

        let chunk = chunk_size(self.len());
        let mut record: Vec<String> = Vec::with_capacity(columns.len());
        for row in 0..self.len() {
            record.clear();
            record.extend(columns.iter().map(|c| c[row].to_string()));
            writer.write_record(&record)?;
            if (row + 1) % chunk == 0 {
                writer.flush()?;
            }
        }
        writer.flush()?;
        Ok(())
    }
}
