//! CSV and JSON export of raw tables, normalized and indicator series

use csv::WriterBuilder;
use serde::Serialize;
use std::fs::File;
use std::io::Write;
use std::path::Path;

use crate::types::{NormalizedRecord, OutputRecord, RawTable, Result};

const DATE_FORMAT: &str = "%Y-%m-%d";

/// Write `date,value` rows
pub fn write_output_csv<W: Write>(writer: W, records: &[OutputRecord]) -> Result<()> {
    let mut wtr = WriterBuilder::new().from_writer(writer);
    wtr.write_record(["date", "value"])?;
    for r in records {
        wtr.write_record([r.date.format(DATE_FORMAT).to_string(), r.value.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write `date,relative_value` rows, plus `absolute_value` when any record has one
pub fn write_normalized_csv<W: Write>(writer: W, records: &[NormalizedRecord]) -> Result<()> {
    let with_absolute = records.iter().any(|r| r.absolute_value.is_some());
    let mut wtr = WriterBuilder::new().from_writer(writer);

    if with_absolute {
        wtr.write_record(["date", "relative_value", "absolute_value"])?;
    } else {
        wtr.write_record(["date", "relative_value"])?;
    }

    for r in records {
        let date = r.date.format(DATE_FORMAT).to_string();
        let relative = r.relative_value.to_string();
        if with_absolute {
            let absolute = r.absolute_value.map(|a| a.to_string()).unwrap_or_default();
            wtr.write_record([date, relative, absolute])?;
        } else {
            wtr.write_record([date, relative])?;
        }
    }
    wtr.flush()?;
    Ok(())
}

/// Write a fetched table as is, header row first; short rows stay short
pub fn write_raw_csv<W: Write>(writer: W, table: &RawTable) -> Result<()> {
    let mut wtr = WriterBuilder::new().flexible(true).from_writer(writer);
    wtr.write_record(&table.headers)?;
    for row in &table.rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn write_raw_csv_file(path: &Path, table: &RawTable) -> Result<()> {
    write_raw_csv(File::create(path)?, table)
}

pub fn write_output_csv_file(path: &Path, records: &[OutputRecord]) -> Result<()> {
    write_output_csv(File::create(path)?, records)
}

pub fn write_normalized_csv_file(path: &Path, records: &[NormalizedRecord]) -> Result<()> {
    write_normalized_csv(File::create(path)?, records)
}

/// Pretty JSON array of any serializable records
pub fn write_json<W: Write, T: Serialize>(writer: W, records: &[T]) -> Result<()> {
    serde_json::to_writer_pretty(writer, records)?;
    Ok(())
}
