// Primitives for reading CSV files.

use std::fs::File;
use std::io::Read;

use crate::board::*;

const BOM: char = '\u{feff}';

pub fn read_csv_table(path: &str) -> BoardResult<RawTable> {
    let file = File::open(path).context(ReadingFileSnafu { path })?;
    read_csv_from(file).context(CsvReadSnafu { path })
}

/// Reads every line of a CSV source as a row of the table, the header lines included.
pub fn read_csv_from<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let rdr = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);
    let mut rows: Vec<Vec<RawCell>> = Vec::new();
    for (idx, record_r) in rdr.into_records().enumerate() {
        let record = record_r?;
        let cells: Vec<RawCell> = record
            .iter()
            .enumerate()
            .map(|(col, field)| {
                if idx == 0 && col == 0 {
                    RawCell::from(field.trim_start_matches(BOM))
                } else {
                    RawCell::from(field)
                }
            })
            .collect();
        rows.push(cells);
    }
    debug!("read_csv_from: {} rows", rows.len());
    Ok(RawTable::new(rows))
}
