// Exporting the board as a single-level CSV file.

use std::fs::File;
use std::io::Write;

use csv::{QuoteStyle, Terminator, WriterBuilder};
use perf_matrix::layout::IDENTITY_LABEL;

use crate::board::*;

/// The header and one line per employee, criterion-major then month ascending.
pub fn export_records(
    matrix: &Matrix,
    criteria: &[Criterion],
    months: &[MonthKey],
) -> Vec<Vec<String>> {
    let mut header: Vec<String> = vec![IDENTITY_LABEL.to_string()];
    for c in criteria.iter() {
        for m in months.iter() {
            header.push(format!("{} — {}", c.label(), month_display_label(m)));
        }
    }

    let mut res: Vec<Vec<String>> = vec![header];
    for record in matrix.employees.iter() {
        let mut line: Vec<String> = vec![record.name.clone()];
        for c in criteria.iter() {
            for m in months.iter() {
                let value = record
                    .get(*c, m)
                    .map(|v| v.to_string())
                    .unwrap_or_default();
                line.push(value);
            }
        }
        res.push(line);
    }
    res
}

pub fn write_csv<W: Write>(
    writer: W,
    matrix: &Matrix,
    criteria: &[Criterion],
    months: &[MonthKey],
) -> Result<(), csv::Error> {
    let mut wtr = WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(writer);
    for line in export_records(matrix, criteria, months) {
        wtr.write_record(&line)?;
    }
    wtr.flush()?;
    Ok(())
}

pub fn export_csv_file(
    path: &str,
    matrix: &Matrix,
    criteria: &[Criterion],
    months: &[MonthKey],
) -> BoardResult<()> {
    info!(
        "Exporting {} employees, {} criteria and {} months to {:?}",
        matrix.len(),
        criteria.len(),
        months.len(),
        path
    );
    let file = File::create(path).context(WritingFileSnafu { path })?;
    write_csv(file, matrix, criteria, months).context(CsvWriteSnafu { path })
}
