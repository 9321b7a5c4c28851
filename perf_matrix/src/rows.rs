use log::{debug, warn};
use std::collections::HashMap;

use crate::columns::ColumnDescriptor;
use crate::config::{CellValue, EmployeeRecord, Matrix, RawCell, RawTable};

/// Names of the rows that summarize other rows (plan, actual, totals).
/// Compared in lower case.
pub const SUMMARY_ROW_LABELS: [&str; 6] = ["план", "факт", "итог", "итоги", "итого", "всего"];

pub fn is_summary_label(name: &str) -> bool {
    let lower = name.trim().to_lowercase();
    SUMMARY_ROW_LABELS.contains(&lower.as_str())
}

/// Interprets a raw cell.
///
/// Text is a number when it parses as one once commas are read as decimal
/// points. Blank cells are missing.
pub fn coerce_cell(cell: &RawCell) -> CellValue {
    match cell {
        RawCell::Empty => CellValue::Missing,
        RawCell::Number(x) if x.is_finite() => CellValue::Numeric(*x),
        RawCell::Number(x) => CellValue::Text(x.to_string()),
        RawCell::Text(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return CellValue::Missing;
            }
            match trimmed.replace(',', ".").parse::<f64>() {
                Ok(x) if x.is_finite() => CellValue::Numeric(x),
                _ => CellValue::Text(trimmed.to_string()),
            }
        }
    }
}

/// Builds the matrix from the data rows, starting at `start_row`.
///
/// Rows without a name and summary rows are skipped. When a name appears
/// several times, the last row replaces the previous ones but the employee
/// keeps the position of its first appearance. When two columns map to the
/// same criterion and month, the rightmost column wins.
pub fn normalize_rows(
    table: &RawTable,
    start_row: usize,
    columns: &[(usize, ColumnDescriptor)],
) -> Matrix {
    let mut employees: Vec<EmployeeRecord> = Vec::new();
    let mut positions: HashMap<String, usize> = HashMap::new();

    for (lineno, row) in table.rows.iter().enumerate().skip(start_row) {
        let name = row.first().map(|c| c.trimmed()).unwrap_or_default();
        if name.is_empty() || is_summary_label(&name) {
            debug!("normalize_rows: line {}: skipping row {:?}", lineno, name);
            continue;
        }

        let mut record = EmployeeRecord::new(&name);
        for (col_idx, desc) in columns.iter() {
            if let ColumnDescriptor::Data { criterion, month } = desc {
                let value = row.get(*col_idx).map(coerce_cell).unwrap_or(CellValue::Missing);
                record.set(*criterion, month.clone(), value);
            }
        }
        debug!("normalize_rows: line {}: record {:?}", lineno, record);

        match positions.get(&name) {
            Some(pos) => {
                warn!(
                    "normalize_rows: line {}: employee {:?} appears again, replacing the previous row",
                    lineno, name
                );
                employees[*pos] = record;
            }
            None => {
                positions.insert(name, employees.len());
                employees.push(record);
            }
        }
    }
    Matrix::new(employees)
}
