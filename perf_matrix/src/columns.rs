use log::debug;

use crate::config::{Criterion, MonthKey, RawCell, RawTable};
use crate::layout::{HeaderLayout, Layout};
use crate::months::normalize_month_label;

/// Separates the criterion from the month in single-level headers.
pub const HEADER_SEPARATOR: char = '—';

/// What a column of the source table contains.
#[derive(Eq, PartialEq, Debug, Clone)]
pub enum ColumnDescriptor {
    /// The employee name. Always the first column.
    Identity,
    Data { criterion: Criterion, month: MonthKey },
}

/// Describes the columns of a table, given its header.
///
/// Each descriptor is paired with the index of its column in the source.
/// Columns that are not understood are left out, the indexes of the
/// remaining columns are not changed.
pub fn map_columns(table: &RawTable, header: &HeaderLayout) -> Vec<(usize, ColumnDescriptor)> {
    let top = table.row(header.header_row);
    match header.layout {
        Layout::TwoLevel => map_two_level(top, table.row(header.header_row + 1)),
        Layout::SingleLevel => map_single_level(top),
    }
}

/// Criteria on the `top` row, month labels on the `bottom` row.
pub fn map_two_level(top: &[RawCell], bottom: &[RawCell]) -> Vec<(usize, ColumnDescriptor)> {
    let mut res: Vec<(usize, ColumnDescriptor)> = Vec::new();
    for (idx, cell) in top.iter().enumerate() {
        if idx == 0 {
            res.push((0, ColumnDescriptor::Identity));
            continue;
        }
        let criterion_label = cell.trimmed();
        if criterion_label.is_empty() {
            continue;
        }
        let month_label = bottom.get(idx).map(|c| c.trimmed()).unwrap_or_default();
        if let Some(desc) = data_column(idx, &criterion_label, &month_label) {
            res.push((idx, desc));
        }
    }
    res
}

/// Header cells of the form `<criterion> — <month>`.
pub fn map_single_level(header: &[RawCell]) -> Vec<(usize, ColumnDescriptor)> {
    let mut res: Vec<(usize, ColumnDescriptor)> = Vec::new();
    for (idx, cell) in header.iter().enumerate() {
        if idx == 0 {
            res.push((0, ColumnDescriptor::Identity));
            continue;
        }
        let head = cell.trimmed();
        // Only the first separator counts: the month part may contain more of them.
        let (criterion_label, month_label) = match head.split_once(HEADER_SEPARATOR) {
            Some(parts) => parts,
            None => {
                debug!("map_single_level: column {}: no separator in {:?}", idx, head);
                continue;
            }
        };
        if let Some(desc) = data_column(idx, criterion_label.trim(), month_label.trim()) {
            res.push((idx, desc));
        }
    }
    res
}

/// True if at least one column carries data.
pub fn has_data_columns(columns: &[(usize, ColumnDescriptor)]) -> bool {
    columns
        .iter()
        .any(|(_, d)| matches!(d, ColumnDescriptor::Data { .. }))
}

fn data_column(idx: usize, criterion_label: &str, month_label: &str) -> Option<ColumnDescriptor> {
    let month = normalize_month_label(month_label);
    if month.as_str().is_empty() {
        debug!("data_column: column {}: no month for {:?}", idx, criterion_label);
        return None;
    }
    match Criterion::from_label(criterion_label) {
        Some(criterion) => Some(ColumnDescriptor::Data { criterion, month }),
        None => {
            debug!(
                "data_column: column {}: dropping unknown criterion {:?}",
                idx, criterion_label
            );
            None
        }
    }
}
