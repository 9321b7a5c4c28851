use log::debug;

use crate::config::{RawCell, RawTable};

/// The label of the employee column in the exports.
pub const IDENTITY_LABEL: &str = "Сотрудник";

/// How many rows at the top of a table may hold the header.
pub const HEADER_SCAN_ROWS: usize = 5;

#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Layout {
    /// One header row, each cell being `<criterion> — <month>`.
    SingleLevel,
    /// Criteria on the header row, months on the row below.
    TwoLevel,
}

/// Where the header is, and how it is laid out.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub struct HeaderLayout {
    pub header_row: usize,
    pub layout: Layout,
}

impl HeaderLayout {
    pub fn is_two_level(&self) -> bool {
        self.layout == Layout::TwoLevel
    }

    /// The index of the first row after the header.
    pub fn data_start_row(&self) -> usize {
        match self.layout {
            Layout::SingleLevel => self.header_row + 1,
            Layout::TwoLevel => self.header_row + 2,
        }
    }
}

/// Finds the header row among the first rows and classifies its layout.
///
/// The header is the row with the most non-blank cells, the earliest one
/// winning ties. The layout is two-level when the next row has content and
/// the header has a non-blank cell other than the employee column label
/// past the first column.
///
/// Returns `None` for an empty table.
pub fn detect_header_layout(table: &RawTable) -> Option<HeaderLayout> {
    if table.is_empty() {
        return None;
    }

    let mut header_row = 0;
    let mut max_filled = 0;
    for (idx, row) in table.rows.iter().take(HEADER_SCAN_ROWS).enumerate() {
        let filled = count_filled(row);
        if filled > max_filled {
            max_filled = filled;
            header_row = idx;
        }
    }

    let header = table.row(header_row);
    let below = table.row(header_row + 1);
    let below_has_content = count_filled(below) > 0;
    let header_has_labels = header.iter().skip(1).any(|cell| {
        let s = cell.trimmed();
        !s.is_empty() && s != IDENTITY_LABEL
    });
    let layout = if below_has_content && header_has_labels {
        Layout::TwoLevel
    } else {
        Layout::SingleLevel
    };

    debug!(
        "detect_header_layout: header_row: {:?} filled: {:?} layout: {:?}",
        header_row, max_filled, layout
    );
    Some(HeaderLayout { header_row, layout })
}

fn count_filled(row: &[RawCell]) -> usize {
    row.iter().filter(|c| !c.is_blank()).count()
}
