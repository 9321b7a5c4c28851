// ********* Input data structures ***********

use std::collections::BTreeMap;
use std::fmt::Display;

/// A cell of a raw table, as handed over by a file reader.
///
/// Nothing is interpreted at this stage: a number stays a number, everything
/// else that is not empty is kept as text.
#[derive(PartialEq, Debug, Clone)]
pub enum RawCell {
    Empty,
    Number(f64),
    Text(String),
}

impl RawCell {
    /// The textual form of the cell, as it would be displayed.
    pub fn text(&self) -> String {
        match self {
            RawCell::Empty => "".to_string(),
            RawCell::Number(n) => n.to_string(),
            RawCell::Text(s) => s.clone(),
        }
    }

    /// The textual form with the surrounding whitespace removed.
    pub fn trimmed(&self) -> String {
        self.text().trim().to_string()
    }

    pub fn is_blank(&self) -> bool {
        match self {
            RawCell::Empty => true,
            RawCell::Number(_) => false,
            RawCell::Text(s) => s.trim().is_empty(),
        }
    }
}

impl From<&str> for RawCell {
    fn from(s: &str) -> RawCell {
        if s.is_empty() {
            RawCell::Empty
        } else {
            RawCell::Text(s.to_string())
        }
    }
}

/// Rows of raw cells. Rows do not need to have the same length.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct RawTable {
    pub rows: Vec<Vec<RawCell>>,
}

impl RawTable {
    pub fn new(rows: Vec<Vec<RawCell>>) -> RawTable {
        RawTable { rows }
    }

    /// Builds a table where every cell is given as a string.
    pub fn from_strings(rows: &[&[&str]]) -> RawTable {
        RawTable {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|s| RawCell::from(*s)).collect())
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// The row at the given index, or an empty row past the end of the table.
    pub fn row(&self, idx: usize) -> &[RawCell] {
        self.rows.get(idx).map(|r| r.as_slice()).unwrap_or(&[])
    }
}

/// The closed set of criteria tracked on the board.
///
/// The order of the variants is the display order.
#[derive(Eq, PartialEq, Debug, Clone, Copy, Hash, Ord, PartialOrd)]
pub enum Criterion {
    Upsell,
    Reviews,
    SalarySpeed,
    PreClosing,
    Nps,
    Complaints,
    ZeroChurn,
}

impl Criterion {
    pub const ALL: [Criterion; 7] = [
        Criterion::Upsell,
        Criterion::Reviews,
        Criterion::SalarySpeed,
        Criterion::PreClosing,
        Criterion::Nps,
        Criterion::Complaints,
        Criterion::ZeroChurn,
    ];

    /// The label used in the spreadsheet headers.
    pub fn label(&self) -> &'static str {
        match self {
            Criterion::Upsell => "Допродажи (Личный/Командный)",
            Criterion::Reviews => "Отзывы",
            Criterion::SalarySpeed => "Ср. скорость ЗП",
            Criterion::PreClosing => "FG предзакрытия=100%",
            Criterion::Nps => "NPS=10",
            Criterion::Complaints => "Рекламации",
            Criterion::ZeroChurn => "Нулевой чёрн",
        }
    }

    /// Finds the criterion with exactly this (already trimmed) label.
    pub fn from_label(label: &str) -> Option<Criterion> {
        Criterion::ALL.iter().find(|c| c.label() == label).copied()
    }
}

impl Display for Criterion {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A month, in the canonical `YYYY-MM` form when the label could be understood.
///
/// Labels that could not be normalized are kept verbatim (trimmed). They still
/// sort and compare, but not necessarily in chronological order.
#[derive(Eq, PartialEq, Debug, Clone, Hash, Ord, PartialOrd)]
pub struct MonthKey(pub(crate) String);

impl MonthKey {
    pub fn from_ym(year: u32, month: u32) -> MonthKey {
        MonthKey(format!("{:04}-{:02}", year, month))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// The (year, month) pair of a canonical key, `None` for an opaque key.
    pub fn year_month(&self) -> Option<(u32, u32)> {
        let b = self.0.as_bytes();
        if b.len() != 7 || b[4] != b'-' {
            return None;
        }
        let year: u32 = self.0[0..4].parse().ok()?;
        let month: u32 = self.0[5..7].parse().ok()?;
        if (1..=12).contains(&month) && self.0[0..4].bytes().all(|c| c.is_ascii_digit()) {
            Some((year, month))
        } else {
            None
        }
    }

    pub fn is_canonical(&self) -> bool {
        self.year_month().is_some()
    }
}

impl Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ******** Normalized data structures *********

/// The interpreted content of a cell.
#[derive(PartialEq, Debug, Clone)]
pub enum CellValue {
    Numeric(f64),
    Text(String),
    Missing,
}

impl CellValue {
    pub fn as_number(&self) -> Option<f64> {
        match self {
            CellValue::Numeric(x) => Some(*x),
            _ => None,
        }
    }
}

/// Numbers are written in their shortest form, text as is, missing values as nothing.
impl Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CellValue::Numeric(x) => write!(f, "{}", x),
            CellValue::Text(s) => write!(f, "{}", s),
            CellValue::Missing => Ok(()),
        }
    }
}

/// All the values for one employee, by criterion then by month.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct EmployeeRecord {
    pub name: String,
    pub data: BTreeMap<Criterion, BTreeMap<MonthKey, CellValue>>,
}

impl EmployeeRecord {
    pub fn new(name: &str) -> EmployeeRecord {
        EmployeeRecord {
            name: name.to_string(),
            data: BTreeMap::new(),
        }
    }

    pub fn get(&self, criterion: Criterion, month: &MonthKey) -> Option<&CellValue> {
        self.data.get(&criterion).and_then(|m| m.get(month))
    }

    /// Stores a value, replacing any previous value for the same cell.
    pub fn set(&mut self, criterion: Criterion, month: MonthKey, value: CellValue) {
        self.data.entry(criterion).or_default().insert(month, value);
    }

    /// All the month keys with an entry, for any criterion. May contain duplicates.
    pub fn months(&self) -> impl Iterator<Item = &MonthKey> {
        self.data.values().flat_map(|m| m.keys())
    }
}

/// The canonical matrix: one record per employee, in order of first appearance.
#[derive(PartialEq, Debug, Clone, Default)]
pub struct Matrix {
    pub employees: Vec<EmployeeRecord>,
}

impl Matrix {
    pub fn new(employees: Vec<EmployeeRecord>) -> Matrix {
        Matrix { employees }
    }

    pub fn len(&self) -> usize {
        self.employees.len()
    }

    pub fn is_empty(&self) -> bool {
        self.employees.is_empty()
    }

    pub fn find(&self, name: &str) -> Option<&EmployeeRecord> {
        self.employees.iter().find(|r| r.name == name)
    }

    pub fn names(&self) -> Vec<String> {
        self.employees.iter().map(|r| r.name.clone()).collect()
    }
}

// ********* View parameters **********

/// The default number of months shown.
pub const DEFAULT_WINDOW_SIZE: usize = 6;

/// Everything the derived views depend on, besides the matrix itself.
#[derive(PartialEq, Debug, Clone)]
pub struct ViewParams {
    /// Number of most recent months to keep.
    pub window_size: usize,
    /// The criteria to show, in display order.
    pub criteria: Vec<Criterion>,
    pub leaderboard_criterion: Criterion,
    /// The employee to show. The first employee is used when missing or unknown.
    pub employee: Option<String>,
}

impl Default for ViewParams {
    fn default() -> ViewParams {
        ViewParams {
            window_size: DEFAULT_WINDOW_SIZE,
            criteria: Criterion::ALL.to_vec(),
            leaderboard_criterion: Criterion::ALL[0],
            employee: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn criterion_labels_round_trip() {
        for c in Criterion::ALL {
            assert_eq!(Criterion::from_label(c.label()), Some(c));
        }
        assert_eq!(Criterion::from_label("Отзывы "), None);
        assert_eq!(Criterion::from_label("Продажи"), None);
    }

    #[test]
    fn raw_cell_text() {
        assert_eq!(RawCell::Number(5.0).text(), "5");
        assert_eq!(RawCell::Number(3.5).text(), "3.5");
        assert_eq!(RawCell::from("  a ").trimmed(), "a");
        assert!(RawCell::from("   ").is_blank());
        assert!(!RawCell::Number(0.0).is_blank());
    }

    #[test]
    fn month_key_year_month() {
        assert_eq!(MonthKey::from_ym(2025, 3).as_str(), "2025-03");
        assert_eq!(MonthKey::from_ym(2025, 3).year_month(), Some((2025, 3)));
        assert_eq!(MonthKey("Q1 2025".to_string()).year_month(), None);
        assert_eq!(MonthKey("2025-13".to_string()).year_month(), None);
        assert!(MonthKey::from_ym(2025, 3).is_canonical());
        assert!(!MonthKey("Q1 2025".to_string()).is_canonical());
    }

    #[test]
    fn record_set_replaces() {
        let mut r = EmployeeRecord::new("Анна");
        let m = MonthKey::from_ym(2025, 1);
        r.set(Criterion::Reviews, m.clone(), CellValue::Numeric(1.0));
        r.set(Criterion::Reviews, m.clone(), CellValue::Numeric(2.0));
        assert_eq!(r.get(Criterion::Reviews, &m), Some(&CellValue::Numeric(2.0)));
        assert_eq!(r.get(Criterion::Nps, &m), None);
    }

    #[test]
    fn cell_value_display() {
        assert_eq!(CellValue::Numeric(4.0).to_string(), "4");
        assert_eq!(CellValue::Numeric(3.5).to_string(), "3.5");
        assert_eq!(CellValue::Text("n/a".to_string()).to_string(), "n/a");
        assert_eq!(CellValue::Missing.to_string(), "");
    }
}
