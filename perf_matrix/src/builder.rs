pub use crate::config::*;
use crate::months::months_ending_at;

use std::collections::HashMap;

/// A builder for assembling a matrix value by value.
///
/// Employees are kept in the order in which they are first mentioned.
///
/// ```
/// use perf_matrix::builder::MatrixBuilder;
/// use perf_matrix::{CellValue, Criterion, MonthKey};
///
/// let mut builder = MatrixBuilder::new();
/// builder.add_value("Анна", Criterion::Reviews, MonthKey::from_ym(2025, 3), CellValue::Numeric(4.0));
/// builder.add_employee("Борис");
/// let matrix = builder.build();
/// assert_eq!(matrix.names(), vec!["Анна", "Борис"]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct MatrixBuilder {
    _employees: Vec<EmployeeRecord>,
    _positions: HashMap<String, usize>,
}

impl MatrixBuilder {
    pub fn new() -> MatrixBuilder {
        MatrixBuilder::default()
    }

    /// Adds an employee without any value. Does nothing if the employee is already known.
    pub fn add_employee(&mut self, name: &str) -> &mut EmployeeRecord {
        let pos = match self._positions.get(name) {
            Some(pos) => *pos,
            None => {
                self._positions
                    .insert(name.to_string(), self._employees.len());
                self._employees.push(EmployeeRecord::new(name));
                self._employees.len() - 1
            }
        };
        &mut self._employees[pos]
    }

    /// Sets one value, replacing the previous one for the same cell.
    pub fn add_value(
        &mut self,
        name: &str,
        criterion: Criterion,
        month: MonthKey,
        value: CellValue,
    ) -> &mut MatrixBuilder {
        self.add_employee(name).set(criterion, month, value);
        self
    }

    pub fn build(self) -> Matrix {
        Matrix::new(self._employees)
    }
}

/// The names used by the demonstration board.
pub const SAMPLE_EMPLOYEES: [&str; 4] = ["Куратор 1", "ПМ 1", "Архитектор 1", "Архитектор 2"];

/// A small deterministic board: every sample employee, every criterion,
/// over the 6 months ending with the given month.
///
/// Complaints and churn start from 0, the other criteria from 5, and values
/// grow by one each month.
pub fn sample_matrix(year: u32, month: u32) -> Matrix {
    let months = months_ending_at(year, month, 6);
    let mut builder = MatrixBuilder::new();
    for name in SAMPLE_EMPLOYEES {
        let name_len = name.chars().count() as i64;
        for criterion in Criterion::ALL {
            let base: i64 = match criterion {
                Criterion::Complaints | Criterion::ZeroChurn => 0,
                _ => 5,
            };
            let label_len = criterion.label().chars().count() as i64;
            for (idx, m) in months.iter().enumerate() {
                let v = (base + name_len % 4 + idx as i64 - label_len % 3).max(0);
                builder.add_value(name, criterion, m.clone(), CellValue::Numeric(v as f64));
            }
        }
    }
    builder.build()
}
