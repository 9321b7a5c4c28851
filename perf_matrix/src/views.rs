use log::debug;
use std::cmp::Ordering;
use std::collections::BTreeSet;

use crate::config::{CellValue, Criterion, EmployeeRecord, Matrix, MonthKey, ViewParams};

/// The medals handed to the first three places of a leaderboard.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum Medal {
    Gold,
    Silver,
    Bronze,
}

impl Medal {
    pub fn for_rank(rank: usize) -> Option<Medal> {
        match rank {
            1 => Some(Medal::Gold),
            2 => Some(Medal::Silver),
            3 => Some(Medal::Bronze),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Medal::Gold => "gold",
            Medal::Silver => "silver",
            Medal::Bronze => "bronze",
        }
    }
}

#[derive(PartialEq, Debug, Clone)]
pub struct LeaderboardEntry {
    /// Starts at 1.
    pub rank: usize,
    pub name: String,
    pub value: f64,
    /// The value relative to the first entry.
    pub share: f64,
    pub medal: Option<Medal>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct SeriesCell {
    pub month: MonthKey,
    pub value: CellValue,
    /// Between 0 and 1, only for numeric values.
    pub intensity: Option<f64>,
}

/// The values of one criterion over the window, for one employee.
#[derive(PartialEq, Debug, Clone)]
pub struct SeriesRow {
    pub criterion: Criterion,
    pub cells: Vec<SeriesCell>,
}

#[derive(PartialEq, Debug, Clone)]
pub struct EmployeeView {
    pub name: String,
    pub series: Vec<SeriesRow>,
}

/// All the views derived from a matrix for a given set of parameters.
#[derive(PartialEq, Debug, Clone)]
pub struct BoardView {
    pub months: Vec<MonthKey>,
    pub max_value: f64,
    pub criteria: Vec<Criterion>,
    pub employee: Option<EmployeeView>,
    pub leaderboard_criterion: Criterion,
    /// The last month of the window, if any.
    pub leaderboard_month: Option<MonthKey>,
    pub leaderboard: Vec<LeaderboardEntry>,
}

/// Every month key present in the matrix, sorted.
pub fn all_months(matrix: &Matrix) -> Vec<MonthKey> {
    let months: BTreeSet<&MonthKey> = matrix.employees.iter().flat_map(|r| r.months()).collect();
    months.into_iter().cloned().collect()
}

/// The `size` most recent months, oldest first.
///
/// The size is clamped between 1 and the number of months available.
pub fn month_window(matrix: &Matrix, size: usize) -> Vec<MonthKey> {
    let months = all_months(matrix);
    let size = size.clamp(1, months.len().max(1));
    let start = months.len().saturating_sub(size);
    months[start..].to_vec()
}

/// The largest numeric value over the given months and all the criteria.
///
/// Never returns 0: when nothing above 0 was found, the result is 1.
pub fn max_value(matrix: &Matrix, months: &[MonthKey]) -> f64 {
    let mut max = 0.0_f64;
    for record in matrix.employees.iter() {
        for criterion in Criterion::ALL {
            for month in months {
                if let Some(x) = record.get(criterion, month).and_then(|v| v.as_number()) {
                    max = max.max(x);
                }
            }
        }
    }
    if max == 0.0 {
        1.0
    } else {
        max
    }
}

/// How strongly a value should be highlighted, relative to the maximum.
pub fn intensity(value: &CellValue, max: f64) -> Option<f64> {
    let max = if max == 0.0 { 1.0 } else { max };
    value.as_number().map(|x| (x / max).clamp(0.0, 1.0))
}

/// Ranks all the employees by their value for one criterion and month.
///
/// Missing and non-numeric values count as 0. Employees with equal values
/// keep the order of the matrix. Without a month, everybody is at 0.
pub fn leaderboard(
    matrix: &Matrix,
    criterion: Criterion,
    month: Option<&MonthKey>,
) -> Vec<LeaderboardEntry> {
    let mut scores: Vec<(&str, f64)> = matrix
        .employees
        .iter()
        .map(|r| {
            let v = month
                .and_then(|m| r.get(criterion, m))
                .and_then(|v| v.as_number())
                .unwrap_or(0.0);
            (r.name.as_str(), v)
        })
        .collect();
    // Stable sort: ties stay in matrix order.
    scores.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));

    let top = match scores.first() {
        Some((_, x)) if *x != 0.0 => *x,
        _ => 1.0,
    };
    scores
        .into_iter()
        .enumerate()
        .map(|(idx, (name, value))| LeaderboardEntry {
            rank: idx + 1,
            name: name.to_string(),
            value,
            share: value / top,
            medal: Medal::for_rank(idx + 1),
        })
        .collect()
}

/// The values of an employee for each of the criteria over the months.
pub fn employee_series(
    record: &EmployeeRecord,
    criteria: &[Criterion],
    months: &[MonthKey],
    max: f64,
) -> Vec<SeriesRow> {
    criteria
        .iter()
        .map(|criterion| SeriesRow {
            criterion: *criterion,
            cells: months
                .iter()
                .map(|month| {
                    let value = record
                        .get(*criterion, month)
                        .cloned()
                        .unwrap_or(CellValue::Missing);
                    let intensity = intensity(&value, max);
                    SeriesCell {
                        month: month.clone(),
                        value,
                        intensity,
                    }
                })
                .collect(),
        })
        .collect()
}

/// Computes all the views for the given parameters.
pub fn compute_view(matrix: &Matrix, params: &ViewParams) -> BoardView {
    let months = month_window(matrix, params.window_size);
    let max = max_value(matrix, &months);
    let leaderboard_month = months.last().cloned();
    let board = leaderboard(
        matrix,
        params.leaderboard_criterion,
        leaderboard_month.as_ref(),
    );

    let selected = params
        .employee
        .as_deref()
        .and_then(|name| matrix.find(name))
        .or_else(|| matrix.employees.first());
    let employee = selected.map(|record| EmployeeView {
        name: record.name.clone(),
        series: employee_series(record, &params.criteria, &months, max),
    });

    debug!(
        "compute_view: months: {:?} max: {:?} employee: {:?}",
        months,
        max,
        employee.as_ref().map(|e| &e.name)
    );

    BoardView {
        months,
        max_value: max,
        criteria: params.criteria.clone(),
        employee,
        leaderboard_criterion: params.leaderboard_criterion,
        leaderboard_month,
        leaderboard: board,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::MatrixBuilder;

    fn six_months() -> Matrix {
        let mut b = MatrixBuilder::new();
        for m in 1..=6 {
            b.add_value(
                "Анна",
                Criterion::Reviews,
                MonthKey::from_ym(2025, m),
                CellValue::Numeric(m as f64),
            );
        }
        b.build()
    }

    #[test]
    fn window_keeps_the_last_months() {
        let w = month_window(&six_months(), 3);
        let keys: Vec<&str> = w.iter().map(|m| m.as_str()).collect();
        assert_eq!(keys, vec!["2025-04", "2025-05", "2025-06"]);
    }

    #[test]
    fn window_is_clamped() {
        assert_eq!(month_window(&six_months(), 0).len(), 1);
        assert_eq!(month_window(&six_months(), 12).len(), 6);
        assert!(month_window(&Matrix::default(), 3).is_empty());
    }

    #[test]
    fn window_across_criteria_and_employees() {
        let mut b = MatrixBuilder::new();
        let dec = MonthKey::from_ym(2024, 12);
        let feb = MonthKey::from_ym(2025, 2);
        b.add_value("Анна", Criterion::Reviews, dec, CellValue::Missing)
            .add_value("Борис", Criterion::Nps, feb, CellValue::Numeric(1.0));
        let w = month_window(&b.build(), 6);
        let keys: Vec<&str> = w.iter().map(|m| m.as_str()).collect();
        assert_eq!(keys, vec!["2024-12", "2025-02"]);
    }

    #[test]
    fn max_value_over_window() {
        let m = six_months();
        let w = month_window(&m, 3);
        assert_eq!(max_value(&m, &w), 6.0);
        let early = vec![MonthKey::from_ym(2025, 1), MonthKey::from_ym(2025, 2)];
        assert_eq!(max_value(&m, &early), 2.0);
    }

    #[test]
    fn max_value_without_numbers_is_one() {
        let mut b = MatrixBuilder::new();
        let m1 = MonthKey::from_ym(2025, 1);
        b.add_value("Анна", Criterion::Reviews, m1.clone(), CellValue::Text("n/a".to_string()));
        b.add_value("Борис", Criterion::Reviews, m1.clone(), CellValue::Missing);
        let m = b.build();
        assert_eq!(max_value(&m, &[m1]), 1.0);
        assert_eq!(max_value(&Matrix::default(), &[]), 1.0);
    }

    #[test]
    fn leaderboard_ties_keep_matrix_order() {
        let month = MonthKey::from_ym(2025, 6);
        let mut b = MatrixBuilder::new();
        b.add_value("Анна", Criterion::Upsell, month.clone(), CellValue::Numeric(5.0));
        b.add_value("Борис", Criterion::Upsell, month.clone(), CellValue::Numeric(5.0));
        b.add_value("Вера", Criterion::Upsell, month.clone(), CellValue::Numeric(2.0));
        let m = b.build();
        let lb = leaderboard(&m, Criterion::Upsell, Some(&month));
        let names: Vec<(&str, f64)> = lb.iter().map(|e| (e.name.as_str(), e.value)).collect();
        assert_eq!(names, vec![("Анна", 5.0), ("Борис", 5.0), ("Вера", 2.0)]);
        assert_eq!(lb[2].share, 0.4);
        assert_eq!(lb[0].medal, Some(Medal::Gold));
        assert_eq!(lb[2].rank, 3);
    }

    #[test]
    fn leaderboard_defaults_to_zero() {
        let month = MonthKey::from_ym(2025, 6);
        let mut b = MatrixBuilder::new();
        b.add_value("Анна", Criterion::Upsell, month.clone(), CellValue::Text("-".to_string()));
        b.add_value("Борис", Criterion::Reviews, month.clone(), CellValue::Numeric(3.0));
        b.add_value("Вера", Criterion::Upsell, month.clone(), CellValue::Numeric(1.0));
        let m = b.build();
        let lb = leaderboard(&m, Criterion::Upsell, Some(&month));
        let names: Vec<(&str, f64)> = lb.iter().map(|e| (e.name.as_str(), e.value)).collect();
        assert_eq!(names, vec![("Вера", 1.0), ("Анна", 0.0), ("Борис", 0.0)]);

        let empty = leaderboard(&m, Criterion::Upsell, None);
        assert!(empty.iter().all(|e| e.value == 0.0 && e.share == 0.0));
        assert_eq!(empty[0].name, "Анна");
    }

    #[test]
    fn intensity_is_clamped() {
        assert_eq!(intensity(&CellValue::Numeric(5.0), 10.0), Some(0.5));
        assert_eq!(intensity(&CellValue::Numeric(-2.0), 10.0), Some(0.0));
        assert_eq!(intensity(&CellValue::Numeric(20.0), 10.0), Some(1.0));
        assert_eq!(intensity(&CellValue::Text("x".to_string()), 10.0), None);
        assert_eq!(intensity(&CellValue::Missing, 10.0), None);
    }

    #[test]
    fn view_selects_employee() {
        let m = six_months();
        let params = ViewParams {
            window_size: 2,
            criteria: vec![Criterion::Reviews, Criterion::Nps],
            leaderboard_criterion: Criterion::Reviews,
            employee: Some("Никто".to_string()),
        };
        let v = compute_view(&m, &params);
        assert_eq!(v.months.len(), 2);
        assert_eq!(v.max_value, 6.0);
        assert_eq!(v.leaderboard_month, Some(MonthKey::from_ym(2025, 6)));
        let e = v.employee.unwrap();
        assert_eq!(e.name, "Анна");
        assert_eq!(e.series.len(), 2);
        assert_eq!(e.series[0].cells[1].value, CellValue::Numeric(6.0));
        assert_eq!(e.series[0].cells[1].intensity, Some(1.0));
        assert_eq!(e.series[1].cells[0].value, CellValue::Missing);
        assert_eq!(e.series[1].cells[0].intensity, None);
    }

    #[test]
    fn view_of_empty_matrix() {
        let v = compute_view(&Matrix::default(), &ViewParams::default());
        assert!(v.months.is_empty());
        assert_eq!(v.max_value, 1.0);
        assert!(v.employee.is_none());
        assert!(v.leaderboard.is_empty());
        assert_eq!(v.leaderboard_month, None);
    }
}
