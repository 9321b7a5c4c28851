/*!

Normalization of employee performance spreadsheets.

Exports of the performance board come in several shapes. This crate reads a
table of raw cells and turns it into a [`Matrix`]: one record per employee,
with a value for each (criterion, month) pair. It then derives the views shown
on the board: the window of recent months, the maximum value used to scale the
highlighting, the leaderboard for a criterion and the series of one employee.

Two header layouts are understood:
* single-level: one header row with cells such as `Отзывы — Апр 2025`
* two-level: criteria on the header row, month labels (`Апр 2025`, `2025-4`) on the row below

Nothing in this crate fails on malformed input: unknown criteria are dropped,
month labels that cannot be read are kept as they are, and cells that are not
numbers are kept as text.

```
use perf_matrix::*;

let table = RawTable::from_strings(&[
    &["Сотрудник", "Отзывы", "Отзывы"],
    &["", "Мар 2025", "Апр 2025"],
    &["Анна", "4", "3,5"],
    &["Итого", "4", "3,5"],
]);
let matrix = ingest(&table);
assert_eq!(matrix.names(), vec!["Анна"]);

let view = compute_view(&matrix, &ViewParams::default());
assert_eq!(view.max_value, 4.0);
assert_eq!(view.leaderboard_month, Some(MonthKey::from_ym(2025, 4)));
```

*/

pub mod builder;
pub mod columns;
mod config;
pub mod layout;
pub mod months;
pub mod rows;
pub mod views;

use log::{debug, info};

pub use crate::columns::{has_data_columns, map_columns, map_single_level, ColumnDescriptor};
pub use crate::config::*;
pub use crate::layout::{detect_header_layout, HeaderLayout, Layout};
pub use crate::months::{month_display_label, normalize_month_label};
pub use crate::rows::{coerce_cell, normalize_rows};
pub use crate::views::{compute_view, BoardView, LeaderboardEntry, Medal};

/// Reads a table and builds the matrix, detecting the header layout.
///
/// When the header looks two-level but none of its columns can be read that
/// way, while reading it as a single-level header works, the single-level
/// reading is used. This is the case of a single-level export, where the
/// first data row sits right below the header.
///
/// An empty or unrecognized table gives an empty matrix.
pub fn ingest(table: &RawTable) -> Matrix {
    let header = match detect_header_layout(table) {
        Some(h) => h,
        None => {
            info!("ingest: empty table");
            return Matrix::default();
        }
    };

    if header.is_two_level() {
        let columns = map_columns(table, &header);
        if !has_data_columns(&columns) {
            let single = HeaderLayout {
                header_row: header.header_row,
                layout: Layout::SingleLevel,
            };
            let single_columns = map_single_level(table.row(header.header_row));
            if has_data_columns(&single_columns) {
                info!(
                    "ingest: no criterion found on two levels, reading row {} as a single-level header",
                    header.header_row
                );
                return build_matrix(table, &single, &single_columns);
            }
        }
        return build_matrix(table, &header, &columns);
    }

    let columns = map_columns(table, &header);
    build_matrix(table, &header, &columns)
}

/// Reads a table with a known header, skipping the detection.
pub fn ingest_with_layout(table: &RawTable, header: &HeaderLayout) -> Matrix {
    let columns = map_columns(table, header);
    build_matrix(table, header, &columns)
}

fn build_matrix(
    table: &RawTable,
    header: &HeaderLayout,
    columns: &[(usize, ColumnDescriptor)],
) -> Matrix {
    debug!("build_matrix: header: {:?} columns: {:?}", header, columns);
    let matrix = normalize_rows(table, header.data_start_row(), columns);
    info!(
        "Read {} employees from {} rows ({} data columns, {:?} header on row {})",
        matrix.len(),
        table.len(),
        columns.len().saturating_sub(1),
        header.layout,
        header.header_row
    );
    matrix
}

#[cfg(test)]
mod tests {
    use super::*;

    fn init() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    #[test]
    fn two_level_table() {
        init();
        let table = RawTable::from_strings(&[
            &["Сотрудник", "Допродажи (Личный/Командный)", "Отзывы", "Прочее"],
            &["", "Мар 2025", "2025-4", "Мар 2025"],
            &["Анна", "3,5", "", "x"],
            &["итого", "3,5", "", "x"],
            &["Борис", "2", "n/a", "y"],
        ]);
        let m = ingest(&table);
        assert_eq!(m.names(), vec!["Анна", "Борис"]);
        let anna = &m.employees[0];
        assert_eq!(anna.data.len(), 2);
        assert_eq!(
            anna.get(Criterion::Upsell, &MonthKey::from_ym(2025, 3)),
            Some(&CellValue::Numeric(3.5))
        );
        assert_eq!(
            anna.get(Criterion::Reviews, &MonthKey::from_ym(2025, 4)),
            Some(&CellValue::Missing)
        );
        assert_eq!(
            m.employees[1].get(Criterion::Reviews, &MonthKey::from_ym(2025, 4)),
            Some(&CellValue::Text("n/a".to_string()))
        );
    }

    #[test]
    fn single_level_table_with_data_below() {
        init();
        let table = RawTable::from_strings(&[
            &["Сотрудник", "Отзывы — Апр 2025", "Отзывы — Май 2025", "Бонус — Май 2025"],
            &["Анна", "4", "5", "100"],
            &["Борис", "3", "", "200"],
        ]);
        let m = ingest(&table);
        assert_eq!(m.names(), vec!["Анна", "Борис"]);
        assert_eq!(m.employees[0].data.len(), 1);
        assert_eq!(
            m.employees[0].get(Criterion::Reviews, &MonthKey::from_ym(2025, 5)),
            Some(&CellValue::Numeric(5.0))
        );
        assert_eq!(
            m.employees[1].get(Criterion::Reviews, &MonthKey::from_ym(2025, 5)),
            Some(&CellValue::Missing)
        );
    }

    #[test]
    fn single_level_header_with_title_rows() {
        let table = RawTable::new(vec![
            vec![RawCell::from("Доска за 2025")],
            vec![
                RawCell::from("Сотрудник"),
                RawCell::from("NPS=10 — 2025-1"),
                RawCell::from("NPS=10 — 2025-2"),
            ],
            vec![RawCell::from("Анна"), RawCell::Number(10.0), RawCell::Empty],
        ]);
        let m = ingest(&table);
        assert_eq!(m.names(), vec!["Анна"]);
        assert_eq!(
            m.employees[0].get(Criterion::Nps, &MonthKey::from_ym(2025, 1)),
            Some(&CellValue::Numeric(10.0))
        );
    }

    #[test]
    fn unrecognized_tables_are_empty() {
        assert!(ingest(&RawTable::default()).is_empty());
        let table = RawTable::from_strings(&[&["Имя", "Возраст"], &["Анна", "30"]]);
        assert!(ingest(&table).is_empty());
    }

    #[test]
    fn forced_layout() {
        let table = RawTable::from_strings(&[
            &["Сотрудник", "Отзывы — Апр 2025"],
            &["Анна", "4"],
        ]);
        let header = HeaderLayout {
            header_row: 0,
            layout: Layout::TwoLevel,
        };
        // Read as two levels, the only column has no known criterion.
        let m = ingest_with_layout(&table, &header);
        assert!(m.is_empty());
        let m = ingest(&table);
        assert_eq!(m.len(), 1);
    }
}
