// Reading workbooks into raw tables.

use calamine::{open_workbook_auto, DataType, Range, Reader};

use crate::board::*;

pub fn read_excel_table(path: &str, worksheet_name: Option<&str>) -> BoardResult<RawTable> {
    let wrange = get_range(path, worksheet_name)?;
    let table = range_to_table(&wrange);
    debug!(
        "read_excel_table: {:?}: {} rows, range starts at {:?}",
        path,
        table.len(),
        wrange.start()
    );
    Ok(table)
}

fn get_range(path: &str, worksheet_name: Option<&str>) -> BoardResult<Range<DataType>> {
    debug!(
        "read_excel_table: path: {:?} worksheet: {:?}",
        path, worksheet_name
    );
    let mut workbook = open_workbook_auto(path).context(OpeningWorkbookSnafu { path })?;

    match worksheet_name {
        // A worksheet name was provided, use it.
        Some(name) => workbook
            .worksheet_range(name)
            .context(MissingWorksheetSnafu { name, path })?
            .context(OpeningWorkbookSnafu { path }),
        None => workbook
            .worksheet_range_at(0)
            .context(EmptyWorkbookSnafu { path })?
            .context(OpeningWorkbookSnafu { path }),
    }
}

/// The range of a worksheet does not start at A1 when the first rows or
/// columns are empty. They are added back so that the first column of the
/// sheet stays the first column of the table.
fn range_to_table(wrange: &Range<DataType>) -> RawTable {
    let (row_offset, col_offset) = match wrange.start() {
        Some((r, c)) => (r as usize, c as usize),
        None => return RawTable::default(),
    };
    let mut rows: Vec<Vec<RawCell>> = vec![vec![]; row_offset];
    for row in wrange.rows() {
        let mut cells: Vec<RawCell> = vec![RawCell::Empty; col_offset];
        cells.extend(row.iter().map(raw_cell));
        rows.push(cells);
    }
    RawTable::new(rows)
}

fn raw_cell(cell: &DataType) -> RawCell {
    match cell {
        DataType::Int(i) => RawCell::Number(*i as f64),
        DataType::Float(f) => RawCell::Number(*f),
        // Dates are kept as their serial number.
        DataType::DateTime(f) => RawCell::Number(*f),
        DataType::String(s) => RawCell::from(s.as_str()),
        DataType::Bool(b) => RawCell::Text(b.to_string()),
        DataType::Error(e) => RawCell::Text(e.to_string()),
        DataType::Empty => RawCell::Empty,
        #[allow(unreachable_patterns)]
        _ => RawCell::Empty,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cells() {
        assert_eq!(raw_cell(&DataType::Int(3)), RawCell::Number(3.0));
        assert_eq!(raw_cell(&DataType::Float(2.5)), RawCell::Number(2.5));
        assert_eq!(
            raw_cell(&DataType::String("Анна".to_string())),
            RawCell::Text("Анна".to_string())
        );
        assert_eq!(raw_cell(&DataType::String("".to_string())), RawCell::Empty);
        assert_eq!(
            raw_cell(&DataType::Bool(true)),
            RawCell::Text("true".to_string())
        );
        assert_eq!(raw_cell(&DataType::Empty), RawCell::Empty);
    }

    #[test]
    fn offset_range_is_padded() {
        let mut wrange: Range<DataType> = Range::new((1, 1), (2, 2));
        wrange.set_value((1, 1), DataType::String("Сотрудник".to_string()));
        wrange.set_value((1, 2), DataType::String("Отзывы — Апр 2025".to_string()));
        wrange.set_value((2, 1), DataType::String("Анна".to_string()));
        wrange.set_value((2, 2), DataType::Float(4.0));
        let table = range_to_table(&wrange);
        assert_eq!(table.len(), 3);
        assert!(table.row(0).is_empty());
        assert_eq!(
            table.row(1),
            &[
                RawCell::Empty,
                RawCell::Text("Сотрудник".to_string()),
                RawCell::Text("Отзывы — Апр 2025".to_string())
            ]
        );
    }

    #[test]
    fn title_row_offset() {
        let mut wrange: Range<DataType> = Range::new((1, 0), (2, 1));
        wrange.set_value((1, 0), DataType::String("Сотрудник".to_string()));
        wrange.set_value((1, 1), DataType::String("Отзывы — Апр 2025".to_string()));
        wrange.set_value((2, 0), DataType::String("Анна".to_string()));
        wrange.set_value((2, 1), DataType::Int(4));
        let matrix = ingest(&range_to_table(&wrange));
        assert_eq!(matrix.names(), vec!["Анна"]);
        assert_eq!(
            matrix.employees[0].get(Criterion::Reviews, &MonthKey::from_ym(2025, 4)),
            Some(&CellValue::Numeric(4.0))
        );
    }

    #[test]
    fn missing_workbook() {
        let res = read_excel_table("/nonexistent/board.xlsx", None);
        assert!(matches!(res, Err(BoardError::OpeningWorkbook { .. })));
    }
}
