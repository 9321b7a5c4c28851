use std::path::Path;

use crate::board::*;

/// The supported spreadsheet formats.
#[derive(Eq, PartialEq, Debug, Clone, Copy)]
pub enum InputType {
    /// Any workbook calamine can open: xlsx, xlsm, xlsb, xls, ods.
    Excel,
    Csv,
}

pub fn parse_input_type(name: &str) -> BoardResult<InputType> {
    match name.trim().to_lowercase().as_str() {
        "excel" | "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => Ok(InputType::Excel),
        "csv" => Ok(InputType::Csv),
        _ => UnknownInputTypeSnafu { name }.fail(),
    }
}

pub fn infer_input_type(path: &str) -> BoardResult<InputType> {
    let extension = Path::new(path)
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("");
    debug!("infer_input_type: {:?} -> {:?}", path, extension);
    parse_input_type(extension)
}

pub fn simplify_file_name(path: &str) -> String {
    Path::new(path)
        .file_name()
        .and_then(|s| s.to_str())
        .unwrap_or(path)
        .to_string()
}
