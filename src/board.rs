use log::{debug, info, warn};

use perf_matrix::builder::sample_matrix;
use perf_matrix::*;
use snafu::{prelude::*, Snafu};

use std::fs;

use serde_json::json;
use serde_json::Value as JSValue;
use text_diff::print_diff;

use crate::args::Args;

pub mod awards;
mod config_reader;
mod export;
mod io_common;
mod io_csv;
mod io_excel;

use crate::board::awards::AwardStore;
use crate::board::config_reader::*;
use crate::board::io_common::{infer_input_type, parse_input_type, simplify_file_name, InputType};

/// The last month of the demonstration board.
const DEMO_YEAR: u32 = 2025;
const DEMO_MONTH: u32 = 8;

/// How many awards are listed next to each leaderboard entry.
const LEADERBOARD_AWARDS_SHOWN: usize = 5;

#[derive(Debug, Snafu)]
pub enum BoardError {
    #[snafu(display("Error opening workbook {path}"))]
    OpeningWorkbook {
        source: calamine::Error,
        path: String,
    },
    #[snafu(display("Worksheet {name:?} not found in {path}"))]
    MissingWorksheet { name: String, path: String },
    #[snafu(display("Workbook {path} has no worksheet"))]
    EmptyWorkbook { path: String },
    #[snafu(display("Error reading CSV file {path}"))]
    CsvRead { source: csv::Error, path: String },
    #[snafu(display("Error writing CSV file {path}"))]
    CsvWrite { source: csv::Error, path: String },
    #[snafu(display("Error reading {path}"))]
    ReadingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error writing {path}"))]
    WritingFile {
        source: std::io::Error,
        path: String,
    },
    #[snafu(display("Error parsing JSON"))]
    ParsingJson { source: serde_json::Error },
    #[snafu(display("Error serializing JSON"))]
    SerializingJson { source: serde_json::Error },
    #[snafu(display("The configuration file has no parent directory"))]
    MissingParentDir {},
    #[snafu(display("Unknown criterion {label:?}"))]
    UnknownCriterion { label: String },
    #[snafu(display("Unknown input type {name:?} (expected excel or csv)"))]
    UnknownInputType { name: String },
    #[snafu(display("Unknown award {id:?}"))]
    UnknownAward { id: String },
    #[snafu(display("Unknown employee {name:?}"))]
    UnknownEmployee { name: String },
    #[snafu(display("No employee to give or revoke an award"))]
    NoEmployee {},
    #[snafu(display("Could not recognize {path}: check the format of the headers"))]
    UnrecognizedFile { path: String },

    #[snafu(whatever, display("{message}"))]
    Whatever {
        message: String,
        #[snafu(source(from(Box<dyn std::error::Error>, Some)))]
        source: Option<Box<dyn std::error::Error>>,
    },
}

pub type BoardResult<T> = Result<T, BoardError>;

/// Everything needed to produce the board, once the configuration and the
/// command line have been merged.
#[derive(PartialEq, Debug, Clone)]
pub struct BoardSettings {
    pub input: Option<String>,
    pub input_type: Option<InputType>,
    pub worksheet_name: Option<String>,
    pub params: ViewParams,
    pub awards_file: Option<String>,
    pub out: Option<String>,
    pub export_csv: Option<String>,
    pub reference: Option<String>,
}

/// The command line takes precedence over the configuration file.
fn resolve_settings(args: &Args, config: BoardConfig) -> BoardResult<BoardSettings> {
    let input_type = match args.input_type.clone().or(config.input_type) {
        Some(name) => Some(parse_input_type(&name)?),
        None => None,
    };
    let criteria = match args.criteria.clone().or(config.criteria) {
        Some(labels) => parse_criteria(&labels)?,
        None => Criterion::ALL.to_vec(),
    };
    let leaderboard_criterion = match args.leaderboard.clone().or(config.leaderboard_criterion) {
        Some(label) => parse_criterion(&label)?,
        None => Criterion::ALL[0],
    };
    let params = ViewParams {
        window_size: args
            .months
            .or(config.months_count)
            .unwrap_or(DEFAULT_WINDOW_SIZE),
        criteria,
        leaderboard_criterion,
        employee: args.employee.clone().or(config.employee),
    };
    Ok(BoardSettings {
        input: args.input.clone().or(config.input_file),
        input_type,
        worksheet_name: args.excel_worksheet_name.clone().or(config.worksheet_name),
        params,
        awards_file: args.awards.clone().or(config.awards_file),
        out: args.out.clone().or(config.output_file),
        export_csv: args.export_csv.clone().or(config.export_csv_file),
        reference: args.reference.clone(),
    })
}

fn load_matrix(settings: &BoardSettings) -> BoardResult<Matrix> {
    let path = match &settings.input {
        Some(p) => p.clone(),
        None => {
            info!("No input file, using the demonstration board");
            return Ok(sample_matrix(DEMO_YEAR, DEMO_MONTH));
        }
    };
    let input_type = match settings.input_type {
        Some(t) => t,
        None => infer_input_type(&path)?,
    };
    info!("Attempting to read board file {:?} as {:?}", path, input_type);
    let table = match input_type {
        InputType::Excel => io_excel::read_excel_table(&path, settings.worksheet_name.as_deref())?,
        InputType::Csv => io_csv::read_csv_table(&path)?,
    };
    let matrix = ingest(&table);
    ensure!(
        !matrix.is_empty(),
        UnrecognizedFileSnafu { path: path.clone() }
    );
    info!(
        "{}: {} employees",
        simplify_file_name(&path),
        matrix.len()
    );
    Ok(matrix)
}

/// The employee who receives or loses an award: the requested one, which must exist,
/// or the employee shown on the board.
fn award_target(matrix: &Matrix, view: &BoardView, requested: Option<&str>) -> BoardResult<String> {
    match requested {
        Some(name) => {
            let record = matrix
                .find(name)
                .context(UnknownEmployeeSnafu { name })?;
            Ok(record.name.clone())
        }
        None => Ok(view.employee.as_ref().context(NoEmployeeSnafu {})?.name.clone()),
    }
}

fn cell_to_js(value: &CellValue) -> JSValue {
    match value {
        CellValue::Numeric(x) => json!(x),
        CellValue::Text(s) => json!(s),
        CellValue::Missing => JSValue::Null,
    }
}

fn build_summary_js(view: &BoardView, store: &AwardStore) -> JSValue {
    let months: Vec<JSValue> = view
        .months
        .iter()
        .map(|m| json!({"key": m.as_str(), "label": month_display_label(m)}))
        .collect();

    let employee = match &view.employee {
        Some(e) => {
            let series: Vec<JSValue> = e
                .series
                .iter()
                .map(|row| {
                    let cells: Vec<JSValue> = row
                        .cells
                        .iter()
                        .map(|c| {
                            json!({
                                "month": c.month.as_str(),
                                "value": cell_to_js(&c.value),
                                "intensity": c.intensity,
                            })
                        })
                        .collect();
                    json!({"criterion": row.criterion.label(), "cells": cells})
                })
                .collect();
            json!({"name": e.name, "awards": store.awards_of(&e.name), "series": series})
        }
        None => JSValue::Null,
    };

    let entries: Vec<JSValue> = view
        .leaderboard
        .iter()
        .map(|entry| {
            let awards: Vec<&String> = store
                .awards_of(&entry.name)
                .iter()
                .take(LEADERBOARD_AWARDS_SHOWN)
                .collect();
            json!({
                "rank": entry.rank,
                "name": entry.name,
                "value": entry.value,
                "share": entry.share,
                "medal": entry.medal.map(|m| m.name()),
                "awards": awards,
            })
        })
        .collect();

    json!({
        "months": months,
        "maxValue": view.max_value,
        "criteria": view.criteria.iter().map(|c| c.label()).collect::<Vec<&str>>(),
        "employee": employee,
        "leaderboard": {
            "criterion": view.leaderboard_criterion.label(),
            "month": view.leaderboard_month.as_ref().map(|m| m.as_str()),
            "entries": entries,
        },
    })
}

fn write_summary(out: Option<&str>, contents: &str) -> BoardResult<()> {
    match out {
        None | Some("stdout") => {
            println!("{}", contents);
            Ok(())
        }
        Some("") => {
            debug!("write_summary: no output requested");
            Ok(())
        }
        Some(path) => {
            info!("Writing summary to {:?}", path);
            fs::write(path, contents).context(WritingFileSnafu { path })
        }
    }
}

fn read_reference(path: &str) -> BoardResult<JSValue> {
    let contents = fs::read_to_string(path).context(ReadingFileSnafu { path })?;
    serde_json::from_str(contents.as_str()).context(ParsingJsonSnafu {})
}

fn check_reference(path: &str, pretty_summary: &str) -> BoardResult<()> {
    let reference = read_reference(path)?;
    let pretty_reference =
        serde_json::to_string_pretty(&reference).context(SerializingJsonSnafu {})?;
    if pretty_reference != pretty_summary {
        warn!("Found differences with the reference summary {:?}", path);
        print_diff(pretty_reference.as_str(), pretty_summary, "\n");
        whatever!("Difference detected between the computed summary and the reference summary")
    }
    info!("The summary matches the reference {:?}", path);
    Ok(())
}

pub fn run_board(args: &Args) -> BoardResult<()> {
    let config = match &args.config {
        Some(p) => read_config(p)?,
        None => BoardConfig::default(),
    };
    let settings = resolve_settings(args, config)?;
    info!("settings: {:?}", settings);

    let matrix = load_matrix(&settings)?;
    let view = compute_view(&matrix, &settings.params);

    let mut store = match &settings.awards_file {
        Some(p) => AwardStore::load(p)?,
        None => AwardStore::default(),
    };
    if args.give_award.is_some() || args.revoke_award.is_some() {
        let name = award_target(&matrix, &view, settings.params.employee.as_deref())?;
        if let Some(id) = &args.give_award {
            store.give(&name, id)?;
        }
        if let Some(id) = &args.revoke_award {
            store.revoke(&name, id)?;
        }
        match &settings.awards_file {
            Some(p) => store.save(p)?,
            None => warn!("No awards file given, the awards will not be kept"),
        }
    }

    let summary = build_summary_js(&view, &store);
    let pretty_summary =
        serde_json::to_string_pretty(&summary).context(SerializingJsonSnafu {})?;
    write_summary(settings.out.as_deref(), &pretty_summary)?;

    if let Some(p) = &settings.export_csv {
        export::export_csv_file(p, &matrix, &view.criteria, &view.months)?;
    }

    if let Some(p) = &settings.reference {
        check_reference(p, &pretty_summary)?;
    }
    Ok(())
}
