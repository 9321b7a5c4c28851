use std::fs;
use std::path::Path;

use crate::board::*;

use serde::{Deserialize, Serialize};

/// The board settings as stored in a JSON configuration file. All the entries are optional.
#[derive(Eq, PartialEq, Debug, Clone, Default, Serialize, Deserialize)]
pub struct BoardConfig {
    #[serde(rename = "inputFile")]
    pub input_file: Option<String>,
    #[serde(rename = "inputType")]
    pub input_type: Option<String>,
    #[serde(rename = "worksheetName")]
    pub worksheet_name: Option<String>,
    #[serde(rename = "monthsCount")]
    pub months_count: Option<usize>,
    pub criteria: Option<Vec<String>>,
    #[serde(rename = "leaderboardCriterion")]
    pub leaderboard_criterion: Option<String>,
    pub employee: Option<String>,
    #[serde(rename = "awardsFile")]
    pub awards_file: Option<String>,
    #[serde(rename = "outputFile")]
    pub output_file: Option<String>,
    #[serde(rename = "exportCsvFile")]
    pub export_csv_file: Option<String>,
}

/// Reads a configuration file. The relative paths it contains are relative to
/// the directory of the file.
pub fn read_config(path: &str) -> BoardResult<BoardConfig> {
    let contents = fs::read_to_string(path).context(ReadingFileSnafu { path })?;
    let root = Path::new(path).parent().context(MissingParentDirSnafu {})?;
    parse_config(contents.as_str(), root)
}

pub fn parse_config(contents: &str, root: &Path) -> BoardResult<BoardConfig> {
    let config: BoardConfig = serde_json::from_str(contents).context(ParsingJsonSnafu {})?;
    debug!("parse_config: {:?}", config);
    let resolve = |p: Option<String>| p.map(|s| resolve_path(root, s));
    Ok(BoardConfig {
        input_file: resolve(config.input_file),
        awards_file: resolve(config.awards_file),
        output_file: resolve(config.output_file),
        export_csv_file: resolve(config.export_csv_file),
        ..config
    })
}

fn resolve_path(root: &Path, path: String) -> String {
    if path.is_empty() || path == "stdout" || Path::new(&path).is_absolute() {
        path
    } else {
        root.join(path).display().to_string()
    }
}

pub fn parse_criterion(label: &str) -> BoardResult<Criterion> {
    Criterion::from_label(label.trim()).context(UnknownCriterionSnafu { label })
}

/// The criteria in the given order. Repeated criteria are only kept once.
pub fn parse_criteria(labels: &[String]) -> BoardResult<Vec<Criterion>> {
    let mut res: Vec<Criterion> = Vec::new();
    for label in labels.iter() {
        let c = parse_criterion(label)?;
        if !res.contains(&c) {
            res.push(c);
        }
    }
    Ok(res)
}
