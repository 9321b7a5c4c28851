use clap::Parser;

/// Performance board: reads a spreadsheet of employee results per criterion and month,
/// and computes the month window, the leaderboard and the statistics of one employee.
#[derive(Parser, Debug, Clone)]
#[clap(author, version, about, long_about = None)]
pub struct Args {
    /// (file path, optional) A JSON file with the board settings. The other options override
    /// the values it contains.
    #[clap(short, long, value_parser)]
    pub config: Option<String>,

    /// (file path, optional) The spreadsheet to read (xlsx, xls, ods or csv). If not provided,
    /// a demonstration board is used.
    #[clap(short, long, value_parser)]
    pub input: Option<String>,

    /// (excel or csv) The type of the input. By default, it is inferred from the file extension.
    #[clap(long, value_parser)]
    pub input_type: Option<String>,

    /// When using a workbook, the name of the worksheet to use. The first worksheet is used
    /// by default.
    #[clap(long, value_parser)]
    pub excel_worksheet_name: Option<String>,

    /// (default 6) The number of most recent months to show.
    #[clap(short, long, value_parser)]
    pub months: Option<usize>,

    /// (criterion label, repeatable) The criteria to show, in order. All the criteria are
    /// shown by default.
    #[clap(long, value_parser)]
    pub criteria: Option<Vec<String>>,

    /// (criterion label) The criterion of the leaderboard. The first criterion by default.
    #[clap(short, long, value_parser)]
    pub leaderboard: Option<String>,

    /// (employee name) The employee whose statistics are shown and who receives awards.
    /// The first employee by default.
    #[clap(short, long, value_parser)]
    pub employee: Option<String>,

    /// (file path, 'stdout' or empty) Where to write the JSON summary of the board.
    #[clap(short, long, value_parser)]
    pub out: Option<String>,

    /// (file path) If specified, the board is exported in CSV format to this location.
    #[clap(long, value_parser)]
    pub export_csv: Option<String>,

    /// (file path) The JSON file storing the awards of the employees.
    #[clap(long, value_parser)]
    pub awards: Option<String>,

    /// (award id) Gives this award to the selected employee.
    #[clap(long, value_parser)]
    pub give_award: Option<String>,

    /// (award id) Takes this award back from the selected employee.
    #[clap(long, value_parser)]
    pub revoke_award: Option<String>,

    /// (file path) A reference summary in JSON format. If provided, the computed summary must
    /// match it.
    #[clap(short, long, value_parser)]
    pub reference: Option<String>,

    // Other arguments
    /// If passed as an argument, will turn on verbose logging to the standard output.
    #[clap(long, takes_value = false)]
    pub verbose: bool,
}
