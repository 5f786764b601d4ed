mod debug_report;
mod demo;

use clap::Parser as _;
use parlance::{GrammarError, MatchFlags, Options, Output, ParseDetails, Parser, rank};
use serde::Serialize;
use std::io::{self, IsTerminal, Read};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

const LOG_ENV: &str = "PARLANCE_LOG";

/// Interpret a line of input against the demo command grammar.
///
/// Exit codes: 0 on success, 1 on grammar errors, 2 on invalid arguments.
#[derive(clap::Parser, Debug)]
#[command(name = "parlance", version)]
struct Cli {
    /// Input to interpret. Reads stdin when omitted.
    input: Vec<String>,

    /// Treat every literal as fuzzy.
    #[arg(long)]
    fuzzy: bool,

    /// Compare characters case-insensitively.
    #[arg(short = 'i', long)]
    ignore_case: bool,

    /// Stop after this many interpretations.
    #[arg(short = 'n', long, value_name = "N")]
    limit: Option<usize>,

    /// Enable a demo extension (repeatable).
    #[arg(
        short = 'e',
        long = "extension",
        value_name = "NAME",
        value_parser = clap::builder::PossibleValuesParser::new(demo::EXTENSIONS.iter().copied())
    )]
    extensions: Vec<String>,

    /// Print interpretations as JSON.
    #[arg(long)]
    json: bool,

    /// Force ANSI color output.
    #[arg(long, conflicts_with = "no_color")]
    color: bool,

    /// Disable ANSI color output.
    #[arg(long)]
    no_color: bool,
}

impl Cli {
    fn options(&self) -> Options {
        let mut flags = MatchFlags::empty();
        flags.set(MatchFlags::FUZZY, self.fuzzy);
        flags.set(MatchFlags::CASE_INSENSITIVE, self.ignore_case);
        Options { flags, limit: self.limit }
    }

    fn color(&self) -> bool {
        if self.color {
            true
        } else if self.no_color {
            false
        } else {
            io::stdout().is_terminal()
        }
    }
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let input = if cli.input.is_empty() {
        match read_stdin_input() {
            Ok(input) => input,
            Err(err) => {
                eprintln!("error: failed to read stdin: {err}");
                return ExitCode::from(2);
            }
        }
    } else {
        cli.input.join(" ")
    };

    let parser = match build_parser(&cli) {
        Ok(parser) => parser,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let mut details = parser.parse_verbose(&input);
    details.outputs = rank(std::mem::take(&mut details.outputs));

    if cli.json {
        match serde_json::to_string_pretty(&JsonReport::from(&details)) {
            Ok(json) => println!("{json}"),
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        debug_report::print_run(&details, cli.color());
    }
    ExitCode::SUCCESS
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt().with_env_filter(filter).with_writer(io::stderr).init();
}

fn build_parser(cli: &Cli) -> Result<Parser, GrammarError> {
    let mut parser = Parser::with_options(cli.options());
    parser.set_sentences(demo::sentences())?;
    parser.set_extensions(cli.extensions.iter().filter_map(|name| demo::extension(name)).collect())?;
    Ok(parser)
}

fn read_stdin_input() -> io::Result<String> {
    let mut buffer = String::new();
    io::stdin().read_to_string(&mut buffer)?;
    Ok(buffer.trim_end_matches(['\r', '\n']).to_string())
}

#[derive(Serialize)]
struct JsonReport<'a> {
    input: &'a str,
    extensions: &'a [&'static str],
    outputs: &'a [Output<'a>],
    elapsed_us: u128,
}

impl<'a> From<&'a ParseDetails<'a>> for JsonReport<'a> {
    fn from(details: &'a ParseDetails<'a>) -> Self {
        JsonReport {
            input: details.input,
            extensions: &details.extensions,
            outputs: &details.outputs,
            elapsed_us: details.metrics.elapsed.as_micros(),
        }
    }
}
