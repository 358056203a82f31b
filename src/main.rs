mod app;
mod booking;
mod calendar;
mod config;
mod details;
mod help;
mod popup;
mod prompt;
mod source;
mod theme;
use crate::app::App;
use crate::calendar::{CalendarMonth, DayOrder, MonthView, Now};
use crate::config::Config;
use crate::source::JsonFile;
use anyhow::Context;
use env_logger::{Env, Target};
use lexopt::{Arg, Parser, ValueExt};
use ratatui::DefaultTerminal;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

#[derive(Clone, Debug, Default, Eq, PartialEq)]
struct Options {
    bookings: Option<PathBuf>,
    config: Option<PathBuf>,
    log_file: Option<PathBuf>,
    sort_by_start: bool,
    month: Option<CalendarMonth>,
}

#[derive(Clone, Debug, Eq, PartialEq)]
enum Command {
    Run(Options),
    Help,
    Version,
}

impl Command {
    fn from_parser(mut parser: Parser) -> Result<Command, lexopt::Error> {
        let mut opts = Options::default();
        while let Some(arg) = parser.next()? {
            match arg {
                Arg::Short('h') | Arg::Long("help") => return Ok(Command::Help),
                Arg::Short('V') | Arg::Long("version") => return Ok(Command::Version),
                Arg::Short('b') | Arg::Long("bookings") => {
                    opts.bookings = Some(PathBuf::from(parser.value()?));
                }
                Arg::Short('c') | Arg::Long("config") => {
                    opts.config = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("log-file") => {
                    opts.log_file = Some(PathBuf::from(parser.value()?));
                }
                Arg::Long("sort-by-start") => opts.sort_by_start = true,
                Arg::Value(value) if opts.month.is_none() => {
                    opts.month = Some(value.parse()?);
                }
                _ => return Err(arg.unexpected()),
            }
        }
        Ok(Command::Run(opts))
    }

    fn run(self) -> anyhow::Result<()> {
        match self {
            Command::Run(opts) => run(opts),
            Command::Help => {
                println!("Usage: carecal [<options>] [YYYY-MM]");
                println!();
                println!("Month calendar of care-home entertainment bookings");
                println!();
                println!("Options:");
                println!("  -b FILE, --bookings FILE");
                println!("                    Read bookings from the given JSON file");
                println!();
                println!("  -c FILE, --config FILE");
                println!("                    Read configuration from the given YAML file");
                println!();
                println!("  --log-file FILE   Append log messages to the given file");
                println!();
                println!("  --sort-by-start   List each day's bookings by start time");
                println!();
                println!("  -h, --help        Display this help message and exit");
                println!("  -V, --version     Show the program version and exit");
                Ok(())
            }
            Command::Version => {
                println!("{} {}", env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

fn run(opts: Options) -> anyhow::Result<()> {
    let config = match opts.config.or_else(Config::default_path) {
        Some(path) => Config::load(&path)?,
        None => Config::default(),
    };
    if let Some(path) = opts.log_file.as_ref().or(config.log_file.as_ref()) {
        init_logging(path)?;
    }
    let now = Now::local();
    let bookings = opts
        .bookings
        .or_else(|| config.bookings_path())
        .context("could not determine bookings file; pass one with --bookings")?;
    let order = if opts.sort_by_start {
        DayOrder::ByStart
    } else {
        config.day_order()
    };
    let source = JsonFile::new(bookings);
    log::info!("Starting with bookings from {}", source.path().display());
    let mut view = MonthView::new(now, source, order);
    if let Some(month) = opts.month {
        view = view.start_month(month);
    }
    view.reload().context("failed to load bookings")?;
    with_terminal(|mut terminal| {
        terminal.hide_cursor().context("failed to hide cursor")?;
        App::new(view).run(&mut terminal)?;
        Ok(())
    })
}

fn init_logging(path: &Path) -> anyhow::Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("failed to open log file {}", path.display()))?;
    env_logger::Builder::from_env(Env::default().filter_or("CARECAL_LOG", "info"))
        .target(Target::Pipe(Box::new(file)))
        .try_init()
        .context("failed to initialize logging")
}

fn main() -> anyhow::Result<()> {
    Command::from_parser(Parser::from_env())?.run()
}

fn with_terminal<F, T>(func: F) -> anyhow::Result<T>
where
    F: FnOnce(DefaultTerminal) -> anyhow::Result<T>,
{
    let terminal = ratatui::init();
    let r = func(terminal);
    ratatui::restore();
    r
}
