use std::path::Path;

use clap::{Args, Parser, Subcommand};
use covidmap::{
    chart::GeoScope,
    config::Config,
    formatters::{JsonFormatter, OutputFormatter},
    CovidMap,
};
use enum_dispatch::enum_dispatch;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use spinners::{Spinner, Spinners};
use strum_macros::EnumString;

use crate::display::display_dates;
use crate::error::CovidMapCliResult;

const DEFAULT_PROGRESS_SPINNER: Spinners = Spinners::Dots;
const COMPLETE_PROGRESS_STRING: &str = "✔";
const RUNNING_TAIL_STRING: &str = "...";
const DOWNLOADING_STRING: &str = "Downloading case counts";
const RENDERING_STRING: &str = "Downloading case counts and rendering map";
const MAX_DATES_SHOWN: usize = 50;

/// Defines the output formats we are able to produce the map in.
#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize, EnumString, PartialEq, Eq)]
#[strum(ascii_case_insensitive)]
pub enum OutputFormat {
    #[default]
    Html,
    Json,
}

fn start_spinner(quiet: bool, message: &str) -> Option<Spinner> {
    (!quiet).then(|| {
        Spinner::with_timer(
            DEFAULT_PROGRESS_SPINNER,
            message.to_string() + RUNNING_TAIL_STRING,
        )
    })
}

fn stop_spinner(sp: Option<Spinner>) {
    if let Some(mut s) = sp {
        s.stop_with_symbol(COMPLETE_PROGRESS_STRING);
    }
}

/// Trait that defines what to run when a given subcommand is invoked.
#[enum_dispatch]
pub trait RunCommand {
    async fn run(&self, config: Config) -> CovidMapCliResult<()>;
}

/// The `render` command downloads the case counts and writes the map.
#[derive(Args, Debug, Default)]
pub struct RenderCommand {
    #[arg(short = 'u', long, help = "URL of the time-series CSV to download")]
    url: Option<String>,
    #[arg(short = 'o', long, help = "Output file to place the map in")]
    output_file: Option<String>,
    #[arg(
        short = 'f',
        long,
        value_name = "html|json",
        default_value = "html",
        help = "Output format for the map"
    )]
    output_format: OutputFormat,
    #[arg(
        long,
        value_name = "PATH",
        help = "Embed the plotly.js bundle at PATH instead of the bundled copy"
    )]
    plotly_js: Option<String>,
    #[arg(
        long,
        value_name = "URL",
        help = "Load plotly.js from URL (e.g. a CDN) instead of embedding it"
    )]
    plotly_js_url: Option<String>,
    #[arg(short = 's', long, help = "Region the map is restricted to")]
    scope: Option<GeoScope>,
    #[arg(short = 't', long, help = "Title of the chart")]
    title: Option<String>,
    #[arg(from_global)]
    quiet: bool,
}

impl RenderCommand {
    /// Apply the command-line arguments on top of the configuration file.
    fn apply(&self, mut config: Config) -> Config {
        if let Some(url) = &self.url {
            config.source_url = url.clone();
        }
        if let Some(plotly_js) = &self.plotly_js {
            config.plotly_js_path = Some(plotly_js.clone());
        }
        if let Some(plotly_js_url) = &self.plotly_js_url {
            config.plotly_js_url = Some(plotly_js_url.clone());
        }
        if let Some(scope) = self.scope {
            config.chart.scope = scope;
        }
        if let Some(title) = &self.title {
            config.chart.title = title.clone();
        }
        config.output_path = match (&self.output_file, self.output_format) {
            (Some(output_file), _) => output_file.clone(),
            (None, OutputFormat::Html) => config.output_path,
            (None, OutputFormat::Json) => Path::new(&config.output_path)
                .with_extension("json")
                .to_string_lossy()
                .to_string(),
        };
        config
    }
}

impl RunCommand for RenderCommand {
    async fn run(&self, config: Config) -> CovidMapCliResult<()> {
        info!("Running `render` subcommand");
        let covidmap = CovidMap::new_with_config(self.apply(config));
        let formatter = match self.output_format {
            OutputFormat::Html => OutputFormatter::Html(covidmap.formatter()?),
            OutputFormat::Json => OutputFormatter::Json(JsonFormatter),
        };
        let sp = start_spinner(self.quiet, RENDERING_STRING);
        let summary = covidmap.run_with_formatter(&formatter).await?;
        stop_spinner(sp);
        debug!("{summary:#?}");
        println!(
            "Wrote {} dates ({} to {}) to {}",
            summary.num_dates,
            summary.first_date,
            summary.last_date,
            summary.output_path.display()
        );
        Ok(())
    }
}

/// The `dates` command lists each date in the dataset with its totals.
#[derive(Args, Debug)]
pub struct DatesCommand {
    #[arg(short = 'u', long, help = "URL of the time-series CSV to download")]
    url: Option<String>,
    #[arg(long, help = "Show all dates even if there are a large number")]
    full: bool,
    #[arg(from_global)]
    quiet: bool,
}

impl RunCommand for DatesCommand {
    async fn run(&self, mut config: Config) -> CovidMapCliResult<()> {
        info!("Running `dates` subcommand");
        if let Some(url) = &self.url {
            config.source_url = url.clone();
        }
        let covidmap = CovidMap::new_with_config(config);
        let sp = start_spinner(self.quiet, DOWNLOADING_STRING);
        let df = covidmap.load().await?;
        stop_spinner(sp);
        let cases = covidmap.cases_by_date(&df)?;
        let num_dates = cases.len();
        if num_dates > MAX_DATES_SHOWN && !self.full {
            display_dates(&cases, Some(MAX_DATES_SHOWN))?;
            println!(
                "{} earlier dates not shown. Use --full to show all dates.",
                num_dates - MAX_DATES_SHOWN
            );
        } else {
            display_dates(&cases, None)?;
        }
        Ok(())
    }
}

/// The entrypoint for the CLI.
#[derive(Parser, Debug)]
#[command(version, about="Renders US COVID-19 confirmed cases as a map with a date slider", long_about = None, name="covidmap")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
    #[arg(
        short = 'q',
        long = "quiet",
        help = "\
            Do not print progress bar to stdout. Results and logs (when `RUST_LOG` is set)\n\
            will still be printed.",
        global = true
    )]
    quiet: bool,
}

impl Cli {
    /// The requested subcommand, or `render` with default arguments when none is given.
    pub fn into_command(self) -> Commands {
        self.command.unwrap_or(Commands::Render(RenderCommand {
            quiet: self.quiet,
            ..RenderCommand::default()
        }))
    }
}

/// Commands contains the list of subcommands avaliable for use in the CLI.
/// Each command should implmement the RunCommand trait and specify the list
/// of required args for that command.
#[derive(Subcommand, Debug)]
#[enum_dispatch(RunCommand)]
pub enum Commands {
    /// Download the case counts and write the map (the default)
    Render(RenderCommand),
    /// List the dates in the dataset with the number of locations and total cases
    Dates(DatesCommand),
}
