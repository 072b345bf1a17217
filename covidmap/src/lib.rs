use std::path::PathBuf;

use anyhow::Result;
use assemble::assemble;
use chart::Figure;
use formatters::{write_output, HtmlFormatter, OutputFormatter, PlotlyJs};
use layers::build_layers;
use log::{debug, info};
use polars::frame::DataFrame;
use reshape::{reshape, CasesByDate};

use crate::config::Config;

// Re-exports
pub use column_names as COL;

// Modules
pub mod assemble;
pub mod chart;
pub mod column_names;
pub mod config;
pub mod dates;
pub mod error;
pub mod formatters;
pub mod layers;
pub mod loader;
pub mod reshape;

/// Loads the time series and renders it as a map with a date slider
#[derive(Debug, Clone, Default)]
pub struct CovidMap {
    pub config: Config,
}

/// What a call to `CovidMap::run` produced.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSummary {
    pub output_path: PathBuf,
    pub num_dates: usize,
    pub first_date: String,
    pub last_date: String,
    pub last_total: u64,
}

impl CovidMap {
    /// Setup with default configuration
    pub fn new() -> Self {
        Self::new_with_config(Config::default())
    }

    /// Setup with custom configuration
    pub fn new_with_config(config: Config) -> Self {
        debug!("config: {config:?}");
        Self { config }
    }

    /// Fetch and prepare the configured dataset
    pub async fn load(&self) -> Result<DataFrame> {
        loader::load(&self.config.source_url).await
    }

    /// Split a prepared dataset into per-date case tables
    pub fn cases_by_date(&self, df: &DataFrame) -> Result<CasesByDate> {
        reshape(df)
    }

    /// Build the complete figure for the given case tables
    pub fn figure(&self, cases: &CasesByDate) -> Result<Figure> {
        let layers = build_layers(cases)?;
        assemble(cases, layers, &self.config.chart)
    }

    pub fn formatter(&self) -> Result<HtmlFormatter> {
        Ok(HtmlFormatter::new(PlotlyJs::from_config(&self.config)?))
    }

    /// Run the whole pipeline and write the HTML page to `config.output_path`
    pub async fn run(&self) -> Result<RenderSummary> {
        let formatter = OutputFormatter::Html(self.formatter()?);
        self.run_with_formatter(&formatter).await
    }

    /// Run the whole pipeline and write the figure to `config.output_path` using `formatter`
    pub async fn run_with_formatter(&self, formatter: &OutputFormatter) -> Result<RenderSummary> {
        let df = self.load().await?;
        let cases = self.cases_by_date(&df)?;
        let figure = self.figure(&cases)?;
        let output_path = PathBuf::from(&self.config.output_path);
        write_output(formatter, &figure, &output_path)?;

        // `reshape` guarantees at least one date
        let (first, last) = match (cases.0.first(), cases.0.last()) {
            (Some(first), Some(last)) => (first, last),
            _ => return Err(error::CovidMapError::NoDateColumns.into()),
        };
        let summary = RenderSummary {
            output_path,
            num_dates: cases.len(),
            first_date: first.date.clone(),
            last_date: last.date.clone(),
            last_total: last.total_cases()?,
        };
        info!("{summary:?}");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use httpmock::prelude::*;

    use super::*;
    use crate::formatters::OutputGenerator;
    use crate::loader::tests::TWO_LOCATIONS_CSV;

    #[tokio::test]
    async fn test_run_writes_html() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/confirmed_US.csv");
                then.status(200).body(TWO_LOCATIONS_CSV);
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("us_covid_cases_static.html");

        let covidmap = CovidMap::new_with_config(Config {
            source_url: server.url("/confirmed_US.csv"),
            output_path: output_path.to_string_lossy().to_string(),
            ..Config::default()
        });
        let summary = covidmap.run().await;
        assert!(summary.is_ok(), "The pipeline should run: {summary:?}");
        let summary = summary.unwrap();
        assert_eq!(
            summary,
            RenderSummary {
                output_path: output_path.clone(),
                num_dates: 2,
                first_date: "01/22/2020".into(),
                last_date: "01/23/2020".into(),
                last_total: 7,
            }
        );
        let html = std::fs::read_to_string(output_path).unwrap();
        assert!(html.contains("Plotly.newPlot"));
        assert!(html.contains("Confirmed cases: 7"));
        assert!(!html.contains("src=\"http"));
    }

    #[test]
    fn default_html_should_not_need_network() {
        let covidmap = CovidMap::new();
        let formatter = covidmap.formatter().unwrap();
        assert_eq!(formatter.plotly_js, PlotlyJs::Bundled);

        let cases = covidmap
            .cases_by_date(&crate::loader::tests::prepared(TWO_LOCATIONS_CSV))
            .unwrap();
        let html = formatter.format(&covidmap.figure(&cases).unwrap()).unwrap();
        assert!(!html.contains("src=\"https://"));
        assert!(html.contains("Confirmed cases: 7"));
    }

    #[tokio::test]
    async fn failed_fetch_should_not_write_output() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/confirmed_US.csv");
                then.status(500);
            })
            .await;
        let dir = tempfile::tempdir().unwrap();
        let output_path = dir.path().join("out.html");

        let covidmap = CovidMap::new_with_config(Config {
            source_url: server.url("/confirmed_US.csv"),
            output_path: output_path.to_string_lossy().to_string(),
            ..Config::default()
        });
        assert!(covidmap.run().await.is_err());
        assert!(!output_path.exists());
    }
}
