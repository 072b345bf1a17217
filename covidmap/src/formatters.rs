use std::fs::File;
use std::io::{BufWriter, Cursor, Write};
use std::path::Path;

use anyhow::{Context, Result};
use enum_dispatch::enum_dispatch;
use log::info;
use serde::Serialize;

use crate::{chart::Figure, config::Config};

/// Id of the element the figure is drawn into.
pub const PLOT_DIV_ID: &str = "covid-geoscatter";

/// Serialise to JSON that is safe to place inside a `<script>` element.
fn script_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string(value)?.replace("</", "<\\/"))
}

/// Trait to define different output generators. Defines two
/// functions, format which generates a serialized string of the
/// `Figure` and save which writes it to a writer
#[enum_dispatch]
pub trait OutputGenerator {
    fn save(&self, writer: &mut impl Write, figure: &Figure) -> Result<()>;
    fn format(&self, figure: &Figure) -> Result<String> {
        // Just creating an empty vec to store the buffered output
        let mut data: Vec<u8> = vec![];
        let mut buff = Cursor::new(&mut data);
        self.save(&mut buff, figure)?;

        Ok(String::from_utf8(data)?)
    }
}

/// Enum of OutputFormatters one for each potential
/// output type
#[enum_dispatch(OutputGenerator)]
#[derive(Debug, Clone, PartialEq)]
pub enum OutputFormatter {
    Html(HtmlFormatter),
    Json(JsonFormatter),
}

/// Where the page loads plotly.js from.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum PlotlyJs {
    /// The bundle shipped with the `plotly` crate, embedded in the page
    #[default]
    Bundled,
    /// `<script src=...>` pointing at this URL
    Cdn(String),
    /// The library source itself, embedded in the page
    Inline(String),
}

impl PlotlyJs {
    /// A local bundle at `plotly_js_path` wins over a CDN `plotly_js_url`. With neither set the
    /// bundled library is embedded, so the page renders without network access.
    pub fn from_config(config: &Config) -> Result<Self> {
        match (&config.plotly_js_path, &config.plotly_js_url) {
            (Some(path), _) => {
                let source = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read plotly.js from: {path}"))?;
                Ok(PlotlyJs::Inline(source))
            }
            (None, Some(url)) => Ok(PlotlyJs::Cdn(url.clone())),
            (None, None) => Ok(PlotlyJs::Bundled),
        }
    }

    fn script_tag(&self) -> String {
        match self {
            PlotlyJs::Bundled => plotly::Plot::offline_js_sources(),
            PlotlyJs::Cdn(url) => {
                format!(r#"<script type="text/javascript" src="{url}" charset="utf-8"></script>"#)
            }
            PlotlyJs::Inline(source) => {
                format!("<script type=\"text/javascript\">{source}</script>")
            }
        }
    }
}

/// Standalone HTML page rendering the figure with plotly.js
#[derive(Debug, Clone, PartialEq)]
pub struct HtmlFormatter {
    pub plotly_js: PlotlyJs,
}

impl HtmlFormatter {
    pub fn new(plotly_js: PlotlyJs) -> Self {
        Self { plotly_js }
    }
}

impl OutputGenerator for HtmlFormatter {
    fn save(&self, writer: &mut impl Write, figure: &Figure) -> Result<()> {
        let data = script_json(&figure.data)?;
        let layout = script_json(&figure.layout)?;
        writeln!(writer, "<html>")?;
        writeln!(writer, "<head><meta charset=\"utf-8\" /></head>")?;
        writeln!(writer, "<body>")?;
        writeln!(writer, "    <div>")?;
        writeln!(writer, "        {}", self.plotly_js.script_tag())?;
        writeln!(
            writer,
            "        <div id=\"{PLOT_DIV_ID}\" class=\"plotly-graph-div\" style=\"height:{}px; width:100%;\"></div>",
            figure.layout.height
        )?;
        writeln!(writer, "        <script type=\"text/javascript\">")?;
        writeln!(
            writer,
            "            Plotly.newPlot(\"{PLOT_DIV_ID}\", {data}, {layout}, {{\"responsive\": true}});"
        )?;
        writeln!(writer, "        </script>")?;
        writeln!(writer, "    </div>")?;
        writeln!(writer, "</body>")?;
        writeln!(writer, "</html>")?;
        Ok(())
    }
}

/// The figure as plotly JSON (`{"data": [...], "layout": {...}}`)
#[derive(Debug, Clone, PartialEq)]
pub struct JsonFormatter;

impl OutputGenerator for JsonFormatter {
    fn save(&self, writer: &mut impl Write, figure: &Figure) -> Result<()> {
        serde_json::to_writer(writer, figure)?;
        Ok(())
    }
}

/// Write the figure to `path`, replacing any existing file.
pub fn write_output<T, P>(output_generator: &T, figure: &Figure, path: P) -> Result<()>
where
    T: OutputGenerator,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let file = File::create(path)
        .with_context(|| format!("Failed to write output: {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    output_generator.save(&mut writer, figure)?;
    writer.flush()?;
    info!("Wrote {}", path.display());
    Ok(())
}
