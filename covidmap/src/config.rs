use serde::{Deserialize, Serialize};

use crate::chart::GeoScope;

/// plotly.js bundle to reference when the page should load the library from a CDN.
pub const PLOTLY_JS_CDN_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct Config {
    pub source_url: String,
    pub output_path: String,
    /// When set, the page loads plotly.js from this URL instead of embedding it.
    pub plotly_js_url: Option<String>,
    /// When set, the bundle at this path is embedded instead of the one shipped with the binary.
    pub plotly_js_path: Option<String>,
    pub chart: ChartOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            source_url: "https://raw.githubusercontent.com/CSSEGISandData/COVID-19/master/csse_covid_19_data/csse_covid_19_time_series/time_series_covid19_confirmed_US.csv".into(),
            output_path: "us_covid_cases_static.html".into(),
            plotly_js_url: None,
            plotly_js_path: None,
            chart: ChartOptions::default(),
        }
    }
}

/// Layout settings of the rendered chart.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ChartOptions {
    pub title: String,
    pub height: u32,
    pub scope: GeoScope,
}

impl Default for ChartOptions {
    fn default() -> Self {
        ChartOptions {
            title: "Covid-19 US Cases".into(),
            // Anything taller and the slider is not always visible
            height: 650,
            scope: GeoScope::Usa,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_config_should_fill_defaults() {
        let config: Config = serde_json::from_str(r#"{"output_path": "out.html"}"#).unwrap();
        assert_eq!(config.output_path, "out.html");
        assert_eq!(config.source_url, Config::default().source_url);
        assert_eq!(config.chart, ChartOptions::default());
        assert_eq!(config.plotly_js_url, None);
        assert_eq!(config.plotly_js_path, None);
    }

    #[test]
    fn chart_scope_should_deserialize_lowercase() {
        let options: ChartOptions = serde_json::from_str(r#"{"scope": "europe"}"#).unwrap();
        assert_eq!(options.scope, GeoScope::Europe);
        assert_eq!(options.height, 650);
    }
}
