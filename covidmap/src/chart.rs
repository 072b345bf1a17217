//! Typed plotly.js figure description.
//!
//! Each struct serialises to the JSON object plotly.js expects for the corresponding part of a
//! figure, so a [`Figure`] can be embedded directly into the page passed to `Plotly.newPlot`.

use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Figure {
    pub data: Vec<ScatterGeo>,
    pub layout: Layout,
}

/// A single `scattergeo` trace; the pipeline creates one per date.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ScatterGeo {
    #[serde(rename = "type")]
    pub trace_type: &'static str,
    pub name: String,
    pub lat: Vec<f64>,
    pub lon: Vec<f64>,
    pub visible: bool,
    pub hovertemplate: Vec<String>,
    pub showlegend: bool,
    pub marker: Marker,
}

impl ScatterGeo {
    pub fn new(lat: Vec<f64>, lon: Vec<f64>, hovertemplate: Vec<String>, marker: Marker) -> Self {
        Self {
            trace_type: "scattergeo",
            name: String::new(),
            lat,
            lon,
            visible: false,
            hovertemplate,
            showlegend: false,
            marker,
        }
    }

    pub fn len(&self) -> usize {
        self.lat.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lat.is_empty()
    }
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Marker {
    pub size: Vec<f64>,
    pub color: String,
    pub opacity: f64,
    pub sizemode: SizeMode,
}

/// Whether marker `size` maps to the rendered diameter or area.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SizeMode {
    Diameter,
    Area,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: Title,
    pub height: u32,
    pub margin: Margin,
    pub annotations: Vec<Annotation>,
    pub sliders: Vec<Slider>,
    pub geo: Geo,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Title {
    pub text: String,
    pub x: f64,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Margin {
    pub t: u32,
    pub b: u32,
    pub l: u32,
    pub r: u32,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq)]
pub struct Geo {
    pub scope: GeoScope,
}

/// Map regions plotly.js can restrict a geo subplot to.
#[derive(
    Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Default, EnumString, Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum GeoScope {
    World,
    #[default]
    Usa,
    Europe,
    Asia,
    Africa,
    #[serde(rename = "north america")]
    #[strum(to_string = "north america")]
    NorthAmerica,
    #[serde(rename = "south america")]
    #[strum(to_string = "south america")]
    SouthAmerica,
}

/// Where an annotation's `x`/`y` are measured from.
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum AxisRef {
    Paper,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Annotation {
    pub x: f64,
    pub y: f64,
    pub xref: AxisRef,
    pub yref: AxisRef,
    pub width: u32,
    pub height: u32,
    pub showarrow: bool,
    pub text: String,
    pub valign: VAlign,
    pub visible: bool,
    pub bordercolor: String,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct Slider {
    pub active: usize,
    pub currentvalue: CurrentValue,
    pub steps: Vec<SliderStep>,
    pub len: f64,
    pub x: f64,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct CurrentValue {
    pub prefix: String,
}

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum StepMethod {
    Update,
}

/// One slider position: applies `args` via `Plotly.update` when selected.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct SliderStep {
    pub method: StepMethod,
    pub args: StepArgs,
    pub label: String,
}

/// `(trace update, layout update)`, serialised as a two element array.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct StepArgs(pub TraceUpdate, pub LayoutUpdate);

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct TraceUpdate {
    pub visible: Vec<bool>,
}

#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct LayoutUpdate {
    pub annotations: Vec<Annotation>,
}

#[cfg(test)]
mod tests {
    use std::str::FromStr;

    use serde_json::json;

    use super::*;

    #[test]
    fn scatter_geo_should_serialize_as_plotly_trace() {
        let trace = ScatterGeo::new(
            vec![1.0],
            vec![2.0],
            vec!["hover".into()],
            Marker {
                size: vec![3.0],
                color: "red".into(),
                opacity: 0.75,
                sizemode: SizeMode::Area,
            },
        );
        let value = serde_json::to_value(&trace).unwrap();
        assert_eq!(value["type"], "scattergeo");
        assert_eq!(value["name"], "");
        assert_eq!(value["visible"], false);
        assert_eq!(value["showlegend"], false);
        assert_eq!(value["marker"]["sizemode"], "area");
        assert_eq!(value["hovertemplate"], json!(["hover"]));
    }

    #[test]
    fn step_args_should_serialize_as_array() {
        let step = SliderStep {
            method: StepMethod::Update,
            args: StepArgs(
                TraceUpdate {
                    visible: vec![true, false],
                },
                LayoutUpdate {
                    annotations: vec![],
                },
            ),
            label: "01/22/2020".into(),
        };
        let value = serde_json::to_value(&step).unwrap();
        assert_eq!(value["method"], "update");
        assert_eq!(value["args"][0]["visible"], json!([true, false]));
        assert_eq!(value["args"][1]["annotations"], json!([]));
    }

    #[test]
    fn geo_scope_should_parse_and_serialize() {
        assert_eq!(GeoScope::from_str("USA").unwrap(), GeoScope::Usa);
        assert_eq!(
            GeoScope::from_str("north america").unwrap(),
            GeoScope::NorthAmerica
        );
        assert!(GeoScope::from_str("mars").is_err());
        assert_eq!(serde_json::to_value(GeoScope::Usa).unwrap(), "usa");
        assert_eq!(GeoScope::SouthAmerica.to_string(), "south america");
    }
}
