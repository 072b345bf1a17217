//! Slider steps, annotations and layout: everything that turns the per-date traces into a
//! single figure.

use anyhow::{ensure, Result};
use log::info;

use crate::{
    chart::{
        Annotation, AxisRef, CurrentValue, Figure, Geo, Layout, LayoutUpdate, Margin, ScatterGeo,
        Slider, SliderStep, StepArgs, StepMethod, Title, TraceUpdate, VAlign,
    },
    config::ChartOptions,
    reshape::CasesByDate,
};

/// The annotation shown before the slider is first moved. This is a fixed value and does not
/// track the first date of the dataset.
pub const INITIAL_DATE: &str = "01/22/2020";
pub const INITIAL_CASES: u64 = 1;

pub const MARGIN: Margin = Margin {
    t: 50,
    b: 20,
    l: 20,
    r: 20,
};

/// `1234567` -> `"1,234,567"`
pub fn format_thousands(n: u64) -> String {
    let digits = n.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

pub fn annotation_text(date: &str, total: u64) -> String {
    format!(
        "<b>US Totals</b><br>{date}<br><br>Confirmed cases: {}<br>",
        format_thousands(total)
    )
}

impl Annotation {
    /// Hidden, empty totals box in the lower left of the map.
    pub fn template() -> Self {
        Annotation {
            x: 0.03,
            y: 0.35,
            xref: AxisRef::Paper,
            yref: AxisRef::Paper,
            width: 175,
            height: 110,
            showarrow: false,
            text: String::new(),
            valign: VAlign::Middle,
            visible: false,
            bordercolor: "black".into(),
        }
    }
}

pub fn initial_annotation() -> Annotation {
    Annotation {
        visible: true,
        text: annotation_text(INITIAL_DATE, INITIAL_CASES),
        ..Annotation::template()
    }
}

/// One step per date. Selecting step `i` shows only trace `i` and only annotation `i`, which
/// carries that date's total.
pub fn build_steps(cases: &CasesByDate) -> Result<Vec<SliderStep>> {
    let n = cases.len();
    cases
        .iter()
        .enumerate()
        .map(|(i, table)| {
            let mut visible = vec![false; n];
            visible[i] = true;
            let mut annotations = vec![Annotation::template(); n];
            annotations[i].visible = true;
            annotations[i].text = annotation_text(&table.date, table.total_cases()?);
            Ok(SliderStep {
                method: StepMethod::Update,
                args: StepArgs(TraceUpdate { visible }, LayoutUpdate { annotations }),
                label: table.date.clone(),
            })
        })
        .collect()
}

/// Combine the traces with slider, annotation and layout into the final figure.
pub fn assemble(
    cases: &CasesByDate,
    mut layers: Vec<ScatterGeo>,
    options: &ChartOptions,
) -> Result<Figure> {
    ensure!(
        layers.len() == cases.len(),
        "{} layers for {} dates",
        layers.len(),
        cases.len()
    );
    let steps = build_steps(cases)?;
    if let Some(first) = layers.first_mut() {
        first.visible = true;
    }
    info!("Assembled figure with {} slider steps", steps.len());
    Ok(Figure {
        data: layers,
        layout: Layout {
            title: Title {
                text: options.title.clone(),
                x: 0.5,
            },
            height: options.height,
            margin: MARGIN,
            annotations: vec![initial_annotation()],
            sliders: vec![Slider {
                active: 0,
                currentvalue: CurrentValue {
                    prefix: "Date: ".into(),
                },
                steps,
                len: 0.9,
                x: 0.05,
            }],
            geo: Geo {
                scope: options.scope,
            },
        },
    })
}
