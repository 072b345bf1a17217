//! Turns each `CaseTable` into a map scatter trace.

use anyhow::Result;
use itertools::izip;
use log::info;
use polars::prelude::*;

use crate::{
    chart::{Marker, ScatterGeo, SizeMode},
    reshape::{CaseTable, CasesByDate},
    COL,
};

/// Multiplier applied to `ln(1 + cases)` to get the marker area.
pub const MARKER_SCALE: f64 = 100.0;
pub const MARKER_COLOR: &str = "red";
pub const MARKER_OPACITY: f64 = 0.75;

pub fn hover_text(date: &str, country: &str, location: &str, cases: u32) -> String {
    format!("{date}<br>{country}<br>{location}<br>Confirmed cases: {cases}")
}

/// Append `confirmed_cases_norm` (log-scaled count) and `text` (hover text) to a case table.
pub fn with_derived_columns(table: &CaseTable) -> Result<CaseTable> {
    let mut df = table
        .df
        .clone()
        .lazy()
        .with_column(
            col(COL::CONFIRMED_CASES)
                .cast(DataType::Float64)
                .log1p()
                .alias(COL::CONFIRMED_CASES_NORM),
        )
        .collect()?;

    let text: Vec<String> = izip!(
        df.column(COL::COUNTRY)?.str()?,
        df.column(COL::LOCATION)?.str()?,
        df.column(COL::CONFIRMED_CASES)?.u32()?,
    )
    .map(|(country, location, cases)| {
        hover_text(
            &table.date,
            country.unwrap_or_default(),
            location.unwrap_or_default(),
            cases.unwrap_or_default(),
        )
    })
    .collect();
    df.with_column(Series::new(COL::TEXT, text))?;

    Ok(CaseTable {
        date: table.date.clone(),
        df,
    })
}

fn f64_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    Ok(df
        .column(name)?
        .f64()?
        .into_iter()
        .map(|v| v.unwrap_or(f64::NAN))
        .collect())
}

/// Build the (hidden) trace for a case table that already has its derived columns.
pub fn build_layer(table: &CaseTable) -> Result<ScatterGeo> {
    let df = &table.df;
    let size = f64_values(df, COL::CONFIRMED_CASES_NORM)?
        .into_iter()
        .map(|norm| norm * MARKER_SCALE)
        .collect();
    let text = df
        .column(COL::TEXT)?
        .str()?
        .into_iter()
        .map(|v| v.unwrap_or_default().to_string())
        .collect();
    Ok(ScatterGeo::new(
        f64_values(df, COL::LATITUDE)?,
        f64_values(df, COL::LONGITUDE)?,
        text,
        Marker {
            size,
            color: MARKER_COLOR.into(),
            opacity: MARKER_OPACITY,
            sizemode: SizeMode::Area,
        },
    ))
}

/// One trace per date; trace `i` always belongs to date `i`.
pub fn build_layers(cases: &CasesByDate) -> Result<Vec<ScatterGeo>> {
    let layers = cases
        .iter()
        .map(|table| build_layer(&with_derived_columns(table)?))
        .collect::<Result<Vec<_>>>()?;
    info!("Built {} layers", layers.len());
    Ok(layers)
}
