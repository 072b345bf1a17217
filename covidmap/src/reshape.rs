//! Wide-to-long reshape: one `CaseTable` per date column.

use anyhow::Result;
use log::{debug, info};
use polars::prelude::*;

use crate::{dates::date_columns, error::CovidMapError, COL};

/// The locations with at least one confirmed case on `date`.
#[derive(Debug, Clone, PartialEq)]
pub struct CaseTable {
    pub date: String,
    /// `location_id`, the geographic columns and `confirmed_cases`, ordered by `location_id`.
    pub df: DataFrame,
}

impl CaseTable {
    /// Sum of `confirmed_cases` over every location in the table.
    pub fn total_cases(&self) -> Result<u64> {
        Ok(self
            .df
            .column(COL::CONFIRMED_CASES)?
            .u32()?
            .into_iter()
            .flatten()
            .map(u64::from)
            .sum())
    }

    pub fn num_locations(&self) -> usize {
        self.df.height()
    }
}

/// Case tables in chronological order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CasesByDate(pub Vec<CaseTable>);

impl CasesByDate {
    pub fn get(&self, date: &str) -> Option<&CaseTable> {
        self.0.iter().find(|table| table.date == date)
    }

    pub fn dates(&self) -> Vec<&str> {
        self.0.iter().map(|table| table.date.as_str()).collect()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, CaseTable> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a CasesByDate {
    type Item = &'a CaseTable;
    type IntoIter = std::slice::Iter<'a, CaseTable>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// The location key and geographic attributes of every location.
pub fn geo_reference(df: &DataFrame) -> Result<DataFrame> {
    let mut cols = vec![col(COL::LOCATION_ID)];
    cols.extend(COL::GEO_COLUMNS.iter().map(|name| col(name)));
    Ok(df.clone().lazy().select(cols).collect()?)
}

/// Build the case table for a single `date` column of a prepared dataset.
///
/// Every count must be present: a value the backward fill could not supply fails the cast to
/// an unsigned count, as does a negative one.
pub fn case_table(df: &DataFrame, geo: &DataFrame, date: &str) -> Result<CaseTable> {
    let missing = df.column(date)?.null_count();
    if missing > 0 {
        return Err(CovidMapError::MissingCounts {
            date: date.to_string(),
            count: missing,
        }
        .into());
    }
    let cases = df.clone().lazy().select([
        col(COL::LOCATION_ID),
        col(date)
            .strict_cast(DataType::UInt32)
            .alias(COL::CONFIRMED_CASES),
    ]);
    let table = geo
        .clone()
        .lazy()
        .join(
            cases,
            [col(COL::LOCATION_ID)],
            [col(COL::LOCATION_ID)],
            JoinArgs::new(JoinType::Inner),
        )
        // Drops locations with no cases yet
        .filter(col(COL::CONFIRMED_CASES).gt(lit(0)))
        .sort([COL::LOCATION_ID], SortMultipleOptions::default())
        .collect()?;
    debug!("{date}: {} locations with cases", table.height());
    Ok(CaseTable {
        date: date.to_string(),
        df: table,
    })
}

/// Split a prepared dataset into one `CaseTable` per date column.
pub fn reshape(df: &DataFrame) -> Result<CasesByDate> {
    let dates = date_columns(df.get_column_names());
    if dates.is_empty() {
        return Err(CovidMapError::NoDateColumns.into());
    }
    let geo = geo_reference(df)?;
    let tables = dates
        .iter()
        .map(|date| case_table(df, &geo, date))
        .collect::<Result<Vec<_>>>()?;
    info!("Reshaped dataset into {} dates", tables.len());
    Ok(CasesByDate(tables))
}
