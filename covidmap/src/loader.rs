//! Fetching the time-series CSV and normalising it into the shape the reshaper expects.

use std::io::Cursor;

use anyhow::Result;
use itertools::Itertools;
use log::{debug, info};
use polars::prelude::*;

use crate::{
    dates::{date_columns, reformat_date},
    error::CovidMapError,
    COL,
};

/// Download the raw CSV at `url`.
pub async fn fetch_csv(url: &str) -> Result<Vec<u8>> {
    info!("Attempting to fetch dataset from {url}");
    let response = reqwest::Client::new().get(url).send().await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CovidMapError::FailedRequest {
            url: url.to_string(),
            status: status.as_u16(),
        }
        .into());
    }
    let bytes = response.bytes().await?;
    info!("Fetched {} bytes", bytes.len());
    Ok(bytes.to_vec())
}

/// Parse raw CSV bytes (with a header row) into a `DataFrame`.
pub fn parse_csv(bytes: Vec<u8>) -> Result<DataFrame> {
    let df = CsvReadOptions::default()
        .with_has_header(true)
        .into_reader_with_file_handle(Cursor::new(bytes))
        .finish()?;
    debug!("Parsed CSV with shape: {:?}", df.shape());
    Ok(df)
}

/// Normalise a freshly parsed dataset:
/// - the four geographic columns get their canonical names
/// - `M/D/YY` headers become `MM/DD/YYYY`
/// - missing counts are backward filled along each row
/// - a `location_id` key is prepended
pub fn prepare(mut df: DataFrame) -> Result<DataFrame> {
    for (source, canonical) in COL::RENAMED_COLUMNS {
        df.rename(source, canonical)
            .map_err(|_| CovidMapError::MissingColumn(source.to_string()))?;
    }

    let renames = df
        .get_column_names()
        .into_iter()
        .map(|header| (header.to_string(), reformat_date(header)))
        .filter(|(old, new)| old != new)
        .collect_vec();
    for (old, new) in &renames {
        df.rename(old, new)?;
    }
    debug!("Reformatted {} date headers", renames.len());

    let dates = date_columns(df.get_column_names());
    let lf = df
        .lazy()
        .with_columns(
            dates
                .iter()
                .map(|date| col(date).strict_cast(DataType::Int64))
                .collect_vec(),
        )
        .with_columns([
            col(COL::LATITUDE).cast(DataType::Float64),
            col(COL::LONGITUDE).cast(DataType::Float64),
        ]);

    Ok(backward_fill(lf, &dates)
        .with_row_index(COL::LOCATION_ID, None)
        .collect()?)
}

/// Fill each null in `columns` with the value of the column to its right, after that column
/// has itself been filled. Nulls in the last column stay null.
fn backward_fill(mut lf: LazyFrame, columns: &[String]) -> LazyFrame {
    for (current, next) in columns.iter().tuple_windows().collect_vec().into_iter().rev() {
        lf = lf.with_column(
            when(col(current).is_null())
                .then(col(next))
                .otherwise(col(current))
                .alias(current),
        );
    }
    lf
}

/// Fetch, parse and prepare the dataset at `url`.
pub async fn load(url: &str) -> Result<DataFrame> {
    let bytes = fetch_csv(url).await?;
    let df = tokio::task::spawn_blocking(move || parse_csv(bytes).and_then(prepare)).await??;
    info!("Loaded dataset with shape: {:?}", df.shape());
    Ok(df)
}

#[cfg(test)]
pub(crate) mod tests {
    use httpmock::prelude::*;

    use super::*;

    pub(crate) const TWO_LOCATIONS_CSV: &str = "\
UID,Country_Region,Province_State,Lat,Long_,1/22/20,1/23/20
1,US,Alabama,32.3182,-86.9023,0,0
2,US,Washington,47.7511,-120.7401,5,7
";

    const GAPPY_CSV: &str = "\
Country_Region,Province_State,Lat,Long_,1/22/20,1/23/20,1/24/20,13/45/20
US,Alabama,32.3182,-86.9023,,,4,9
US,Texas,31.9686,-99.9018,1,,3,9
US,Ohio,40.4173,-82.9071,2,3,,9
";

    pub(crate) fn prepared(csv: &str) -> DataFrame {
        prepare(parse_csv(csv.as_bytes().to_vec()).unwrap()).unwrap()
    }

    fn column_values(df: &DataFrame, name: &str) -> Vec<Option<i64>> {
        df.column(name).unwrap().i64().unwrap().into_iter().collect()
    }

    #[test]
    fn columns_should_be_renamed() {
        let df = prepared(TWO_LOCATIONS_CSV);
        assert_eq!(
            df.get_column_names(),
            vec![
                COL::LOCATION_ID,
                "UID",
                COL::COUNTRY,
                COL::LOCATION,
                COL::LATITUDE,
                COL::LONGITUDE,
                "01/22/2020",
                "01/23/2020"
            ]
        );
    }

    #[test]
    fn invalid_date_headers_should_be_left_alone() {
        let df = prepared(GAPPY_CSV);
        assert!(df.column("13/45/20").is_ok());
        assert!(df.column("01/24/2020").is_ok());
    }

    #[test]
    fn missing_counts_should_be_backward_filled() {
        let df = prepared(GAPPY_CSV);
        assert_eq!(
            column_values(&df, "01/22/2020"),
            vec![Some(4), Some(1), Some(2)]
        );
        assert_eq!(
            column_values(&df, "01/23/2020"),
            vec![Some(4), Some(3), Some(3)]
        );
        // Nothing to the right to fill from
        assert_eq!(
            column_values(&df, "01/24/2020"),
            vec![Some(4), Some(3), None]
        );
    }

    #[test]
    fn missing_geo_column_should_error() {
        let df = parse_csv(b"Country_Region,Province_State,Lat,1/22/20\nUS,Ohio,40.0,1\n".to_vec())
            .unwrap();
        let err = prepare(df).unwrap_err();
        assert_eq!(err.to_string(), "Expected column not found: Long_");
    }

    #[tokio::test]
    async fn test_loading_dataset() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/confirmed_US.csv");
                then.status(200).body(TWO_LOCATIONS_CSV);
            })
            .await;

        let df = load(&server.url("/confirmed_US.csv")).await;
        assert!(df.is_ok(), "The dataset should load");
        let df = df.unwrap();
        assert_eq!(df.shape(), (2, 8));
        let ids: Vec<Option<IdxSize>> = df
            .column(COL::LOCATION_ID)
            .unwrap()
            .idx()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(ids, vec![Some(0), Some(1)]);
    }

    #[tokio::test]
    async fn failed_request_should_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/missing.csv");
                then.status(404);
            })
            .await;

        let err = load(&server.url("/missing.csv")).await.unwrap_err();
        assert!(
            err.to_string().contains("failed with status 404"),
            "unexpected error: {err}"
        );
    }
}
