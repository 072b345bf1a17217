//! Error types.

#[derive(thiserror::Error, Debug)]
pub enum CovidMapError {
    #[error("Wrapped anyhow error: {0}")]
    AnyhowError(#[from] anyhow::Error),
    #[error("Request to {url} failed with status {status}.")]
    FailedRequest { url: String, status: u16 },
    #[error("Expected column not found: {0}")]
    MissingColumn(String),
    #[error("No date columns found in the dataset.")]
    NoDateColumns,
    #[error("{count} counts on {date} are still missing after backfilling.")]
    MissingCounts { date: String, count: usize },
    #[error("Wrapped polars error: {0}")]
    PolarsError(#[from] polars::error::PolarsError),
}

#[cfg(test)]
mod tests {
    use anyhow::anyhow;

    use super::*;

    #[test]
    fn test_anyhow() {
        let anyhow_error = anyhow!("An anyhow error");
        let covidmap_error: CovidMapError = anyhow_error.into();
        assert_eq!(
            covidmap_error.to_string(),
            "Wrapped anyhow error: An anyhow error"
        );
    }

    #[test]
    fn test_missing_column_message() {
        let err = CovidMapError::MissingColumn("Lat".into());
        assert_eq!(err.to_string(), "Expected column not found: Lat");
    }

    #[test]
    fn test_missing_counts_message() {
        let err = CovidMapError::MissingCounts {
            date: "01/23/2020".into(),
            count: 2,
        };
        assert_eq!(
            err.to_string(),
            "2 counts on 01/23/2020 are still missing after backfilling."
        );
    }
}
