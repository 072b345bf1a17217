use covidmap::error::CovidMapError;

#[derive(thiserror::Error, Debug)]
pub enum CovidMapCliError {
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
    #[error("covidmap error: {0}")]
    CovidMapError(#[from] CovidMapError),
    #[error("Invalid TOML in config file: {0}")]
    TomlError(#[from] toml::de::Error),
    #[error("std IO error: {0}")]
    IOError(#[from] std::io::Error),
}

pub type CovidMapCliResult<T> = Result<T, CovidMapCliError>;
