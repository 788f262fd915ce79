use thiserror::Error;

#[derive(Error, Debug)]
pub enum ScreenerError {
    #[error("data fetch failed: {0}")]
    FetchFailed(String),

    #[error("malformed statement: {0}")]
    MalformedStatement(String),

    #[error("line item not found: {0}")]
    RowNotFound(String),

    #[error("non-numeric value for {item}: {value:?}")]
    NotNumeric { item: String, value: String },
}
