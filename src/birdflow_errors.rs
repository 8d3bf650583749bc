use thiserror::Error;

#[derive(Error, Debug)]
pub enum BirdFlowError {
    #[error("Invalid timestamp in measurement feed: {0}")]
    InvalidTimestamp(String),

    #[error("Invalid altitude band: {0}")]
    InvalidAltitudeBand(String),

    #[error("Unknown radar id: {0}")]
    UnknownRadar(String),

    #[error("CSV error while reading measurement feed: {0}")]
    CsvError(#[from] csv::Error),

    #[error("JSON error while reading structured document: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Unable to perform file operation: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Measurement feed contains no timestamps")]
    EmptyTimeIndex,

    #[error("Settings document names no {0}")]
    MissingDataFile(&'static str),

    #[error("Degenerate view bounds: {0}")]
    InvalidViewBounds(String),

    #[error("Projected radar position is not finite for radar: {0}")]
    NonFiniteProjection(String),
}

impl PartialEq for BirdFlowError {
    fn eq(&self, other: &Self) -> bool {
        use BirdFlowError::*;
        match (self, other) {
            (InvalidTimestamp(a), InvalidTimestamp(b)) => a == b,
            (InvalidAltitudeBand(a), InvalidAltitudeBand(b)) => a == b,
            (UnknownRadar(a), UnknownRadar(b)) => a == b,
            (InvalidViewBounds(a), InvalidViewBounds(b)) => a == b,
            (NonFiniteProjection(a), NonFiniteProjection(b)) => a == b,

            // Wrapped external errors compare by variant only
            (CsvError(_), CsvError(_)) => true,
            (JsonError(_), JsonError(_)) => true,
            (IoError(_), IoError(_)) => true,

            (EmptyTimeIndex, EmptyTimeIndex) => true,
            (MissingDataFile(a), MissingDataFile(b)) => a == b,

            _ => false,
        }
    }
}
