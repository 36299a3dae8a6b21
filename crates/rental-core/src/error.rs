use thiserror::Error;

/// Errors raised while loading a catalog source
///
/// These are fatal at startup: a missing or corrupt catalog must not be
/// silently replaced by an empty one.
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read catalog {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid CSV catalog at line {line}: {message}")]
    Csv { line: u64, message: String },

    #[error("Invalid JSON catalog: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Unsupported catalog format: {0} (expected .csv or .json)")]
    UnsupportedFormat(String),

    #[error("Duplicate car id in catalog: {0}")]
    DuplicateId(String),
}

impl From<csv::Error> for CatalogError {
    fn from(err: csv::Error) -> Self {
        let line = err.position().map(|p| p.line()).unwrap_or(0);
        CatalogError::Csv {
            line,
            message: err.to_string(),
        }
    }
}

/// Errors raised while coercing an external preference payload
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PreferenceError {
    #[error("Preference payload must be a JSON object, got {0}")]
    NotAnObject(String),

    #[error("Field {field} has an unusable value: {value}")]
    InvalidField { field: String, value: String },

    #[error("Field {field} is not a number: {value}")]
    InvalidNumber { field: String, value: String },
}

/// Errors raised by the booking log
#[derive(Debug, Error, Clone, PartialEq)]
pub enum BookingError {
    #[error("Car not found in catalog: {0}")]
    UnknownCar(String),

    #[error("User id must not be empty")]
    MissingUser,
}
