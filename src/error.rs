use thiserror::Error;

/// Failures raised by the cleaning, derivation, and reporting stages.
///
/// Network and rendering problems are reported through `anyhow` instead; these
/// variants describe data that does not have the shape the pipeline expects.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PipelineError {
    #[error("cannot parse {raw:?} as a number (column {column}, year {year})")]
    Parse {
        column: String,
        year: i32,
        raw: String,
    },
    #[error("cannot parse {raw:?} as a year in series {column}")]
    BadYear { column: String, raw: String },
    #[error("year {year} appears more than once in series {column}")]
    DuplicateYear { column: String, year: i32 },
    #[error("missing required column: {0}")]
    MissingColumn(String),
    #[error("column {0} already exists")]
    DuplicateColumn(String),
    #[error("year {year} not present in column {column}")]
    MissingYear { column: String, year: i32 },
    #[error("joining {column} left no overlapping years")]
    EmptyJoin { column: String },
    #[error("column {column} has {got} values but the table has {expected} years")]
    LengthMismatch {
        column: String,
        expected: usize,
        got: usize,
    },
    #[error("chart shares must be non-negative with a positive total ({0})")]
    InvalidShares(String),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
