use thiserror::Error;

/// Errors reported by the simulation engine.
///
/// Every engine operation is pure CPU/memory work, so these are all caller
/// errors reported synchronously; nothing here is worth retrying.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LifeError {
    #[error("grid dimensions {width}x{height} are zero or too large")]
    InvalidDimension { width: usize, height: usize },

    #[error("cell ({col}, {row}) is outside the {width}x{height} grid")]
    OutOfBounds {
        col: i64,
        row: i64,
        width: usize,
        height: usize,
    },

    #[error("no pattern named {0:?}")]
    UnknownPattern(String),

    #[error("malformed save data at token {token}: {reason}")]
    MalformedData { token: usize, reason: String },

    #[error("clock interval must be greater than zero")]
    InvalidInterval,
}

impl LifeError {
    pub(crate) fn out_of_bounds(col: i64, row: i64, width: usize, height: usize) -> Self {
        LifeError::OutOfBounds { col, row, width, height }
    }

    /// `OutOfBounds` for a position given in any integer type. Values past
    /// `i64::MAX` are reported as `i64::MAX`.
    pub(crate) fn out_of_range<C, R>(col: C, row: R, width: usize, height: usize) -> Self
    where
        C: TryInto<i64>,
        R: TryInto<i64>,
    {
        Self::out_of_bounds(
            col.try_into().unwrap_or(i64::MAX),
            row.try_into().unwrap_or(i64::MAX),
            width,
            height,
        )
    }

    pub(crate) fn malformed(token: usize, reason: impl Into<String>) -> Self {
        LifeError::MalformedData { token, reason: reason.into() }
    }
}

pub type Result<T> = std::result::Result<T, LifeError>;
