use thiserror::Error;

/// Errors surfaced by store operations.
///
/// Driver failures are wrapped rather than printed at the call site, so the
/// caller decides how to present them.
#[derive(Debug, Error)]
pub enum Error {
    #[error("sqlite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Delete was asked to run with no usable filter. Deleting every row in
    /// the table must be an explicit decision, not a fallthrough.
    #[error("at least one valid condition must be provided to delete records")]
    EmptyCriteria,

    /// A table, column, or criteria field name that cannot be safely
    /// interpolated into SQL. Values are always bound as parameters;
    /// identifiers cannot be, so they are validated instead.
    #[error("invalid identifier: {0:?}")]
    InvalidIdentifier(String),
}
