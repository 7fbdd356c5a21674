//! Per-entity persistence. Each repository owns the SQL for one table and
//! validates its inputs before touching the store. Absent rows come back as
//! `Ok(None)`; only malformed input and store failures are errors.
//!
//! Connection-level `*_in` functions are exposed crate-internally so the
//! services can compose several statements inside one transaction.

pub mod applications;
pub mod candidates;
pub mod companies;
pub mod jobs;
pub mod users;

pub use applications::ApplicationRepository;
pub use candidates::CandidateRepository;
pub use companies::CompanyRepository;
pub use jobs::JobRepository;
pub use users::UserRepository;

/// LIMIT/OFFSET for a zero-based page.
pub(crate) fn page_bounds(page: u32, size: u32) -> (i64, i64) {
    (i64::from(size), i64::from(page) * i64::from(size))
}

/// Maps a stored status label back to its enum, reporting corrupt rows as
/// conversion failures rather than panicking.
pub(crate) fn decode<T>(
    parse: impl FnOnce(&str) -> Option<T>,
    value: String,
    what: &str,
) -> rusqlite::Result<T> {
    parse(&value).ok_or_else(|| {
        rusqlite::Error::FromSqlConversionFailure(
            0,
            rusqlite::types::Type::Text,
            format!("unknown {what} '{value}'").into(),
        )
    })
}
