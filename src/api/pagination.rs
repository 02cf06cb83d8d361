use serde::Serialize;

/// Largest page size any listing endpoint will serve.
pub(crate) const MAX_PAGE_SIZE: i64 = 1_000;

pub(crate) const fn default_limit() -> i64 {
    100
}

/// Bounds a raw `skip`/`limit` pair from the query string. Negative offsets
/// collapse to zero and the limit is forced into `1..=MAX_PAGE_SIZE`.
pub(crate) fn clamp_page(skip: i64, limit: i64) -> (i64, i64) {
    (skip.max(0), limit.clamp(1, MAX_PAGE_SIZE))
}

/// Envelope shared by the question, quiz and result listings. `skip` and
/// `limit` echo the clamped values the page was actually built with.
#[derive(Debug, Serialize)]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) total_count: i64,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}
