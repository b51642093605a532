use serde::Serialize;

pub(crate) const DEFAULT_PAGE_LIMIT: i64 = 20;
pub(crate) const MAX_PAGE_LIMIT: i64 = 100;

pub(crate) const fn default_limit() -> i64 {
    100
}

/// Offset pagination for list endpoints that take `skip`/`limit`.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaginatedResponse<T> {
    pub(crate) items: Vec<T>,
    pub(crate) skip: i64,
    pub(crate) limit: i64,
}

/// A 1-based page request resolved from loosely typed query values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PageWindow {
    pub(crate) page: i64,
    pub(crate) limit: i64,
}

impl PageWindow {
    /// Unparseable values fall back to the defaults; `page` is at least 1 and `limit` is clamped.
    pub(crate) fn parse(page: Option<&str>, limit: Option<&str>) -> Self {
        let parse = |raw: Option<&str>| raw.and_then(|value| value.trim().parse::<i64>().ok());
        let page = parse(page).filter(|page| *page >= 1).unwrap_or(1);
        let limit = match parse(limit) {
            Some(limit) if limit >= 1 => limit.min(MAX_PAGE_LIMIT),
            _ => DEFAULT_PAGE_LIMIT,
        };
        Self { page, limit }
    }

    pub(crate) fn skip(self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }

    pub(crate) fn total_pages(self, total: i64) -> i64 {
        (total + self.limit - 1) / self.limit
    }
}
