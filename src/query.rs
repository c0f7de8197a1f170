use serde::Deserialize;

use crate::filter::{self, FilterMap};

/// Raw query-string parameters, all optional and uninterpreted.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimelineParams {
    pub limit: Option<String>,
    pub from_id: Option<String>,
    pub primary_filter: Option<String>,
    pub secondary_filter: Option<String>,
}

/// Normalized query driving resolution.
///
/// `limit == 0` means "no pagination": the whole document, or the single
/// entity named by `from_id`. During the path-climbing fallback the
/// resolver threads a copy of this value with `from_id` set to the
/// reinterpreted path segment.
#[derive(Debug, Default, Clone)]
pub struct TimelineQuery {
    pub limit: usize,
    pub from_id: Option<String>,
    pub filters: Option<FilterMap>,
}

impl From<TimelineParams> for TimelineQuery {
    fn from(params: TimelineParams) -> Self {
        Self {
            limit: parse_limit(params.limit.as_deref()),
            from_id: params.from_id,
            filters: filter::parse_filters(
                params.primary_filter.as_deref(),
                params.secondary_filter.as_deref(),
            ),
        }
    }
}

// Absence, unparseable input and negative values all coerce to 0.
fn parse_limit(raw: Option<&str>) -> usize {
    raw.and_then(|value| value.trim().parse::<i64>().ok())
        .map(|value| value.max(0) as usize)
        .unwrap_or(0)
}
