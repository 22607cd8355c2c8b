/// In-memory complaint query pipeline and analytics aggregation.
///
/// The store applies equality filters; this module owns everything
/// after the fetch: sort-key resolution, stable sorting, windowing,
/// and the per-branch statistics. All functions are pure over their
/// input set.
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

use crate::db::models::Complaint;

/// Default page size when the limit parameter is absent or unusable
const DEFAULT_PAGE_SIZE: usize = 15;

/// Requested complaint ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortKey {
    DateAsc,
    DateDesc,
    RatingAsc,
    RatingDesc,
}

impl SortKey {
    /// Resolve the raw `sort` query parameter. Anything unrecognized,
    /// including an absent parameter, falls back to newest-first.
    pub fn from_param(raw: Option<&str>) -> Self {
        match raw {
            Some("date_asc") => SortKey::DateAsc,
            Some("date_desc") => SortKey::DateDesc,
            Some("rating_asc") => SortKey::RatingAsc,
            Some("rating_desc") => SortKey::RatingDesc,
            _ => SortKey::DateDesc,
        }
    }
}

fn creation_instant(complaint: &Complaint) -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(&complaint.created_at)
        .map(|dt| dt.with_timezone(&Utc))
        .unwrap_or(DateTime::UNIX_EPOCH)
}

/// Stable sort; an absent rating compares as 0 without mutating the record
pub fn sort_complaints(complaints: &mut [Complaint], key: SortKey) {
    match key {
        SortKey::DateAsc => complaints.sort_by_key(creation_instant),
        SortKey::DateDesc => {
            complaints.sort_by(|a, b| creation_instant(b).cmp(&creation_instant(a)))
        }
        SortKey::RatingAsc => complaints.sort_by_key(|c| c.rating.unwrap_or(0)),
        SortKey::RatingDesc => {
            complaints.sort_by(|a, b| b.rating.unwrap_or(0).cmp(&a.rating.unwrap_or(0)))
        }
    }
}

/// Resolved pagination parameters (both always >= 1)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageParams {
    pub page: usize,
    pub limit: usize,
}

impl PageParams {
    /// Resolve raw page/limit parameters. Absent, non-numeric, and
    /// non-positive values all mean "use the default" (page 1, size 15).
    pub fn resolve(page_raw: Option<&str>, limit_raw: Option<&str>) -> Self {
        PageParams {
            page: parse_positive(page_raw).unwrap_or(1),
            limit: parse_positive(limit_raw).unwrap_or(DEFAULT_PAGE_SIZE),
        }
    }
}

fn parse_positive(raw: Option<&str>) -> Option<usize> {
    raw.and_then(|s| s.parse::<i64>().ok())
        .filter(|n| *n > 0)
        .map(|n| n as usize)
}

/// One window of a sorted result set. Handlers flatten this into the
/// response envelope themselves; it never hits the wire directly.
#[derive(Debug)]
pub struct Page {
    pub items: Vec<Complaint>,
    pub total: usize,
    pub page: usize,
    pub total_pages: usize,
}

impl Page {
    pub fn count(&self) -> usize {
        self.items.len()
    }
}

/// Slice the half-open window [offset, offset+limit) out of the sorted
/// sequence, clipped to its bounds. An out-of-range page yields an
/// empty window, not an error.
pub fn paginate(complaints: Vec<Complaint>, params: &PageParams) -> Page {
    let total = complaints.len();
    let total_pages = total.div_ceil(params.limit);
    // Saturate: a huge page number is just far out of range, never
    // an overflow panic or a wrapped offset back inside the sequence.
    let offset = params.page.saturating_sub(1).saturating_mul(params.limit);
    let items = if offset >= total {
        Vec::new()
    } else {
        let end = offset.saturating_add(params.limit).min(total);
        complaints[offset..end].to_vec()
    };

    Page {
        items,
        total,
        page: params.page,
        total_pages,
    }
}

/// Per-branch complaint statistics. The branch key is the free-text
/// name as it appears on the complaints, not a registry foreign key.
#[derive(Debug, Clone, Serialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BranchStats {
    #[serde(rename = "_id")]
    pub branch: String,
    pub count: usize,
    pub avg_rating: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub total: usize,
    pub global_avg_rating: f64,
    pub by_branch: Vec<BranchStats>,
}

/// Aggregate the full complaint collection. Averages count rated
/// complaints only; the global one is rounded to one decimal and
/// reported as 0 when nothing is rated. Branches with zero complaints
/// never appear in the breakdown.
pub fn aggregate(complaints: &[Complaint]) -> Analytics {
    let mut sum_rating = 0i64;
    let mut rated_count = 0usize;
    // branch -> (complaint count, rating sum, rated count)
    let mut by_branch: BTreeMap<&str, (usize, i64, usize)> = BTreeMap::new();

    for complaint in complaints {
        let entry = by_branch.entry(&complaint.branch).or_default();
        entry.0 += 1;
        if let Some(rating) = complaint.rating {
            entry.1 += rating;
            entry.2 += 1;
            sum_rating += rating;
            rated_count += 1;
        }
    }

    let global_avg_rating = if rated_count > 0 {
        (sum_rating as f64 / rated_count as f64 * 10.0).round() / 10.0
    } else {
        0.0
    };

    let by_branch = by_branch
        .into_iter()
        .map(|(branch, (count, sum, rated))| BranchStats {
            branch: branch.to_string(),
            count,
            avg_rating: if rated > 0 {
                sum as f64 / rated as f64
            } else {
                0.0
            },
        })
        .collect();

    Analytics {
        total: complaints.len(),
        global_avg_rating,
        by_branch,
    }
}
