//! Search and offset/limit pagination over a store snapshot.

use serde::{Deserialize, Deserializer, Serialize};

use crate::user::User;

pub const DEFAULT_PAGE: u32 = 1;
pub const DEFAULT_PAGE_SIZE: u32 = 50;
pub const MAX_PAGE_SIZE: u32 = 200;

/// Raw listing parameters as supplied by the caller (unclamped).
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, alias = "Page", deserialize_with = "blank_as_none")]
    pub page: Option<i64>,
    #[serde(default, alias = "PageSize", deserialize_with = "blank_as_none")]
    pub page_size: Option<i64>,
    #[serde(default, alias = "Search")]
    pub search: Option<String>,
}

impl ListQuery {
    /// Page number, defaulted and clamped to at least 1.
    pub fn page(&self) -> u32 {
        self.page
            .map_or(DEFAULT_PAGE, |p| p.clamp(1, i64::from(u32::MAX)) as u32)
    }

    /// Page size, defaulted and clamped to `1..=MAX_PAGE_SIZE`.
    pub fn page_size(&self) -> u32 {
        self.page_size.map_or(DEFAULT_PAGE_SIZE, |s| {
            s.clamp(1, i64::from(MAX_PAGE_SIZE)) as u32
        })
    }

    /// Lowercased search term, or `None` when absent or blank.
    pub fn needle(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_lowercase)
    }
}

/// One page of results.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub page: u32,
    pub page_size: u32,
    pub total: usize,
    pub items: Vec<T>,
}

/// Filter, order and slice a snapshot.
///
/// Items are ordered by creation time, then id, so consecutive pages over the
/// same snapshot never overlap.
pub fn paginate(mut users: Vec<User>, query: &ListQuery) -> Page<User> {
    if let Some(needle) = query.needle() {
        users.retain(|u| u.matches(&needle));
    }
    users.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));

    let page = query.page();
    let page_size = query.page_size();
    let total = users.len();
    let offset = (page as usize - 1).saturating_mul(page_size as usize);

    let items = users
        .into_iter()
        .skip(offset)
        .take(page_size as usize)
        .collect();

    Page {
        page,
        page_size,
        total,
        items,
    }
}

fn blank_as_none<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(v) => v.parse().map(Some).map_err(serde::de::Error::custom),
    }
}
