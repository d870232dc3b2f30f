//! List response envelope. Each resource names its item array differently
//! (`usuarios`, `documentos`, `entries`, …) but the shape is constant.

use serde::{Deserialize, Serialize};

/// Page requested from a list endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageParams {
    pub page: u32,
    pub limit: u32,
}

impl Default for PageParams {
    fn default() -> Self {
        PageParams { page: 1, limit: 10 }
    }
}

impl PageParams {
    pub fn new(page: u32, limit: u32) -> Self {
        PageParams {
            page: page.max(1),
            limit: limit.max(1),
        }
    }

    pub fn offset(&self) -> u64 {
        u64::from(self.page.saturating_sub(1)) * u64::from(self.limit)
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
}

impl<T> Page<T> {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// `max(1, ceil(total / limit))`.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    let limit = u64::from(limit.max(1));
    let pages = total.div_ceil(limit).max(1);
    u32::try_from(pages).unwrap_or(u32::MAX)
}

/// Wire form of a list response. Fields the backend omits (the key-value
/// store only returns `{entries, total}`) are filled from the request.
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawPage<T> {
    #[serde(
        alias = "usuarios",
        alias = "documentos",
        alias = "entries",
        alias = "nodes",
        alias = "relationships",
        alias = "data"
    )]
    items: Vec<T>,
    #[serde(default)]
    total: Option<u64>,
    #[serde(default)]
    page: Option<u32>,
    #[serde(default)]
    limit: Option<u32>,
    #[serde(default)]
    total_pages: Option<u32>,
}

impl<T> RawPage<T> {
    pub(crate) fn into_page(self, params: PageParams) -> Page<T> {
        let total = self.total.unwrap_or(self.items.len() as u64);
        let limit = self.limit.filter(|l| *l > 0).unwrap_or(params.limit);
        Page {
            total,
            page: self.page.filter(|p| *p > 0).unwrap_or(params.page),
            limit,
            total_pages: self.total_pages.unwrap_or_else(|| total_pages(total, limit)),
            items: self.items,
        }
    }
}
