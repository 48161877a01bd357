//! Translate `page` and `limit`, and describe where a page sits in a result.

use serde::Serialize;

use query_engine_document::document::ast::Window;
use query_engine_metadata::metadata::PaginationSettings;

use crate::translation::params::{self, QueryParams};

/// The requested page, 1-based, and its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: u64,
    pub limit: u64,
}

impl Page {
    /// Number of records before this page.
    pub fn skip(&self) -> u64 {
        self.number.saturating_sub(1).saturating_mul(self.limit)
    }

    pub fn window(&self) -> Window {
        Window {
            skip: self.skip(),
            limit: Some(self.limit),
        }
    }
}

/// Read the page window from the parameters.
///
/// Values are read from their leading integer, so `2.5` is 2 and `3abc` is 3.
/// Text without one, and zero, fall back to the default. Negative values
/// become 1. The limit never exceeds the configured maximum.
pub fn translate_page(settings: &PaginationSettings, params: &QueryParams) -> Page {
    let number = read_positive(params, params::PAGE).unwrap_or(1);
    let limit = read_positive(params, params::LIMIT)
        .unwrap_or(settings.default_limit)
        .min(settings.max_limit)
        .max(1);
    Page { number, limit }
}

fn read_positive(params: &QueryParams, name: &str) -> Option<u64> {
    let value = leading_integer(params.first(name)?)?;
    match value {
        0 => None,
        negative if negative < 0 => Some(1),
        positive => u64::try_from(positive).ok(),
    }
}

/// An optional sign followed by digits, ignoring whatever comes after.
fn leading_integer(text: &str) -> Option<i64> {
    let text = text.trim_start();
    let (negative, unsigned) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };
    let end = unsigned
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(unsigned.len());
    let magnitude = unsigned[..end].parse::<i64>().ok()?;
    Some(if negative { -magnitude } else { magnitude })
}

/// Pagination details returned next to a page of records.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaginationInfo {
    pub current_page: u64,
    pub total_pages: u64,
    pub total_records: u64,
    pub records_per_page: u64,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub next_page: Option<u64>,
    pub prev_page: Option<u64>,
}

impl PaginationInfo {
    pub fn new(page: u64, limit: u64, total: u64) -> Self {
        let total_pages = if total == 0 {
            0
        } else {
            total.div_ceil(limit.max(1))
        };
        let has_next_page = page < total_pages;
        let has_prev_page = page > 1;
        PaginationInfo {
            current_page: page,
            total_pages,
            total_records: total,
            records_per_page: limit,
            has_next_page,
            has_prev_page,
            next_page: has_next_page.then_some(page + 1),
            prev_page: has_prev_page.then_some(page.saturating_sub(1)),
        }
    }
}
