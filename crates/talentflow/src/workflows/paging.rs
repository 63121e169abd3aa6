use serde::Serialize;

use crate::error::TalentError;

/// One slice of a filtered listing plus the unpaged total.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// 1-based page coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub fn new(page: usize, page_size: usize) -> Result<Self, TalentError> {
        if page == 0 {
            return Err(TalentError::validation("page must be a positive integer"));
        }
        if page_size == 0 {
            return Err(TalentError::validation("pageSize must be a positive integer"));
        }
        Ok(Self { page, page_size })
    }

    /// Parses optional query values, falling back to the given page size.
    pub fn parse(
        page: Option<&str>,
        page_size: Option<&str>,
        default_size: usize,
    ) -> Result<Self, TalentError> {
        let page = parse_positive("page", page, 1)?;
        let page_size = parse_positive("pageSize", page_size, default_size)?;
        Self::new(page, page_size)
    }

    pub fn slice<T>(&self, items: Vec<T>) -> Page<T> {
        let total = items.len();
        let start = (self.page - 1).saturating_mul(self.page_size);
        let items = items
            .into_iter()
            .skip(start)
            .take(self.page_size)
            .collect();
        Page {
            items,
            total,
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn parse_positive(name: &str, raw: Option<&str>, default: usize) -> Result<usize, TalentError> {
    match raw.map(str::trim).filter(|value| !value.is_empty()) {
        None => Ok(default),
        Some(value) => value
            .parse::<usize>()
            .map_err(|_| TalentError::validation(format!("{name} must be a positive integer"))),
    }
}
