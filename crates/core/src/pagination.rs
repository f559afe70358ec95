use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::error::{CoreError, Result};

/// 1-based page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub page: usize,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

const fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl Default for PageRequest {
    fn default() -> Self {
        Self { page: 1, page_size: DEFAULT_PAGE_SIZE }
    }
}

impl PageRequest {
    /// Validates the page number and clamps the size into `1..=MAX_PAGE_SIZE`.
    pub fn new(page: usize, page_size: usize) -> Result<Self> {
        if page == 0 {
            return Err(CoreError::InvalidPage("page numbers start at 1".to_owned()));
        }
        Ok(Self { page, page_size: page_size.clamp(1, MAX_PAGE_SIZE) })
    }

    #[must_use]
    pub fn offset(&self) -> usize {
        self.page.saturating_sub(1).saturating_mul(self.effective_size())
    }

    fn effective_size(&self) -> usize {
        self.page_size.clamp(1, MAX_PAGE_SIZE)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageInfo {
    pub page: usize,
    pub page_size: usize,
    pub total_count: usize,
    pub total_pages: usize,
}

/// Slice one page out of `items`. Out-of-range pages come back empty.
pub fn paginate<T>(items: Vec<T>, request: PageRequest) -> (Vec<T>, PageInfo) {
    let page_size = request.effective_size();
    let total_count = items.len();
    let total_pages = total_count.div_ceil(page_size).max(1);
    let page: Vec<T> = items.into_iter().skip(request.offset()).take(page_size).collect();
    let info = PageInfo { page: request.page.max(1), page_size, total_count, total_pages };
    (page, info)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slices_requested_page() {
        let items: Vec<u32> = (1..=45).collect();
        let (page, info) = paginate(items, PageRequest::new(3, 20).unwrap());
        assert_eq!(page, (41..=45).collect::<Vec<_>>());
        assert_eq!(info.total_pages, 3);
        assert_eq!(info.total_count, 45);
    }

    #[test]
    fn empty_input_has_one_page() {
        let (page, info) = paginate(Vec::<u32>::new(), PageRequest::default());
        assert!(page.is_empty());
        assert_eq!(info.total_pages, 1);
        assert_eq!(info.page_size, DEFAULT_PAGE_SIZE);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let (page, info) = paginate(vec![1, 2, 3], PageRequest::new(5, 2).unwrap());
        assert!(page.is_empty());
        assert_eq!(info.total_pages, 2);
        assert_eq!(info.page, 5);
    }

    #[test]
    fn size_is_clamped() {
        let request = PageRequest::new(1, 50_000).unwrap();
        assert_eq!(request.page_size, MAX_PAGE_SIZE);
        assert_eq!(PageRequest::new(1, 0).unwrap().page_size, 1);
        assert!(matches!(PageRequest::new(0, 10), Err(CoreError::InvalidPage(_))));
    }
}
