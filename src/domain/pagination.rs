use serde::{Deserialize, Serialize};

/// Page sizes offered by the product table.
pub const PAGE_SIZE_CHOICES: [usize; 3] = [5, 10, 25];

/// Page size used until the user picks another one.
pub const DEFAULT_PAGE_SIZE: usize = 10;

/// Offset-based pagination over the filtered product set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationState {
    /// Zero-based index of the first displayed record.
    pub offset: usize,
    /// Page size, one of [`PAGE_SIZE_CHOICES`].
    pub limit: usize,
    /// Number of records in the filtered set.
    pub total: usize,
}

impl Default for PaginationState {
    fn default() -> Self {
        Self {
            offset: 0,
            limit: DEFAULT_PAGE_SIZE,
            total: 0,
        }
    }
}

impl PaginationState {
    /// Return to the first page of a set with `total` records.
    pub fn reset(&mut self, total: usize) {
        self.offset = 0;
        self.total = total;
    }

    /// Zero-based page index.
    pub fn page(&self) -> usize {
        self.offset / self.limit.max(1)
    }

    pub fn total_pages(&self) -> usize {
        self.total.div_ceil(self.limit.max(1))
    }

    pub fn previous_offset(&self) -> Option<usize> {
        (self.offset > 0).then(|| self.offset.saturating_sub(self.limit))
    }

    pub fn next_offset(&self) -> Option<usize> {
        let next = self.offset + self.limit;
        (next < self.total).then_some(next)
    }

    /// The `[offset, offset + limit)` window of `items`, clamped to its bounds.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset.min(items.len());
        let end = self.offset.saturating_add(self.limit).min(items.len());
        &items[start..end]
    }
}

/// Pagination change requested by the product table.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct PageChange {
    #[serde(default)]
    pub offset: Option<usize>,
    #[serde(default)]
    pub limit: Option<usize>,
}

impl PageChange {
    pub fn offset(offset: usize) -> Self {
        Self {
            offset: Some(offset),
            limit: None,
        }
    }

    pub fn limit(limit: usize) -> Self {
        Self {
            offset: None,
            limit: Some(limit),
        }
    }
}

pub fn is_supported_page_size(limit: usize) -> bool {
    PAGE_SIZE_CHOICES.contains(&limit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slice_returns_requested_window() {
        let items: Vec<usize> = (0..12).collect();
        let mut state = PaginationState::default();
        state.reset(items.len());

        assert_eq!(state.slice(&items), &items[0..10]);

        state.offset = 10;
        assert_eq!(state.slice(&items), &[10, 11]);
        assert_eq!(state.page(), 1);
        assert_eq!(state.total_pages(), 2);
        assert_eq!(state.next_offset(), None);
        assert_eq!(state.previous_offset(), Some(0));
    }

    #[test]
    fn slice_past_the_end_is_empty() {
        let items = [1, 2, 3];
        let state = PaginationState {
            offset: 25,
            limit: 5,
            total: 3,
        };

        assert!(state.slice(&items).is_empty());
    }

    #[test]
    fn only_listed_page_sizes_are_supported() {
        assert!(is_supported_page_size(5));
        assert!(is_supported_page_size(25));
        assert!(!is_supported_page_size(0));
        assert!(!is_supported_page_size(100));
    }
}
