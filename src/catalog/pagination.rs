pub const DEFAULT_LIMIT: u32 = 6;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    pub page: u32,
    pub limit: u32,
}

impl Pagination {
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Self {
        Self {
            page: page.unwrap_or(1).max(1),
            limit: limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT),
        }
    }

    pub fn total_pages(&self, total: usize) -> u32 {
        total.div_ceil(self.limit as usize) as u32
    }

    fn offset(&self) -> usize {
        (self.page as usize - 1) * self.limit as usize
    }

    /// Returns the items on the current page; empty once past the end.
    pub fn slice<'a, T>(&self, items: &'a [T]) -> &'a [T] {
        let start = self.offset().min(items.len());
        let end = start.saturating_add(self.limit as usize).min(items.len());
        &items[start..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_and_clamps() {
        assert_eq!(Pagination::new(None, None), Pagination { page: 1, limit: 6 });
        assert_eq!(Pagination::new(Some(0), Some(0)), Pagination { page: 1, limit: 1 });
        assert_eq!(Pagination::new(Some(3), Some(500)).limit, MAX_LIMIT);
    }

    #[test]
    fn total_pages_matches_item_count() {
        let p = Pagination::new(None, Some(6));
        assert_eq!(p.total_pages(0), 0);
        assert_eq!(p.total_pages(1), 1);
        assert_eq!(p.total_pages(6), 1);
        assert_eq!(p.total_pages(7), 2);
        assert_eq!(p.total_pages(10), 2);
        assert_eq!(p.total_pages(13), 3);
    }

    #[test]
    fn slices_cover_every_item_once() {
        let items: Vec<u32> = (0..10).collect();
        let limit = 3;
        let pages = Pagination::new(None, Some(limit)).total_pages(items.len());

        let collected: Vec<u32> = (1..=pages)
            .flat_map(|page| Pagination::new(Some(page), Some(limit)).slice(&items).to_vec())
            .collect();
        assert_eq!(collected, items);
        assert_eq!(Pagination::new(Some(4), Some(limit)).slice(&items), &[9]);
    }

    #[test]
    fn page_past_end_is_empty() {
        let items = [1, 2, 3];
        assert!(Pagination::new(Some(5), Some(2)).slice(&items).is_empty());
    }
}
