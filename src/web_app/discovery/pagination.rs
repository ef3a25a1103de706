// web_app/discovery/pagination.rs - Pagination window
//
// Which page links to draw for a long listing: first and last page always,
// a few neighbours around the current page, ellipses for the gaps.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Neighbours shown on each side of the current page
pub const DEFAULT_NEIGHBOURS: u32 = 1;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PageItem {
    Page(u32),
    EllipsisLeft,
    EllipsisRight,
}

impl PageItem {
    pub fn page(self) -> Option<u32> {
        match self {
            PageItem::Page(page) => Some(page),
            PageItem::EllipsisLeft | PageItem::EllipsisRight => None,
        }
    }
}

/// Page labels for `current_page` of `total_pages`
///
/// Expects `1 <= current_page <= total_pages`; see [`pagination_window`] for
/// the clamping, suppressing entry point.
pub fn compute_window(current_page: u32, total_pages: u32, neighbours: u32) -> Vec<PageItem> {
    let total_blocks = neighbours.saturating_mul(2).saturating_add(5);
    if total_pages <= total_blocks {
        return (1..=total_pages).map(PageItem::Page).collect();
    }

    let start = current_page.saturating_sub(neighbours).max(2);
    let end = current_page.saturating_add(neighbours).min(total_pages - 1);

    let mut items = vec![PageItem::Page(1)];
    if start > 2 {
        items.push(PageItem::EllipsisLeft);
    }
    items.extend((start..=end).map(PageItem::Page));
    if end < total_pages - 1 {
        items.push(PageItem::EllipsisRight);
    }
    items.push(PageItem::Page(total_pages));

    let mut seen = HashSet::new();
    items.retain(|item| seen.insert(*item));
    items
}

/// Window for the pagination control, or `None` when it should not render
pub fn pagination_window(current_page: u32, total_pages: u32, neighbours: u32) -> Option<Vec<PageItem>> {
    if total_pages <= 1 {
        return None;
    }
    let current = current_page.clamp(1, total_pages);
    Some(compute_window(current, total_pages, neighbours))
}

pub fn can_go_previous(current_page: u32, fetching: bool) -> bool {
    !fetching && current_page > 1
}

pub fn can_go_next(current_page: u32, total_pages: u32, fetching: bool) -> bool {
    !fetching && current_page < total_pages
}

/// Target of a click on `item`; ellipses and out-of-range pages go nowhere
pub fn page_for_click(item: PageItem, total_pages: u32) -> Option<u32> {
    item.page().filter(|page| (1..=total_pages).contains(page))
}

#[cfg(test)]
mod tests {
    use super::PageItem::{EllipsisLeft as L, EllipsisRight as R, Page as P};
    use super::*;

    #[test]
    fn test_few_pages_listed_verbatim() {
        assert_eq!(compute_window(1, 1, 1), vec![P(1)]);
        assert_eq!(compute_window(2, 3, 1), vec![P(1), P(2), P(3)]);
        assert_eq!(
            compute_window(4, 7, 1),
            vec![P(1), P(2), P(3), P(4), P(5), P(6), P(7)]
        );
    }

    #[test]
    fn test_window_in_the_middle() {
        assert_eq!(compute_window(10, 20, 1), vec![P(1), L, P(9), P(10), P(11), R, P(20)]);
    }

    #[test]
    fn test_window_at_edges() {
        assert_eq!(compute_window(1, 20, 1), vec![P(1), P(2), R, P(20)]);
        assert_eq!(compute_window(2, 20, 1), vec![P(1), P(2), P(3), R, P(20)]);
        assert_eq!(compute_window(3, 20, 1), vec![P(1), P(2), P(3), P(4), R, P(20)]);
        assert_eq!(compute_window(20, 20, 1), vec![P(1), L, P(19), P(20)]);
        assert_eq!(compute_window(18, 20, 1), vec![P(1), L, P(17), P(18), P(19), P(20)]);
    }

    #[test]
    fn test_wider_neighbourhood() {
        assert_eq!(
            compute_window(10, 20, 2),
            vec![P(1), L, P(8), P(9), P(10), P(11), P(12), R, P(20)]
        );
        // 2*2 + 5 = 9 pages still fit without ellipses
        assert_eq!(compute_window(5, 9, 2).len(), 9);
    }

    #[test]
    fn test_first_and_last_always_present() {
        for neighbours in 0..3 {
            let threshold = neighbours * 2 + 5;
            for total in (threshold + 1)..(threshold + 12) {
                for current in 1..=total {
                    let window = compute_window(current, total, neighbours);
                    assert_eq!(window.first(), Some(&P(1)), "current={current} total={total}");
                    assert_eq!(window.last(), Some(&P(total)), "current={current} total={total}");
                    assert!(window.contains(&P(current)), "current={current} total={total}");
                }
            }
        }
    }

    #[test]
    fn test_no_duplicates() {
        for current in 1..=12 {
            let window = compute_window(current, 12, 1);
            let unique: HashSet<_> = window.iter().collect();
            assert_eq!(unique.len(), window.len());
        }
    }

    #[test]
    fn test_single_page_suppresses_control() {
        assert_eq!(pagination_window(1, 1, 1), None);
        assert_eq!(pagination_window(1, 0, 1), None);
        assert!(pagination_window(1, 2, 1).is_some());
    }

    #[test]
    fn test_window_clamps_current_page() {
        assert_eq!(pagination_window(0, 20, 1), Some(compute_window(1, 20, 1)));
        assert_eq!(pagination_window(99, 20, 1), Some(compute_window(20, 20, 1)));
    }

    #[test]
    fn test_navigation_guards() {
        assert!(!can_go_previous(1, false));
        assert!(can_go_previous(2, false));
        assert!(!can_go_previous(2, true));
        assert!(can_go_next(1, 3, false));
        assert!(!can_go_next(3, 3, false));
        assert!(!can_go_next(1, 3, true));
    }

    #[test]
    fn test_page_for_click() {
        assert_eq!(page_for_click(P(3), 5), Some(3));
        assert_eq!(page_for_click(P(6), 5), None);
        assert_eq!(page_for_click(P(0), 5), None);
        assert_eq!(page_for_click(L, 5), None);
        assert_eq!(page_for_click(R, 5), None);
    }
}
