/// Number of pages needed for `total_items`; at least one.
pub fn total_pages(total_items: usize, per_page: usize) -> usize {
    let per_page = per_page.max(1);
    total_items.div_ceil(per_page).max(1)
}

/// Half-open `[start, end)` index range of a 1-based page.
pub fn page_window(total_items: usize, per_page: usize, page: usize) -> (usize, usize) {
    let per_page = per_page.max(1);
    let page = page.max(1);
    let start = (page - 1).saturating_mul(per_page).min(total_items);
    let end = (start + per_page).min(total_items);
    (start, end)
}

/// Slice out one page of `items` along with its footer line, or `None` when
/// the page is past the end.
pub fn paginate<T>(items: &[T], per_page: usize, page: usize) -> Option<(&[T], String)> {
    let total = total_pages(items.len(), per_page);
    let page = page.max(1);
    if page > total {
        return None;
    }

    let (start, end) = page_window(items.len(), per_page, page);
    Some((&items[start..end], format!("Page {page}/{total}")))
}

#[cfg(test)]
mod tests {
    use super::{page_window, paginate, total_pages};

    #[test]
    fn counts_pages() {
        assert_eq!(total_pages(0, 10), 1);
        assert_eq!(total_pages(10, 10), 1);
        assert_eq!(total_pages(11, 10), 2);
        assert_eq!(total_pages(5, 0), 5);
    }

    #[test]
    fn windows_are_clamped() {
        assert_eq!(page_window(25, 10, 1), (0, 10));
        assert_eq!(page_window(25, 10, 3), (20, 25));
        assert_eq!(page_window(25, 10, 9), (25, 25));
        assert_eq!(page_window(25, 10, 0), (0, 10));
    }

    #[test]
    fn paginates_slices() {
        let items: Vec<u32> = (1..=12).collect();
        let (page, footer) = paginate(&items, 5, 3).expect("page exists");
        assert_eq!(page, &[11, 12]);
        assert_eq!(footer, "Page 3/3");
        assert!(paginate(&items, 5, 4).is_none());

        let empty: [u32; 0] = [];
        let (page, footer) = paginate(&empty, 5, 1).expect("first page always exists");
        assert!(page.is_empty());
        assert_eq!(footer, "Page 1/1");
    }
}
