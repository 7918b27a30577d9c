#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchDirection {
    Forward,
    Backward,
}

/// Pages to test for a search starting from `current`, wrapping once.
///
/// The current page itself is never revisited, so a repeated search from a
/// match only reports pages other than the one already shown.
pub fn search_order(current: u32, page_count: u32, direction: SearchDirection) -> Vec<u32> {
    if page_count == 0 {
        return Vec::new();
    }

    let current = current.min(page_count - 1);

    (1..page_count)
        .map(|step| match direction {
            SearchDirection::Forward => (current + step) % page_count,
            SearchDirection::Backward => (current + page_count - step) % page_count,
        })
        .collect()
}
