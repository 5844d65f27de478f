//! Page planning over densely numbered registry entries.
//!
//! Entries are assumed to be numbered `1..=total` with no gaps. Ids that do not exist on
//! chain simply fail at the batch read and are dropped there.

use crate::types::EntryId;

/// Entry ids for `page` (0-based) of `page_size` entries out of `total`.
///
/// Returns an empty list for negative pages, non-positive sizes, an empty registry, a page past
/// the end, or arithmetic overflow. An empty list is the normal "no more data" answer.
pub fn plan_page(page: i64, page_size: i64, total: u64) -> Vec<EntryId> {
    if page < 0 || page_size <= 0 || total == 0 {
        return Vec::new();
    }
    let (page, page_size) = (page as u64, page_size as u64);

    let Some(start) = page.checked_mul(page_size) else {
        return Vec::new();
    };
    if start >= total {
        return Vec::new();
    }
    let end = start.saturating_add(page_size).min(total);

    (start + 1..=end).collect()
}

/// Number of pages needed to cover `total` entries.
pub fn page_count(page_size: i64, total: u64) -> u64 {
    if page_size <= 0 {
        return 0;
    }
    total.div_ceil(page_size as u64)
}
