//! Manifest pagination arithmetic.

/// Box rows per manifest detail page.
pub const DETAIL_PAGE_SIZE: usize = 10;

/// Number of detail pages needed for `box_count` boxes.
pub fn detail_page_count(box_count: usize) -> usize {
    box_count.div_ceil(DETAIL_PAGE_SIZE)
}

/// Total manifest pages: the cover plus every detail page.
pub fn manifest_page_count(box_count: usize) -> usize {
    1 + detail_page_count(box_count)
}

/// Split `items` into detail pages of at most `DETAIL_PAGE_SIZE` entries.
pub fn detail_pages<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(DETAIL_PAGE_SIZE)
}
