//! Offset cursor driving the search endpoint.

/// Largest page the npms.io search endpoint serves per call.
pub const MAX_PAGE_SIZE: usize = 250;

/// Offset/page-size pair for one harvest run.
///
/// The offset only ever moves forward by the nominal page size, regardless of
/// how many results a page actually yielded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationCursor {
    offset: usize,
    page_size: usize,
}

impl PaginationCursor {
    /// Creates a cursor at offset 0.
    ///
    /// `page_size` must be in `1..=MAX_PAGE_SIZE`; `HarvestSettings::validate`
    /// rejects anything else before a cursor is built.
    pub fn new(page_size: usize) -> Self {
        debug_assert!(
            page_size > 0 && page_size <= MAX_PAGE_SIZE,
            "page size {page_size} outside 1..={MAX_PAGE_SIZE}"
        );
        Self {
            offset: 0,
            page_size,
        }
    }

    pub fn offset(&self) -> usize {
        self.offset
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn advance(&mut self) {
        self.offset += self.page_size;
    }
}
