use serde::{Deserialize, Serialize};

/// Paging block returned alongside list results
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Paging {
    pub current_page: i64,
    pub size: i64,
    pub total_page: i64,
}

impl Paging {
    pub fn new(current_page: i64, size: i64, total_rows: i64) -> Self {
        Self {
            current_page,
            size,
            total_page: total_pages(total_rows, size),
        }
    }
}

/// One page of projected items plus its paging block
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub paging: Paging,
}

/// `ceil(total_rows / size)` without going through floats
pub fn total_pages(total_rows: i64, size: i64) -> i64 {
    if size <= 0 {
        return 0;
    }
    (total_rows + size - 1) / size
}

/// OFFSET for a 1-based page number
pub fn offset(page: i64, size: i64) -> i64 {
    (page.max(1) - 1) * size
}
