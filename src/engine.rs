//! Filtering, distinct-value discovery and pagination over a [`Dataset`].
//!
//! Everything here is pure: functions borrow the dataset and return views
//! into it, preserving the original row order.

use indexmap::IndexSet;

use crate::table::{Dataset, FilterState, Record, Row};

/// Columns with at most this many distinct values get a discrete selector.
pub const DISCRETE_FILTER_LIMIT: usize = 10;

/// Page sizes offered by the pagination control.
pub const PAGE_SIZES: [usize; 3] = [10, 50, 100];

pub const DEFAULT_PAGE_SIZE: usize = PAGE_SIZES[0];

/// Filter control offered for a column.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FilterControl {
    /// Pick one of the listed values (or none).
    Select(Vec<String>),
    /// Free-text substring box.
    Text,
}

/// Zero-based page index plus a positive page size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageWindow {
    pub page: usize,
    pub size: usize,
}

impl PageWindow {
    /// A zero size is bumped to one.
    pub fn new(page: usize, size: usize) -> Self {
        PageWindow {
            page,
            size: size.max(1),
        }
    }

    pub fn offset(&self) -> usize {
        self.page.saturating_mul(self.size)
    }

    /// Number of pages needed to show `total` rows; at least one.
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.size).max(1)
    }
}

impl Default for PageWindow {
    fn default() -> Self {
        PageWindow::new(0, DEFAULT_PAGE_SIZE)
    }
}

/// Column order of a loaded record set: the key order of its first record.
pub fn discover_columns(records: &[Record]) -> Vec<String> {
    records
        .first()
        .map(|record| record.keys().cloned().collect())
        .unwrap_or_default()
}

/// Distinct values of `column`, in first-occurrence order.
///
/// An unknown column yields a single empty value per row, collapsed to `[""]`
/// when the dataset has rows.
pub fn unique_values(dataset: &Dataset, column: &str) -> Vec<String> {
    let index = dataset.schema().index_of(column);
    let mut seen: IndexSet<&str> = IndexSet::new();
    for row in dataset.rows() {
        seen.insert(index.map(|i| row.get(i)).unwrap_or(""));
    }
    seen.into_iter().map(str::to_string).collect()
}

/// Chooses the filter control for a column by its cardinality.
pub fn filter_control(dataset: &Dataset, column: &str) -> FilterControl {
    let values = unique_values(dataset, column);
    if values.len() <= DISCRETE_FILTER_LIMIT {
        FilterControl::Select(values)
    } else {
        FilterControl::Text
    }
}

/// Rows whose value contains every active pattern, case-insensitively.
///
/// Patterns keyed by columns outside the schema are ignored.
///
/// ```
/// use tableview::engine::apply_filters;
/// use tableview::loader::from_csv_str;
/// use tableview::table::FilterState;
///
/// let data = from_csv_str("name,price\nApple,1\nBanana,2\nCherry,1\n").unwrap();
/// let filters: FilterState = [("price", "1")].into_iter().collect();
/// let names: Vec<&str> = apply_filters(&data, &filters).iter().map(|r| r.get(0)).collect();
/// assert_eq!(names, ["Apple", "Cherry"]);
/// ```
pub fn apply_filters<'a>(dataset: &'a Dataset, filters: &FilterState) -> Vec<&'a Row> {
    let constraints: Vec<(usize, String)> = filters
        .active()
        .filter_map(|(column, pattern)| {
            dataset
                .schema()
                .index_of(column)
                .map(|i| (i, pattern.to_lowercase()))
        })
        .collect();

    dataset
        .rows()
        .iter()
        .filter(|row| {
            constraints
                .iter()
                .all(|(i, pattern)| row.get(*i).to_lowercase().contains(pattern.as_str()))
        })
        .collect()
}

/// The slice of `filtered` covered by `window`. Out-of-range pages are empty.
pub fn paginate<T>(filtered: &[T], window: PageWindow) -> &[T] {
    let start = window.offset().min(filtered.len());
    let end = start.saturating_add(window.size).min(filtered.len());
    &filtered[start..end]
}
