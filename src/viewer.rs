//! Presentation state: the uploaded or loaded dataset, filter selections,
//! the page window and the display role, plus the actions that change them.
//!
//! A [`Viewer`] processes one action at a time to completion. Failed actions
//! leave the previous state untouched.

use serde::{Deserialize, Serialize};

use crate::downloader;
use crate::engine::{self, FilterControl, PAGE_SIZES, PageWindow};
use crate::error::{Result, ViewerError};
use crate::gateway::Gateway;
use crate::loader;
use crate::table::{Dataset, FilterState, Row, Snapshot};

/// Who is looking at the table. Only controls whether the upload control is
/// shown; it grants nothing.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Retailers,
    Suppliers,
}

impl Role {
    pub const ALL: [Role; 2] = [Role::Retailers, Role::Suppliers];

    pub fn shows_upload(self) -> bool {
        matches!(self, Role::Suppliers)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Retailers => "retailers",
            Role::Suppliers => "suppliers",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::Retailers => "Retailers",
            Role::Suppliers => "Suppliers",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NoticeKind {
    Info,
    Error,
}

/// One-shot message shown to the user after an action.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    fn info(text: &str) -> Self {
        Notice {
            kind: NoticeKind::Info,
            text: text.to_string(),
        }
    }

    fn error(text: &str) -> Self {
        Notice {
            kind: NoticeKind::Error,
            text: text.to_string(),
        }
    }
}

/// Result of a load action.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Loaded { rows: usize },
    /// The store has never been written.
    NeverSaved,
    /// The store holds a snapshot with no rows.
    EmptyDataset,
}

/// Filter control for one column, with its current pattern.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnView<'a> {
    pub name: &'a str,
    pub control: FilterControl,
    pub value: &'a str,
}

/// Everything needed to draw the page once.
#[derive(Clone, Debug)]
pub struct ViewModel<'a> {
    pub role: Role,
    pub show_upload: bool,
    /// Empty when there is no data; the table and filters are then hidden.
    pub columns: Vec<ColumnView<'a>>,
    pub rows: Vec<&'a Row>,
    pub window: PageWindow,
    pub total: usize,
    pub page_count: usize,
    pub page_sizes: &'static [usize],
}

impl ViewModel<'_> {
    pub fn has_data(&self) -> bool {
        !self.columns.is_empty()
    }

    /// Pagination caption such as `11-20 of 42`.
    pub fn range_label(&self) -> String {
        let from = self.window.offset();
        if self.rows.is_empty() || from >= self.total {
            return format!("0-0 of {}", self.total);
        }
        let to = (from + self.rows.len()).min(self.total);
        format!("{}-{} of {}", from + 1, to, self.total)
    }
}

#[derive(Debug)]
pub struct Viewer {
    role: Role,
    dataset: Dataset,
    filters: FilterState,
    window: PageWindow,
    notice: Option<Notice>,
}

impl Default for Viewer {
    fn default() -> Self {
        Viewer::new(engine::DEFAULT_PAGE_SIZE)
    }
}

impl Viewer {
    pub fn new(page_size: usize) -> Self {
        Viewer {
            role: Role::default(),
            dataset: Dataset::default(),
            filters: FilterState::default(),
            window: PageWindow::new(0, page_size),
            notice: None,
        }
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn filters(&self) -> &FilterState {
        &self.filters
    }

    pub fn window(&self) -> PageWindow {
        self.window
    }

    pub fn set_role(&mut self, role: Role) {
        self.role = role;
    }

    /// Replaces the dataset with a parsed upload and clears every filter.
    ///
    /// On a parse failure the current dataset and filters are kept.
    pub fn upload(&mut self, file_name: Option<&str>, bytes: &[u8]) -> Result<()> {
        let dataset = loader::parse_upload(file_name, bytes).map_err(|e| {
            log::error!("Error parsing upload {:?}: {}", file_name, e);
            e
        })?;

        log::info!(
            "Uploaded {} rows x {} columns",
            dataset.len(),
            dataset.columns().len()
        );
        self.filters = FilterState::for_columns(dataset.columns());
        self.dataset = dataset;
        self.window.page = 0;
        Ok(())
    }

    /// Sets one column's pattern and returns to the first page.
    pub fn set_filter(&mut self, column: &str, pattern: &str) -> Result<()> {
        if !self.dataset.schema().contains(column) {
            return Err(ViewerError::UnknownColumn(column.to_string()));
        }
        self.filters.set(column, pattern);
        self.window.page = 0;
        Ok(())
    }

    pub fn set_page(&mut self, page: usize) {
        self.window.page = page;
    }

    /// Changes the page size (one of [`PAGE_SIZES`]) and returns to the first page.
    pub fn set_page_size(&mut self, size: usize) -> Result<()> {
        if !PAGE_SIZES.contains(&size) {
            return Err(ViewerError::PageSize(size));
        }
        self.window = PageWindow::new(0, size);
        Ok(())
    }

    /// Sends the current dataset and filters to the store.
    pub fn save(&mut self, gateway: &dyn Gateway) -> Result<()> {
        let snapshot = Snapshot::new(&self.dataset, &self.filters);
        match gateway.put(&snapshot) {
            Ok(()) => {
                log::info!("Saved snapshot with {} rows", snapshot.dataset.len());
                self.notice = Some(Notice::info("Data saved successfully!"));
                Ok(())
            }
            Err(e) => {
                log::error!("Error saving data: {}", e);
                self.notice = Some(Notice::error("Failed to save data."));
                Err(e.into())
            }
        }
    }

    /// Replaces the dataset and filters with the stored snapshot.
    ///
    /// A missing or empty snapshot clears everything. A transport failure
    /// leaves the current state as it was.
    pub fn load(&mut self, gateway: &dyn Gateway) -> Result<LoadOutcome> {
        let snapshot = match gateway.get() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                log::error!("Error loading data: {}", e);
                self.notice = Some(Notice::error("Failed to load data."));
                return Err(e.into());
            }
        };

        let outcome = match snapshot {
            None => {
                log::warn!("No data found: nothing has been saved yet");
                self.reset();
                self.notice = Some(Notice::info("No saved data found."));
                LoadOutcome::NeverSaved
            }
            Some(snapshot) if snapshot.is_empty() => {
                log::warn!("No data found: the saved dataset is empty");
                self.reset();
                self.notice = Some(Notice::info("The saved data is empty."));
                LoadOutcome::EmptyDataset
            }
            Some(snapshot) => {
                self.dataset = Dataset::from_records(&snapshot.dataset);
                self.filters = snapshot.filter_state;
                self.window.page = 0;
                log::info!("Loaded snapshot with {} rows", self.dataset.len());
                self.notice = Some(Notice::info("Data loaded successfully!"));
                LoadOutcome::Loaded {
                    rows: self.dataset.len(),
                }
            }
        };
        Ok(outcome)
    }

    fn reset(&mut self) {
        self.dataset = Dataset::default();
        self.filters = FilterState::default();
        self.window.page = 0;
    }

    /// All rows passing the current filters, in dataset order.
    pub fn filtered(&self) -> Vec<&Row> {
        engine::apply_filters(&self.dataset, &self.filters)
    }

    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    /// The filtered rows as CSV, ignoring pagination.
    pub fn export_csv(&self) -> String {
        downloader::to_csv(self.dataset.schema(), &self.filtered())
    }

    pub fn view(&self) -> ViewModel<'_> {
        let filtered = self.filtered();
        let total = filtered.len();
        let rows = engine::paginate(&filtered, self.window).to_vec();

        let columns = if self.dataset.is_empty() {
            Vec::new()
        } else {
            self.dataset
                .columns()
                .iter()
                .map(|name| ColumnView {
                    name,
                    control: engine::filter_control(&self.dataset, name),
                    value: self.filters.get(name),
                })
                .collect()
        };

        ViewModel {
            role: self.role,
            show_upload: self.role.shows_upload(),
            columns,
            rows,
            window: self.window,
            total,
            page_count: self.window.page_count(total),
            page_sizes: &PAGE_SIZES,
        }
    }
}
