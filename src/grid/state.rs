//! View state owned by a data grid

use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;

/// Sentinel filter value meaning "no filter"
pub const FILTER_ALL: &str = "all";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }

    pub fn arrow(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

impl fmt::Display for SortDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Single active sort column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub column: String,
    pub direction: SortDirection,
}

/// Snapshot taken when a resize drag starts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizeDrag {
    pub column: usize,
    pub start_x: i32,
    pub start_width: u16,
}

/// Interactive state of one grid instance.
///
/// Created fresh with the grid and dropped with it; nothing is persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub search: String,
    /// column key -> selected value
    pub filters: BTreeMap<String, String>,
    pub sort: Option<SortSpec>,
    /// 1-indexed
    pub page: usize,
    pub page_size: usize,
    pub visible: HashSet<String>,
    pub widths: HashMap<String, u16>,
    pub resize: Option<ResizeDrag>,
}

impl ViewState {
    pub fn new(page_size: usize) -> Self {
        Self {
            search: String::new(),
            filters: BTreeMap::new(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
            visible: HashSet::new(),
            widths: HashMap::new(),
            resize: None,
        }
    }

    /// Snapshot of the query parts a server-side source needs
    pub fn query(&self) -> GridQuery {
        GridQuery {
            search: self.search.clone(),
            filters: self.filters.clone(),
            sort: self.sort.clone(),
            page: self.page,
            page_size: self.page_size,
        }
    }
}

/// Query snapshot forwarded to a server-side data source
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GridQuery {
    pub search: String,
    pub filters: BTreeMap<String, String>,
    pub sort: Option<SortSpec>,
    pub page: usize,
    pub page_size: usize,
}

/// Is this filter value the "match everything" sentinel?
pub fn is_clear_filter(value: &str) -> bool {
    value.is_empty() || value.eq_ignore_ascii_case(FILTER_ALL)
}
