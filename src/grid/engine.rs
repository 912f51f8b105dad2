//! Data grid engine
//!
//! Derives the rendered view of a record collection:
//! records -> global search -> column filters -> sort -> page slice.
//! Every stage works on indices into the caller's records, which are never
//! reordered or mutated.
//!
//! In server-driven mode the grid skips the pipeline entirely. Search, filter,
//! sort and paging changes are recorded in the view state and forwarded to the
//! caller's callbacks, and the records handed back are rendered as-is.

use super::column::Column;
use super::export::{ExportFormat, ExportFormatter, ExportTable};
use super::state::{is_clear_filter, GridQuery, ResizeDrag, SortDirection, SortSpec, ViewState};
use super::value::CellValue;
use anyhow::{anyhow, Result};
use std::collections::{HashMap, HashSet};

/// Records shown in a grid may expose a stable identity used as row key
pub trait GridRecord {
    fn record_key(&self) -> Option<String> {
        None
    }
}

type PageCallback = Box<dyn FnMut(usize)>;
type QueryCallback = Box<dyn FnMut(&GridQuery)>;

/// Callbacks invoked in server-driven mode
#[derive(Default)]
pub struct ServerCallbacks {
    pub on_page_change: Option<PageCallback>,
    pub on_page_size_change: Option<PageCallback>,
    pub on_query_change: Option<QueryCallback>,
}

/// Who does the filtering, sorting and paging
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridMode {
    Client,
    /// The caller already paginated; `total_rows` is the size of the full
    /// result set on the server
    Server { total_rows: usize },
}

pub struct DataGrid<T> {
    records: Vec<T>,
    columns: Vec<Column<T>>,
    state: ViewState,
    mode: GridMode,
    callbacks: ServerCallbacks,
    exporters: HashMap<ExportFormat, Box<dyn ExportFormatter>>,
    title: String,
    empty_message: String,
}

impl<T: GridRecord> DataGrid<T> {
    pub fn new(columns: Vec<Column<T>>, page_size: usize) -> Self {
        let mut state = ViewState::new(page_size);
        for column in &columns {
            if !column.hidden {
                state.visible.insert(column.key.clone());
            }
            state.widths.insert(column.key.clone(), column.width);
        }

        Self {
            records: Vec::new(),
            columns,
            state,
            mode: GridMode::Client,
            callbacks: ServerCallbacks::default(),
            exporters: HashMap::new(),
            title: String::new(),
            empty_message: "No records found".to_string(),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_empty_message(mut self, message: impl Into<String>) -> Self {
        self.empty_message = message.into();
        self
    }

    /// Switch to server-driven mode
    pub fn server_driven(mut self, callbacks: ServerCallbacks) -> Self {
        self.mode = GridMode::Server { total_rows: 0 };
        self.callbacks = callbacks;
        self
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Data
    // ─────────────────────────────────────────────────────────────────────────

    /// Replace the record set (client mode) and re-clamp the page
    pub fn set_records(&mut self, records: Vec<T>) {
        self.records = records;
        self.clamp_page();
    }

    /// Replace the current page of a server-driven grid
    pub fn set_server_page(&mut self, records: Vec<T>, total_rows: usize) {
        self.records = records;
        if let GridMode::Server { total_rows: total } = &mut self.mode {
            *total = total_rows;
        }
        self.clamp_page();
    }

    pub fn records(&self) -> &[T] {
        &self.records
    }

    pub fn columns(&self) -> &[Column<T>] {
        &self.columns
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn mode(&self) -> GridMode {
        self.mode
    }

    pub fn query(&self) -> GridQuery {
        self.state.query()
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn empty_message(&self) -> &str {
        &self.empty_message
    }

    fn column_index(&self, key: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.key == key)
    }

    pub fn column(&self, key: &str) -> Option<&Column<T>> {
        self.columns.iter().find(|c| c.key == key)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Derivation pipeline
    // ─────────────────────────────────────────────────────────────────────────

    fn matches_search(&self, record: &T, term: &str) -> bool {
        self.columns
            .iter()
            .filter(|c| c.searchable)
            .any(|c| c.value(record).search_text().contains(term))
    }

    fn matches_filters(&self, record: &T) -> bool {
        self.state.filters.iter().all(|(key, wanted)| {
            match self.column(key) {
                Some(column) => column.value(record).search_text() == wanted.to_lowercase(),
                None => true,
            }
        })
    }

    /// Indices of records after search, filters and sort
    pub fn processed_indices(&self) -> Vec<usize> {
        if matches!(self.mode, GridMode::Server { .. }) {
            return (0..self.records.len()).collect();
        }

        let term = self.state.search.to_lowercase();
        let mut indices: Vec<usize> = (0..self.records.len())
            .filter(|&i| term.is_empty() || self.matches_search(&self.records[i], &term))
            .filter(|&i| self.matches_filters(&self.records[i]))
            .collect();

        if let Some(sort) = &self.state.sort {
            if let Some(column) = self.column(&sort.column) {
                let mut keyed: Vec<(usize, CellValue)> = indices
                    .iter()
                    .map(|&i| (i, column.value(&self.records[i])))
                    .collect();
                // sort_by is stable, equal keys keep input order
                keyed.sort_by(|(_, a), (_, b)| {
                    let ord = a.compare(b);
                    match sort.direction {
                        SortDirection::Asc => ord,
                        SortDirection::Desc => ord.reverse(),
                    }
                });
                indices = keyed.into_iter().map(|(i, _)| i).collect();
            }
        }

        indices
    }

    /// Filtered and sorted records, not paginated
    pub fn processed_rows(&self) -> Vec<&T> {
        self.processed_indices()
            .into_iter()
            .map(|i| &self.records[i])
            .collect()
    }

    /// Records on the current page
    pub fn page_rows(&self) -> Vec<&T> {
        match self.mode {
            GridMode::Server { .. } => self.records.iter().collect(),
            GridMode::Client => {
                let start = (self.state.page - 1) * self.state.page_size;
                self.processed_indices()
                    .into_iter()
                    .skip(start)
                    .take(self.state.page_size)
                    .map(|i| &self.records[i])
                    .collect()
            }
        }
    }

    pub fn total_rows(&self) -> usize {
        match self.mode {
            GridMode::Server { total_rows } => total_rows,
            GridMode::Client => self.processed_indices().len(),
        }
    }

    pub fn total_pages(&self) -> usize {
        self.total_rows().div_ceil(self.state.page_size).max(1)
    }

    pub fn is_empty_view(&self) -> bool {
        self.page_rows().is_empty()
    }

    /// Rendering key for a row: the record's own identity, else its position
    pub fn row_key(&self, record: &T, position: usize) -> String {
        record.record_key().unwrap_or_else(|| position.to_string())
    }

    /// Distinct values a column filter can choose from, taken from the full
    /// unfiltered record set
    pub fn filter_options(&self, key: &str) -> Vec<String> {
        let Some(column) = self.column(key) else {
            return Vec::new();
        };
        let mut seen = HashSet::new();
        let mut options: Vec<String> = self
            .records
            .iter()
            .map(|r| column.value(r).to_string())
            .filter(|v| !v.is_empty() && seen.insert(v.to_lowercase()))
            .collect();
        options.sort_by_key(|v| v.to_lowercase());
        options
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Search, filters, sort
    // ─────────────────────────────────────────────────────────────────────────

    fn query_changed(&mut self) {
        self.state.page = 1;
        if matches!(self.mode, GridMode::Server { .. }) {
            let query = self.state.query();
            if let Some(callback) = self.callbacks.on_query_change.as_mut() {
                callback(&query);
            }
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        self.state.search = term.into();
        self.query_changed();
    }

    /// Equality filter on a column; `"all"` (or an empty value) clears it
    pub fn set_column_filter(&mut self, key: &str, value: &str) {
        if self.column_index(key).is_none() {
            return;
        }
        if is_clear_filter(value) {
            self.state.filters.remove(key);
        } else {
            self.state.filters.insert(key.to_string(), value.to_string());
        }
        self.query_changed();
    }

    pub fn clear_filters(&mut self) {
        self.state.filters.clear();
        self.query_changed();
    }

    /// Sort by a column; the same column again flips the direction
    pub fn set_sort(&mut self, key: &str) {
        match self.column(key) {
            Some(column) if column.sortable => {}
            _ => return,
        }
        self.state.sort = match self.state.sort.take() {
            Some(current) if current.column == key => Some(SortSpec {
                column: current.column,
                direction: current.direction.toggled(),
            }),
            _ => Some(SortSpec {
                column: key.to_string(),
                direction: SortDirection::Asc,
            }),
        };
        self.query_changed();
    }

    pub fn clear_sort(&mut self) {
        if self.state.sort.take().is_some() {
            self.query_changed();
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Paging
    // ─────────────────────────────────────────────────────────────────────────

    fn clamp_page(&mut self) {
        self.state.page = self.state.page.clamp(1, self.total_pages());
    }

    /// Go to a page, clamped into `[1, total_pages]`
    pub fn set_page(&mut self, page: usize) {
        let previous = self.state.page;
        self.state.page = page.clamp(1, self.total_pages());
        if matches!(self.mode, GridMode::Server { .. }) && self.state.page != previous {
            let page = self.state.page;
            if let Some(callback) = self.callbacks.on_page_change.as_mut() {
                callback(page);
            }
        }
    }

    pub fn next_page(&mut self) {
        self.set_page(self.state.page + 1);
    }

    pub fn previous_page(&mut self) {
        self.set_page(self.state.page.saturating_sub(1));
    }

    /// Change rows per page; zero is ignored
    pub fn set_page_size(&mut self, page_size: usize) {
        if page_size == 0 || page_size == self.state.page_size {
            return;
        }
        self.state.page_size = page_size;
        self.clamp_page();
        if matches!(self.mode, GridMode::Server { .. }) {
            if let Some(callback) = self.callbacks.on_page_size_change.as_mut() {
                callback(page_size);
            }
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Columns
    // ─────────────────────────────────────────────────────────────────────────

    /// Visible columns in declaration order
    pub fn visible_columns(&self) -> Vec<&Column<T>> {
        self.columns
            .iter()
            .filter(|c| self.state.visible.contains(&c.key))
            .collect()
    }

    pub fn is_visible(&self, key: &str) -> bool {
        self.state.visible.contains(key)
    }

    /// Show or hide a column. Unknown keys are ignored.
    pub fn toggle_column_visibility(&mut self, key: &str) -> bool {
        if self.column_index(key).is_none() {
            return false;
        }
        if !self.state.visible.remove(key) {
            self.state.visible.insert(key.to_string());
        }
        true
    }

    pub fn column_width(&self, key: &str) -> u16 {
        self.state
            .widths
            .get(key)
            .copied()
            .or_else(|| self.column(key).map(|c| c.width))
            .unwrap_or(0)
    }

    /// Start a resize drag on a column. Refused while another drag is active.
    pub fn begin_resize(&mut self, key: &str, pointer_x: i32) -> bool {
        if self.state.resize.is_some() {
            return false;
        }
        let Some(column) = self.column_index(key) else {
            return false;
        };
        self.state.resize = Some(ResizeDrag {
            column,
            start_x: pointer_x,
            start_width: self.column_width(key),
        });
        true
    }

    pub fn is_resizing(&self) -> bool {
        self.state.resize.is_some()
    }

    /// Apply a drag delta to the column being resized.
    ///
    /// Width = max(min_width, start_width + delta). Does nothing unless a drag
    /// on this column is in progress.
    pub fn resize_column(&mut self, key: &str, delta: i32) -> bool {
        let Some(drag) = self.state.resize else {
            return false;
        };
        let column = &self.columns[drag.column];
        if column.key != key {
            return false;
        }
        let width = column.clamp_width(i32::from(drag.start_width) + delta);
        self.state.widths.insert(column.key.clone(), width);
        true
    }

    /// Pointer moved while dragging
    pub fn drag_to(&mut self, pointer_x: i32) -> bool {
        let Some(drag) = self.state.resize else {
            return false;
        };
        let key = self.columns[drag.column].key.clone();
        self.resize_column(&key, pointer_x - drag.start_x)
    }

    pub fn end_resize(&mut self) {
        self.state.resize = None;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Export
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_exporter(&mut self, format: ExportFormat, formatter: Box<dyn ExportFormatter>) {
        self.exporters.insert(format, formatter);
    }

    pub fn has_exporter(&self, format: ExportFormat) -> bool {
        self.exporters.contains_key(&format)
    }

    /// Visible, exportable columns over every filtered and sorted record
    pub fn export_table(&self) -> ExportTable {
        self.table_for(self.processed_rows())
    }

    fn table_for<'a>(&self, rows: impl IntoIterator<Item = &'a T>) -> ExportTable
    where
        T: 'a,
    {
        let columns: Vec<&Column<T>> = self
            .visible_columns()
            .into_iter()
            .filter(|c| c.exportable)
            .collect();

        ExportTable {
            title: self.title.clone(),
            headers: columns.iter().map(|c| c.header.clone()).collect(),
            rows: rows
                .into_iter()
                .map(|r| columns.iter().map(|c| c.value(r).to_string()).collect())
                .collect(),
        }
    }

    /// Hand the export table to the formatter registered for `format`
    pub fn export_visible(&mut self, format: ExportFormat) -> Result<String> {
        let table = self.export_table();
        self.run_exporter(format, &table)
    }

    /// Export records fetched outside the grid, e.g. every server page of
    /// the current query, through the grid's visible columns
    pub fn export_records(&mut self, format: ExportFormat, records: &[T]) -> Result<String> {
        let table = self.table_for(records);
        self.run_exporter(format, &table)
    }

    fn run_exporter(&mut self, format: ExportFormat, table: &ExportTable) -> Result<String> {
        let formatter = self
            .exporters
            .get_mut(&format)
            .ok_or_else(|| anyhow!("No {} exporter available", format))?;
        formatter.export(table)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, Clone, PartialEq)]
    struct Item {
        id: usize,
        name: String,
        status: String,
        score: f64,
    }

    impl GridRecord for Item {
        fn record_key(&self) -> Option<String> {
            Some(format!("item-{}", self.id))
        }
    }

    fn item(id: usize, name: &str, status: &str, score: f64) -> Item {
        Item {
            id,
            name: name.to_string(),
            status: status.to_string(),
            score,
        }
    }

    fn columns() -> Vec<Column<Item>> {
        vec![
            Column::new("name", "Name", |i: &Item| (&i.name).into()).min_width(6),
            Column::new("status", "Status", |i: &Item| (&i.status).into()).filterable(),
            Column::new("score", "Score", |i: &Item| i.score.into()).min_width(100),
            Column::new("id", "ID", |i: &Item| i.id.into())
                .hidden()
                .unsearchable(),
        ]
    }

    fn grid_with(records: Vec<Item>, page_size: usize) -> DataGrid<Item> {
        let mut grid = DataGrid::new(columns(), page_size);
        grid.set_records(records);
        grid
    }

    fn names(rows: Vec<&Item>) -> Vec<String> {
        rows.into_iter().map(|r| r.name.clone()).collect()
    }

    fn ten_items() -> Vec<Item> {
        (0..10)
            .map(|i| item(i, &format!("item{}", i), "ok", i as f64))
            .collect()
    }

    struct Recorder(Rc<RefCell<Vec<ExportTable>>>);

    impl ExportFormatter for Recorder {
        fn export(&mut self, table: &ExportTable) -> Result<String> {
            self.0.borrow_mut().push(table.clone());
            Ok("recorded".to_string())
        }
    }

    #[test]
    fn test_search_matches_case_insensitive_substring() {
        let mut grid = grid_with(
            vec![item(1, "Alpha", "ok", 1.0), item(2, "Beta", "fail", 2.0)],
            10,
        );
        grid.set_search("alp");
        assert_eq!(names(grid.page_rows()), vec!["Alpha"]);
    }

    #[test]
    fn test_search_skips_unsearchable_columns() {
        let mut grid = grid_with(vec![item(7, "Alpha", "ok", 1.0)], 10);
        grid.set_search("7");
        assert!(grid.is_empty_view());
    }

    #[test]
    fn test_column_filter_equality() {
        let mut grid = grid_with(
            vec![item(1, "Alpha", "ok", 1.0), item(2, "Beta", "fail", 2.0)],
            10,
        );
        grid.set_column_filter("status", "FAIL");
        assert_eq!(names(grid.page_rows()), vec!["Beta"]);

        grid.set_column_filter("status", "all");
        assert_eq!(grid.page_rows().len(), 2);
        assert!(grid.state().filters.is_empty());
    }

    #[test]
    fn test_filter_is_equality_not_substring() {
        let mut grid = grid_with(
            vec![item(1, "a", "online", 1.0), item(2, "b", "on", 2.0)],
            10,
        );
        grid.set_column_filter("status", "on");
        assert_eq!(names(grid.page_rows()), vec!["b"]);
    }

    #[test]
    fn test_filter_options_come_from_unfiltered_records() {
        let mut grid = grid_with(
            vec![
                item(1, "a", "ok", 1.0),
                item(2, "b", "fail", 2.0),
                item(3, "c", "OK", 3.0),
            ],
            10,
        );
        grid.set_column_filter("status", "fail");
        assert_eq!(grid.filter_options("status"), vec!["fail", "ok"]);
        assert!(grid.filter_options("missing").is_empty());
    }

    #[test]
    fn test_pagination_clamps() {
        let mut grid = grid_with(ten_items(), 4);
        assert_eq!(grid.total_pages(), 3);
        assert_eq!(grid.page_rows().len(), 4);

        grid.set_page(3);
        assert_eq!(grid.page_rows().len(), 2);

        grid.set_page(4);
        assert_eq!(grid.state().page, 3);

        grid.set_page(0);
        assert_eq!(grid.state().page, 1);
    }

    #[test]
    fn test_search_and_filter_reset_page() {
        let mut grid = grid_with(ten_items(), 4);
        grid.set_page(3);
        grid.set_search("item");
        assert_eq!(grid.state().page, 1);

        grid.set_page(2);
        grid.set_column_filter("status", "ok");
        assert_eq!(grid.state().page, 1);

        grid.set_page(2);
        grid.set_sort("name");
        assert_eq!(grid.state().page, 1);
    }

    #[test]
    fn test_shrinking_records_reclamps_page() {
        let mut grid = grid_with(ten_items(), 4);
        grid.set_page(3);
        grid.set_records(ten_items().into_iter().take(3).collect());
        assert_eq!(grid.state().page, 1);
    }

    #[test]
    fn test_page_size_zero_ignored() {
        let mut grid = grid_with(ten_items(), 4);
        grid.set_page_size(0);
        assert_eq!(grid.state().page_size, 4);
        grid.set_page(3);
        grid.set_page_size(5);
        assert_eq!(grid.state().page, 2);
    }

    #[test]
    fn test_empty_grid_has_one_page() {
        let grid = grid_with(Vec::new(), 4);
        assert_eq!(grid.total_pages(), 1);
        assert!(grid.is_empty_view());
        assert_eq!(grid.empty_message(), "No records found");
    }

    #[test]
    fn test_numeric_sort_toggles() {
        let scores = [5.0, 10.0, 1.0, 42.0, 9.0];
        let records = scores
            .iter()
            .enumerate()
            .map(|(i, s)| item(i, &format!("n{}", i), "ok", *s))
            .collect();
        let mut grid = grid_with(records, 10);

        grid.set_sort("score");
        let asc: Vec<f64> = grid.page_rows().iter().map(|r| r.score).collect();
        assert_eq!(asc, vec![1.0, 5.0, 9.0, 10.0, 42.0]);

        grid.set_sort("score");
        let desc: Vec<f64> = grid.page_rows().iter().map(|r| r.score).collect();
        let mut reversed = asc.clone();
        reversed.reverse();
        assert_eq!(desc, reversed);
        assert_eq!(grid.state().sort.as_ref().map(|s| s.direction), Some(SortDirection::Desc));
    }

    #[test]
    fn test_text_sort_ignores_case_and_is_stable() {
        let mut grid = grid_with(
            vec![
                item(1, "beta", "b", 0.0),
                item(2, "Alpha", "a", 0.0),
                item(3, "alpha", "c", 0.0),
            ],
            10,
        );
        grid.set_sort("name");
        let order: Vec<usize> = grid.page_rows().iter().map(|r| r.id).collect();
        assert_eq!(order, vec![2, 3, 1]);
    }

    #[test]
    fn test_sort_other_column_starts_ascending() {
        let mut grid = grid_with(ten_items(), 10);
        grid.set_sort("score");
        grid.set_sort("score");
        grid.set_sort("name");
        assert_eq!(
            grid.state().sort,
            Some(SortSpec {
                column: "name".to_string(),
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn test_clear_sort_restores_input_order() {
        let mut grid = grid_with(vec![item(1, "b", "ok", 2.0), item(2, "a", "ok", 1.0)], 10);
        grid.set_sort("name");
        assert_eq!(names(grid.page_rows()), vec!["a", "b"]);
        grid.clear_sort();
        assert!(grid.state().sort.is_none());
        assert_eq!(names(grid.page_rows()), vec!["b", "a"]);
    }

    #[test]
    fn test_unsortable_column_ignored() {
        let mut cols = columns();
        cols[0] = Column::new("name", "Name", |i: &Item| (&i.name).into()).unsortable();
        let mut grid = DataGrid::new(cols, 10);
        grid.set_sort("name");
        assert!(grid.state().sort.is_none());
    }

    #[test]
    fn test_pipeline_does_not_mutate_records() {
        let records = vec![item(1, "b", "ok", 2.0), item(2, "a", "ok", 1.0)];
        let mut grid = grid_with(records.clone(), 10);
        grid.set_sort("name");
        let _ = grid.page_rows();
        assert_eq!(grid.records(), records.as_slice());
    }

    #[test]
    fn test_visibility_toggle_and_defaults() {
        let mut grid = grid_with(ten_items(), 10);
        let keys: Vec<&str> = grid.visible_columns().into_iter().map(|c| c.key.as_str()).collect();
        assert_eq!(keys, vec!["name", "status", "score"]);

        assert!(grid.toggle_column_visibility("id"));
        assert!(grid.is_visible("id"));
        assert!(!grid.toggle_column_visibility("nope"));
        assert!(!grid.is_visible("nope"));
    }

    #[test]
    fn test_resize_respects_min_width() {
        let mut grid = grid_with(ten_items(), 10);
        assert!(grid.begin_resize("score", 500));
        assert!(grid.resize_column("score", -500));
        assert_eq!(grid.column_width("score"), 100);
        grid.end_resize();
    }

    #[test]
    fn test_resize_requires_active_drag() {
        let mut grid = grid_with(ten_items(), 10);
        let before = grid.column_width("name");
        assert!(!grid.resize_column("name", 10));
        assert_eq!(grid.column_width("name"), before);
    }

    #[test]
    fn test_resize_refused_while_dragging() {
        let mut grid = grid_with(ten_items(), 10);
        assert!(grid.begin_resize("name", 10));
        assert!(!grid.begin_resize("status", 20));
        assert!(!grid.resize_column("status", 5));

        assert!(grid.drag_to(15));
        assert_eq!(grid.column_width("name"), 11);
        assert!(grid.drag_to(12));
        assert_eq!(grid.column_width("name"), 8);
        grid.end_resize();
        assert!(!grid.is_resizing());
        assert!(grid.begin_resize("status", 20));
    }

    #[test]
    fn test_row_key_falls_back_to_position() {
        struct Plain;
        impl GridRecord for Plain {}
        let grid: DataGrid<Plain> =
            DataGrid::new(vec![Column::new("x", "X", |_: &Plain| CellValue::Empty)], 5);
        assert_eq!(grid.row_key(&Plain, 3), "3");

        let grid = grid_with(ten_items(), 5);
        assert_eq!(grid.row_key(&grid.records()[2], 0), "item-2");
    }

    #[test]
    fn test_export_uses_visible_exportable_columns_and_all_pages() {
        let mut cols = columns();
        cols[2] = Column::new("score", "Score", |i: &Item| i.score.into()).no_export();
        let mut grid = DataGrid::new(cols, 2).with_title("Items");
        grid.set_records(ten_items());
        grid.toggle_column_visibility("status");
        grid.set_sort("name");
        grid.set_sort("name");

        let recorded = Rc::new(RefCell::new(Vec::new()));
        grid.set_exporter(ExportFormat::Csv, Box::new(Recorder(recorded.clone())));
        let out = grid.export_visible(ExportFormat::Csv).unwrap();
        assert_eq!(out, "recorded");

        let tables = recorded.borrow();
        let table = &tables[0];
        assert_eq!(table.title, "Items");
        assert_eq!(table.headers, vec!["Name"]);
        assert_eq!(table.rows.len(), 10);
        assert_eq!(table.rows[0], vec!["item9"]);
    }

    #[test]
    fn test_server_export_covers_every_fetched_row() {
        let mut grid = DataGrid::new(columns(), 2).server_driven(ServerCallbacks::default());
        grid.set_server_page(ten_items()[..2].to_vec(), 10);
        grid.toggle_column_visibility("score");

        let recorded = Rc::new(RefCell::new(Vec::new()));
        grid.set_exporter(ExportFormat::Csv, Box::new(Recorder(recorded.clone())));
        grid.export_records(ExportFormat::Csv, &ten_items()).unwrap();

        let tables = recorded.borrow();
        assert_eq!(tables[0].headers, vec!["Name", "Status"]);
        assert_eq!(tables[0].rows.len(), grid.total_rows());
        assert_eq!(tables[0].rows[9], vec!["item9", "ok"]);
    }

    #[test]
    fn test_export_without_formatter_fails() {
        let mut grid = grid_with(ten_items(), 10);
        assert!(grid.export_visible(ExportFormat::Pdf).is_err());
    }

    #[test]
    fn test_server_mode_forwards_and_never_slices() {
        let pages = Rc::new(RefCell::new(Vec::new()));
        let sizes = Rc::new(RefCell::new(Vec::new()));
        let queries = Rc::new(RefCell::new(Vec::new()));
        let (p, s, q) = (pages.clone(), sizes.clone(), queries.clone());

        let mut grid = DataGrid::new(columns(), 4).server_driven(ServerCallbacks {
            on_page_change: Some(Box::new(move |page| p.borrow_mut().push(page))),
            on_page_size_change: Some(Box::new(move |size| s.borrow_mut().push(size))),
            on_query_change: Some(Box::new(move |query: &GridQuery| {
                q.borrow_mut().push(query.clone())
            })),
        });

        // Server handed back 6 rows for a 4-row page; trust it as-is
        let rows: Vec<Item> = ten_items().into_iter().rev().take(6).collect();
        grid.set_server_page(rows, 10);
        assert_eq!(grid.page_rows().len(), 6);
        assert_eq!(grid.total_pages(), 3);

        grid.set_sort("name");
        assert_eq!(grid.page_rows()[0].name, "item9");

        grid.set_page(9);
        assert_eq!(grid.state().page, 3);
        grid.set_page(3);
        assert_eq!(*pages.borrow(), vec![3]);

        grid.set_search("abc");
        assert_eq!(grid.state().page, 1);
        let last = queries.borrow().last().cloned().unwrap();
        assert_eq!(last.search, "abc");
        assert_eq!(last.page, 1);
        assert_eq!(queries.borrow().len(), 2);

        grid.set_page_size(5);
        assert_eq!(*sizes.borrow(), vec![5]);
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    #[derive(Debug, Clone)]
    struct Rec {
        id: usize,
        name: String,
        tag: String,
        value: i64,
    }

    impl GridRecord for Rec {}

    fn columns() -> Vec<Column<Rec>> {
        vec![
            Column::new("name", "Name", |r: &Rec| (&r.name).into()),
            Column::new("tag", "Tag", |r: &Rec| (&r.tag).into()).filterable(),
            Column::new("value", "Value", |r: &Rec| r.value.into()).min_width(7),
            Column::new("id", "Id", |r: &Rec| r.id.into()).unsearchable(),
        ]
    }

    fn records() -> impl Strategy<Value = Vec<Rec>> {
        prop::collection::vec(("[a-dA-D]{0,5}", "[xyz]", -50i64..50), 0..40).prop_map(|rows| {
            rows.into_iter()
                .enumerate()
                .map(|(id, (name, tag, value))| Rec {
                    id,
                    name,
                    tag,
                    value,
                })
                .collect()
        })
    }

    fn grid(records: Vec<Rec>, page_size: usize) -> DataGrid<Rec> {
        let mut grid = DataGrid::new(columns(), page_size);
        grid.set_records(records);
        grid
    }

    fn searchable_text(r: &Rec) -> Vec<String> {
        vec![r.name.to_lowercase(), r.tag.to_lowercase(), r.value.to_string()]
    }

    proptest! {
        #[test]
        fn search_keeps_exactly_the_matching_rows(rows in records(), term in "[a-dA-Dxyz0-9-]{0,2}") {
            let mut g = grid(rows.clone(), 1000);
            g.set_search(term.clone());
            let kept: Vec<usize> = g.processed_rows().iter().map(|r| r.id).collect();
            let needle = term.to_lowercase();
            let expected: Vec<usize> = rows
                .iter()
                .filter(|r| searchable_text(r).iter().any(|t| t.contains(&needle)))
                .map(|r| r.id)
                .collect();
            prop_assert_eq!(kept, expected);
        }

        #[test]
        fn sorting_twice_reverses_distinct_keys(values in prop::collection::hash_set(-1000i64..1000, 0..30)) {
            let rows: Vec<Rec> = values
                .into_iter()
                .enumerate()
                .map(|(id, value)| Rec { id, name: String::new(), tag: String::new(), value })
                .collect();
            let mut g = grid(rows, 1000);
            g.set_sort("value");
            let asc: Vec<usize> = g.processed_rows().iter().map(|r| r.id).collect();
            g.set_sort("value");
            let mut desc: Vec<usize> = g.processed_rows().iter().map(|r| r.id).collect();
            desc.reverse();
            prop_assert_eq!(&asc, &desc);
            g.set_sort("value");
            let again: Vec<usize> = g.processed_rows().iter().map(|r| r.id).collect();
            prop_assert_eq!(asc, again);
        }

        #[test]
        fn pages_partition_processed_rows(rows in records(), page_size in 1usize..12, sort_first in any::<bool>()) {
            let mut g = grid(rows, page_size);
            if sort_first {
                g.set_sort("name");
            }
            let all: Vec<usize> = g.processed_rows().iter().map(|r| r.id).collect();
            let mut concatenated = Vec::new();
            for page in 1..=g.total_pages() {
                g.set_page(page);
                let rows = g.page_rows();
                prop_assert!(rows.len() <= page_size);
                concatenated.extend(rows.iter().map(|r| r.id));
            }
            prop_assert_eq!(concatenated, all);
        }

        #[test]
        fn search_or_filter_resets_page(rows in records(), page in 1usize..10, term in "[a-d]{0,2}", tag in "[xyz]") {
            let mut g = grid(rows, 3);
            g.set_page(page);
            g.set_search(term);
            prop_assert_eq!(g.state().page, 1);
            g.set_page(page);
            g.set_column_filter("tag", &tag);
            prop_assert_eq!(g.state().page, 1);
        }

        #[test]
        fn resize_never_below_minimum(deltas in prop::collection::vec(-2000i32..2000, 1..20)) {
            let mut g = grid(Vec::new(), 5);
            for delta in deltas {
                prop_assert!(g.begin_resize("value", 0));
                g.resize_column("value", delta);
                g.end_resize();
                prop_assert!(g.column_width("value") >= 7);
            }
        }

        #[test]
        fn visibility_toggle_twice_is_identity(keys in prop::collection::vec(prop::sample::select(vec!["name", "tag", "value", "id", "ghost"]), 0..10)) {
            let mut g = grid(Vec::new(), 5);
            let before = g.state().visible.clone();
            for key in &keys {
                g.toggle_column_visibility(key);
                g.toggle_column_visibility(key);
            }
            prop_assert_eq!(&g.state().visible, &before);
        }
    }
}
