//! Column descriptors for the data grid

use super::value::CellValue;

/// Default minimum width (in terminal cells) for a column
pub const DEFAULT_MIN_WIDTH: u16 = 4;

/// Horizontal alignment of a column's cells
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    #[default]
    Left,
    Center,
    Right,
}

type Accessor<T> = Box<dyn Fn(&T) -> CellValue>;
type Renderer<T> = Box<dyn Fn(&T) -> String>;

/// Declares how one column reads and displays a record
pub struct Column<T> {
    pub key: String,
    pub header: String,
    accessor: Accessor<T>,
    renderer: Option<Renderer<T>>,
    pub sortable: bool,
    pub filterable: bool,
    pub searchable: bool,
    pub exportable: bool,
    /// Hidden until the user turns it on
    pub hidden: bool,
    pub width: u16,
    pub min_width: u16,
    pub max_width: Option<u16>,
    pub align: Align,
}

impl<T> Column<T> {
    /// Create a column with an accessor. Width defaults to the header length.
    pub fn new<F>(key: impl Into<String>, header: impl Into<String>, accessor: F) -> Self
    where
        F: Fn(&T) -> CellValue + 'static,
    {
        let header = header.into();
        let width = (header.chars().count() as u16 + 2).max(DEFAULT_MIN_WIDTH);
        Self {
            key: key.into(),
            header,
            accessor: Box::new(accessor),
            renderer: None,
            sortable: true,
            filterable: false,
            searchable: true,
            exportable: true,
            hidden: false,
            width,
            min_width: DEFAULT_MIN_WIDTH,
            max_width: None,
            align: Align::Left,
        }
    }

    /// Custom display text; search, filter, sort and export keep using the accessor
    pub fn render_with<F>(mut self, renderer: F) -> Self
    where
        F: Fn(&T) -> String + 'static,
    {
        self.renderer = Some(Box::new(renderer));
        self
    }

    pub fn width(mut self, width: u16) -> Self {
        self.width = width.max(self.min_width);
        self
    }

    pub fn min_width(mut self, min_width: u16) -> Self {
        self.min_width = min_width;
        self.width = self.width.max(min_width);
        self
    }

    pub fn max_width(mut self, max_width: u16) -> Self {
        self.max_width = Some(max_width.max(self.min_width));
        self
    }

    pub fn align(mut self, align: Align) -> Self {
        self.align = align;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn unsortable(mut self) -> Self {
        self.sortable = false;
        self
    }

    pub fn unsearchable(mut self) -> Self {
        self.searchable = false;
        self
    }

    pub fn no_export(mut self) -> Self {
        self.exportable = false;
        self
    }

    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// Raw value for a record
    pub fn value(&self, record: &T) -> CellValue {
        (self.accessor)(record)
    }

    /// Text to draw in the cell
    pub fn display(&self, record: &T) -> String {
        match &self.renderer {
            Some(render) => render(record),
            None => self.value(record).to_string(),
        }
    }

    /// Clamp a proposed width into this column's bounds
    pub fn clamp_width(&self, width: i32) -> u16 {
        let upper = self.max_width.map(i32::from).unwrap_or(i32::from(u16::MAX));
        width.max(i32::from(self.min_width)).min(upper) as u16
    }
}
