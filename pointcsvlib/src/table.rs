//! Column-oriented buffering of point data.
//!
//! The data flow is:
//! 1. [`ColumnSetAccumulator`] appends a five-column block per point and
//!    fills the active block as values arrive.
//! 2. [`RowMaterializer`] freezes the columns, finds the longest one and
//!    hands out rectangular rows, padding short columns with missing cells.
//!
//! Every column starts with its header cell, so row 0 of the materialized
//! table is the header row and data rows follow it.

use tracing::{debug, trace};

use crate::error::PointCsvError;
use crate::headers::{ColumnHeaders, HeaderKey, BLOCK_WIDTH};
use crate::options::TimeZone;
use crate::render::{RenderHint, RendererRef};
use crate::value::{Cell, Value};
use crate::Result;

/// One column: header cell followed by data cells.
pub type Column = Vec<Cell>;

/// Index of a point block within the table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct BlockId(usize);

impl BlockId {
    pub fn index(&self) -> usize {
        self.0
    }

    /// Index of the block's `Name` column
    pub fn first_column(&self) -> usize {
        self.0 * BLOCK_WIDTH
    }

    fn column(&self, key: HeaderKey) -> usize {
        self.first_column() + key.offset()
    }
}

/// Context of the point currently receiving values.
#[derive(Debug)]
struct PointCursor {
    block: BlockId,
    name: String,
    renderer: RendererRef,
}

/// Buffers point data as columns, one five-column block per point.
///
/// Blocks are only ever appended. The cursor always addresses the most
/// recently started block; earlier blocks are never written again.
#[derive(Debug)]
pub struct ColumnSetAccumulator {
    headers: ColumnHeaders,
    time_zone: TimeZone,
    columns: Vec<Column>,
    cursor: Option<PointCursor>,
}

impl ColumnSetAccumulator {
    pub fn new(headers: ColumnHeaders, time_zone: TimeZone) -> Self {
        Self {
            headers,
            time_zone,
            columns: Vec::new(),
            cursor: None,
        }
    }

    /// Start a new point: append its block and point the cursor at it.
    pub fn begin_point(&mut self, name: impl Into<String>, renderer: RendererRef) -> BlockId {
        let block = self.push_column_set();
        let name = name.into();
        debug!(point = %name, block = block.index(), "starting point block");
        self.cursor = Some(PointCursor {
            block,
            name,
            renderer,
        });
        block
    }

    /// Append one sample to every column of the active block.
    ///
    /// An absent `value` leaves both the `Value` and `Rendered` cells missing
    /// and the renderer is not consulted. Nothing is appended if rendering or
    /// timestamp formatting fails.
    pub fn append_value(
        &mut self,
        time: i64,
        value: Option<&Value>,
        annotation: Option<String>,
    ) -> Result<()> {
        let cursor = self
            .cursor
            .as_ref()
            .ok_or_else(|| PointCsvError::protocol("value received before any point started"))?;

        let timestamp = self.time_zone.format_millis(time).ok_or_else(|| {
            PointCsvError::protocol(format!("timestamp {} is out of range", time))
        })?;

        let (raw, rendered) = match value {
            Some(value) => {
                let rendered = cursor
                    .renderer
                    .render(value, RenderHint::Full)
                    .map_err(|source| PointCsvError::Render {
                        point: cursor.name.clone(),
                        source,
                    })?;
                (Some(value.to_string()), Some(rendered))
            }
            None => (None, None),
        };

        let block = cursor.block;
        let row: [(HeaderKey, Cell); BLOCK_WIDTH] = [
            (HeaderKey::Name, Some(cursor.name.clone())),
            (HeaderKey::Time, Some(timestamp)),
            (HeaderKey::Value, raw),
            (HeaderKey::Rendered, rendered),
            (HeaderKey::Annotation, annotation),
        ];
        for (key, cell) in row {
            self.columns[block.column(key)].push(cell);
        }
        trace!(block = block.index(), time, "appended sample");
        Ok(())
    }

    /// Total number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Number of point blocks
    pub fn block_count(&self) -> usize {
        self.columns.len() / BLOCK_WIDTH
    }

    /// Name of the point currently receiving values
    pub fn active_point(&self) -> Option<&str> {
        self.cursor.as_ref().map(|c| c.name.as_str())
    }

    pub fn column(&self, index: usize) -> Option<&[Cell]> {
        self.columns.get(index).map(Vec::as_slice)
    }

    /// Freeze the columns for row production.
    ///
    /// A table without any point still gets one header-only block so the
    /// output keeps its shape.
    pub fn into_materializer(mut self) -> RowMaterializer {
        if self.columns.is_empty() {
            self.push_column_set();
        }
        RowMaterializer::new(self.columns)
    }

    fn push_column_set(&mut self) -> BlockId {
        let block = BlockId(self.block_count());
        self.columns
            .extend(self.headers.iter().map(|header| vec![Some(header.to_string())]));
        block
    }
}

/// Read-only view over frozen columns that produces rectangular rows.
#[derive(Debug)]
pub struct RowMaterializer {
    columns: Vec<Column>,
    row_count: usize,
}

impl RowMaterializer {
    fn new(columns: Vec<Column>) -> Self {
        let row_count = compute_row_count(&columns);
        Self { columns, row_count }
    }

    /// Cells per row
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    /// Rows to emit, header row included: the length of the longest column.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// Rows to emit after the header row
    pub fn data_row_count(&self) -> usize {
        self.row_count.saturating_sub(1)
    }

    /// Consume the table and produce its rows in order.
    pub fn rows(self) -> Rows {
        Rows {
            columns: self.columns,
            row_count: self.row_count,
            next: 0,
        }
    }
}

fn compute_row_count(columns: &[Column]) -> usize {
    columns.iter().map(Vec::len).max().unwrap_or(0)
}

/// Single forward pass over a materialized table.
///
/// Each cell is moved out as its row is produced, so the pass cannot be
/// restarted.
#[derive(Debug)]
pub struct Rows {
    columns: Vec<Column>,
    row_count: usize,
    next: usize,
}

impl Iterator for Rows {
    type Item = Vec<Cell>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.row_count {
            return None;
        }
        let i = self.next;
        self.next += 1;
        Some(
            self.columns
                .iter_mut()
                .map(|column| column.get_mut(i).and_then(Option::take))
                .collect(),
        )
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.row_count - self.next;
        (remaining, Some(remaining))
    }
}

impl ExactSizeIterator for Rows {}
