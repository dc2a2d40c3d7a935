use std::collections::BTreeMap;

use crate::foundation::error::{PrintError, PrintResult};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Number of grid columns/rows a cell covers.
pub struct CellSpan {
    /// Width multiplier.
    pub cols: u32,
    /// Height multiplier.
    pub rows: u32,
}

impl CellSpan {
    /// A regular single cell.
    pub const UNIT: Self = Self { cols: 1, rows: 1 };
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
/// Where one image lands in the grid.
pub struct GridSlot {
    /// Index of the image in the request.
    pub index: usize,
    /// Zero-based column of the top-left cell.
    pub col: u32,
    /// Zero-based row of the top-left cell.
    pub row: u32,
    /// Cells covered.
    pub span: CellSpan,
}

#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Column/row counts and hero-cell overrides derived from the image count.
pub struct GridPlan {
    /// Column count.
    pub cols: u32,
    /// Row count from the layout table.
    pub rows: u32,
    spans: BTreeMap<usize, CellSpan>,
    slots: Vec<GridSlot>,
}

impl GridPlan {
    /// Span for image `index`; unit unless overridden.
    pub fn span_for(&self, index: usize) -> CellSpan {
        self.spans.get(&index).copied().unwrap_or(CellSpan::UNIT)
    }

    /// Span overrides keyed by image index.
    pub fn spans(&self) -> &BTreeMap<usize, CellSpan> {
        &self.spans
    }

    /// Placement of every image, in input order.
    pub fn slots(&self) -> &[GridSlot] {
        &self.slots
    }

    /// Number of images this plan was built for.
    pub fn image_count(&self) -> usize {
        self.slots.len()
    }

    /// Rows actually occupied after placement.
    ///
    /// Equal to [`GridPlan::rows`] except when a hero cell pushes images past the table's row
    /// count (7 images: the 2x2 hero leaves five free cells for six images).
    pub fn layout_rows(&self) -> u32 {
        self.slots
            .iter()
            .map(|s| s.row + s.span.rows)
            .max()
            .unwrap_or(0)
            .max(self.rows)
    }
}

/// Plan the grid for `count` images.
///
/// The table is fixed: 1..=4 use hand-tuned shapes, 5 and 7 get a hero cell at index 0, every
/// other count is the square-ish `ceil(sqrt(n))` grid.
pub fn plan(count: usize) -> PrintResult<GridPlan> {
    if count == 0 {
        return Err(PrintError::invalid_input(
            "grid plan requires at least one image",
        ));
    }
    let n = u32::try_from(count)
        .map_err(|_| PrintError::invalid_input(format!("too many images: {count}")))?;

    let (cols, rows) = match n {
        1 => (1, 1),
        2 => (2, 1),
        3 => (3, 1),
        4 => (2, 2),
        _ => {
            let cols = ceil_sqrt(n);
            (cols, n.div_ceil(cols))
        }
    };

    let mut spans = BTreeMap::new();
    match n {
        5 => {
            spans.insert(0, CellSpan { cols: 2, rows: 1 });
        }
        7 => {
            spans.insert(0, CellSpan { cols: 2, rows: 2 });
        }
        _ => {}
    }

    let slots = place(count, cols, &spans)?;
    Ok(GridPlan {
        cols,
        rows,
        spans,
        slots,
    })
}

fn ceil_sqrt(n: u32) -> u32 {
    let n = u64::from(n);
    // Squares in u64; ceil_sqrt(u32::MAX) is 65536.
    let mut r = (n as f64).sqrt().ceil() as u64;
    // Guard against float error around perfect squares.
    while r > 1 && (r - 1) * (r - 1) >= n {
        r -= 1;
    }
    while r * r < n {
        r += 1;
    }
    r as u32
}

/// Row-major dense placement: each image takes the first free position where its span fits.
fn place(count: usize, cols: u32, spans: &BTreeMap<usize, CellSpan>) -> PrintResult<Vec<GridSlot>> {
    let mut occupied: Vec<Vec<bool>> = Vec::new();
    let mut slots = Vec::with_capacity(count);
    let mut cursor = 0u64;

    for index in 0..count {
        let span = spans.get(&index).copied().unwrap_or(CellSpan::UNIT);
        if span.cols > cols {
            return Err(PrintError::internal(format!(
                "span of {} columns exceeds grid width {cols}",
                span.cols
            )));
        }

        let mut pos = cursor;
        loop {
            let row = u32::try_from(pos / u64::from(cols))
                .map_err(|_| PrintError::internal("grid row overflow"))?;
            let col = (pos % u64::from(cols)) as u32;
            if col + span.cols <= cols && is_free(&occupied, col, row, span) {
                mark(&mut occupied, cols, col, row, span);
                slots.push(GridSlot {
                    index,
                    col,
                    row,
                    span,
                });
                break;
            }
            pos += 1;
        }

        while is_taken(&occupied, cursor, cols) {
            cursor += 1;
        }
    }
    Ok(slots)
}

fn is_free(occupied: &[Vec<bool>], col: u32, row: u32, span: CellSpan) -> bool {
    (row..row + span.rows).all(|r| {
        (col..col + span.cols).all(|c| {
            !occupied
                .get(r as usize)
                .and_then(|line| line.get(c as usize))
                .copied()
                .unwrap_or(false)
        })
    })
}

fn is_taken(occupied: &[Vec<bool>], pos: u64, cols: u32) -> bool {
    let row = (pos / u64::from(cols)) as usize;
    let col = (pos % u64::from(cols)) as usize;
    occupied
        .get(row)
        .and_then(|line| line.get(col))
        .copied()
        .unwrap_or(false)
}

fn mark(occupied: &mut Vec<Vec<bool>>, cols: u32, col: u32, row: u32, span: CellSpan) {
    let needed = (row + span.rows) as usize;
    if occupied.len() < needed {
        occupied.resize_with(needed, || vec![false; cols as usize]);
    }
    for r in row..row + span.rows {
        for c in col..col + span.cols {
            occupied[r as usize][c as usize] = true;
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/layout/grid.rs"]
mod tests;
