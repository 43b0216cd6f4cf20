use super::INDENT_CELLS;

/// `(paragraph, row, column)` of one grid cell. Ordering is lexicographic,
/// which is also reading order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CellAddress {
    pub paragraph: usize,
    pub row: usize,
    pub column: usize,
}

/// First and last addressed cell of a span, always inside one paragraph.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CellRange {
    pub paragraph: usize,
    pub start_row: usize,
    pub start_col: usize,
    pub end_row: usize,
    pub end_col: usize,
}

impl CellRange {
    pub fn start(&self) -> CellAddress {
        CellAddress {
            paragraph: self.paragraph,
            row: self.start_row,
            column: self.start_col,
        }
    }

    pub fn end(&self) -> CellAddress {
        CellAddress {
            paragraph: self.paragraph,
            row: self.end_row,
            column: self.end_col,
        }
    }
}

/// Flat content offsets to grid cells.
///
/// The flat stream is the paragraphs joined by a one-character separator.
/// Characters that take an offset but no cell (a `'\r'` before the
/// separator) count toward the paragraph they trail.
/// Paragraph 0 is preceded on the grid by the title block, and every
/// paragraph starts after [`INDENT_CELLS`] blank cells.
#[derive(Clone, Debug)]
pub struct OffsetMapper {
    /// `starts[i]` is the flat offset of paragraph `i`'s first character.
    starts: Vec<usize>,
    lens: Vec<usize>,
    /// One past the last content offset (no trailing `'\n'`).
    total: usize,
    columns: usize,
    title_width: usize,
}

impl OffsetMapper {
    pub fn new(lens: impl IntoIterator<Item = usize>, columns: usize, title_width: usize) -> Self {
        Self::with_trailing(lens.into_iter().map(|len| (len, 0)), columns, title_width)
    }

    /// Like [`new`](Self::new), with `(len, trailing)` per paragraph where
    /// `trailing` offsets follow the drawn characters without a cell.
    pub fn with_trailing(
        paragraphs: impl IntoIterator<Item = (usize, usize)>,
        columns: usize,
        title_width: usize,
    ) -> Self {
        let (lens, trailing): (Vec<usize>, Vec<usize>) = paragraphs.into_iter().unzip();
        let starts: Vec<usize> = lens
            .iter()
            .zip(&trailing)
            .scan(0usize, |acc, (&len, &extra)| {
                let start = *acc;
                *acc += len + extra + 1;
                Some(start)
            })
            .collect();
        let total = match (starts.last(), lens.last(), trailing.last()) {
            (Some(s), Some(l), Some(t)) => s + l + t,
            _ => 0,
        };
        Self {
            starts,
            lens,
            total,
            columns,
            title_width,
        }
    }

    /// Paragraph holding `offset`. A separator belongs to the paragraph it
    /// terminates.
    pub fn paragraph_of(&self, offset: usize) -> Option<usize> {
        if offset >= self.total {
            return None;
        }
        let idx = self.starts.partition_point(|&s| s <= offset);
        idx.checked_sub(1)
    }

    fn lead(&self, paragraph: usize) -> usize {
        INDENT_CELLS + if paragraph == 0 { self.title_width } else { 0 }
    }

    fn cell_in(&self, paragraph: usize, offset: usize) -> CellAddress {
        let last = self.lens[paragraph].saturating_sub(1);
        let local = (offset - self.starts[paragraph]).min(last);
        let idx = local + self.lead(paragraph);
        CellAddress {
            paragraph,
            row: idx / self.columns,
            column: idx % self.columns,
        }
    }

    pub fn cell_of(&self, offset: usize) -> Option<CellAddress> {
        let p = self.paragraph_of(offset)?;
        Some(self.cell_in(p, offset))
    }

    /// Maps the half-open range `[start, end)`. The end is clipped to the
    /// paragraph containing `start`. `None` when `start` lies outside the
    /// content or the range is empty.
    pub fn map_range(&self, start: usize, end: usize) -> Option<CellRange> {
        if end <= start {
            return None;
        }
        let p = self.paragraph_of(start)?;
        let para_last = self.starts[p] + self.lens[p].saturating_sub(1);
        let last = (end - 1).min(para_last).max(start);
        let first = self.cell_in(p, start);
        let final_cell = self.cell_in(p, last);
        Some(CellRange {
            paragraph: p,
            start_row: first.row,
            start_col: first.column,
            end_row: final_cell.row,
            end_col: final_cell.column,
        })
    }

    /// Inverse of [`cell_of`](Self::cell_of) for cells holding content.
    /// Title, indent and trailing blank cells return `None`.
    pub fn cell_to_offset(&self, cell: CellAddress) -> Option<usize> {
        if cell.paragraph >= self.lens.len() || cell.column >= self.columns {
            return None;
        }
        let idx = cell.row * self.columns + cell.column;
        let local = idx.checked_sub(self.lead(cell.paragraph))?;
        (local < self.lens[cell.paragraph]).then(|| self.starts[cell.paragraph] + local)
    }

    pub fn len(&self) -> usize {
        self.total
    }

    pub fn is_empty(&self) -> bool {
        self.total == 0
    }
}
