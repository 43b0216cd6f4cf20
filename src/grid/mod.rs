mod mapper;

pub use mapper::{CellAddress, CellRange, OffsetMapper};

use crate::error::Error;
use crate::geometry::Geometry;

/// Cells reserved at the start of every paragraph for the indent.
pub const INDENT_CELLS: usize = 2;

/// One essay paragraph laid out on the grid. Paragraph 0 also carries the
/// title block in its leading rows.
#[derive(Clone, Debug, PartialEq)]
pub struct Paragraph {
    pub text: String,
    /// Character count of `text` (not bytes).
    pub chars: usize,
    pub rows: usize,
    pub text_start: u32,
    pub text_end: u32,
    pub bar_start: u32,
    pub bar_end: u32,
}

/// Paragraph geometry of one essay: the segmenter's output, consumed by every
/// later stage. Immutable once built.
#[derive(Clone, Debug)]
pub struct Layout {
    title_cells: Vec<char>,
    paragraph_chars: Vec<Vec<char>>,
    /// Carriage returns trailing each paragraph. They are not drawn but still
    /// take flat offsets, since the grader indexes the raw content.
    trailing_cr: Vec<usize>,
    pub paragraphs: Vec<Paragraph>,
    columns: usize,
    pitch: u32,
}

impl Layout {
    pub fn build(title: &str, content: &str, geo: &Geometry) -> Result<Self, Error> {
        geo.validate()?;
        let columns = geo.columns;
        let title_cells = center_title(title, columns);
        let title_width = title_cells.len();

        let (paragraph_chars, trailing_cr): (Vec<Vec<char>>, Vec<usize>) = content
            .split('\n')
            .map(|p| {
                let text = p.trim_end_matches('\r');
                (text.chars().collect(), p.len() - text.len())
            })
            .unzip();
        if paragraph_chars.is_empty() {
            return Err(Error::EmptyDocument);
        }

        let pitch = geo.row_pitch();
        let mut paragraphs: Vec<Paragraph> = Vec::with_capacity(paragraph_chars.len());
        for (i, chars) in paragraph_chars.iter().enumerate() {
            let lead = if i == 0 { title_width } else { 0 };
            let cells = lead + chars.len() + INDENT_CELLS;
            let rows = cells.div_ceil(columns).max(1);

            let text_start = match paragraphs.last() {
                Some(prev) => prev.bar_end + geo.bar_margin,
                None => geo.margin_top,
            };
            let text_end = text_start + rows as u32 * pitch;
            let bar_start = text_end + geo.bar_margin;
            let bar_end = bar_start + geo.bar_height;

            paragraphs.push(Paragraph {
                text: chars.iter().collect(),
                chars: chars.len(),
                rows,
                text_start,
                text_end,
                bar_start,
                bar_end,
            });
        }

        log::debug!(
            "Segmented {} paragraphs ({} title cells), content bottom at {}px",
            paragraphs.len(),
            title_width,
            paragraphs.last().map(|p| p.bar_end).unwrap_or(0),
        );

        Ok(Self {
            title_cells,
            paragraph_chars,
            trailing_cr,
            paragraphs,
            columns,
            pitch,
        })
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Columns consumed by the title block in front of paragraph 0.
    pub fn title_width(&self) -> usize {
        self.title_cells.len()
    }

    /// Bottom of the last comment bar.
    pub fn content_bottom(&self) -> u32 {
        self.paragraphs.last().map(|p| p.bar_end).unwrap_or(0)
    }

    pub fn row_top(&self, paragraph: usize, row: usize) -> u32 {
        self.paragraphs[paragraph].text_start + row as u32 * self.pitch
    }

    pub fn total_rows(&self) -> usize {
        self.paragraphs.iter().map(|p| p.rows).sum()
    }

    /// Character shown in a grid cell, `None` for blank cells.
    pub fn cell_char(&self, paragraph: usize, row: usize, col: usize) -> Option<char> {
        let idx = row * self.columns + col;
        let chars = &self.paragraph_chars[paragraph];
        let local = if paragraph == 0 {
            if idx < self.title_cells.len() {
                return Some(self.title_cells[idx]).filter(|c| *c != ' ');
            }
            idx - self.title_cells.len()
        } else {
            idx
        };
        local
            .checked_sub(INDENT_CELLS)
            .and_then(|i| chars.get(i).copied())
            .filter(|c| !c.is_whitespace())
    }

    pub fn mapper(&self) -> OffsetMapper {
        OffsetMapper::with_trailing(
            self.paragraph_chars
                .iter()
                .map(Vec::len)
                .zip(self.trailing_cr.iter().copied()),
            self.columns,
            self.title_cells.len(),
        )
    }

    /// Text between two flat offsets, clipped to the content. Used for
    /// highlight spans that carry no text of their own.
    pub fn slice_text(&self, start: usize, end: usize) -> String {
        let mut out = String::new();
        let mut offset = 0usize;
        for (i, chars) in self.paragraph_chars.iter().enumerate() {
            for &c in chars {
                if offset >= start && offset < end {
                    out.push(c);
                }
                offset += 1;
            }
            offset += self.trailing_cr[i];
            if i + 1 < self.paragraph_chars.len() {
                offset += 1;
            }
            if offset >= end {
                break;
            }
        }
        out
    }
}

/// Pads the title to a whole number of rows and centers it in that block.
/// A title wider than one row wraps onto further title rows.
fn center_title(title: &str, columns: usize) -> Vec<char> {
    let chars: Vec<char> = title.trim().chars().collect();
    let rows = chars.len().div_ceil(columns).max(1);
    let width = rows * columns;
    let left = (width - chars.len()) / 2;
    let mut cells = vec![' '; width];
    cells[left..left + chars.len()].copy_from_slice(&chars);
    cells
}
