use crate::error::Warning;
use crate::geometry::Geometry;
use crate::grid::{CellRange, Layout};
use crate::model::{Annotation, OverlayStyle, SidebarEntry, Span};

/// The clipped part of a span on one grid row, in canvas pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RowRegion {
    pub x0: u32,
    pub x1: u32,
    pub top: u32,
    pub bottom: u32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Overlay {
    pub style: OverlayStyle,
    pub color: [u8; 4],
    pub regions: Vec<RowRegion>,
}

#[derive(Debug, Default)]
pub struct Annotations {
    pub overlays: Vec<Overlay>,
    /// One entry per accepted span, in span order (unsorted, unmerged).
    pub entries: Vec<SidebarEntry>,
    pub warnings: Vec<Warning>,
}

/// Turns each span into its draw regions and one sidebar entry. Malformed or
/// unmappable spans are skipped with a warning.
pub fn annotate(spans: &[Span], layout: &Layout, geo: &Geometry) -> Annotations {
    let mapper = layout.mapper();
    let mut out = Annotations::default();

    for (i, span) in spans.iter().enumerate() {
        if span.end <= span.start {
            log::warn!("Skipping span {i}: empty range [{}, {})", span.start, span.end);
            out.warnings.push(Warning::MalformedSpan {
                span: i,
                start: span.start,
                end: span.end,
            });
            continue;
        }
        let Some(range) = mapper.map_range(span.start, span.end) else {
            log::warn!(
                "Skipping span {i}: [{}, {}) is outside the essay ({} chars)",
                span.start,
                span.end,
                mapper.len()
            );
            out.warnings.push(Warning::MappingMiss {
                span: i,
                start: span.start,
                end: span.end,
            });
            continue;
        };

        let color = span.annotation.color(geo);
        out.overlays.push(Overlay {
            style: span.annotation.style(),
            color,
            regions: row_regions(&range, layout, geo),
        });
        out.entries.push(sidebar_entry(span, &range, layout, color));
    }

    log::debug!(
        "Annotated {} of {} spans ({} skipped)",
        out.overlays.len(),
        spans.len(),
        out.warnings.len()
    );
    out
}

/// Row-by-row clip of a cell range: first row starts at the start column,
/// last row ends after the end column, rows between span the full width.
pub fn row_regions(range: &CellRange, layout: &Layout, geo: &Geometry) -> Vec<RowRegion> {
    let last_col = layout.columns() - 1;
    (range.start_row..=range.end_row)
        .map(|row| {
            let from = if row == range.start_row { range.start_col } else { 0 };
            let to = if row == range.end_row { range.end_col } else { last_col };
            let top = layout.row_top(range.paragraph, row);
            RowRegion {
                x0: geo.cell_x(from),
                x1: geo.cell_x(to + 1),
                top,
                bottom: top + geo.cell_height,
            }
        })
        .collect()
}

fn sidebar_entry(span: &Span, range: &CellRange, layout: &Layout, color: [u8; 4]) -> SidebarEntry {
    let (tag, mut content) = match &span.annotation {
        Annotation::Grammar { revised, label } => (
            label.clone().filter(|l| !l.is_empty()),
            revised
                .as_deref()
                .filter(|r| !r.is_empty())
                .map(|r| format!("建议：{r}"))
                .unwrap_or_default(),
        ),
        Annotation::Typo { original, revised } => {
            let original = if original.is_empty() {
                layout.slice_text(span.start, span.end)
            } else {
                original.clone()
            };
            (None, format!("{original}→{revised}"))
        }
        Annotation::Highlight { text } => (
            None,
            text.clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| layout.slice_text(span.start, span.end)),
        ),
        Annotation::Rhetoric { devices } => (None, devices.join("、")),
    };
    if !span.extra.is_empty() {
        if !content.is_empty() {
            content.push(' ');
        }
        content.push_str(&span.extra.join("、"));
    }

    SidebarEntry {
        anchor_paragraph: range.paragraph,
        anchor_row: range.start_row,
        anchor_column: range.start_col,
        kind: span.annotation.label().to_string(),
        tag,
        content,
        color,
    }
}
