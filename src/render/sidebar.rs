use image::RgbaImage;

use crate::fonts::Fonts;
use crate::geometry::Geometry;
use crate::grid::{CellAddress, Layout};
use crate::model::SidebarEntry;

use super::draw::{disc, fill_rect, rgba, text, text_centered};
use super::text::wrap_text;

/// Joins merged kinds and merged tags.
pub const LABEL_SEPARATOR: &str = "，";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LineRole {
    Heading,
    Tag,
    Body,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SidebarLine {
    pub role: LineRole,
    pub text: String,
}

/// A merged entry with its sequence number and vertical extent `[top, bottom)`.
#[derive(Clone, Debug, PartialEq)]
pub struct PlacedEntry {
    pub number: usize,
    pub entry: SidebarEntry,
    pub top: u32,
    pub bottom: u32,
    pub lines: Vec<SidebarLine>,
}

/// Numbered circle drawn over an entry's anchor cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Marker {
    pub number: usize,
    pub cell: CellAddress,
    pub center: (u32, u32),
    pub color: [u8; 4],
}

/// Stable sort by anchor cell, then one entry per distinct anchor: kinds and
/// tags are unioned without duplicates, contents concatenated, the first
/// color kept.
pub fn merge_entries(mut entries: Vec<SidebarEntry>) -> Vec<SidebarEntry> {
    entries.sort_by_key(SidebarEntry::anchor);
    entries.into_iter().fold(Vec::new(), |mut merged: Vec<SidebarEntry>, entry| {
        match merged.last_mut() {
            Some(last) if last.anchor() == entry.anchor() => absorb(last, entry),
            _ => merged.push(entry),
        }
        merged
    })
}

fn absorb(into: &mut SidebarEntry, from: SidebarEntry) {
    union_labels(&mut into.kind, &from.kind);
    if let Some(other) = from.tag {
        match into.tag.as_mut() {
            Some(tag) => union_labels(tag, &other),
            None => into.tag = Some(other),
        }
    }
    if !from.content.is_empty() {
        if !into.content.is_empty() {
            into.content.push(' ');
        }
        into.content.push_str(&from.content);
    }
}

fn union_labels(into: &mut String, from: &str) {
    for label in from.split(LABEL_SEPARATOR).filter(|l| !l.is_empty()) {
        if !into.split(LABEL_SEPARATOR).any(|l| l == label) {
            if !into.is_empty() {
                into.push_str(LABEL_SEPARATOR);
            }
            into.push_str(label);
        }
    }
}

/// Stacks merged entries top to bottom. Each entry starts at its anchor row or
/// just below the previous entry, whichever is lower, so extents never
/// overlap.
pub fn place_entries(merged: Vec<SidebarEntry>, layout: &Layout, geo: &Geometry) -> Vec<PlacedEntry> {
    let line_h = geo.sidebar_line_height();
    let per_line = geo.sidebar_chars_per_line();
    let mut floor = geo.margin_top;
    let mut placed = Vec::with_capacity(merged.len());

    for (i, entry) in merged.into_iter().enumerate() {
        let number = i + 1;
        let anchor_y = layout.row_top(entry.anchor_paragraph, entry.anchor_row);
        let top = anchor_y.max(floor);

        let mut lines = vec![SidebarLine {
            role: LineRole::Heading,
            text: format!("{number}. {}", entry.kind),
        }];
        if let Some(tag) = &entry.tag {
            lines.extend(wrap_text(tag, per_line).into_iter().map(|text| SidebarLine {
                role: LineRole::Tag,
                text,
            }));
        }
        lines.extend(wrap_text(&entry.content, per_line).into_iter().map(|text| SidebarLine {
            role: LineRole::Body,
            text,
        }));

        let bottom = top + lines.len() as u32 * line_h + geo.sidebar_padding;
        floor = bottom + geo.sidebar_gap;
        placed.push(PlacedEntry {
            number,
            entry,
            top,
            bottom,
            lines,
        });
    }
    placed
}

/// One marker per distinct anchor cell, numbered like its sidebar entry.
pub fn markers(placed: &[PlacedEntry], layout: &Layout, geo: &Geometry) -> Vec<Marker> {
    let r = geo.marker_radius;
    placed
        .iter()
        .map(|p| {
            let cell = CellAddress {
                paragraph: p.entry.anchor_paragraph,
                row: p.entry.anchor_row,
                column: p.entry.anchor_column,
            };
            let top = layout.row_top(cell.paragraph, cell.row);
            Marker {
                number: p.number,
                cell,
                center: (geo.cell_x(cell.column) + r, top + r),
                color: p.entry.color,
            }
        })
        .collect()
}

pub(crate) fn draw_entries(img: &mut RgbaImage, placed: &[PlacedEntry], geo: &Geometry, fonts: &Fonts) {
    let line_h = geo.sidebar_line_height();
    let x = geo.sidebar_left() + geo.sidebar_padding;
    for p in placed {
        let accent = opaque(p.entry.color);
        for (i, line) in p.lines.iter().enumerate() {
            let y = p.top + i as u32 * line_h;
            let color = match line.role {
                LineRole::Heading | LineRole::Tag => accent,
                LineRole::Body => rgba(geo.palette.text),
            };
            text(img, fonts, x, y, geo.sidebar_font_size, color, &line.text);
        }
    }
}

/// Left and right borders of the sidebar column over `[top, bottom)`.
pub(crate) fn draw_border(img: &mut RgbaImage, top: u32, bottom: u32, geo: &Geometry) {
    let color = rgba(geo.palette.sidebar_border);
    let w = geo.grid_line_width.max(1);
    let left = geo.sidebar_left();
    let right = geo.sidebar_right();
    fill_rect(img, left, top, left + w, bottom, color);
    fill_rect(img, right - w, top, right, bottom, color);
}

pub(crate) fn draw_markers(img: &mut RgbaImage, markers: &[Marker], geo: &Geometry, fonts: &Fonts) {
    let r = geo.marker_radius;
    for m in markers {
        let (cx, cy) = m.center;
        disc(img, cx, cy, r, opaque(m.color));
        text_centered(
            img,
            fonts,
            cx,
            cy,
            r as f32 * 1.6,
            rgba(geo.palette.marker_text),
            &m.number.to_string(),
        );
    }
}

fn opaque(c: [u8; 4]) -> image::Rgba<u8> {
    image::Rgba([c[0], c[1], c[2], 255])
}
