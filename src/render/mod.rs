mod draw;
pub mod overlay;
pub mod paginate;
pub mod sidebar;
pub mod text;

use std::ops::Range;
use std::time::Instant;

use image::RgbaImage;

use crate::error::{Error, Warning};
use crate::fonts::Fonts;
use crate::geometry::Geometry;
use crate::grid::Layout;
use crate::model::{OverlayStyle, RenderRequest, Summary};

use draw::{blend_rect, fill_rect, rgba, stroke_rect, wavy_line};
use overlay::{Overlay, annotate};
use paginate::{Page, PagePlan, cut_pages, cut_points, plan_pages};
use sidebar::{Marker, PlacedEntry, draw_border, draw_entries, draw_markers, markers, merge_entries, place_entries};
use text::{ellipsize, wrap_text};

/// The fully drawn tall canvas plus everything the splitter needs.
pub struct Composition {
    pub canvas: RgbaImage,
    pub layout: Layout,
    pub overlays: Vec<Overlay>,
    pub sidebar: Vec<PlacedEntry>,
    pub markers: Vec<Marker>,
    pub cut_points: Vec<u32>,
    /// Bottom of the body: last comment bar or last sidebar entry, whichever
    /// is lower.
    pub body_end: u32,
    /// Canvas rows holding the summary panel.
    pub summary: Range<u32>,
    pub warnings: Vec<Warning>,
}

pub struct Rendering {
    pub pages: Vec<Page>,
    pub warnings: Vec<Warning>,
    pub cut_points: Vec<u32>,
    pub canvas_height: u32,
}

/// Renders one essay into printed pages.
pub fn render(req: &RenderRequest, geo: &Geometry, fonts: &Fonts) -> Result<Rendering, Error> {
    let t0 = Instant::now();
    let comp = compose(req, geo, fonts)?;
    let t_compose = t0.elapsed();

    let plan = plan(&comp, geo)?;
    let pages = cut_pages(&comp.canvas, &plan, comp.summary.clone(), geo);
    let t_total = t0.elapsed();

    log::info!(
        "Timing: compose={:.1}ms, paginate={:.1}ms, total={:.1}ms ({} pages, {} warnings)",
        t_compose.as_secs_f64() * 1000.0,
        (t_total - t_compose).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        pages.len(),
        comp.warnings.len(),
    );

    Ok(Rendering {
        pages,
        warnings: comp.warnings,
        cut_points: comp.cut_points,
        canvas_height: comp.canvas.height(),
    })
}

/// Page plan for a finished composition.
pub fn plan(comp: &Composition, geo: &Geometry) -> Result<PagePlan, Error> {
    let entries: Vec<Range<u32>> = comp.sidebar.iter().map(|p| p.top..p.bottom).collect();
    plan_pages(
        &comp.cut_points,
        comp.body_end,
        comp.summary.end - comp.summary.start,
        &entries,
        &comp.layout,
        geo,
    )
}

/// Runs every stage up to (not including) pagination: geometry, overlays,
/// sidebar, then draws them onto one tall canvas.
pub fn compose(req: &RenderRequest, geo: &Geometry, fonts: &Fonts) -> Result<Composition, Error> {
    geo.validate()?;
    let t0 = Instant::now();

    let layout = Layout::build(&req.title, &req.content, geo)?;
    let t_layout = t0.elapsed();

    let annotations = annotate(&req.grading.spans, &layout, geo);
    let t_overlays = t0.elapsed();

    let placed = place_entries(merge_entries(annotations.entries), &layout, geo);
    let marks = markers(&placed, &layout, geo);
    let t_sidebar = t0.elapsed();

    let content_bottom = layout.content_bottom();
    let overflow: Vec<u32> = placed
        .iter()
        .filter(|p| p.bottom > content_bottom)
        .flat_map(|p| [p.top.max(content_bottom), p.bottom])
        .collect();
    let body_end = placed
        .last()
        .map(|p| p.bottom)
        .unwrap_or(0)
        .max(content_bottom);
    let cuts = cut_points(&layout, geo, overflow.into_iter().chain([body_end]));

    let summary_lines = summary_lines(&req.grading.summary, geo);
    let summary_height = summary_height(summary_lines.len(), geo);
    let summary_top = body_end + geo.summary_gap;
    let needed = summary_top + summary_height + geo.margin_bottom;
    let canvas_height = needed.div_ceil(geo.page_height) * geo.page_height;

    let mut canvas = RgbaImage::from_pixel(geo.page_width, canvas_height, rgba(geo.palette.paper));
    draw_grid(&mut canvas, &layout, geo);
    draw_comment_bars(&mut canvas, &layout, &req.grading.paragraph_comments, geo, fonts);

    // masks go under the glyphs, strokes over them
    for o in annotations.overlays.iter().filter(|o| o.style == OverlayStyle::Mask) {
        draw_overlay(&mut canvas, o, geo);
    }
    draw_glyphs(&mut canvas, &layout, geo, fonts);
    for o in annotations.overlays.iter().filter(|o| o.style != OverlayStyle::Mask) {
        draw_overlay(&mut canvas, o, geo);
    }
    draw_markers(&mut canvas, &marks, geo, fonts);

    draw_entries(&mut canvas, &placed, geo, fonts);
    draw_border(&mut canvas, geo.margin_top, body_end, geo);
    draw_summary(&mut canvas, summary_top, summary_height, &summary_lines, geo, fonts);
    let t_draw = t0.elapsed();

    log::info!(
        "Timing: layout={:.1}ms, overlays={:.1}ms, sidebar={:.1}ms, draw={:.1}ms \
         ({} paragraphs, {} rows, {} sidebar entries, canvas {}x{})",
        t_layout.as_secs_f64() * 1000.0,
        (t_overlays - t_layout).as_secs_f64() * 1000.0,
        (t_sidebar - t_overlays).as_secs_f64() * 1000.0,
        (t_draw - t_sidebar).as_secs_f64() * 1000.0,
        layout.paragraphs.len(),
        layout.total_rows(),
        placed.len(),
        canvas.width(),
        canvas.height(),
    );

    Ok(Composition {
        canvas,
        layout,
        overlays: annotations.overlays,
        sidebar: placed,
        markers: marks,
        cut_points: cuts,
        body_end,
        summary: summary_top..summary_top + summary_height,
        warnings: annotations.warnings,
    })
}

fn draw_grid(img: &mut RgbaImage, layout: &Layout, geo: &Geometry) {
    let color = rgba(geo.palette.grid);
    let lw = geo.grid_line_width;
    let left = geo.margin_left;
    let right = left + geo.body_width();
    for (pi, para) in layout.paragraphs.iter().enumerate() {
        for row in 0..para.rows {
            let top = layout.row_top(pi, row);
            let bottom = top + geo.cell_height;
            for col in 0..layout.columns() {
                let x = geo.cell_x(col);
                stroke_rect(img, x, top, x + geo.cell_width + lw, bottom + lw, lw, color);
            }
            // gap bar between this row and the next
            stroke_rect(img, left, bottom, right + lw, bottom + geo.row_gap + lw, lw, color);
        }
    }
}

fn draw_glyphs(img: &mut RgbaImage, layout: &Layout, geo: &Geometry, fonts: &Fonts) {
    if fonts.glyph().is_none() {
        return;
    }
    let color = rgba(geo.palette.text);
    let mut buf = [0u8; 4];
    for (pi, para) in layout.paragraphs.iter().enumerate() {
        for row in 0..para.rows {
            let cy = layout.row_top(pi, row) + geo.cell_height / 2;
            for col in 0..layout.columns() {
                if let Some(c) = layout.cell_char(pi, row, col) {
                    let cx = geo.cell_x(col) + geo.cell_width / 2;
                    let s = c.encode_utf8(&mut buf);
                    draw::text_centered(img, fonts, cx, cy, geo.grid_font_size, color, s);
                }
            }
        }
    }
}

fn draw_comment_bars(
    img: &mut RgbaImage,
    layout: &Layout,
    comments: &[String],
    geo: &Geometry,
    fonts: &Fonts,
) {
    let border = rgba(geo.palette.grid);
    let ink = rgba(geo.palette.comment_text);
    let left = geo.margin_left;
    let right = left + geo.body_width();
    let per_line = geo.comment_chars_per_line();
    for (pi, para) in layout.paragraphs.iter().enumerate() {
        stroke_rect(img, left, para.bar_start, right, para.bar_end, geo.grid_line_width, border);
        let Some(comment) = comments.get(pi).filter(|c| !c.trim().is_empty()) else {
            continue;
        };
        let line = ellipsize(comment.trim(), per_line.saturating_sub(1));
        let y = para.bar_start + geo.bar_height.saturating_sub(geo.comment_font_size as u32) / 2;
        draw::text(img, fonts, left + geo.cell_width / 2, y, geo.comment_font_size, ink, &line);
    }
}

fn draw_overlay(img: &mut RgbaImage, overlay: &Overlay, geo: &Geometry) {
    let color = image::Rgba(overlay.color);
    let sw = geo.stroke_width.max(1);
    for r in &overlay.regions {
        match overlay.style {
            OverlayStyle::Mask => blend_rect(img, r.x0, r.top, r.x1, r.bottom, color),
            OverlayStyle::Underline => {
                let y = r.bottom.saturating_sub(2 * sw);
                fill_rect(img, r.x0, y, r.x1, y + sw, color);
            }
            OverlayStyle::Wavy => {
                let baseline = r.bottom.saturating_sub(geo.wave_amplitude.ceil() as u32 + 2 * sw);
                wavy_line(img, r.x0, r.x1, baseline, geo.wave_amplitude, geo.wave_length, sw, color);
            }
        }
    }
}

/// Score header followed by the wrapped comment and suggestion, clamped so
/// the panel fits one page.
fn summary_lines(summary: &Summary, geo: &Geometry) -> Vec<String> {
    let s = &summary.scores;
    let mut lines = vec![format!(
        "总评 {:.1}  内容 {:.1}  表达 {:.1}  切题 {:.1}",
        s.overall, s.content, s.expression, s.relevance
    )];
    let per_line = geo.summary_chars_per_line();
    lines.extend(wrap_text(summary.comment.trim(), per_line));
    if !summary.suggestion.trim().is_empty() {
        lines.extend(wrap_text(&format!("建议：{}", summary.suggestion.trim()), per_line));
    }

    let max_lines = (geo.drawable_height().saturating_sub(2 * geo.summary_padding)
        / geo.summary_line_height()) as usize;
    if lines.len() > max_lines {
        log::warn!(
            "Summary needs {} lines but a page holds {max_lines}; truncating",
            lines.len()
        );
        lines.truncate(max_lines.max(1));
    }
    lines
}

fn summary_height(lines: usize, geo: &Geometry) -> u32 {
    2 * geo.summary_padding + lines as u32 * geo.summary_line_height()
}

fn draw_summary(
    img: &mut RgbaImage,
    top: u32,
    height: u32,
    lines: &[String],
    geo: &Geometry,
    fonts: &Fonts,
) {
    let left = geo.margin_left;
    let right = geo.sidebar_right();
    stroke_rect(img, left, top, right, top + height, geo.grid_line_width, rgba(geo.palette.summary_border));
    let x = left + geo.summary_padding;
    for (i, line) in lines.iter().enumerate() {
        let y = top + geo.summary_padding + i as u32 * geo.summary_line_height();
        let color = if i == 0 {
            rgba(geo.palette.comment_text)
        } else {
            rgba(geo.palette.text)
        };
        draw::text(img, fonts, x, y, geo.summary_font_size, color, line);
    }
}
