use std::ops::Range;

use image::{RgbaImage, imageops};

use crate::error::Error;
use crate::geometry::Geometry;
use crate::grid::Layout;

use super::sidebar::draw_border;

/// Every legal vertical split of the canvas, ascending and deduplicated:
/// each text-row bottom, each comment-bar start and end, plus any `extra`
/// boundaries (sidebar overflow) and the body end.
pub fn cut_points(layout: &Layout, geo: &Geometry, extra: impl IntoIterator<Item = u32>) -> Vec<u32> {
    let pitch = geo.row_pitch();
    let mut cuts: Vec<u32> = layout
        .paragraphs
        .iter()
        .flat_map(|p| {
            (1..=p.rows as u32)
                .map(move |r| p.text_start + r * pitch)
                .chain([p.bar_start, p.bar_end])
        })
        .chain(extra)
        .collect();
    cuts.sort_unstable();
    cuts.dedup();
    cuts
}

/// Where the summary panel lands after the body pages.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SummaryPlacement {
    /// Appended to the last body page, its top at this page y.
    LastPage { y: u32 },
    /// On a page of its own.
    NewPage,
}

#[derive(Clone, Debug, PartialEq)]
pub struct PagePlan {
    /// Canvas rows copied onto each body page, in order.
    pub slices: Vec<Range<u32>>,
    pub summary: SummaryPlacement,
}

/// Splits the body `[geo.margin_top, body_end)` into page-sized slices, each
/// ending on the greatest cut point that fits the page's drawable height.
/// Cuts strictly inside a `keep_together` range (a sidebar entry) are passed
/// over while another cut in the window remains.
pub fn plan_pages(
    cuts: &[u32],
    body_end: u32,
    summary_height: u32,
    keep_together: &[Range<u32>],
    layout: &Layout,
    geo: &Geometry,
) -> Result<PagePlan, Error> {
    let splits_block = |c: u32| keep_together.iter().any(|r| r.start < c && c < r.end);
    let window = geo.drawable_height();
    let mut slices = Vec::new();
    let mut prev = geo.margin_top;

    if body_end - prev + geo.summary_gap + summary_height <= window {
        log::debug!("Essay fits on a single page");
        return Ok(PagePlan {
            slices: vec![prev..body_end],
            summary: SummaryPlacement::LastPage {
                y: body_end + geo.summary_gap,
            },
        });
    }

    while prev < body_end {
        let candidate = prev + window;
        let cut = if candidate >= body_end {
            body_end
        } else {
            let upto = cuts.partition_point(|&c| c <= candidate);
            let from = cuts.partition_point(|&c| c <= prev);
            let window_cuts = &cuts[from..upto.max(from)];
            let clean = window_cuts.iter().rev().copied().find(|&c| !splits_block(c));
            match clean.or(window_cuts.last().copied()) {
                Some(c) => {
                    if clean.is_none() {
                        log::debug!(
                            "No cut in ({prev}, {candidate}] clears the sidebar; splitting an entry at {c}"
                        );
                    }
                    c
                }
                None => {
                    let next = cuts.iter().copied().find(|&c| c > prev).unwrap_or(body_end);
                    return Err(Error::OversizedParagraph {
                        paragraph: paragraph_at(layout, prev),
                        rows_height: next - prev,
                        page_height: window,
                    });
                }
            }
        };
        slices.push(prev..cut);
        prev = cut;
    }

    let used = slices.last().map(|s| s.end - s.start).unwrap_or(0);
    let summary = if used + geo.summary_gap + summary_height <= window {
        SummaryPlacement::LastPage {
            y: geo.margin_top + used + geo.summary_gap,
        }
    } else {
        SummaryPlacement::NewPage
    };

    log::debug!(
        "Planned {} body pages, summary {:?}",
        slices.len(),
        summary
    );
    Ok(PagePlan { slices, summary })
}

fn paragraph_at(layout: &Layout, y: u32) -> usize {
    layout
        .paragraphs
        .iter()
        .position(|p| y < p.bar_end)
        .unwrap_or(layout.paragraphs.len().saturating_sub(1))
}

/// One printed page.
#[derive(Clone, Debug)]
pub struct Page {
    pub image: RgbaImage,
    /// Canvas rows shown on this page, placed at `geo.margin_top`. Empty for a
    /// summary-only page.
    pub body: Range<u32>,
    pub has_summary: bool,
}

impl Page {
    pub fn encode_png(&self) -> Result<Vec<u8>, Error> {
        let mut buf = std::io::Cursor::new(Vec::new());
        self.image.write_to(&mut buf, image::ImageFormat::Png)?;
        Ok(buf.into_inner())
    }
}

/// Copies the planned slices out of `canvas` onto fresh pages, redrawing the
/// sidebar border over each page's drawable height (down to the body end on
/// the last body page).
pub(crate) fn cut_pages(
    canvas: &RgbaImage,
    plan: &PagePlan,
    summary: Range<u32>,
    geo: &Geometry,
) -> Vec<Page> {
    let paper = super::draw::rgba(geo.palette.paper);
    let blank = || RgbaImage::from_pixel(geo.page_width, geo.page_height, paper);
    let full_bottom = geo.margin_top + geo.drawable_height();
    let last = plan.slices.len().saturating_sub(1);

    let mut pages: Vec<Page> = plan
        .slices
        .iter()
        .enumerate()
        .map(|(i, slice)| {
            let mut image = blank();
            paste(&mut image, canvas, slice.clone(), geo.margin_top);
            // the final body page stops its border where the body does
            let bottom = if i == last {
                geo.margin_top + (slice.end - slice.start)
            } else {
                full_bottom
            };
            draw_border(&mut image, geo.margin_top, bottom, geo);
            Page {
                image,
                body: slice.clone(),
                has_summary: false,
            }
        })
        .collect();

    if summary.is_empty() {
        return pages;
    }
    match plan.summary {
        SummaryPlacement::LastPage { y } => {
            if let Some(last) = pages.last_mut() {
                paste(&mut last.image, canvas, summary, y);
                last.has_summary = true;
            }
        }
        SummaryPlacement::NewPage => {
            let mut image = blank();
            paste(&mut image, canvas, summary, geo.margin_top);
            pages.push(Page {
                image,
                body: 0..0,
                has_summary: true,
            });
        }
    }
    pages
}

fn paste(page: &mut RgbaImage, canvas: &RgbaImage, rows: Range<u32>, y: u32) {
    let height = rows.end.min(canvas.height()).saturating_sub(rows.start);
    if height == 0 {
        return;
    }
    let slice = imageops::crop_imm(canvas, 0, rows.start, canvas.width(), height).to_image();
    imageops::replace(page, &slice, 0, y as i64);
}
