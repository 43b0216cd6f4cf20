mod error;
mod fonts;
mod geometry;
pub mod grid;
mod model;
mod pdf;
pub mod render;

pub use error::{Error, Warning};
pub use fonts::Fonts;
pub use geometry::{Geometry, Palette};
pub use model::{
    Annotation, GradingResult, OverlayStyle, RenderRequest, Scores, SidebarEntry, Span, Summary,
};
pub use pdf::pages_to_pdf;
pub use render::paginate::Page;
pub use render::{Composition, Rendering, compose, render};

use std::path::{Path, PathBuf};
use std::time::Instant;

pub fn read_request(input: &Path) -> Result<RenderRequest, Error> {
    let raw = std::fs::read(input).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => Error::Io(
            std::io::Error::new(e.kind(), format!("{}: {}", e, input.display())),
        ),
        _ => Error::Io(e),
    })?;
    Ok(serde_json::from_slice(&raw)?)
}

/// Writes `page-001.png`, `page-002.png`, ... into `out_dir` and returns the
/// written paths.
pub fn write_pages(pages: &[Page], out_dir: &Path) -> Result<Vec<PathBuf>, Error> {
    std::fs::create_dir_all(out_dir)?;
    pages
        .iter()
        .enumerate()
        .map(|(i, page)| {
            let path = out_dir.join(format!("page-{:03}.png", i + 1));
            std::fs::write(&path, page.encode_png()?)?;
            Ok(path)
        })
        .collect()
}

/// Reads a JSON render request, renders it and writes one PNG per page.
pub fn render_request_file(
    input: &Path,
    out_dir: &Path,
    geo: &Geometry,
    fonts: &Fonts,
) -> Result<Rendering, Error> {
    let t0 = Instant::now();

    let req = read_request(input)?;
    let t_parse = t0.elapsed();

    let rendering = render(&req, geo, fonts)?;
    let t_render = t0.elapsed();

    write_pages(&rendering.pages, out_dir)?;
    let t_total = t0.elapsed();

    log::info!(
        "Timing: parse={:.1}ms, render={:.1}ms, write={:.1}ms, total={:.1}ms ({} pages)",
        t_parse.as_secs_f64() * 1000.0,
        (t_render - t_parse).as_secs_f64() * 1000.0,
        (t_total - t_render).as_secs_f64() * 1000.0,
        t_total.as_secs_f64() * 1000.0,
        rendering.pages.len(),
    );

    Ok(rendering)
}
