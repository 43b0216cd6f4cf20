use pdf_writer::{Content, Filter, Name, Pdf, Rect, Ref};

use crate::render::paginate::Page;

/// A4 width in points; page height follows the image aspect ratio.
const PAGE_WIDTH_PT: f32 = 595.28;

/// Bundles rendered pages into one PDF, each page a single full-bleed image.
pub fn pages_to_pdf(pages: &[Page]) -> Vec<u8> {
    let t0 = std::time::Instant::now();
    let mut pdf = Pdf::new();
    let mut next_id = 1i32;
    let mut alloc = || {
        let r = Ref::new(next_id);
        next_id += 1;
        r
    };

    let catalog_id = alloc();
    let pages_id = alloc();
    let mut page_ids = Vec::with_capacity(pages.len());

    for (i, page) in pages.iter().enumerate() {
        let page_id = alloc();
        let content_id = alloc();
        let xobj_ref = alloc();
        let name = format!("Im{}", i + 1);

        let (w, h) = (page.image.width(), page.image.height());
        let rgb_data: Vec<u8> = page
            .image
            .pixels()
            .flat_map(|p| [p.0[0], p.0[1], p.0[2]])
            .collect();
        let compressed_rgb = miniz_oxide::deflate::compress_to_vec_zlib(&rgb_data, 6);

        {
            let mut xobj = pdf.image_xobject(xobj_ref, &compressed_rgb);
            xobj.filter(Filter::FlateDecode);
            xobj.width(w as i32);
            xobj.height(h as i32);
            xobj.color_space().device_rgb();
            xobj.bits_per_component(8);
        }

        let height_pt = PAGE_WIDTH_PT * h as f32 / w.max(1) as f32;
        let mut content = Content::new();
        content.save_state();
        content.transform([PAGE_WIDTH_PT, 0.0, 0.0, height_pt, 0.0, 0.0]);
        content.x_object(Name(name.as_bytes()));
        content.restore_state();
        let raw = content.finish();
        let compressed = miniz_oxide::deflate::compress_to_vec_zlib(raw.as_slice(), 6);
        pdf.stream(content_id, &compressed).filter(Filter::FlateDecode);

        {
            let mut pdf_page = pdf.page(page_id);
            pdf_page
                .media_box(Rect::new(0.0, 0.0, PAGE_WIDTH_PT, height_pt))
                .parent(pages_id)
                .contents(content_id);
            let mut resources = pdf_page.resources();
            let mut xobjects = resources.x_objects();
            xobjects.pair(Name(name.as_bytes()), xobj_ref);
        }

        page_ids.push(page_id);
    }

    pdf.catalog(catalog_id).pages(pages_id);
    pdf.pages(pages_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let bytes = pdf.finish();
    log::info!(
        "PDF export: {} pages, {} bytes in {:.1}ms",
        pages.len(),
        bytes.len(),
        t0.elapsed().as_secs_f64() * 1000.0,
    );
    bytes
}
