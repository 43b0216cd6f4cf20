mod common;

use essay_facsimile::grid::{CellAddress, Layout, OffsetMapper};
use essay_facsimile::render::overlay::annotate;
use essay_facsimile::{Error, Fonts, render};

#[test]
fn title_is_centered_in_the_first_row() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world", &geo).unwrap();

    assert_eq!(layout.title_width(), 17);
    let title: String = (0..17)
        .map(|col| layout.cell_char(0, 0, col).unwrap_or('.'))
        .collect();
    assert_eq!(title, "......A.Day......");
    assert_eq!(layout.cell_char(0, 0, 6), Some('A'));
    assert_eq!(layout.cell_char(0, 0, 10), Some('y'));
}

#[test]
fn content_starts_after_title_row_and_indent() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world", &geo).unwrap();
    let mapper = layout.mapper();

    // local index 0 - 0 + 2 + 17 = 19 -> row 1, col 2
    let cell = mapper.cell_of(0).unwrap();
    assert_eq!(
        cell,
        CellAddress {
            paragraph: 0,
            row: 1,
            column: 2
        }
    );
    assert_eq!(layout.cell_char(0, 1, 0), None);
    assert_eq!(layout.cell_char(0, 1, 1), None);
    assert_eq!(layout.cell_char(0, 1, 2), Some('H'));
}

#[test]
fn paragraph_rows_and_vertical_extents() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world\nSecond\n", &geo).unwrap();
    let paras = &layout.paragraphs;
    assert_eq!(paras.len(), 3);

    // title row + 2 indent + 11 chars = 30 cells -> 2 rows
    assert_eq!(paras[0].rows, 2);
    assert_eq!(paras[1].rows, 1);
    // trailing empty paragraph still reserves a row
    assert_eq!(paras[2].rows, 1);
    assert_eq!(paras[2].chars, 0);

    assert_eq!(paras[0].text_start, geo.margin_top);
    for p in paras {
        assert!(p.text_start < p.text_end);
        assert!(p.text_end <= p.bar_start);
        assert!(p.bar_start < p.bar_end);
        assert_eq!(p.text_end - p.text_start, p.rows as u32 * geo.row_pitch());
        assert_eq!(p.bar_end - p.bar_start, geo.bar_height);
    }
    for w in paras.windows(2) {
        assert_eq!(w[1].text_start, w[0].bar_end + geo.bar_margin);
    }
    assert_eq!(layout.content_bottom(), paras[2].bar_end);
}

#[test]
fn row_count_uses_two_indent_cells() {
    let geo = common::geo();
    let content = "首段\n一二三四五六七八九十一二三四五\n一二三四五六七八九十一二三四五六";
    let layout = Layout::build("", content, &geo).unwrap();
    // 15 chars + 2 indent = 17 cells: exactly one row
    assert_eq!(layout.paragraphs[1].rows, 1);
    // 16 chars + 2 indent = 18 cells: spills onto a second row
    assert_eq!(layout.paragraphs[2].rows, 2);
    // an empty title still takes one full title row
    assert_eq!(layout.title_width(), 17);
    assert_eq!(layout.paragraphs[0].rows, 2);
}

#[test]
fn title_only_essay_keeps_one_blank_paragraph() {
    let geo = common::geo();
    let layout = Layout::build("标题", "", &geo).unwrap();

    assert_eq!(layout.paragraphs.len(), 1);
    assert_eq!(layout.paragraphs[0].chars, 0);
    // title row + the indent row
    assert_eq!(layout.paragraphs[0].rows, 2);
    let mapper = layout.mapper();
    assert!(mapper.is_empty());
    assert!(mapper.map_range(0, 1).is_none());

    let req = common::request("标题", "", vec![]);
    let rendering = render(&req, &geo, &Fonts::none()).unwrap();
    assert_eq!(rendering.pages.len(), 1);
}

#[test]
fn zero_columns_is_invalid_input() {
    let mut geo = common::geo();
    geo.columns = 0;
    assert!(matches!(
        Layout::build("A Day", "Hello world", &geo),
        Err(Error::InvalidInput(_))
    ));
}

#[test]
fn carriage_returns_keep_their_offsets() {
    let geo = common::geo();
    let layout = Layout::build("", "甲乙\r\n丙丁", &geo).unwrap();
    let mapper = layout.mapper();

    assert_eq!(layout.paragraphs[0].chars, 2);
    assert_eq!(mapper.len(), 6);
    // offset 4 is 丙 in the raw content
    let range = mapper.map_range(4, 5).unwrap();
    assert_eq!(range.paragraph, 1);
    assert_eq!((range.start_row, range.start_col), (0, 2));
    assert_eq!(layout.slice_text(4, 5), "丙");
    assert_eq!(layout.slice_text(0, 6), "甲乙丙丁");
    // the '\r' offset lands on the paragraph's last drawn cell
    assert_eq!(mapper.cell_of(2), mapper.cell_of(1));

    let out = annotate(&[common::highlight(4, 5)], &layout, &geo);
    assert!(out.warnings.is_empty());
    assert_eq!(out.entries[0].content, "丙");
    assert_eq!(out.entries[0].anchor(), (1, 0, 2));
}

#[test]
fn span_in_first_paragraph_maps_to_paragraph_zero() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world\nSecond", &geo).unwrap();
    let mapper = layout.mapper();

    let range = mapper.map_range(0, 5).unwrap();
    assert_eq!(range.paragraph, 0);
    assert_eq!((range.start_row, range.start_col), (1, 2));
    // end is exclusive: last addressed char is offset 4
    assert_eq!((range.end_row, range.end_col), (1, 6));
}

#[test]
fn offsets_past_the_content_are_not_found() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world\nSecond", &geo).unwrap();
    let mapper = layout.mapper();

    assert_eq!(mapper.len(), 18);
    assert!(mapper.cell_of(17).is_some());
    assert!(mapper.cell_of(18).is_none());
    assert!(mapper.map_range(18, 20).is_none());
    assert!(mapper.map_range(1000, 1001).is_none());
    assert!(mapper.map_range(3, 3).is_none());
}

#[test]
fn second_paragraph_has_no_title_offset() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world\nSecond", &geo).unwrap();
    let mapper = layout.mapper();

    let range = mapper.map_range(12, 18).unwrap();
    assert_eq!(range.paragraph, 1);
    assert_eq!((range.start_row, range.start_col), (0, 2));
    assert_eq!((range.end_row, range.end_col), (0, 7));
    assert_eq!(layout.cell_char(1, 0, 2), Some('S'));
}

#[test]
fn range_end_is_clipped_to_the_start_paragraph() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world\nSecond", &geo).unwrap();
    let range = layout.mapper().map_range(6, 15).unwrap();
    assert_eq!(range.paragraph, 0);
    assert_eq!((range.start_row, range.start_col), (1, 8));
    // last char of "Hello world" is local 10 -> index 29 -> row 1, col 12
    assert_eq!((range.end_row, range.end_col), (1, 12));
}

#[test]
fn cell_round_trip_recovers_every_content_offset() {
    let geo = common::geo();
    let layout = Layout::build(common::ESSAY_TITLE, common::ESSAY, &geo).unwrap();
    let mapper = layout.mapper();

    let mut separators = 0;
    for offset in 0..mapper.len() {
        let cell = mapper.cell_of(offset).expect("offset inside content");
        match mapper.cell_to_offset(cell) {
            Some(back) if back == offset => {
                let ch = layout.cell_char(cell.paragraph, cell.row, cell.column);
                assert!(ch.is_some(), "content cell {cell:?} is blank");
            }
            // separators map onto the last character of their paragraph
            Some(back) => {
                assert_eq!(back + 1, offset, "offset {offset} came back as {back}");
                separators += 1;
            }
            None => panic!("offset {offset} -> {cell:?} did not map back"),
        }
    }
    assert_eq!(separators, layout.paragraphs.len() - 1);
}

#[test]
fn indent_and_title_cells_have_no_offset() {
    let geo = common::geo();
    let layout = Layout::build("A Day", "Hello world\nSecond", &geo).unwrap();
    let mapper = layout.mapper();
    let cell = |paragraph, row, column| CellAddress {
        paragraph,
        row,
        column,
    };

    assert_eq!(mapper.cell_to_offset(cell(0, 0, 8)), None);
    assert_eq!(mapper.cell_to_offset(cell(0, 1, 1)), None);
    assert_eq!(mapper.cell_to_offset(cell(0, 1, 2)), Some(0));
    assert_eq!(mapper.cell_to_offset(cell(1, 0, 1)), None);
    assert_eq!(mapper.cell_to_offset(cell(1, 0, 2)), Some(12));
    assert_eq!(mapper.cell_to_offset(cell(1, 0, 8)), None);
    assert_eq!(mapper.cell_to_offset(cell(5, 0, 2)), None);
}

#[test]
fn mapping_preserves_reading_order() {
    let geo = common::geo();
    let layout = Layout::build(common::ESSAY_TITLE, common::ESSAY, &geo).unwrap();
    let mapper = layout.mapper();
    let n = mapper.len();

    // adjacent non-overlapping spans of several widths
    for width in [1usize, 3, 7, 20] {
        let mut start = 0;
        let mut prev: Option<CellAddress> = None;
        while start + width <= n {
            let a = mapper.map_range(start, start + width).unwrap();
            if let Some(p) = prev {
                assert!(p <= a.start(), "span at {start} maps before its predecessor");
            }
            assert!(a.start() <= a.end());
            prev = Some(a.start());
            start += width;
        }
    }
}

#[test]
fn long_title_wraps_onto_extra_rows() {
    let geo = common::geo();
    let title = "这是一个非常非常非常非常长的作文题目需要两行";
    let n = title.chars().count();
    assert!(n > 17);

    let layout = Layout::build(title, "正文", &geo).unwrap();
    assert_eq!(layout.title_width(), 34);
    // title block (34) + indent (2) + 2 chars = 38 cells -> 3 rows
    assert_eq!(layout.paragraphs[0].rows, 3);

    let left = (34 - n) / 2;
    let first = title.chars().next().unwrap();
    assert_eq!(layout.cell_char(0, left / 17, left % 17), Some(first));

    let cell = layout.mapper().cell_of(0).unwrap();
    assert_eq!((cell.row, cell.column), (2, 2));
    assert_eq!(layout.cell_char(0, 2, 2), Some('正'));
}

#[test]
fn mapper_from_lengths_matches_layout() {
    let mapper = OffsetMapper::new([11, 6], 17, 17);
    assert_eq!(mapper.paragraph_of(0), Some(0));
    assert_eq!(mapper.paragraph_of(11), Some(0));
    assert_eq!(mapper.paragraph_of(12), Some(1));
    assert_eq!(mapper.paragraph_of(18), None);
}

#[test]
fn highlight_text_is_sliced_by_char_offsets() {
    let geo = common::geo();
    let layout = Layout::build("", "春眠不觉晓\n处处闻啼鸟", &geo).unwrap();
    assert_eq!(layout.slice_text(0, 2), "春眠");
    assert_eq!(layout.slice_text(6, 9), "处处闻");
    assert_eq!(layout.slice_text(3, 8), "觉晓处处");
}
