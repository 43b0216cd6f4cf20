use crate::error::Error;

pub type Rgb = [u8; 3];
pub type Rgba = [u8; 4];

#[derive(Clone, Debug, PartialEq)]
pub struct Palette {
    pub paper: Rgb,
    pub grid: Rgb,
    pub text: Rgb,
    pub comment_text: Rgb,
    pub grammar: Rgb,
    pub typo: Rgba,
    pub highlight: Rgba,
    pub rhetoric: Rgb,
    pub marker_text: Rgb,
    pub sidebar_border: Rgb,
    pub summary_border: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            paper: [255, 255, 255],
            grid: [196, 64, 64],
            text: [20, 20, 20],
            comment_text: [176, 32, 32],
            grammar: [220, 40, 40],
            typo: [255, 150, 0, 96],
            highlight: [90, 200, 110, 80],
            rhetoric: [40, 100, 220],
            marker_text: [255, 255, 255],
            sidebar_border: [160, 160, 160],
            summary_border: [196, 64, 64],
        }
    }
}

/// Every layout constant of the composition paper, in canvas pixels.
///
/// Built once per process (or per request) and passed by reference into each
/// stage. Nothing here is mutated during a render.
#[derive(Clone, Debug, PartialEq)]
pub struct Geometry {
    pub columns: usize,
    pub cell_width: u32,
    pub cell_height: u32,
    /// Height of the thin bar between two grid rows.
    pub row_gap: u32,
    pub margin_top: u32,
    pub margin_left: u32,
    pub margin_bottom: u32,
    /// Height of the per-paragraph comment bar.
    pub bar_height: u32,
    /// Space above and below each comment bar.
    pub bar_margin: u32,
    /// Horizontal space between the grid body and the sidebar column.
    pub sidebar_margin: u32,
    pub sidebar_width: u32,
    pub sidebar_padding: u32,
    /// Minimum vertical space between two stacked sidebar entries.
    pub sidebar_gap: u32,
    pub page_width: u32,
    pub page_height: u32,
    pub summary_gap: u32,
    pub summary_padding: u32,
    pub grid_font_size: f32,
    pub comment_font_size: f32,
    pub sidebar_font_size: f32,
    pub summary_font_size: f32,
    pub grid_line_width: u32,
    pub stroke_width: u32,
    pub wave_amplitude: f32,
    pub wave_length: f32,
    pub marker_radius: u32,
    pub palette: Palette,
}

impl Default for Geometry {
    fn default() -> Self {
        Self::scaled(2)
    }
}

impl Geometry {
    /// Geometry in base design units (702x993 page) multiplied by `k`.
    pub fn scaled(k: u32) -> Self {
        let k = k.max(1);
        let kf = k as f32;
        Self {
            columns: 17,
            cell_width: 30 * k,
            cell_height: 34 * k,
            row_gap: 7 * k,
            margin_top: 24 * k,
            margin_left: 24 * k,
            margin_bottom: 23 * k,
            bar_height: 56 * k,
            bar_margin: 12 * k,
            sidebar_margin: 11 * k,
            sidebar_width: 140 * k,
            sidebar_padding: 4 * k,
            sidebar_gap: 6 * k,
            page_width: 702 * k,
            page_height: 993 * k,
            summary_gap: 12 * k,
            summary_padding: 8 * k,
            grid_font_size: 17.0 * kf,
            comment_font_size: 13.0 * kf,
            sidebar_font_size: 13.0 * kf,
            summary_font_size: 14.0 * kf,
            grid_line_width: k,
            stroke_width: k,
            wave_amplitude: 1.5 * kf,
            wave_length: 6.0 * kf,
            marker_radius: 6 * k,
            palette: Palette::default(),
        }
    }

    pub fn validate(&self) -> Result<(), Error> {
        if self.columns == 0 || self.cell_width == 0 || self.cell_height == 0 {
            return Err(Error::InvalidInput(
                "grid needs at least one column and non-zero cells".into(),
            ));
        }
        if self.sidebar_right() > self.page_width {
            return Err(Error::InvalidInput(format!(
                "body and sidebar need {}px but the page is {}px wide",
                self.sidebar_right(),
                self.page_width
            )));
        }
        if self.margin_top + self.margin_bottom >= self.page_height {
            return Err(Error::InvalidInput(
                "vertical margins leave no drawable page height".into(),
            ));
        }
        if self.sidebar_width <= 2 * self.sidebar_padding || self.sidebar_font_size <= 0.0 {
            return Err(Error::InvalidInput("sidebar has no room for text".into()));
        }
        Ok(())
    }

    /// Vertical distance between the tops of two consecutive grid rows.
    pub fn row_pitch(&self) -> u32 {
        self.cell_height + self.row_gap
    }

    pub fn body_width(&self) -> u32 {
        self.columns as u32 * self.cell_width
    }

    pub fn cell_x(&self, col: usize) -> u32 {
        self.margin_left + col as u32 * self.cell_width
    }

    pub fn sidebar_left(&self) -> u32 {
        self.margin_left + self.body_width() + self.sidebar_margin
    }

    pub fn sidebar_right(&self) -> u32 {
        self.sidebar_left() + self.sidebar_width
    }

    /// Page height available for content between the top and bottom margins.
    pub fn drawable_height(&self) -> u32 {
        self.page_height - self.margin_top - self.margin_bottom
    }

    /// Full-width (CJK) characters that fit on one sidebar line.
    pub fn sidebar_chars_per_line(&self) -> usize {
        let inner = (self.sidebar_width - 2 * self.sidebar_padding) as f32;
        ((inner / self.sidebar_font_size).floor() as usize).max(1)
    }

    pub fn sidebar_line_height(&self) -> u32 {
        (self.sidebar_font_size * 1.4).ceil() as u32
    }

    pub fn summary_width(&self) -> u32 {
        self.sidebar_right() - self.margin_left
    }

    pub fn summary_chars_per_line(&self) -> usize {
        let inner = self.summary_width().saturating_sub(2 * self.summary_padding) as f32;
        ((inner / self.summary_font_size).floor() as usize).max(1)
    }

    pub fn summary_line_height(&self) -> u32 {
        (self.summary_font_size * 1.5).ceil() as u32
    }

    pub fn comment_chars_per_line(&self) -> usize {
        ((self.body_width() as f32 / self.comment_font_size).floor() as usize).max(1)
    }
}
