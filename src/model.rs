use serde::Deserialize;

use crate::geometry::{Geometry, Rgb};

/// One render job: OCR'd title and content plus the grading result.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct RenderRequest {
    pub title: String,
    /// Paragraphs separated by `'\n'`.
    pub content: String,
    #[serde(default)]
    pub grading: GradingResult,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct GradingResult {
    #[serde(default)]
    pub spans: Vec<Span>,
    /// One comment per paragraph, by paragraph index.
    #[serde(default)]
    pub paragraph_comments: Vec<String>,
    #[serde(default)]
    pub summary: Summary,
}

#[derive(Clone, Debug, Default, Deserialize)]
pub struct Summary {
    #[serde(default)]
    pub comment: String,
    #[serde(default)]
    pub suggestion: String,
    #[serde(default)]
    pub scores: Scores,
}

/// Whole-essay scores on the grader's 0-5 scale.
#[derive(Clone, Copy, Debug, Default, PartialEq, Deserialize)]
pub struct Scores {
    #[serde(default)]
    pub overall: f32,
    #[serde(default)]
    pub content: f32,
    #[serde(default)]
    pub expression: f32,
    #[serde(default)]
    pub relevance: f32,
}

/// A graded range `[start, end)` of flat offsets into the essay content.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    #[serde(flatten)]
    pub annotation: Annotation,
    /// Classification data the renderer has no field for.
    #[serde(default)]
    pub extra: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Annotation {
    /// A sick sentence: grammatical error with an optional revision.
    Grammar {
        #[serde(default)]
        revised: Option<String>,
        #[serde(default)]
        label: Option<String>,
    },
    Typo {
        #[serde(default)]
        original: String,
        #[serde(default)]
        revised: String,
    },
    /// Highlighted vocabulary. Without `text` the matched essay text is used.
    Highlight {
        #[serde(default)]
        text: Option<String>,
    },
    Rhetoric {
        #[serde(default)]
        devices: Vec<String>,
    },
}

/// How an annotation is drawn on the grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OverlayStyle {
    Underline,
    Mask,
    Wavy,
}

impl Annotation {
    pub fn label(&self) -> &'static str {
        match self {
            Annotation::Grammar { .. } => "病句",
            Annotation::Typo { .. } => "错别字",
            Annotation::Highlight { .. } => "好词",
            Annotation::Rhetoric { .. } => "修辞",
        }
    }

    pub fn style(&self) -> OverlayStyle {
        match self {
            Annotation::Grammar { .. } => OverlayStyle::Underline,
            Annotation::Typo { .. } | Annotation::Highlight { .. } => OverlayStyle::Mask,
            Annotation::Rhetoric { .. } => OverlayStyle::Wavy,
        }
    }

    /// RGBA draw color; strokes are opaque, masks translucent.
    pub fn color(&self, geo: &Geometry) -> [u8; 4] {
        let p = &geo.palette;
        let opaque = |c: Rgb| [c[0], c[1], c[2], 255];
        match self {
            Annotation::Grammar { .. } => opaque(p.grammar),
            Annotation::Typo { .. } => p.typo,
            Annotation::Highlight { .. } => p.highlight,
            Annotation::Rhetoric { .. } => opaque(p.rhetoric),
        }
    }
}

/// Sidebar explanation anchored at the first cell of a span.
#[derive(Clone, Debug, PartialEq)]
pub struct SidebarEntry {
    pub anchor_paragraph: usize,
    pub anchor_row: usize,
    pub anchor_column: usize,
    pub kind: String,
    pub tag: Option<String>,
    pub content: String,
    pub color: [u8; 4],
}

impl SidebarEntry {
    pub fn anchor(&self) -> (usize, usize, usize) {
        (self.anchor_paragraph, self.anchor_row, self.anchor_column)
    }
}
