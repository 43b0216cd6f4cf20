use std::fmt;

#[derive(Debug)]
pub enum Error {
    Io(std::io::Error),
    InvalidInput(String),
    EmptyDocument,
    /// A paragraph's text rows (plus comment bar) cannot fit on one page, so
    /// no legal cut point exists inside the page window.
    OversizedParagraph {
        paragraph: usize,
        rows_height: u32,
        page_height: u32,
    },
    Image(image::ImageError),
    Font(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Io(e) => write!(f, "I/O error: {e}"),
            Error::InvalidInput(msg) => write!(f, "invalid input: {msg}"),
            Error::EmptyDocument => write!(f, "essay has no paragraphs to render"),
            Error::OversizedParagraph {
                paragraph,
                rows_height,
                page_height,
            } => write!(
                f,
                "paragraph {paragraph} needs {rows_height}px without a legal cut, \
                 but a page only holds {page_height}px"
            ),
            Error::Image(e) => write!(f, "image error: {e}"),
            Error::Font(msg) => write!(f, "font error: {msg}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(e) => Some(e),
            Error::Image(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::Io(e)
    }
}

impl From<image::ImageError> for Error {
    fn from(e: image::ImageError) -> Self {
        Error::Image(e)
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::InvalidInput(e.to_string())
    }
}

/// A per-span problem that was recovered from locally. The span is skipped and
/// rendering continues.
#[derive(Clone, Debug, PartialEq)]
pub enum Warning {
    /// The span's offsets fall outside every paragraph.
    MappingMiss { span: usize, start: usize, end: usize },
    /// `end <= start`.
    MalformedSpan { span: usize, start: usize, end: usize },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::MappingMiss { span, start, end } => {
                write!(f, "span {span} [{start}, {end}) does not map to any paragraph")
            }
            Warning::MalformedSpan { span, start, end } => {
                write!(f, "span {span} has an empty or inverted range [{start}, {end})")
            }
        }
    }
}
