use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use ab_glyph::{FontArc, FontVec};
use memmap2::Mmap;
use ttf_parser::Face;

use crate::error::Error;

/// Characters a face must cover to typeset an essay.
const COVERAGE_PROBE: [char; 4] = ['永', '。', 'A', '0'];

/// Family names tried first, in order, when scanning font directories.
const PREFERRED_FAMILIES: &[&str] = &[
    "Noto Sans CJK SC",
    "Noto Serif CJK SC",
    "Source Han Sans SC",
    "Source Han Serif SC",
    "WenQuanYi Zen Hei",
    "WenQuanYi Micro Hei",
    "PingFang SC",
    "Hiragino Sans GB",
    "Microsoft YaHei",
    "SimSun",
];

/// Glyph source for everything drawn as text. Without a face, text drawing
/// is skipped and only geometry is rendered.
#[derive(Clone, Default)]
pub struct Fonts {
    glyph: Option<FontArc>,
    family: Option<String>,
}

impl std::fmt::Debug for Fonts {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Fonts").field("family", &self.family).finish()
    }
}

impl Fonts {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn from_file(path: &Path, face_index: u32) -> Result<Self, Error> {
        let data = std::fs::read(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound | std::io::ErrorKind::PermissionDenied => {
                Error::Io(std::io::Error::new(e.kind(), format!("{}: {}", e, path.display())))
            }
            _ => Error::Io(e),
        })?;
        Self::from_bytes(data, face_index)
    }

    pub fn from_bytes(data: Vec<u8>, face_index: u32) -> Result<Self, Error> {
        let face = Face::parse(&data, face_index)
            .map_err(|e| Error::Font(format!("unreadable face {face_index}: {e}")))?;
        let family = family_name(&face);
        let font = FontVec::try_from_vec_and_index(data, face_index)
            .map_err(|e| Error::Font(format!("cannot load face {face_index}: {e}")))?;
        Ok(Self {
            glyph: Some(FontArc::new(font)),
            family,
        })
    }

    /// First installed face that covers CJK text, preferring well-known
    /// families. Falls back to [`Fonts::none`] with a warning.
    pub fn discover() -> Self {
        let Some((path, face_index)) = find_cjk_face() else {
            log::warn!("No CJK font found in font directories; rendering without glyphs");
            return Self::none();
        };
        match Self::from_file(path, *face_index) {
            Ok(fonts) => {
                log::info!(
                    "Using font {} (face {face_index}) from {}",
                    fonts.family.as_deref().unwrap_or("?"),
                    path.display()
                );
                fonts
            }
            Err(e) => {
                log::warn!("Font {} unusable: {e}; rendering without glyphs", path.display());
                Self::none()
            }
        }
    }

    pub fn glyph(&self) -> Option<&FontArc> {
        self.glyph.as_ref()
    }

    pub fn family(&self) -> Option<&str> {
        self.family.as_deref()
    }
}

fn font_directories() -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = Vec::new();

    // 1. User-configured directories via ESSAY_FONTS env var
    if let Ok(val) = std::env::var("ESSAY_FONTS") {
        let sep = if cfg!(windows) { ';' } else { ':' };
        for part in val.split(sep) {
            let trimmed = part.trim();
            if !trimmed.is_empty() {
                dirs.push(PathBuf::from(trimmed));
            }
        }
    }

    // 2. Platform-specific system font directories
    #[cfg(target_os = "macos")]
    {
        dirs.extend([
            "/Library/Fonts".into(),
            "/System/Library/Fonts".into(),
            "/System/Library/Fonts/Supplemental".into(),
        ]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(&home).join("Library/Fonts"));
        }
    }

    #[cfg(target_os = "linux")]
    {
        dirs.extend(["/usr/share/fonts".into(), "/usr/local/share/fonts".into()]);
        if let Ok(home) = std::env::var("HOME") {
            dirs.push(PathBuf::from(home).join(".local/share/fonts"));
        }
    }

    #[cfg(target_os = "windows")]
    {
        if let Ok(windir) = std::env::var("WINDIR") {
            dirs.push(PathBuf::from(windir).join("Fonts"));
        } else {
            dirs.push("C:\\Windows\\Fonts".into());
        }
    }

    dirs
}

fn is_font_collection(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("ttc") || e.eq_ignore_ascii_case("otc"))
}

fn is_font_file(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| matches!(e.to_ascii_lowercase().as_str(), "ttf" | "otf" | "ttc" | "otc"))
}

fn collect_font_files(dir: &Path, out: &mut Vec<PathBuf>) {
    let Ok(entries) = std::fs::read_dir(dir) else {
        return;
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_font_files(&path, out);
        } else if is_font_file(&path) {
            out.push(path);
        }
    }
}

fn family_name(face: &Face) -> Option<String> {
    face.names()
        .into_iter()
        .find(|n| n.name_id == ttf_parser::name_id::FAMILY && n.is_unicode())
        .and_then(|n| n.to_string())
}

fn covers_essay_text(face: &Face) -> bool {
    COVERAGE_PROBE.iter().all(|&c| face.glyph_index(c).is_some())
}

static CJK_FACE: OnceLock<Option<(PathBuf, u32)>> = OnceLock::new();

fn find_cjk_face() -> Option<&'static (PathBuf, u32)> {
    CJK_FACE.get_or_init(scan_for_cjk_face).as_ref()
}

fn scan_for_cjk_face() -> Option<(PathBuf, u32)> {
    let t0 = std::time::Instant::now();
    let mut files = Vec::new();
    for dir in font_directories() {
        collect_font_files(&dir, &mut files);
    }
    files.sort();

    // (preference rank, path, face index); lower rank wins
    let mut best: Option<(usize, PathBuf, u32)> = None;
    for path in &files {
        let Ok(file) = std::fs::File::open(path) else {
            continue;
        };
        let Ok(data) = (unsafe { Mmap::map(&file) }) else {
            continue;
        };
        let face_count = if is_font_collection(path) {
            ttf_parser::fonts_in_collection(&data).unwrap_or(1)
        } else {
            1
        };
        for face_idx in 0..face_count {
            let Ok(face) = Face::parse(&data, face_idx) else {
                continue;
            };
            if !covers_essay_text(&face) {
                continue;
            }
            let rank = family_name(&face)
                .and_then(|f| PREFERRED_FAMILIES.iter().position(|p| p.eq_ignore_ascii_case(&f)))
                .unwrap_or(PREFERRED_FAMILIES.len());
            if best.as_ref().is_none_or(|(r, _, _)| rank < *r) {
                best = Some((rank, path.clone(), face_idx));
            }
        }
        if best.as_ref().is_some_and(|(r, _, _)| *r == 0) {
            break;
        }
    }

    log::info!(
        "Font scan: {:.1}ms, {} files inspected, CJK face {}",
        t0.elapsed().as_secs_f64() * 1000.0,
        files.len(),
        if best.is_some() { "found" } else { "missing" },
    );
    best.map(|(_, path, idx)| (path, idx))
}
