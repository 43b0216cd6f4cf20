/// Width of a character in half-cells: ASCII and other narrow characters take
/// one, CJK and other wide characters take two.
fn half_width(c: char) -> usize {
    if (c as u32) < 0x1100 { 1 } else { 2 }
}

/// Breaks `text` into lines of at most `chars_per_line` full-width characters.
/// Explicit newlines always break. Empty input yields no lines.
pub fn wrap_text(text: &str, chars_per_line: usize) -> Vec<String> {
    let capacity = chars_per_line.max(1) * 2;
    let mut lines = Vec::new();
    for source_line in text.split('\n') {
        let mut current = String::new();
        let mut used = 0usize;
        for c in source_line.trim_end().chars() {
            let w = half_width(c);
            if used + w > capacity && !current.is_empty() {
                lines.push(std::mem::take(&mut current));
                used = 0;
            }
            if used == 0 && c == ' ' {
                continue;
            }
            current.push(c);
            used += w;
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

/// Cuts `text` to one line of `chars_per_line` full-width characters, ending in
/// an ellipsis when anything was dropped.
pub fn ellipsize(text: &str, chars_per_line: usize) -> String {
    let flat: String = text.split('\n').collect::<Vec<_>>().join(" ");
    let capacity = chars_per_line.max(1) * 2;
    let total: usize = flat.chars().map(half_width).sum();
    if total <= capacity {
        return flat;
    }
    let mut out = String::new();
    let mut used = 0usize;
    for c in flat.chars() {
        let w = half_width(c);
        if used + w + 2 > capacity {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}
