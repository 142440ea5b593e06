const MAX_NAME_CHARS: usize = 200;
const LAST_RESORT: &str = "download";

/// Windows-safe local file name for a suggested download name.
///
/// Directory components are dropped, forbidden characters become `_`, and a
/// name that ends up empty is replaced by `fallback`.
pub fn safe_artifact_name(suggested: &str, fallback: &str) -> String {
    sanitize(suggested)
        .or_else(|| sanitize(fallback))
        .unwrap_or_else(|| LAST_RESORT.to_string())
}

/// `name.ext` for attempt 0, then `name (1).ext`, `name (2).ext`, ...
pub fn numbered_name(filename: &str, attempt: usize) -> String {
    if attempt == 0 {
        return filename.to_string();
    }
    match filename.rfind('.') {
        Some(pos) if pos > 0 => {
            let (stem, ext) = filename.split_at(pos);
            format!("{stem} ({attempt}){ext}")
        }
        _ => format!("{filename} ({attempt})"),
    }
}

fn sanitize(input: &str) -> Option<String> {
    let last_component = input
        .rsplit(|c: char| c == '/' || c == '\\')
        .next()
        .unwrap_or(input);
    let cleaned: String = last_component
        .chars()
        .map(|c| if is_forbidden(c) { '_' } else { c })
        .collect();
    let mut cleaned = cleaned.trim_matches(&[' ', '.'][..]).to_string();
    if cleaned.is_empty() {
        return None;
    }
    if let Some((idx, _)) = cleaned.char_indices().nth(MAX_NAME_CHARS) {
        cleaned.truncate(idx);
    }
    let stem_len = stem_of(&cleaned).len();
    if is_reserved_windows_name(&cleaned[..stem_len]) {
        cleaned.insert(stem_len, '_');
    }
    Some(cleaned)
}

fn stem_of(name: &str) -> &str {
    match name.find('.') {
        Some(pos) => &name[..pos],
        None => name,
    }
}

fn is_forbidden(c: char) -> bool {
    matches!(c,
        '\\' | '/' | ':' | '*' | '?' | '"' | '<' | '>' | '|' | '\0'..='\u{1F}'
    )
}

fn is_reserved_windows_name(name: &str) -> bool {
    const RESERVED: &[&str] = &[
        "CON", "PRN", "AUX", "NUL", "COM1", "COM2", "COM3", "COM4", "COM5", "COM6", "COM7", "COM8",
        "COM9", "LPT1", "LPT2", "LPT3", "LPT4", "LPT5", "LPT6", "LPT7", "LPT8", "LPT9",
    ];
    RESERVED.iter().any(|r| r.eq_ignore_ascii_case(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_components_are_dropped() {
        assert_eq!(safe_artifact_name("../../etc/passwd", "x.pdf"), "passwd");
        assert_eq!(safe_artifact_name(r"C:\temp\out.zip", "x.pdf"), "out.zip");
    }

    #[test]
    fn forbidden_characters_are_replaced() {
        assert_eq!(safe_artifact_name("a?b*c.pdf", "x.pdf"), "a_b_c.pdf");
    }

    #[test]
    fn empty_or_dot_names_use_fallback() {
        assert_eq!(safe_artifact_name("..", "scan.pdf"), "scan.pdf");
        assert_eq!(safe_artifact_name("", ""), "download");
    }

    #[test]
    fn reserved_device_names_are_patched() {
        assert_eq!(safe_artifact_name("CON.pdf", "x.pdf"), "CON_.pdf");
        assert_eq!(safe_artifact_name("nul", "x.pdf"), "nul_");
    }

    #[test]
    fn numbered_names_keep_extension() {
        assert_eq!(numbered_name("out.pdf", 0), "out.pdf");
        assert_eq!(numbered_name("out.pdf", 2), "out (2).pdf");
        assert_eq!(numbered_name("archive", 1), "archive (1)");
    }
}
