//! Virtual path handling
//!
//! Paths are POSIX-style and `/`-separated. The canonical form has no leading
//! or trailing separator and no empty segments, so `"/a//b/"` normalizes to
//! `"a/b"`. Both `""` and `"/"` normalize to `""`, which denotes the root.
//! `.` segments are dropped and `..` pops the previous segment (never past the
//! root).

pub const SEPARATOR: char = '/';

/// Split a path into its canonical segments
pub fn segments(path: &str) -> Vec<&str> {
    let mut out: Vec<&str> = Vec::new();
    for segment in path.split(SEPARATOR) {
        match segment {
            "" | "." => {}
            ".." => {
                out.pop();
            }
            name => out.push(name),
        }
    }
    out
}

pub fn normalize(path: &str) -> String {
    segments(path).join("/")
}

/// Everything before the last separator of the normalized path
pub fn dirname(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind(SEPARATOR) {
        Some(idx) => normalized[..idx].to_string(),
        None => String::new(),
    }
}

/// The last segment of the normalized path
pub fn basename(path: &str) -> String {
    let normalized = normalize(path);
    match normalized.rfind(SEPARATOR) {
        Some(idx) => normalized[idx + 1..].to_string(),
        None => normalized,
    }
}

/// Join a canonical parent path and a child name
pub fn join(parent: &str, name: &str) -> String {
    if parent.is_empty() {
        name.to_string()
    } else {
        format!("{}{}{}", parent, SEPARATOR, name)
    }
}

/// Whether `path` equals `ancestor` or lies beneath it (both canonical)
pub fn is_within(path: &str, ancestor: &str) -> bool {
    if ancestor.is_empty() {
        return true;
    }
    path == ancestor
        || (path.starts_with(ancestor) && path[ancestor.len()..].starts_with(SEPARATOR))
}
