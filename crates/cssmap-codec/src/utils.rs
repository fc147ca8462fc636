//! Utility functions for working with source paths
//!
//! Source map paths are URL-like strings, so these helpers work on `/`
//! separated text rather than on host paths. A `\` is read as a separator
//! too, which keeps Windows paths usable without a separate code path.

/// Whether `path` is absolute: rooted, drive-prefixed or a URL
pub fn is_absolute(path: &str) -> bool {
    path.starts_with('/') || path.starts_with('\\') || drive_prefix(path).is_some() || is_url(path)
}

fn is_url(path: &str) -> bool {
    match path.find("://") {
        Some(idx) => {
            idx > 0
                && path[..idx]
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
        }
        None => path.starts_with("data:"),
    }
}

/// Length of a `C:/` style prefix, if present
fn drive_prefix(path: &str) -> Option<usize> {
    let bytes = path.as_bytes();
    if bytes.len() >= 3
        && bytes[0].is_ascii_alphabetic()
        && bytes[1] == b':'
        && (bytes[2] == b'/' || bytes[2] == b'\\')
    {
        Some(3)
    } else {
        None
    }
}

/// Split a path into its root prefix (`/`, `C:/` or empty) and the remainder
fn split_root(path: &str) -> (String, &str) {
    if let Some(len) = drive_prefix(path) {
        (format!("{}/", &path[..2]), &path[len..])
    } else if path.starts_with('/') || path.starts_with('\\') {
        ("/".to_string(), &path[1..])
    } else {
        (String::new(), path)
    }
}

/// Normalize a path: collapse `.` and empty segments, fold `..` where possible
///
/// Leading `..` segments of a relative path are kept. An empty result is
/// `.` for relative paths and the root for absolute ones.
pub fn normalize(path: &str) -> String {
    if is_url(path) {
        return path.to_string();
    }

    let (root, rest) = split_root(path);
    let mut parts: Vec<&str> = Vec::new();
    for segment in rest.split(['/', '\\']) {
        match segment {
            "" | "." => {}
            ".." => {
                if parts.last().is_some_and(|last| *last != "..") {
                    parts.pop();
                } else if root.is_empty() {
                    parts.push("..");
                }
                // `..` above the root of an absolute path stays at the root
            }
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    if root.is_empty() {
        if joined.is_empty() {
            ".".to_string()
        } else {
            joined
        }
    } else {
        root + &joined
    }
}

/// Join `path` onto `root`
///
/// Absolute paths and URLs are returned unchanged. An empty root behaves
/// like `.`.
pub fn join(root: &str, path: &str) -> String {
    if path.is_empty() {
        return normalize(if root.is_empty() { "." } else { root });
    }
    if is_absolute(path) {
        return normalize(path);
    }
    let root = if root.is_empty() { "." } else { root };
    normalize(&format!("{}/{}", root.trim_end_matches(['/', '\\']), path))
}

/// Directory part of a path, with the same conventions as POSIX `dirname`
///
/// `a.css` gives `.`, `/a.css` gives `/`, `src/a.css` gives `src`.
pub fn dirname(path: &str) -> String {
    let (root, rest) = split_root(path);
    let rest = rest.trim_end_matches(['/', '\\']);
    match rest.rfind(['/', '\\']) {
        Some(idx) => root + rest[..idx].trim_end_matches(['/', '\\']),
        None if root.is_empty() => ".".to_string(),
        None => root,
    }
}
