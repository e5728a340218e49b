//! Static file lookup for the site directory.

use std::path::{Component, Path, PathBuf};

/// Map a request URL to a file under `root`.
///
/// `/` and directory paths resolve to their `index.html`. Query strings and
/// fragments are ignored. Paths that would leave `root` resolve to nothing.
pub fn resolve(root: &Path, url: &str) -> Option<PathBuf> {
    let path = url.split(['?', '#']).next().unwrap_or_default();
    let relative = Path::new(path.trim_start_matches('/'));
    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
    {
        return None;
    }

    let mut candidate = root.join(relative);
    if candidate.is_dir() {
        candidate.push("index.html");
    }
    candidate.is_file().then_some(candidate)
}

/// Content type for a file.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("js") => "application/javascript",
        Some("wasm") => "application/wasm",
        Some("css") => "text/css",
        Some("json") => "application/json",
        Some("svg") => "image/svg+xml",
        Some("png") => "image/png",
        Some("jpg" | "jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("txt") => "text/plain; charset=utf-8",
        Some("xml") => "application/xml",
        _ => "application/octet-stream",
    }
}

/// Cache-Control header for a file.
pub fn cache_control(path: &Path) -> &'static str {
    match path.extension().and_then(|e| e.to_str()) {
        Some("wasm") => "public, max-age=31536000, immutable",
        Some("css" | "js" | "woff" | "woff2" | "ttf") => "public, max-age=604800",
        Some("png" | "jpg" | "jpeg" | "gif" | "webp" | "svg" | "ico") => "public, max-age=86400",
        // Newsletter fragments and pages change with each issue
        Some("html") => "no-cache, must-revalidate",
        _ => "public, max-age=3600",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("index.html"), "<h1>Home</h1>").expect("write");
        fs::create_dir(dir.path().join("newsletters")).expect("mkdir");
        fs::write(dir.path().join("newsletters/issue-1.html"), "<h2>Issue 1</h2>").expect("write");
        fs::write(dir.path().join("newsletters/index.html"), "<ul></ul>").expect("write");
        dir
    }

    #[test]
    fn test_root_maps_to_index() {
        let dir = site();
        assert_eq!(resolve(dir.path(), "/"), Some(dir.path().join("index.html")));
    }

    #[test]
    fn test_nested_file() {
        let dir = site();
        assert_eq!(
            resolve(dir.path(), "/newsletters/issue-1.html"),
            Some(dir.path().join("newsletters/issue-1.html"))
        );
    }

    #[test]
    fn test_directory_maps_to_its_index() {
        let dir = site();
        assert_eq!(
            resolve(dir.path(), "/newsletters/"),
            Some(dir.path().join("newsletters/index.html"))
        );
    }

    #[test]
    fn test_query_string_ignored() {
        let dir = site();
        assert_eq!(
            resolve(dir.path(), "/index.html?v=3#top"),
            Some(dir.path().join("index.html"))
        );
    }

    #[test]
    fn test_missing_file() {
        let dir = site();
        assert_eq!(resolve(dir.path(), "/nope.html"), None);
    }

    #[test]
    fn test_parent_traversal_rejected() {
        let dir = site();
        let outside = dir.path().parent().expect("parent");
        fs::write(outside.join("sendoff-secret.txt"), "x").ok();
        assert_eq!(resolve(dir.path(), "/../sendoff-secret.txt"), None);
        assert_eq!(resolve(dir.path(), "/newsletters/../../sendoff-secret.txt"), None);
        assert_eq!(resolve(dir.path(), "/newsletters/../index.html"), None);
    }

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("a.html")), "text/html; charset=utf-8");
        assert_eq!(content_type(Path::new("a.wasm")), "application/wasm");
        assert_eq!(content_type(Path::new("a.js")), "application/javascript");
        assert_eq!(content_type(Path::new("a")), "application/octet-stream");
    }

    #[test]
    fn test_cache_control() {
        assert_eq!(cache_control(Path::new("a.html")), "no-cache, must-revalidate");
        assert_eq!(
            cache_control(Path::new("app_bg.wasm")),
            "public, max-age=31536000, immutable"
        );
        assert_eq!(cache_control(Path::new("logo.png")), "public, max-age=86400");
        assert_eq!(cache_control(Path::new("feed")), "public, max-age=3600");
    }
}
