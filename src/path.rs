/// Returns a canonical URL path, eliminating `.` and `..` elements and
/// collapsing repeated slashes.
///
/// The router matches byte-exact; adapters that want Go-style path
/// normalization should clean the request path before calling
/// [`dispatch`](crate::Router::dispatch).
///
/// The following rules are applied until no further processing is
/// possible:
///
/// 1. Replace multiple slashes with a single slash.
/// 2. Eliminate each `.` path name element.
/// 3. Eliminate each inner `..` path name element along with the
///    element that precedes it.
/// 4. Eliminate `..` elements that begin a rooted path.
///
/// If the result of this process is empty, `/` is returned.
pub fn clean_path(p: &str) -> String {
    if p.is_empty() {
        return "/".to_owned();
    }

    let mut segments: Vec<&str> = Vec::new();
    for segment in p.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            segment => segments.push(segment),
        }
    }

    if segments.is_empty() {
        return "/".to_owned();
    }

    let trailing = p.ends_with('/') || p.ends_with("/.");
    let mut out = String::with_capacity(p.len() + 1);
    for segment in &segments {
        out.push('/');
        out.push_str(segment);
    }
    if trailing {
        out.push('/');
    }
    out
}
