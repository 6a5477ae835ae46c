//! Segment-aware path ordering.
//!
//! Paths are compared one `/`-separated segment at a time. Literal segments
//! compare lexically and sort before placeholders, which sort before greedy
//! placeholders; a path that is a proper prefix of another sorts first. Empty
//! segments are kept, so `/foo` and `/foo/` are distinct and `/foo` comes first:
//!
//! ```
//! use routekit::router::compare_paths;
//!
//! let mut paths = vec!["/fooa", "/foo/bar", "/foo/", "/", "/foo"];
//! paths.sort_by(|a, b| compare_paths(a, b));
//! assert_eq!(paths, ["/", "/foo", "/foo/", "/foo/bar", "/fooa"]);
//! ```

use std::cmp::Ordering;

use super::core::CompiledRoute;
use super::pattern::{CompiledPattern, Segment};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
enum SegmentKey<'a> {
    Literal(&'a str),
    Placeholder,
    Greedy,
}

fn classify(segment: &str) -> SegmentKey<'_> {
    if segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}') {
        if segment.ends_with("*}") || segment.ends_with("+}") {
            SegmentKey::Greedy
        } else {
            SegmentKey::Placeholder
        }
    } else {
        SegmentKey::Literal(segment)
    }
}

fn raw_keys(path: &str) -> impl Iterator<Item = SegmentKey<'_>> {
    path.strip_prefix('/').unwrap_or(path).split('/').map(classify)
}

fn pattern_keys(pattern: &CompiledPattern) -> impl Iterator<Item = SegmentKey<'_>> {
    pattern.segments().iter().map(move |segment| match segment {
        Segment::Literal(text) => SegmentKey::Literal(text.as_str()),
        Segment::Placeholder(idx) => {
            if pattern.placeholders()[*idx].is_greedy() {
                SegmentKey::Greedy
            } else {
                SegmentKey::Placeholder
            }
        }
    })
}

/// Compare two raw paths or URI templates.
#[must_use]
pub fn compare_paths(a: &str, b: &str) -> Ordering {
    raw_keys(a).cmp(raw_keys(b))
}

/// Compare two compiled patterns.
///
/// Unlike [`compare_paths`] this uses the compiled segments, so constraints
/// containing `/` do not confuse the ordering.
#[must_use]
pub fn compare_patterns(a: &CompiledPattern, b: &CompiledPattern) -> Ordering {
    pattern_keys(a).cmp(pattern_keys(b))
}

/// Listing order for registered routes: path order, then method, then
/// registration order.
#[must_use]
pub fn compare_routes(a: &CompiledRoute, b: &CompiledRoute) -> Ordering {
    compare_patterns(a.pattern(), b.pattern())
        .then_with(|| a.method().as_str().cmp(b.method().as_str()))
        .then_with(|| a.id().cmp(&b.id()))
}
