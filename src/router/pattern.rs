//! Pattern compiler: turns a URI template into an anchored regex.
//!
//! Template syntax, one construct per `/`-separated segment:
//!
//! | Segment          | Regex group        | Matches                              |
//! |------------------|--------------------|--------------------------------------|
//! | `users`          | `users` (escaped)  | the literal text, case-sensitive     |
//! | `{id}`           | `([^/]+)`          | one non-empty segment                |
//! | `{id<[0-9]+>}`   | `((?:[0-9]+))`     | whatever the constraint matches      |
//! | `{path*}`        | `(.+)`             | the rest of the path, slashes too    |
//!
//! `{path+}` is accepted as a synonym of `{path*}`. Trailing slashes are kept:
//! `/foo` and `/foo/` compile to different patterns.

use regex::Regex;
use std::sync::Arc;

use super::core::ParamVec;
use crate::error::RouterError;

const SEGMENT_GROUP: &str = "([^/]+)";
const GREEDY_GROUP: &str = "(.+)";

/// One placeholder of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderSpec {
    name: Arc<str>,
    constraint: Option<String>,
    greedy: bool,
    group: usize,
}

impl PlaceholderSpec {
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The user supplied regex of a `{name<regex>}` placeholder.
    #[must_use]
    pub fn constraint(&self) -> Option<&str> {
        self.constraint.as_deref()
    }

    /// True for `{name*}` / `{name+}`.
    #[must_use]
    pub fn is_greedy(&self) -> bool {
        self.greedy
    }
}

/// A segment of a compiled template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text (may be empty for `/` or a trailing slash)
    Literal(String),
    /// Index into the pattern's placeholder list
    Placeholder(usize),
}

/// The matchable form of a URI template.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    regex: Regex,
    segments: Vec<Segment>,
    placeholders: Vec<PlaceholderSpec>,
    literal_segments: usize,
}

impl CompiledPattern {
    /// Compile `template`.
    ///
    /// # Errors
    ///
    /// [`RouterError::InvalidRouteTemplate`] when the template does not start with
    /// `/`, a placeholder is malformed or does not span a whole segment, a name
    /// is reused, a greedy placeholder is not last, or a constraint does not compile.
    pub fn compile(template: &str) -> Result<Self, RouterError> {
        let body = template
            .strip_prefix('/')
            .ok_or_else(|| RouterError::invalid_template(template, "must start with '/'"))?;

        let mut segments = Vec::new();
        let mut placeholders: Vec<PlaceholderSpec> = Vec::new();
        let mut pattern = String::with_capacity(template.len() * 2 + 2);
        pattern.push('^');
        let mut next_group = 1usize;
        let mut pos = 0usize;

        loop {
            if let Some(greedy) = placeholders.last().filter(|p| p.greedy) {
                return Err(RouterError::invalid_template(
                    template,
                    format!("greedy placeholder '{}' must be the last segment", greedy.name),
                ));
            }
            pattern.push('/');

            let end = if body[pos..].starts_with('{') {
                let (spec, end) = parse_placeholder(template, body, pos, next_group)?;
                if end < body.len() && !body[end..].starts_with('/') {
                    return Err(RouterError::invalid_template(
                        template,
                        format!("placeholder '{}' must span a whole segment", spec.name),
                    ));
                }
                if placeholders.iter().any(|p| p.name == spec.name) {
                    return Err(RouterError::invalid_template(
                        template,
                        format!("duplicate placeholder '{}'", spec.name),
                    ));
                }
                match (&spec.constraint, spec.greedy) {
                    (Some(constraint), _) => {
                        pattern.push_str("((?:");
                        pattern.push_str(constraint);
                        pattern.push_str("))");
                        next_group += 1 + inner_groups(template, constraint)?;
                    }
                    (None, true) => {
                        pattern.push_str(GREEDY_GROUP);
                        next_group += 1;
                    }
                    (None, false) => {
                        pattern.push_str(SEGMENT_GROUP);
                        next_group += 1;
                    }
                }
                segments.push(Segment::Placeholder(placeholders.len()));
                placeholders.push(spec);
                end
            } else {
                let end = body[pos..].find('/').map_or(body.len(), |i| pos + i);
                let literal = &body[pos..end];
                if literal.contains(['{', '}']) {
                    return Err(RouterError::invalid_template(
                        template,
                        format!("segment '{literal}' mixes literal text and a placeholder"),
                    ));
                }
                pattern.push_str(&regex::escape(literal));
                segments.push(Segment::Literal(literal.to_string()));
                end
            };

            if end >= body.len() {
                break;
            }
            pos = end + 1;
        }
        pattern.push('$');

        let regex = Regex::new(&pattern)
            .map_err(|e| RouterError::invalid_template(template, e.to_string()))?;
        let literal_segments = segments
            .iter()
            .filter(|s| matches!(s, Segment::Literal(_)))
            .count();

        Ok(Self {
            regex,
            segments,
            placeholders,
            literal_segments,
        })
    }

    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    #[must_use]
    pub fn placeholders(&self) -> &[PlaceholderSpec] {
        &self.placeholders
    }

    /// Placeholder names in declaration order.
    pub fn placeholder_names(&self) -> impl Iterator<Item = &str> {
        self.placeholders.iter().map(PlaceholderSpec::name)
    }

    /// Number of literal (non-placeholder) segments, the primary precedence input.
    #[must_use]
    pub fn literal_segments(&self) -> usize {
        self.literal_segments
    }

    #[must_use]
    pub fn is_match(&self, path: &str) -> bool {
        self.regex.is_match(path)
    }

    /// Match `path` and return the percent-decoded placeholder values.
    #[must_use]
    pub fn extract(&self, path: &str) -> Option<ParamVec> {
        let caps = self.regex.captures(path)?;
        let mut params = ParamVec::new();
        for spec in &self.placeholders {
            let raw = caps.get(spec.group).map_or("", |m| m.as_str());
            let value = match urlencoding::decode(raw) {
                Ok(decoded) => decoded.into_owned(),
                Err(_) => raw.to_string(),
            };
            params.push((Arc::clone(&spec.name), value));
        }
        Some(params)
    }
}

/// Parse the placeholder starting at `body[pos] == '{'`.
///
/// Returns the placeholder and the byte offset just past the closing `}`.
fn parse_placeholder(
    template: &str,
    body: &str,
    pos: usize,
    group: usize,
) -> Result<(PlaceholderSpec, usize), RouterError> {
    let rest = &body[pos + 1..];
    let stop = rest
        .find(['}', '<', '*', '+'])
        .ok_or_else(|| RouterError::invalid_template(template, "unterminated placeholder"))?;
    let name = &rest[..stop];
    validate_name(template, name)?;

    let (constraint, greedy, consumed) = match rest.as_bytes()[stop] {
        b'}' => (None, false, stop + 1),
        b'<' => {
            let inner = &rest[stop + 1..];
            let close = inner.find(">}").ok_or_else(|| {
                RouterError::invalid_template(
                    template,
                    format!("constraint of placeholder '{name}' is not closed with '>}}'"),
                )
            })?;
            let constraint = &inner[..close];
            if constraint.is_empty() {
                return Err(RouterError::invalid_template(
                    template,
                    format!("placeholder '{name}' has an empty constraint"),
                ));
            }
            (Some(constraint.to_string()), false, stop + 1 + close + 2)
        }
        _ => {
            if !rest[stop + 1..].starts_with('}') {
                return Err(RouterError::invalid_template(
                    template,
                    format!("greedy placeholder '{name}' must end with '}}'"),
                ));
            }
            (None, true, stop + 2)
        }
    };

    let spec = PlaceholderSpec {
        name: Arc::from(name),
        constraint,
        greedy,
        group,
    };
    Ok((spec, pos + 1 + consumed))
}

fn validate_name(template: &str, name: &str) -> Result<(), RouterError> {
    if name.is_empty() {
        return Err(RouterError::invalid_template(template, "placeholder without a name"));
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    {
        return Err(RouterError::invalid_template(
            template,
            format!("invalid placeholder name '{name}'"),
        ));
    }
    Ok(())
}

/// Compile a constraint on its own and report how many capture groups it adds.
fn inner_groups(template: &str, constraint: &str) -> Result<usize, RouterError> {
    let re = Regex::new(&format!("(?:{constraint})")).map_err(|e| {
        RouterError::invalid_template(template, format!("invalid constraint '{constraint}': {e}"))
    })?;
    Ok(re.captures_len() - 1)
}
