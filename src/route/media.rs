use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::RouterError;

/// A `type/subtype` media type as declared on a route or sent by a client.
///
/// Parameters (`; charset=utf-8`, `; q=0.8`) are dropped on parse; both parts are
/// lower-cased. `*` in either part is a wildcard.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct MediaType {
    kind: String,
    subtype: String,
}

impl MediaType {
    /// `*/*`
    #[must_use]
    pub fn any() -> Self {
        Self {
            kind: "*".to_string(),
            subtype: "*".to_string(),
        }
    }

    #[must_use]
    pub fn kind(&self) -> &str {
        &self.kind
    }

    #[must_use]
    pub fn subtype(&self) -> &str {
        &self.subtype
    }

    #[must_use]
    pub fn has_wildcard(&self) -> bool {
        self.kind == "*" || self.subtype == "*"
    }

    /// Whether `other` falls within the range described by `self`.
    ///
    /// `text/*` includes `text/plain`; `text/plain` does not include `text/*`.
    #[must_use]
    pub fn includes(&self, other: &MediaType) -> bool {
        if self.kind == "*" {
            return true;
        }
        if self.kind != other.kind {
            return false;
        }
        self.subtype == "*" || self.subtype == other.subtype
    }

    /// Parse a comma separated header value such as an `Accept` header.
    ///
    /// Entries that fail to parse are skipped.
    #[must_use]
    pub fn parse_list(header: &str) -> Vec<MediaType> {
        header
            .split(',')
            .filter_map(|entry| entry.parse::<MediaType>().ok())
            .collect()
    }
}

impl FromStr for MediaType {
    type Err = RouterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let essence = s.split(';').next().unwrap_or("").trim();
        let (kind, subtype) = essence
            .split_once('/')
            .ok_or_else(|| RouterError::InvalidArgument(format!("invalid media type '{s}'")))?;
        let kind = kind.trim();
        let subtype = subtype.trim();
        if kind.is_empty() || subtype.is_empty() || subtype.contains('/') {
            return Err(RouterError::InvalidArgument(format!(
                "invalid media type '{s}'"
            )));
        }
        if kind == "*" && subtype != "*" {
            return Err(RouterError::InvalidArgument(format!(
                "invalid media type '{s}': wildcard type requires wildcard subtype"
            )));
        }
        Ok(Self {
            kind: kind.to_ascii_lowercase(),
            subtype: subtype.to_ascii_lowercase(),
        })
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.kind, self.subtype)
    }
}

impl Serialize for MediaType {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for MediaType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse::<MediaType>().map_err(serde::de::Error::custom)
    }
}

/// True when both sets are non-empty and share no type in either direction.
pub(crate) fn disjoint(a: &[MediaType], b: &[MediaType]) -> bool {
    if a.is_empty() || b.is_empty() {
        return false;
    }
    !a.iter().any(|x| b.iter().any(|y| x.includes(y) || y.includes(x)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mt(s: &str) -> MediaType {
        s.parse().unwrap()
    }

    #[test]
    fn parse_drops_parameters_and_lowercases() {
        let parsed = mt("Application/JSON; charset=UTF-8");
        assert_eq!(parsed.kind(), "application");
        assert_eq!(parsed.subtype(), "json");
        assert_eq!(parsed.to_string(), "application/json");
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("json".parse::<MediaType>().is_err());
        assert!("text/".parse::<MediaType>().is_err());
        assert!("*/plain".parse::<MediaType>().is_err());
    }

    #[test]
    fn wildcard_inclusion() {
        assert!(mt("text/*").includes(&mt("text/plain")));
        assert!(!mt("text/plain").includes(&mt("text/*")));
        assert!(MediaType::any().includes(&mt("image/png")));
        assert!(!mt("text/*").includes(&mt("image/png")));
    }

    #[test]
    fn accept_header_list() {
        let list = MediaType::parse_list("text/html, application/xhtml+xml;q=0.9, bogus");
        assert_eq!(list, vec![mt("text/html"), mt("application/xhtml+xml")]);
    }

    #[test]
    fn disjoint_sets() {
        assert!(!disjoint(&[], &[mt("text/plain")]));
        assert!(disjoint(&[mt("text/plain")], &[mt("application/json")]));
        assert!(!disjoint(&[mt("text/*")], &[mt("text/plain")]));
    }
}
