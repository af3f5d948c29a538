//! Content URIs - addressing for the tea collection and single teas
//!
//! Format: `<scheme>://<authority>/teas[/<id>]`
//!
//! Examples:
//! - `content://com.example.android.teainventory/teas`
//! - `content://com.example.android.teainventory/teas/7`

use crate::contract::{self, DIR_BASE_TYPE, ITEM_BASE_TYPE, PATH_TEAS};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A parsed content address.
///
/// Parsing only checks the overall shape; whether the address names
/// something in the store is decided by [`TeaUris::classify`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContentUri {
    pub scheme: String,
    pub authority: String,
    /// Path segments after the authority, in order
    pub segments: Vec<String>,
}

impl ContentUri {
    pub fn new(scheme: impl Into<String>, authority: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
            segments: Vec::new(),
        }
    }

    /// Parse a URI string into a ContentUri
    ///
    /// Expected format: `<scheme>://<authority>[/<segment>...]`
    pub fn parse(uri: &str) -> Result<Self> {
        let (scheme, rest) = uri
            .split_once("://")
            .ok_or_else(|| Error::InvalidUri(format!("{} (missing scheme)", uri)))?;

        if scheme.is_empty() {
            return Err(Error::InvalidUri(format!("{} (empty scheme)", uri)));
        }
        if rest.contains(['?', '#']) {
            return Err(Error::InvalidUri(format!("{} (query and fragment not supported)", uri)));
        }

        let (authority, path) = match rest.split_once('/') {
            Some((authority, path)) => (authority, Some(path)),
            None => (rest, None),
        };

        if authority.is_empty() {
            return Err(Error::InvalidUri(format!("{} (empty authority)", uri)));
        }

        let segments = path
            .map(|p| p.split('/').map(str::to_string).collect())
            .unwrap_or_default();

        Ok(Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            segments,
        })
    }

    /// Append a path segment
    pub fn with_appended_path(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Append a numeric id as the last path segment
    pub fn with_appended_id(self, id: i64) -> Self {
        self.with_appended_path(id.to_string())
    }

    /// Convert to URI string
    pub fn to_uri_string(&self) -> String {
        let mut out = format!("{}://{}", self.scheme, self.authority);
        for segment in &self.segments {
            out.push('/');
            out.push_str(segment);
        }
        out
    }
}

impl fmt::Display for ContentUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_uri_string())
    }
}

impl FromStr for ContentUri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ContentUri {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_uri_string())
    }
}

impl<'de> Deserialize<'de> for ContentUri {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        ContentUri::parse(&s).map_err(serde::de::Error::custom)
    }
}

/// Result of matching an address against the tea addressing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UriMatch {
    /// All teas
    Collection,
    /// The tea with this id
    Item(i64),
    Unrecognized,
}

/// Content type of an address: a set of rows or a single row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    Directory,
    Item,
}

/// The addressing table for one authority.
///
/// Built once and handed to whoever needs to build or classify
/// addresses; there is no process-wide matcher.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeaUris {
    scheme: String,
    authority: String,
}

impl Default for TeaUris {
    fn default() -> Self {
        Self::new(contract::CONTENT_AUTHORITY)
    }
}

impl TeaUris {
    pub fn new(authority: impl Into<String>) -> Self {
        Self::with_scheme(contract::CONTENT_SCHEME, authority)
    }

    pub fn with_scheme(scheme: impl Into<String>, authority: impl Into<String>) -> Self {
        Self {
            scheme: scheme.into(),
            authority: authority.into(),
        }
    }

    pub fn authority(&self) -> &str {
        &self.authority
    }

    /// `<scheme>://<authority>`
    pub fn base_uri(&self) -> ContentUri {
        ContentUri::new(self.scheme.clone(), self.authority.clone())
    }

    /// Address of the whole tea collection
    pub fn collection_uri(&self) -> ContentUri {
        self.base_uri().with_appended_path(PATH_TEAS)
    }

    /// Address of a single tea
    pub fn item_uri(&self, id: i64) -> ContentUri {
        self.collection_uri().with_appended_id(id)
    }

    /// Classify an address as the collection, a single tea, or neither.
    pub fn classify(&self, uri: &ContentUri) -> UriMatch {
        if uri.scheme != self.scheme || uri.authority != self.authority {
            return UriMatch::Unrecognized;
        }

        match uri.segments.as_slice() {
            [path] if path == PATH_TEAS => UriMatch::Collection,
            [path, id] if path == PATH_TEAS => parse_id(id)
                .map(UriMatch::Item)
                .unwrap_or(UriMatch::Unrecognized),
            _ => UriMatch::Unrecognized,
        }
    }

    /// Classify a raw address string; unparseable strings are Unrecognized.
    pub fn classify_str(&self, uri: &str) -> UriMatch {
        ContentUri::parse(uri)
            .map(|parsed| self.classify(&parsed))
            .unwrap_or(UriMatch::Unrecognized)
    }

    /// Resource kind of an address, or `InvalidUri` when it is not recognized
    pub fn resource_kind(&self, uri: &ContentUri) -> Result<ResourceKind> {
        match self.classify(uri) {
            UriMatch::Collection => Ok(ResourceKind::Directory),
            UriMatch::Item(_) => Ok(ResourceKind::Item),
            UriMatch::Unrecognized => Err(Error::InvalidUri(uri.to_uri_string())),
        }
    }

    /// MIME-style content type for a resource kind, e.g.
    /// `vnd.android.cursor.dir/com.example.android.teainventory/teas`
    pub fn mime_type(&self, kind: ResourceKind) -> String {
        let base = match kind {
            ResourceKind::Directory => DIR_BASE_TYPE,
            ResourceKind::Item => ITEM_BASE_TYPE,
        };
        format!("{}/{}/{}", base, self.authority, PATH_TEAS)
    }
}

/// Only plain ASCII digits are ids; signs and whitespace are rejected.
fn parse_id(segment: &str) -> Option<i64> {
    if segment.is_empty() || !segment.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    segment.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = "content://com.example.android.teainventory";

    #[test]
    fn test_uri_roundtrip() {
        let uris = TeaUris::default();
        let uri = uris.item_uri(42);
        assert_eq!(uri.to_uri_string(), format!("{}/teas/42", BASE));

        let parsed = ContentUri::parse(&uri.to_uri_string()).unwrap();
        assert_eq!(parsed, uri);
    }

    #[test]
    fn test_classify() {
        let uris = TeaUris::default();
        assert_eq!(uris.classify_str(&format!("{}/teas", BASE)), UriMatch::Collection);
        assert_eq!(uris.classify_str(&format!("{}/teas/7", BASE)), UriMatch::Item(7));
        assert_eq!(uris.classify_str(&format!("{}/teas/0", BASE)), UriMatch::Item(0));
        assert_eq!(uris.classify_str(&format!("{}/other", BASE)), UriMatch::Unrecognized);
    }

    #[test]
    fn test_classify_rejects_malformed() {
        let uris = TeaUris::default();
        for uri in [
            BASE.to_string(),
            format!("{}/teas/", BASE),
            format!("{}/teas/-1", BASE),
            format!("{}/teas/+1", BASE),
            format!("{}/teas/abc", BASE),
            format!("{}/teas/1/2", BASE),
            format!("{}/teas/99999999999999999999", BASE),
            format!("{}/teas?x=1", BASE),
            "content://other.authority/teas".to_string(),
            "http://com.example.android.teainventory/teas".to_string(),
            "not a uri".to_string(),
        ] {
            assert_eq!(uris.classify_str(&uri), UriMatch::Unrecognized, "{}", uri);
        }
    }

    #[test]
    fn test_resource_kinds() {
        let uris = TeaUris::default();
        let dir = uris.resource_kind(&uris.collection_uri()).unwrap();
        let item = uris.resource_kind(&uris.item_uri(3)).unwrap();
        assert_eq!(dir, ResourceKind::Directory);
        assert_eq!(item, ResourceKind::Item);
        assert_eq!(
            uris.mime_type(dir),
            "vnd.android.cursor.dir/com.example.android.teainventory/teas"
        );
        assert_eq!(
            uris.mime_type(item),
            "vnd.android.cursor.item/com.example.android.teainventory/teas"
        );

        let other = uris.base_uri().with_appended_path("other");
        assert!(matches!(uris.resource_kind(&other), Err(Error::InvalidUri(_))));
    }

    #[test]
    fn test_custom_authority() {
        let uris = TeaUris::new("shop.teas");
        assert_eq!(uris.classify_str("content://shop.teas/teas/5"), UriMatch::Item(5));
        assert_eq!(uris.classify_str(&format!("{}/teas/5", BASE)), UriMatch::Unrecognized);
    }

    #[test]
    fn test_invalid_uri() {
        assert!(ContentUri::parse("invalid").is_err());
        assert!(ContentUri::parse("://authority/teas").is_err());
        assert!(ContentUri::parse("content:///teas").is_err());
    }
}
