use std::collections::BTreeMap;
use std::fmt;

use crate::error::{ProviderError, ProviderResult};

/// Backing store selected by the first path segment of a URI.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Area {
    Files,
    Cache,
    Root,
    Blob,
}

impl Area {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Files => "files",
            Self::Cache => "cache",
            Self::Root => "root",
            Self::Blob => "blob",
        }
    }

    fn from_segment(s: &str) -> Option<Self> {
        match s {
            "files" => Some(Self::Files),
            "cache" => Some(Self::Cache),
            "root" => Some(Self::Root),
            "blob" => Some(Self::Blob),
            _ => None,
        }
    }
}

impl fmt::Display for Area {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A parsed `scheme://authority/<area>/<rest>?<query>` identifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResourceUri {
    pub scheme: String,
    pub authority: String,
    pub area: Area,
    /// Percent-decoded remainder after the area segment, without a leading `/`.
    pub rest: String,
    pub query: BTreeMap<String, String>,
}

impl ResourceUri {
    /// Parse a resource URI.
    ///
    /// A string without `scheme://` is malformed. A well-formed URI whose
    /// first segment is not a known area fails with
    /// [`ProviderError::NotFound`].
    pub fn parse(input: &str) -> ProviderResult<Self> {
        let malformed = || ProviderError::InvalidUri(input.to_string());

        let (scheme, after) = input.split_once("://").ok_or_else(malformed)?;
        if scheme.is_empty() {
            return Err(malformed());
        }
        let (before_query, raw_query) = match after.split_once('?') {
            Some((p, q)) => (p, Some(q)),
            None => (after, None),
        };
        let (authority, path) = before_query.split_once('/').unwrap_or((before_query, ""));
        let (segment, rest) = path.split_once('/').unwrap_or((path, ""));

        let area = Area::from_segment(segment)
            .ok_or_else(|| ProviderError::NotFound(format!("no route for {input}")))?;

        let mut query = BTreeMap::new();
        for pair in raw_query.unwrap_or("").split('&').filter(|p| !p.is_empty()) {
            let (k, v) = pair.split_once('=').unwrap_or((pair, ""));
            query.insert(
                decode(k).ok_or_else(malformed)?,
                decode(v).ok_or_else(malformed)?,
            );
        }

        Ok(Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            area,
            rest: decode(rest).ok_or_else(malformed)?,
            query,
        })
    }

    pub fn new(scheme: &str, authority: &str, area: Area, rest: &str) -> Self {
        Self {
            scheme: scheme.to_string(),
            authority: authority.to_string(),
            area,
            rest: rest.trim_start_matches('/').to_string(),
            query: BTreeMap::new(),
        }
    }

    pub fn with_query(mut self, key: &str, value: &str) -> Self {
        self.query.insert(key.to_string(), value.to_string());
        self
    }

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query.get(key).map(String::as_str)
    }
}

impl fmt::Display for ResourceUri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}://{}/{}/{}",
            self.scheme,
            self.authority,
            self.area,
            encode_path(&self.rest)
        )?;
        let mut sep = '?';
        for (k, v) in &self.query {
            write!(f, "{sep}{}={}", urlencoding::encode(k), encode_path(v))?;
            sep = '&';
        }
        Ok(())
    }
}

/// Percent-encode each `/`-separated segment, keeping the separators.
fn encode_path(s: &str) -> String {
    s.split('/')
        .map(urlencoding::encode)
        .collect::<Vec<_>>()
        .join("/")
}

/// `None` when the escapes decode to invalid UTF-8.
fn decode(s: &str) -> Option<String> {
    urlencoding::decode(s).ok().map(|d| d.into_owned())
}
