//! Fixed request headers sent with every call.
//!
//! `HeaderSet` is immutable once built. Overriding the API key produces a new
//! set, so a per-invocation `--apiKey` never leaks into the configured base.

use std::slice;

pub const CONTENT_TYPE: &str = "Content-Type";
pub const API_KEY: &str = "X-API-Key";
pub const CLIENT_NAME: &str = "ps_client_name";
pub const CLIENT_VERSION: &str = "ps_client_version";

const CLIENT_NAME_VALUE: &str = "gradient-cli";

/// Ordered list of `(name, value)` header pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HeaderSet {
    entries: Vec<(String, String)>,
}

impl HeaderSet {
    /// The default header set carrying `api_key`.
    pub fn new(api_key: &str) -> Self {
        Self {
            entries: vec![
                (CONTENT_TYPE.to_string(), "application/json".to_string()),
                (API_KEY.to_string(), api_key.to_string()),
                (CLIENT_NAME.to_string(), CLIENT_NAME_VALUE.to_string()),
                (
                    CLIENT_VERSION.to_string(),
                    env!("CARGO_PKG_VERSION").to_string(),
                ),
            ],
        }
    }

    /// Returns a copy of this set with the API key replaced.
    pub fn with_api_key(&self, api_key: &str) -> Self {
        self.with_header(API_KEY, api_key)
    }

    /// Returns a copy with `name` set to `value`, replacing any existing
    /// entry case-insensitively and appending otherwise.
    pub fn with_header(&self, name: &str, value: &str) -> Self {
        let mut entries = self.entries.clone();
        match entries
            .iter_mut()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
        {
            Some(entry) => entry.1 = value.to_string(),
            None => entries.push((name.to_string(), value.to_string())),
        }
        Self { entries }
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(existing, _)| existing.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn api_key(&self) -> Option<&str> {
        self.get(API_KEY)
    }

    pub fn iter(&self) -> slice::Iter<'_, (String, String)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'a> IntoIterator for &'a HeaderSet {
    type Item = &'a (String, String);
    type IntoIter = slice::Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
