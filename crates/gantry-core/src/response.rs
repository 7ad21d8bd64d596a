//! Framework result and wire response types.

use bytes::Bytes;
use serde::Serialize;
use std::collections::HashMap;

/// Ordered, case-preserving header multimap.
///
/// The framework hands back headers with the casing it chose
/// (`Content-Type`, `Set-Cookie`) and may repeat a name; the wire
/// response must reproduce both, so this keeps every entry in append
/// order and looks names up case-insensitively.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HeaderBag {
    entries: Vec<(String, String)>,
}

impl HeaderBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.entries.push((name.into(), value.into()));
    }

    /// Last value for a name, case-insensitive.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .rev()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// All values for a name, in append order.
    pub fn get_all(&self, name: &str) -> Vec<&str> {
        self.entries
            .iter()
            .filter(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Remove every entry for a name, returning the values in order.
    pub fn remove(&mut self, name: &str) -> Vec<String> {
        let mut removed = Vec::new();
        self.entries.retain(|(n, v)| {
            if n.eq_ignore_ascii_case(name) {
                removed.push(v.clone());
                false
            } else {
                true
            }
        });
        removed
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|(n, _)| n.eq_ignore_ascii_case(name))
    }

    /// Distinct names in first-seen order, with first-seen casing.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = Vec::new();
        for (n, _) in &self.entries {
            if !names.iter().any(|seen| seen.eq_ignore_ascii_case(n)) {
                names.push(n.as_str());
            }
        }
        names
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<N: Into<String>, V: Into<String>> FromIterator<(N, V)> for HeaderBag {
    fn from_iter<T: IntoIterator<Item = (N, V)>>(iter: T) -> Self {
        let mut bag = HeaderBag::new();
        for (n, v) in iter {
            bag.append(n, v);
        }
        bag
    }
}

/// The status/headers/body triple captured from the embedded framework.
/// `Set-Cookie` is the one header name expected to repeat.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrameworkResult {
    pub status: u16,
    pub headers: HeaderBag,
    pub body: Bytes,
}

impl FrameworkResult {
    pub fn new(status: u16) -> Self {
        Self { status, ..Self::default() }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }
}

/// Trigger-specific wire response.
///
/// `multiValueHeaders` is emitted only for the v1 and REST gateway
/// kinds, `cookies` only for the v2 gateway; the serializer drops the
/// fields entirely otherwise.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EncodedResponse {
    pub status_code: u16,
    pub headers: HashMap<String, String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cookies: Option<Vec<String>>,
    pub body: String,
    pub is_base64_encoded: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bag_keeps_append_order_and_case() {
        let mut bag = HeaderBag::new();
        bag.append("Set-Cookie", "a=1");
        bag.append("Content-Type", "text/html");
        bag.append("Set-Cookie", "b=2");

        assert_eq!(bag.get_all("set-cookie"), vec!["a=1", "b=2"]);
        assert_eq!(bag.names(), vec!["Set-Cookie", "Content-Type"]);
        assert_eq!(bag.len(), 3);
    }

    #[test]
    fn bag_get_returns_last_value() {
        let bag: HeaderBag = [("X-Id", "first"), ("x-id", "second")].into_iter().collect();
        assert_eq!(bag.get("X-ID"), Some("second"));
    }

    #[test]
    fn bag_remove_is_case_insensitive() {
        let mut bag: HeaderBag = [("Set-Cookie", "a=1"), ("SET-COOKIE", "b=2"), ("X-Other", "v")]
            .into_iter()
            .collect();
        let removed = bag.remove("set-cookie");
        assert_eq!(removed, vec!["a=1".to_string(), "b=2".to_string()]);
        assert!(!bag.contains("Set-Cookie"));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn optional_wire_fields_are_omitted() {
        let resp = EncodedResponse {
            status_code: 200,
            headers: HashMap::new(),
            multi_value_headers: None,
            cookies: None,
            body: "ok".to_string(),
            is_base64_encoded: false,
        };
        let json = serde_json::to_value(&resp).unwrap();
        assert!(json.get("multiValueHeaders").is_none());
        assert!(json.get("cookies").is_none());
        assert_eq!(json["statusCode"], 200);
        assert_eq!(json["isBase64Encoded"], false);
    }
}
