//! Canonical request representation.

use bytes::Bytes;
use std::collections::HashMap;

/// The single framework-facing request shape every trigger kind
/// normalizes into. Fully framework- and trigger-agnostic: no wire
/// field names survive normalization.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CanonicalRequest {
    /// Uppercase HTTP verb.
    pub method: String,
    /// URL path with the stage prefix already stripped or retained per
    /// the trigger kind's rule.
    pub path: String,
    /// Raw query string, no leading `?`. Empty when absent.
    pub query: String,
    /// Lower-cased header names to single folded values. Multi-value
    /// request headers are already joined with `", "`; the `cookie`
    /// header is already assembled.
    pub headers: HashMap<String, String>,
    /// Raw cookie strings (`name=value`), in wire order.
    pub cookies: Vec<String>,
    /// Request body, base64-decoded if the event declared it encoded.
    pub body: Bytes,
    pub remote: RemoteMeta,
}

/// Connection metadata carried through for framework environment
/// population.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RemoteMeta {
    pub source_ip: Option<String>,
    pub protocol: Option<String>,
}

/// Opaque invocation metadata handed to the framework via request
/// extensions. The bridge passes it through without interpreting it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvocationContext {
    pub request_id: Option<String>,
    pub deadline_ms: Option<u64>,
}
