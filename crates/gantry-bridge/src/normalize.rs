//! Trigger event normalization.
//!
//! One pure function per trigger kind converts the raw payload into a
//! [`CanonicalRequest`]. Total over structurally valid events of the
//! declared kind: the only failure left at this point is a body that
//! lies about its base64 encoding.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use bytes::Bytes;
use gantry_core::event::{AlbEvent, HttpV1Event, HttpV2Event, RestEvent, TriggerEvent};
use gantry_core::{BridgeError, BridgeResult, CanonicalRequest, RemoteMeta};
use std::collections::{BTreeMap, HashMap};

/// Normalize a raw trigger event into the canonical request shape.
pub fn normalize(event: &TriggerEvent) -> BridgeResult<CanonicalRequest> {
    match event {
        TriggerEvent::HttpV2(e) => normalize_http_v2(e),
        TriggerEvent::HttpV1(e) => normalize_http_v1(e),
        TriggerEvent::Rest(e) => normalize_rest(e),
        TriggerEvent::Alb(e) => normalize_alb(e),
    }
}

fn normalize_http_v2(event: &HttpV2Event) -> BridgeResult<CanonicalRequest> {
    let mut headers = lowercase_headers(&event.headers);

    // The v2 gateway delivers cookies out-of-band; reassemble the header
    // the framework expects.
    let cookies = event.cookies.clone();
    if !cookies.is_empty() {
        headers.insert("cookie".to_string(), cookies.join("; "));
    }

    let stage = event.request_context.stage.as_deref();
    let http = &event.request_context.http;

    Ok(CanonicalRequest {
        method: http.method.to_uppercase(),
        path: strip_stage_prefix(&event.raw_path, stage),
        query: event.raw_query_string.clone(),
        headers,
        cookies,
        body: decode_body(event.body.as_deref(), event.is_base64_encoded)?,
        remote: RemoteMeta {
            source_ip: http.source_ip.clone(),
            protocol: http.protocol.clone(),
        },
    })
}

fn normalize_http_v1(event: &HttpV1Event) -> BridgeResult<CanonicalRequest> {
    let headers = fold_request_headers(event.headers.as_ref(), event.multi_value_headers.as_ref());
    let ctx = event.request_context.as_ref();
    let stage = ctx.and_then(|c| c.stage.as_deref());

    Ok(CanonicalRequest {
        method: event.http_method.to_uppercase(),
        path: strip_stage_prefix(&event.path, stage),
        query: build_query_string(
            event.query_string_parameters.as_ref(),
            event.multi_value_query_string_parameters.as_ref(),
        ),
        cookies: cookies_from_header(&headers),
        headers,
        body: decode_body(event.body.as_deref(), event.is_base64_encoded)?,
        remote: RemoteMeta {
            source_ip: ctx
                .and_then(|c| c.identity.as_ref())
                .and_then(|i| i.source_ip.clone()),
            protocol: ctx.and_then(|c| c.protocol.clone()),
        },
    })
}

fn normalize_rest(event: &RestEvent) -> BridgeResult<CanonicalRequest> {
    let headers = fold_request_headers(event.headers.as_ref(), event.multi_value_headers.as_ref());
    let ctx = event.request_context.as_ref();

    // The REST gateway keeps the deployment stage out of the URL path;
    // it is used verbatim.
    Ok(CanonicalRequest {
        method: event.http_method.to_uppercase(),
        path: event.path.clone(),
        query: build_query_string(
            event.query_string_parameters.as_ref(),
            event.multi_value_query_string_parameters.as_ref(),
        ),
        cookies: cookies_from_header(&headers),
        headers,
        body: decode_body(event.body.as_deref(), event.is_base64_encoded)?,
        remote: RemoteMeta {
            source_ip: ctx
                .and_then(|c| c.identity.as_ref())
                .and_then(|i| i.source_ip.clone()),
            protocol: ctx.and_then(|c| c.protocol.clone()),
        },
    })
}

fn normalize_alb(event: &AlbEvent) -> BridgeResult<CanonicalRequest> {
    let headers = fold_request_headers(event.headers.as_ref(), event.multi_value_headers.as_ref());

    Ok(CanonicalRequest {
        method: event.http_method.to_uppercase(),
        path: event.path.clone(),
        query: build_query_string(
            event.query_string_parameters.as_ref(),
            event.multi_value_query_string_parameters.as_ref(),
        ),
        cookies: cookies_from_header(&headers),
        headers,
        body: decode_body(event.body.as_deref(), event.is_base64_encoded)?,
        remote: RemoteMeta::default(),
    })
}

/// Decode the event body. Absent means empty; a declared-base64 body
/// that fails to decode is an encoding error, not a framework 500.
fn decode_body(body: Option<&str>, is_base64_encoded: bool) -> BridgeResult<Bytes> {
    match body {
        None => Ok(Bytes::new()),
        Some(text) if is_base64_encoded => STANDARD
            .decode(text)
            .map(Bytes::from)
            .map_err(|e| BridgeError::Encoding(format!("invalid base64 in event body: {e}"))),
        Some(text) => Ok(Bytes::copy_from_slice(text.as_bytes())),
    }
}

/// Remove one leading `/<stage>` segment when the event carries a real
/// deployment stage. `$default` is the stage-less HTTP gateway endpoint.
fn strip_stage_prefix(path: &str, stage: Option<&str>) -> String {
    let Some(stage) = stage.filter(|s| !s.is_empty() && *s != "$default") else {
        return path.to_string();
    };
    let prefix = format!("/{stage}");
    if path == prefix {
        return "/".to_string();
    }
    match path.strip_prefix(&prefix) {
        Some(rest) if rest.starts_with('/') => rest.to_string(),
        _ => path.to_string(),
    }
}

/// Fold the single- and multi-value request header maps into one
/// lower-cased single-value map. The multi-value map wins when both are
/// present; its values join with `", "`.
fn fold_request_headers(
    single: Option<&HashMap<String, String>>,
    multi: Option<&HashMap<String, Vec<String>>>,
) -> HashMap<String, String> {
    if let Some(multi) = multi {
        multi
            .iter()
            .map(|(name, values)| (name.to_ascii_lowercase(), values.join(", ")))
            .collect()
    } else {
        single.map(lowercase_headers).unwrap_or_default()
    }
}

fn lowercase_headers(headers: &HashMap<String, String>) -> HashMap<String, String> {
    headers
        .iter()
        .map(|(name, value)| (name.to_ascii_lowercase(), value.clone()))
        .collect()
}

/// Reassemble a raw query string from the pre-split parameter maps. The
/// front doors deliver values already percent-encoded; they are joined
/// as received. The multi-value map wins when both are present.
fn build_query_string(
    single: Option<&BTreeMap<String, String>>,
    multi: Option<&BTreeMap<String, Vec<String>>>,
) -> String {
    if let Some(multi) = multi {
        multi
            .iter()
            .flat_map(|(key, values)| values.iter().map(move |value| format!("{key}={value}")))
            .collect::<Vec<_>>()
            .join("&")
    } else if let Some(single) = single {
        single
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join("&")
    } else {
        String::new()
    }
}

/// Split the folded `cookie` header into the ordered cookie sequence.
fn cookies_from_header(headers: &HashMap<String, String>) -> Vec<String> {
    headers
        .get("cookie")
        .map(|raw| raw.split("; ").map(str::to_string).collect())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use gantry_core::TriggerKind;
    use serde_json::json;

    fn event(kind: TriggerKind, value: serde_json::Value) -> TriggerEvent {
        TriggerEvent::from_value(kind, value).unwrap()
    }

    #[test]
    fn http_v2_normalizes_path_query_and_cookies() {
        let ev = event(
            TriggerKind::HttpV2,
            json!({
                "rawPath": "/production/image",
                "rawQueryString": "size=large&size=small",
                "headers": { "Host": "api.example.com", "X-Custom": "1" },
                "cookies": ["session=abc", "theme=dark"],
                "requestContext": {
                    "stage": "production",
                    "http": { "method": "get", "sourceIp": "10.0.0.1", "protocol": "HTTP/1.1" }
                }
            }),
        );
        let req = normalize(&ev).unwrap();
        assert_eq!(req.method, "GET");
        assert_eq!(req.path, "/image");
        assert_eq!(req.query, "size=large&size=small");
        assert_eq!(req.headers["host"], "api.example.com");
        assert_eq!(req.headers["cookie"], "session=abc; theme=dark");
        assert_eq!(req.cookies, vec!["session=abc", "theme=dark"]);
        assert_eq!(req.remote.source_ip.as_deref(), Some("10.0.0.1"));
    }

    #[test]
    fn http_v2_default_stage_is_not_stripped() {
        let ev = event(
            TriggerKind::HttpV2,
            json!({
                "rawPath": "/image",
                "requestContext": { "stage": "$default", "http": { "method": "GET" } }
            }),
        );
        assert_eq!(normalize(&ev).unwrap().path, "/image");
    }

    #[test]
    fn http_v2_stage_only_path_becomes_root() {
        let ev = event(
            TriggerKind::HttpV2,
            json!({
                "rawPath": "/production",
                "requestContext": { "stage": "production", "http": { "method": "GET" } }
            }),
        );
        assert_eq!(normalize(&ev).unwrap().path, "/");
    }

    #[test]
    fn http_v1_multi_value_headers_win_and_join() {
        let ev = event(
            TriggerKind::HttpV1,
            json!({
                "path": "/",
                "httpMethod": "GET",
                "headers": { "Accept": "stale" },
                "multiValueHeaders": { "Accept": ["text/html", "application/json"] }
            }),
        );
        let req = normalize(&ev).unwrap();
        assert_eq!(req.headers["accept"], "text/html, application/json");
    }

    #[test]
    fn http_v1_strips_stage_and_rebuilds_query() {
        let ev = event(
            TriggerKind::HttpV1,
            json!({
                "path": "/production/search",
                "httpMethod": "GET",
                "multiValueQueryStringParameters": { "q": ["a"], "tag": ["x", "y"] },
                "requestContext": {
                    "stage": "production",
                    "path": "/production/search",
                    "protocol": "HTTP/1.1",
                    "identity": { "sourceIp": "192.168.0.7" }
                }
            }),
        );
        let req = normalize(&ev).unwrap();
        assert_eq!(req.path, "/search");
        assert_eq!(req.query, "q=a&tag=x&tag=y");
        assert_eq!(req.remote.source_ip.as_deref(), Some("192.168.0.7"));
        assert_eq!(req.remote.protocol.as_deref(), Some("HTTP/1.1"));
    }

    #[test]
    fn http_v1_cookies_come_from_the_cookie_header() {
        let ev = event(
            TriggerKind::HttpV1,
            json!({
                "path": "/",
                "httpMethod": "GET",
                "headers": { "Cookie": "session=abc; theme=dark" }
            }),
        );
        let req = normalize(&ev).unwrap();
        assert_eq!(req.cookies, vec!["session=abc", "theme=dark"]);
        assert_eq!(req.headers["cookie"], "session=abc; theme=dark");
    }

    #[test]
    fn rest_keeps_path_verbatim() {
        // Same stage in the context, but the REST gateway's path rule
        // leaves it untouched.
        let ev = event(
            TriggerKind::Rest,
            json!({
                "path": "/image",
                "httpMethod": "GET",
                "requestContext": { "stage": "production", "path": "/image" }
            }),
        );
        assert_eq!(normalize(&ev).unwrap().path, "/image");
    }

    #[test]
    fn alb_multi_value_mode_detected_by_field_presence() {
        let ev = event(
            TriggerKind::Alb,
            json!({
                "path": "/",
                "httpMethod": "GET",
                "multiValueHeaders": { "X-Forwarded-For": ["1.1.1.1", "2.2.2.2"] },
                "multiValueQueryStringParameters": { "a": ["1", "2"] }
            }),
        );
        let req = normalize(&ev).unwrap();
        assert_eq!(req.headers["x-forwarded-for"], "1.1.1.1, 2.2.2.2");
        assert_eq!(req.query, "a=1&a=2");
    }

    #[test]
    fn alb_single_value_mode() {
        let ev = event(
            TriggerKind::Alb,
            json!({
                "path": "/",
                "httpMethod": "GET",
                "headers": { "cookie": "session=abc" },
                "queryStringParameters": { "a": "1" }
            }),
        );
        let req = normalize(&ev).unwrap();
        assert_eq!(req.query, "a=1");
        assert_eq!(req.cookies, vec!["session=abc"]);
    }

    #[test]
    fn base64_body_is_decoded_for_every_kind() {
        let body = STANDARD.encode("name=value&submit=1");
        for (kind, value) in [
            (
                TriggerKind::HttpV2,
                json!({
                    "rawPath": "/login",
                    "body": body,
                    "isBase64Encoded": true,
                    "requestContext": { "http": { "method": "POST" } }
                }),
            ),
            (
                TriggerKind::HttpV1,
                json!({ "path": "/login", "httpMethod": "POST", "body": body, "isBase64Encoded": true }),
            ),
            (
                TriggerKind::Rest,
                json!({ "path": "/login", "httpMethod": "POST", "body": body, "isBase64Encoded": true }),
            ),
            (
                TriggerKind::Alb,
                json!({ "path": "/login", "httpMethod": "POST", "body": body, "isBase64Encoded": true }),
            ),
        ] {
            let req = normalize(&event(kind, value)).unwrap();
            assert_eq!(req.body.as_ref(), b"name=value&submit=1", "kind {kind}");
        }
    }

    #[test]
    fn literal_body_is_passed_through() {
        let ev = event(
            TriggerKind::Alb,
            json!({ "path": "/", "httpMethod": "POST", "body": "plain text" }),
        );
        assert_eq!(normalize(&ev).unwrap().body.as_ref(), b"plain text");
    }

    #[test]
    fn invalid_base64_body_is_an_encoding_error() {
        let ev = event(
            TriggerKind::Alb,
            json!({ "path": "/", "httpMethod": "POST", "body": "%%%", "isBase64Encoded": true }),
        );
        assert!(matches!(normalize(&ev).unwrap_err(), BridgeError::Encoding(_)));
    }
}
