//! Trigger event model.
//!
//! The four front-door integrations each deliver their own JSON payload
//! shape. They are modeled as a closed tagged-variant set so every
//! downstream consumer matches exhaustively: adding a fifth front door
//! means one new variant plus one normalizer/encoder pair, nothing else.
//!
//! Field names mirror the wire formats bit-for-bit via serde renames;
//! consumers never see them once a `CanonicalRequest` exists.

use crate::error::{BridgeError, BridgeResult};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::str::FromStr;

/// The front-door integration type that produced an invocation event.
///
/// Declared by the caller alongside the event — never sniffed from the
/// payload shape — and selects both the normalizer and the encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    /// HTTP-API gateway, payload format 2.0.
    HttpV2,
    /// HTTP-API gateway, payload format 1.0.
    HttpV1,
    /// Legacy REST-API gateway.
    Rest,
    /// Load balancer target-group integration.
    Alb,
}

impl TriggerKind {
    /// Whether the normalizer removes a leading `/<stage>` deployment
    /// segment from the event path. The HTTP gateway embeds the stage in
    /// the URL path; the REST gateway and the load balancer do not.
    pub fn strips_stage_prefix(self) -> bool {
        match self {
            TriggerKind::HttpV2 | TriggerKind::HttpV1 => true,
            TriggerKind::Rest | TriggerKind::Alb => false,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TriggerKind::HttpV2 => "http-v2",
            TriggerKind::HttpV1 => "http-v1",
            TriggerKind::Rest => "rest",
            TriggerKind::Alb => "alb",
        }
    }
}

impl fmt::Display for TriggerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TriggerKind {
    type Err = BridgeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "http-v2" => Ok(TriggerKind::HttpV2),
            "http-v1" => Ok(TriggerKind::HttpV1),
            "rest" => Ok(TriggerKind::Rest),
            "alb" => Ok(TriggerKind::Alb),
            other => Err(BridgeError::UnsupportedTriggerKind(other.to_string())),
        }
    }
}

/// HTTP-API gateway payload, format 2.0.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpV2Event {
    pub raw_path: String,
    #[serde(default)]
    pub raw_query_string: String,
    #[serde(default)]
    pub headers: HashMap<String, String>,
    /// One full `name=value` pair per entry.
    #[serde(default)]
    pub cookies: Vec<String>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    pub request_context: HttpV2RequestContext,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpV2RequestContext {
    #[serde(default)]
    pub stage: Option<String>,
    pub http: HttpV2RequestContextHttp,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpV2RequestContextHttp {
    pub method: String,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub source_ip: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
}

/// HTTP-API gateway payload, format 1.0.
///
/// Headers and query parameters may arrive in single-value and
/// multi-value form at once; the multi-value form wins.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HttpV1Event {
    pub path: String,
    pub http_method: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub multi_value_query_string_parameters: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: Option<GatewayRequestContext>,
}

/// Legacy REST-API gateway payload.
///
/// Same field set as [`HttpV1Event`]; it is a distinct type because the
/// two kinds diverge in the path rule (the REST gateway keeps the stage
/// out of the URL path) and may diverge further.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestEvent {
    pub path: String,
    pub http_method: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub multi_value_query_string_parameters: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
    #[serde(default)]
    pub request_context: Option<GatewayRequestContext>,
}

/// Request context shared by the v1 and REST gateway payloads.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequestContext {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub path: Option<String>,
    #[serde(default)]
    pub protocol: Option<String>,
    #[serde(default)]
    pub identity: Option<GatewayIdentity>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayIdentity {
    #[serde(default)]
    pub source_ip: Option<String>,
}

/// Load balancer target-group payload.
///
/// The multi-value fields are present only when the load balancer has
/// multi-value mode enabled; their presence is the detection signal.
/// There is no cookie array and no stage segment.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbEvent {
    pub path: String,
    pub http_method: String,
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,
    #[serde(default)]
    pub multi_value_headers: Option<HashMap<String, Vec<String>>>,
    #[serde(default)]
    pub query_string_parameters: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub multi_value_query_string_parameters: Option<BTreeMap<String, Vec<String>>>,
    #[serde(default)]
    pub body: Option<String>,
    #[serde(default)]
    pub is_base64_encoded: bool,
}

/// A raw invocation event bound to its declared kind.
#[derive(Debug, Clone)]
pub enum TriggerEvent {
    HttpV2(HttpV2Event),
    HttpV1(HttpV1Event),
    Rest(RestEvent),
    Alb(AlbEvent),
}

impl TriggerEvent {
    /// Deserialize a raw JSON event as the declared kind.
    ///
    /// A structurally invalid event (missing required field, wrong type)
    /// is a [`BridgeError::MalformedEvent`]; the payload is never probed
    /// to guess a different kind.
    pub fn from_value(kind: TriggerKind, event: Value) -> BridgeResult<Self> {
        let malformed = |e: serde_json::Error| BridgeError::MalformedEvent {
            kind,
            reason: e.to_string(),
        };
        match kind {
            TriggerKind::HttpV2 => serde_json::from_value(event)
                .map(TriggerEvent::HttpV2)
                .map_err(malformed),
            TriggerKind::HttpV1 => serde_json::from_value(event)
                .map(TriggerEvent::HttpV1)
                .map_err(malformed),
            TriggerKind::Rest => serde_json::from_value(event)
                .map(TriggerEvent::Rest)
                .map_err(malformed),
            TriggerKind::Alb => serde_json::from_value(event)
                .map(TriggerEvent::Alb)
                .map_err(malformed),
        }
    }

    pub fn kind(&self) -> TriggerKind {
        match self {
            TriggerEvent::HttpV2(_) => TriggerKind::HttpV2,
            TriggerEvent::HttpV1(_) => TriggerKind::HttpV1,
            TriggerEvent::Rest(_) => TriggerKind::Rest,
            TriggerEvent::Alb(_) => TriggerKind::Alb,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn kind_parses_known_names() {
        assert_eq!("http-v2".parse::<TriggerKind>().unwrap(), TriggerKind::HttpV2);
        assert_eq!("http-v1".parse::<TriggerKind>().unwrap(), TriggerKind::HttpV1);
        assert_eq!("rest".parse::<TriggerKind>().unwrap(), TriggerKind::Rest);
        assert_eq!("alb".parse::<TriggerKind>().unwrap(), TriggerKind::Alb);
    }

    #[test]
    fn kind_rejects_unknown_name() {
        let err = "websocket".parse::<TriggerKind>().unwrap_err();
        assert!(matches!(err, BridgeError::UnsupportedTriggerKind(s) if s == "websocket"));
    }

    #[test]
    fn kind_display_round_trips() {
        for kind in [TriggerKind::HttpV2, TriggerKind::HttpV1, TriggerKind::Rest, TriggerKind::Alb] {
            assert_eq!(kind.to_string().parse::<TriggerKind>().unwrap(), kind);
        }
    }

    #[test]
    fn stage_prefix_rule_per_kind() {
        assert!(TriggerKind::HttpV2.strips_stage_prefix());
        assert!(TriggerKind::HttpV1.strips_stage_prefix());
        assert!(!TriggerKind::Rest.strips_stage_prefix());
        assert!(!TriggerKind::Alb.strips_stage_prefix());
    }

    #[test]
    fn http_v2_event_deserializes() {
        let event = json!({
            "rawPath": "/production/",
            "rawQueryString": "a=1&a=2",
            "headers": { "host": "example.com" },
            "cookies": ["session=abc"],
            "isBase64Encoded": false,
            "requestContext": {
                "stage": "production",
                "http": { "method": "GET", "path": "/production/", "sourceIp": "1.2.3.4", "protocol": "HTTP/1.1" }
            }
        });
        let parsed = TriggerEvent::from_value(TriggerKind::HttpV2, event).unwrap();
        let TriggerEvent::HttpV2(v2) = parsed else { panic!("wrong variant") };
        assert_eq!(v2.raw_path, "/production/");
        assert_eq!(v2.request_context.http.method, "GET");
        assert_eq!(v2.cookies, vec!["session=abc".to_string()]);
    }

    #[test]
    fn missing_required_field_is_malformed() {
        // No rawPath.
        let event = json!({
            "requestContext": { "http": { "method": "GET" } }
        });
        let err = TriggerEvent::from_value(TriggerKind::HttpV2, event).unwrap_err();
        match err {
            BridgeError::MalformedEvent { kind, reason } => {
                assert_eq!(kind, TriggerKind::HttpV2);
                assert!(reason.contains("rawPath"), "reason: {reason}");
            }
            other => panic!("expected MalformedEvent, got {other:?}"),
        }
    }

    #[test]
    fn alb_event_tolerates_minimal_payload() {
        let event = json!({ "path": "/", "httpMethod": "GET" });
        let parsed = TriggerEvent::from_value(TriggerKind::Alb, event).unwrap();
        assert_eq!(parsed.kind(), TriggerKind::Alb);
    }
}
