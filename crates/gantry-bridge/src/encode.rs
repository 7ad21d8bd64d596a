//! Response encoding.
//!
//! Converts a captured [`FrameworkResult`] into the wire shape the
//! invoking front door expects: header folding, cookie multiplexing and
//! binary-safe body encoding, per trigger kind.

use crate::policy::{BASE64_SENTINEL_HEADER, needs_base64};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use gantry_core::{BridgeResult, EncodedResponse, FrameworkResult, HeaderBag, TriggerKind};
use std::collections::HashMap;

/// Header name the v2 gateway refuses inside the headers map; its
/// values travel in the top-level `cookies` array instead.
const SET_COOKIE: &str = "set-cookie";

/// Encode a framework result into the trigger-specific wire response.
pub fn encode(kind: TriggerKind, result: FrameworkResult) -> BridgeResult<EncodedResponse> {
    let mut headers = result.headers;

    // The sentinel never reaches the wire, binary or not.
    let explicit_override = headers.contains(BASE64_SENTINEL_HEADER);
    headers.remove(BASE64_SENTINEL_HEADER);

    let binary = needs_base64(headers.get("content-type"), explicit_override);

    let (single, multi, cookies) = match kind {
        TriggerKind::HttpV2 => {
            let cookies = headers.remove(SET_COOKIE);
            (fold_joined(&headers), None, Some(cookies))
        }
        TriggerKind::HttpV1 | TriggerKind::Rest => {
            (fold_last_wins(&headers), Some(unfold_all(&headers)), None)
        }
        TriggerKind::Alb => (fold_joined(&headers), None, None),
    };

    let (body, is_base64_encoded) = if binary {
        (STANDARD.encode(&result.body), true)
    } else {
        (String::from_utf8(result.body.to_vec())?, false)
    };

    Ok(EncodedResponse {
        status_code: result.status,
        headers: single,
        multi_value_headers: multi,
        cookies,
        body,
        is_base64_encoded,
    })
}

/// Single-value fold for the kinds with only a `headers` map: repeated
/// values join with `", "`.
fn fold_joined(headers: &HeaderBag) -> HashMap<String, String> {
    headers
        .names()
        .into_iter()
        .map(|name| (name.to_string(), headers.get_all(name).join(", ")))
        .collect()
}

/// `headers` companion to `multiValueHeaders`: last value wins.
fn fold_last_wins(headers: &HeaderBag) -> HashMap<String, String> {
    headers
        .names()
        .into_iter()
        .filter_map(|name| headers.get(name).map(|v| (name.to_string(), v.to_string())))
        .collect()
}

/// All values per name, insertion order preserved.
fn unfold_all(headers: &HeaderBag) -> HashMap<String, Vec<String>> {
    headers
        .names()
        .into_iter()
        .map(|name| {
            let values = headers.get_all(name).into_iter().map(str::to_string).collect();
            (name.to_string(), values)
        })
        .collect()
}
