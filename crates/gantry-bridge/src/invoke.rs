//! Framework invoker.
//!
//! The embedded framework is injected as a callback, never reached via
//! process-wide state, so the bridge stays testable in isolation and
//! safe under concurrent invocations. One call per incoming request; no
//! retries — the invoking platform owns those.

use anyhow::anyhow;
use bytes::Bytes;
use gantry_core::{BridgeError, BridgeResult, CanonicalRequest, FrameworkResult, InvocationContext};
use http::{HeaderName, HeaderValue, Request, Uri};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

type HandlerFuture = Pin<Box<dyn Future<Output = anyhow::Result<FrameworkResult>> + Send>>;

/// The framework's call contract: a fully buffered request in, a
/// status/headers/body triple out. A framework that turns its own
/// failures into 500 results returns `Ok`; anything it lets escape
/// surfaces as [`BridgeError::Framework`].
pub type FrameworkHandler = Arc<dyn Fn(Request<Bytes>) -> HandlerFuture + Send + Sync>;

/// Drive one canonical request through the framework.
///
/// Builds the framework-facing request (method, path and query, folded
/// headers, buffered body; remote metadata and the invocation context
/// ride in the extensions), awaits the handler exactly once and
/// validates the result. Bodies are bounded and fully in memory; there
/// is no streaming path.
pub async fn invoke(
    handler: &FrameworkHandler,
    request: CanonicalRequest,
    ctx: InvocationContext,
) -> BridgeResult<FrameworkResult> {
    let framework_request = build_request(request, ctx)?;

    let result = handler(framework_request)
        .await
        .map_err(BridgeError::Framework)?;

    // A framework that bypasses its own error handling must not hand a
    // malformed result to the front door.
    if !(100..=599).contains(&result.status) {
        return Err(BridgeError::Framework(anyhow!(
            "framework returned out-of-range status {}",
            result.status
        )));
    }

    Ok(result)
}

fn build_request(
    request: CanonicalRequest,
    ctx: InvocationContext,
) -> BridgeResult<Request<Bytes>> {
    let uri: Uri = if request.query.is_empty() {
        request.path.parse()
    } else {
        format!("{}?{}", request.path, request.query).parse()
    }
    .map_err(|e| BridgeError::Framework(anyhow!("cannot build request uri: {e}")))?;

    let mut builder = Request::builder().method(request.method.as_str()).uri(uri);

    for (name, value) in &request.headers {
        // Names and values came off the wire as text; anything that
        // cannot be a valid header is dropped rather than failing the
        // whole invocation.
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            builder = builder.header(name, value);
        }
    }

    let mut framework_request = builder
        .body(request.body)
        .map_err(|e| BridgeError::Framework(anyhow!("cannot build framework request: {e}")))?;

    framework_request.extensions_mut().insert(request.remote);
    framework_request.extensions_mut().insert(ctx);

    Ok(framework_request)
}
