//! Dispatch facade.
//!
//! Single entry point tying the pipeline together: deserialize the
//! declared trigger shape, normalize, invoke the framework, encode.
//! Every failure propagates unchanged to the caller; nothing is logged
//! and swallowed here.

use crate::encode::encode;
use crate::invoke::{FrameworkHandler, invoke};
use crate::normalize::normalize;
use gantry_core::{BridgeResult, EncodedResponse, InvocationContext, TriggerEvent, TriggerKind};
use serde_json::Value;
use tracing::debug;

/// The bridge between a front door and an embedded framework.
///
/// Holds the injected framework handler and nothing else; every
/// `handle` call is a self-contained pipeline, so one `Bridge` can
/// serve concurrent invocations.
#[derive(Clone)]
pub struct Bridge {
    handler: FrameworkHandler,
}

impl Bridge {
    pub fn new(handler: FrameworkHandler) -> Self {
        Self { handler }
    }

    /// Handle one invocation: raw event in, trigger-shaped response out.
    ///
    /// The kind is declared by the caller, never inferred from the
    /// payload. The invocation context is passed to the framework
    /// opaquely.
    pub async fn handle(
        &self,
        kind: TriggerKind,
        event: Value,
        ctx: InvocationContext,
    ) -> BridgeResult<EncodedResponse> {
        let event = TriggerEvent::from_value(kind, event)?;
        let request = normalize(&event)?;
        debug!(%kind, method = %request.method, path = %request.path, "normalized trigger event");

        let result = invoke(&self.handler, request, ctx).await?;
        debug!(%kind, status = result.status, "framework result captured");

        encode(kind, result)
    }

    /// Like [`Bridge::handle`], with the kind taken from a
    /// configuration string (`http-v2`, `http-v1`, `rest`, `alb`).
    /// An unknown name is [`gantry_core::BridgeError::UnsupportedTriggerKind`].
    pub async fn handle_named(
        &self,
        kind: &str,
        event: Value,
        ctx: InvocationContext,
    ) -> BridgeResult<EncodedResponse> {
        self.handle(kind.parse()?, event, ctx).await
    }
}
