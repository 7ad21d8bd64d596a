//! gantry-bridge — runs a conventional web framework behind a FaaS
//! front door.
//!
//! The platform delivers each HTTP request as a JSON trigger event in
//! one of four shapes (HTTP-API gateway v2 and v1, REST-API gateway,
//! load balancer). The bridge normalizes the declared shape into one
//! canonical request, drives it through the embedded framework and
//! encodes the result back into the exact wire shape that front door
//! expects.
//!
//! # Architecture
//!
//! ```text
//! trigger event + declared kind
//!   │
//!   ▼
//! Bridge::handle
//!   │
//!   ├── normalize:  raw event → CanonicalRequest
//!   ├── invoke:     CanonicalRequest → framework → FrameworkResult
//!   ├── encode:     FrameworkResult → EncodedResponse
//!   │               (header folding, cookie multiplexing,
//!   │                binary content policy)
//!   ▼
//! trigger-shaped response
//! ```
//!
//! The framework is injected as a [`FrameworkHandler`] callback; the
//! bridge keeps no state across invocations and never retries.

pub mod dispatch;
pub mod encode;
pub mod invoke;
pub mod normalize;
pub mod policy;

pub use dispatch::Bridge;
pub use invoke::FrameworkHandler;
pub use policy::{BASE64_SENTINEL_HEADER, needs_base64};

pub use gantry_core::{
    BridgeError, BridgeResult, CanonicalRequest, EncodedResponse, FrameworkResult, HeaderBag,
    InvocationContext, RemoteMeta, TriggerEvent, TriggerKind,
};
