//! gantry-core — shared types for the Gantry front-door bridge.
//!
//! Defines the closed set of trigger event shapes delivered by the
//! platform front doors, the canonical request representation the
//! embedded framework consumes, the wire response shape sent back,
//! and the bridge error taxonomy. Pure data; no I/O.

pub mod error;
pub mod event;
pub mod request;
pub mod response;

pub use error::{BridgeError, BridgeResult};
pub use event::{AlbEvent, HttpV1Event, HttpV2Event, RestEvent, TriggerEvent, TriggerKind};
pub use request::{CanonicalRequest, InvocationContext, RemoteMeta};
pub use response::{EncodedResponse, FrameworkResult, HeaderBag};
