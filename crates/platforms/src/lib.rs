//! Backend platform adapters and dispatch.
//!
//! One thin REST adapter per platform, a per-request facade that constructs
//! only the adapter a resolved operation needs, and the dispatcher that
//! turns a model's function-call proposal into a normalized envelope. All
//! backend errors are contained here and converted to data; nothing past
//! the dispatcher boundary raises.

pub mod catalyst;
pub mod dispatcher;
pub mod facade;
pub mod http;
pub mod meraki;
pub mod spaces;
pub mod webex;

pub use dispatcher::{ArgumentPolicy, Dispatcher};
pub use facade::{BackendFacade, BackendInvoker};
pub use http::{PlatformError, PlatformPayload};
