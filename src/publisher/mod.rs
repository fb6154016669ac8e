//! Publishing of build descriptors through an external engine.
//!
//! Every publish operation gets its own [`PublisherRuntime`]; services
//! are single-use and must be stopped, which [`PublisherFactory::with_publisher`]
//! and `Drop` guarantee.

mod context;
mod runtime;
mod service;

pub use context::BuildContext;
pub use runtime::PublisherRuntime;
pub use service::{PublisherFactory, PublisherFlags, PublisherService};
