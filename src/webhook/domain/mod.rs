//! Domain model for webhook ingestion.

mod event;

pub use event::{WebhookEvent, parse_event};
