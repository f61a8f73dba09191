//! Service layer for webhook ingestion.

pub mod ingestor;

pub use ingestor::{IngestError, IngestOutcome, IngestResult, WebhookIngestor};
