//! Unit tests for credential storage.

mod domain_tests;
mod service_tests;
