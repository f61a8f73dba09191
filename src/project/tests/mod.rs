//! Unit tests for project registration.
