//! Provider abstraction over static-site hosting platforms.
//!
//! Every platform exposes a materially different API shape: GitHub Pages has
//! no project at all, only a repository setting, while Vercel, Netlify and
//! Cloudflare Pages have first-class projects with asynchronous build
//! pipelines. This module normalizes them behind one capability-checked
//! contract. The module follows hexagonal architecture:
//!
//! - Domain types in [`domain`]
//! - The provider contract in [`ports`]
//! - Per-platform adapters in [`adapters`]
//! - Startup-time platform binding in [`registry`]

pub mod adapters;
pub mod domain;
pub mod error;
pub mod ports;
pub mod registry;

#[cfg(test)]
pub(crate) mod testing;

#[cfg(test)]
mod tests;
