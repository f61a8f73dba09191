//! Halyard: multi-platform deployment core for a blog-publishing web app.
//!
//! This crate connects user accounts to static-site hosting platforms
//! (GitHub Pages, Vercel, Netlify, Cloudflare Pages), registers deployable
//! projects for source repositories, triggers and reconciles deployments,
//! and ingests signed platform webhooks.
//!
//! # Architecture
//!
//! Halyard follows hexagonal architecture principles:
//!
//! - **Domain**: Pure business logic with no infrastructure dependencies
//! - **Ports**: Abstract trait interfaces for external interactions
//! - **Adapters**: Concrete implementations of ports (database, APIs, etc.)
//!
//! # Modules
//!
//! - [`hosting`]: Provider abstraction over the hosting platforms
//! - [`credential`]: Per-user platform access tokens
//! - [`oauth`]: Single-use CSRF state and the connect flow
//! - [`project`]: Repository-to-project registry and custom domains
//! - [`deployment`]: Deployment history and status reconciliation
//! - [`webhook`]: Signed event ingestion
//! - [`api`]: HTTP surface
//! - [`config`]: Environment-supplied integration settings

pub mod api;
pub mod config;
pub mod credential;
pub mod deployment;
pub mod hosting;
pub mod oauth;
pub mod project;
pub mod webhook;
