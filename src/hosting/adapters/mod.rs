//! Provider adapters, one per supported hosting platform.

mod cloudflare_pages;
mod github_pages;
mod http;
mod netlify;
mod vercel;

pub use cloudflare_pages::CloudflarePagesProvider;
pub use github_pages::GithubPagesProvider;
pub use netlify::NetlifyProvider;
pub use vercel::VercelProvider;
