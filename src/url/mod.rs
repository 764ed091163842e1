//! URL handling module for Trawl
//!
//! This module resolves hrefs into absolute URLs, computes the domain
//! identity of a URL, and decides whether a URL falls inside the crawl scope
//! of a seed.

mod domain;
mod normalize;
mod scope;

// Re-export main functions
pub use domain::domain_of;
pub use normalize::{crawl_key, has_recognized_scheme, parse_seed, resolve};
pub use scope::{is_subdomain_of, same_scope};
