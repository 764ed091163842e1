//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Lifecycle of one crawl run (idle, running, completed, interrupted)
//! - `ResultList`: Download candidates collected across crawled pages

mod crawl_state;
mod results;

// Re-export main types
pub use crawl_state::CrawlState;
pub use results::ResultList;
