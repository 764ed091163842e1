//! Terminal interface for choosing a download
//!
//! Renders the result list and turns operator input into a [`Selection`].

mod menu;
mod prompt;

pub use menu::{format_compact, format_crawl_summary, format_menu, truncate_name, MAX_DISPLAY_NAME};
pub use prompt::{
    parse_selection, prompt_depth, prompt_seed, prompt_selection, Selection, SelectionError,
};
