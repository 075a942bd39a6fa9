//! Gachon notice notifier library.
//!
//! Checks the Gachon University academic notice board for a new regular
//! post and announces it on a Discord webhook, remembering the newest post
//! id between runs.

pub mod checkpoint;
pub mod config;
pub mod constants;
pub mod extractor;
pub mod fetcher;
pub mod notifier;
pub mod runner;
