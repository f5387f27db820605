//! Command-line front end for the learning platform client.
//!
//! Runs the page controllers from `learnhub-views` without a UI: every
//! notification a page raises is printed, and watch commands keep their
//! observers alive until Ctrl-C.

pub mod cli;
pub mod commands;
pub mod render;
