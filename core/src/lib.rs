//! Language-policy checks for GitHub issues, pull requests and plugin READMEs.
//!
//! The [`language`] classifier scores how much of a text is CJK. [`moderation`]
//! and [`review`] apply it, together with a few structural heuristics, to
//! issues and plugin PRs.

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod language;
pub mod moderation;
pub mod review;
pub mod sources;
