//! Flowdeck CLI library.
//!
//! This crate provides the command-line interface and interactive REPL
//! for Flowdeck.

pub mod cli;
pub mod commands;
pub mod render;
pub mod repl;
