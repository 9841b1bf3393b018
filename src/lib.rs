//! Promptdeck is a menu-driven terminal client for hosted text-completion APIs.
//!
//! The crate is organized around a small set of collaborating layers:
//! - [`core`] owns the settings tree and its editor, the chat loop, the
//!   session log with its JSON export, and the main menu that ties them
//!   together.
//! - [`api`] defines the completion request payloads and the client trait,
//!   with an HTTP implementation.
//! - [`auth`] holds the API key and re-prompts for it when needed.
//! - [`utils`] provides the line-oriented console used by every prompt.
//!
//! Runtime entrypoints live in the binary crate (`src/main.rs`) and route
//! through [`crate::cli::main`], which builds a [`core::app::MenuController`]
//! and runs it.

pub mod api;
pub mod auth;
pub mod cli;
pub mod core;
pub mod utils;
