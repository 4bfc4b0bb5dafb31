//! Internal modules for the recipe book client.
//!
//! This library provides the session store, API gateway client, recipe
//! submission pipeline, command parsing, and the terminal UIs used by the
//! rb_client binary.

pub mod api_client;
pub mod commands;
pub mod models;
pub mod session;
pub mod submission;
pub mod text_client;
pub mod tui_app;
