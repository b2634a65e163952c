//! Daily puzzle scheduler for the FlickWord and Trivia games
//!
//! The [`selector`] module holds the deterministic daily selection core; the
//! rest wires it to persistence and an HTTP API.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod selector;
pub mod services;
