//! Quire: a small server-rendered blog with an admin-gated markdown editor.

pub mod application;
pub mod config;
pub mod domain;
pub mod infra;
pub mod presentation;
