//! Blog API Library
//!
//! REST backend for a blog: typed posts (text, video, quote, photo, link),
//! comments, tags and user accounts, stored in PostgreSQL or in memory.

pub mod api;
pub mod auth;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod telemetry;
