//! HTTP route handlers

pub mod questions;
pub mod sessions;
