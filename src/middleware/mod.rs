//! Middleware module
//!
//! Contains the bearer key gate applied to chat completions.

pub mod auth;
