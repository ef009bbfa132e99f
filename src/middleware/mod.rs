//! Middleware module
//!
//! Contains Tower middleware that runs before request handlers.

pub mod client_ip;
