//! # Newsdesk Shared
//!
//! Wire types shared between the API server and the live-blog sync client.
//! Kept free of server dependencies so the client can be built for the
//! viewer's runtime (including WASM).

pub mod dto;
pub mod response;

pub use response::{ApiResponse, ErrorResponse};
