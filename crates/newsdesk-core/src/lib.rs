//! # Newsdesk Core
//!
//! The domain layer of the newsdesk live-blog engine.
//! This crate contains pure business logic with zero infrastructure dependencies:
//! the live blog and timeline entry entities, the ports the Entry Store has to
//! implement, and the service that enforces the incremental-fetch contract.

pub mod domain;
pub mod error;
pub mod ports;
pub mod service;

pub use error::DomainError;
pub use service::LiveBlogService;
