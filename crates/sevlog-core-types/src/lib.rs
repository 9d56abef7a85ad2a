//! Core types shared across sevlog facilities
//!
//! This crate provides foundational types used by the logging engine,
//! the facade and the capture logger:
//!
//! - **Context**: cancellation/deadline-bearing value passed through the
//!   `*_ctx` logging variants untouched
//! - **Sensitive data**: `Sensitive<T>` marker for automatic redaction
//! - **Schema constants**: Canonical record keys shared by every handler

pub mod context;
pub mod schema;
pub mod sensitive;

pub use context::{CancelToken, Context};
pub use sensitive::Sensitive;
