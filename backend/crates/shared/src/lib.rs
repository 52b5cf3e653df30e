//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of platform vocabulary:
//! - Unified error type and HTTP-mapped error classification
//! - Typed ID wrappers
//! - Pagination request/response vocabulary
//!
//! **Design Principle**: only things that are hard to change and mean the
//! same thing in every feature crate belong here.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    pub mod kind;
}
pub mod id;
pub mod page;
