//! Foreign function interface to the ArrayFire engine
//!
//! - `sys`: C ABI types and status codes
//! - `engine`: the [`Engine`] trait, one method per entry point
//! - `loader`: platform-aware shared library resolution
//! - `dynamic`: [`DynamicEngine`], the trait implemented over a loaded library
//!
//! # Safety
//!
//! All `unsafe` calls into the engine live in `dynamic`. Everything above
//! the [`Engine`] trait is safe code.

pub mod dynamic;
pub mod engine;
pub mod loader;
pub mod sys;

pub use dynamic::DynamicEngine;
pub use engine::Engine;
pub use loader::{LibraryLoader, LoadError};
pub use sys::{AfArray, AfDtype, AfErr, DimT, Status};
