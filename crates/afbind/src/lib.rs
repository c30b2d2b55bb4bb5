//! afbind - runtime-loaded bindings to the ArrayFire C API
//!
//! Every operation follows one pattern: default and validate the arguments,
//! pack shapes into a 4-slot [`Dim4`], call exactly one `af_*` entry point
//! with an empty output handle, and return the populated handle as an owning
//! [`Array`]. All computation happens inside the engine library.
//!
//! ```no_run
//! use afbind::{Context, DType, DiagMode};
//!
//! let ctx = Context::from_env()?;
//! let a = ctx.randu([3, 3], DType::F32)?;
//! let d = ctx.diag(&a, 0, DiagMode::Extract)?;
//! assert_eq!(d.dims()?.get(), &[3, 1, 1, 1]);
//! # Ok::<(), afbind::Error>(())
//! ```

/// afbind version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod array;
pub mod context;
pub mod data;
pub mod dim;
pub mod dtype;
pub mod error;
pub mod ffi;
pub mod scalar;

pub use afbind_config::{Backend, EngineConfig};
pub use array::Array;
pub use context::Context;
pub use data::{DiagMode, JOIN_CAPACITY};
pub use dim::Dim4;
pub use dtype::{DType, DTypeArg, FromEngine, HostType};
pub use error::{Error, Result};
pub use ffi::{DynamicEngine, Engine, LoadError, Status};
pub use num_complex::{Complex32, Complex64};
pub use scalar::Scalar;
