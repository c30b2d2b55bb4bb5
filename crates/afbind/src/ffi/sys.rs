//! C-compatible types of the ArrayFire ABI
//!
//! Type mapping:
//! - `af_array` -> [`AfArray`] (opaque pointer)
//! - `dim_t` -> [`DimT`] (`long long`)
//! - `af_err` -> [`AfErr`] (`int`)
//! - `af_dtype` -> [`AfDtype`] (`int`)

use std::fmt;
use std::os::raw::{c_int, c_longlong, c_void};

/// Opaque engine array handle
pub type AfArray = *mut c_void;

/// Dimension length
pub type DimT = c_longlong;

/// Status code returned by every entry point
pub type AfErr = c_int;

/// Element type code
pub type AfDtype = c_int;

pub const AF_SUCCESS: AfErr = 0;
pub const AF_ERR_NO_MEM: AfErr = 101;
pub const AF_ERR_DRIVER: AfErr = 102;
pub const AF_ERR_RUNTIME: AfErr = 103;
pub const AF_ERR_INVALID_ARRAY: AfErr = 201;
pub const AF_ERR_ARG: AfErr = 202;
pub const AF_ERR_SIZE: AfErr = 203;
pub const AF_ERR_TYPE: AfErr = 204;
pub const AF_ERR_DIFF_TYPE: AfErr = 205;
pub const AF_ERR_BATCH: AfErr = 207;
pub const AF_ERR_DEVICE: AfErr = 208;
pub const AF_ERR_NOT_SUPPORTED: AfErr = 301;
pub const AF_ERR_NOT_CONFIGURED: AfErr = 302;
pub const AF_ERR_NONFREE: AfErr = 303;
pub const AF_ERR_NO_DBL: AfErr = 401;
pub const AF_ERR_NO_GFX: AfErr = 402;
pub const AF_ERR_NO_HALF: AfErr = 403;
pub const AF_ERR_LOAD_LIB: AfErr = 501;
pub const AF_ERR_LOAD_SYM: AfErr = 502;
pub const AF_ERR_ARR_BKND_MISMATCH: AfErr = 503;
pub const AF_ERR_INTERNAL: AfErr = 998;
pub const AF_ERR_UNKNOWN: AfErr = 999;

/// Decoded engine status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    Success,
    NoMem,
    Driver,
    Runtime,
    InvalidArray,
    Arg,
    Size,
    Type,
    DiffType,
    Batch,
    Device,
    NotSupported,
    NotConfigured,
    NonFree,
    NoDbl,
    NoGfx,
    NoHalf,
    LoadLib,
    LoadSym,
    ArrBkndMismatch,
    Internal,
    /// `AF_ERR_UNKNOWN` and any code the engine documents no meaning for
    Unknown,
}

impl Status {
    pub fn from_code(code: AfErr) -> Self {
        match code {
            AF_SUCCESS => Status::Success,
            AF_ERR_NO_MEM => Status::NoMem,
            AF_ERR_DRIVER => Status::Driver,
            AF_ERR_RUNTIME => Status::Runtime,
            AF_ERR_INVALID_ARRAY => Status::InvalidArray,
            AF_ERR_ARG => Status::Arg,
            AF_ERR_SIZE => Status::Size,
            AF_ERR_TYPE => Status::Type,
            AF_ERR_DIFF_TYPE => Status::DiffType,
            AF_ERR_BATCH => Status::Batch,
            AF_ERR_DEVICE => Status::Device,
            AF_ERR_NOT_SUPPORTED => Status::NotSupported,
            AF_ERR_NOT_CONFIGURED => Status::NotConfigured,
            AF_ERR_NONFREE => Status::NonFree,
            AF_ERR_NO_DBL => Status::NoDbl,
            AF_ERR_NO_GFX => Status::NoGfx,
            AF_ERR_NO_HALF => Status::NoHalf,
            AF_ERR_LOAD_LIB => Status::LoadLib,
            AF_ERR_LOAD_SYM => Status::LoadSym,
            AF_ERR_ARR_BKND_MISMATCH => Status::ArrBkndMismatch,
            AF_ERR_INTERNAL => Status::Internal,
            _ => Status::Unknown,
        }
    }

    pub fn is_success(&self) -> bool {
        *self == Status::Success
    }

    /// Name of the C enumerator
    pub fn name(&self) -> &'static str {
        match self {
            Status::Success => "AF_SUCCESS",
            Status::NoMem => "AF_ERR_NO_MEM",
            Status::Driver => "AF_ERR_DRIVER",
            Status::Runtime => "AF_ERR_RUNTIME",
            Status::InvalidArray => "AF_ERR_INVALID_ARRAY",
            Status::Arg => "AF_ERR_ARG",
            Status::Size => "AF_ERR_SIZE",
            Status::Type => "AF_ERR_TYPE",
            Status::DiffType => "AF_ERR_DIFF_TYPE",
            Status::Batch => "AF_ERR_BATCH",
            Status::Device => "AF_ERR_DEVICE",
            Status::NotSupported => "AF_ERR_NOT_SUPPORTED",
            Status::NotConfigured => "AF_ERR_NOT_CONFIGURED",
            Status::NonFree => "AF_ERR_NONFREE",
            Status::NoDbl => "AF_ERR_NO_DBL",
            Status::NoGfx => "AF_ERR_NO_GFX",
            Status::NoHalf => "AF_ERR_NO_HALF",
            Status::LoadLib => "AF_ERR_LOAD_LIB",
            Status::LoadSym => "AF_ERR_LOAD_SYM",
            Status::ArrBkndMismatch => "AF_ERR_ARR_BKND_MISMATCH",
            Status::Internal => "AF_ERR_INTERNAL",
            Status::Unknown => "AF_ERR_UNKNOWN",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
