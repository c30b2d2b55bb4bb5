//! Element data types
//!
//! [`DType`] mirrors the engine's `af_dtype` enumeration. Operations take
//! any [`DTypeArg`], so hosts can pass a `DType`, a raw code or a name; raw
//! codes and names outside the enumeration fail with
//! [`Error::InvalidDType`] before anything is sent to the engine.

use crate::error::{Error, Result};
use crate::ffi::AfDtype;
use num_complex::{Complex32, Complex64};
use std::fmt;
use std::str::FromStr;

/// Engine element type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DType {
    /// 32-bit float
    #[default]
    F32,
    /// 32-bit complex float
    C32,
    /// 64-bit float
    F64,
    /// 64-bit complex float
    C64,
    /// 8-bit boolean
    B8,
    /// 32-bit signed integer
    S32,
    /// 32-bit unsigned integer
    U32,
    /// 8-bit unsigned integer
    U8,
    /// 64-bit signed integer
    S64,
    /// 64-bit unsigned integer
    U64,
    /// 16-bit signed integer
    S16,
    /// 16-bit unsigned integer
    U16,
    /// 16-bit float
    F16,
}

impl DType {
    pub const ALL: [DType; 13] = [
        DType::F32,
        DType::C32,
        DType::F64,
        DType::C64,
        DType::B8,
        DType::S32,
        DType::U32,
        DType::U8,
        DType::S64,
        DType::U64,
        DType::S16,
        DType::U16,
        DType::F16,
    ];

    /// `af_dtype` value
    pub fn code(&self) -> AfDtype {
        match self {
            DType::F32 => 0,
            DType::C32 => 1,
            DType::F64 => 2,
            DType::C64 => 3,
            DType::B8 => 4,
            DType::S32 => 5,
            DType::U32 => 6,
            DType::U8 => 7,
            DType::S64 => 8,
            DType::U64 => 9,
            DType::S16 => 10,
            DType::U16 => 11,
            DType::F16 => 12,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DType::F32 => "f32",
            DType::C32 => "c32",
            DType::F64 => "f64",
            DType::C64 => "c64",
            DType::B8 => "b8",
            DType::S32 => "s32",
            DType::U32 => "u32",
            DType::U8 => "u8",
            DType::S64 => "s64",
            DType::U64 => "u64",
            DType::S16 => "s16",
            DType::U16 => "u16",
            DType::F16 => "f16",
        }
    }

    /// Bytes per element
    pub fn size(&self) -> usize {
        match self {
            DType::B8 | DType::U8 => 1,
            DType::S16 | DType::U16 | DType::F16 => 2,
            DType::F32 | DType::S32 | DType::U32 => 4,
            DType::F64 | DType::C32 | DType::S64 | DType::U64 => 8,
            DType::C64 => 16,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, DType::C32 | DType::C64)
    }
}

impl fmt::Display for DType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl TryFrom<AfDtype> for DType {
    type Error = Error;

    fn try_from(code: AfDtype) -> Result<Self> {
        DType::ALL
            .into_iter()
            .find(|d| d.code() == code)
            .ok_or_else(|| Error::InvalidDType(format!("{} is not an af_dtype code", code)))
    }
}

impl FromStr for DType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        DType::ALL
            .into_iter()
            .find(|d| d.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| Error::InvalidDType(format!("unknown dtype name '{}'", s)))
    }
}

/// Anything an operation accepts as its dtype argument
pub trait DTypeArg {
    fn into_dtype(self) -> Result<DType>;
}

impl DTypeArg for DType {
    fn into_dtype(self) -> Result<DType> {
        Ok(self)
    }
}

impl DTypeArg for AfDtype {
    fn into_dtype(self) -> Result<DType> {
        DType::try_from(self)
    }
}

impl DTypeArg for &str {
    fn into_dtype(self) -> Result<DType> {
        self.parse()
    }
}

/// `None` selects the default, f32
impl<T: DTypeArg> DTypeArg for Option<T> {
    fn into_dtype(self) -> Result<DType> {
        match self {
            Some(dtype) => dtype.into_dtype(),
            None => Ok(DType::default()),
        }
    }
}

/// Host element types that can be copied into engine arrays
///
/// # Safety
///
/// `Self` must have exactly the size and layout of one element of `DTYPE`
/// as the engine stores it.
pub unsafe trait HostType: Copy + Default + 'static {
    const DTYPE: DType;
}

/// Host element types that engine arrays can be copied back into
///
/// `bool` is not one: a b8 element is a byte that may hold any value, so
/// b8 arrays read back through [`Array::to_host_bool`].
///
/// # Safety
///
/// Every bit pattern the engine can produce for `DTYPE` must be a valid
/// `Self`.
///
/// [`Array::to_host_bool`]: crate::Array::to_host_bool
pub unsafe trait FromEngine: HostType {}

macro_rules! impl_host_type {
    ($($t:ty => $d:expr),* $(,)?) => {$(
        unsafe impl HostType for $t {
            const DTYPE: DType = $d;
        }
        unsafe impl FromEngine for $t {}
    )*};
}

impl_host_type!(
    f32 => DType::F32,
    f64 => DType::F64,
    Complex32 => DType::C32,
    Complex64 => DType::C64,
    i32 => DType::S32,
    u32 => DType::U32,
    u8 => DType::U8,
    i64 => DType::S64,
    u64 => DType::U64,
    i16 => DType::S16,
    u16 => DType::U16,
);

unsafe impl HostType for bool {
    const DTYPE: DType = DType::B8;
}
