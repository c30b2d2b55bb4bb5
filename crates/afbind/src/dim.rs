//! Four-slot dimension vector

use crate::ffi::DimT;
use std::fmt;
use std::ops::Index;

/// Shape descriptor passed by pointer to the engine
///
/// Always exactly four slots. Conversions from shorter arrays pad the
/// trailing slots with 1. Values are not range-checked here; the engine
/// rejects shapes it cannot honour.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dim4 {
    dims: [DimT; 4],
}

impl Dim4 {
    /// Slot count passed as `ndims` alongside every dimension pointer
    pub const NDIMS: u32 = 4;

    pub const fn new(dims: [DimT; 4]) -> Self {
        Self { dims }
    }

    /// `[1, 1, 1, 1]`
    pub const fn ones() -> Self {
        Self { dims: [1; 4] }
    }

    pub fn get(&self) -> &[DimT; 4] {
        &self.dims
    }

    pub fn as_ptr(&self) -> *const DimT {
        self.dims.as_ptr()
    }

    /// Product of all four slots, or `None` if it overflows `dim_t`
    pub fn elements(&self) -> Option<DimT> {
        self.dims.iter().try_fold(1, |acc: DimT, &d| acc.checked_mul(d))
    }

    /// Number of dimensions up to the last slot that is not 1
    ///
    /// An empty shape (any slot 0) counts as 0 dimensions.
    pub fn ndims(&self) -> usize {
        if self.dims.iter().any(|&d| d == 0) {
            return 0;
        }
        self.dims
            .iter()
            .rposition(|&d| d != 1)
            .map_or(1, |last| last + 1)
    }
}

impl Default for Dim4 {
    fn default() -> Self {
        Self::ones()
    }
}

impl Index<usize> for Dim4 {
    type Output = DimT;

    fn index(&self, axis: usize) -> &DimT {
        &self.dims[axis]
    }
}

impl fmt::Display for Dim4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [d0, d1, d2, d3] = self.dims;
        write!(f, "[{} {} {} {}]", d0, d1, d2, d3)
    }
}

macro_rules! impl_dim4_from {
    ($($t:ty),*) => {$(
        impl From<$t> for Dim4 {
            fn from(d0: $t) -> Self {
                Self::new([d0 as DimT, 1, 1, 1])
            }
        }

        impl From<[$t; 1]> for Dim4 {
            fn from([d0]: [$t; 1]) -> Self {
                Self::new([d0 as DimT, 1, 1, 1])
            }
        }

        impl From<[$t; 2]> for Dim4 {
            fn from([d0, d1]: [$t; 2]) -> Self {
                Self::new([d0 as DimT, d1 as DimT, 1, 1])
            }
        }

        impl From<[$t; 3]> for Dim4 {
            fn from([d0, d1, d2]: [$t; 3]) -> Self {
                Self::new([d0 as DimT, d1 as DimT, d2 as DimT, 1])
            }
        }

        impl From<[$t; 4]> for Dim4 {
            fn from([d0, d1, d2, d3]: [$t; 4]) -> Self {
                Self::new([d0 as DimT, d1 as DimT, d2 as DimT, d3 as DimT])
            }
        }
    )*};
}

impl_dim4_from!(i32, i64, u32, u64, usize);
