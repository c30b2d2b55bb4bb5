//! Array construction, random generation and shape manipulation
//!
//! Each operation validates its dtype (if it takes one), packs its shape
//! arguments into [`Dim4`] values, and issues a single foreign call.
//! Shapes, axes, offsets and tile counts are not range-checked here; the
//! engine reports invalid values through its status code.

use crate::array::Array;
use crate::context::Context;
use crate::dim::Dim4;
use crate::dtype::{DType, DTypeArg};
use crate::error::{Error, Result};
use crate::ffi::AfArray;
use crate::scalar::Scalar;
use std::os::raw::c_uint;

/// Most inputs `join_many` packs into one call
pub const JOIN_CAPACITY: usize = 4;

/// What [`Context::diag`] does with its input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiagMode {
    /// Matrix in, its `num`-th diagonal out as a column vector
    Extract,
    /// Vector in, a square matrix with the vector on the `num`-th diagonal out
    Create,
}

/// Entry point and marshaled arguments for a constant fill
///
/// The C API has no single fill call that carries every element width
/// losslessly, so the value kind and requested dtype pick one of four.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum ConstantCall {
    Complex { real: f64, imag: f64, dtype: DType },
    Long(i64),
    ULong(u64),
    Double { value: f64, dtype: DType },
}

impl ConstantCall {
    pub(crate) fn plan(value: Scalar, dtype: DType) -> Self {
        match (value, dtype) {
            (Scalar::Complex(c), dtype) => ConstantCall::Complex {
                real: c.re,
                imag: c.im,
                dtype: if dtype.is_complex() { dtype } else { DType::C32 },
            },
            (value, DType::S64) => ConstantCall::Long(value.as_i64()),
            (value, DType::U64) => ConstantCall::ULong(value.as_u64()),
            (value, dtype) => ConstantCall::Double {
                value: value.as_f64(),
                dtype,
            },
        }
    }

    pub(crate) fn entry_point(&self) -> &'static str {
        match self {
            ConstantCall::Complex { .. } => "af_constant_complex",
            ConstantCall::Long(_) => "af_constant_long",
            ConstantCall::ULong(_) => "af_constant_ulong",
            ConstantCall::Double { .. } => "af_constant",
        }
    }
}

impl Context {
    /// Axis order that swaps the first two dimensions
    pub const TRANSPOSE: [u32; 4] = [1, 0, 2, 3];

    // ===== construction =====

    /// Array of shape `dims` filled with `value`
    ///
    /// Complex values always produce a complex array (c32 unless c64 was
    /// requested). s64 and u64 fills truncate the real part to an integer
    /// and never pass through `f64`.
    pub fn constant(
        &self,
        value: impl Into<Scalar>,
        dims: impl Into<Dim4>,
        dtype: impl DTypeArg,
    ) -> Result<Array> {
        let dtype = dtype.into_dtype()?;
        let dims = dims.into();
        let call = ConstantCall::plan(value.into(), dtype);

        self.call_out(call.entry_point(), |engine, out| match call {
            ConstantCall::Complex { real, imag, dtype } => {
                engine.constant_complex(out, real, imag, &dims, dtype.code())
            }
            ConstantCall::Long(value) => engine.constant_long(out, value, &dims),
            ConstantCall::ULong(value) => engine.constant_ulong(out, value, &dims),
            ConstantCall::Double { value, dtype } => {
                engine.constant(out, value, &dims, dtype.code())
            }
        })
    }

    /// Values counting up along `seq_dim` (-1 selects the first axis)
    pub fn range(&self, dims: impl Into<Dim4>, seq_dim: i32, dtype: impl DTypeArg) -> Result<Array> {
        let dtype = dtype.into_dtype()?;
        let dims = dims.into();
        self.call_out("af_range", |engine, out| {
            engine.range(out, &dims, seq_dim, dtype.code())
        })
    }

    /// Row-major sequence `0..dims.elements()` shaped as `dims`, then tiled
    pub fn iota(
        &self,
        dims: impl Into<Dim4>,
        tile_dims: impl Into<Dim4>,
        dtype: impl DTypeArg,
    ) -> Result<Array> {
        let dtype = dtype.into_dtype()?;
        let dims = dims.into();
        let tile_dims = tile_dims.into();
        self.call_out("af_iota", |engine, out| {
            engine.iota(out, &dims, &tile_dims, dtype.code())
        })
    }

    /// Uniform random values in `[0, 1)`
    pub fn randu(&self, dims: impl Into<Dim4>, dtype: impl DTypeArg) -> Result<Array> {
        let dtype = dtype.into_dtype()?;
        let dims = dims.into();
        self.call_out("af_randu", |engine, out| {
            engine.randu(out, &dims, dtype.code())
        })
    }

    /// Standard normal random values
    pub fn randn(&self, dims: impl Into<Dim4>, dtype: impl DTypeArg) -> Result<Array> {
        let dtype = dtype.into_dtype()?;
        let dims = dims.into();
        self.call_out("af_randn", |engine, out| {
            engine.randn(out, &dims, dtype.code())
        })
    }

    /// Ones on the main diagonal of every 2-D slice, zeros elsewhere
    pub fn identity(&self, dims: impl Into<Dim4>, dtype: impl DTypeArg) -> Result<Array> {
        let dtype = dtype.into_dtype()?;
        let dims = dims.into();
        self.call_out("af_identity", |engine, out| {
            engine.identity(out, &dims, dtype.code())
        })
    }

    // ===== structure =====

    /// Extract or build the `num`-th diagonal (positive is above the main one)
    pub fn diag(&self, a: &Array, num: i32, mode: DiagMode) -> Result<Array> {
        let input = a.get();
        match mode {
            DiagMode::Extract => self.call_out("af_diag_extract", |engine, out| {
                engine.diag_extract(out, input, num)
            }),
            DiagMode::Create => self.call_out("af_diag_create", |engine, out| {
                engine.diag_create(out, input, num)
            }),
        }
    }

    /// Concatenate two arrays along `dim`
    pub fn join(&self, dim: i32, first: &Array, second: &Array) -> Result<Array> {
        let (first, second) = (first.get(), second.get());
        self.call_out("af_join", |engine, out| engine.join(out, dim, first, second))
    }

    /// Concatenate up to [`JOIN_CAPACITY`] arrays along `dim` in one call
    pub fn join_many(&self, dim: i32, inputs: &[&Array]) -> Result<Array> {
        if inputs.len() > JOIN_CAPACITY {
            return Err(Error::InvalidArgument(format!(
                "join_many takes at most {} arrays, got {}",
                JOIN_CAPACITY,
                inputs.len()
            )));
        }

        let mut handles: [AfArray; JOIN_CAPACITY] = [std::ptr::null_mut(); JOIN_CAPACITY];
        for (slot, array) in handles.iter_mut().zip(inputs) {
            *slot = array.get();
        }
        let count = inputs.len();

        self.call_out("af_join_many", |engine, out| {
            engine.join_many(out, dim, &handles[..count])
        })
    }

    /// Repeat `a` `reps[i]` times along axis `i`
    pub fn tile(&self, a: &Array, reps: impl Into<Dim4>) -> Result<Array> {
        let input = a.get();
        let reps = (*reps.into().get()).map(|r| r as c_uint);
        self.call_out("af_tile", |engine, out| engine.tile(out, input, reps))
    }

    /// Permute axes; output axis `i` is input axis `axes[i]`
    pub fn reorder(&self, a: &Array, axes: [u32; 4]) -> Result<Array> {
        let input = a.get();
        self.call_out("af_reorder", |engine, out| engine.reorder(out, input, axes))
    }

    /// Circularly shift by `offsets[i]` along axis `i`
    pub fn shift(&self, a: &Array, offsets: [i32; 4]) -> Result<Array> {
        let input = a.get();
        self.call_out("af_shift", |engine, out| engine.shift(out, input, offsets))
    }

    /// Same data, new shape (element count must match)
    pub fn moddims(&self, a: &Array, dims: impl Into<Dim4>) -> Result<Array> {
        let input = a.get();
        let dims = dims.into();
        self.call_out("af_moddims", |engine, out| {
            engine.moddims(out, input, &dims)
        })
    }

    /// Same data as a column vector
    pub fn flat(&self, a: &Array) -> Result<Array> {
        let input = a.get();
        self.call_out("af_flat", |engine, out| engine.flat(out, input))
    }

    /// Reverse the order of elements along `dim`
    pub fn flip(&self, a: &Array, dim: u32) -> Result<Array> {
        let input = a.get();
        self.call_out("af_flip", |engine, out| engine.flip(out, input, dim))
    }

    /// Lower triangle of each 2-D slice; `is_unit_diag` writes ones on the diagonal
    pub fn lower(&self, a: &Array, is_unit_diag: bool) -> Result<Array> {
        let input = a.get();
        self.call_out("af_lower", |engine, out| {
            engine.lower(out, input, is_unit_diag)
        })
    }

    /// Upper triangle of each 2-D slice; `is_unit_diag` writes ones on the diagonal
    pub fn upper(&self, a: &Array, is_unit_diag: bool) -> Result<Array> {
        let input = a.get();
        self.call_out("af_upper", |engine, out| {
            engine.upper(out, input, is_unit_diag)
        })
    }
}
