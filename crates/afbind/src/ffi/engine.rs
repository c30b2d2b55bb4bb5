//! The engine seam
//!
//! [`Engine`] has one method per `af_*` entry point the bindings use, shaped
//! like the C function: the output handle by `&mut`, dimension vectors by
//! reference, dtypes as raw codes, the status code as the return value.
//! [`DynamicEngine`](super::DynamicEngine) forwards each method to the
//! loaded library. Methods an engine does not provide report
//! `AF_ERR_NOT_SUPPORTED`.

use super::sys::{AfArray, AfDtype, AfErr, DimT, Status, AF_ERR_NOT_SUPPORTED};
use crate::dim::Dim4;
use std::os::raw::{c_double, c_int, c_longlong, c_uint, c_ulonglong};

#[allow(unused_variables)]
pub trait Engine: Send + Sync {
    /// Human-readable identifier, used in logs
    fn name(&self) -> &str {
        "engine"
    }

    /// Message for a failed call with status `code`
    ///
    /// Engines with per-thread error text return it here; the default is
    /// the status name.
    fn error_message(&self, code: AfErr) -> String {
        Status::from_code(code).name().to_string()
    }

    /// `(major, minor, patch)` of the engine library
    fn version(&self) -> Option<(i32, i32, i32)> {
        None
    }

    // ===== creation =====

    /// `af_constant`
    fn constant(&self, out: &mut AfArray, value: c_double, dims: &Dim4, dtype: AfDtype) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_constant_complex`
    fn constant_complex(
        &self,
        out: &mut AfArray,
        real: c_double,
        imag: c_double,
        dims: &Dim4,
        dtype: AfDtype,
    ) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_constant_long`
    fn constant_long(&self, out: &mut AfArray, value: c_longlong, dims: &Dim4) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_constant_ulong`
    fn constant_ulong(&self, out: &mut AfArray, value: c_ulonglong, dims: &Dim4) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_range`
    fn range(&self, out: &mut AfArray, dims: &Dim4, seq_dim: c_int, dtype: AfDtype) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_iota`
    fn iota(&self, out: &mut AfArray, dims: &Dim4, tile_dims: &Dim4, dtype: AfDtype) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_randu`
    fn randu(&self, out: &mut AfArray, dims: &Dim4, dtype: AfDtype) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_randn`
    fn randn(&self, out: &mut AfArray, dims: &Dim4, dtype: AfDtype) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_identity`
    fn identity(&self, out: &mut AfArray, dims: &Dim4, dtype: AfDtype) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_create_array`; `data` holds `dims.elements()` packed elements
    fn create_array(&self, out: &mut AfArray, data: &[u8], dims: &Dim4, dtype: AfDtype) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    // ===== random state =====

    /// `af_set_seed`
    fn set_seed(&self, seed: c_ulonglong) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_get_seed`
    fn get_seed(&self, seed: &mut c_ulonglong) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    // ===== structure =====

    /// `af_diag_create`
    fn diag_create(&self, out: &mut AfArray, input: AfArray, num: c_int) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_diag_extract`
    fn diag_extract(&self, out: &mut AfArray, input: AfArray, num: c_int) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_join`
    fn join(&self, out: &mut AfArray, dim: c_int, first: AfArray, second: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_join_many`; the input count is `inputs.len()`
    fn join_many(&self, out: &mut AfArray, dim: c_int, inputs: &[AfArray]) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_tile`
    fn tile(&self, out: &mut AfArray, input: AfArray, reps: [c_uint; 4]) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_reorder`
    fn reorder(&self, out: &mut AfArray, input: AfArray, axes: [c_uint; 4]) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_shift`
    fn shift(&self, out: &mut AfArray, input: AfArray, offsets: [c_int; 4]) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_moddims`
    fn moddims(&self, out: &mut AfArray, input: AfArray, dims: &Dim4) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_flat`
    fn flat(&self, out: &mut AfArray, input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_flip`
    fn flip(&self, out: &mut AfArray, input: AfArray, dim: c_uint) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_lower`
    fn lower(&self, out: &mut AfArray, input: AfArray, is_unit_diag: bool) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_upper`
    fn upper(&self, out: &mut AfArray, input: AfArray, is_unit_diag: bool) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    // ===== handles =====

    /// `af_retain_array`
    fn retain_array(&self, out: &mut AfArray, input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_release_array`
    fn release_array(&self, input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_get_dims`
    fn get_dims(&self, dims: &mut [DimT; 4], input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_get_type`
    fn get_type(&self, dtype: &mut AfDtype, input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_get_elements`
    fn get_elements(&self, elements: &mut DimT, input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_get_numdims`
    fn get_numdims(&self, ndims: &mut c_uint, input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }

    /// `af_get_data_ptr`; `data` is exactly `elements * dtype size` bytes
    fn get_data(&self, data: &mut [u8], input: AfArray) -> AfErr {
        AF_ERR_NOT_SUPPORTED
    }
}
