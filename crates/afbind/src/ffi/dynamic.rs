//! Engine backed by a runtime-loaded ArrayFire library
//!
//! Every symbol is resolved once when the library is opened; a missing
//! symbol fails the load instead of the first call that needs it.

use super::engine::Engine;
use super::loader::{LibraryLoader, LoadError};
use super::sys::{AfArray, AfDtype, AfErr, DimT, Status};
use crate::dim::Dim4;
use afbind_config::EngineConfig;
use libloading::{Library, Symbol};
use std::ffi::CStr;
use std::os::raw::{c_char, c_double, c_int, c_longlong, c_uint, c_ulonglong, c_void};
use std::path::{Path, PathBuf};

/// Resolve one symbol, copying the function pointer out of the library
unsafe fn symbol<T: Copy>(library: &Library, path: &Path, name: &str) -> Result<T, LoadError> {
    let mut bytes = Vec::with_capacity(name.len() + 1);
    bytes.extend_from_slice(name.as_bytes());
    bytes.push(0);

    let sym: Symbol<'_, T> = library
        .get(&bytes)
        .map_err(|_| LoadError::SymbolNotFound {
            library: path.display().to_string(),
            symbol: name.to_string(),
        })?;
    Ok(*sym)
}

macro_rules! load_func {
    ($lib:expr, $path:expr, $name:ident) => {
        symbol($lib, $path, stringify!($name))?
    };
}

/// ArrayFire function pointers
struct Functions {
    af_constant: unsafe extern "C" fn(*mut AfArray, c_double, c_uint, *const DimT, AfDtype) -> AfErr,
    af_constant_complex:
        unsafe extern "C" fn(*mut AfArray, c_double, c_double, c_uint, *const DimT, AfDtype) -> AfErr,
    af_constant_long: unsafe extern "C" fn(*mut AfArray, c_longlong, c_uint, *const DimT) -> AfErr,
    af_constant_ulong: unsafe extern "C" fn(*mut AfArray, c_ulonglong, c_uint, *const DimT) -> AfErr,
    af_range: unsafe extern "C" fn(*mut AfArray, c_uint, *const DimT, c_int, AfDtype) -> AfErr,
    af_iota:
        unsafe extern "C" fn(*mut AfArray, c_uint, *const DimT, c_uint, *const DimT, AfDtype) -> AfErr,
    af_randu: unsafe extern "C" fn(*mut AfArray, c_uint, *const DimT, AfDtype) -> AfErr,
    af_randn: unsafe extern "C" fn(*mut AfArray, c_uint, *const DimT, AfDtype) -> AfErr,
    af_set_seed: unsafe extern "C" fn(c_ulonglong) -> AfErr,
    af_get_seed: unsafe extern "C" fn(*mut c_ulonglong) -> AfErr,
    af_identity: unsafe extern "C" fn(*mut AfArray, c_uint, *const DimT, AfDtype) -> AfErr,
    af_create_array:
        unsafe extern "C" fn(*mut AfArray, *const c_void, c_uint, *const DimT, AfDtype) -> AfErr,

    af_diag_create: unsafe extern "C" fn(*mut AfArray, AfArray, c_int) -> AfErr,
    af_diag_extract: unsafe extern "C" fn(*mut AfArray, AfArray, c_int) -> AfErr,
    af_join: unsafe extern "C" fn(*mut AfArray, c_int, AfArray, AfArray) -> AfErr,
    af_join_many: unsafe extern "C" fn(*mut AfArray, c_int, c_uint, *const AfArray) -> AfErr,
    af_tile: unsafe extern "C" fn(*mut AfArray, AfArray, c_uint, c_uint, c_uint, c_uint) -> AfErr,
    af_reorder: unsafe extern "C" fn(*mut AfArray, AfArray, c_uint, c_uint, c_uint, c_uint) -> AfErr,
    af_shift: unsafe extern "C" fn(*mut AfArray, AfArray, c_int, c_int, c_int, c_int) -> AfErr,
    af_moddims: unsafe extern "C" fn(*mut AfArray, AfArray, c_uint, *const DimT) -> AfErr,
    af_flat: unsafe extern "C" fn(*mut AfArray, AfArray) -> AfErr,
    af_flip: unsafe extern "C" fn(*mut AfArray, AfArray, c_uint) -> AfErr,
    af_lower: unsafe extern "C" fn(*mut AfArray, AfArray, bool) -> AfErr,
    af_upper: unsafe extern "C" fn(*mut AfArray, AfArray, bool) -> AfErr,

    af_retain_array: unsafe extern "C" fn(*mut AfArray, AfArray) -> AfErr,
    af_release_array: unsafe extern "C" fn(AfArray) -> AfErr,
    af_get_dims: unsafe extern "C" fn(*mut DimT, *mut DimT, *mut DimT, *mut DimT, AfArray) -> AfErr,
    af_get_type: unsafe extern "C" fn(*mut AfDtype, AfArray) -> AfErr,
    af_get_elements: unsafe extern "C" fn(*mut DimT, AfArray) -> AfErr,
    af_get_numdims: unsafe extern "C" fn(*mut c_uint, AfArray) -> AfErr,
    af_get_data_ptr: unsafe extern "C" fn(*mut c_void, AfArray) -> AfErr,

    af_get_last_error: unsafe extern "C" fn(*mut *mut c_char, *mut DimT),
    af_err_to_string: unsafe extern "C" fn(AfErr) -> *const c_char,
    af_free_host: unsafe extern "C" fn(*mut c_void) -> AfErr,
    af_get_version: unsafe extern "C" fn(*mut c_int, *mut c_int, *mut c_int) -> AfErr,
}

impl Functions {
    unsafe fn load(lib: &Library, path: &Path) -> Result<Self, LoadError> {
        Ok(Self {
            af_constant: load_func!(lib, path, af_constant),
            af_constant_complex: load_func!(lib, path, af_constant_complex),
            af_constant_long: load_func!(lib, path, af_constant_long),
            af_constant_ulong: load_func!(lib, path, af_constant_ulong),
            af_range: load_func!(lib, path, af_range),
            af_iota: load_func!(lib, path, af_iota),
            af_randu: load_func!(lib, path, af_randu),
            af_randn: load_func!(lib, path, af_randn),
            af_set_seed: load_func!(lib, path, af_set_seed),
            af_get_seed: load_func!(lib, path, af_get_seed),
            af_identity: load_func!(lib, path, af_identity),
            af_create_array: load_func!(lib, path, af_create_array),

            af_diag_create: load_func!(lib, path, af_diag_create),
            af_diag_extract: load_func!(lib, path, af_diag_extract),
            af_join: load_func!(lib, path, af_join),
            af_join_many: load_func!(lib, path, af_join_many),
            af_tile: load_func!(lib, path, af_tile),
            af_reorder: load_func!(lib, path, af_reorder),
            af_shift: load_func!(lib, path, af_shift),
            af_moddims: load_func!(lib, path, af_moddims),
            af_flat: load_func!(lib, path, af_flat),
            af_flip: load_func!(lib, path, af_flip),
            af_lower: load_func!(lib, path, af_lower),
            af_upper: load_func!(lib, path, af_upper),

            af_retain_array: load_func!(lib, path, af_retain_array),
            af_release_array: load_func!(lib, path, af_release_array),
            af_get_dims: load_func!(lib, path, af_get_dims),
            af_get_type: load_func!(lib, path, af_get_type),
            af_get_elements: load_func!(lib, path, af_get_elements),
            af_get_numdims: load_func!(lib, path, af_get_numdims),
            af_get_data_ptr: load_func!(lib, path, af_get_data_ptr),

            af_get_last_error: load_func!(lib, path, af_get_last_error),
            af_err_to_string: load_func!(lib, path, af_err_to_string),
            af_free_host: load_func!(lib, path, af_free_host),
            af_get_version: load_func!(lib, path, af_get_version),
        })
    }
}

/// [`Engine`] implemented by calling into a loaded ArrayFire library
pub struct DynamicEngine {
    funcs: Functions,
    name: String,
    path: PathBuf,
    // Keeps the code behind `funcs` mapped
    _library: Library,
}

impl DynamicEngine {
    /// Load `library` (short name or path) from the default search paths
    pub fn load(library: &Path) -> Result<Self, LoadError> {
        Self::load_with(&LibraryLoader::new(), library)
    }

    /// Load `library` from the search paths of `loader`
    pub fn load_with(loader: &LibraryLoader, library: &Path) -> Result<Self, LoadError> {
        let (path, lib) = loader.load(library)?;
        let funcs = unsafe { Functions::load(&lib, &path)? };
        tracing::info!(library = %path.display(), "engine symbols resolved");

        Ok(Self {
            funcs,
            name: path.display().to_string(),
            path,
            _library: lib,
        })
    }

    /// Load the library selected by `config`
    pub fn from_config(config: &EngineConfig) -> Result<Self, LoadError> {
        let loader = LibraryLoader::with_search_paths(config.search_paths());
        Self::load_with(&loader, &config.library())
    }

    /// Resolved path of the loaded library
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Engine for DynamicEngine {
    fn name(&self) -> &str {
        &self.name
    }

    fn error_message(&self, code: AfErr) -> String {
        let mut msg: *mut c_char = std::ptr::null_mut();
        let mut len: DimT = 0;

        unsafe {
            (self.funcs.af_get_last_error)(&mut msg, &mut len);
            if !msg.is_null() {
                let text = CStr::from_ptr(msg).to_string_lossy().trim().to_string();
                (self.funcs.af_free_host)(msg as *mut c_void);
                if !text.is_empty() {
                    return text;
                }
            }

            let fallback = (self.funcs.af_err_to_string)(code);
            if fallback.is_null() {
                Status::from_code(code).name().to_string()
            } else {
                CStr::from_ptr(fallback).to_string_lossy().into_owned()
            }
        }
    }

    fn version(&self) -> Option<(i32, i32, i32)> {
        let (mut major, mut minor, mut patch) = (0, 0, 0);
        let status = unsafe { (self.funcs.af_get_version)(&mut major, &mut minor, &mut patch) };
        (status == 0).then_some((major, minor, patch))
    }

    fn constant(&self, out: &mut AfArray, value: c_double, dims: &Dim4, dtype: AfDtype) -> AfErr {
        unsafe { (self.funcs.af_constant)(out, value, Dim4::NDIMS, dims.as_ptr(), dtype) }
    }

    fn constant_complex(
        &self,
        out: &mut AfArray,
        real: c_double,
        imag: c_double,
        dims: &Dim4,
        dtype: AfDtype,
    ) -> AfErr {
        unsafe {
            (self.funcs.af_constant_complex)(out, real, imag, Dim4::NDIMS, dims.as_ptr(), dtype)
        }
    }

    fn constant_long(&self, out: &mut AfArray, value: c_longlong, dims: &Dim4) -> AfErr {
        unsafe { (self.funcs.af_constant_long)(out, value, Dim4::NDIMS, dims.as_ptr()) }
    }

    fn constant_ulong(&self, out: &mut AfArray, value: c_ulonglong, dims: &Dim4) -> AfErr {
        unsafe { (self.funcs.af_constant_ulong)(out, value, Dim4::NDIMS, dims.as_ptr()) }
    }

    fn range(&self, out: &mut AfArray, dims: &Dim4, seq_dim: c_int, dtype: AfDtype) -> AfErr {
        unsafe { (self.funcs.af_range)(out, Dim4::NDIMS, dims.as_ptr(), seq_dim, dtype) }
    }

    fn iota(&self, out: &mut AfArray, dims: &Dim4, tile_dims: &Dim4, dtype: AfDtype) -> AfErr {
        unsafe {
            (self.funcs.af_iota)(
                out,
                Dim4::NDIMS,
                dims.as_ptr(),
                Dim4::NDIMS,
                tile_dims.as_ptr(),
                dtype,
            )
        }
    }

    fn randu(&self, out: &mut AfArray, dims: &Dim4, dtype: AfDtype) -> AfErr {
        unsafe { (self.funcs.af_randu)(out, Dim4::NDIMS, dims.as_ptr(), dtype) }
    }

    fn randn(&self, out: &mut AfArray, dims: &Dim4, dtype: AfDtype) -> AfErr {
        unsafe { (self.funcs.af_randn)(out, Dim4::NDIMS, dims.as_ptr(), dtype) }
    }

    fn identity(&self, out: &mut AfArray, dims: &Dim4, dtype: AfDtype) -> AfErr {
        unsafe { (self.funcs.af_identity)(out, Dim4::NDIMS, dims.as_ptr(), dtype) }
    }

    fn create_array(&self, out: &mut AfArray, data: &[u8], dims: &Dim4, dtype: AfDtype) -> AfErr {
        unsafe {
            (self.funcs.af_create_array)(
                out,
                data.as_ptr() as *const c_void,
                Dim4::NDIMS,
                dims.as_ptr(),
                dtype,
            )
        }
    }

    fn set_seed(&self, seed: c_ulonglong) -> AfErr {
        unsafe { (self.funcs.af_set_seed)(seed) }
    }

    fn get_seed(&self, seed: &mut c_ulonglong) -> AfErr {
        unsafe { (self.funcs.af_get_seed)(seed) }
    }

    fn diag_create(&self, out: &mut AfArray, input: AfArray, num: c_int) -> AfErr {
        unsafe { (self.funcs.af_diag_create)(out, input, num) }
    }

    fn diag_extract(&self, out: &mut AfArray, input: AfArray, num: c_int) -> AfErr {
        unsafe { (self.funcs.af_diag_extract)(out, input, num) }
    }

    fn join(&self, out: &mut AfArray, dim: c_int, first: AfArray, second: AfArray) -> AfErr {
        unsafe { (self.funcs.af_join)(out, dim, first, second) }
    }

    fn join_many(&self, out: &mut AfArray, dim: c_int, inputs: &[AfArray]) -> AfErr {
        unsafe { (self.funcs.af_join_many)(out, dim, inputs.len() as c_uint, inputs.as_ptr()) }
    }

    fn tile(&self, out: &mut AfArray, input: AfArray, reps: [c_uint; 4]) -> AfErr {
        let [x, y, z, w] = reps;
        unsafe { (self.funcs.af_tile)(out, input, x, y, z, w) }
    }

    fn reorder(&self, out: &mut AfArray, input: AfArray, axes: [c_uint; 4]) -> AfErr {
        let [x, y, z, w] = axes;
        unsafe { (self.funcs.af_reorder)(out, input, x, y, z, w) }
    }

    fn shift(&self, out: &mut AfArray, input: AfArray, offsets: [c_int; 4]) -> AfErr {
        let [x, y, z, w] = offsets;
        unsafe { (self.funcs.af_shift)(out, input, x, y, z, w) }
    }

    fn moddims(&self, out: &mut AfArray, input: AfArray, dims: &Dim4) -> AfErr {
        unsafe { (self.funcs.af_moddims)(out, input, Dim4::NDIMS, dims.as_ptr()) }
    }

    fn flat(&self, out: &mut AfArray, input: AfArray) -> AfErr {
        unsafe { (self.funcs.af_flat)(out, input) }
    }

    fn flip(&self, out: &mut AfArray, input: AfArray, dim: c_uint) -> AfErr {
        unsafe { (self.funcs.af_flip)(out, input, dim) }
    }

    fn lower(&self, out: &mut AfArray, input: AfArray, is_unit_diag: bool) -> AfErr {
        unsafe { (self.funcs.af_lower)(out, input, is_unit_diag) }
    }

    fn upper(&self, out: &mut AfArray, input: AfArray, is_unit_diag: bool) -> AfErr {
        unsafe { (self.funcs.af_upper)(out, input, is_unit_diag) }
    }

    fn retain_array(&self, out: &mut AfArray, input: AfArray) -> AfErr {
        unsafe { (self.funcs.af_retain_array)(out, input) }
    }

    fn release_array(&self, input: AfArray) -> AfErr {
        unsafe { (self.funcs.af_release_array)(input) }
    }

    fn get_dims(&self, dims: &mut [DimT; 4], input: AfArray) -> AfErr {
        let [d0, d1, d2, d3] = dims;
        unsafe { (self.funcs.af_get_dims)(d0, d1, d2, d3, input) }
    }

    fn get_type(&self, dtype: &mut AfDtype, input: AfArray) -> AfErr {
        unsafe { (self.funcs.af_get_type)(dtype, input) }
    }

    fn get_elements(&self, elements: &mut DimT, input: AfArray) -> AfErr {
        unsafe { (self.funcs.af_get_elements)(elements, input) }
    }

    fn get_numdims(&self, ndims: &mut c_uint, input: AfArray) -> AfErr {
        unsafe { (self.funcs.af_get_numdims)(ndims, input) }
    }

    fn get_data(&self, data: &mut [u8], input: AfArray) -> AfErr {
        unsafe { (self.funcs.af_get_data_ptr)(data.as_mut_ptr() as *mut c_void, input) }
    }
}
