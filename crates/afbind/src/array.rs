//! Owning wrapper around an engine array handle

use crate::context::{call_out, check, Context};
use crate::dim::Dim4;
use crate::dtype::{DType, FromEngine, HostType};
use crate::error::{Error, Result};
use crate::ffi::sys::AF_SUCCESS;
use crate::ffi::{AfArray, DimT, Engine};
use std::fmt;
use std::sync::Arc;

/// An engine-allocated array
///
/// Each `Array` owns exactly one reference to its handle and releases it on
/// drop. Use [`Array::try_clone`] for a second reference.
pub struct Array {
    handle: AfArray,
    engine: Arc<dyn Engine>,
}

// The handle is an engine-side reference, not host memory, so it may move
// between threads. Concurrent use of one handle is left to the engine.
unsafe impl Send for Array {}

impl Array {
    pub(crate) fn from_raw(engine: Arc<dyn Engine>, handle: AfArray) -> Self {
        Self { handle, engine }
    }

    /// Copy host data into a new engine array
    ///
    /// `data` must hold exactly `dims.elements()` values in column-major order.
    pub fn from_host<T: HostType>(ctx: &Context, data: &[T], dims: impl Into<Dim4>) -> Result<Self> {
        let dims = dims.into();
        let expected = dims.elements().ok_or_else(|| {
            Error::InvalidArgument(format!("shape {} has more elements than dim_t can count", dims))
        })?;
        if data.len() as DimT != expected {
            return Err(Error::InvalidArgument(format!(
                "{} host values cannot fill an array of shape {}",
                data.len(),
                dims
            )));
        }

        // HostType guarantees T has the engine's element layout
        let bytes = unsafe {
            std::slice::from_raw_parts(data.as_ptr() as *const u8, std::mem::size_of_val(data))
        };
        ctx.call_out("af_create_array", |engine, out| {
            engine.create_array(out, bytes, &dims, T::DTYPE.code())
        })
    }

    /// Raw handle, still owned by this array
    pub fn get(&self) -> AfArray {
        self.handle
    }

    pub fn dims(&self) -> Result<Dim4> {
        let mut dims = [0; 4];
        check(
            self.engine.as_ref(),
            "af_get_dims",
            self.engine.get_dims(&mut dims, self.handle),
        )?;
        Ok(Dim4::new(dims))
    }

    pub fn dtype(&self) -> Result<DType> {
        let mut code = 0;
        check(
            self.engine.as_ref(),
            "af_get_type",
            self.engine.get_type(&mut code, self.handle),
        )?;
        DType::try_from(code)
    }

    pub fn elements(&self) -> Result<usize> {
        let mut elements = 0;
        check(
            self.engine.as_ref(),
            "af_get_elements",
            self.engine.get_elements(&mut elements, self.handle),
        )?;
        Ok(elements.max(0) as usize)
    }

    pub fn numdims(&self) -> Result<u32> {
        let mut ndims = 0;
        check(
            self.engine.as_ref(),
            "af_get_numdims",
            self.engine.get_numdims(&mut ndims, self.handle),
        )?;
        Ok(ndims)
    }

    /// Copy the array's elements to the host, column-major
    pub fn to_host<T: FromEngine>(&self) -> Result<Vec<T>> {
        self.read_host::<T>(T::DTYPE)
    }

    /// Copy a b8 array to the host; any nonzero byte reads as `true`
    pub fn to_host_bool(&self) -> Result<Vec<bool>> {
        let bytes = self.read_host::<u8>(DType::B8)?;
        Ok(bytes.into_iter().map(|b| b != 0).collect())
    }

    fn read_host<T: FromEngine>(&self, expected: DType) -> Result<Vec<T>> {
        let actual = self.dtype()?;
        if actual != expected {
            return Err(Error::DTypeMismatch { expected, actual });
        }
        debug_assert_eq!(std::mem::size_of::<T>(), expected.size());

        let mut host = vec![T::default(); self.elements()?];
        // FromEngine guarantees any engine-written bytes are a valid T
        let bytes = unsafe {
            std::slice::from_raw_parts_mut(
                host.as_mut_ptr() as *mut u8,
                std::mem::size_of_val(host.as_slice()),
            )
        };
        check(
            self.engine.as_ref(),
            "af_get_data_ptr",
            self.engine.get_data(bytes, self.handle),
        )?;
        Ok(host)
    }

    /// Take a second engine reference to the same data
    pub fn try_clone(&self) -> Result<Self> {
        let handle = self.handle;
        call_out(&self.engine, "af_retain_array", |engine, out| {
            engine.retain_array(out, handle)
        })
    }
}

impl Drop for Array {
    fn drop(&mut self) {
        if self.handle.is_null() {
            return;
        }
        let code = self.engine.release_array(self.handle);
        if code != AF_SUCCESS {
            tracing::warn!(
                code,
                message = %self.engine.error_message(code),
                "failed to release array"
            );
        }
    }
}

impl fmt::Debug for Array {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Array")
            .field("handle", &self.handle)
            .field("engine", &self.engine.name())
            .finish()
    }
}
