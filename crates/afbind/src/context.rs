//! Binding context: the engine every operation calls into
//!
//! A [`Context`] is a cheap, cloneable reference to one [`Engine`]. The
//! data operations live in [`crate::data`]; this module holds the call
//! plumbing they share and the engine-global random seed accessors.

use crate::array::Array;
use crate::error::{Error, Result};
use crate::ffi::sys::AF_SUCCESS;
use crate::ffi::{AfArray, AfErr, DynamicEngine, Engine, Status};
use afbind_config::{ConfigError, ConfigLoader, EngineConfig};
use std::fmt;
use std::sync::Arc;

/// Handle to an engine
#[derive(Clone)]
pub struct Context {
    engine: Arc<dyn Engine>,
}

impl Context {
    /// Wrap an engine
    pub fn new(engine: Arc<dyn Engine>) -> Self {
        Self { engine }
    }

    /// Load the library selected by `config` and apply its initial seed
    pub fn open(config: &EngineConfig) -> Result<Self> {
        let engine = DynamicEngine::from_config(config)?;
        let ctx = Self::new(Arc::new(engine));

        if let Some(seed) = config.seed() {
            ctx.set_seed(seed)?;
        }

        tracing::info!(
            engine = ctx.engine.name(),
            backend = %config.backend(),
            version = ?ctx.version(),
            "context opened"
        );
        Ok(ctx)
    }

    /// Open the engine configured for the current working directory
    ///
    /// Reads `afbind.toml` (searched upward), `~/.afbind/config.toml` and
    /// the `AFBIND_*` environment variables.
    pub fn from_env() -> Result<Self> {
        let cwd = std::env::current_dir().map_err(ConfigError::from)?;
        let config = ConfigLoader::new().load_from_directory(&cwd)?;
        Self::open(&config.settings)
    }

    pub fn engine(&self) -> &Arc<dyn Engine> {
        &self.engine
    }

    /// Engine library version, when the engine reports one
    pub fn version(&self) -> Option<(i32, i32, i32)> {
        self.engine.version()
    }

    /// Set the engine-global random seed
    pub fn set_seed(&self, seed: u64) -> Result<()> {
        check(self.engine.as_ref(), "af_set_seed", self.engine.set_seed(seed))
    }

    /// Read the engine-global random seed
    pub fn get_seed(&self) -> Result<u64> {
        let mut seed = 0;
        check(self.engine.as_ref(), "af_get_seed", self.engine.get_seed(&mut seed))?;
        Ok(seed)
    }

    /// Run one foreign call that populates a fresh output handle
    pub(crate) fn call_out<F>(&self, op: &'static str, call: F) -> Result<Array>
    where
        F: FnOnce(&dyn Engine, &mut AfArray) -> AfErr,
    {
        call_out(&self.engine, op, call)
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Context")
            .field("engine", &self.engine.name())
            .finish()
    }
}

/// Map a status code to `Ok` or an engine error with the engine's message
pub(crate) fn check(engine: &dyn Engine, op: &'static str, code: AfErr) -> Result<()> {
    if code == AF_SUCCESS {
        tracing::debug!(op, "engine call succeeded");
        return Ok(());
    }

    let message = engine.error_message(code);
    let status = Status::from_code(code);
    tracing::debug!(op, code, %status, %message, "engine call failed");
    Err(Error::Engine {
        op,
        status,
        code,
        message,
    })
}

/// Allocate an empty output handle, run `call`, and wrap the result
///
/// On failure any handle the engine wrote is released before the error
/// is returned.
pub(crate) fn call_out<F>(engine: &Arc<dyn Engine>, op: &'static str, call: F) -> Result<Array>
where
    F: FnOnce(&dyn Engine, &mut AfArray) -> AfErr,
{
    let mut out = OutHandle::new(engine);
    let code = call(engine.as_ref(), &mut out.raw);
    check(engine.as_ref(), op, code)?;
    Ok(out.into_array())
}

/// Output slot that releases its handle unless it is turned into an [`Array`]
struct OutHandle<'a> {
    engine: &'a Arc<dyn Engine>,
    raw: AfArray,
}

impl<'a> OutHandle<'a> {
    fn new(engine: &'a Arc<dyn Engine>) -> Self {
        Self {
            engine,
            raw: std::ptr::null_mut(),
        }
    }

    fn into_array(mut self) -> Array {
        let raw = std::mem::replace(&mut self.raw, std::ptr::null_mut());
        Array::from_raw(Arc::clone(self.engine), raw)
    }
}

impl Drop for OutHandle<'_> {
    fn drop(&mut self) {
        if !self.raw.is_null() {
            let code = self.engine.release_array(self.raw);
            if code != AF_SUCCESS {
                tracing::warn!(code, "failed to release partial output handle");
            }
        }
    }
}
