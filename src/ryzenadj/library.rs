use super::{Field, PerformanceMode, RyzenAdj};
use crate::error::{Error, Result};
use std::ffi::{c_float, c_int, c_void};
use std::path::Path;

pub const DEFAULT_LIBRARY: &str = "/usr/lib64/libryzenadj.so";

type Access = *mut c_void;
type InitFn = unsafe extern "C" fn() -> Access;
type CleanupFn = unsafe extern "C" fn(Access);
type RefreshFn = unsafe extern "C" fn(Access) -> c_int;
type GetFn = unsafe extern "C" fn(Access) -> c_float;
type SetFn = unsafe extern "C" fn(Access, u32) -> c_int;
type EnableFn = unsafe extern "C" fn(Access) -> c_int;

/// Session backed by the native libryzenadj shared library.
///
/// All symbols are resolved up front so a library missing a tunable fails
/// at startup rather than halfway through applying a profile.
pub struct RyzenAdjLibrary {
    access: Access,
    refresh: RefreshFn,
    getters: Vec<GetFn>,
    setters: Vec<SetFn>,
    max_performance: EnableFn,
    power_saving: EnableFn,
    cleanup: Option<CleanupFn>,
    // Keeps the function pointers above valid.
    _lib: libloading::Library,
}

fn symbol<T: Copy>(lib: &libloading::Library, name: &str) -> Result<T> {
    // SAFETY: every symbol type above matches the prototype in ryzenadj.h.
    let sym = unsafe { lib.get::<T>(name.as_bytes()) }.map_err(|e| Error::Symbol {
        symbol: name.to_string(),
        source: e,
    })?;
    Ok(*sym)
}

impl RyzenAdjLibrary {
    /// Load the library at `path` and initialize a ryzenadj handle.
    pub fn open(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "loading ryzenadj");

        // SAFETY: loading runs the library's initializers; libryzenadj has none
        // beyond its own static state.
        let lib = unsafe { libloading::Library::new(path) }.map_err(|e| Error::LibraryLoad {
            path: path.to_path_buf(),
            source: e,
        })?;

        let init: InitFn = symbol(&lib, "init_ryzenadj")?;
        let refresh: RefreshFn = symbol(&lib, "refresh_table")?;

        let mut getters = Vec::with_capacity(Field::ALL.len());
        let mut setters = Vec::with_capacity(Field::ALL.len());
        for field in Field::ALL {
            getters.push(symbol::<GetFn>(&lib, field.getter())?);
            setters.push(symbol::<SetFn>(&lib, field.setter())?);
        }

        let max_performance: EnableFn = symbol(&lib, PerformanceMode::MaxPerformance.symbol())?;
        let power_saving: EnableFn = symbol(&lib, PerformanceMode::PowerSaving.symbol())?;
        let cleanup = symbol::<CleanupFn>(&lib, "cleanup_ryzenadj").ok();

        // SAFETY: init_ryzenadj takes no arguments and returns NULL on failure.
        let access = unsafe { init() };
        if access.is_null() {
            return Err(Error::Init);
        }

        Ok(Self {
            access,
            refresh,
            getters,
            setters,
            max_performance,
            power_saving,
            cleanup,
            _lib: lib,
        })
    }
}

impl RyzenAdj for RyzenAdjLibrary {
    fn refresh(&mut self) -> i32 {
        // SAFETY: `access` is a live handle from init_ryzenadj.
        let res = unsafe { (self.refresh)(self.access) };
        tracing::debug!(res, "refresh_table");
        res
    }

    fn get(&mut self, field: Field) -> f32 {
        // SAFETY: as above.
        let value = unsafe { (self.getters[field as usize])(self.access) };
        tracing::debug!(symbol = field.getter(), value, "read");
        value
    }

    fn set(&mut self, field: Field, value: u32) -> i32 {
        // SAFETY: as above.
        let res = unsafe { (self.setters[field as usize])(self.access, value) };
        tracing::debug!(symbol = field.setter(), value, res, "write");
        res
    }

    fn enable(&mut self, mode: PerformanceMode) -> i32 {
        let f = match mode {
            PerformanceMode::MaxPerformance => self.max_performance,
            PerformanceMode::PowerSaving => self.power_saving,
        };
        // SAFETY: as above.
        let res = unsafe { f(self.access) };
        tracing::debug!(symbol = mode.symbol(), res, "enable");
        res
    }
}

impl Drop for RyzenAdjLibrary {
    fn drop(&mut self) {
        if let Some(cleanup) = self.cleanup {
            // SAFETY: the handle is released exactly once, before the library unloads.
            unsafe { cleanup(self.access) };
        }
    }
}
