//! The dynamically bound cosine operation.
//!
//! The shared library is loaded from a hard-coded relative path, with the
//! platform library search as the fallback acquisition method, and stays
//! loaded for the life of the process.

use std::path::Path;

use once_cell::sync::OnceCell;

use super::loader::{BoundFn, SharedLibrary};
use super::types::{CSignature, CType};
use crate::error::BindResult;

/// Relative path the shared cosine library is expected at.
pub const DEFAULT_LIBRARY_PATH: &str = "lib/libcos.so";

/// Name probed in the platform library search when the default path is
/// absent.
const LIBRARY_NAME: &str = "cos";

/// The declared signature of the exported symbol: `double cos_func(double)`.
fn cos_signature() -> CSignature {
    CSignature::new("cos_func", vec![CType::F64], CType::F64)
}

/// A shared cosine library with its exported function bound.
#[derive(Debug)]
pub struct CosLibrary {
    library: SharedLibrary,
    func: BoundFn,
}

impl CosLibrary {
    /// Load the library from an explicit filesystem path and bind
    /// `cos_func`.
    pub fn open(path: impl AsRef<Path>) -> BindResult<Self> {
        Self::from_library(SharedLibrary::open(path)?)
    }

    /// Locate the library through the platform search paths and bind
    /// `cos_func`.
    pub fn search(name: &str) -> BindResult<Self> {
        Self::from_library(SharedLibrary::search(name)?)
    }

    fn from_library(library: SharedLibrary) -> BindResult<Self> {
        let func = library.bind(cos_signature())?;
        Ok(Self { library, func })
    }

    /// Path of the underlying shared library.
    pub fn path(&self) -> &Path {
        self.library.path()
    }

    /// Compute the cosine of `x` through the bound symbol.
    pub fn cos_func(&self, x: f64) -> BindResult<f64> {
        self.func.call_f64(x)
    }
}

/// Process-wide library handle. Initialized on first use, read-only after
/// that, and never unloaded. Sharing it across threads is sound only
/// because the wrapped function is stateless and reentrant, an assumption
/// the binding relies on rather than one it enforces.
static SHARED: OnceCell<CosLibrary> = OnceCell::new();

/// Compute the cosine of `x` through the process-wide library handle.
///
/// The handle is initialized on first call from [`DEFAULT_LIBRARY_PATH`],
/// falling back to the platform library search for `cos`. A load failure
/// is returned to the caller and initialization is retried on the next
/// call.
pub fn cos_func(x: f64) -> BindResult<f64> {
    let lib = SHARED.get_or_try_init(|| {
        CosLibrary::open(DEFAULT_LIBRARY_PATH).or_else(|_| CosLibrary::search(LIBRARY_NAME))
    })?;
    lib.cos_func(x)
}
