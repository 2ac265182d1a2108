//! Dynamic library binding for the native cosine function.
//!
//! The shared library is loaded at process runtime, so the loader has no
//! compile-time knowledge of argument or return types. The caller declares
//! them with a [`CSignature`] colocated with the binding site; a wrong
//! declaration is undefined behavior, not a caught error. The descriptor
//! makes the hazard visible, it cannot make it checked.
//!
//! ```text
//! CosLibrary::open("lib/libcos.so")
//!       │
//!       ▼
//! SharedLibrary (libloading handle, symbol cache)
//!       │
//!       ▼
//! BoundFn (resolved address + declared CSignature)
//!       │
//!       ▼
//! Native call
//! ```
//!
//! # Example
//!
//! ```ignore
//! let lib = SharedLibrary::open("lib/libcos.so")?;
//! let cos = lib.bind(CSignature::new("cos_func", vec![CType::F64], CType::F64))?;
//! let y = cos.call_f64(0.5)?;
//! ```

mod cos;
mod loader;
mod types;

pub use cos::{cos_func, CosLibrary, DEFAULT_LIBRARY_PATH};
pub use loader::{find_library, BoundFn, SharedLibrary};
pub use types::{CSignature, CType, CValue};

#[cfg(test)]
mod tests;
