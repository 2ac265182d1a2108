//! Native cosine bindings.
//!
//! Two independent ways to call a native `cos` wrapper from Rust:
//!
//! - [`extension`]: the native translation unit is compiled by the build
//!   script and link-edited into the crate. The symbol resolves at build
//!   time and marshalling is fixed by a compile-time declaration.
//! - [`dynamic`]: a shared library is loaded at process runtime and the
//!   exported symbol is bound through an explicitly declared signature,
//!   since the dynamic loader carries no type information.
//!
//! Both expose the same logical operation, `cos_func(x: f64) -> f64`, and
//! both execute the same translation unit, `native/cos_func.c`.
//!
//! # Example
//!
//! ```rust
//! use cosbind::extension;
//!
//! assert_eq!(extension::cos_func(0.0), 1.0);
//! ```
//!
//! The dynamic path goes through a declared signature instead:
//!
//! ```ignore
//! use cosbind::dynamic::CosLibrary;
//!
//! let lib = CosLibrary::open("lib/libcos.so")?;
//! let y = lib.cos_func(0.5)?;
//! ```

pub mod dynamic;
pub mod error;
pub mod extension;

// Re-export commonly used types
pub use dynamic::{CSignature, CType, CValue, CosLibrary, SharedLibrary};
pub use error::{BindError, BindResult};
