//! Extension binding for the native cosine function.
//!
//! The build script compiles `native/cos_func.c` into a static archive and
//! link-edits it into this crate, so the symbol resolves at build time and
//! marshalling is fixed once by the declaration below rather than per call.
//! A missing or broken translation unit is a build error, never a runtime
//! one.

mod sys {
    use libc::c_double;

    extern "C" {
        pub fn cos_func(x: c_double) -> c_double;
    }
}

/// Compute the cosine of `x` through the compiled-in native function.
///
/// Pure and total over `f64`: non-finite inputs follow the platform math
/// library (NaN propagates, `cos(±inf)` is NaN).
pub fn cos_func(x: f64) -> f64 {
    // Safety: the symbol comes from the archive built out of
    // native/cos_func.c and is defined for every f64 bit pattern.
    unsafe { sys::cos_func(x) }
}
