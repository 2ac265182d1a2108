//! Dynamic binding tests.
//!
//! The shared library under test is built by the build script from
//! `native/cos_func.c`; its path arrives through the `COS_SHARED_LIBRARY`
//! env var.

use super::*;
use crate::error::BindError;

fn shared_library() -> &'static str {
    env!("COS_SHARED_LIBRARY")
}

fn cos_signature() -> CSignature {
    CSignature::new("cos_func", vec![CType::F64], CType::F64)
}

#[test]
fn test_ctype_properties() {
    assert_eq!(CType::Void.size(), 0);
    assert_eq!(CType::I32.size(), 4);
    assert_eq!(CType::F64.size(), 8);

    assert!(CType::I64.is_integer());
    assert!(!CType::I64.is_float());

    assert!(CType::F64.is_float());
    assert!(!CType::F64.is_integer());

    assert!(!CType::Void.is_integer());
    assert!(!CType::Void.is_float());
}

#[test]
fn test_ctype_display() {
    assert_eq!(CType::F64.to_string(), "double");
    assert_eq!(CType::F32.to_string(), "float");
    assert_eq!(CType::I32.to_string(), "int");
    assert_eq!(CType::Void.to_string(), "void");
}

#[test]
fn test_cvalue_marshalling() {
    assert_eq!(CValue::F64(1.5).as_f64(), 1.5);
    assert_eq!(CValue::I64(2).as_f64(), 2.0);

    assert_eq!(CValue::I64(-7).as_i64().unwrap(), -7);

    // No silent float-to-integer coercion.
    let err = CValue::F64(1.5).as_i64().unwrap_err();
    assert!(matches!(
        err,
        BindError::Convert {
            declared: CType::I64,
            got: CType::F64
        }
    ));
}

#[test]
fn test_signature_display() {
    assert_eq!(cos_signature().to_string(), "double cos_func(double)");

    let sig = CSignature::new("atan2", vec![CType::F64, CType::F64], CType::F64);
    assert_eq!(sig.to_string(), "double atan2(double, double)");
}

#[test]
fn test_signature_arity() {
    let sig = cos_signature();
    assert!(sig.validate_args(1));
    assert!(!sig.validate_args(0));
    assert!(!sig.validate_args(2));
}

#[test]
fn test_missing_library_is_a_load_error() {
    let err = SharedLibrary::open("no/such/libmissing.so").unwrap_err();
    assert!(matches!(err, BindError::Load { .. }));
}

#[test]
fn test_unknown_name_is_not_found() {
    assert!(find_library("no_such_library_cosbind").is_none());

    let err = SharedLibrary::search("no_such_library_cosbind").unwrap_err();
    assert!(matches!(err, BindError::NotFound(_)));
}

#[test]
fn test_find_library_accepts_existing_path() {
    let found = find_library(shared_library()).expect("built library should be found");
    assert_eq!(found.to_string_lossy(), shared_library());
}

#[test]
fn test_missing_symbol_is_a_lookup_error() {
    let lib = SharedLibrary::open(shared_library()).expect("built library should load");
    let sig = CSignature::new("no_such_symbol", vec![CType::F64], CType::F64);

    let err = lib.bind(sig).unwrap_err();
    assert!(matches!(err, BindError::Symbol { .. }));
}

#[test]
fn test_cos_func_matches_std() {
    let lib = SharedLibrary::open(shared_library()).expect("built library should load");
    let cos = lib.bind(cos_signature()).expect("cos_func should bind");

    assert_eq!(cos.call_f64(0.0).unwrap(), 1.0);
    for x in [-2.5, -0.5, 0.5, 1.0, std::f64::consts::PI] {
        let y = cos.call_f64(x).unwrap();
        assert!((y - x.cos()).abs() < 1e-12, "x = {}", x);
    }
}

#[test]
fn test_integer_argument_widens_to_double() {
    let lib = SharedLibrary::open(shared_library()).expect("built library should load");
    let cos = lib.bind(cos_signature()).expect("cos_func should bind");

    let result = cos.call(&[CValue::I64(0)]).unwrap();
    assert_eq!(result, CValue::F64(1.0));
}

#[test]
fn test_arity_mismatch_is_rejected() {
    let lib = SharedLibrary::open(shared_library()).expect("built library should load");
    let cos = lib.bind(cos_signature()).expect("cos_func should bind");

    let err = cos.call(&[]).unwrap_err();
    assert!(matches!(err, BindError::ArgCount { declared: 1, got: 0 }));
}

#[test]
fn test_unsupported_shape_is_rejected_at_call_time() {
    let lib = SharedLibrary::open(shared_library()).expect("built library should load");

    // The loader has no type metadata, so a bogus declaration binds fine;
    // only the call is refused.
    let sig = CSignature::new("cos_func", vec![CType::F32], CType::F32);
    let bound = lib.bind(sig).expect("declarations are not checked at bind time");

    let err = bound.call(&[CValue::F64(0.5)]).unwrap_err();
    assert!(matches!(err, BindError::UnsupportedSignature(_)));
}

#[test]
fn test_float_does_not_convert_to_declared_integer() {
    let lib = SharedLibrary::open(shared_library()).expect("built library should load");

    let sig = CSignature::new("cos_func", vec![CType::I64], CType::I64);
    let bound = lib.bind(sig).expect("declarations are not checked at bind time");

    let err = bound.call(&[CValue::F64(1.5)]).unwrap_err();
    assert!(matches!(err, BindError::Convert { .. }));
}

#[cfg(unix)]
#[test]
fn test_process_wide_handle() {
    // The build script mirrors the library at lib/, the default load path,
    // and cargo runs tests from the package root.
    let y = cos_func(0.5).expect("process-wide handle should initialize");
    assert!((y - 0.5f64.cos()).abs() < 1e-12);

    // Same handle on every call after initialization.
    assert_eq!(cos_func(0.5).unwrap().to_bits(), y.to_bits());
}

#[cfg(target_os = "linux")]
#[test]
fn test_libm_binary_shape() {
    // libm.so.6 should resolve through the platform loader on Linux.
    if let Ok(lib) = SharedLibrary::open("libm.so.6") {
        let sig = CSignature::new("atan2", vec![CType::F64, CType::F64], CType::F64);
        let atan2 = lib.bind(sig).expect("atan2 should bind");

        let result = atan2
            .call(&[CValue::F64(1.0), CValue::F64(2.0)])
            .expect("atan2 should be callable");
        match result {
            CValue::F64(v) => assert!((v - 1.0f64.atan2(2.0)).abs() < 1e-12),
            other => panic!("expected a double, got {:?}", other),
        }
    }
}

#[cfg(target_os = "linux")]
#[test]
fn test_libc_integer_shape() {
    if let Ok(lib) = SharedLibrary::open("libc.so.6") {
        let sig = CSignature::new("labs", vec![CType::I64], CType::I64);
        let labs = lib.bind(sig).expect("labs should bind");

        let result = labs.call(&[CValue::I64(-42)]).expect("labs should be callable");
        assert_eq!(result, CValue::I64(42));
    }
}
