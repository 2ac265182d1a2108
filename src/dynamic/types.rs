//! Declared-type descriptors for dynamically bound functions.
//!
//! Dynamic loading provides no type metadata, so every bound symbol carries
//! an explicit [`CSignature`] declared by the caller. The declaration is
//! never inferred.

use std::fmt;

use crate::error::{BindError, BindResult};

/// Native scalar types the binding layer can marshal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CType {
    /// No value (return position only)
    Void,
    /// 32-bit signed integer (C `int`)
    I32,
    /// 64-bit signed integer (C `long long`)
    I64,
    /// 32-bit floating point (C `float`)
    F32,
    /// 64-bit floating point (C `double`)
    F64,
}

impl CType {
    /// Size in bytes of this type.
    pub fn size(&self) -> usize {
        match self {
            CType::Void => 0,
            CType::I32 | CType::F32 => 4,
            CType::I64 | CType::F64 => 8,
        }
    }

    /// Check if this type is an integer type.
    pub fn is_integer(&self) -> bool {
        matches!(self, CType::I32 | CType::I64)
    }

    /// Check if this type is a floating point type.
    pub fn is_float(&self) -> bool {
        matches!(self, CType::F32 | CType::F64)
    }
}

impl fmt::Display for CType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CType::Void => write!(f, "void"),
            CType::I32 => write!(f, "int"),
            CType::I64 => write!(f, "long long"),
            CType::F32 => write!(f, "float"),
            CType::F64 => write!(f, "double"),
        }
    }
}

/// A host value crossing the native boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CValue {
    /// 64-bit signed integer
    I64(i64),
    /// 64-bit floating point
    F64(f64),
}

impl CValue {
    /// The type this value carries on the host side.
    pub fn get_type(&self) -> CType {
        match self {
            CValue::I64(_) => CType::I64,
            CValue::F64(_) => CType::F64,
        }
    }

    /// Marshal into a native `double`. Integers widen; this conversion
    /// cannot fail for any host value.
    pub fn as_f64(&self) -> f64 {
        match self {
            CValue::I64(v) => *v as f64,
            CValue::F64(v) => *v,
        }
    }

    /// Marshal into a native 64-bit integer. There is no silent
    /// float-to-integer path; a float here is a conversion error.
    pub fn as_i64(&self) -> BindResult<i64> {
        match self {
            CValue::I64(v) => Ok(*v),
            CValue::F64(_) => Err(BindError::Convert {
                declared: CType::I64,
                got: CType::F64,
            }),
        }
    }
}

/// Declared signature for a dynamically bound function.
///
/// Lives next to the binding site. Whether it matches the exported symbol
/// cannot be verified at runtime; the contract is the caller's.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CSignature {
    /// Exported symbol name
    pub name: String,
    /// Parameter types, in call order
    pub params: Vec<CType>,
    /// Return type
    pub ret: CType,
}

impl CSignature {
    /// Create a new function signature.
    pub fn new(name: impl Into<String>, params: Vec<CType>, ret: CType) -> Self {
        Self {
            name: name.into(),
            params,
            ret,
        }
    }

    /// Validate argument count against the declaration.
    pub fn validate_args(&self, arg_count: usize) -> bool {
        arg_count == self.params.len()
    }
}

impl fmt::Display for CSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}(", self.ret, self.name)?;
        for (i, param) in self.params.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}", param)?;
        }
        write!(f, ")")
    }
}
