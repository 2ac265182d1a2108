//! Shared-library loading and symbol binding.
//!
//! Wraps libloading: libraries are loaded by explicit path or located
//! through the platform search paths, and symbols are resolved by name and
//! paired with a declared [`CSignature`] before they can be called.

use std::collections::HashMap;
use std::env;
use std::ffi::CString;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use libloading::{Library, Symbol};
use log::{debug, trace};
use parking_lot::Mutex;

use super::types::{CSignature, CType, CValue};
use crate::error::{BindError, BindResult};

/// A shared library loaded into the process.
///
/// The mapping stays alive for as long as the library or any function bound
/// from it exists; there is no explicit unload.
#[derive(Debug)]
pub struct SharedLibrary {
    /// Path the library was loaded from
    path: PathBuf,
    /// The loaded library handle
    library: Arc<Library>,
    /// Resolved symbol addresses, by name
    symbols: Mutex<HashMap<String, usize>>,
}

impl SharedLibrary {
    /// Load a library from an explicit filesystem path.
    pub fn open(path: impl AsRef<Path>) -> BindResult<Self> {
        let path = path.as_ref().to_path_buf();

        // Safety: loading a shared object runs arbitrary initializer code.
        // The caller vouches for the library behind this path.
        let library = unsafe {
            Library::new(&path).map_err(|source| BindError::Load {
                path: path.clone(),
                source,
            })?
        };
        debug!("loaded shared library {}", path.display());

        Ok(Self {
            path,
            library: Arc::new(library),
            symbols: Mutex::new(HashMap::new()),
        })
    }

    /// Locate a library through the platform search paths and load it.
    ///
    /// `name` may be a bare name (`"cos"`), a platform filename
    /// (`"libcos.so"`), or an existing path.
    pub fn search(name: &str) -> BindResult<Self> {
        let path = find_library(name).ok_or_else(|| BindError::NotFound(name.to_string()))?;
        Self::open(path)
    }

    /// Path this library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Resolve a symbol and pair it with the declared signature.
    ///
    /// The declaration is taken on faith: the loader cannot compare it
    /// against the exported function, and a mismatch makes later calls
    /// undefined behavior.
    pub fn bind(&self, signature: CSignature) -> BindResult<BoundFn> {
        let addr = self.symbol_addr(&signature.name)?;
        debug!("bound {} from {}", signature, self.path.display());

        Ok(BoundFn {
            signature,
            addr,
            _library: Arc::clone(&self.library),
        })
    }

    /// Resolve a symbol address, consulting the per-library cache first.
    fn symbol_addr(&self, name: &str) -> BindResult<usize> {
        if let Some(&addr) = self.symbols.lock().get(name) {
            return Ok(addr);
        }

        let c_name =
            CString::new(name).map_err(|_| BindError::InvalidSymbol(name.to_string()))?;

        // Safety: resolution only yields an address; nothing is called
        // until a signature has been declared for it.
        let symbol: Symbol<*const ()> = unsafe {
            self.library
                .get(c_name.as_bytes_with_nul())
                .map_err(|source| BindError::Symbol {
                    name: name.to_string(),
                    path: self.path.clone(),
                    source,
                })?
        };

        let addr = *symbol as usize;
        self.symbols.lock().insert(name.to_string(), addr);
        Ok(addr)
    }
}

/// A native function resolved from a [`SharedLibrary`] together with its
/// declared signature.
#[derive(Debug)]
pub struct BoundFn {
    /// The declared signature
    signature: CSignature,
    /// Resolved symbol address
    addr: usize,
    /// Keeps the library mapped while this callable exists
    _library: Arc<Library>,
}

impl BoundFn {
    /// The signature this function was declared with.
    pub fn signature(&self) -> &CSignature {
        &self.signature
    }

    /// Call through the declared signature.
    ///
    /// Arguments are marshalled into their declared native types, then the
    /// call is dispatched to a concrete `extern "C"` function type. Each
    /// supported shape needs its own arm because argument widths must be
    /// known at compile time.
    pub fn call(&self, args: &[CValue]) -> BindResult<CValue> {
        if !self.signature.validate_args(args.len()) {
            return Err(BindError::ArgCount {
                declared: self.signature.params.len(),
                got: args.len(),
            });
        }
        trace!("calling {}", self.signature);

        match (self.signature.params.as_slice(), self.signature.ret) {
            ([CType::F64], CType::F64) => {
                type UnaryF64 = unsafe extern "C" fn(f64) -> f64;
                let x = args[0].as_f64();
                // Safety: shape declared by the caller; a wrong declaration
                // is undefined behavior by contract.
                let f: UnaryF64 = unsafe { std::mem::transmute(self.addr) };
                Ok(CValue::F64(unsafe { f(x) }))
            }
            ([CType::F64, CType::F64], CType::F64) => {
                type BinaryF64 = unsafe extern "C" fn(f64, f64) -> f64;
                let x = args[0].as_f64();
                let y = args[1].as_f64();
                let f: BinaryF64 = unsafe { std::mem::transmute(self.addr) };
                Ok(CValue::F64(unsafe { f(x, y) }))
            }
            ([CType::I64], CType::I64) => {
                type UnaryI64 = unsafe extern "C" fn(i64) -> i64;
                let x = args[0].as_i64()?;
                let f: UnaryI64 = unsafe { std::mem::transmute(self.addr) };
                Ok(CValue::I64(unsafe { f(x) }))
            }
            _ => Err(BindError::UnsupportedSignature(self.signature.clone())),
        }
    }

    /// Typed wrapper for the common `double -> double` case.
    pub fn call_f64(&self, x: f64) -> BindResult<f64> {
        match self.call(&[CValue::F64(x)])? {
            CValue::F64(v) => Ok(v),
            other => Err(BindError::Convert {
                declared: CType::F64,
                got: other.get_type(),
            }),
        }
    }
}

/// Find a library by name in the platform search paths.
///
/// An existing path is returned as-is; otherwise the platform-specific
/// filename is probed in each search directory.
pub fn find_library(name: &str) -> Option<PathBuf> {
    let direct = Path::new(name);
    if direct.exists() {
        return Some(direct.to_path_buf());
    }

    let filename = library_filename(name);
    search_paths()
        .into_iter()
        .map(|dir| dir.join(&filename))
        .find(|candidate| candidate.exists())
}

/// The platform library search paths: the current directory, the standard
/// system directories, and the loader path environment variable.
fn search_paths() -> Vec<PathBuf> {
    let mut paths = Vec::new();

    if let Ok(cwd) = env::current_dir() {
        paths.push(cwd);
    }

    #[cfg(target_os = "linux")]
    {
        for dir in ["/lib", "/lib64", "/usr/lib", "/usr/lib64", "/usr/local/lib"] {
            paths.push(PathBuf::from(dir));
        }
        push_env_paths(&mut paths, "LD_LIBRARY_PATH", ':');
    }

    #[cfg(target_os = "macos")]
    {
        for dir in ["/usr/lib", "/usr/local/lib", "/opt/homebrew/lib"] {
            paths.push(PathBuf::from(dir));
        }
        push_env_paths(&mut paths, "DYLD_LIBRARY_PATH", ':');
    }

    #[cfg(target_os = "windows")]
    {
        paths.push(PathBuf::from("C:\\Windows\\System32"));
        push_env_paths(&mut paths, "PATH", ';');
    }

    paths
}

#[allow(dead_code)] // unused on platforms without a loader path variable
fn push_env_paths(paths: &mut Vec<PathBuf>, var: &str, separator: char) {
    if let Ok(value) = env::var(var) {
        paths.extend(
            value
                .split(separator)
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
        );
    }
}

/// Construct the platform-specific library filename.
///
/// Names that already look like library filenames (`libm.so.6`,
/// `cos.dll`) pass through unchanged.
fn library_filename(name: &str) -> String {
    #[cfg(target_os = "linux")]
    {
        if name.starts_with("lib") && name.contains(".so") {
            name.to_string()
        } else {
            format!("lib{}.so", name)
        }
    }

    #[cfg(target_os = "macos")]
    {
        if name.starts_with("lib") && (name.ends_with(".dylib") || name.contains(".so")) {
            name.to_string()
        } else {
            format!("lib{}.dylib", name)
        }
    }

    #[cfg(target_os = "windows")]
    {
        if name.ends_with(".dll") {
            name.to_string()
        } else {
            format!("{}.dll", name)
        }
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        name.to_string()
    }
}
