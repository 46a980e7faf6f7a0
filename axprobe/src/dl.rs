//! Dynamic loading
//!
//! A thin seam over the platform loader. [`Loader`] abstracts the three calls
//! the probe needs, [`SystemLoader`] implements them with
//! `dlopen`/`dlsym`/`dlerror`/`dlclose`, and [`Library`] ties a loaded handle
//! to a scope so it is released exactly once.
//!
//! `dlerror` keeps a single (thread-local) error string that is only reset by
//! reading it. A null `dlsym` result is ambiguous on its own, so every
//! lookup drains that string right before `dlsym` and reads it right after.

#![allow(unsafe_code)] // the platform loader is only reachable through FFI

use crate::domain::{BindingMode, ProbeError, SymbolAddress};
use log::{debug, warn};
use std::ffi::{c_void, CStr, CString};
use std::mem::ManuallyDrop;
use std::ptr::NonNull;

/// Description used when the loader fails without setting an error string
const UNKNOWN_ERROR: &str = "unknown error";

/// Result of looking a symbol up in an open library
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// The symbol exists. The address may legitimately be null.
    Resolved(SymbolAddress),
    /// The loader reported an error for this lookup
    Missing(String),
}

/// Operations of a dynamic loader
pub trait Loader {
    /// Opaque reference to a loaded library
    type Handle;

    /// Load the library at `path`.
    ///
    /// # Errors
    /// Returns the loader's description of why the library could not be loaded.
    fn open(&self, path: &CStr, mode: BindingMode) -> Result<Self::Handle, String>;

    /// Look `name` up in a library previously returned by [`Loader::open`].
    fn lookup(&self, handle: &Self::Handle, name: &CStr) -> Lookup;

    /// Release a handle.
    ///
    /// # Errors
    /// Returns the loader's description if the release failed.
    fn close(&self, handle: Self::Handle) -> Result<(), String>;
}

/// Handle returned by `dlopen`
#[derive(Debug)]
pub struct RawHandle(NonNull<c_void>);

/// Raw `dlsym`/`dlerror` pair used by [`SystemLoader::lookup`]
trait SymbolTable {
    /// Read and reset the error indicator
    fn take_error(&self) -> Option<String>;

    /// Look `name` up without touching the error indicator first
    fn find(&self, handle: NonNull<c_void>, name: &CStr) -> *mut c_void;
}

/// `<dlfcn.h>` on this thread
struct Dlfcn;

impl SymbolTable for Dlfcn {
    fn take_error(&self) -> Option<String> {
        // SAFETY: dlerror returns null or a NUL-terminated string that stays
        // valid until the next loader call on this thread; it is copied out
        // before any other loader call is made.
        unsafe {
            let msg = libc::dlerror();
            if msg.is_null() {
                None
            } else {
                Some(CStr::from_ptr(msg).to_string_lossy().into_owned())
            }
        }
    }

    fn find(&self, handle: NonNull<c_void>, name: &CStr) -> *mut c_void {
        // SAFETY: handle came from a successful dlopen and has not been closed
        unsafe { libc::dlsym(handle.as_ptr(), name.as_ptr()) }
    }
}

/// Look `name` up, telling a null address apart from a failed lookup
fn resolve<T: SymbolTable>(table: &T, handle: NonNull<c_void>, name: &CStr) -> Lookup {
    // Drop any error left over from earlier loader calls
    let _ = table.take_error();

    let addr = table.find(handle, name);

    match table.take_error() {
        Some(reason) => Lookup::Missing(reason),
        None => Lookup::Resolved(SymbolAddress::from(addr)),
    }
}

fn error_or_unknown() -> String {
    Dlfcn.take_error().unwrap_or_else(|| UNKNOWN_ERROR.to_string())
}

/// The platform dynamic loader (`<dlfcn.h>`)
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLoader;

impl Loader for SystemLoader {
    type Handle = RawHandle;

    fn open(&self, path: &CStr, mode: BindingMode) -> Result<RawHandle, String> {
        // SAFETY: path is a valid NUL-terminated string for the duration of the call
        let handle = unsafe { libc::dlopen(path.as_ptr(), mode.as_flag()) };
        NonNull::new(handle).map(RawHandle).ok_or_else(error_or_unknown)
    }

    fn lookup(&self, handle: &RawHandle, name: &CStr) -> Lookup {
        resolve(&Dlfcn, handle.0, name)
    }

    fn close(&self, handle: RawHandle) -> Result<(), String> {
        // SAFETY: handle came from a successful dlopen and is consumed here
        let rc = unsafe { libc::dlclose(handle.0.as_ptr()) };
        if rc == 0 {
            Ok(())
        } else {
            Err(error_or_unknown())
        }
    }
}

/// A loaded library, released when dropped
///
/// The handle is released through [`Library::close`] or on drop, whichever
/// comes first, and never twice.
pub struct Library<'a, L: Loader> {
    loader: &'a L,
    // Taken exactly once, by `close` or by `drop`
    handle: ManuallyDrop<L::Handle>,
    path: String,
}

impl<'a, L: Loader> Library<'a, L> {
    /// Open the library at `path`.
    ///
    /// # Errors
    /// - [`ProbeError::InvalidTarget`] if `path` contains a NUL byte
    /// - [`ProbeError::LibraryLoad`] if the loader rejects the library
    pub fn open(loader: &'a L, path: &str, mode: BindingMode) -> Result<Self, ProbeError> {
        let c_path = CString::new(path).map_err(|_| {
            ProbeError::InvalidTarget(format!("library path contains a NUL byte: {path:?}"))
        })?;

        debug!("dlopen({path}, {mode})");
        let handle = loader
            .open(&c_path, mode)
            .map_err(|reason| ProbeError::LibraryLoad { path: path.to_string(), reason })?;

        Ok(Self { loader, handle: ManuallyDrop::new(handle), path: path.to_string() })
    }

    /// Path the library was opened from
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Look `name` up in this library.
    ///
    /// # Errors
    /// Returns [`ProbeError::InvalidTarget`] if `name` contains a NUL byte.
    pub fn lookup(&self, name: &str) -> Result<Lookup, ProbeError> {
        let c_name = CString::new(name).map_err(|_| {
            ProbeError::InvalidTarget(format!("symbol name contains a NUL byte: {name:?}"))
        })?;

        let lookup = self.loader.lookup(&self.handle, &c_name);
        debug!("dlsym({}, {name}) -> {lookup:?}", self.path);
        Ok(lookup)
    }

    /// Release the handle now instead of at end of scope.
    ///
    /// # Errors
    /// Returns the loader's description if the release failed.
    pub fn close(self) -> Result<(), String> {
        let mut this = ManuallyDrop::new(self);
        let path = std::mem::take(&mut this.path);
        // SAFETY: `this` is never dropped, so `Drop` will not take the handle again
        let handle = unsafe { ManuallyDrop::take(&mut this.handle) };

        debug!("dlclose({path})");
        this.loader.close(handle)
    }
}

impl<L: Loader> Drop for Library<'_, L> {
    fn drop(&mut self) {
        // SAFETY: drop runs at most once and `close` skips it
        let handle = unsafe { ManuallyDrop::take(&mut self.handle) };

        debug!("dlclose({})", self.path);
        if let Err(reason) = self.loader.close(handle) {
            warn!("dlclose({}) failed: {reason}", self.path);
        }
    }
}
