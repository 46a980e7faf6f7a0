//! Domain types for the probe
//!
//! Newtype wrappers keep raw loader values out of function signatures.

use std::fmt;

/// Address a symbol resolved to
///
/// Stored as an integer so it can never be dereferenced by accident.
/// A null address is a legitimate lookup result, not a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolAddress(pub usize);

impl SymbolAddress {
    /// Returns true if the symbol resolved to address zero
    pub fn is_null(self) -> bool {
        self.0 == 0
    }
}

impl<T> From<*const T> for SymbolAddress {
    fn from(ptr: *const T) -> Self {
        SymbolAddress(ptr as usize)
    }
}

impl<T> From<*mut T> for SymbolAddress {
    fn from(ptr: *mut T) -> Self {
        SymbolAddress(ptr as usize)
    }
}

impl fmt::Display for SymbolAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#x}", self.0)
    }
}

/// How symbol references are bound when a library is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BindingMode {
    /// Resolve every undefined reference before `open` returns
    #[default]
    Now,
    /// Resolve function references on first use
    Lazy,
}

impl BindingMode {
    /// The `dlopen` mode flag for this binding mode
    pub fn as_flag(self) -> libc::c_int {
        match self {
            BindingMode::Now => libc::RTLD_NOW,
            BindingMode::Lazy => libc::RTLD_LAZY,
        }
    }
}

impl fmt::Display for BindingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BindingMode::Now => write!(f, "RTLD_NOW"),
            BindingMode::Lazy => write!(f, "RTLD_LAZY"),
        }
    }
}

/// Outcome of a lookup that got as far as a loaded library
///
/// The `Display` form is the single line the binary prints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeReport {
    Found { symbol: String, address: SymbolAddress },
    NotFound { symbol: String, reason: String },
}

impl ProbeReport {
    pub fn is_found(&self) -> bool {
        matches!(self, ProbeReport::Found { .. })
    }

    pub fn symbol(&self) -> &str {
        match self {
            ProbeReport::Found { symbol, .. } | ProbeReport::NotFound { symbol, .. } => symbol,
        }
    }
}

impl fmt::Display for ProbeReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeReport::Found { symbol, address } => {
                write!(f, "{symbol} Found, Addr: {address}")
            }
            ProbeReport::NotFound { symbol, reason } => {
                write!(f, "{symbol} Not Found: {reason}")
            }
        }
    }
}
