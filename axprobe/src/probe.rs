//! The symbol probe
//!
//! Opens a library with immediate binding, looks one symbol up, and releases
//! the library before returning. Failing to open the library is the only
//! error; a missing symbol is a [`ProbeReport::NotFound`].

use crate::config::ProbeTarget;
use crate::dl::{Library, Loader, Lookup, SystemLoader};
use crate::domain::{BindingMode, ProbeError, ProbeReport};
use log::{debug, warn};

/// Probe `target` with the platform loader.
///
/// # Errors
/// - [`ProbeError::LibraryLoad`] if the library cannot be opened
/// - [`ProbeError::InvalidTarget`] if the path or symbol contains a NUL byte
pub fn probe(target: &ProbeTarget<'_>) -> Result<ProbeReport, ProbeError> {
    probe_with(&SystemLoader, target)
}

/// Probe `target` with any [`Loader`].
///
/// The handle is released exactly once when the library was opened, and
/// never when it was not.
///
/// # Errors
/// Same as [`probe`].
pub fn probe_with<L: Loader>(
    loader: &L,
    target: &ProbeTarget<'_>,
) -> Result<ProbeReport, ProbeError> {
    let library = Library::open(loader, target.library, BindingMode::Now)?;
    debug!("loaded {}", library.path());

    // Release happens on drop if the lookup bails out early
    let lookup = library.lookup(target.symbol)?;

    if let Err(reason) = library.close() {
        warn!("dlclose({}) failed: {reason}", target.library);
    }

    let symbol = target.symbol.to_string();
    Ok(match lookup {
        Lookup::Resolved(address) => ProbeReport::Found { symbol, address },
        Lookup::Missing(reason) => ProbeReport::NotFound { symbol, reason },
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dl::testing::CountingLoader;
    use crate::domain::SymbolAddress;

    const LIB: &str = "/System/Library/Frameworks/ApplicationServices.framework/ApplicationServices";
    const SYMBOL: &str = "AXIsProcessTrustedWithOptions";

    #[test]
    fn test_symbol_found() {
        let loader = CountingLoader::with_library(LIB, &[(SYMBOL, 0x7ff8_0000_1234)]);
        let report = probe_with(&loader, &ProbeTarget::new(LIB, SYMBOL)).unwrap();

        assert_eq!(
            report,
            ProbeReport::Found {
                symbol: SYMBOL.to_string(),
                address: SymbolAddress(0x7ff8_0000_1234)
            }
        );
        assert_eq!(report.to_string(), "AXIsProcessTrustedWithOptions Found, Addr: 0x7ff800001234");
        assert_eq!(loader.opens.get(), 1);
        assert_eq!(loader.closes.get(), 1);
    }

    #[test]
    fn test_symbol_not_found_still_releases() {
        let loader = CountingLoader::with_library(LIB, &[]);
        let report = probe_with(&loader, &ProbeTarget::new(LIB, SYMBOL)).unwrap();

        assert!(!report.is_found());
        assert!(report.to_string().starts_with("AXIsProcessTrustedWithOptions Not Found: "));
        assert_eq!(loader.closes.get(), 1);
    }

    #[test]
    fn test_null_address_counts_as_found() {
        let loader = CountingLoader::with_library(LIB, &[(SYMBOL, 0)]);
        let report = probe_with(&loader, &ProbeTarget::new(LIB, SYMBOL)).unwrap();
        assert_eq!(report.to_string(), "AXIsProcessTrustedWithOptions Found, Addr: 0x0");
    }

    #[test]
    fn test_load_failure_is_fatal_and_releases_nothing() {
        let loader = CountingLoader::default();
        let err = probe_with(&loader, &ProbeTarget::new(LIB, SYMBOL)).unwrap_err();

        assert!(err.to_string().starts_with("dlopen failed: "));
        assert_eq!(loader.opens.get(), 0);
        assert_eq!(loader.closes.get(), 0);
    }

    #[test]
    fn test_opens_with_immediate_binding() {
        let loader = CountingLoader::with_library(LIB, &[]);
        probe_with(&loader, &ProbeTarget::new(LIB, SYMBOL)).unwrap();
        assert_eq!(*loader.modes.borrow(), vec![BindingMode::Now]);
    }

    #[test]
    fn test_bad_symbol_name_releases_on_drop() {
        let loader = CountingLoader::with_library(LIB, &[]);
        let err = probe_with(&loader, &ProbeTarget::new(LIB, "AX\0Trusted")).unwrap_err();
        assert!(matches!(err, ProbeError::InvalidTarget(_)));
        assert_eq!(loader.closes.get(), 1);
    }

    #[test]
    fn test_failed_release_does_not_change_report() {
        let mut loader = CountingLoader::with_library(LIB, &[(SYMBOL, 0x1000)]);
        loader.fail_close = true;
        let report = probe_with(&loader, &ProbeTarget::new(LIB, SYMBOL)).unwrap();
        assert!(report.is_found());
        assert_eq!(loader.closes.get(), 1);
    }
}
