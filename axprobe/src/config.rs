//! Build-time probe target
//!
//! The library and symbol are compile-time constants. `AXPROBE_LIBRARY` and
//! `AXPROBE_SYMBOL` in the build environment replace the defaults.

/// ApplicationServices umbrella framework binary
pub const DEFAULT_LIBRARY: &str =
    "/System/Library/Frameworks/ApplicationServices.framework/ApplicationServices";

/// Accessibility trust check exported by HIServices through ApplicationServices
pub const DEFAULT_SYMBOL: &str = "AXIsProcessTrustedWithOptions";

/// Library path and symbol name to probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeTarget<'a> {
    pub library: &'a str,
    pub symbol: &'a str,
}

impl ProbeTarget<'static> {
    /// The target baked in at build time
    pub const BUILT_IN: ProbeTarget<'static> = ProbeTarget {
        library: match option_env!("AXPROBE_LIBRARY") {
            Some(library) => library,
            None => DEFAULT_LIBRARY,
        },
        symbol: match option_env!("AXPROBE_SYMBOL") {
            Some(symbol) => symbol,
            None => DEFAULT_SYMBOL,
        },
    };
}

impl<'a> ProbeTarget<'a> {
    pub fn new(library: &'a str, symbol: &'a str) -> Self {
        Self { library, symbol }
    }

    /// True if the library lives inside an Apple `.framework` bundle
    pub fn is_framework(&self) -> bool {
        self.library.contains(".framework/")
    }
}
