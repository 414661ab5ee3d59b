//! Logging shim.
//!
//! Forwards to `defmt` when the `defmt` feature is enabled, to `log` when
//! only the `log` feature is enabled, and compiles to nothing otherwise.
//! Arguments are still borrowed in the silent case so callers never see
//! unused-variable warnings.

#![allow(unused_macros)]

macro_rules! log_forward {
    ($level:ident, $s:literal $(, $x:expr)* $(,)?) => {
        {
            #[cfg(feature = "defmt")]
            ::defmt::$level!($s $(, $x)*);
            #[cfg(all(feature = "log", not(feature = "defmt")))]
            ::log::$level!($s $(, $x)*);
            #[cfg(not(any(feature = "defmt", feature = "log")))]
            let _ = ($( & $x ),*);
        }
    };
}

macro_rules! trace {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_forward!(trace, $s $(, $x)*)
    };
}

macro_rules! debug {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_forward!(debug, $s $(, $x)*)
    };
}

macro_rules! info {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_forward!(info, $s $(, $x)*)
    };
}

macro_rules! warn {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_forward!(warn, $s $(, $x)*)
    };
}

macro_rules! error {
    ($s:literal $(, $x:expr)* $(,)?) => {
        log_forward!(error, $s $(, $x)*)
    };
}
