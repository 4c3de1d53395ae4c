//! Internal logging macros.
//!
//! Events go through `tracing` (target `sqlstitch`) when the `tracing`
//! feature is enabled and compile to nothing otherwise.

macro_rules! stitch_debug {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::debug!(target: "sqlstitch", $($arg)*);
        }
    };
}

macro_rules! stitch_trace {
    ($($arg:tt)*) => {
        #[cfg(feature = "tracing")]
        {
            tracing::trace!(target: "sqlstitch", $($arg)*);
        }
    };
}

pub(crate) use stitch_debug;
pub(crate) use stitch_trace;
