//! Small crate-wide convenience macros.

/// Debug-level log line routed through the `log` facade.  In the browser the
/// console logger from [`crate::logging`] picks it up; in native builds it is
/// discarded unless the embedding binary installs its own logger.
///
/// ```rust,ignore
/// debug_log!("picker {} selection: {:?}", name, ids);
/// ```
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}
