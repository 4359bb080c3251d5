//! Runtime settings shared by every dialog opened through one
//! [`crate::env::DialogEnv`].

use log::LevelFilter;

use crate::constants::AUTO_CONFIRM_DELAY_MS;

#[derive(Debug, Clone, PartialEq)]
pub struct DialogSettings {
    /// Delay before a suppressed confirm dialog confirms itself.
    pub auto_confirm_delay_ms: u32,
    /// Honour custom object filters given as JavaScript source text.  Off by
    /// default; the predicate capability is the supported path.
    pub allow_legacy_filter_source: bool,
    /// Console log level installed by the wasm start hook.
    pub log_level: LevelFilter,
}

impl Default for DialogSettings {
    fn default() -> Self {
        Self {
            auto_confirm_delay_ms: AUTO_CONFIRM_DELAY_MS,
            allow_legacy_filter_source: false,
            log_level: LevelFilter::Info,
        }
    }
}

impl DialogSettings {
    /// Settings baked in at build time: `DIALOG_LOG_LEVEL` (e.g. `debug`) and
    /// `DIALOG_LEGACY_FILTERS=1` are read via `option_env!`.
    pub fn from_build_env() -> Self {
        let mut settings = Self::default();
        if let Some(level) = option_env!("DIALOG_LOG_LEVEL").and_then(|l| l.parse().ok()) {
            settings.log_level = level;
        }
        if let Some(flag) = option_env!("DIALOG_LEGACY_FILTERS") {
            settings.allow_legacy_filter_source = matches!(flag, "1" | "true" | "yes");
        }
        settings
    }

    pub fn with_auto_confirm_delay(mut self, delay_ms: u32) -> Self {
        self.auto_confirm_delay_ms = delay_ms;
        self
    }

    pub fn with_legacy_filter_source(mut self, allow: bool) -> Self {
        self.allow_legacy_filter_source = allow;
        self
    }
}
