// Defaults shared by the dialog reducers - single source of truth for literals
pub const DEFAULT_WIZARD_SCHEDULE: &str = "{}";
pub const DEFAULT_CRON: &str = "* * * * *";

// Confirm dialog suppression
pub const MS_PER_MINUTE: i64 = 60_000;
pub const AUTO_CONFIRM_DELAY_MS: u32 = 100; // one host render tick is plenty

// Storage key separator: "<DialogKind>.<dialogName>"
pub const STORAGE_KEY_SEPARATOR: char = '.';
