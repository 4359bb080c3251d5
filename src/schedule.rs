//! Schedule values and editor-mode resolution.
//!
//! A schedule arrives from the host in one of several shapes: a bare cron
//! expression, a quote-wrapped cron expression, or a JSON "wizard" object
//! (possibly quote-wrapped as well).  [`normalize`] is the only place that
//! sniffs the shape; everything downstream works on [`ScheduleValue`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize, Serializer};

use crate::constants::{DEFAULT_CRON, DEFAULT_WIZARD_SCHEDULE};
use crate::error::DialogError;

/// Canonical schedule.  Both variants hold the canonical string form; the
/// tag records which editor family the value belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScheduleValue {
    /// JSON wizard object text, body untouched.
    Wizard(String),
    /// Trimmed cron expression without any quote characters.
    Cron(String),
}

impl ScheduleValue {
    pub fn as_str(&self) -> &str {
        match self {
            ScheduleValue::Wizard(s) | ScheduleValue::Cron(s) => s,
        }
    }

    pub fn is_wizard(&self) -> bool {
        matches!(self, ScheduleValue::Wizard(_))
    }

    /// True for the empty wizard object a missing value normalizes to.
    pub fn is_default(&self) -> bool {
        matches!(self, ScheduleValue::Wizard(s) if s == DEFAULT_WIZARD_SCHEDULE)
    }

    /// Parse the wizard body.  Validity is the wizard editor's concern, so a
    /// broken body is logged and reported as `None`.
    pub fn wizard_json(&self) -> Option<serde_json::Value> {
        let ScheduleValue::Wizard(body) = self else {
            return None;
        };
        match serde_json::from_str::<serde_json::Value>(body) {
            Ok(value @ serde_json::Value::Object(_)) => Some(value),
            Ok(_) => {
                log::warn!("wizard schedule is not a JSON object: {}", body);
                None
            }
            Err(e) => {
                log::warn!("wizard schedule is not valid JSON ({}): {}", e, body);
                None
            }
        }
    }
}

impl Default for ScheduleValue {
    fn default() -> Self {
        ScheduleValue::Wizard(DEFAULT_WIZARD_SCHEDULE.to_string())
    }
}

impl fmt::Display for ScheduleValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for ScheduleValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

fn is_quote(c: char) -> bool {
    c == '\'' || c == '"'
}

fn strip_leading_quote(raw: &str) -> &str {
    raw.strip_prefix(is_quote).unwrap_or(raw)
}

/// Strip trailing `"`/`'` (each optionally followed by one newline) until none
/// is left.  Repeating keeps the normalizer idempotent for inputs such as
/// `{…}'"`.
fn strip_trailing_quotes(mut body: &str) -> &str {
    loop {
        let without_newline = body.strip_suffix('\n').unwrap_or(body);
        match without_newline.strip_suffix(is_quote) {
            Some(rest) => body = rest,
            None => return body,
        }
    }
}

/// Turn raw host input into the canonical schedule.  Never fails.
pub fn normalize(raw: Option<&str>) -> ScheduleValue {
    let raw = match raw {
        Some(r) if !r.is_empty() => r,
        _ => DEFAULT_WIZARD_SCHEDULE,
    };

    if strip_leading_quote(raw).starts_with('{') {
        let body = strip_trailing_quotes(strip_leading_quote(raw));
        return ScheduleValue::Wizard(body.to_string());
    }

    let cron: String = raw.chars().filter(|c| !is_quote(*c)).collect();
    let cron = cron.trim();
    if cron.is_empty() {
        ScheduleValue::default()
    } else if cron.starts_with('{') {
        // Whitespace hid the brace from the sniffing rule above.
        ScheduleValue::Wizard(cron.to_string())
    } else {
        ScheduleValue::Cron(cron.to_string())
    }
}

/// Schedule editor sub-modes.  Exactly one is active per dialog session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorMode {
    Simple,
    Complex,
    Wizard,
}

impl EditorMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            EditorMode::Simple => "simple",
            EditorMode::Complex => "complex",
            EditorMode::Wizard => "wizard",
        }
    }
}

impl fmt::Display for EditorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EditorMode {
    type Err = DialogError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "simple" => Ok(EditorMode::Simple),
            "complex" => Ok(EditorMode::Complex),
            "wizard" => Ok(EditorMode::Wizard),
            other => Err(DialogError::InvalidMode(other.to_string())),
        }
    }
}

/// Construction-time mode flags, immutable for the session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModeFlags {
    pub simple: bool,
    pub complex: bool,
    pub no_wizard: bool,
}

impl ModeFlags {
    /// Sessions opened with a forced editor do not offer mode switching.
    pub fn is_forced(&self) -> bool {
        self.simple || self.complex
    }

    /// Whether an explicit switch to `mode` is allowed in this session.
    pub fn allows_switch_to(&self, mode: EditorMode) -> bool {
        !self.is_forced() && !(mode == EditorMode::Wizard && self.no_wizard)
    }
}

/// "Can the simple editor show this cron expression?"  Supplied by the
/// simple editor; [`crate::scheduling::FrequencyClassifier`] is the default.
pub trait ScheduleClassifier {
    fn can_represent_as_simple(&self, cron: &str) -> bool;
}

impl<F> ScheduleClassifier for F
where
    F: Fn(&str) -> bool,
{
    fn can_represent_as_simple(&self, cron: &str) -> bool {
        self(cron)
    }
}

/// Pick the initial editor mode.  First match wins: forced simple, forced
/// complex, wizard-shaped value (unless `no_wizard`), then the classifier.
pub fn resolve_mode(
    flags: &ModeFlags,
    value: &ScheduleValue,
    classifier: &dyn ScheduleClassifier,
) -> EditorMode {
    if flags.simple {
        return EditorMode::Simple;
    }
    if flags.complex {
        return EditorMode::Complex;
    }
    if value.is_wizard() && !flags.no_wizard {
        return EditorMode::Wizard;
    }

    let cron = if value.is_default() {
        DEFAULT_CRON
    } else {
        value.as_str()
    };
    if classifier.can_represent_as_simple(cron) {
        EditorMode::Simple
    } else {
        EditorMode::Complex
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scheduling::FrequencyClassifier;
    use proptest::prelude::*;

    #[test]
    fn test_normalize_defaults() {
        assert_eq!(normalize(None), ScheduleValue::Wizard("{}".into()));
        assert_eq!(normalize(Some("")), ScheduleValue::Wizard("{}".into()));
        assert_eq!(normalize(Some("''")), ScheduleValue::Wizard("{}".into()));
    }

    #[test]
    fn test_normalize_cron() {
        assert_eq!(normalize(Some("'* * * * *'")).as_str(), "* * * * *");
        assert_eq!(normalize(Some("\"0 5 * * *\"")), ScheduleValue::Cron("0 5 * * *".into()));
        assert_eq!(normalize(Some("  0 5 * * *\n")).as_str(), "0 5 * * *");
    }

    #[test]
    fn test_normalize_wizard() {
        assert_eq!(
            normalize(Some("\"{\"period\":\"daily\"}\"")),
            ScheduleValue::Wizard("{\"period\":\"daily\"}".into())
        );
        assert_eq!(
            normalize(Some("'{\"a\":1}'\n")).as_str(),
            "{\"a\":1}"
        );
        // body is never touched
        assert_eq!(normalize(Some("{ 'x': \"y\" }")).as_str(), "{ 'x': \"y\" }");
    }

    #[test]
    fn test_wizard_json() {
        assert!(normalize(Some("{\"period\":\"daily\"}")).wizard_json().is_some());
        assert!(normalize(Some("{broken")).wizard_json().is_none());
        assert!(normalize(Some("0 5 * * *")).wizard_json().is_none());
    }

    #[test]
    fn test_mode_precedence() {
        let any = ScheduleValue::Cron("1 2 3 4 5".into());
        let both = ModeFlags { simple: true, complex: true, no_wizard: true };
        assert_eq!(resolve_mode(&both, &any, &FrequencyClassifier), EditorMode::Simple);

        let complex = ModeFlags { complex: true, ..Default::default() };
        assert_eq!(
            resolve_mode(&complex, &normalize(Some("{\"a\":1}")), &FrequencyClassifier),
            EditorMode::Complex
        );

        let wizard = normalize(Some("{\"a\":1}"));
        assert_eq!(resolve_mode(&ModeFlags::default(), &wizard, &FrequencyClassifier), EditorMode::Wizard);
    }

    #[test]
    fn test_no_wizard_falls_through_to_classifier() {
        let flags = ModeFlags { no_wizard: true, ..Default::default() };

        // default value is classified as "* * * * *"
        let seen = std::cell::RefCell::new(Vec::new());
        let spy = |cron: &str| {
            seen.borrow_mut().push(cron.to_string());
            true
        };
        assert_eq!(resolve_mode(&flags, &normalize(None), &spy), EditorMode::Simple);
        assert_eq!(seen.borrow().as_slice(), ["* * * * *"]);

        // a real wizard body is not a simple cron
        assert_eq!(
            resolve_mode(&flags, &normalize(Some("{\"a\":1}")), &FrequencyClassifier),
            EditorMode::Complex
        );
    }

    #[test]
    fn test_classifier_decides_cron_mode() {
        let flags = ModeFlags::default();
        assert_eq!(
            resolve_mode(&flags, &normalize(Some("0 5 * * *")), &FrequencyClassifier),
            EditorMode::Simple
        );
        assert_eq!(
            resolve_mode(&flags, &normalize(Some("0 5 1-10 * *")), &FrequencyClassifier),
            EditorMode::Complex
        );
    }

    #[test]
    fn test_switch_rules() {
        let open = ModeFlags::default();
        assert!(open.allows_switch_to(EditorMode::Wizard));

        let no_wizard = ModeFlags { no_wizard: true, ..Default::default() };
        assert!(!no_wizard.allows_switch_to(EditorMode::Wizard));
        assert!(no_wizard.allows_switch_to(EditorMode::Complex));

        let forced = ModeFlags { simple: true, ..Default::default() };
        assert!(!forced.allows_switch_to(EditorMode::Complex));
    }

    #[test]
    fn test_editor_mode_parse() {
        assert_eq!("wizard".parse::<EditorMode>().unwrap(), EditorMode::Wizard);
        assert!("tabs".parse::<EditorMode>().is_err());
        assert_eq!(EditorMode::Complex.to_string(), "complex");
    }

    proptest! {
        #[test]
        fn normalize_is_idempotent(raw in "[ '\"{}*/0-9a-z:,\n]{0,24}") {
            let once = normalize(Some(&raw));
            let twice = normalize(Some(once.as_str()));
            prop_assert_eq!(&once, &twice);
        }

        #[test]
        fn normalize_never_wraps_in_quotes(raw in "[ '\"{}*0-9\n]{0,24}") {
            let value = normalize(Some(&raw));
            let s = value.as_str();
            prop_assert!(!s.starts_with(is_quote));
            prop_assert!(!s.ends_with(is_quote));
        }
    }
}
