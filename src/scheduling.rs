//! Scheduling utilities – the `Frequency` enum covers the cron shapes the
//! *simple* schedule editor can show without exposing raw cron syntax:
//!
//! • Every minute / every N minutes (1-59)
//! • Hourly at a given minute, or every N hours at a given minute
//! • Daily at HH:MM
//! • Weekly on one or more weekdays at HH:MM (weekday 0 = Sunday)
//! • Monthly on day-of-month at HH:MM
//!
//! Anything else is *complex* and has to be edited as a raw expression.
//! [`FrequencyClassifier`] is the default answer to "can the simple editor
//! represent this?" used by the editor-mode resolver.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schedule::ScheduleClassifier;

/// High-level scheduling options exposed in the simple editor.  On the wire
/// (JS side) variants are camelCase keys, e.g. `{"daily":{"hour":5,"minute":0}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Frequency {
    /// `* * * * *`
    EveryMinute,

    /// `*/N * * * *` – every *N* minutes (1-59).
    EveryNMinutes(u8),

    /// `M * * * *` – every hour at minute *M* (0-59).
    Hourly { minute: u8 },

    /// `M */N * * *` – every *N* hours (1-23) at minute *M*.
    EveryNHours { hours: u8, minute: u8 },

    /// `M H * * *` – every day at *HH:MM*.
    Daily { hour: u8, minute: u8 },

    /// `M H * * W[,W…]` – on the listed weekdays at *HH:MM* (0 = Sun).
    Weekly {
        weekdays: Vec<u8>, // 0-6, sorted, unique
        hour: u8,
        minute: u8,
    },

    /// `M H D * *` – every month on day *D* (1-31) at *HH:MM*.
    Monthly { day: u8, hour: u8, minute: u8 },
}

impl Frequency {
    /// Convert into a 5-field cron string (minute hour day month weekday).
    pub fn to_cron(&self) -> String {
        match self {
            Frequency::EveryMinute => "* * * * *".to_string(),
            Frequency::EveryNMinutes(n) => format!("*/{} * * * *", n),
            Frequency::Hourly { minute } => format!("{} * * * *", minute),
            Frequency::EveryNHours { hours, minute } => format!("{} */{} * * *", minute, hours),
            Frequency::Daily { hour, minute } => format!("{} {} * * *", minute, hour),
            Frequency::Weekly {
                weekdays,
                hour,
                minute,
            } => {
                let days: Vec<String> = weekdays.iter().map(|d| d.to_string()).collect();
                format!("{} {} * * {}", minute, hour, days.join(","))
            }
            Frequency::Monthly { day, hour, minute } => format!("{} {} {} * *", minute, hour, day),
        }
    }
}

fn parse_in_range(field: &str, min: u8, max: u8) -> Result<u8, String> {
    let value = field
        .parse::<u8>()
        .map_err(|_| format!("Invalid number in cron field: '{}'", field))?;
    if value < min || value > max {
        return Err(format!("Cron field '{}' outside {}-{}", field, min, max));
    }
    Ok(value)
}

/// Weekday field: comma list of single days or `a-b` ranges.  `7` is accepted
/// as an alias for Sunday.
fn parse_weekdays(field: &str) -> Result<Vec<u8>, String> {
    let mut days = Vec::new();
    for part in field.split(',') {
        if let Some((from, to)) = part.split_once('-') {
            let from = parse_in_range(from, 0, 7)?;
            let to = parse_in_range(to, 0, 7)?;
            if from > to {
                return Err(format!("Descending weekday range '{}'", part));
            }
            days.extend(from..=to);
        } else {
            days.push(parse_in_range(part, 0, 7)?);
        }
    }
    let mut days: Vec<u8> = days.into_iter().map(|d| d % 7).collect();
    days.sort_unstable();
    days.dedup();
    Ok(days)
}

// ---------------------------------------------------------------------------
// Reverse conversion – only recognises the shapes listed above.  Everything
// else is an error so the caller falls back to the complex editor.
// ---------------------------------------------------------------------------

impl TryFrom<&str> for Frequency {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        let parts: Vec<&str> = value.split_whitespace().collect();
        if parts.len() != 5 {
            return Err("Cron expression must have exactly 5 whitespace-separated fields".into());
        }
        let (minute, hour, day, month, weekday) = (parts[0], parts[1], parts[2], parts[3], parts[4]);

        if month != "*" {
            return Err("Month restrictions need the complex editor".into());
        }

        let rest_is_wild = day == "*" && weekday == "*";

        if minute == "*" {
            if hour == "*" && rest_is_wild {
                return Ok(Frequency::EveryMinute);
            }
            return Err("Every-minute pattern with fixed hour/day".into());
        }

        if let Some(step) = minute.strip_prefix("*/") {
            if hour == "*" && rest_is_wild {
                return Ok(Frequency::EveryNMinutes(parse_in_range(step, 1, 59)?));
            }
            return Err("Minute step combined with other restrictions".into());
        }

        let minute = parse_in_range(minute, 0, 59)?;

        if hour == "*" {
            if rest_is_wild {
                return Ok(Frequency::Hourly { minute });
            }
            return Err("Hourly pattern with day restrictions".into());
        }

        if let Some(step) = hour.strip_prefix("*/") {
            if rest_is_wild {
                let hours = parse_in_range(step, 1, 23)?;
                return Ok(Frequency::EveryNHours { hours, minute });
            }
            return Err("Hour step combined with day restrictions".into());
        }

        let hour = parse_in_range(hour, 0, 23)?;

        match (day, weekday) {
            ("*", "*") => Ok(Frequency::Daily { hour, minute }),
            ("*", days) => Ok(Frequency::Weekly {
                weekdays: parse_weekdays(days)?,
                hour,
                minute,
            }),
            (day, "*") => Ok(Frequency::Monthly {
                day: parse_in_range(day, 1, 31)?,
                hour,
                minute,
            }),
            _ => Err("Day-of-month and weekday together need the complex editor".into()),
        }
    }
}

// ---------------------------------------------------------------------------
// Display – summary line under the editor.
// ---------------------------------------------------------------------------

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::EveryMinute => write!(f, "Every minute"),
            Frequency::EveryNMinutes(n) => {
                write!(f, "Every {} minute{}", n, if *n == 1 { "" } else { "s" })
            }
            Frequency::Hourly { minute } => write!(f, "Hourly at minute {:02}", minute),
            Frequency::EveryNHours { hours, minute } => {
                write!(f, "Every {} hours at minute {:02}", hours, minute)
            }
            Frequency::Daily { hour, minute } => write!(f, "Daily at {:02}:{:02}", hour, minute),
            Frequency::Weekly {
                weekdays,
                hour,
                minute,
            } => {
                const DAYS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];
                let names: Vec<&str> = weekdays
                    .iter()
                    .map(|d| DAYS.get(*d as usize).copied().unwrap_or("???"))
                    .collect();
                write!(f, "Weekly on {} at {:02}:{:02}", names.join(", "), hour, minute)
            }
            Frequency::Monthly { day, hour, minute } => {
                write!(f, "Monthly on {:02} at {:02}:{:02}", day, hour, minute)
            }
        }
    }
}

/// Default simple-schedule classifier backed by [`Frequency`].
#[derive(Debug, Default, Clone, Copy)]
pub struct FrequencyClassifier;

impl ScheduleClassifier for FrequencyClassifier {
    fn can_represent_as_simple(&self, cron: &str) -> bool {
        Frequency::try_from(cron).is_ok()
    }
}
