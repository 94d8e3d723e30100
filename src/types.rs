//! Local mirror of memoQ server entities and the enumerations used on the wire.
//!
//! Nothing here is validated locally: values are copied verbatim from server
//! responses or from the caller. The only state rule is that a [`Project`]
//! without a GUID is "not loaded".

use core::fmt;

use chrono::{DateTime, Duration, NaiveDateTime, SecondsFormat, Utc};
use uuid::Uuid;

/// Prefix of generated project names.
pub const PROJECT_NAME_PREFIX: &str = "memoq-wsapi";

/// Days between project construction and its default deadline.
pub const DEFAULT_DEADLINE_DAYS: i64 = 7;

/// Source and target languages of a project, as memoQ language codes
/// (`eng`, `ger`, `fre-FR`, ...).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Languages {
    /// Source language code. Unset until the caller or the server provides it.
    pub source: Option<String>,
    /// Target language codes.
    pub target: Vec<String>,
}

impl Languages {
    /// Returns `true` if a non-empty source language is set.
    pub fn has_source(&self) -> bool {
        self.source.as_deref().is_some_and(|s| !s.is_empty())
    }

    /// Returns `true` if at least one target language is set.
    pub fn has_targets(&self) -> bool {
        self.target.iter().any(|t| !t.is_empty())
    }
}

/// The "current project" tracked by [`crate::MemoQProject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    guid: Option<Uuid>,
    /// Project name.
    pub name: String,
    /// Project domain (free text on the server).
    pub domain: String,
    /// Source and target languages.
    pub languages: Languages,
    /// Project deadline.
    pub deadline: DateTime<Utc>,
}

impl Project {
    /// Creates an unloaded project with a generated name and a deadline
    /// [`DEFAULT_DEADLINE_DAYS`] from now.
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            guid: None,
            name: format!("{}-{}", PROJECT_NAME_PREFIX, now.format("%Y%m%d%H%M%S")),
            domain: String::new(),
            languages: Languages::default(),
            deadline: now + Duration::days(DEFAULT_DEADLINE_DAYS),
        }
    }

    /// Server-assigned identifier, or `None` if no project is loaded.
    pub fn guid(&self) -> Option<Uuid> {
        self.guid
    }

    /// Returns `true` if a project is loaded.
    pub fn is_loaded(&self) -> bool {
        self.guid.is_some()
    }

    /// Forgets the server identifier. Local name, domain and languages stay.
    pub fn clear(&mut self) {
        self.guid = None;
    }

    pub(crate) fn set_guid(&mut self, guid: Uuid) {
        self.guid = Some(guid);
    }
}

impl Default for Project {
    fn default() -> Self {
        Self::new()
    }
}

macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant, )+
        }

        impl $name {
            /// All variants, in declaration order.
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Returns the name used on the wire.
            pub const fn as_str(&self) -> &'static str {
                match self {
                    $( $name::$variant => $wire, )+
                }
            }

            /// Parses a wire name.
            pub fn from_name(s: &str) -> Option<Self> {
                match s {
                    $( $wire => Some($name::$variant), )+
                    _ => None,
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

wire_enum! {
    /// Counting algorithm used by statistics.
    #[derive(Default)]
    pub enum StatisticsAlgorithm {
        /// memoQ's own counting.
        #[default]
        MemoQ => "MemoQ",
        /// Trados-compatible counting.
        Trados => "Trados",
    }
}

wire_enum! {
    /// Format of the statistics result data.
    pub enum StatisticsResultFormat {
        /// HTML report.
        Html => "Html",
        /// CSV with table layout.
        CsvWithTable => "CSV_WithTable",
        /// Trados-style CSV.
        CsvTrados => "CSV_Trados",
        /// memoQ CSV.
        CsvMemoQ => "CSV_MemoQ",
    }
}

wire_enum! {
    /// Which translation memory hits pretranslation accepts.
    #[derive(Default)]
    pub enum PretranslateLookupBehavior {
        /// Any hit above the good match rate, including fragments.
        Anything => "Anything",
        /// Hits at or above the good match rate.
        #[default]
        GoodMatch => "GoodMatch",
        /// 100% matches only.
        ExactMatch => "ExactMatch",
        /// 101% (context) matches only.
        ExactMatchWithContext => "ExactMatchWithContext",
    }
}

wire_enum! {
    /// Outcome reported by most memoQ result objects.
    pub enum ResultStatus {
        /// The operation completed.
        Success => "Success",
        /// The operation completed with warnings.
        Warning => "Warning",
        /// The operation failed.
        Error => "Error",
    }
}

impl ResultStatus {
    /// Returns `true` for [`ResultStatus::Success`].
    pub fn is_success(&self) -> bool {
        matches!(self, ResultStatus::Success)
    }

    /// Returns `true` for [`ResultStatus::Error`].
    pub fn is_error(&self) -> bool {
        matches!(self, ResultStatus::Error)
    }
}

/// Formats a timestamp as `xs:dateTime` in UTC.
pub fn format_datetime(value: &DateTime<Utc>) -> String {
    value.to_rfc3339_opts(SecondsFormat::Secs, true)
}

/// Parses an `xs:dateTime` value.
///
/// WCF emits both zoned (`...Z`, `...+02:00`) and unzoned values; unzoned
/// values are taken as UTC.
pub fn parse_datetime(value: &str) -> Option<DateTime<Utc>> {
    let value = value.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}
