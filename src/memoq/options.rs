//! Option structures passed to memoQ operations.
//!
//! Fields mirror the remote data contracts one-to-one and are public so that
//! callers can override any value between building the options and using
//! them. Each `to_element` writes members in the ordinal order expected by the
//! WCF `DataContractSerializer` (base contract members before derived ones);
//! reordering them breaks deserialization on the server.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::soap::{DataContract, Element};
use crate::types::{
    format_datetime, PretranslateLookupBehavior, StatisticsAlgorithm,
};

/// Default good match rate used by pretranslation.
pub const DEFAULT_GOOD_MATCH_RATE: u32 = 80;

/// `TemplateBasedProjectCreateInfo`: creates a project from a server-side template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateBasedProjectCreateInfo {
    /// Template to create the project from.
    pub template_guid: Uuid,
    /// Project name. Must be unique on the server.
    pub name: String,
    /// Source language code.
    pub source_language_code: String,
    /// Project domain.
    pub domain: String,
    /// User recorded as the project creator.
    pub creator_user: Uuid,
    /// Optional description.
    pub description: Option<String>,
    /// Optional client metadata.
    pub client: Option<String>,
    /// Optional project metadata.
    pub project: Option<String>,
    /// Optional subject metadata.
    pub subject: Option<String>,
}

impl DataContract for TemplateBasedProjectCreateInfo {
    fn to_element(&self, name: &str) -> Element {
        Element::new(name)
            .text_opt("Client", self.client.as_deref())
            .child(Element::text("CreatorUser", self.creator_user))
            .text_opt("Description", self.description.as_deref())
            .child(Element::text("Domain", &self.domain))
            .child(Element::text("Name", &self.name))
            .text_opt("Project", self.project.as_deref())
            .child(Element::text("SourceLanguageCode", &self.source_language_code))
            .text_opt("Subject", self.subject.as_deref())
            .child(Element::text("TemplateGuid", self.template_guid))
    }
}

/// `ServerProjectDesktopDocsCreateInfo`: creates a project from explicit settings.
///
/// Extends `ServerProjectCreateInfo`; the base members are written first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProjectDesktopDocsCreateInfo {
    /// Project name. Must be unique on the server.
    pub name: String,
    /// Source language code.
    pub source_language_code: String,
    /// Target language codes.
    pub target_language_codes: Vec<String>,
    /// Project deadline.
    pub deadline: DateTime<Utc>,
    /// Keep version history of the documents.
    pub record_version_history: bool,
    /// User recorded as the project creator.
    pub creator_user: Uuid,
    /// Project domain.
    pub domain: String,
    /// Optional description.
    pub description: Option<String>,
    /// Optional client metadata.
    pub client: Option<String>,
    /// Optional project metadata.
    pub project: Option<String>,
    /// Optional subject metadata.
    pub subject: Option<String>,
    /// Allow translators to download the document skeletons.
    pub download_skeleton: bool,
    /// Allow translators to download previews.
    pub download_preview: bool,
}

impl DataContract for ServerProjectDesktopDocsCreateInfo {
    fn to_element(&self, name: &str) -> Element {
        Element::new(name)
            .text_opt("Client", self.client.as_deref())
            .child(Element::text("CreatorUser", self.creator_user))
            .child(Element::text("Deadline", format_datetime(&self.deadline)))
            .text_opt("Description", self.description.as_deref())
            .child(Element::text("Domain", &self.domain))
            .child(Element::text("Name", &self.name))
            .text_opt("Project", self.project.as_deref())
            .child(Element::text(
                "RecordVersionHistory",
                self.record_version_history,
            ))
            .child(Element::text("SourceLanguageCode", &self.source_language_code))
            .text_opt("Subject", self.subject.as_deref())
            .child(Element::string_array(
                "TargetLanguageCodes",
                &self.target_language_codes,
            ))
            // ServerProjectDesktopDocsCreateInfo members follow the base class
            .child(Element::text("DownloadPreview", self.download_preview))
            .child(Element::text("DownloadSkeleton", self.download_skeleton))
    }
}

/// `StatisticsOptions`: what statistics count and how results are reported.
#[derive(Debug, Clone, PartialEq)]
pub struct StatisticsOptions {
    /// Counting algorithm.
    pub algorithm: StatisticsAlgorithm,
    /// Report hits per translation memory.
    pub analysis_details_by_tm: bool,
    /// Include homogeneity analysis.
    pub analysis_homogenity: bool,
    /// Analyze against the project's translation memories.
    pub analysis_project_tms: bool,
    /// Do not count repetitions across files.
    pub disable_cross_file_repetition: bool,
    /// Count locked rows.
    pub include_locked_rows: bool,
    /// Prefer repetitions over 100% matches.
    pub repetition_preference_over_100: bool,
    /// Produce counts instead of analysis.
    pub show_counts: bool,
    /// Include target counts.
    pub show_counts_include_target_count: bool,
    /// Count whitespace as characters.
    pub show_counts_include_whitespaces_in_char_count: bool,
    /// Include the status report.
    pub show_counts_status_report: bool,
    /// Break results down per file.
    pub show_results_per_file: bool,
    /// Character weight of a tag.
    pub tag_char_weight: f64,
    /// Word weight of a tag.
    pub tag_word_weight: f64,
}

impl Default for StatisticsOptions {
    fn default() -> Self {
        Self {
            algorithm: StatisticsAlgorithm::MemoQ,
            analysis_details_by_tm: false,
            analysis_homogenity: true,
            analysis_project_tms: true,
            disable_cross_file_repetition: false,
            include_locked_rows: false,
            repetition_preference_over_100: true,
            show_counts: false,
            show_counts_include_target_count: false,
            show_counts_include_whitespaces_in_char_count: false,
            show_counts_status_report: false,
            show_results_per_file: true,
            tag_char_weight: 0.0,
            tag_word_weight: 0.0,
        }
    }
}

impl DataContract for StatisticsOptions {
    fn to_element(&self, name: &str) -> Element {
        Element::new(name)
            .child(Element::text("Algorithm", self.algorithm))
            .child(Element::text(
                "Analysis_DetailsByTM",
                self.analysis_details_by_tm,
            ))
            .child(Element::text("Analysis_Homogenity", self.analysis_homogenity))
            .child(Element::text("Analysis_ProjectTMs", self.analysis_project_tms))
            .child(Element::text(
                "DisableCrossFileRepetition",
                self.disable_cross_file_repetition,
            ))
            .child(Element::text("IncludeLockedRows", self.include_locked_rows))
            .child(Element::text(
                "RepetitionPreferenceOver100",
                self.repetition_preference_over_100,
            ))
            .child(Element::text("ShowCounts", self.show_counts))
            .child(Element::text(
                "ShowCounts_IncludeTargetCount",
                self.show_counts_include_target_count,
            ))
            .child(Element::text(
                "ShowCounts_IncludeWhitespacesInCharCount",
                self.show_counts_include_whitespaces_in_char_count,
            ))
            .child(Element::text(
                "ShowCounts_StatusReport",
                self.show_counts_status_report,
            ))
            .child(Element::text("ShowResultsPerFile", self.show_results_per_file))
            .child(Element::text("TagCharWeight", self.tag_char_weight))
            .child(Element::text("TagWordWeight", self.tag_word_weight))
    }
}

/// `PretranslateOptions`: how translation memory hits fill the targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PretranslateOptions {
    /// Minimum match rate treated as a good match.
    pub good_match_rate: u32,
    /// Lock pretranslated rows.
    pub lock_pretranslated: bool,
    /// Only insert hits when there is a single best candidate.
    pub only_unambiguous_matches: bool,
    /// Which hits are accepted.
    pub pretranslate_lookup_behavior: PretranslateLookupBehavior,
    /// Fall back to machine translation.
    pub use_mt: bool,
}

impl Default for PretranslateOptions {
    fn default() -> Self {
        Self {
            good_match_rate: DEFAULT_GOOD_MATCH_RATE,
            lock_pretranslated: true,
            only_unambiguous_matches: false,
            pretranslate_lookup_behavior: PretranslateLookupBehavior::GoodMatch,
            use_mt: false,
        }
    }
}

impl DataContract for PretranslateOptions {
    fn to_element(&self, name: &str) -> Element {
        Element::new(name)
            .child(Element::text("GoodMatchRate", self.good_match_rate))
            .child(Element::text("LockPretranslated", self.lock_pretranslated))
            .child(Element::text(
                "OnlyUnambiguousMatches",
                self.only_unambiguous_matches,
            ))
            .child(Element::text(
                "PretranslateLookupBehavior",
                self.pretranslate_lookup_behavior,
            ))
            .child(Element::text("UseMT", self.use_mt))
    }
}

/// `DocumentExportOptions`: used by `ExportTranslationDocument2`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DocumentExportOptions {
    /// Fill empty targets with the source text.
    pub copy_source_to_empty_target: bool,
    /// Replace unconfirmed targets with the source text.
    pub copy_source_to_unconfirmed_rows: bool,
    /// Export every sibling of a multilingual document.
    pub export_all_multilingual_siblings: bool,
    /// Replace targets with tag errors by the source text.
    pub revert_faulty_targets_to_source: bool,
}

impl DataContract for DocumentExportOptions {
    fn to_element(&self, name: &str) -> Element {
        Element::new(name)
            .child(Element::text(
                "CopySourceToEmptyTarget",
                self.copy_source_to_empty_target,
            ))
            .child(Element::text(
                "CopySourceToUnconfirmedRows",
                self.copy_source_to_unconfirmed_rows,
            ))
            .child(Element::text(
                "ExportAllMultilingualSiblings",
                self.export_all_multilingual_siblings,
            ))
            .child(Element::text(
                "RevertFaultyTargetsToSource",
                self.revert_faulty_targets_to_source,
            ))
    }
}

/// `ServerProjectListFilter`: narrows `ListProjects`. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ServerProjectListFilter {
    pub client: Option<String>,
    pub domain: Option<String>,
    pub last_changed_after: Option<DateTime<Utc>>,
    pub last_changed_before: Option<DateTime<Utc>>,
    pub project: Option<String>,
    pub source_language_code: Option<String>,
    pub subject: Option<String>,
    pub target_language_code: Option<String>,
}

impl ServerProjectListFilter {
    /// Filter matching a single domain.
    pub fn domain(domain: impl Into<String>) -> Self {
        Self {
            domain: Some(domain.into()),
            ..Self::default()
        }
    }
}

impl DataContract for ServerProjectListFilter {
    fn to_element(&self, name: &str) -> Element {
        Element::new(name)
            .text_opt("Client", self.client.as_deref())
            .text_opt("Domain", self.domain.as_deref())
            .text_opt(
                "LastChangedAfter",
                self.last_changed_after.as_ref().map(format_datetime),
            )
            .text_opt(
                "LastChangedBefore",
                self.last_changed_before.as_ref().map(format_datetime),
            )
            .text_opt("Project", self.project.as_deref())
            .text_opt("SourceLanguageCode", self.source_language_code.as_deref())
            .text_opt("Subject", self.subject.as_deref())
            .text_opt("TargetLanguageCode", self.target_language_code.as_deref())
    }
}
