//! memoQ Server project wrapper.
//!
//! [`MemoQProject`] keeps a local mirror of "the current project" and of the
//! documents last fetched from it. Every operation is a single remote call
//! (or a fixed short sequence such as upload, import, delete upload) whose
//! options are copied from that mirror or supplied by the caller.
//!
//! # Important Notes
//!
//! - **Project names are unique**: memoQ rejects a second project with the
//!   same name. [`Project::new`] generates a timestamped name; override
//!   `project.name` before creating more than one project per second.
//! - **No local recovery**: remote failures are returned as [`MemoqError`]
//!   without retries. The lookup operations are the exception: a lookup that
//!   finds nothing clears the project identifier instead of failing.
//! - **Option builders return `None`** until the languages they need are set.
//!
//! # Example
//!
//! ```no_run
//! use memoq_wsapi::memoq::{ClientConfig, MemoQProject};
//! use uuid::Uuid;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//! let config = ClientConfig::new("http://localhost:8080/memoqservices", Uuid::nil());
//! let mut memoq = MemoQProject::new(config)?;
//!
//! if memoq.get_project_by_domain("legal").await? {
//!     for document in memoq.get_project_documents().await? {
//!         println!("{} ({})", document.document_name, document.target_lang_code);
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod options;

use std::error::Error as StdErr;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};
use uuid::Uuid;

pub use api::{
    parse_document_info, parse_project_info, Client, ClientConfig, DownloadSession,
    MemoqError, ResultInfo, Service, ServerProjectInfo, StatisticsResult,
    StatisticsResultForLang, TemplateCreationResult, TranslationDocExportResult,
    TranslationDocImportResult, TranslationDocument, FILE_CHUNK_SIZE,
};
pub use options::{
    DocumentExportOptions, PretranslateOptions, ServerProjectDesktopDocsCreateInfo,
    ServerProjectListFilter, StatisticsOptions, TemplateBasedProjectCreateInfo,
};

use crate::types::{Project, StatisticsResultFormat};
use crate::HttpClientConfig;

/// Stateful wrapper around a memoQ [`Client`].
#[derive(Debug, Clone)]
pub struct MemoQProject {
    client: Client,
    /// The current project. `project.guid()` is `None` when nothing is loaded.
    pub project: Project,
    /// Documents returned by the last [`MemoQProject::get_project_documents`].
    pub documents: Vec<TranslationDocument>,
}

impl MemoQProject {
    /// Creates a wrapper with an unloaded project.
    pub fn new(config: ClientConfig) -> Result<Self, Box<dyn StdErr + Send + Sync>> {
        Ok(Self::from_client(Client::new(config)?))
    }

    /// Creates a wrapper with custom HTTP client configuration.
    pub fn with_http_config(
        config: ClientConfig,
        http_config: HttpClientConfig,
    ) -> Result<Self, Box<dyn StdErr + Send + Sync>> {
        Ok(Self::from_client(Client::with_http_config(
            config,
            http_config,
        )?))
    }

    /// Wraps an existing client.
    pub fn from_client(client: Client) -> Self {
        Self {
            client,
            project: Project::new(),
            documents: Vec::new(),
        }
    }

    /// The underlying API client.
    pub fn client(&self) -> &Client {
        &self.client
    }

    fn require_project(&self) -> Result<Uuid, MemoqError> {
        self.project.guid().ok_or(MemoqError::NoProject)
    }

    fn load(&mut self, info: ServerProjectInfo) {
        self.project.set_guid(info.guid);
        self.project.name = info.name;
        self.project.domain = info.domain;
        self.project.languages.source = info.source_language_code;
        self.project.languages.target = info.target_language_codes;
        if let Some(deadline) = info.deadline {
            self.project.deadline = deadline;
        }
        self.documents.clear();
    }

    fn unload(&mut self) {
        self.project.clear();
        self.documents.clear();
    }

    /// Adopts a freshly created project and reloads it from the server.
    ///
    /// The identifier is kept even when the reload fails.
    async fn adopt_created(&mut self, guid: Uuid) -> Result<bool, MemoqError> {
        self.project.set_guid(guid);
        self.documents.clear();
        match self.client.get_project(guid).await? {
            Some(info) => self.load(info),
            None => warn!("Created project {} could not be reloaded", guid),
        }
        Ok(true)
    }

    // =========================================================================
    // Lookup
    // =========================================================================

    /// Loads the first project of `domain`. Clears the current project and
    /// returns `false` when the domain has no project.
    pub async fn get_project_by_domain(&mut self, domain: &str) -> Result<bool, MemoqError> {
        let projects = self
            .client
            .list_projects(&ServerProjectListFilter::domain(domain))
            .await?;

        match projects.into_iter().next() {
            Some(info) => {
                debug!("Domain {:?} resolved to project {}", domain, info.guid);
                self.load(info);
                Ok(true)
            }
            None => {
                debug!("No project in domain {:?}", domain);
                self.unload();
                Ok(false)
            }
        }
    }

    /// Loads the project with the given identifier. Clears the current
    /// project and returns `false` when the server does not know it.
    pub async fn get_project_by_guid(&mut self, guid: Uuid) -> Result<bool, MemoqError> {
        match self.client.get_project(guid).await {
            Ok(Some(info)) => {
                self.load(info);
                Ok(true)
            }
            Ok(None) => {
                self.unload();
                Ok(false)
            }
            Err(MemoqError::Fault(fault)) => {
                debug!("Project {} not found: {}", guid, fault);
                self.unload();
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    // =========================================================================
    // Creation
    // =========================================================================

    /// Options for [`MemoQProject::create_project_from_template_with`], copied
    /// from the current project. `None` until the source language is set.
    pub fn template_project_options(
        &self,
        template_guid: Uuid,
    ) -> Option<TemplateBasedProjectCreateInfo> {
        if !self.project.languages.has_source() {
            return None;
        }

        Some(TemplateBasedProjectCreateInfo {
            template_guid,
            name: self.project.name.clone(),
            source_language_code: self.project.languages.source.clone()?,
            domain: self.project.domain.clone(),
            creator_user: self.client.config().creator_user,
            description: None,
            client: None,
            project: None,
            subject: None,
        })
    }

    /// Creates a project from a template using options built by
    /// [`MemoQProject::template_project_options`]. Returns `false` when the
    /// options cannot be built or the server did not create a project.
    pub async fn create_project_from_template(
        &mut self,
        template_guid: Uuid,
    ) -> Result<bool, MemoqError> {
        match self.template_project_options(template_guid) {
            Some(options) => self.create_project_from_template_with(&options).await,
            None => {
                warn!("Cannot create project from template: source language not set");
                Ok(false)
            }
        }
    }

    /// Creates a project from a template with explicit options, then reloads
    /// the current project from the server. A failed reload keeps the new
    /// identifier and returns the error.
    pub async fn create_project_from_template_with(
        &mut self,
        options: &TemplateBasedProjectCreateInfo,
    ) -> Result<bool, MemoqError> {
        let result = self.client.create_project_from_template(options).await?;

        match result.project_guid {
            Some(guid) if !result.info.status.is_error() => {
                info!(
                    "Created project {:?} ({}) from template {}",
                    options.name, guid, options.template_guid
                );
                self.adopt_created(guid).await
            }
            _ => {
                warn!(
                    "Project creation from template {} failed: {:?} {}",
                    options.template_guid,
                    result.info.status,
                    result.info.message.unwrap_or_default()
                );
                Ok(false)
            }
        }
    }

    /// Options for [`MemoQProject::create_project_with`], copied from the
    /// current project. `None` until source and target languages are set.
    pub fn project_options(&self) -> Option<ServerProjectDesktopDocsCreateInfo> {
        let languages = &self.project.languages;
        if !languages.has_source() || !languages.has_targets() {
            return None;
        }

        Some(ServerProjectDesktopDocsCreateInfo {
            name: self.project.name.clone(),
            source_language_code: languages.source.clone()?,
            target_language_codes: languages.target.clone(),
            deadline: self.project.deadline,
            record_version_history: true,
            creator_user: self.client.config().creator_user,
            domain: self.project.domain.clone(),
            description: None,
            client: None,
            project: None,
            subject: None,
            download_skeleton: false,
            download_preview: false,
        })
    }

    /// Creates a project using options built by
    /// [`MemoQProject::project_options`]. Returns `false` when the options
    /// cannot be built.
    pub async fn create_project(&mut self) -> Result<bool, MemoqError> {
        match self.project_options() {
            Some(options) => self.create_project_with(&options).await,
            None => {
                warn!("Cannot create project: source or target languages not set");
                Ok(false)
            }
        }
    }

    /// Creates a project with explicit options, then reloads the current
    /// project from the server. A failed reload keeps the new identifier and
    /// returns the error.
    pub async fn create_project_with(
        &mut self,
        options: &ServerProjectDesktopDocsCreateInfo,
    ) -> Result<bool, MemoqError> {
        let guid = self.client.create_project2(options).await?;
        info!("Created project {:?} ({})", options.name, guid);
        self.adopt_created(guid).await
    }

    // =========================================================================
    // Documents
    // =========================================================================

    /// Uploads `path` and imports it into the current project for all of its
    /// target languages. Returns `true` when the import succeeded.
    pub async fn import_document(&self, path: impl AsRef<Path>) -> Result<bool, MemoqError> {
        let project_guid = self.require_project()?;
        let file_guid = self.client.upload_file(path.as_ref()).await?;

        let imported = self
            .client
            .import_translation_document(project_guid, file_guid, None)
            .await;

        // The upload is a temporary file manager entry either way.
        if let Err(e) = self.client.delete_file(file_guid).await {
            warn!("Failed to delete uploaded file {}: {}", file_guid, e);
        }

        let result = imported?;
        if !result.info.is_success() {
            warn!(
                "Import of {} finished with {:?}: {}",
                path.as_ref().display(),
                result.info.status,
                result.info.message.as_deref().unwrap_or_default()
            );
        }
        Ok(result.info.is_success())
    }

    /// Fetches the translation documents of the current project and caches
    /// them in [`MemoQProject::documents`].
    pub async fn get_project_documents(&mut self) -> Result<&[TranslationDocument], MemoqError> {
        let project_guid = self.require_project()?;
        self.documents = self
            .client
            .list_project_translation_documents(project_guid)
            .await?;
        Ok(&self.documents)
    }

    async fn ensure_documents(&mut self) -> Result<Uuid, MemoqError> {
        let project_guid = self.require_project()?;
        if self.documents.is_empty() {
            self.get_project_documents().await?;
        }
        Ok(project_guid)
    }

    async fn download_export(
        &self,
        document: &TranslationDocument,
        result: TranslationDocExportResult,
        dir: &Path,
    ) -> Result<bool, MemoqError> {
        let file_guid = match result.file_guid {
            Some(guid) if result.info.is_success() => guid,
            _ => {
                warn!(
                    "Export of {} ({}) failed: {:?} {}",
                    document.document_name,
                    document.target_lang_code,
                    result.info.status,
                    result.info.message.unwrap_or_default()
                );
                return Ok(false);
            }
        };

        let downloaded = self.client.download_file(file_guid, dir).await;
        if let Err(e) = self.client.delete_file(file_guid).await {
            warn!("Failed to delete exported file {}: {}", file_guid, e);
        }
        downloaded?;
        Ok(true)
    }

    /// Exports every document of the current project into `dir`. Returns
    /// `true` when all exports succeeded.
    pub async fn export_documents(&mut self, dir: impl AsRef<Path>) -> Result<bool, MemoqError> {
        let project_guid = self.ensure_documents().await?;
        let mut all_ok = true;

        for document in &self.documents {
            let result = self
                .client
                .export_translation_document(project_guid, document.document_guid)
                .await?;
            all_ok &= self.download_export(document, result, dir.as_ref()).await?;
        }

        Ok(all_ok && !self.documents.is_empty())
    }

    /// Default options for [`MemoQProject::export_documents2_with`].
    pub fn export_options(&self) -> DocumentExportOptions {
        DocumentExportOptions::default()
    }

    /// [`MemoQProject::export_documents2_with`] with default options.
    pub async fn export_documents2(&mut self, dir: impl AsRef<Path>) -> Result<bool, MemoqError> {
        let options = self.export_options();
        self.export_documents2_with(dir, &options).await
    }

    /// Exports every document through `ExportTranslationDocument2`.
    pub async fn export_documents2_with(
        &mut self,
        dir: impl AsRef<Path>,
        options: &DocumentExportOptions,
    ) -> Result<bool, MemoqError> {
        let project_guid = self.ensure_documents().await?;
        let mut all_ok = true;

        for document in &self.documents {
            let result = self
                .client
                .export_translation_document2(project_guid, document.document_guid, options)
                .await?;
            all_ok &= self.download_export(document, result, dir.as_ref()).await?;
        }

        Ok(all_ok && !self.documents.is_empty())
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Default statistics options.
    pub fn statistics_options(&self) -> StatisticsOptions {
        StatisticsOptions::default()
    }

    /// [`MemoQProject::run_statistics_with`] with default options.
    pub async fn run_statistics(&self) -> Result<StatisticsResult, MemoqError> {
        self.run_statistics_with(&self.statistics_options()).await
    }

    /// Computes statistics for every target language of the current project
    /// in memoQ CSV format.
    pub async fn run_statistics_with(
        &self,
        options: &StatisticsOptions,
    ) -> Result<StatisticsResult, MemoqError> {
        let project_guid = self.require_project()?;
        let result = self
            .client
            .get_statistics_on_project(
                project_guid,
                &self.project.languages.target,
                options,
                StatisticsResultFormat::CsvMemoQ,
            )
            .await?;

        if !result.info.is_success() {
            warn!(
                "Statistics on {} finished with {:?}: {}",
                project_guid,
                result.info.status,
                result.info.message.as_deref().unwrap_or_default()
            );
        }
        Ok(result)
    }

    /// Writes each language's result data to `<dir>/<project name>_<lang>.csv`
    /// and returns the written paths.
    pub fn save_statistics(
        &self,
        dir: impl AsRef<Path>,
        statistics: &StatisticsResult,
    ) -> Result<Vec<PathBuf>, MemoqError> {
        let mut written = Vec::with_capacity(statistics.results_for_target_langs.len());

        for lang in &statistics.results_for_target_langs {
            let path = dir
                .as_ref()
                .join(statistics_file_name(&self.project.name, &lang.target_lang_code));
            fs::write(&path, &lang.result_data)?;
            info!("Saved statistics to {}", path.display());
            written.push(path);
        }

        Ok(written)
    }

    /// Runs statistics with `options` and saves them like
    /// [`MemoQProject::save_statistics`].
    pub async fn save_statistics_with(
        &self,
        dir: impl AsRef<Path>,
        options: &StatisticsOptions,
    ) -> Result<Vec<PathBuf>, MemoqError> {
        let statistics = self.run_statistics_with(options).await?;
        self.save_statistics(dir, &statistics)
    }

    // =========================================================================
    // Pretranslation
    // =========================================================================

    /// Default pretranslation options.
    pub fn pretranslate_options(&self) -> PretranslateOptions {
        PretranslateOptions::default()
    }

    /// [`MemoQProject::pretranslate_project_with`] with default options.
    pub async fn pretranslate_project(&self) -> Result<bool, MemoqError> {
        self.pretranslate_project_with(&self.pretranslate_options())
            .await
    }

    /// Pretranslates every target language of the current project. Returns
    /// `false` only when the server reports an error.
    pub async fn pretranslate_project_with(
        &self,
        options: &PretranslateOptions,
    ) -> Result<bool, MemoqError> {
        let project_guid = self.require_project()?;
        let result = self
            .client
            .pretranslate_project(project_guid, &self.project.languages.target, options)
            .await?;

        if !result.is_success() {
            warn!(
                "Pretranslation of {} finished with {:?}: {}",
                project_guid,
                result.status,
                result.message.as_deref().unwrap_or_default()
            );
        }
        Ok(!result.status.is_error())
    }

    // =========================================================================
    // Deletion
    // =========================================================================

    /// Deletes the current project on the server and unloads it.
    pub async fn delete(&mut self) -> Result<(), MemoqError> {
        let project_guid = self.require_project()?;
        self.client.delete_project(project_guid).await?;
        info!("Deleted project {:?} ({})", self.project.name, project_guid);
        self.unload();
        Ok(())
    }
}

/// File name used by [`MemoQProject::save_statistics`].
pub fn statistics_file_name(project_name: &str, target_lang_code: &str) -> String {
    let sanitize = |s: &str| -> String {
        s.chars()
            .map(|c| match c {
                '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
                c => c,
            })
            .collect()
    };
    format!("{}_{}.csv", sanitize(project_name), sanitize(target_lang_code))
}
