//! Low-level memoQ Server WS API client.
//!
//! One async method per remote operation of `IServerProjectService` and
//! `IFileManagerService`, plus [`Client::upload_file`] and
//! [`Client::download_file`], which drive the chunked transfer sequences.
//!
//! # API Reference
//!
//! - memoQ Server Web Service API documentation (shipped with memoQ Server,
//!   `http://<server>:8080/memoqservices/serverproject?wsdl`).

use std::error::Error as StdErr;
use std::fs;
use std::path::{Path, PathBuf};

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::options::{
    DocumentExportOptions, PretranslateOptions, ServerProjectDesktopDocsCreateInfo,
    ServerProjectListFilter, StatisticsOptions, TemplateBasedProjectCreateInfo,
};
use crate::soap::{self, DataContract, Element, Envelope, SoapError, SoapFault, XmlNode};
use crate::types::{parse_datetime, ResultStatus, StatisticsResultFormat};
use crate::HttpClientConfig;

/// Size of the chunks used for file transfers.
pub const FILE_CHUNK_SIZE: usize = 500_000;

/// Environment variable holding the service base URL.
pub const ENV_SERVER_URL: &str = "MEMOQ_SERVER_URL";
/// Environment variable holding the API key.
pub const ENV_API_KEY: &str = "MEMOQ_API_KEY";
/// Environment variable holding the creator user's GUID.
pub const ENV_CREATOR_GUID: &str = "MEMOQ_CREATOR_GUID";

/// Errors that can occur when talking to memoQ Server.
#[derive(Debug, Error)]
pub enum MemoqError {
    /// HTTP transport error.
    #[error("HTTP request error: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered with a SOAP fault.
    #[error("memoQ fault: {0}")]
    Fault(SoapFault),

    /// The server answered with a non-success status and no SOAP fault.
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// The response could not be understood.
    #[error("response parse error: {0}")]
    Parse(String),

    /// Local file error while importing, exporting or saving statistics.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The operation needs a loaded project.
    #[error("no project is loaded")]
    NoProject,

    /// Invalid client configuration.
    #[error("configuration error: {0}")]
    Config(String),
}

impl From<SoapError> for MemoqError {
    fn from(err: SoapError) -> Self {
        match err {
            SoapError::Fault(fault) => MemoqError::Fault(fault),
            other => MemoqError::Parse(other.to_string()),
        }
    }
}

impl MemoqError {
    /// Returns `true` if the server rejected the call with a SOAP fault.
    pub fn is_fault(&self) -> bool {
        matches!(self, MemoqError::Fault(_))
    }
}

/// The memoQ services used by this crate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// `IServerProjectService`.
    ServerProject,
    /// `IFileManagerService`.
    FileManager,
}

impl Service {
    /// Path segment of the service endpoint.
    pub const fn path(&self) -> &'static str {
        match self {
            Service::ServerProject => "serverproject",
            Service::FileManager => "filemanager",
        }
    }

    /// Name of the service contract, used in `SOAPAction`.
    pub const fn contract(&self) -> &'static str {
        match self {
            Service::ServerProject => "IServerProjectService",
            Service::FileManager => "IFileManagerService",
        }
    }
}

/// Configuration for the memoQ API client.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the services, e.g. `http://memoq.example.com:8080/memoqservices`.
    pub base_url: String,
    /// API key, if the server requires one.
    #[serde(default)]
    pub api_key: Option<String>,
    /// User recorded as creator of new projects.
    pub creator_user: Uuid,
}

impl ClientConfig {
    /// Creates a new client configuration.
    ///
    /// # Arguments
    ///
    /// * `base_url` - Base URL of the memoQ services (without the service name)
    /// * `creator_user` - GUID of the memoQ user that creates projects
    pub fn new(base_url: impl Into<String>, creator_user: Uuid) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: None,
            creator_user,
        }
    }

    /// Sets the API key.
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    /// Reads the configuration from `MEMOQ_SERVER_URL`, `MEMOQ_CREATOR_GUID`
    /// and the optional `MEMOQ_API_KEY`.
    pub fn from_env() -> Result<Self, MemoqError> {
        let base_url = std::env::var(ENV_SERVER_URL)
            .map_err(|_| MemoqError::Config(format!("{} is not set", ENV_SERVER_URL)))?;
        let creator = std::env::var(ENV_CREATOR_GUID)
            .map_err(|_| MemoqError::Config(format!("{} is not set", ENV_CREATOR_GUID)))?;
        let creator_user = Uuid::parse_str(creator.trim()).map_err(|e| {
            MemoqError::Config(format!("{} is not a GUID: {}", ENV_CREATOR_GUID, e))
        })?;

        let mut config = Self::new(base_url, creator_user);
        if let Ok(key) = std::env::var(ENV_API_KEY) {
            if !key.is_empty() {
                config.api_key = Some(key);
            }
        }
        Ok(config)
    }

    /// Reads the configuration from a JSON file:
    ///
    /// ```json
    /// {
    ///   "base_url": "http://localhost:8080/memoqservices",
    ///   "api_key": "...",
    ///   "creator_user": "00000000-0000-0000-0000-000000000001"
    /// }
    /// ```
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, MemoqError> {
        let text = fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    /// Parses the JSON form accepted by [`ClientConfig::from_json_file`].
    pub fn from_json_str(json: &str) -> Result<Self, MemoqError> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| MemoqError::Config(e.to_string()))?;
        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            ..config
        })
    }

    /// Endpoint URL of a service.
    pub fn service_url(&self, service: Service) -> String {
        format!("{}/{}", self.base_url, service.path())
    }
}

/// A project record as returned by `GetProject` and `ListProjects`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerProjectInfo {
    /// Server-assigned identifier.
    pub guid: Uuid,
    /// Project name.
    pub name: String,
    /// Project domain.
    pub domain: String,
    /// Source language code.
    pub source_language_code: Option<String>,
    /// Target language codes.
    pub target_language_codes: Vec<String>,
    /// Deadline, if set.
    pub deadline: Option<chrono::DateTime<chrono::Utc>>,
    /// Client metadata.
    pub client: Option<String>,
    /// Subject metadata.
    pub subject: Option<String>,
}

/// A translation document of a project (`ServerProjectTranslationDocInfo`).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDocument {
    /// Document identifier.
    pub document_guid: Uuid,
    /// Name of the imported file.
    pub document_name: String,
    /// Target language of this document.
    pub target_lang_code: String,
    /// Workflow status as reported by the server.
    pub workflow_status: Option<String>,
}

/// Generic `ResultInfo`: status plus an optional human-readable message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultInfo {
    /// Result status.
    pub status: ResultStatus,
    /// `MainMessage`, if any.
    pub message: Option<String>,
}

impl ResultInfo {
    /// Returns `true` for [`ResultStatus::Success`].
    pub fn is_success(&self) -> bool {
        self.status.is_success()
    }
}

/// Result of `CreateProjectFromTemplate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TemplateCreationResult {
    /// Status and message.
    pub info: ResultInfo,
    /// Identifier of the new project; absent on failure.
    pub project_guid: Option<Uuid>,
}

/// Result of `ImportTranslationDocument`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDocImportResult {
    /// Status and message.
    pub info: ResultInfo,
    /// Created documents, one per target language.
    pub document_guids: Vec<Uuid>,
}

/// Result of `ExportTranslationDocument` and `ExportTranslationDocument2`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationDocExportResult {
    /// Status and message.
    pub info: ResultInfo,
    /// Exported file in the file manager; absent on failure.
    pub file_guid: Option<Uuid>,
}

/// Statistics data for one target language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsResultForLang {
    /// Target language code.
    pub target_lang_code: String,
    /// Raw result data in the requested [`StatisticsResultFormat`].
    pub result_data: Vec<u8>,
}

/// Result of `GetStatisticsOnProject`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsResult {
    /// Status and message.
    pub info: ResultInfo,
    /// Per-language results.
    pub results_for_target_langs: Vec<StatisticsResultForLang>,
}

/// An open chunked download.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadSession {
    /// Session identifier.
    pub session_id: Uuid,
    /// Name of the file being downloaded.
    pub file_name: String,
    /// Size of the file in bytes.
    pub file_size: u64,
}

/// memoQ API client.
#[derive(Debug, Clone)]
pub struct Client {
    http_client: reqwest::Client,
    config: ClientConfig,
}

impl Client {
    /// Creates a new memoQ API client.
    pub fn new(config: ClientConfig) -> Result<Self, Box<dyn StdErr + Send + Sync>> {
        Self::with_http_config(config, HttpClientConfig::default())
    }

    /// Creates a new memoQ API client with custom HTTP client configuration.
    pub fn with_http_config(
        config: ClientConfig,
        http_config: HttpClientConfig,
    ) -> Result<Self, Box<dyn StdErr + Send + Sync>> {
        let http_client = http_config.build_client()?;
        Ok(Self {
            http_client,
            config,
        })
    }

    /// Returns the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Performs one SOAP call and returns the `<{operation}Response>` element.
    async fn call(
        &self,
        service: Service,
        operation: &str,
        body: Element,
    ) -> Result<XmlNode, MemoqError> {
        let envelope = Envelope::new(body)
            .api_key(self.config.api_key.as_deref())
            .to_xml();
        let url = self.config.service_url(service);

        debug!("{}.{} -> {}", service.contract(), operation, url);

        let response = self
            .http_client
            .post(&url)
            .header(CONTENT_TYPE, HeaderValue::from_static(soap::CONTENT_TYPE))
            .header("SOAPAction", soap::soap_action(service.contract(), operation))
            .body(envelope)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        debug!(
            "{}.{} <- HTTP {} ({} bytes)",
            service.contract(),
            operation,
            status.as_u16(),
            text.len()
        );

        // memoQ reports faults with HTTP 500, so the body is checked first.
        match soap::parse_response(&text) {
            Err(SoapError::Fault(fault)) => {
                debug!("{}.{} fault: {}", service.contract(), operation, fault);
                Err(MemoqError::Fault(fault))
            }
            _ if !status.is_success() => Err(MemoqError::Http {
                status: status.as_u16(),
                body: text,
            }),
            result => result.map_err(MemoqError::from),
        }
    }

    // =========================================================================
    // IServerProjectService
    // =========================================================================

    /// `ListProjects`: projects matching the filter.
    pub async fn list_projects(
        &self,
        filter: &ServerProjectListFilter,
    ) -> Result<Vec<ServerProjectInfo>, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "ListProjects",
                Element::new("ListProjects").child(filter.to_element("filter")),
            )
            .await?;

        match response.child("ListProjectsResult") {
            Some(result) => result
                .children_named("ServerProjectInfo")
                .map(parse_project_info)
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// `GetProject`: a single project. `None` when the server returns nil.
    pub async fn get_project(
        &self,
        project_guid: Uuid,
    ) -> Result<Option<ServerProjectInfo>, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "GetProject",
                Element::new("GetProject").child(Element::text("spGuid", project_guid)),
            )
            .await?;

        match response.child("GetProjectResult") {
            Some(result) if !result.nil => parse_project_info(result).map(Some),
            _ => Ok(None),
        }
    }

    /// `CreateProjectFromTemplate`.
    pub async fn create_project_from_template(
        &self,
        create_info: &TemplateBasedProjectCreateInfo,
    ) -> Result<TemplateCreationResult, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "CreateProjectFromTemplate",
                Element::new("CreateProjectFromTemplate")
                    .child(create_info.to_element("createInfo")),
            )
            .await?;

        let result = response.require("CreateProjectFromTemplateResult")?;
        Ok(TemplateCreationResult {
            info: parse_result_info(result)?,
            project_guid: parse_guid_of(result, "ProjectGuid")?,
        })
    }

    /// `CreateProject2`: returns the new project's identifier.
    pub async fn create_project2(
        &self,
        sp_info: &ServerProjectDesktopDocsCreateInfo,
    ) -> Result<Uuid, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "CreateProject2",
                Element::new("CreateProject2").child(sp_info.to_element("spInfo")),
            )
            .await?;

        parse_guid_of(&response, "CreateProject2Result")?
            .ok_or_else(|| MemoqError::Parse("CreateProject2Result is empty".to_string()))
    }

    /// `ImportTranslationDocument`: imports an uploaded file.
    ///
    /// With `target_lang_codes` set to `None` the document is imported for
    /// every target language of the project.
    pub async fn import_translation_document(
        &self,
        project_guid: Uuid,
        file_guid: Uuid,
        target_lang_codes: Option<&[String]>,
    ) -> Result<TranslationDocImportResult, MemoqError> {
        let targets = match target_lang_codes {
            Some(codes) => Element::string_array("targetLangCodes", codes),
            None => Element::nil("targetLangCodes"),
        };

        let response = self
            .call(
                Service::ServerProject,
                "ImportTranslationDocument",
                Element::new("ImportTranslationDocument")
                    .child(Element::text("serverProjectGuid", project_guid))
                    .child(Element::text("fileGuid", file_guid))
                    .child(targets)
                    .child(Element::nil("importSettingsXML")),
            )
            .await?;

        let result = response.require("ImportTranslationDocumentResult")?;
        let document_guids = match result.child("DocumentGuids") {
            Some(guids) => guids
                .values()
                .iter()
                .map(|g| parse_guid(g.as_str()))
                .collect::<Result<Vec<_>, _>>()?,
            None => Vec::new(),
        };

        Ok(TranslationDocImportResult {
            info: parse_result_info(result)?,
            document_guids,
        })
    }

    /// `ListProjectTranslationDocuments`.
    pub async fn list_project_translation_documents(
        &self,
        project_guid: Uuid,
    ) -> Result<Vec<TranslationDocument>, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "ListProjectTranslationDocuments",
                Element::new("ListProjectTranslationDocuments")
                    .child(Element::text("serverProjectGuid", project_guid)),
            )
            .await?;

        match response.child("ListProjectTranslationDocumentsResult") {
            Some(result) => result
                .children_named("ServerProjectTranslationDocInfo")
                .map(parse_document_info)
                .collect(),
            None => Ok(Vec::new()),
        }
    }

    /// `ExportTranslationDocument`: exports a document into the file manager.
    pub async fn export_translation_document(
        &self,
        project_guid: Uuid,
        document_guid: Uuid,
    ) -> Result<TranslationDocExportResult, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "ExportTranslationDocument",
                Element::new("ExportTranslationDocument")
                    .child(Element::text("serverProjectGuid", project_guid))
                    .child(Element::text("docGuid", document_guid)),
            )
            .await?;

        parse_export_result(response.require("ExportTranslationDocumentResult")?)
    }

    /// `ExportTranslationDocument2`: export with [`DocumentExportOptions`].
    pub async fn export_translation_document2(
        &self,
        project_guid: Uuid,
        document_guid: Uuid,
        options: &DocumentExportOptions,
    ) -> Result<TranslationDocExportResult, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "ExportTranslationDocument2",
                Element::new("ExportTranslationDocument2")
                    .child(Element::text("serverProjectGuid", project_guid))
                    .child(Element::text("docGuid", document_guid))
                    .child(options.to_element("options")),
            )
            .await?;

        parse_export_result(response.require("ExportTranslationDocument2Result")?)
    }

    /// `GetStatisticsOnProject`.
    pub async fn get_statistics_on_project(
        &self,
        project_guid: Uuid,
        target_lang_codes: &[String],
        options: &StatisticsOptions,
        result_format: StatisticsResultFormat,
    ) -> Result<StatisticsResult, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "GetStatisticsOnProject",
                Element::new("GetStatisticsOnProject")
                    .child(Element::text("serverProjectGuid", project_guid))
                    .child(Element::string_array("targetLangCodes", target_lang_codes))
                    .child(options.to_element("options"))
                    .child(Element::text("resultFormat", result_format)),
            )
            .await?;

        let result = response.require("GetStatisticsOnProjectResult")?;
        let results_for_target_langs = match result.child("ResultsForTargetLangs") {
            Some(langs) => langs
                .children_named("StatisticsResultForLang")
                .map(|lang| {
                    Ok(StatisticsResultForLang {
                        target_lang_code: lang
                            .text_of("TargetLangCode")
                            .unwrap_or_default()
                            .to_string(),
                        result_data: decode_base64(lang.text_of("ResultData").unwrap_or_default())?,
                    })
                })
                .collect::<Result<Vec<_>, MemoqError>>()?,
            None => Vec::new(),
        };

        Ok(StatisticsResult {
            info: parse_result_info(result)?,
            results_for_target_langs,
        })
    }

    /// `PretranslateProject`.
    pub async fn pretranslate_project(
        &self,
        project_guid: Uuid,
        target_lang_codes: &[String],
        options: &PretranslateOptions,
    ) -> Result<ResultInfo, MemoqError> {
        let response = self
            .call(
                Service::ServerProject,
                "PretranslateProject",
                Element::new("PretranslateProject")
                    .child(Element::text("serverProjectGuid", project_guid))
                    .child(Element::string_array("targetLangCodes", target_lang_codes))
                    .child(options.to_element("options")),
            )
            .await?;

        parse_result_info(response.require("PretranslateProjectResult")?)
    }

    /// `DeleteProject`.
    pub async fn delete_project(&self, project_guid: Uuid) -> Result<(), MemoqError> {
        self.call(
            Service::ServerProject,
            "DeleteProject",
            Element::new("DeleteProject").child(Element::text("serverProjectGuid", project_guid)),
        )
        .await?;
        Ok(())
    }

    // =========================================================================
    // IFileManagerService
    // =========================================================================

    /// `BeginChunkedFileUpload`: returns the identifier of the new file.
    pub async fn begin_chunked_file_upload(
        &self,
        file_name: &str,
        is_zipped: bool,
    ) -> Result<Uuid, MemoqError> {
        let response = self
            .call(
                Service::FileManager,
                "BeginChunkedFileUpload",
                Element::new("BeginChunkedFileUpload")
                    .child(Element::text("fileName", file_name))
                    .child(Element::text("isZipped", is_zipped)),
            )
            .await?;

        parse_guid_of(&response, "BeginChunkedFileUploadResult")?.ok_or_else(|| {
            MemoqError::Parse("BeginChunkedFileUploadResult is empty".to_string())
        })
    }

    /// `AddNextFileChunk`.
    pub async fn add_next_file_chunk(&self, file_guid: Uuid, data: &[u8]) -> Result<(), MemoqError> {
        self.call(
            Service::FileManager,
            "AddNextFileChunk",
            Element::new("AddNextFileChunk")
                .child(Element::text("fileIdAndSessionId", file_guid))
                .child(Element::text("fileData", BASE64.encode(data))),
        )
        .await?;
        Ok(())
    }

    /// `EndChunkedFileUpload`.
    pub async fn end_chunked_file_upload(&self, file_guid: Uuid) -> Result<(), MemoqError> {
        self.call(
            Service::FileManager,
            "EndChunkedFileUpload",
            Element::new("EndChunkedFileUpload")
                .child(Element::text("fileIdAndSessionId", file_guid)),
        )
        .await?;
        Ok(())
    }

    /// `BeginChunkedFileDownload`.
    pub async fn begin_chunked_file_download(
        &self,
        file_guid: Uuid,
        zip: bool,
    ) -> Result<DownloadSession, MemoqError> {
        let response = self
            .call(
                Service::FileManager,
                "BeginChunkedFileDownload",
                Element::new("BeginChunkedFileDownload")
                    .child(Element::text("fileGuid", file_guid))
                    .child(Element::text("zip", zip)),
            )
            .await?;

        let session_id = parse_guid_of(&response, "BeginChunkedFileDownloadResult")?
            .ok_or_else(|| {
                MemoqError::Parse("BeginChunkedFileDownloadResult is empty".to_string())
            })?;

        Ok(DownloadSession {
            session_id,
            file_name: response.text_of("fileName").unwrap_or_default().to_string(),
            file_size: response.parse_of("fileSize").unwrap_or(0),
        })
    }

    /// `GetNextFileChunk`: up to `byte_count` bytes; empty at end of file.
    pub async fn get_next_file_chunk(
        &self,
        session_id: Uuid,
        byte_count: usize,
    ) -> Result<Vec<u8>, MemoqError> {
        let response = self
            .call(
                Service::FileManager,
                "GetNextFileChunk",
                Element::new("GetNextFileChunk")
                    .child(Element::text("sessionId", session_id))
                    .child(Element::text("byteCount", byte_count)),
            )
            .await?;

        decode_base64(response.text_of("GetNextFileChunkResult").unwrap_or_default())
    }

    /// `EndChunkedFileDownload`.
    pub async fn end_chunked_file_download(&self, session_id: Uuid) -> Result<(), MemoqError> {
        self.call(
            Service::FileManager,
            "EndChunkedFileDownload",
            Element::new("EndChunkedFileDownload").child(Element::text("sessionId", session_id)),
        )
        .await?;
        Ok(())
    }

    /// `DeleteFile`: removes a file from the file manager.
    pub async fn delete_file(&self, file_guid: Uuid) -> Result<(), MemoqError> {
        self.call(
            Service::FileManager,
            "DeleteFile",
            Element::new("DeleteFile").child(Element::text("fileGuid", file_guid)),
        )
        .await?;
        Ok(())
    }

    /// Uploads a local file in [`FILE_CHUNK_SIZE`] chunks and returns its
    /// file manager identifier.
    pub async fn upload_file(&self, path: impl AsRef<Path>) -> Result<Uuid, MemoqError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| {
                MemoqError::Io(std::io::Error::new(
                    std::io::ErrorKind::InvalidInput,
                    format!("not a file path: {}", path.display()),
                ))
            })?;
        let data = fs::read(path)?;

        let file_guid = self.begin_chunked_file_upload(file_name, false).await?;
        for chunk in data.chunks(FILE_CHUNK_SIZE) {
            self.add_next_file_chunk(file_guid, chunk).await?;
        }
        self.end_chunked_file_upload(file_guid).await?;

        info!("Uploaded {} ({} bytes) as {}", file_name, data.len(), file_guid);
        Ok(file_guid)
    }

    /// Downloads a file manager file into `dir`, under the name reported by
    /// the server, and returns the written path.
    pub async fn download_file(
        &self,
        file_guid: Uuid,
        dir: impl AsRef<Path>,
    ) -> Result<PathBuf, MemoqError> {
        let session = self.begin_chunked_file_download(file_guid, false).await?;

        // Only the final component is used so the server cannot escape `dir`.
        let file_name = Path::new(&session.file_name)
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_else(|| file_guid.to_string().into());

        // The announced size is a hint only; preallocation is capped.
        let capacity = usize::try_from(session.file_size)
            .unwrap_or(FILE_CHUNK_SIZE)
            .min(FILE_CHUNK_SIZE);
        let mut data = Vec::with_capacity(capacity);
        loop {
            let chunk = self
                .get_next_file_chunk(session.session_id, FILE_CHUNK_SIZE)
                .await?;
            if chunk.is_empty() {
                break;
            }
            data.extend_from_slice(&chunk);
            if session.file_size > 0 && data.len() as u64 >= session.file_size {
                break;
            }
        }
        self.end_chunked_file_download(session.session_id).await?;

        if session.file_size > 0 && data.len() as u64 != session.file_size {
            warn!(
                "Downloaded {} bytes of {}, server announced {}",
                data.len(),
                session.file_name,
                session.file_size
            );
        }

        let target = dir.as_ref().join(file_name);
        fs::write(&target, &data)?;
        info!("Downloaded {} to {}", session.file_name, target.display());
        Ok(target)
    }
}

fn parse_guid(value: &str) -> Result<Uuid, MemoqError> {
    Uuid::parse_str(value.trim())
        .map_err(|e| MemoqError::Parse(format!("invalid GUID {:?}: {}", value, e)))
}

/// Parses an optional GUID child. The all-zero GUID counts as absent.
fn parse_guid_of(node: &XmlNode, name: &str) -> Result<Option<Uuid>, MemoqError> {
    match node.text_of(name) {
        Some(value) => parse_guid(value).map(|g| Some(g).filter(|g| !g.is_nil())),
        None => Ok(None),
    }
}

fn decode_base64(value: &str) -> Result<Vec<u8>, MemoqError> {
    let compact: String = value.chars().filter(|c| !c.is_whitespace()).collect();
    BASE64
        .decode(compact)
        .map_err(|e| MemoqError::Parse(format!("invalid base64 data: {}", e)))
}

fn parse_result_info(node: &XmlNode) -> Result<ResultInfo, MemoqError> {
    let status = node
        .text_of("ResultStatus")
        .ok_or_else(|| MemoqError::Parse(format!("{} has no ResultStatus", node.name)))?;
    let status = ResultStatus::from_name(status)
        .ok_or_else(|| MemoqError::Parse(format!("unknown ResultStatus {:?}", status)))?;

    Ok(ResultInfo {
        status,
        message: node.text_of("MainMessage").map(str::to_string),
    })
}

fn parse_export_result(node: &XmlNode) -> Result<TranslationDocExportResult, MemoqError> {
    Ok(TranslationDocExportResult {
        info: parse_result_info(node)?,
        file_guid: parse_guid_of(node, "FileGuid")?,
    })
}

/// Parses a `ServerProjectInfo` element.
pub fn parse_project_info(node: &XmlNode) -> Result<ServerProjectInfo, MemoqError> {
    let guid = parse_guid_of(node, "ServerProjectGuid")?
        .ok_or_else(|| MemoqError::Parse("ServerProjectInfo has no ServerProjectGuid".to_string()))?;

    Ok(ServerProjectInfo {
        guid,
        name: node.text_of("Name").unwrap_or_default().to_string(),
        domain: node.text_of("Domain").unwrap_or_default().to_string(),
        source_language_code: node.text_of("SourceLanguageCode").map(str::to_string),
        target_language_codes: node
            .child("TargetLanguageCodes")
            .map(XmlNode::values)
            .unwrap_or_default(),
        deadline: node.text_of("Deadline").and_then(parse_datetime),
        client: node.text_of("Client").map(str::to_string),
        subject: node.text_of("Subject").map(str::to_string),
    })
}

/// Parses a `ServerProjectTranslationDocInfo` element.
pub fn parse_document_info(node: &XmlNode) -> Result<TranslationDocument, MemoqError> {
    let document_guid = parse_guid_of(node, "DocumentGuid")?.ok_or_else(|| {
        MemoqError::Parse("ServerProjectTranslationDocInfo has no DocumentGuid".to_string())
    })?;

    Ok(TranslationDocument {
        document_guid,
        document_name: node.text_of("DocumentName").unwrap_or_default().to_string(),
        target_lang_code: node.text_of("TargetLangCode").unwrap_or_default().to_string(),
        workflow_status: node.text_of("WorkflowStatus").map(str::to_string),
    })
}
