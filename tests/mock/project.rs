//! Mock-based tests for MemoQProject.
//!
//! Every test mounts the exact SOAP operations the wrapper is expected to
//! call, with `expect` counts verified when the mock server drops.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use memoq_wsapi::memoq::{
    DocumentExportOptions, MemoQProject, MemoqError, PretranslateOptions, StatisticsOptions,
};
use memoq_wsapi::types::PretranslateLookupBehavior;
use wiremock::matchers::body_string_contains;
use wiremock::{MockServer, ResponseTemplate};

use crate::common::constants::*;
use crate::common::*;

fn ok(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_string(body)
}

fn server_fault(message: &str) -> ResponseTemplate {
    ResponseTemplate::new(500).set_body_string(fault(message))
}

/// Mounts `GetProject` for [`PROJECT_GUID`] and loads it.
async fn loaded_project(server: &MockServer) -> MemoQProject {
    project_op("GetProject")
        .and(body_string_contains(PROJECT_GUID.to_string()))
        .respond_with(ok(get_project_response(
            PROJECT_GUID,
            "Contract batch",
            "legal",
            "eng",
            &["ger", "fre"],
        )))
        .mount(server)
        .await;

    let mut memoq = mock_project(server);
    assert!(memoq.get_project_by_guid(PROJECT_GUID).await.unwrap());
    memoq
}

// =============================================================================
// Lookup
// =============================================================================

#[tokio::test]
async fn test_get_project_by_domain_loads_first_match() {
    let server = setup_mock_server().await;

    project_op("ListProjects")
        .and(body_string_contains("<filter><Domain>legal</Domain></filter>"))
        .and(body_string_contains(format!("<ApiKey xmlns=\"http://kilgray.com/memoqservices/2007\">{}</ApiKey>", TEST_API_KEY)))
        .respond_with(ok(list_projects_response(&[
            (PROJECT_GUID, "Contract batch", "legal"),
            (DOC_GUID_1, "Older batch", "legal"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    assert!(memoq.get_project_by_domain("legal").await.unwrap());

    assert_eq!(memoq.project.guid(), Some(PROJECT_GUID));
    assert_eq!(memoq.project.name, "Contract batch");
    assert_eq!(memoq.project.domain, "legal");
    assert_eq!(memoq.project.languages.source.as_deref(), Some("eng"));
    assert_eq!(memoq.project.languages.target, vec!["ger"]);
}

#[tokio::test]
async fn test_get_project_by_domain_without_match_clears_project() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;

    project_op("ListProjects")
        .respond_with(ok(list_projects_response(&[])))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!memoq.get_project_by_domain("nothing-here").await.unwrap());
    assert!(memoq.project.guid().is_none());
    // local fields survive
    assert_eq!(memoq.project.name, "Contract batch");
}

#[tokio::test]
async fn test_get_project_by_guid_fault_clears_project() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;

    project_op("GetProject")
        .and(body_string_contains(DOC_GUID_1.to_string()))
        .respond_with(server_fault("No project with the specified guid exists."))
        .expect(1)
        .mount(&server)
        .await;

    assert!(!memoq.get_project_by_guid(DOC_GUID_1).await.unwrap());
    assert!(memoq.project.guid().is_none());
}

#[tokio::test]
async fn test_get_project_by_guid_nil_result() {
    let server = setup_mock_server().await;

    project_op("GetProject")
        .respond_with(ok(op_response(
            "GetProject",
            r#"<GetProjectResult i:nil="true"/>"#,
        )))
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    assert!(!memoq.get_project_by_guid(PROJECT_GUID).await.unwrap());
    assert!(!memoq.project.is_loaded());
}

#[tokio::test]
async fn test_get_project_by_guid_transport_error_propagates() {
    let server = setup_mock_server().await;

    project_op("GetProject")
        .respond_with(ResponseTemplate::new(503).set_body_string("<html>Service Unavailable</html>"))
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    match memoq.get_project_by_guid(PROJECT_GUID).await {
        Err(MemoqError::Http { status, body }) => {
            assert_eq!(status, 503);
            assert!(body.contains("Service Unavailable"));
        }
        other => panic!("expected HTTP error, got {:?}", other),
    }
}

// =============================================================================
// Creation
// =============================================================================

#[tokio::test]
async fn test_create_project_reloads_from_server() {
    let server = setup_mock_server().await;

    project_op("CreateProject2")
        .and(body_string_contains("<Name>Q1 batch</Name>"))
        .and(body_string_contains("<SourceLanguageCode>eng</SourceLanguageCode>"))
        .and(body_string_contains("<a:string>ger</a:string><a:string>fre</a:string>"))
        .and(body_string_contains(format!("<CreatorUser>{}</CreatorUser>", CREATOR_GUID)))
        .and(body_string_contains("<RecordVersionHistory>true</RecordVersionHistory>"))
        .respond_with(ok(value_response("CreateProject2", PROJECT_GUID)))
        .expect(1)
        .mount(&server)
        .await;

    project_op("GetProject")
        .and(body_string_contains(PROJECT_GUID.to_string()))
        .respond_with(ok(get_project_response(
            PROJECT_GUID,
            "Q1 batch",
            "",
            "eng",
            &["ger", "fre"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.name = "Q1 batch".to_string();
    memoq.project.languages.source = Some("eng".to_string());
    memoq.project.languages.target = vec!["ger".to_string(), "fre".to_string()];

    assert!(memoq.create_project().await.unwrap());
    assert_eq!(memoq.project.guid(), Some(PROJECT_GUID));
    assert_eq!(
        memoq.project.deadline.to_rfc3339(),
        "2030-05-01T12:00:00+00:00"
    );
}

#[tokio::test]
async fn test_create_project_without_languages_sends_nothing() {
    let server = setup_mock_server().await;

    project_op("CreateProject2")
        .respond_with(ok(value_response("CreateProject2", PROJECT_GUID)))
        .expect(0)
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());
    assert!(memoq.project_options().is_none());
    assert!(!memoq.create_project().await.unwrap());
    assert!(!memoq.project.is_loaded());
}

#[tokio::test]
async fn test_create_project_duplicate_name_is_fault() {
    let server = setup_mock_server().await;

    project_op("CreateProject2")
        .respond_with(server_fault("A project with the same name already exists."))
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());
    memoq.project.languages.target = vec!["ger".to_string()];

    let err = memoq.create_project().await.unwrap_err();
    assert!(err.is_fault());
    assert!(err.to_string().contains("already exists"));
}

#[tokio::test]
async fn test_create_project_with_overridden_options() {
    let server = setup_mock_server().await;

    project_op("CreateProject2")
        .and(body_string_contains("<Client>ACME</Client>"))
        .and(body_string_contains("<DownloadSkeleton>true</DownloadSkeleton>"))
        .respond_with(ok(value_response("CreateProject2", PROJECT_GUID)))
        .expect(1)
        .mount(&server)
        .await;
    project_op("GetProject")
        .respond_with(ok(get_project_response(PROJECT_GUID, "x", "", "eng", &["ger"])))
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());
    memoq.project.languages.target = vec!["ger".to_string()];

    let mut options = memoq.project_options().unwrap();
    options.client = Some("ACME".to_string());
    options.download_skeleton = true;

    assert!(memoq.create_project_with(&options).await.unwrap());
}

#[tokio::test]
async fn test_create_project_with_overridden_name_and_domain() {
    let server = setup_mock_server().await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());
    memoq.project.languages.target = vec!["ger".to_string()];

    let mut options = memoq.project_options().unwrap();
    options.name += "_override";
    options.domain = "override".to_string();

    project_op("CreateProject2")
        .and(body_string_contains(format!("<Name>{}</Name>", options.name)))
        .and(body_string_contains("<Domain>override</Domain>"))
        .respond_with(ok(value_response("CreateProject2", PROJECT_GUID)))
        .expect(1)
        .mount(&server)
        .await;
    project_op("GetProject")
        .respond_with(ok(get_project_response(
            PROJECT_GUID,
            &options.name,
            "override",
            "eng",
            &["ger"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    assert!(memoq.create_project_with(&options).await.unwrap());
    assert_eq!(memoq.project.guid(), Some(PROJECT_GUID));
    assert_eq!(memoq.project.name, options.name);
    assert_eq!(memoq.project.domain, "override");
}

#[tokio::test]
async fn test_create_project_reload_fault_keeps_guid() {
    let server = setup_mock_server().await;

    project_op("CreateProject2")
        .respond_with(ok(value_response("CreateProject2", PROJECT_GUID)))
        .expect(1)
        .mount(&server)
        .await;
    project_op("GetProject")
        .respond_with(server_fault("Object reference not set to an instance of an object."))
        .expect(1)
        .mount(&server)
        .await;
    project_op("DeleteProject")
        .and(body_string_contains(PROJECT_GUID.to_string()))
        .respond_with(ok(void_response("DeleteProject")))
        .expect(1)
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());
    memoq.project.languages.target = vec!["ger".to_string()];

    let err = memoq.create_project().await.unwrap_err();
    assert!(err.is_fault());
    assert_eq!(memoq.project.guid(), Some(PROJECT_GUID));

    // the created project is still reachable
    memoq.delete().await.unwrap();
}

#[tokio::test]
async fn test_create_project_from_template() {
    let server = setup_mock_server().await;

    project_op("CreateProjectFromTemplate")
        .and(body_string_contains(format!("<TemplateGuid>{}</TemplateGuid>", TEMPLATE_GUID)))
        .and(body_string_contains("<Domain>legal</Domain>"))
        .respond_with(ok(op_response(
            "CreateProjectFromTemplate",
            &format!(
                "<CreateProjectFromTemplateResult>{}<ProjectGuid>{}</ProjectGuid></CreateProjectFromTemplateResult>",
                result_info("Success", None),
                PROJECT_GUID
            ),
        )))
        .expect(1)
        .mount(&server)
        .await;
    project_op("GetProject")
        .respond_with(ok(get_project_response(
            PROJECT_GUID,
            "From template",
            "legal",
            "eng",
            &["ger", "ita"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.domain = "legal".to_string();
    memoq.project.languages.source = Some("eng".to_string());

    assert!(memoq.create_project_from_template(TEMPLATE_GUID).await.unwrap());
    // target languages come from the template
    assert_eq!(memoq.project.languages.target, vec!["ger", "ita"]);
}

#[tokio::test]
async fn test_create_project_from_template_with_overrides() {
    let server = setup_mock_server().await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());
    memoq.project.languages.target = vec!["ger".to_string(), "fre".to_string()];

    let mut options = memoq.template_project_options(TEMPLATE_GUID).unwrap();
    options.name += "_override";
    options.domain = "override".to_string();

    project_op("CreateProjectFromTemplate")
        .and(body_string_contains(format!("<Name>{}</Name>", options.name)))
        .and(body_string_contains("<Domain>override</Domain>"))
        .respond_with(ok(op_response(
            "CreateProjectFromTemplate",
            &format!(
                "<CreateProjectFromTemplateResult>{}<ProjectGuid>{}</ProjectGuid></CreateProjectFromTemplateResult>",
                result_info("Warning", Some("Template has no TM")),
                PROJECT_GUID
            ),
        )))
        .expect(1)
        .mount(&server)
        .await;
    project_op("GetProject")
        .respond_with(ok(get_project_response(
            PROJECT_GUID,
            &options.name,
            "override",
            "eng",
            &["ger", "fre"],
        )))
        .expect(1)
        .mount(&server)
        .await;

    assert!(memoq
        .create_project_from_template_with(&options)
        .await
        .unwrap());
    assert_eq!(memoq.project.guid(), Some(PROJECT_GUID));
    assert_eq!(memoq.project.domain, "override");
    assert_eq!(memoq.project.name, options.name);
    assert_eq!(memoq.project.languages.target, vec!["ger", "fre"]);
}

#[tokio::test]
async fn test_create_project_from_template_reload_fault_propagates() {
    let server = setup_mock_server().await;

    project_op("CreateProjectFromTemplate")
        .respond_with(ok(op_response(
            "CreateProjectFromTemplate",
            &format!(
                "<CreateProjectFromTemplateResult>{}<ProjectGuid>{}</ProjectGuid></CreateProjectFromTemplateResult>",
                result_info("Success", None),
                PROJECT_GUID
            ),
        )))
        .mount(&server)
        .await;
    project_op("GetProject")
        .respond_with(server_fault("Internal error."))
        .expect(1)
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());

    assert!(memoq
        .create_project_from_template(TEMPLATE_GUID)
        .await
        .unwrap_err()
        .is_fault());
    assert_eq!(memoq.project.guid(), Some(PROJECT_GUID));
}

#[tokio::test]
async fn test_create_project_from_template_error_status() {
    let server = setup_mock_server().await;

    project_op("CreateProjectFromTemplate")
        .respond_with(ok(op_response(
            "CreateProjectFromTemplate",
            &format!(
                "<CreateProjectFromTemplateResult>{}<ProjectGuid>00000000-0000-0000-0000-000000000000</ProjectGuid></CreateProjectFromTemplateResult>",
                result_info("Error", Some("Template not found"))
            ),
        )))
        .mount(&server)
        .await;
    project_op("GetProject")
        .respond_with(ok(void_response("GetProject")))
        .expect(0)
        .mount(&server)
        .await;

    let mut memoq = mock_project(&server);
    memoq.project.languages.source = Some("eng".to_string());
    assert!(!memoq.create_project_from_template(TEMPLATE_GUID).await.unwrap());
}

#[tokio::test]
async fn test_template_options_without_source_language() {
    let server = setup_mock_server().await;
    let mut memoq = mock_project(&server);
    assert!(memoq.template_project_options(TEMPLATE_GUID).is_none());
    assert!(!memoq.create_project_from_template(TEMPLATE_GUID).await.unwrap());
}

// =============================================================================
// Documents
// =============================================================================

async fn mount_upload(server: &MockServer) {
    file_op("BeginChunkedFileUpload")
        .and(body_string_contains("<fileName>contract.docx</fileName>"))
        .and(body_string_contains("<isZipped>false</isZipped>"))
        .respond_with(ok(value_response("BeginChunkedFileUpload", FILE_GUID)))
        .expect(1)
        .mount(server)
        .await;
    file_op("AddNextFileChunk")
        .and(body_string_contains(BASE64.encode(b"docx bytes")))
        .respond_with(ok(void_response("AddNextFileChunk")))
        .expect(1)
        .mount(server)
        .await;
    file_op("EndChunkedFileUpload")
        .respond_with(ok(void_response("EndChunkedFileUpload")))
        .expect(1)
        .mount(server)
        .await;
    file_op("DeleteFile")
        .and(body_string_contains(FILE_GUID.to_string()))
        .respond_with(ok(void_response("DeleteFile")))
        .expect(1)
        .mount(server)
        .await;
}

fn import_response(status: &str) -> String {
    op_response(
        "ImportTranslationDocument",
        &format!(
            r#"<ImportTranslationDocumentResult>{}<DocumentGuids xmlns:a="http://schemas.microsoft.com/2003/10/Serialization/Arrays"><a:guid>{}</a:guid><a:guid>{}</a:guid></DocumentGuids></ImportTranslationDocumentResult>"#,
            result_info(status, None),
            DOC_GUID_1,
            DOC_GUID_2
        ),
    )
}

#[tokio::test]
async fn test_import_document() {
    let server = setup_mock_server().await;
    let memoq = loaded_project(&server).await;
    mount_upload(&server).await;

    project_op("ImportTranslationDocument")
        .and(body_string_contains(format!("<fileGuid>{}</fileGuid>", FILE_GUID)))
        .and(body_string_contains("<targetLangCodes xmlns:i=\"http://www.w3.org/2001/XMLSchema-instance\" i:nil=\"true\"/>"))
        .respond_with(ok(import_response("Success")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.docx");
    std::fs::write(&path, b"docx bytes").unwrap();

    assert!(memoq.import_document(&path).await.unwrap());
}

#[tokio::test]
async fn test_import_document_warning_still_deletes_upload() {
    let server = setup_mock_server().await;
    let memoq = loaded_project(&server).await;
    mount_upload(&server).await;

    project_op("ImportTranslationDocument")
        .respond_with(ok(import_response("Warning")))
        .expect(1)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("contract.docx");
    std::fs::write(&path, b"docx bytes").unwrap();

    assert!(!memoq.import_document(&path).await.unwrap());
}

#[tokio::test]
async fn test_import_missing_file_is_io_error() {
    let server = setup_mock_server().await;
    let memoq = loaded_project(&server).await;

    file_op("BeginChunkedFileUpload")
        .respond_with(ok(value_response("BeginChunkedFileUpload", FILE_GUID)))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    let result = memoq.import_document(dir.path().join("absent.docx")).await;
    assert!(matches!(result, Err(MemoqError::Io(_))));
}

#[tokio::test]
async fn test_get_project_documents() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;

    project_op("ListProjectTranslationDocuments")
        .and(body_string_contains(PROJECT_GUID.to_string()))
        .respond_with(ok(documents_response(&[
            (DOC_GUID_1, "contract.docx", "ger"),
            (DOC_GUID_2, "contract.docx", "fre"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let documents = memoq.get_project_documents().await.unwrap();
    assert_eq!(documents.len(), 2);
    assert_eq!(documents[0].document_guid, DOC_GUID_1);
    assert_eq!(documents[1].target_lang_code, "fre");
    assert_eq!(
        documents[0].workflow_status.as_deref(),
        Some("TranslationInProgress")
    );
    assert_eq!(memoq.documents.len(), 2);
}

// =============================================================================
// Export
// =============================================================================

async fn mount_single_document_export(server: &MockServer, operation: &str, content: &[u8]) {
    project_op("ListProjectTranslationDocuments")
        .respond_with(ok(documents_response(&[(DOC_GUID_1, "contract.docx", "ger")])))
        .expect(1)
        .mount(server)
        .await;
    project_op(operation)
        .and(body_string_contains(format!("<docGuid>{}</docGuid>", DOC_GUID_1)))
        .respond_with(ok(op_response(
            operation,
            &format!(
                "<{op}Result><FileGuid>{}</FileGuid>{}</{op}Result>",
                FILE_GUID,
                result_info("Success", None),
                op = operation
            ),
        )))
        .expect(1)
        .mount(server)
        .await;
    file_op("BeginChunkedFileDownload")
        .and(body_string_contains(format!("<fileGuid>{}</fileGuid>", FILE_GUID)))
        .respond_with(ok(begin_download_response(
            SESSION_GUID,
            "contract_ger.docx",
            content.len() as u64,
        )))
        .expect(1)
        .mount(server)
        .await;
    file_op("GetNextFileChunk")
        .respond_with(ok(value_response("GetNextFileChunk", BASE64.encode(content))))
        .expect(1)
        .mount(server)
        .await;
    file_op("EndChunkedFileDownload")
        .respond_with(ok(void_response("EndChunkedFileDownload")))
        .expect(1)
        .mount(server)
        .await;
    file_op("DeleteFile")
        .and(body_string_contains(FILE_GUID.to_string()))
        .respond_with(ok(void_response("DeleteFile")))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_export_documents() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;
    mount_single_document_export(&server, "ExportTranslationDocument", b"translated").await;

    let dir = tempfile::tempdir().unwrap();
    assert!(memoq.export_documents(dir.path()).await.unwrap());

    let exported = std::fs::read(dir.path().join("contract_ger.docx")).unwrap();
    assert_eq!(exported, b"translated");
}

#[tokio::test]
async fn test_export_documents2_sends_options() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;
    mount_single_document_export(&server, "ExportTranslationDocument2", b"v2").await;

    let dir = tempfile::tempdir().unwrap();
    let options = memoq.export_options();
    assert_eq!(options, DocumentExportOptions::default());
    assert!(memoq.export_documents2(dir.path()).await.unwrap());
    assert_eq!(
        std::fs::read(dir.path().join("contract_ger.docx")).unwrap(),
        b"v2"
    );

    let requests = server.received_requests().await.unwrap();
    let export = requests
        .iter()
        .map(|r| String::from_utf8_lossy(&r.body).into_owned())
        .find(|body| body.contains("<ExportTranslationDocument2 "))
        .unwrap();
    assert!(export.contains(
        "<options><CopySourceToEmptyTarget>false</CopySourceToEmptyTarget>"
    ));
}

#[tokio::test]
async fn test_export_failure_status() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;

    project_op("ListProjectTranslationDocuments")
        .respond_with(ok(documents_response(&[(DOC_GUID_1, "contract.docx", "ger")])))
        .mount(&server)
        .await;
    project_op("ExportTranslationDocument")
        .respond_with(ok(op_response(
            "ExportTranslationDocument",
            &format!(
                r#"<ExportTranslationDocumentResult><FileGuid>00000000-0000-0000-0000-000000000000</FileGuid>{}</ExportTranslationDocumentResult>"#,
                result_info("Error", Some("Filter failed"))
            ),
        )))
        .mount(&server)
        .await;
    file_op("BeginChunkedFileDownload")
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    assert!(!memoq.export_documents(dir.path()).await.unwrap());
}

#[tokio::test]
async fn test_export_without_documents_is_false() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;

    project_op("ListProjectTranslationDocuments")
        .respond_with(ok(documents_response(&[])))
        .mount(&server)
        .await;

    let dir = tempfile::tempdir().unwrap();
    assert!(!memoq.export_documents(dir.path()).await.unwrap());
}

// =============================================================================
// Statistics
// =============================================================================

fn statistics_response(langs: &[(&str, &[u8])]) -> String {
    let items: String = langs
        .iter()
        .map(|(lang, data)| {
            format!(
                "<StatisticsResultForLang><ResultData>{}</ResultData><TargetLangCode>{}</TargetLangCode></StatisticsResultForLang>",
                BASE64.encode(data),
                lang
            )
        })
        .collect();
    op_response(
        "GetStatisticsOnProject",
        &format!(
            "<GetStatisticsOnProjectResult>{}<ResultsForTargetLangs>{}</ResultsForTargetLangs></GetStatisticsOnProjectResult>",
            result_info("Success", None),
            items
        ),
    )
}

#[tokio::test]
async fn test_run_and_save_statistics() {
    let server = setup_mock_server().await;
    let memoq = loaded_project(&server).await;

    project_op("GetStatisticsOnProject")
        .and(body_string_contains("<resultFormat>CSV_MemoQ</resultFormat>"))
        .and(body_string_contains("<a:string>ger</a:string><a:string>fre</a:string>"))
        .and(body_string_contains("<Algorithm>MemoQ</Algorithm>"))
        .respond_with(ok(statistics_response(&[
            ("ger", b"File;Words\ncontract.docx;120\n"),
            ("fre", b"File;Words\ncontract.docx;118\n"),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let statistics = memoq.run_statistics().await.unwrap();
    assert!(statistics.info.is_success());
    assert_eq!(statistics.results_for_target_langs.len(), 2);

    let dir = tempfile::tempdir().unwrap();
    let written = memoq.save_statistics(dir.path(), &statistics).unwrap();
    assert_eq!(
        written,
        vec![
            dir.path().join("Contract batch_ger.csv"),
            dir.path().join("Contract batch_fre.csv"),
        ]
    );
    assert_eq!(
        std::fs::read_to_string(&written[0]).unwrap(),
        "File;Words\ncontract.docx;120\n"
    );
}

#[tokio::test]
async fn test_save_statistics_with_options() {
    let server = setup_mock_server().await;
    let memoq = loaded_project(&server).await;

    project_op("GetStatisticsOnProject")
        .and(body_string_contains("<Algorithm>Trados</Algorithm>"))
        .and(body_string_contains("<IncludeLockedRows>true</IncludeLockedRows>"))
        .respond_with(ok(statistics_response(&[("ger", b"x")])))
        .expect(1)
        .mount(&server)
        .await;

    let options = StatisticsOptions {
        algorithm: memoq_wsapi::types::StatisticsAlgorithm::Trados,
        include_locked_rows: true,
        ..memoq.statistics_options()
    };

    let dir = tempfile::tempdir().unwrap();
    let written = memoq.save_statistics_with(dir.path(), &options).await.unwrap();
    assert_eq!(written.len(), 1);
    assert_eq!(std::fs::read(&written[0]).unwrap(), b"x");
}

// =============================================================================
// Pretranslation
// =============================================================================

#[tokio::test]
async fn test_pretranslate_project_defaults() {
    let server = setup_mock_server().await;
    let memoq = loaded_project(&server).await;

    project_op("PretranslateProject")
        .and(body_string_contains("<GoodMatchRate>80</GoodMatchRate>"))
        .and(body_string_contains("<LockPretranslated>true</LockPretranslated>"))
        .and(body_string_contains(
            "<PretranslateLookupBehavior>GoodMatch</PretranslateLookupBehavior>",
        ))
        .respond_with(ok(op_response(
            "PretranslateProject",
            &format!(
                "<PretranslateProjectResult>{}</PretranslateProjectResult>",
                result_info("Warning", Some("No translation memory"))
            ),
        )))
        .expect(1)
        .mount(&server)
        .await;

    // a warning is not a failure
    assert!(memoq.pretranslate_project().await.unwrap());
}

#[tokio::test]
async fn test_pretranslate_project_error_status() {
    let server = setup_mock_server().await;
    let memoq = loaded_project(&server).await;

    project_op("PretranslateProject")
        .and(body_string_contains(
            "<PretranslateLookupBehavior>ExactMatch</PretranslateLookupBehavior>",
        ))
        .respond_with(ok(op_response(
            "PretranslateProject",
            &format!(
                "<PretranslateProjectResult>{}</PretranslateProjectResult>",
                result_info("Error", Some("Project is locked"))
            ),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let options = PretranslateOptions {
        pretranslate_lookup_behavior: PretranslateLookupBehavior::ExactMatch,
        ..memoq.pretranslate_options()
    };
    assert!(!memoq.pretranslate_project_with(&options).await.unwrap());
}

// =============================================================================
// Deletion
// =============================================================================

#[tokio::test]
async fn test_delete_unloads_project() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;
    memoq.documents = vec![memoq_wsapi::memoq::TranslationDocument {
        document_guid: DOC_GUID_1,
        document_name: "contract.docx".to_string(),
        target_lang_code: "ger".to_string(),
        workflow_status: None,
    }];

    project_op("DeleteProject")
        .and(body_string_contains(format!(
            "<serverProjectGuid>{}</serverProjectGuid>",
            PROJECT_GUID
        )))
        .respond_with(ok(void_response("DeleteProject")))
        .expect(1)
        .mount(&server)
        .await;

    memoq.delete().await.unwrap();
    assert!(memoq.project.guid().is_none());
    assert!(memoq.documents.is_empty());

    // nothing left to delete
    assert!(matches!(memoq.delete().await, Err(MemoqError::NoProject)));
}

#[tokio::test]
async fn test_delete_fault_keeps_project() {
    let server = setup_mock_server().await;
    let mut memoq = loaded_project(&server).await;

    project_op("DeleteProject")
        .respond_with(server_fault("Project is checked out."))
        .mount(&server)
        .await;

    assert!(memoq.delete().await.unwrap_err().is_fault());
    assert_eq!(memoq.project.guid(), Some(PROJECT_GUID));
}
