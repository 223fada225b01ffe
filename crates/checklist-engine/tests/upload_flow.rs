//! Upload/rename workflow against the in-memory store

use checklist_core::{variants, DocumentStatus};
use checklist_engine::{
    ChecklistError, FileHandle, MalformedUploadError, NotificationKind, StoreError,
    StoreOperation, UploadState,
};
use checklist_test_utils::{
    full_cycle_harness, physician_harness, unreviewed, validated_variant, StoreCall,
    TestHarness, TEST_RECORD,
};
use pretty_assertions::assert_eq;

use UploadState::*;

#[tokio::test]
async fn upload_assigns_title_then_pending_then_reloads() {
    let h = physician_harness();
    let cv = h.store.platform_upload(TEST_RECORD, "photo.jpeg").await;

    let receipt = h
        .vm
        .handle_upload("physicianCv", FileHandle::uploaded(cv.clone(), "photo.jpeg"))
        .await
        .unwrap();

    assert_eq!(receipt.title, "Physician Cv.jpeg");
    assert_eq!(receipt.content_version_id, cv);
    assert_eq!(
        receipt.history,
        vec![Received, TitleAssigned, Persisted, StatusPending, Reloaded]
    );

    assert_eq!(
        h.store.calls().await,
        vec![
            StoreCall::CreateOrRename {
                content_version_id: cv.clone(),
                new_title: "Physician Cv.jpeg".into(),
            },
            StoreCall::UpdateDocumentStatus {
                content_version_id: cv.clone(),
                new_title: "Physician Cv.jpeg".into(),
                status: DocumentStatus::Pending,
            },
            StoreCall::FetchDocuments {
                record_id: h.record_id(),
            },
        ]
    );

    let state = h.vm.state().unwrap();
    assert_eq!(state.status("physicianCv"), Some(&DocumentStatus::Pending));
    assert_eq!(state.status("crmLicense"), Some(&DocumentStatus::NoFile));

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Success);
    assert_eq!(notifications[0].title, "Success");
    assert_eq!(notifications[0].message, "File uploaded successfully");
}

#[tokio::test]
async fn single_version_slot_replaces_existing_document() {
    let h = full_cycle_harness();

    let first = h.store.platform_upload(TEST_RECORD, "w9-2023.pdf").await;
    h.vm
        .handle_upload("W9", FileHandle::uploaded(first, "w9-2023.pdf"))
        .await
        .unwrap();

    let second = h.store.platform_upload(TEST_RECORD, "w9-2024.pdf").await;
    let receipt = h
        .vm
        .handle_upload("W9", FileHandle::uploaded(second.clone(), "w9-2024.pdf"))
        .await
        .unwrap();

    assert_eq!(h.store.call_count(StoreOperation::SaveNewVersion).await, 2);
    assert_eq!(h.store.call_count(StoreOperation::CreateOrRename).await, 0);

    let documents = h.store.documents(&h.record_id()).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "W9.pdf");
    assert_eq!(documents[0].content_version_id, receipt.content_version_id);
    assert_ne!(receipt.content_version_id, second);
    assert_eq!(documents[0].status, DocumentStatus::Pending);
}

#[tokio::test]
async fn failed_rename_skips_pending_and_notifies_once() {
    let h = physician_harness();
    let cv = h.store.platform_upload(TEST_RECORD, "photo.jpeg").await;
    h.store
        .fail_on(
            StoreOperation::CreateOrRename,
            StoreError::permission(StoreOperation::CreateOrRename, "insufficient access"),
        )
        .await;

    let failure = h
        .vm
        .handle_upload("physicianCv", FileHandle::uploaded(cv, "photo.jpeg"))
        .await
        .unwrap_err();

    assert_eq!(failure.failed_at, TitleAssigned);
    assert_eq!(failure.history, vec![Received, TitleAssigned, Failed]);
    assert!(matches!(failure.source, ChecklistError::Store(_)));

    assert_eq!(h.store.call_count(StoreOperation::UpdateDocumentStatus).await, 0);
    assert_eq!(h.store.call_count(StoreOperation::FetchDocuments).await, 0);

    let documents = h.store.documents(&h.record_id()).await;
    assert_eq!(documents[0].title, "photo.jpeg");
    assert_eq!(documents[0].status, unreviewed());

    let notifications = h.notifier.notifications();
    assert_eq!(notifications.len(), 1);
    assert_eq!(notifications[0].kind, NotificationKind::Error);
    assert_eq!(notifications[0].title, "Error renaming file");
    assert_eq!(notifications[0].message, "insufficient access");
}

#[tokio::test]
async fn failed_status_update_stops_after_persist() {
    let h = physician_harness();
    let cv = h.store.platform_upload(TEST_RECORD, "license.pdf").await;
    h.store
        .fail_on(
            StoreOperation::UpdateDocumentStatus,
            StoreError::transport(StoreOperation::UpdateDocumentStatus, "timeout"),
        )
        .await;

    let failure = h
        .vm
        .handle_upload("crmLicense", FileHandle::uploaded(cv, "license.pdf"))
        .await
        .unwrap_err();

    assert_eq!(failure.failed_at, Persisted);
    assert!(failure.source.is_retryable());

    // Rename is not rolled back
    let documents = h.store.documents(&h.record_id()).await;
    assert_eq!(documents[0].title, "CRM License.pdf");

    assert!(h.notifier.successes().is_empty());
    let errors = h.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "Error updating document status");
}

#[tokio::test]
async fn reload_failure_after_upload_is_reported_by_refresh() {
    let h = physician_harness();
    let cv = h.store.platform_upload(TEST_RECORD, "cv.docx").await;
    h.store
        .fail_on(
            StoreOperation::FetchDocuments,
            StoreError::transport(StoreOperation::FetchDocuments, "service unavailable"),
        )
        .await;

    let failure = h
        .vm
        .handle_upload("physicianCv", FileHandle::uploaded(cv, "cv.docx"))
        .await
        .unwrap_err();

    assert_eq!(failure.failed_at, StatusPending);
    assert_eq!(h.notifier.successes().len(), 1);

    let errors = h.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "Error loading documents");
    assert_eq!(errors[0].message, "service unavailable");
}

#[tokio::test]
async fn malformed_file_name_never_reaches_store() {
    let h = physician_harness();

    let failure = h
        .vm
        .handle_upload("physicianCv", FileHandle::uploaded("068X", "README"))
        .await
        .unwrap_err();

    assert_eq!(failure.failed_at, Received);
    assert!(matches!(
        failure.source,
        ChecklistError::MalformedUpload(MalformedUploadError::MissingExtension { .. })
    ));
    assert!(h.store.calls().await.is_empty());

    let errors = h.notifier.errors();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].title, "Invalid upload");
}

#[tokio::test]
async fn unsupported_extension_is_rejected() {
    let h = physician_harness();

    let failure = h
        .vm
        .handle_upload("physicianCv", FileHandle::raw("setup.exe", vec![0x4d, 0x5a]))
        .await
        .unwrap_err();

    assert!(matches!(
        failure.source,
        ChecklistError::MalformedUpload(MalformedUploadError::UnsupportedExtension { .. })
    ));
    assert!(h.store.calls().await.is_empty());
}

#[tokio::test]
async fn unknown_slot_is_rejected() {
    let h = physician_harness();

    let failure = h
        .vm
        .handle_upload("W9", FileHandle::uploaded("068X", "w9.pdf"))
        .await
        .unwrap_err();

    assert!(matches!(
        failure.source,
        ChecklistError::MalformedUpload(MalformedUploadError::UnknownSlot(ref key)) if key == "W9"
    ));
    assert_eq!(h.notifier.errors().len(), 1);
}

#[tokio::test]
async fn raw_bytes_are_stored_base64_under_canonical_title() {
    let h = physician_harness();

    let receipt = h
        .vm
        .handle_upload("physicianCv", FileHandle::raw("cv.pdf", b"%PDF-1.4".to_vec()))
        .await
        .unwrap();

    let calls = h.store.calls().await;
    assert_eq!(
        calls[0],
        StoreCall::UploadFile {
            record_id: h.record_id(),
            file_name: "Physician Cv.pdf".into(),
            base64_content: "JVBERi0xLjQ=".into(),
        }
    );
    assert_eq!(
        calls[1],
        StoreCall::CreateOrRename {
            content_version_id: receipt.content_version_id.clone(),
            new_title: "Physician Cv.pdf".into(),
        }
    );
    assert_eq!(h.store.call_count(StoreOperation::SaveNewVersion).await, 0);

    let state = h.vm.state().unwrap();
    assert_eq!(state.status("physicianCv"), Some(&DocumentStatus::Pending));
}

#[tokio::test]
async fn failed_rename_after_raw_intake_binds_no_other_slot() {
    let h = physician_harness();
    h.store
        .fail_on(
            StoreOperation::CreateOrRename,
            StoreError::permission(StoreOperation::CreateOrRename, "insufficient access"),
        )
        .await;

    let failure = h
        .vm
        .handle_upload(
            "physicianCv",
            FileHandle::raw("CRM License scan.pdf", b"%PDF-1.4".to_vec()),
        )
        .await
        .unwrap_err();
    assert_eq!(failure.failed_at, TitleAssigned);

    let documents = h.store.documents(&h.record_id()).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "Physician Cv.pdf");
    assert_eq!(documents[0].status, unreviewed());

    h.store.clear_faults().await;
    let state = h.vm.refresh().await.unwrap();
    assert!(state.slots["crmLicense"].document.is_none());
    assert_eq!(state.status("crmLicense"), Some(&DocumentStatus::NoFile));
    assert_eq!(state.status("physicianCv"), Some(&unreviewed()));
}

#[tokio::test]
async fn raw_upload_to_single_version_slot_keeps_one_document() {
    let h = full_cycle_harness();
    h.store
        .insert(TEST_RECORD, "W9.pdf", DocumentStatus::Approved)
        .await;

    let receipt = h
        .vm
        .handle_upload("W9", FileHandle::raw("w9-2024.pdf", b"%PDF-1.7".to_vec()))
        .await
        .unwrap();

    let documents = h.store.documents(&h.record_id()).await;
    assert_eq!(documents.len(), 1);
    assert_eq!(documents[0].title, "W9.pdf");
    assert_eq!(documents[0].content_version_id, receipt.content_version_id);
    assert_eq!(documents[0].status, DocumentStatus::Pending);
}

#[tokio::test]
async fn failed_raw_intake_is_reported_as_upload_error() {
    let h = physician_harness();
    h.store
        .fail_on(
            StoreOperation::UploadFile,
            StoreError::transport(StoreOperation::UploadFile, "connection reset"),
        )
        .await;

    let failure = h
        .vm
        .handle_upload("physicianCv", FileHandle::raw("cv.pdf", b"data".to_vec()))
        .await
        .unwrap_err();

    assert_eq!(failure.failed_at, TitleAssigned);
    assert_eq!(h.store.call_count(StoreOperation::CreateOrRename).await, 0);
    assert_eq!(h.notifier.errors()[0].title, "Error uploading file");
}

#[tokio::test]
async fn empty_raw_file_is_rejected() {
    let h = physician_harness();

    let failure = h
        .vm
        .handle_upload("physicianCv", FileHandle::raw("cv.pdf", Vec::new()))
        .await
        .unwrap_err();

    assert!(matches!(
        failure.source,
        ChecklistError::MalformedUpload(MalformedUploadError::EmptyContent { .. })
    ));
    assert!(h.store.calls().await.is_empty());
}

#[tokio::test]
async fn batch_files_fail_independently() {
    let h = physician_harness();
    let good = h.store.platform_upload(TEST_RECORD, "scan.pdf").await;
    let other = h.store.platform_upload(TEST_RECORD, "scan.png").await;

    let outcomes = h
        .vm
        .handle_upload_batch(
            "physicianCv",
            vec![
                FileHandle::uploaded(good, "scan.pdf"),
                FileHandle::uploaded("068X", "no-extension"),
                FileHandle::uploaded(other, "scan.png"),
            ],
        )
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].as_ref().unwrap().title, "Physician Cv.pdf");
    assert_eq!(outcomes[1].as_ref().unwrap_err().failed_at, Received);
    assert_eq!(outcomes[2].as_ref().unwrap().title, "Physician Cv.png");

    assert_eq!(h.notifier.successes().len(), 2);
    assert_eq!(h.notifier.errors().len(), 1);
}

#[tokio::test]
async fn empty_batch_is_malformed() {
    let h = physician_harness();

    let err = h
        .vm
        .handle_upload_batch("physicianCv", Vec::new())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ChecklistError::MalformedUpload(MalformedUploadError::EmptyFileList)
    ));
    assert!(h.store.calls().await.is_empty());
    assert_eq!(h.notifier.errors().len(), 1);
}

#[tokio::test]
async fn dispatched_batch_completes_on_spawned_tasks() {
    let h = TestHarness::new(validated_variant(variants::PARKING_DOCUMENTS));
    let a = h.store.platform_upload(TEST_RECORD, "agreement.pdf").await;
    let b = h.store.platform_upload(TEST_RECORD, "agreement-signed.pdf").await;

    let handles = h
        .vm
        .dispatch_upload_batch(
            "ParkingAgreement",
            vec![
                FileHandle::uploaded(a, "agreement.pdf"),
                FileHandle::uploaded(b, "agreement-signed.pdf"),
            ],
        )
        .unwrap();

    for handle in handles {
        let receipt = handle.await.unwrap().unwrap();
        assert_eq!(receipt.title, "Parking Agreement.pdf");
    }

    assert_eq!(h.store.call_count(StoreOperation::CreateOrRename).await, 2);
    let state = h.vm.refresh().await.unwrap();
    assert_eq!(state.status("ParkingAgreement"), Some(&DocumentStatus::Pending));
}
