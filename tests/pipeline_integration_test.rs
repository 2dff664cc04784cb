use std::sync::Mutex;

use roimap::{
    AssumptionDefaults, CrmContact, CrmSink, EmailMessage, JsonFileStore, MailSink, NotifyStatus,
    RawFields, SafeRangeBounds, ScenarioStore, SubmissionPipeline,
};
use serde_json::json;

fn submission() -> RawFields {
    [
        ("full_name", json!("Dana Reyes")),
        ("email", json!("dana@initech.example")),
        ("company_name", json!("Initech")),
        ("company_url", json!("initech.example")),
        ("total_tb", json!(5_000)),
        ("total_vms", json!(1_200)),
        ("cost_per_tb", json!(450)),
    ]
    .into_iter()
    .map(|(k, v)| (k.to_string(), v))
    .collect()
}

struct FlakyCrm {
    attempts: Mutex<u32>,
}

impl CrmSink for FlakyCrm {
    fn sync_contact(&self, _contact: &CrmContact) -> anyhow::Result<String> {
        let mut attempts = self.attempts.lock().unwrap();
        *attempts += 1;
        anyhow::bail!("503 service unavailable")
    }
}

struct CapturingMail {
    sent: Mutex<Vec<EmailMessage>>,
}

impl MailSink for CapturingMail {
    fn send(&self, message: &EmailMessage) -> anyhow::Result<()> {
        self.sent.lock().unwrap().push(message.clone());
        Ok(())
    }
}

#[test]
fn file_backed_submission_survives_crm_outage() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();
    let crm = FlakyCrm {
        attempts: Mutex::new(0),
    };
    let mail = CapturingMail {
        sent: Mutex::new(Vec::new()),
    };

    let pipeline = SubmissionPipeline::new(
        &store,
        AssumptionDefaults::default(),
        SafeRangeBounds::default(),
    )
    .with_crm(&crm)
    .with_mail(&mail);

    let outcome = pipeline.submit(&submission()).unwrap();

    // The record was persisted before (and despite) the CRM failure.
    let record = store.get(outcome.submission_id.unwrap()).unwrap().unwrap();
    assert!(matches!(record.crm_status, NotifyStatus::Failed { ref reason } if reason.contains("503")));
    assert!(record.email_status.is_sent());
    assert_eq!(*crm.attempts.lock().unwrap(), 1);

    // The prospect still received their numbers.
    let sent = mail.sent.lock().unwrap();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].to, "dana@initech.example");
    assert!(sent[0].body.contains("Initech"));
    assert!(sent[0].body.contains("5,000"));

    // And the report model carries the same figures the record does.
    assert_eq!(
        outcome.report.breakdown.summary.total_annual_savings,
        record.breakdown.summary.total_annual_savings
    );
}

#[test]
fn regenerating_a_report_from_the_stored_record_is_lossless() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();
    let pipeline = SubmissionPipeline::new(
        &store,
        AssumptionDefaults::default(),
        SafeRangeBounds::default(),
    );

    let outcome = pipeline.submit(&submission()).unwrap();
    let record = store.get(outcome.submission_id.unwrap()).unwrap().unwrap();

    // An admin re-render starts from stored parameters, never from a
    // mutated breakdown; the recomputation must agree exactly.
    let recomputed = roimap::compute(&record.parameters);
    assert_eq!(recomputed, record.breakdown);

    let reprojected = roimap::project(
        &record.parameters,
        &recomputed,
        &record.classification,
        Some(&record.contact),
        record.created_at,
    );
    assert_eq!(reprojected.sections.len(), 5);
    assert_eq!(reprojected.generated_at, record.created_at);
    assert_eq!(
        reprojected.breakdown.summary.annual_roi,
        outcome.report.breakdown.summary.annual_roi
    );
}

#[test]
fn recent_listing_reflects_saved_submissions() {
    let dir = tempfile::tempdir().unwrap();
    let store = JsonFileStore::new(dir.path()).unwrap();
    let pipeline = SubmissionPipeline::new(
        &store,
        AssumptionDefaults::default(),
        SafeRangeBounds::default(),
    );

    pipeline.submit(&submission()).unwrap();
    pipeline.submit(&submission()).unwrap();

    let recent = store.recent(10).unwrap();
    assert_eq!(recent.len(), 2);
    assert_eq!(recent[0].company_name, "Initech");
    assert!(recent[0].id > recent[1].id);
    assert!(recent[0].is_safe);
}
