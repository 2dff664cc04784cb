//! Submission persistence.
//!
//! `ScenarioStore` is the durability boundary for the pipeline: a record
//! must be saved before any downstream notification runs, and downstream
//! status updates land back on the stored record rather than rolling it
//! back. Two implementations ship: an in-memory store for previews and
//! tests, and a JSON-file store with one file per submission.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::{
    CanonicalParameters, Classification, ContactInfo, NotifyStatus, SavingsBreakdown,
};
use crate::errors::{Result, RoimapError};

/// Everything known about a submission before it has an identity.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionDraft {
    pub contact: ContactInfo,
    pub parameters: CanonicalParameters,
    pub breakdown: SavingsBreakdown,
    pub classification: Classification,
}

/// The persisted record: draft plus identity, timestamp, and the
/// best-effort notification statuses that accumulate after the save.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionRecord {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub contact: ContactInfo,
    pub parameters: CanonicalParameters,
    pub breakdown: SavingsBreakdown,
    pub classification: Classification,
    pub crm_status: NotifyStatus,
    pub crm_contact_id: Option<String>,
    pub email_status: NotifyStatus,
}

impl SubmissionRecord {
    fn from_draft(id: u64, draft: SubmissionDraft) -> Self {
        Self {
            id,
            created_at: Utc::now(),
            contact: draft.contact,
            parameters: draft.parameters,
            breakdown: draft.breakdown,
            classification: draft.classification,
            crm_status: NotifyStatus::Pending,
            crm_contact_id: None,
            email_status: NotifyStatus::Pending,
        }
    }
}

/// Columns for the admin submissions listing.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubmissionSummary {
    pub id: u64,
    pub created_at: DateTime<Utc>,
    pub company_name: String,
    pub full_name: String,
    pub email: String,
    pub total_annual_savings: f64,
    pub annual_roi: f64,
    pub payback_months: f64,
    pub is_safe: bool,
}

impl From<&SubmissionRecord> for SubmissionSummary {
    fn from(record: &SubmissionRecord) -> Self {
        Self {
            id: record.id,
            created_at: record.created_at,
            company_name: record.contact.company_name.clone(),
            full_name: record.contact.full_name.clone(),
            email: record.contact.email.clone(),
            total_annual_savings: record.breakdown.summary.total_annual_savings,
            annual_roi: record.breakdown.summary.annual_roi,
            payback_months: record.breakdown.summary.payback_months,
            is_safe: record.classification.is_safe,
        }
    }
}

pub trait ScenarioStore {
    /// Persist a draft, assigning it the next submission id.
    fn save(&self, draft: SubmissionDraft) -> Result<SubmissionRecord>;

    fn get(&self, id: u64) -> Result<Option<SubmissionRecord>>;

    fn set_crm_status(
        &self,
        id: u64,
        status: NotifyStatus,
        crm_contact_id: Option<String>,
    ) -> Result<()>;

    fn set_email_status(&self, id: u64, status: NotifyStatus) -> Result<()>;

    /// Most recent submissions first.
    fn recent(&self, limit: usize) -> Result<Vec<SubmissionSummary>>;
}

#[derive(Default)]
struct MemoryInner {
    next_id: u64,
    records: BTreeMap<u64, SubmissionRecord>,
}

/// In-memory store for previews and tests.
#[derive(Default)]
pub struct MemoryStore {
    inner: Mutex<MemoryInner>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MemoryInner> {
        // Recover from poisoning; records are plain data.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ScenarioStore for MemoryStore {
    fn save(&self, draft: SubmissionDraft) -> Result<SubmissionRecord> {
        let mut inner = self.lock();
        inner.next_id += 1;
        let record = SubmissionRecord::from_draft(inner.next_id, draft);
        inner.records.insert(record.id, record.clone());
        Ok(record)
    }

    fn get(&self, id: u64) -> Result<Option<SubmissionRecord>> {
        Ok(self.lock().records.get(&id).cloned())
    }

    fn set_crm_status(
        &self,
        id: u64,
        status: NotifyStatus,
        crm_contact_id: Option<String>,
    ) -> Result<()> {
        let mut inner = self.lock();
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(RoimapError::SubmissionNotFound(id))?;
        record.crm_status = status;
        if crm_contact_id.is_some() {
            record.crm_contact_id = crm_contact_id;
        }
        Ok(())
    }

    fn set_email_status(&self, id: u64, status: NotifyStatus) -> Result<()> {
        let mut inner = self.lock();
        let record = inner
            .records
            .get_mut(&id)
            .ok_or(RoimapError::SubmissionNotFound(id))?;
        record.email_status = status;
        Ok(())
    }

    fn recent(&self, limit: usize) -> Result<Vec<SubmissionSummary>> {
        let inner = self.lock();
        let mut summaries: Vec<SubmissionSummary> =
            inner.records.values().map(SubmissionSummary::from).collect();
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        summaries.truncate(limit);
        Ok(summaries)
    }
}

/// File-backed store: one pretty-printed JSON document per submission
/// under a configured directory.
pub struct JsonFileStore {
    dir: PathBuf,
    next_id: Mutex<u64>,
}

impl JsonFileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        let next_id = Mutex::new(highest_existing_id(&dir)?);
        Ok(Self { dir, next_id })
    }

    fn record_path(&self, id: u64) -> PathBuf {
        self.dir.join(format!("submission-{:06}.json", id))
    }

    fn read_record(&self, id: u64) -> Result<Option<SubmissionRecord>> {
        let path = self.record_path(id);
        match fs::read_to_string(&path) {
            Ok(contents) => {
                let record = serde_json::from_str(&contents).map_err(|e| {
                    RoimapError::store(format!("corrupt submission record: {}", e), &path)
                })?;
                Ok(Some(record))
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write_record(&self, record: &SubmissionRecord) -> Result<()> {
        let path = self.record_path(record.id);
        let json = serde_json::to_string_pretty(record)?;
        fs::write(&path, json)?;
        Ok(())
    }

    fn update_record<F>(&self, id: u64, apply: F) -> Result<()>
    where
        F: FnOnce(&mut SubmissionRecord),
    {
        let mut record = self
            .read_record(id)?
            .ok_or(RoimapError::SubmissionNotFound(id))?;
        apply(&mut record);
        self.write_record(&record)
    }
}

fn highest_existing_id(dir: &Path) -> Result<u64> {
    let mut highest = 0;
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name();
        let name = name.to_string_lossy();
        if let Some(stem) = name
            .strip_prefix("submission-")
            .and_then(|s| s.strip_suffix(".json"))
        {
            if let Ok(id) = stem.parse::<u64>() {
                highest = highest.max(id);
            }
        }
    }
    Ok(highest)
}

impl ScenarioStore for JsonFileStore {
    fn save(&self, draft: SubmissionDraft) -> Result<SubmissionRecord> {
        let id = {
            let mut next = self.next_id.lock().unwrap_or_else(|e| e.into_inner());
            *next += 1;
            *next
        };
        let record = SubmissionRecord::from_draft(id, draft);
        self.write_record(&record)?;
        log::debug!("persisted submission {} to {}", id, self.dir.display());
        Ok(record)
    }

    fn get(&self, id: u64) -> Result<Option<SubmissionRecord>> {
        self.read_record(id)
    }

    fn set_crm_status(
        &self,
        id: u64,
        status: NotifyStatus,
        crm_contact_id: Option<String>,
    ) -> Result<()> {
        self.update_record(id, |record| {
            record.crm_status = status;
            if crm_contact_id.is_some() {
                record.crm_contact_id = crm_contact_id;
            }
        })
    }

    fn set_email_status(&self, id: u64, status: NotifyStatus) -> Result<()> {
        self.update_record(id, |record| record.email_status = status)
    }

    fn recent(&self, limit: usize) -> Result<Vec<SubmissionSummary>> {
        let mut summaries = Vec::new();
        for entry in fs::read_dir(&self.dir)? {
            let entry = entry?;
            if entry.path().extension().is_some_and(|ext| ext == "json") {
                let contents = fs::read_to_string(entry.path())?;
                if let Ok(record) = serde_json::from_str::<SubmissionRecord>(&contents) {
                    summaries.push(SubmissionSummary::from(&record));
                }
            }
        }
        summaries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        summaries.truncate(limit);
        Ok(summaries)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classify::classify;
    use crate::config::SafeRangeBounds;
    use crate::engine::compute;

    fn draft() -> SubmissionDraft {
        let parameters = CanonicalParameters {
            total_tb: 1_000.0,
            ..CanonicalParameters::default()
        };
        let breakdown = compute(&parameters);
        let classification = classify(&breakdown, SafeRangeBounds::default());
        SubmissionDraft {
            contact: ContactInfo {
                full_name: "Jo Smith".to_string(),
                email: "jo@acme.com".to_string(),
                company_name: "Acme Storage".to_string(),
                company_url: None,
            },
            parameters,
            breakdown,
            classification,
        }
    }

    #[test]
    fn memory_store_assigns_sequential_ids() {
        let store = MemoryStore::new();
        let first = store.save(draft()).unwrap();
        let second = store.save(draft()).unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert!(store.get(2).unwrap().is_some());
        assert!(store.get(99).unwrap().is_none());
    }

    #[test]
    fn memory_store_status_updates_land_on_record() {
        let store = MemoryStore::new();
        let record = store.save(draft()).unwrap();
        store
            .set_crm_status(
                record.id,
                NotifyStatus::Sent { at: Utc::now() },
                Some("crm-42".to_string()),
            )
            .unwrap();
        store
            .set_email_status(
                record.id,
                NotifyStatus::Failed {
                    reason: "smtp timeout".to_string(),
                },
            )
            .unwrap();

        let stored = store.get(record.id).unwrap().unwrap();
        assert!(stored.crm_status.is_sent());
        assert_eq!(stored.crm_contact_id.as_deref(), Some("crm-42"));
        assert!(matches!(stored.email_status, NotifyStatus::Failed { .. }));
    }

    #[test]
    fn status_update_on_unknown_id_errors() {
        let store = MemoryStore::new();
        let err = store
            .set_email_status(7, NotifyStatus::Pending)
            .unwrap_err();
        assert!(matches!(err, RoimapError::SubmissionNotFound(7)));
    }

    #[test]
    fn file_store_round_trips_records() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path()).unwrap();
        let record = store.save(draft()).unwrap();

        let loaded = store.get(record.id).unwrap().unwrap();
        assert_eq!(loaded.id, record.id);
        // Floats must survive the disk round-trip bit-exact, not merely
        // approximately; regeneration recomputes from these.
        assert_eq!(loaded.parameters, record.parameters);
        assert_eq!(loaded.breakdown, record.breakdown);
    }

    #[test]
    fn file_store_resumes_id_sequence_after_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = JsonFileStore::new(dir.path()).unwrap();
            store.save(draft()).unwrap();
            store.save(draft()).unwrap();
        }
        let reopened = JsonFileStore::new(dir.path()).unwrap();
        let record = reopened.save(draft()).unwrap();
        assert_eq!(record.id, 3);
    }

    #[test]
    fn recent_lists_newest_first() {
        let store = MemoryStore::new();
        for _ in 0..5 {
            store.save(draft()).unwrap();
        }
        let recent = store.recent(3).unwrap();
        assert_eq!(recent.len(), 3);
        assert_eq!(recent[0].id, 5);
        assert_eq!(recent[2].id, 3);
    }
}
