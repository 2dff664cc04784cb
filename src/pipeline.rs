//! Submission orchestration: normalize, compute, classify, project,
//! persist, then notify.
//!
//! The ordering contract is strict in one direction only: the record must
//! be durably saved before any notification is attempted, and notification
//! failures never unwind the save or the response. CRM and email sinks are
//! best-effort; their outcomes land on the stored record as status flags
//! and the caller always receives the computed report.

use chrono::Utc;

use crate::classify::classify;
use crate::config::{AssumptionDefaults, SafeRangeBounds};
use crate::core::{ContactInfo, NotifyStatus, SavingsBreakdown};
use crate::engine::compute;
use crate::errors::Result;
use crate::normalize::{merge_steps, normalize, validate_contact, RawFields};
use crate::report::{
    crm_contact, email_placeholders, project, render_template, CrmContact, ReportModel,
};
use crate::store::{ScenarioStore, SubmissionDraft};

/// Outbound CRM boundary. Implementations own their transport, timeout,
/// and retry policy; the pipeline only records the outcome.
pub trait CrmSink {
    /// Returns the remote contact id on success.
    fn sync_contact(&self, contact: &CrmContact) -> anyhow::Result<String>;
}

/// Outbound mail boundary.
pub trait MailSink {
    fn send(&self, message: &EmailMessage) -> anyhow::Result<()>;
}

#[derive(Clone, Debug, PartialEq)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    pub body: String,
}

pub const DEFAULT_EMAIL_SUBJECT: &str = "Your {company_name} ROI analysis";

pub const DEFAULT_EMAIL_TEMPLATE: &str = "\
Hi {first_name},

Thanks for running the numbers for {company_name}. Based on {total_tb} TB \
of storage and {total_vms} VMs, our model projects:

  Total annual savings: {total_annual_savings}
  Net annual benefit:   {net_benefit}
  Annual ROI:           {annual_roi}
  Payback period:       {payback_months} months

Your full worksheet is attached. A member of our team will follow up at
{email} shortly.

{date}
";

/// Everything the caller gets back from a submission: the persisted id
/// (absent when the save failed), the presentation model, and the
/// notification outcomes.
#[derive(Debug)]
pub struct SubmissionOutcome {
    pub submission_id: Option<u64>,
    pub report: ReportModel,
    /// Set when persistence failed; the report is still computed and
    /// notifications are skipped.
    pub store_error: Option<String>,
    pub crm_status: NotifyStatus,
    pub email_status: NotifyStatus,
}

/// Request-scoped orchestrator. Stateless between calls; safe to build
/// one per request or share one across threads.
pub struct SubmissionPipeline<'a, S: ScenarioStore> {
    store: &'a S,
    crm: Option<&'a dyn CrmSink>,
    mail: Option<&'a dyn MailSink>,
    defaults: AssumptionDefaults,
    bounds: SafeRangeBounds,
    email_subject: String,
    email_template: String,
}

impl<'a, S: ScenarioStore> SubmissionPipeline<'a, S> {
    pub fn new(store: &'a S, defaults: AssumptionDefaults, bounds: SafeRangeBounds) -> Self {
        Self {
            store,
            crm: None,
            mail: None,
            defaults,
            bounds,
            email_subject: DEFAULT_EMAIL_SUBJECT.to_string(),
            email_template: DEFAULT_EMAIL_TEMPLATE.to_string(),
        }
    }

    pub fn with_crm(mut self, crm: &'a dyn CrmSink) -> Self {
        self.crm = Some(crm);
        self
    }

    pub fn with_mail(mut self, mail: &'a dyn MailSink) -> Self {
        self.mail = Some(mail);
        self
    }

    pub fn with_email_template(mut self, subject: &str, template: &str) -> Self {
        self.email_subject = subject.to_string();
        self.email_template = template.to_string();
        self
    }

    /// Recompute a live preview from partial wizard steps.
    ///
    /// Contact fields are not required; nothing is persisted. Replay-safe:
    /// submitting the same steps again yields the identical breakdown.
    pub fn preview(&self, steps: &[RawFields]) -> SavingsBreakdown {
        let merged = merge_steps(steps);
        compute(&normalize(&merged, &self.defaults))
    }

    /// Handle a completed submission end to end.
    pub fn submit(&self, raw: &RawFields) -> Result<SubmissionOutcome> {
        // Contact validation is the only hard failure; numeric fields are
        // coerced, never rejected.
        let contact = validate_contact(raw)?;
        let parameters = normalize(raw, &self.defaults);
        let breakdown = compute(&parameters);
        let classification = classify(&breakdown, self.bounds);

        if !classification.is_safe {
            log::warn!(
                "ROI {:.1}% outside safe range [{}, {}] for {}; flagging for manual review",
                classification.annual_roi,
                classification.lower_bound,
                classification.upper_bound,
                contact.company_name
            );
        }

        // Persist before any notification. A failed save skips the
        // notifications but never costs the caller their report.
        let record = match self.store.save(SubmissionDraft {
            contact: contact.clone(),
            parameters: parameters.clone(),
            breakdown: breakdown.clone(),
            classification: classification.clone(),
        }) {
            Ok(record) => record,
            Err(e) => {
                log::error!(
                    "failed to persist submission for {}: {}",
                    contact.company_name,
                    e
                );
                let report = project(
                    &parameters,
                    &breakdown,
                    &classification,
                    Some(&contact),
                    Utc::now(),
                );
                return Ok(SubmissionOutcome {
                    submission_id: None,
                    report,
                    store_error: Some(e.to_string()),
                    crm_status: NotifyStatus::Pending,
                    email_status: NotifyStatus::Pending,
                });
            }
        };
        log::debug!(
            "saved submission {} for {} (roi {:.1}%)",
            record.id,
            contact.company_name,
            classification.annual_roi
        );

        let crm_status = self.notify_crm(record.id, &record.contact, &record);
        let email_status = self.notify_email(record.id, &record.contact, &record);

        let report = project(
            &parameters,
            &breakdown,
            &classification,
            Some(&contact),
            record.created_at,
        );

        Ok(SubmissionOutcome {
            submission_id: Some(record.id),
            report,
            store_error: None,
            crm_status,
            email_status,
        })
    }

    fn notify_crm(
        &self,
        id: u64,
        contact: &ContactInfo,
        record: &crate::store::SubmissionRecord,
    ) -> NotifyStatus {
        let Some(crm) = self.crm else {
            return NotifyStatus::Pending;
        };

        let payload = crm_contact(
            contact,
            &record.parameters,
            &record.breakdown,
            &record.classification,
        );
        let (status, contact_id) = match crm.sync_contact(&payload) {
            Ok(contact_id) => {
                log::debug!("synced {} to CRM as {}", contact.email, contact_id);
                (NotifyStatus::Sent { at: Utc::now() }, Some(contact_id))
            }
            Err(e) => {
                log::warn!("CRM sync failed for {}: {}", contact.email, e);
                (
                    NotifyStatus::Failed {
                        reason: e.to_string(),
                    },
                    None,
                )
            }
        };

        if let Err(e) = self.store.set_crm_status(id, status.clone(), contact_id) {
            log::warn!("failed to record CRM status for submission {}: {}", id, e);
        }
        status
    }

    fn notify_email(
        &self,
        id: u64,
        contact: &ContactInfo,
        record: &crate::store::SubmissionRecord,
    ) -> NotifyStatus {
        let Some(mail) = self.mail else {
            return NotifyStatus::Pending;
        };

        let placeholders = email_placeholders(
            contact,
            &record.parameters,
            &record.breakdown,
            record.created_at,
        );
        let message = EmailMessage {
            to: contact.email.clone(),
            subject: render_template(&self.email_subject, &placeholders),
            body: render_template(&self.email_template, &placeholders),
        };

        let status = match mail.send(&message) {
            Ok(()) => NotifyStatus::Sent { at: Utc::now() },
            Err(e) => {
                log::warn!("email send failed for {}: {}", contact.email, e);
                NotifyStatus::Failed {
                    reason: e.to_string(),
                }
            }
        };

        if let Err(e) = self.store.set_email_status(id, status.clone()) {
            log::warn!(
                "failed to record email status for submission {}: {}",
                id,
                e
            );
        }
        status
    }
}
