// Export modules for library usage
pub mod classify;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod engine;
pub mod errors;
pub mod formatting;
pub mod io;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod store;

// Re-export commonly used types
pub use crate::core::{
    Activity, CanonicalParameters, Classification, ContactInfo, CostAvoidance, CostAvoidanceLine,
    NotifyStatus, OperationalSavings, PaybackBand, PersonnelLine, PersonnelSavings, ReviewUrgency,
    SavingsBreakdown, SavingsSummary, WeeklyHours,
};

pub use crate::classify::classify;
pub use crate::config::{AssumptionDefaults, RoimapConfig, SafeRangeBounds};
pub use crate::engine::{compute, PAYBACK_SENTINEL_MONTHS};
pub use crate::errors::RoimapError;
pub use crate::io::output::{create_writer, OutputFormat, OutputWriter};
pub use crate::normalize::{merge_steps, normalize, validate_contact, RawFields};
pub use crate::pipeline::{
    CrmSink, EmailMessage, MailSink, SubmissionOutcome, SubmissionPipeline,
};
pub use crate::report::{
    crm_contact, email_placeholders, project, render_template, CrmContact, ReportModel,
};
pub use crate::store::{
    JsonFileStore, MemoryStore, ScenarioStore, SubmissionDraft, SubmissionRecord,
    SubmissionSummary,
};
