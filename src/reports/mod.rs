//! Crowd-sourced "what changed" reports: submission, public listings and
//! moderation. Persistence sits behind [`ReportStore`].

pub mod model;
pub mod service;
pub mod store;

pub use model::{ChangeReport, NewReport, ReportBBox, ReportEdit, ReportStatus};
pub use service::{AdminToken, ReportService};
pub use store::{MemoryReportStore, ReportOrder, ReportQuery, ReportStore};
