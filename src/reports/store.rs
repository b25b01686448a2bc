use crate::reports::model::{ChangeReport, ReportStatus};
use crate::{MapError, Result};
use std::cmp::Reverse;
use std::sync::{Mutex, MutexGuard};
use uuid::Uuid;

/// Sort order of a listing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportOrder {
    /// Most recently approved first, ties by creation time
    RecentlyApproved,
    /// Most recently created first
    RecentlyCreated,
}

/// Filter for [`ReportStore::query`]; `None` fields match everything
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportQuery {
    pub status: ReportStatus,
    pub park_id: Option<String>,
    pub server_id: Option<String>,
    pub map_version: Option<String>,
    pub order: ReportOrder,
    pub limit: usize,
}

impl ReportQuery {
    pub fn matches(&self, report: &ChangeReport) -> bool {
        fn field(filter: &Option<String>, value: &str) -> bool {
            filter.as_deref().map_or(true, |f| f == value)
        }

        report.status == self.status
            && field(&self.park_id, &report.park_id)
            && field(&self.server_id, &report.server_id)
            && field(&self.map_version, &report.map_version)
    }
}

/// Record store behind the report service
pub trait ReportStore: Send + Sync {
    fn insert(&self, report: ChangeReport) -> Result<()>;

    fn get(&self, id: &Uuid) -> Result<Option<ChangeReport>>;

    /// Replaces the stored report with the same id
    fn update(&self, report: ChangeReport) -> Result<()>;

    fn query(&self, query: &ReportQuery) -> Result<Vec<ChangeReport>>;
}

/// In-process store, mostly for tests and single-node setups
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: Mutex<Vec<ChangeReport>>,
}

impl MemoryReportStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Vec<ChangeReport>>> {
        self.reports
            .lock()
            .map_err(|e| MapError::Storage(format!("report store lock poisoned: {}", e)))
    }

    pub fn len(&self) -> usize {
        self.lock().map(|reports| reports.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportStore for MemoryReportStore {
    fn insert(&self, report: ChangeReport) -> Result<()> {
        let mut reports = self.lock()?;
        if reports.iter().any(|r| r.id == report.id) {
            return Err(MapError::Storage(format!("duplicate report id {}", report.id)));
        }
        reports.push(report);
        Ok(())
    }

    fn get(&self, id: &Uuid) -> Result<Option<ChangeReport>> {
        Ok(self.lock()?.iter().find(|r| &r.id == id).cloned())
    }

    fn update(&self, report: ChangeReport) -> Result<()> {
        let mut reports = self.lock()?;
        let slot = reports
            .iter_mut()
            .find(|r| r.id == report.id)
            .ok_or_else(|| MapError::NotFound(report.id.to_string()))?;
        *slot = report;
        Ok(())
    }

    fn query(&self, query: &ReportQuery) -> Result<Vec<ChangeReport>> {
        let mut found: Vec<ChangeReport> = self
            .lock()?
            .iter()
            .filter(|r| query.matches(r))
            .cloned()
            .collect();

        match query.order {
            ReportOrder::RecentlyApproved => {
                found.sort_by_key(|r| (Reverse(r.approved_at), Reverse(r.created_at)))
            }
            ReportOrder::RecentlyCreated => found.sort_by_key(|r| Reverse(r.created_at)),
        }
        found.truncate(query.limit);
        Ok(found)
    }
}
