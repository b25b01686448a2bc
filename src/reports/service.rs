//! Public and admin operations on change reports.

use crate::core::constants::DEFAULT_PARK_ID;
use crate::reports::model::*;
use crate::reports::store::{ReportOrder, ReportQuery, ReportStore};
use crate::{MapError, Result};
use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Shared secret guarding the admin operations
#[derive(Clone)]
pub struct AdminToken(String);

impl AdminToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into().trim().to_string())
    }

    /// Checks an `Authorization` header of the form `Bearer <token>`. The
    /// scheme is case-insensitive; an empty configured token admits no one.
    pub fn authorize(&self, header: Option<&str>) -> Result<()> {
        if self.0.is_empty() {
            return Err(MapError::Unauthorized);
        }

        let presented = header
            .map(str::trim)
            .and_then(|h| h.split_once(char::is_whitespace))
            .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
            .map(|(_, token)| token.trim());

        match presented {
            Some(token) if !token.is_empty() && token == self.0 => Ok(()),
            _ => Err(MapError::Unauthorized),
        }
    }
}

impl std::fmt::Debug for AdminToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AdminToken(..)")
    }
}

pub struct ReportService<S: ReportStore> {
    store: S,
    admin: AdminToken,
    clock: fn() -> DateTime<Utc>,
}

impl<S: ReportStore> ReportService<S> {
    pub fn new(store: S, admin: AdminToken) -> Self {
        Self {
            store,
            admin,
            clock: Utc::now,
        }
    }

    /// Replaces the wall clock used for timestamps
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Stores a new report as pending
    pub fn submit(&self, input: NewReport) -> Result<ChangeReport> {
        let park_id = non_empty(safe_text(input.park_id.as_deref(), PARK_ID_MAX))
            .unwrap_or_else(|| DEFAULT_PARK_ID.to_string());
        let server_id = safe_text(input.server_id.as_deref(), SERVER_ID_MAX);
        let map_version = safe_text(input.map_version.as_deref(), MAP_VERSION_MAX);
        let description = safe_text(input.description.as_deref(), DESCRIPTION_MAX);
        let category = non_empty(safe_text(input.category.as_deref(), CATEGORY_MAX))
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        let display_name = safe_text(input.display_name.as_deref(), DISPLAY_NAME_MAX);

        if server_id.is_empty() || map_version.is_empty() || description.is_empty() {
            return Err(MapError::Validation(
                "serverId, mapVersion, and description are required".into(),
            ));
        }

        let (lat, lng, zoom) = match (input.lat, input.lng, input.zoom) {
            (Some(lat), Some(lng), Some(zoom))
                if lat.is_finite() && lng.is_finite() && zoom.is_finite() =>
            {
                (lat, lng, zoom)
            }
            _ => {
                return Err(MapError::Validation(
                    "lat, lng, and zoom must be numbers".into(),
                ))
            }
        };
        if !valid_lat(lat) || !valid_lng(lng) {
            return Err(MapError::Validation("lat/lng out of range".into()));
        }

        let now = (self.clock)();
        let report = ChangeReport {
            id: Uuid::new_v4(),
            server_id,
            map_version,
            park_id,
            lat,
            lng,
            zoom,
            bbox: input.bbox(),
            category,
            description,
            display_name: non_empty(display_name),
            status: ReportStatus::Pending,
            admin_notes: None,
            created_at: now,
            updated_at: now,
            approved_at: None,
        };

        self.store.insert(report.clone())?;
        log::info!(
            "report {} submitted for {}/{} ({})",
            report.id,
            report.park_id,
            report.map_version,
            report.category
        );
        Ok(report)
    }

    /// Approved reports for one map version
    pub fn approved_for_map(
        &self,
        server_id: Option<&str>,
        map_version: Option<&str>,
        park_id: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Vec<ChangeReport>> {
        let (server_id, map_version) = match (
            server_id.filter(|s| !s.is_empty()),
            map_version.filter(|s| !s.is_empty()),
        ) {
            (Some(s), Some(m)) => (s, m),
            _ => {
                return Err(MapError::Validation(
                    "serverId and mapVersion are required".into(),
                ))
            }
        };

        self.store.query(&ReportQuery {
            status: ReportStatus::Approved,
            park_id: Some(park_or_default(park_id)),
            server_id: Some(server_id.to_string()),
            map_version: Some(map_version.to_string()),
            order: ReportOrder::RecentlyApproved,
            limit: clamp_limit(limit, 1, LIST_LIMIT_MAX, MAP_LIST_DEFAULT_LIMIT),
        })
    }

    /// Approved reports across all versions of a park
    pub fn approved_feed(
        &self,
        park_id: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Vec<ChangeReport>> {
        self.store.query(&ReportQuery {
            status: ReportStatus::Approved,
            park_id: Some(park_or_default(park_id)),
            server_id: None,
            map_version: None,
            order: ReportOrder::RecentlyApproved,
            limit: clamp_limit(limit, 1, LIST_LIMIT_MAX, FEED_DEFAULT_LIMIT),
        })
    }

    /// Moderation queue. Status defaults to pending; park is optional.
    pub fn admin_list(
        &self,
        authorization: Option<&str>,
        status: Option<&str>,
        park_id: Option<&str>,
        limit: Option<&str>,
    ) -> Result<Vec<ChangeReport>> {
        self.admin.authorize(authorization)?;
        self.store.query(&ReportQuery {
            status: ReportStatus::parse_or_pending(status),
            park_id: park_id.filter(|p| !p.is_empty()).map(str::to_string),
            server_id: None,
            map_version: None,
            order: ReportOrder::RecentlyCreated,
            limit: clamp_limit(limit, 1, LIST_LIMIT_MAX, LIST_LIMIT_MAX),
        })
    }

    pub fn edit(
        &self,
        authorization: Option<&str>,
        id: &str,
        edit: ReportEdit,
    ) -> Result<ChangeReport> {
        self.admin.authorize(authorization)?;
        if edit.is_empty() {
            return Err(MapError::Validation("No editable fields provided".into()));
        }

        let mut report = self.load(id)?;

        if let Some(lat) = edit.lat {
            if !valid_lat(lat) {
                return Err(MapError::Validation("lat invalid".into()));
            }
            report.lat = lat;
        }
        if let Some(lng) = edit.lng {
            if !valid_lng(lng) {
                return Err(MapError::Validation("lng invalid".into()));
            }
            report.lng = lng;
        }
        if let Some(zoom) = edit.zoom {
            if !zoom.is_finite() {
                return Err(MapError::Validation("zoom invalid".into()));
            }
            report.zoom = zoom;
        }

        if let Some(v) = edit.park_id.as_deref() {
            report.park_id = safe_text(Some(v), PARK_ID_MAX);
        }
        if let Some(v) = edit.server_id.as_deref() {
            report.server_id = safe_text(Some(v), SERVER_ID_MAX);
        }
        if let Some(v) = edit.map_version.as_deref() {
            report.map_version = safe_text(Some(v), MAP_VERSION_MAX);
        }
        if let Some(v) = edit.category.as_deref() {
            report.category = safe_text(Some(v), CATEGORY_MAX);
        }
        if let Some(v) = edit.description.as_deref() {
            report.description = safe_text(Some(v), DESCRIPTION_MAX);
        }
        if let Some(v) = edit.display_name.as_deref() {
            report.display_name = non_empty(safe_text(Some(v), DISPLAY_NAME_MAX));
        }
        if let Some(v) = edit.admin_notes.as_deref() {
            report.admin_notes = non_empty(safe_text(Some(v), ADMIN_NOTES_MAX));
        }

        report.updated_at = (self.clock)();
        self.store.update(report.clone())?;
        log::info!("report {} edited", report.id);
        Ok(report)
    }

    pub fn approve(&self, authorization: Option<&str>, id: &str) -> Result<ChangeReport> {
        self.admin.authorize(authorization)?;
        let mut report = self.load(id)?;
        let now = (self.clock)();
        report.status = ReportStatus::Approved;
        report.approved_at = Some(now);
        report.updated_at = now;
        self.store.update(report.clone())?;
        log::info!("report {} approved", report.id);
        Ok(report)
    }

    /// Rejects a report, keeping the reason as its admin notes
    pub fn reject(
        &self,
        authorization: Option<&str>,
        id: &str,
        reason: Option<&str>,
    ) -> Result<ChangeReport> {
        self.admin.authorize(authorization)?;
        let mut report = self.load(id)?;
        report.status = ReportStatus::Rejected;
        report.admin_notes = non_empty(safe_text(reason, ADMIN_NOTES_MAX));
        report.updated_at = (self.clock)();
        self.store.update(report.clone())?;
        log::info!("report {} rejected", report.id);
        Ok(report)
    }

    fn load(&self, id: &str) -> Result<ChangeReport> {
        let not_found = || MapError::NotFound(id.to_string());
        let uuid = Uuid::parse_str(id.trim()).map_err(|_| not_found())?;
        self.store.get(&uuid)?.ok_or_else(not_found)
    }
}

fn park_or_default(park_id: Option<&str>) -> String {
    park_id
        .filter(|p| !p.is_empty())
        .unwrap_or(DEFAULT_PARK_ID)
        .to_string()
}
