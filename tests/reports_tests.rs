use chrono::{DateTime, TimeZone, Utc};
use parkmap::prelude::*;
use std::sync::atomic::{AtomicI64, Ordering};

/// Change-report lifecycle: submit, moderate, list
#[cfg(test)]
mod reports_tests {
    use super::*;

    const AUTH: Option<&str> = Some("Bearer let-me-in");

    static TICK: AtomicI64 = AtomicI64::new(1_700_000_000);

    /// Strictly increasing clock so orderings are deterministic
    fn ticking_clock() -> DateTime<Utc> {
        let secs = TICK.fetch_add(60, Ordering::SeqCst);
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    fn service() -> ReportService<MemoryReportStore> {
        ReportService::new(MemoryReportStore::new(), AdminToken::new("let-me-in"))
            .with_clock(ticking_clock)
    }

    fn report(description: &str) -> NewReport {
        NewReport {
            server_id: Some("wdw-live".into()),
            map_version: Some("2024-03".into()),
            description: Some(description.into()),
            lat: Some(28.4187),
            lng: Some(-81.5812),
            zoom: Some(17.5),
            ..Default::default()
        }
    }

    #[test]
    fn test_submit_applies_defaults() {
        let service = service();
        let mut input = report("  New coaster track  ");
        input.display_name = Some("   ".into());

        let stored = service.submit(input).unwrap();
        assert_eq!(stored.park_id, "wdw");
        assert_eq!(stored.category, "general");
        assert_eq!(stored.description, "New coaster track");
        assert_eq!(stored.display_name, None);
        assert_eq!(stored.status, ReportStatus::Pending);
        assert_eq!(stored.created_at, stored.updated_at);
        assert!(stored.approved_at.is_none());
        assert!(stored.bbox.is_none());
        assert_eq!(service.store().len(), 1);
    }

    /// Blank park and category get the defaults, so the report stays listable
    #[test]
    fn test_blank_park_and_category_use_defaults() {
        let service = service();
        let mut input = report("blank fields");
        input.park_id = Some("".into());
        input.category = Some("   ".into());

        let stored = service.submit(input).unwrap();
        assert_eq!(stored.park_id, "wdw");
        assert_eq!(stored.category, "general");

        service.approve(AUTH, &stored.id.to_string()).unwrap();
        let feed = service.approved_feed(Some(""), None).unwrap();
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, stored.id);
    }

    #[test]
    fn test_submit_rejects_bad_input() {
        let service = service();

        let mut missing = report("x");
        missing.description = Some("   ".into());
        assert!(matches!(service.submit(missing), Err(MapError::Validation(_))));

        let mut no_zoom = report("x");
        no_zoom.zoom = None;
        assert!(matches!(service.submit(no_zoom), Err(MapError::Validation(_))));

        let mut off_world = report("x");
        off_world.lat = Some(91.0);
        assert!(matches!(service.submit(off_world), Err(MapError::Validation(_))));

        let mut nan = report("x");
        nan.lng = Some(f64::NAN);
        assert!(service.submit(nan).is_err());

        assert!(service.store().is_empty());
    }

    #[test]
    fn test_submit_truncates_long_text() {
        let service = service();
        let mut input = report(&"a".repeat(5000));
        input.category = Some("c".repeat(100));
        let stored = service.submit(input).unwrap();
        assert_eq!(stored.description.chars().count(), 2000);
        assert_eq!(stored.category.chars().count(), 40);
    }

    #[test]
    fn test_only_approved_reports_are_public() {
        let service = service();
        let pending = service.submit(report("pending")).unwrap();
        let approved = service.submit(report("approved")).unwrap();
        service.approve(AUTH, &approved.id.to_string()).unwrap();

        let listed = service
            .approved_for_map(Some("wdw-live"), Some("2024-03"), None, None)
            .unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, approved.id);
        assert!(listed[0].approved_at.is_some());
        assert!(listed.iter().all(|r| r.id != pending.id));

        let other_version = service
            .approved_for_map(Some("wdw-live"), Some("2019-01"), None, None)
            .unwrap();
        assert!(other_version.is_empty());

        assert!(matches!(
            service.approved_for_map(None, Some("2024-03"), None, None),
            Err(MapError::Validation(_))
        ));
    }

    #[test]
    fn test_feed_is_newest_approval_first() {
        let service = service();
        let first = service.submit(report("first")).unwrap();
        let second = service.submit(report("second")).unwrap();
        let mut elsewhere = report("paris");
        elsewhere.park_id = Some("dlp".into());
        let paris = service.submit(elsewhere).unwrap();

        service.approve(AUTH, &second.id.to_string()).unwrap();
        service.approve(AUTH, &first.id.to_string()).unwrap();
        service.approve(AUTH, &paris.id.to_string()).unwrap();

        let feed = service.approved_feed(None, None).unwrap();
        let ids: Vec<_> = feed.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);

        let limited = service.approved_feed(Some("wdw"), Some("1")).unwrap();
        assert_eq!(limited.len(), 1);

        let paris_feed = service.approved_feed(Some("dlp"), None).unwrap();
        assert_eq!(paris_feed[0].id, paris.id);
    }

    #[test]
    fn test_admin_operations_need_the_token() {
        let service = service();
        let stored = service.submit(report("x")).unwrap();
        let id = stored.id.to_string();

        assert!(matches!(service.admin_list(None, None, None, None), Err(MapError::Unauthorized)));
        assert!(matches!(
            service.approve(Some("Bearer nope"), &id),
            Err(MapError::Unauthorized)
        ));
        assert!(service.reject(Some("let-me-in"), &id, None).is_err());
        assert!(service
            .edit(None, &id, ReportEdit { zoom: Some(3.0), ..Default::default() })
            .is_err());

        let unchanged = service.admin_list(AUTH, None, None, None).unwrap();
        assert_eq!(unchanged[0].status, ReportStatus::Pending);
    }

    #[test]
    fn test_admin_list_filters_and_orders() {
        let service = service();
        let older = service.submit(report("older")).unwrap();
        let newer = service.submit(report("newer")).unwrap();
        let mut elsewhere = report("hong kong");
        elsewhere.park_id = Some("hkdl".into());
        service.submit(elsewhere).unwrap();
        service.reject(AUTH, &older.id.to_string(), Some("duplicate")).unwrap();

        let pending = service.admin_list(AUTH, Some("bogus"), Some("wdw"), None).unwrap();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, newer.id);

        let all_pending = service.admin_list(AUTH, None, None, None).unwrap();
        assert_eq!(all_pending.len(), 2);
        assert_eq!(all_pending[0].park_id, "hkdl");

        let rejected = service.admin_list(AUTH, Some("rejected"), None, None).unwrap();
        assert_eq!(rejected.len(), 1);
        assert_eq!(rejected[0].admin_notes.as_deref(), Some("duplicate"));
    }

    #[test]
    fn test_edit() {
        let service = service();
        let stored = service.submit(report("typo here")).unwrap();
        let id = stored.id.to_string();

        assert!(matches!(
            service.edit(AUTH, &id, ReportEdit::default()),
            Err(MapError::Validation(_))
        ));
        assert!(matches!(
            service.edit(AUTH, &id, ReportEdit { lng: Some(200.0), ..Default::default() }),
            Err(MapError::Validation(_))
        ));

        let edited = service
            .edit(
                AUTH,
                &id,
                ReportEdit {
                    description: Some("fixed".into()),
                    category: Some("attraction".into()),
                    lat: Some(28.4),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(edited.description, "fixed");
        assert_eq!(edited.category, "attraction");
        assert_eq!(edited.lat, 28.4);
        assert_eq!(edited.lng, stored.lng);
        assert!(edited.updated_at > stored.updated_at);
        assert_eq!(edited.created_at, stored.created_at);
    }

    #[test]
    fn test_unknown_ids() {
        let service = service();
        let missing = uuid::Uuid::new_v4().to_string();
        assert!(matches!(service.approve(AUTH, &missing), Err(MapError::NotFound(_))));
        assert!(matches!(service.approve(AUTH, "42"), Err(MapError::NotFound(_))));
    }

    #[test]
    fn test_reports_serialize_camel_case() {
        let service = service();
        let stored = service.submit(report("x")).unwrap();
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["mapVersion"], "2024-03");
        assert_eq!(json["status"], "pending");
        assert!(json["approvedAt"].is_null());
    }
}
