use chrono::{TimeZone, Utc};
use serde_json::json;
use verdict_core::db::open_db_in_memory;
use verdict_core::{
    count_by_court, count_by_month, CaseAnalytics, Confirmation, DeleteOutcome, DocumentStore,
    FixedClock, SqliteDocumentStore, VerdictFields, VerdictFilter, VerdictListing, VerdictPatch,
    VerdictService, VerdictServiceError, VerdictStore,
};

fn fields(case_number: &str, court_name: &str) -> VerdictFields {
    VerdictFields {
        case_number: case_number.to_string(),
        court_name: court_name.to_string(),
        judge_name: "x".to_string(),
        plaintiff: "x".to_string(),
        defendant: "x".to_string(),
        stated_facts: "x".to_string(),
        verdict: "x".to_string(),
        date: None,
    }
}

fn court_filter(term: &str) -> VerdictFilter {
    VerdictFilter {
        court_name: term.to_string(),
        ..VerdictFilter::default()
    }
}

#[test]
fn create_list_and_filter_by_court_returns_exactly_that_record() {
    let conn = open_db_in_memory().unwrap();
    let service = VerdictService::new(VerdictStore::new(SqliteDocumentStore::new(&conn), "verdicts"));

    let id = service.create(&fields("CV-001", "District Court")).unwrap();
    service.create(&fields("CV-002", "Court of Appeals")).unwrap();

    let mut listing = VerdictListing::load(&service).unwrap();
    assert_eq!(listing.visible().len(), 2);

    listing.set_filter(court_filter("district"));
    assert_eq!(listing.visible().len(), 1);
    assert_eq!(listing.visible()[0].id, id);
    assert_eq!(listing.visible()[0].fields.case_number, "CV-001");
}

#[test]
fn document_missing_judge_name_fails_closed() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);
    let body = json!({"caseNumber": "CV-7", "courtName": "Probate Court"});
    let raw_id = store
        .create("verdicts", body.as_object().unwrap())
        .unwrap();
    let service = VerdictService::new(VerdictStore::new(store, "verdicts"));

    let mut listing = VerdictListing::load(&service).unwrap();
    assert_eq!(listing.records()[0].fields.judge_name, "");

    listing.set_filter(VerdictFilter {
        judge_name: "hale".to_string(),
        ..VerdictFilter::default()
    });
    assert!(listing.visible().is_empty());

    listing.set_filter(court_filter("probate"));
    assert_eq!(listing.visible().len(), 1);
    assert_eq!(listing.visible()[0].id, raw_id);
}

#[test]
fn delete_prunes_listing_only_after_store_confirms() {
    let conn = open_db_in_memory().unwrap();
    let service = VerdictService::new(VerdictStore::new(SqliteDocumentStore::new(&conn), "verdicts"));
    let keep = service.create(&fields("CV-1", "A")).unwrap();
    let gone = service.create(&fields("CV-2", "A")).unwrap();

    let mut listing = VerdictListing::load(&service).unwrap();

    let outcome = listing
        .delete(&service, &gone, Confirmation::Declined)
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Cancelled);
    assert_eq!(listing.records().len(), 2);

    let outcome = listing
        .delete(&service, &gone, Confirmation::Confirmed)
        .unwrap();
    assert_eq!(outcome, DeleteOutcome::Deleted);
    assert_eq!(listing.records().len(), 1);
    assert_eq!(listing.records()[0].id, keep);

    let reloaded = service.list_all().unwrap();
    assert_eq!(reloaded.len(), 1);
    assert_eq!(reloaded[0].id, keep);
}

#[test]
fn failed_delete_keeps_local_snapshot() {
    let conn = open_db_in_memory().unwrap();
    let service = VerdictService::new(VerdictStore::new(SqliteDocumentStore::new(&conn), "verdicts"));
    let id = service.create(&fields("CV-1", "A")).unwrap();

    let mut listing = VerdictListing::load(&service).unwrap();
    // Removed behind the listing's back, so the store reports it missing.
    service.delete(&id, Confirmation::Confirmed).unwrap();

    let err = listing
        .delete(&service, &id, Confirmation::Confirmed)
        .unwrap_err();
    assert!(matches!(err, VerdictServiceError::NotFound(_)));
    assert_eq!(listing.records().len(), 1);

    listing.reload(&service).unwrap();
    assert!(listing.records().is_empty());
}

#[test]
fn analytics_over_stored_records() {
    let conn = open_db_in_memory().unwrap();
    let service = VerdictService::new(VerdictStore::new(SqliteDocumentStore::new(&conn), "verdicts"));
    let march = Utc
        .with_ymd_and_hms(2024, 3, 15, 9, 30, 0)
        .unwrap()
        .timestamp_millis();

    for court in ["A", "A"] {
        let mut dated = fields("CV", court);
        dated.date = Some(march);
        service.create(&dated).unwrap();
    }
    // Blank courts only arrive through lenient edits or foreign writers.
    let id = service.create(&fields("CV", "B")).unwrap();
    service
        .edit(
            &id,
            &VerdictPatch {
                court_name: Some(String::new()),
                ..VerdictPatch::default()
            },
        )
        .unwrap();

    let records = service.list_all().unwrap();
    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap());

    let courts = count_by_court(&records);
    assert_eq!(courts.get("A"), Some(2));
    assert_eq!(courts.get("Unknown"), Some(1));

    let months = count_by_month(&records, &clock);
    assert_eq!(months.get("2024-03"), Some(2));
    assert_eq!(months.get("2026-10"), Some(1));

    let analytics = CaseAnalytics::build(&records, &clock);
    assert_eq!(analytics.total, 3);
    assert_eq!(analytics.by_court.labels, vec!["A".to_string(), "Unknown".to_string()]);
    assert_eq!(analytics.by_month.counts, vec![2, 1]);
}

#[test]
fn mistyped_documents_do_not_blank_listing_or_analytics() {
    let conn = open_db_in_memory().unwrap();
    let store = SqliteDocumentStore::new(&conn);
    let service = VerdictService::new(VerdictStore::new(store, "verdicts"));
    let valid = service.create(&fields("CV-1", "A")).unwrap();

    let text_date = json!({"caseNumber": "CV-2", "courtName": "B", "date": "2024-03-15"});
    let numeric_case = json!({"caseNumber": 7, "courtName": "B", "date": "soon"});
    store
        .create("verdicts", text_date.as_object().unwrap())
        .unwrap();
    store
        .create("verdicts", numeric_case.as_object().unwrap())
        .unwrap();

    let mut listing = VerdictListing::load(&service).unwrap();
    assert_eq!(listing.records().len(), 3);
    assert_eq!(listing.records()[0].id, valid);

    listing.set_filter(VerdictFilter {
        case_number: "7".to_string(),
        ..VerdictFilter::default()
    });
    assert_eq!(listing.visible().len(), 1);
    assert_eq!(listing.visible()[0].fields.case_number, "7");

    let clock = FixedClock(Utc.with_ymd_and_hms(2026, 10, 16, 0, 0, 0).unwrap());
    let analytics = CaseAnalytics::build(listing.records(), &clock);
    assert_eq!(analytics.total, 3);
    assert_eq!(analytics.by_court.labels, vec!["A".to_string(), "B".to_string()]);
    assert_eq!(analytics.by_court.counts, vec![1, 2]);
    assert_eq!(analytics.by_month.labels, vec!["2026-10".to_string(), "2024-03".to_string()]);
    assert_eq!(analytics.by_month.counts, vec![2, 1]);
}
