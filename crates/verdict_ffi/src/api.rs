//! FFI use-case API for the Flutter pages.
//!
//! # Responsibility
//! - Expose one function per page action (sign-in, create, manage, edit,
//!   view, analytics).
//! - Turn core errors into short notification messages for the UI.
//!
//! # Invariants
//! - Exported functions must not panic across the FFI boundary.
//! - Every failure is logged and returned as `ok=false` with a message;
//!   nothing is retried.
//! - One session holder per process, shared by every page.

use log::{error, warn};
use once_cell::sync::Lazy;
use rusqlite::Connection;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, OnceLock, PoisonError};
use verdict_core::db::open_db;
use verdict_core::{
    core_version as core_version_inner, default_log_level as default_log_level_inner,
    init_logging as init_logging_inner, ping as ping_inner, AuthBackend, CaseAnalytics,
    Confirmation, DeleteOutcome, DocumentStore, NewProfile, ProfileService, Route,
    SessionProvider, SqliteAuthBackend, SqliteDocumentStore, StoreConfig, SystemClock,
    VerdictFields, VerdictFilter, VerdictListing, VerdictPatch, VerdictRecord, VerdictService,
    VerdictServiceError, VerdictStore,
};

const APP_DB_FILE_NAME: &str = "verdict_app.sqlite3";

const MSG_FIELDS_REQUIRED: &str = "All fields are mandatory. Please fill out every field.";
const MSG_CREATED: &str = "Verdict created successfully!";
const MSG_CREATE_FAILED: &str = "Failed to create verdict. Please try again.";
const MSG_UPDATED: &str = "Verdict updated successfully!";
const MSG_UPDATE_FAILED: &str = "Failed to update verdict.";
const MSG_DELETED: &str = "Verdict deleted successfully!";
const MSG_DELETE_FAILED: &str = "Failed to delete verdict. Please try again.";
const MSG_NOT_FOUND: &str = "Verdict not found.";
const MSG_NO_MATCHES: &str = "No verdicts found matching your filters.";
const MSG_PROFILE_SAVE_FAILED: &str =
    "Account created, but the profile could not be saved. Please sign in again.";

static APP_CONFIG: OnceLock<StoreConfig> = OnceLock::new();
static SESSION: Lazy<Mutex<SessionProvider>> = Lazy::new(|| Mutex::new(SessionProvider::new()));

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

/// Expose core crate version through FFI.
#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Level used when the app passes a blank level to `init_logging`.
#[flutter_rust_bridge::frb(sync)]
pub fn default_log_level() -> String {
    default_log_level_inner().to_owned()
}

/// Initializes Rust core logging once per process.
///
/// A blank `level` falls back to `default_log_level()`.
/// Returns an empty string on success and the error message otherwise.
/// Safe to call repeatedly with the same `level + log_dir`.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    let level = if level.trim().is_empty() {
        default_log_level_inner()
    } else {
        level.as_str()
    };
    match init_logging_inner(level, log_dir.as_str()) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Generic action envelope: outcome, affected id, notification text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Created/affected verdict id, or uid for auth actions.
    pub record_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, record_id: Option<String>) -> Self {
        Self {
            ok: true,
            record_id,
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            record_id: None,
            message: message.into(),
        }
    }
}

/// Flat verdict row for list and detail views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictItem {
    pub id: String,
    pub case_number: String,
    pub court_name: String,
    pub judge_name: String,
    pub plaintiff: String,
    pub defendant: String,
    pub stated_facts: String,
    pub verdict: String,
    pub date_epoch_ms: Option<i64>,
}

impl From<VerdictRecord> for VerdictItem {
    fn from(record: VerdictRecord) -> Self {
        let VerdictRecord { id, fields } = record;
        Self {
            id,
            case_number: fields.case_number,
            court_name: fields.court_name,
            judge_name: fields.judge_name,
            plaintiff: fields.plaintiff,
            defendant: fields.defendant,
            stated_facts: fields.stated_facts,
            verdict: fields.verdict,
            date_epoch_ms: fields.date,
        }
    }
}

/// Create-form input.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictInput {
    pub case_number: String,
    pub court_name: String,
    pub judge_name: String,
    pub plaintiff: String,
    pub defendant: String,
    pub stated_facts: String,
    pub verdict: String,
    pub date_epoch_ms: Option<i64>,
}

/// Edit-form input; `None` keeps the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerdictPatchInput {
    pub case_number: Option<String>,
    pub court_name: Option<String>,
    pub judge_name: Option<String>,
    pub plaintiff: Option<String>,
    pub defendant: Option<String>,
    pub stated_facts: Option<String>,
    pub verdict: Option<String>,
    pub date_epoch_ms: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictListResponse {
    /// Rows accepted by the filter, in creation order.
    pub items: Vec<VerdictItem>,
    /// Size of the unfiltered collection.
    pub total: u32,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerdictDetailResponse {
    pub item: Option<VerdictItem>,
    pub message: String,
}

/// Chart data for the analytics page; label/count vectors are parallel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnalyticsResponse {
    pub court_labels: Vec<String>,
    pub court_counts: Vec<u64>,
    pub month_labels: Vec<String>,
    pub month_counts: Vec<u64>,
    pub total: u32,
    pub message: String,
}

/// Creates an account, writes its profile and signs it in.
#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_up(
    name: String,
    last_name: String,
    email: String,
    password: String,
) -> ActionResponse {
    let input = NewProfile {
        name,
        last_name,
        email,
    };
    if input.validate().is_err() || password.is_empty() {
        return ActionResponse::failure("Please fill out every field.");
    }

    let result = with_connection(|conn, config| {
        sign_up_with_profile(
            &mut lock_session(),
            &SqliteAuthBackend::new(conn),
            &ProfileService::from_config(SqliteDocumentStore::new(conn), config),
            &input,
            &password,
        )
    });

    match result {
        Ok(uid) => ActionResponse::success("Account created.", Some(uid)),
        Err(message) => ActionResponse::failure(message),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_in(email: String, password: String) -> ActionResponse {
    let result = with_connection(|conn, _| {
        let backend = SqliteAuthBackend::new(conn);
        lock_session()
            .sign_in(&backend, &email, &password)
            .map(|user| user.uid)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(uid) => ActionResponse::success("Signed in.", Some(uid)),
        Err(message) => ActionResponse::failure(message),
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn auth_sign_out() -> ActionResponse {
    let result = with_connection(|conn, _| {
        let backend = SqliteAuthBackend::new(conn);
        lock_session()
            .sign_out(&backend)
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(()) => ActionResponse::success("Signed out.", None),
        Err(message) => ActionResponse::failure(message),
    }
}

/// `"{name} {lastName}"` of the signed-in user, if any.
#[flutter_rust_bridge::frb(sync)]
pub fn session_display_name() -> Option<String> {
    let uid = lock_session().current_user()?.uid.clone();
    with_connection(|conn, config| {
        ProfileService::from_config(SqliteDocumentStore::new(conn), config)
            .display_name(&uid)
            .map_err(|err| err.to_string())
    })
    .unwrap_or_else(|message| {
        warn!("event=session_display_name module=ffi status=error error={message}");
        None
    })
}

/// Resolves where a feature link should land; signed-out users go to
/// sign-in and unknown paths go home.
#[flutter_rust_bridge::frb(sync)]
pub fn navigate_feature(target: String) -> String {
    let route = Route::parse(&target).unwrap_or(Route::Home);
    lock_session().guard(route).path()
}

#[flutter_rust_bridge::frb(sync)]
pub fn verdict_create(input: VerdictInput) -> ActionResponse {
    let fields = VerdictFields {
        case_number: input.case_number,
        court_name: input.court_name,
        judge_name: input.judge_name,
        plaintiff: input.plaintiff,
        defendant: input.defendant,
        stated_facts: input.stated_facts,
        verdict: input.verdict,
        date: input.date_epoch_ms,
    };

    let result = with_connection(|conn, config| {
        verdict_service(conn, config)
            .create(&fields)
            .map_err(|err| match err {
                VerdictServiceError::Validation(_) => MSG_FIELDS_REQUIRED.to_string(),
                _ => MSG_CREATE_FAILED.to_string(),
            })
    });

    match result {
        Ok(id) => ActionResponse::success(MSG_CREATED, Some(id)),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Upload path of the create page. Accepts the file name and reports
/// success without persisting anything.
#[flutter_rust_bridge::frb(sync)]
pub fn verdict_upload_file(file_name: Option<String>) -> ActionResponse {
    match file_name.filter(|name| !name.trim().is_empty()) {
        Some(name) => {
            log::info!(
                "event=verdict_upload module=ffi status=ok persisted=false name_chars={}",
                name.chars().count()
            );
            ActionResponse::success("File uploaded successfully!", None)
        }
        None => ActionResponse::failure("Please upload a file."),
    }
}

/// Loads every verdict and applies the three-field filter.
#[flutter_rust_bridge::frb(sync)]
pub fn verdict_list(
    case_number: String,
    court_name: String,
    judge_name: String,
) -> VerdictListResponse {
    let filter = VerdictFilter {
        case_number,
        court_name,
        judge_name,
    };
    let result = with_connection(|conn, config| {
        VerdictListing::load(&verdict_service(conn, config)).map_err(|err| err.to_string())
    });

    match result {
        Ok(mut listing) => {
            listing.set_filter(filter);
            let total = count_u32(listing.records().len());
            let items: Vec<VerdictItem> = listing
                .visible()
                .iter()
                .cloned()
                .map(VerdictItem::from)
                .collect();
            let message = if items.is_empty() {
                MSG_NO_MATCHES.to_string()
            } else {
                format!("Showing {} of {} verdict(s).", items.len(), total)
            };
            VerdictListResponse {
                items,
                total,
                message,
            }
        }
        Err(_) => VerdictListResponse {
            items: Vec::new(),
            total: 0,
            message: "Failed to load verdicts.".to_string(),
        },
    }
}

/// Detail view / edit prefetch.
#[flutter_rust_bridge::frb(sync)]
pub fn verdict_get(id: String) -> VerdictDetailResponse {
    let result = with_connection(|conn, config| {
        verdict_service(conn, config)
            .get(id.trim())
            .map_err(|err| match err {
                VerdictServiceError::NotFound(_) => "No verdict found".to_string(),
                _ => "Failed to fetch verdict".to_string(),
            })
    });

    match result {
        Ok(record) => VerdictDetailResponse {
            item: Some(record.into()),
            message: String::new(),
        },
        Err(message) => VerdictDetailResponse {
            item: None,
            message,
        },
    }
}

#[flutter_rust_bridge::frb(sync)]
pub fn verdict_edit(id: String, patch: VerdictPatchInput) -> ActionResponse {
    let patch = VerdictPatch {
        case_number: patch.case_number,
        court_name: patch.court_name,
        judge_name: patch.judge_name,
        plaintiff: patch.plaintiff,
        defendant: patch.defendant,
        stated_facts: patch.stated_facts,
        verdict: patch.verdict,
        date: patch.date_epoch_ms,
    };

    let result = with_connection(|conn, config| {
        verdict_service(conn, config)
            .edit(id.trim(), &patch)
            .map(|record| record.id)
            .map_err(|err| match err {
                VerdictServiceError::NotFound(_) => MSG_NOT_FOUND.to_string(),
                VerdictServiceError::Validation(_) => MSG_FIELDS_REQUIRED.to_string(),
                VerdictServiceError::Store(_) => MSG_UPDATE_FAILED.to_string(),
            })
    });

    match result {
        Ok(id) => ActionResponse::success(MSG_UPDATED, Some(id)),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Deletes after the UI's yes/no prompt. `confirmed=false` is a no-op.
#[flutter_rust_bridge::frb(sync)]
pub fn verdict_delete(id: String, confirmed: bool) -> ActionResponse {
    let result = with_connection(|conn, config| {
        verdict_service(conn, config)
            .delete(id.trim(), Confirmation::from(confirmed))
            .map_err(|_| MSG_DELETE_FAILED.to_string())
    });

    match result {
        Ok(DeleteOutcome::Deleted) => ActionResponse::success(MSG_DELETED, Some(id)),
        Ok(DeleteOutcome::Cancelled) => ActionResponse::failure("Delete cancelled."),
        Err(message) => ActionResponse::failure(message),
    }
}

/// Court and month breakdowns over the whole collection.
#[flutter_rust_bridge::frb(sync)]
pub fn case_analytics() -> AnalyticsResponse {
    let result = with_connection(|conn, config| {
        verdict_service(conn, config)
            .list_all()
            .map(|records| CaseAnalytics::build(&records, &SystemClock))
            .map_err(|err| err.to_string())
    });

    match result {
        Ok(analytics) => AnalyticsResponse {
            court_labels: analytics.by_court.labels,
            court_counts: analytics.by_court.counts,
            month_labels: analytics.by_month.labels,
            month_counts: analytics.by_month.counts,
            total: count_u32(analytics.total),
            message: String::new(),
        },
        Err(_) => AnalyticsResponse {
            court_labels: Vec::new(),
            court_counts: Vec::new(),
            month_labels: Vec::new(),
            month_counts: Vec::new(),
            total: 0,
            message: "Failed to load analytics.".to_string(),
        },
    }
}

/// Registers the account, then writes its profile. A failed profile write
/// signs the new account back out so the session never outlives the error.
fn sign_up_with_profile<B: AuthBackend, S: DocumentStore>(
    session: &mut SessionProvider,
    backend: &B,
    profiles: &ProfileService<S>,
    input: &NewProfile,
    password: &str,
) -> Result<String, String> {
    let user = session
        .sign_up(backend, &input.email, password)
        .map_err(|err| err.to_string())?;

    if let Err(err) = profiles.create_profile(&user.uid, input, &SystemClock) {
        error!(
            "event=profile_create module=ffi status=error uid={} error={err}",
            user.uid
        );
        if let Err(sign_out_err) = session.sign_out(backend) {
            warn!("event=auth_sign_out module=ffi status=error error={sign_out_err}");
        }
        return Err(MSG_PROFILE_SAVE_FAILED.to_string());
    }
    Ok(user.uid)
}

fn verdict_service<'conn>(
    conn: &'conn Connection,
    config: &StoreConfig,
) -> VerdictService<VerdictStore<SqliteDocumentStore<'conn>>> {
    VerdictService::with_edit_policy(
        VerdictStore::from_config(SqliteDocumentStore::new(conn), config),
        config.edit_policy,
    )
}

fn resolve_config() -> &'static StoreConfig {
    APP_CONFIG.get_or_init(|| {
        StoreConfig::from_env().unwrap_or_else(|err| {
            warn!("event=config_load module=ffi status=error fallback=defaults error={err}");
            StoreConfig::default()
        })
    })
}

fn resolve_db_path(config: &StoreConfig) -> PathBuf {
    config
        .db_path
        .clone()
        .unwrap_or_else(|| std::env::temp_dir().join(APP_DB_FILE_NAME))
}

fn with_connection<T>(
    f: impl FnOnce(&Connection, &StoreConfig) -> Result<T, String>,
) -> Result<T, String> {
    let config = resolve_config();
    let conn = open_db(resolve_db_path(config)).map_err(|err| {
        error!("event=app_db_open module=ffi status=error error={err}");
        format!("database unavailable: {err}")
    })?;
    f(&conn, config)
}

fn lock_session() -> MutexGuard<'static, SessionProvider> {
    SESSION.lock().unwrap_or_else(PoisonError::into_inner)
}

fn count_u32(value: usize) -> u32 {
    u32::try_from(value).unwrap_or(u32::MAX)
}
