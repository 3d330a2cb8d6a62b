// SPDX-License-Identifier: MIT

//! API routes for authenticated users.

use axum::{
    extract::{Path, Query, State},
    routing::{get, put},
    Extension, Json, Router,
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::middleware::auth::AuthUser;
use crate::models::stats::{
    self, dashboard_savings, lifetime_savings, round_amount, round_percentage, share_text,
    SavingsRecord, WindowCounts,
};
use crate::models::user::{creation_date_editable, CREATION_DATE_GRACE_DAYS};
use crate::models::{Currency, SmokeEvent, User};
use crate::time_utils::{format_utc_rfc3339, start_of_local_day, truncate_to_second};
use crate::AppState;

/// API routes (require authentication via JWT).
/// The auth middleware is applied in routes/mod.rs for these routes.
pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/me", get(get_me).put(update_me))
        .route("/api/smokes", get(list_smokes).post(record_smoke))
        .route("/api/smokes/{id}", put(update_smoke).delete(delete_smoke))
        .route("/api/stats", get(get_stats))
        .route("/api/stats/lifetime", get(get_lifetime_stats))
        .route("/api/share", get(get_share_text))
}

// ─── User Profile ────────────────────────────────────────────

/// Current user response.
#[derive(Serialize)]
pub struct UserResponse {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub avg_cigarettes_per_day: u32,
    pub cigarettes_per_pack: u32,
    pub price_per_pack: f64,
    pub currency: Currency,
    pub created_at: String,
    pub updated_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            user_id: user.user_id,
            name: user.name,
            email: user.email,
            avg_cigarettes_per_day: user.avg_cigarettes_per_day,
            cigarettes_per_pack: user.cigarettes_per_pack,
            price_per_pack: user.price_per_pack,
            currency: user.currency,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

/// Get current user profile.
async fn get_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<UserResponse>> {
    let profile = fetch_profile(&state, &user.user_id).await?;
    Ok(Json(UserResponse::from(profile)))
}

/// Profile update payload.
#[derive(Deserialize, Validate)]
pub struct UpdateProfileRequest {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(range(min = 1, message = "average cigarettes per day must be positive"))]
    pub avg_cigarettes_per_day: u32,
    #[validate(range(min = 1, message = "cigarettes per pack must be positive"))]
    pub cigarettes_per_pack: u32,
    #[validate(range(min = 0.0, message = "price per pack cannot be negative"))]
    pub price_per_pack: f64,
    pub currency: Currency,
    /// Only accepted within the 3-day grace window after signup.
    pub created_at: Option<String>,
}

/// Update baseline parameters (and, inside the grace window, the account
/// creation date).
async fn update_me(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<UserResponse>> {
    payload.validate()?;

    let mut profile = fetch_profile(&state, &user.user_id).await?;
    let now = Utc::now();

    if let Some(raw) = payload.created_at.as_deref() {
        let original_created = parse_stored_timestamp(&profile.created_at)?;
        check_creation_date_edit(original_created, now)?;
        let new_created = parse_event_timestamp(raw, now)?;
        profile.created_at = format_utc_rfc3339(new_created);
    }

    profile.name = payload.name.trim().to_string();
    profile.avg_cigarettes_per_day = payload.avg_cigarettes_per_day;
    profile.cigarettes_per_pack = payload.cigarettes_per_pack;
    profile.price_per_pack = payload.price_per_pack;
    profile.currency = payload.currency;
    profile.updated_at = format_utc_rfc3339(truncate_to_second(now));

    state.db.upsert_user(&profile).await?;

    tracing::info!(user_id = %profile.user_id, "Profile updated");

    Ok(Json(UserResponse::from(profile)))
}

// ─── Smoke Events ────────────────────────────────────────────

/// One logged event in API responses.
#[derive(Serialize)]
pub struct SmokeResponse {
    pub smoke_id: String,
    pub timestamp: String,
}

impl From<SmokeEvent> for SmokeResponse {
    fn from(smoke: SmokeEvent) -> Self {
        Self {
            smoke_id: smoke.smoke_id,
            timestamp: format_utc_rfc3339(smoke.timestamp),
        }
    }
}

/// Full event log, newest first, with the per-cigarette unit cost the
/// client needs to render cost columns.
#[derive(Serialize)]
pub struct SmokeListResponse {
    pub smokes: Vec<SmokeResponse>,
    pub total: u32,
    pub unit_cost: f64,
    pub currency: Currency,
    /// Display symbol for rendering amounts ($, ₹, €, £)
    pub currency_symbol: &'static str,
}

/// Get the user's full smoking history.
async fn list_smokes(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<SmokeListResponse>> {
    let profile = fetch_profile(&state, &user.user_id).await?;
    let smokes = state.db.get_smokes_for_user(&user.user_id).await?;

    let total = smokes.len() as u32;
    let unit_cost = round_amount(stats::per_cigarette_cost(&profile));

    Ok(Json(SmokeListResponse {
        smokes: smokes.into_iter().map(SmokeResponse::from).collect(),
        total,
        unit_cost,
        currency: profile.currency,
        currency_symbol: profile.currency.symbol(),
    }))
}

/// Record-smoke payload. Timestamp defaults to the current instant.
#[derive(Deserialize, Default)]
pub struct RecordSmokeRequest {
    pub timestamp: Option<String>,
}

/// Log one cigarette. The body is optional; an empty body records "now".
async fn record_smoke(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    body: axum::body::Bytes,
) -> Result<Json<SmokeResponse>> {
    let now = Utc::now();
    let payload: RecordSmokeRequest = if body.is_empty() {
        RecordSmokeRequest::default()
    } else {
        serde_json::from_slice(&body)
            .map_err(|e| AppError::Validation(format!("invalid request body: {}", e)))?
    };

    let timestamp = match payload.timestamp.as_deref() {
        Some(raw) => parse_event_timestamp(raw, now)?,
        None => truncate_to_second(now),
    };

    let smoke = SmokeEvent::new(&user.user_id, timestamp);
    state.db.set_smoke(&smoke).await?;

    tracing::debug!(user_id = %user.user_id, smoke_id = %smoke.smoke_id, "Smoke recorded");

    Ok(Json(SmokeResponse::from(smoke)))
}

/// Edit payload: the corrected timestamp.
#[derive(Deserialize)]
pub struct UpdateSmokeRequest {
    pub timestamp: String,
}

/// Edit a past record's timestamp.
async fn update_smoke(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(smoke_id): Path<String>,
    Json(payload): Json<UpdateSmokeRequest>,
) -> Result<Json<SmokeResponse>> {
    // Validate before touching the store: a future-dated edit is never written.
    let timestamp = parse_event_timestamp(&payload.timestamp, Utc::now())?;

    let mut smoke = fetch_owned_smoke(&state, &user.user_id, &smoke_id).await?;
    smoke.timestamp = timestamp;
    state.db.set_smoke(&smoke).await?;

    tracing::debug!(user_id = %user.user_id, smoke_id = %smoke.smoke_id, "Smoke updated");

    Ok(Json(SmokeResponse::from(smoke)))
}

/// Deletion response.
#[derive(Serialize)]
pub struct DeleteSmokeResponse {
    pub success: bool,
}

/// Delete a record.
async fn delete_smoke(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Path(smoke_id): Path<String>,
) -> Result<Json<DeleteSmokeResponse>> {
    let smoke = fetch_owned_smoke(&state, &user.user_id, &smoke_id).await?;
    state.db.delete_smoke(&smoke.smoke_id).await?;

    tracing::debug!(user_id = %user.user_id, smoke_id = %smoke.smoke_id, "Smoke deleted");

    Ok(Json(DeleteSmokeResponse { success: true }))
}

// ─── Dashboard Stats ─────────────────────────────────────────

#[derive(Deserialize)]
struct StatsQuery {
    /// Client UTC offset in minutes, used to find local midnight.
    /// Defaults to 0 (UTC).
    #[serde(default)]
    tz_offset_minutes: i32,
}

/// Savings over one horizon, rounded for presentation.
#[derive(Serialize)]
pub struct SavingsSummary {
    /// Rounded to 2 decimal places
    pub amount_saved: f64,
    /// Rounded to 1 decimal place; negative means excess over baseline
    pub percentage_saved: f64,
    pub improved: bool,
}

impl From<SavingsRecord> for SavingsSummary {
    fn from(record: SavingsRecord) -> Self {
        Self {
            amount_saved: round_amount(record.amount_saved),
            percentage_saved: round_percentage(record.percentage_saved),
            improved: record.improved,
        }
    }
}

/// Dashboard statistics response.
///
/// Yearly figures are estimates extrapolated from the last 30 days, not a
/// measured yearly total.
#[derive(Serialize)]
pub struct StatsResponse {
    pub counts: WindowCounts,
    /// Cost of the trailing-30-day count, rounded to 2 decimal places
    pub total_cost: f64,
    pub currency: Currency,
    /// Display symbol for rendering amounts ($, ₹, €, £)
    pub currency_symbol: &'static str,
    /// Estimated cigarettes over a year at the trailing 30-day rate
    pub projected_yearly_count: u32,
    pub daily: SavingsSummary,
    pub weekly: SavingsSummary,
    pub monthly: SavingsSummary,
    pub yearly: SavingsSummary,
}

/// Window counts, 30-day cost, and per-horizon savings for the dashboard.
async fn get_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsResponse>> {
    let now = Utc::now();
    let start_of_today = start_of_local_day(now, params.tz_offset_minutes).ok_or_else(|| {
        AppError::Validation("tz_offset_minutes is out of range".to_string())
    })?;

    let profile = fetch_profile(&state, &user.user_id).await?;

    let month_ago = now - Duration::days(30);
    let smokes = state.db.get_smokes_since(&user.user_id, month_ago).await?;

    let counts = WindowCounts::classify(
        smokes.iter().map(|s| &s.timestamp),
        now,
        start_of_today,
    );

    tracing::debug!(
        user_id = %user.user_id,
        today = counts.today,
        week = counts.week,
        month = counts.month,
        "Computed window counts"
    );

    let savings = dashboard_savings(&profile, counts);
    let unit_cost = stats::per_cigarette_cost(&profile);
    let projected = stats::projected_yearly_count(counts.month);

    Ok(Json(StatsResponse {
        counts,
        total_cost: round_amount(counts.month as f64 * unit_cost),
        currency: profile.currency,
        currency_symbol: profile.currency.symbol(),
        projected_yearly_count: projected.round() as u32,
        daily: savings.daily.into(),
        weekly: savings.weekly.into(),
        monthly: savings.monthly.into(),
        yearly: savings.yearly.into(),
    }))
}

// ─── Lifetime Savings ────────────────────────────────────────

/// Savings-since-signup response for the profile screen.
#[derive(Serialize)]
pub struct LifetimeStatsResponse {
    pub days_since_creation: i64,
    /// Rounded to 2 decimal places; negative means excess spending
    pub total_saved: f64,
    /// First-year savings target, rounded to 2 decimal places
    pub yearly_target: f64,
    /// Progress toward the day-adjusted target, ≤ 100, rounded to 1 dp
    pub progress_percentage: f64,
    pub currency: Currency,
}

/// Lifetime savings against the first-year target.
async fn get_lifetime_stats(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<LifetimeStatsResponse>> {
    let profile = fetch_profile(&state, &user.user_id).await?;
    let created_at = parse_stored_timestamp(&profile.created_at)?;

    let actual = state
        .db
        .count_smokes_since(&user.user_id, created_at)
        .await?;

    let lifetime = lifetime_savings(&profile, created_at, actual, Utc::now());

    Ok(Json(LifetimeStatsResponse {
        days_since_creation: lifetime.days_since_creation,
        total_saved: round_amount(lifetime.total_saved),
        yearly_target: round_amount(lifetime.yearly_target),
        progress_percentage: round_percentage(lifetime.progress_percentage),
        currency: profile.currency,
    }))
}

// ─── Share Progress ──────────────────────────────────────────

/// Share text response.
#[derive(Serialize)]
pub struct ShareResponse {
    pub text: String,
}

/// Fixed-template progress summary for sharing.
async fn get_share_text(
    State(state): State<Arc<AppState>>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<ShareResponse>> {
    let profile = fetch_profile(&state, &user.user_id).await?;
    let created_at = parse_stored_timestamp(&profile.created_at)?;

    let actual = state
        .db
        .count_smokes_since(&user.user_id, created_at)
        .await?;

    Ok(Json(ShareResponse {
        text: share_text(&profile, created_at, actual, Utc::now()),
    }))
}

// ─── Helpers ─────────────────────────────────────────────────

/// Fetch the caller's profile or 404.
async fn fetch_profile(state: &Arc<AppState>, user_id: &str) -> Result<User> {
    state
        .db
        .get_user(user_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("User {} not found", user_id)))
}

/// Fetch a smoke event and verify it belongs to the caller.
///
/// Someone else's event answers 404, indistinguishable from a missing one.
async fn fetch_owned_smoke(
    state: &Arc<AppState>,
    user_id: &str,
    smoke_id: &str,
) -> Result<SmokeEvent> {
    let not_found = || AppError::NotFound(format!("Record {} not found", smoke_id));

    let smoke = state.db.get_smoke(smoke_id).await?.ok_or_else(not_found)?;
    if smoke.user_id != user_id {
        return Err(not_found());
    }
    Ok(smoke)
}

/// Reject a creation-date edit once the grace window has closed.
fn check_creation_date_edit(original_created: DateTime<Utc>, now: DateTime<Utc>) -> Result<()> {
    if !creation_date_editable(original_created, now) {
        return Err(AppError::Validation(format!(
            "account creation date can only be changed within {} days of signup",
            CREATION_DATE_GRACE_DAYS
        )));
    }
    Ok(())
}

/// Parse a user-supplied event timestamp, rejecting the future.
fn parse_event_timestamp(raw: &str, now: DateTime<Utc>) -> Result<DateTime<Utc>> {
    let parsed = DateTime::parse_from_rfc3339(raw)
        .map_err(|_| {
            AppError::Validation("timestamp must be an RFC3339 datetime".to_string())
        })?
        .with_timezone(&Utc);

    if parsed > now {
        return Err(AppError::Validation(
            "timestamp cannot be in the future".to_string(),
        ));
    }

    Ok(truncate_to_second(parsed))
}

/// Parse a timestamp this service wrote earlier; failure is a data bug.
fn parse_stored_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| AppError::Internal(anyhow::anyhow!("stored timestamp unparseable: {}", e)))
}
