// ABOUTME: Calendar invite route for signed or pending contracts
// ABOUTME: Produces an iCalendar file with a recurrence rule matching the cleaning frequency
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::HeaderMap,
    response::Response,
    routing::get,
    Router,
};
use chrono::{DateTime, Days, Duration, NaiveTime, Utc};
use serde::Deserialize;

use super::contracts::load_contract_parts;
use super::{file_response, ICS_CONTENT_TYPE};
use crate::constants::defaults;
use crate::documents::contract_invite;
use crate::errors::{AppError, AppResult};
use crate::logging::AppLogger;
use crate::resources::ServerResources;

const MAX_DURATION_HOURS: i64 = 24;

/// Invite scheduling options
#[derive(Debug, Default, Deserialize)]
pub struct InviteQuery {
    /// RFC 3339 start; defaults to tomorrow at 09:00 UTC
    pub start: Option<String>,
    /// Appointment length in hours
    pub duration_hours: Option<i64>,
}

impl InviteQuery {
    fn start(&self, now: DateTime<Utc>) -> AppResult<DateTime<Utc>> {
        if let Some(raw) = &self.start {
            return DateTime::parse_from_rfc3339(raw)
                .map(|start| start.with_timezone(&Utc))
                .map_err(|e| AppError::invalid_format("start", format!("expected RFC 3339: {e}")));
        }
        let tomorrow = now
            .date_naive()
            .checked_add_days(Days::new(1))
            .ok_or_else(|| AppError::internal("Date overflow"))?;
        let nine = NaiveTime::from_hms_opt(defaults::BOOKING_START_HOUR, 0, 0)
            .ok_or_else(|| AppError::internal("Invalid booking start hour"))?;
        Ok(tomorrow.and_time(nine).and_utc())
    }

    fn duration(&self) -> AppResult<Duration> {
        let hours = self.duration_hours.unwrap_or(defaults::BOOKING_DURATION_HOURS);
        if !(1..=MAX_DURATION_HOURS).contains(&hours) {
            return Err(AppError::out_of_range(
                "duration_hours",
                format!("must be between 1 and {MAX_DURATION_HOURS}"),
            ));
        }
        Ok(Duration::hours(hours))
    }
}

/// Calendar routes
pub struct CalendarRoutes;

impl CalendarRoutes {
    /// Create all calendar routes
    pub fn routes(resources: Arc<ServerResources>) -> Router {
        Router::new()
            .route(
                "/calendar/contract/:client_id/:bid_id",
                get(Self::handle_contract_invite),
            )
            .with_state(resources)
    }

    async fn handle_contract_invite(
        State(resources): State<Arc<ServerResources>>,
        headers: HeaderMap,
        Path((client_id, bid_id)): Path<(String, String)>,
        Query(query): Query<InviteQuery>,
    ) -> Result<Response, AppError> {
        let user = resources.authenticate(&headers).await?;
        let start = query.start(Utc::now())?;
        let duration = query.duration()?;

        let parts = load_contract_parts(&resources, &user.uid, &client_id, &bid_id).await?;
        let event = contract_invite(&parts.business, &parts.client, &parts.bid, start, duration);

        AppLogger::log_event(&user.uid, "calendar_invite_generated", Some(&bid_id));
        Ok(file_response(event.to_ics(), ICS_CONTENT_TYPE, "contract_event.ics"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_start_is_tomorrow_morning() {
        let now = Utc.with_ymd_and_hms(2025, 3, 31, 22, 15, 0).unwrap();
        let start = InviteQuery::default().start(now).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 4, 1, 9, 0, 0).unwrap());
    }

    #[test]
    fn test_explicit_start_is_converted_to_utc() {
        let query = InviteQuery {
            start: Some("2025-06-02T10:00:00-04:00".to_owned()),
            duration_hours: None,
        };
        let start = query.start(Utc::now()).unwrap();
        assert_eq!(start, Utc.with_ymd_and_hms(2025, 6, 2, 14, 0, 0).unwrap());
    }

    #[test]
    fn test_duration_bounds() {
        let query = |hours| InviteQuery {
            start: None,
            duration_hours: Some(hours),
        };
        assert_eq!(InviteQuery::default().duration().unwrap(), Duration::hours(3));
        assert_eq!(query(24).duration().unwrap(), Duration::hours(24));
        assert!(query(0).duration().is_err());
        assert!(query(25).duration().is_err());
    }
}
