//! Caller boundary: turns aggregation results into a status code and JSON body
//!
//! Only the error kind decides what the caller sees. Internal error text, URLs
//! and credential fragments never leave this module.

use http::StatusCode;
use serde::Serialize;
use serde_json::{Value, json};
use tracing::error;

use crate::aggregate::{NotLocated, Outcome, Report};
use crate::error::{AppError, ErrorKind};

const NOT_LOCATED_MESSAGE: &str =
    "Player has no profile on any probed shard yet, or plays on a shard that was not probed";
const NOT_FOUND_MESSAGE: &str = "No data available for this request";
const RATE_LIMITED_MESSAGE: &str = "The game API is busy right now, please retry shortly";
const UNAVAILABLE_MESSAGE: &str = "The game API is temporarily unavailable, please retry";
const INTERNAL_MESSAGE: &str = "Something went wrong while building this view";

#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    pub status: StatusCode,
    pub body: Value,
}

impl Envelope {
    pub fn ok<T: Serialize>(data: &T, warnings: &[String]) -> Self {
        match serde_json::to_value(data) {
            Ok(data) => {
                let mut body = json!({ "ok": true, "data": data });
                if !warnings.is_empty() {
                    body["warnings"] = json!(warnings);
                }
                Self {
                    status: StatusCode::OK,
                    body,
                }
            }
            Err(e) => Self::error(&AppError::from(e)),
        }
    }

    pub fn not_located(missing: &NotLocated) -> Self {
        let mut body = json!({
            "ok": false,
            "status": ErrorKind::NotLocated.as_str(),
            "message": NOT_LOCATED_MESSAGE,
            "account": missing.identity,
            "probed": missing.probed,
        });
        if let Some(trace) = &missing.trace {
            body["trace"] = json!(trace);
        }
        Self {
            status: StatusCode::NOT_FOUND,
            body,
        }
    }

    pub fn error(err: &AppError) -> Self {
        let kind = err.kind();
        let (status, message) = match (kind, err) {
            (ErrorKind::Validation, AppError::Validation(message)) => {
                (StatusCode::BAD_REQUEST, message.clone())
            }
            (ErrorKind::NotFound, _) => (StatusCode::NOT_FOUND, NOT_FOUND_MESSAGE.to_string()),
            (ErrorKind::NotLocated, _) => {
                (StatusCode::NOT_FOUND, NOT_LOCATED_MESSAGE.to_string())
            }
            (ErrorKind::RateLimited, _) => (
                StatusCode::TOO_MANY_REQUESTS,
                RATE_LIMITED_MESSAGE.to_string(),
            ),
            (ErrorKind::ServerError, _) => {
                (StatusCode::BAD_GATEWAY, UNAVAILABLE_MESSAGE.to_string())
            }
            (ErrorKind::Timeout, _) => (
                StatusCode::SERVICE_UNAVAILABLE,
                UNAVAILABLE_MESSAGE.to_string(),
            ),
            _ => {
                error!("Request failed with {}: {}", kind.as_str(), err);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let mut body = json!({
            "ok": false,
            "status": kind.as_str(),
            "message": message,
        });
        if matches!(kind, ErrorKind::RateLimited | ErrorKind::Timeout | ErrorKind::ServerError) {
            body["retryable"] = json!(true);
        }
        if let Some(wait) = err.retry_after() {
            body["retryAfterSeconds"] = json!(wait.as_secs().max(1));
        }
        Self { status, body }
    }

    pub fn from_outcome<T: Serialize>(result: Result<Outcome<Report<T>>, AppError>) -> Self {
        match result {
            Ok(Outcome::Found(report)) => Self::ok(&report.data, &report.warnings),
            Ok(Outcome::NotLocated(missing)) => Self::not_located(&missing),
            Err(e) => Self::error(&e),
        }
    }

    pub fn from_report<T: Serialize>(result: Result<Report<T>, AppError>) -> Self {
        Self::from_outcome(result.map(Outcome::Found))
    }

    /// Success and the friendly empty states are not failures for the caller.
    pub fn is_success(&self) -> bool {
        self.status.is_success() || self.status == StatusCode::NOT_FOUND
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::PlayerIdentity;
    use crate::upstream::Platform;
    use std::time::Duration;

    #[test]
    fn test_success_carries_data_and_warnings() {
        let envelope = Envelope::from_report(Ok(Report::with_warnings(
            json!({"games": 3}),
            vec!["match X unavailable; omitted".to_string()],
        )));
        assert_eq!(envelope.status, StatusCode::OK);
        assert_eq!(envelope.body["ok"], true);
        assert_eq!(envelope.body["data"]["games"], 3);
        assert_eq!(envelope.body["warnings"][0], "match X unavailable; omitted");

        let envelope = Envelope::from_report(Ok(Report::complete(1)));
        assert!(envelope.body.get("warnings").is_none());
    }

    #[test]
    fn test_not_located_is_friendly() {
        let missing = NotLocated {
            identity: PlayerIdentity {
                game_name: "Example".into(),
                tag_line: "123".into(),
                global_id: "g-1".into(),
            },
            probed: vec![Platform::La1, Platform::Na1],
            trace: None,
        };
        let envelope = Envelope::from_outcome::<Value>(Ok(Outcome::NotLocated(missing)));
        assert_eq!(envelope.status, StatusCode::NOT_FOUND);
        assert_eq!(envelope.body["status"], "not_located");
        assert_eq!(envelope.body["account"]["globalId"], "g-1");
        assert_eq!(envelope.body["probed"], json!(["la1", "na1"]));
        assert!(envelope.is_success());
    }

    #[test]
    fn test_error_status_mapping() {
        let cases = [
            (AppError::validation("use the format 'Name#Tag'"), StatusCode::BAD_REQUEST),
            (AppError::api_not_found("u"), StatusCode::NOT_FOUND),
            (
                AppError::RetriesExhausted {
                    attempts: 4,
                    retry_after: Duration::from_secs(3),
                },
                StatusCode::TOO_MANY_REQUESTS,
            ),
            (AppError::api_server_error(503, "x", "u"), StatusCode::BAD_GATEWAY),
            (AppError::network_timeout("u"), StatusCode::SERVICE_UNAVAILABLE),
            (AppError::api_forbidden("u"), StatusCode::INTERNAL_SERVER_ERROR),
            (AppError::config_error("bad"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(Envelope::error(&err).status, status, "{err}");
        }
    }

    #[test]
    fn test_validation_message_is_corrective() {
        let envelope = Envelope::error(&AppError::validation("use the format 'Name#Tag'"));
        assert_eq!(envelope.body["message"], "use the format 'Name#Tag'");
        assert!(!envelope.is_success());
    }

    #[test]
    fn test_rate_limited_is_retryable() {
        let envelope = Envelope::error(&AppError::RetriesExhausted {
            attempts: 4,
            retry_after: Duration::from_secs(3),
        });
        assert_eq!(envelope.body["retryable"], true);
        assert_eq!(envelope.body["retryAfterSeconds"], 3);
    }

    #[test]
    fn test_internal_details_never_leak() {
        let err = AppError::api_unauthorized(
            "https://la1.api.riotgames.com/lol/summoner/v4/summoners/by-puuid/secret-puuid",
        );
        let envelope = Envelope::error(&err);
        let text = envelope.body.to_string();
        assert!(!text.contains("riotgames"));
        assert!(!text.contains("secret-puuid"));
        assert_eq!(envelope.body["status"], "unauthorized");
    }
}
