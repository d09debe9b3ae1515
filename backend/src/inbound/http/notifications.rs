//! Manual triggers for expiry notifications.
//!
//! ```text
//! POST /notifications/send
//! {"type":"license","days":"14","ccAdminIt":true,
//!  "additionalRecipients":"audit@example.com","additionalToRecipients":""}
//! GET  /notifications/test-warranty?cc=yes
//! ```

use actix_web::{HttpResponse, get, post, web};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::{Error, NotificationOptions, NotificationSummary, RecordKind};

use super::ApiResult;
use super::gate::{Authorized, Viewers};
use super::session::FlashLevel;
use super::state::HttpState;

/// Body of `POST /notifications/send`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendNotificationsRequest {
    /// `license` or `warranty`; defaults to warranty.
    #[serde(rename = "type")]
    pub kind: Option<String>,
    /// Window override as a number or digit string; anything else is ignored.
    pub days: Option<Value>,
    #[serde(default)]
    pub cc_admin_it: bool,
    #[serde(default = "default_assignees_only")]
    pub assignees_only: bool,
    /// Comma-separated CC addresses.
    #[serde(default)]
    pub additional_recipients: String,
    /// Comma-separated direct recipients, used when nothing is assigned.
    #[serde(default)]
    pub additional_to_recipients: String,
}

const fn default_assignees_only() -> bool {
    true
}

/// Query of the quick test triggers.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TestTriggerQuery {
    pub cc: Option<String>,
}

/// Defaults shown on the send form.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendForm {
    pub license_days_default: u32,
    pub warranty_days_default: u32,
    pub mail_available: bool,
}

/// Outcome of a manual run.
#[derive(Debug, Clone, Serialize)]
pub struct RunResponse {
    pub message: &'static str,
    pub summary: NotificationSummary,
}

fn split_addresses(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_owned)
        .collect()
}

fn parse_days(raw: Option<&Value>) -> Option<u32> {
    match raw? {
        Value::Number(number) => number.as_u64().and_then(|days| u32::try_from(days).ok()),
        Value::String(text) if !text.is_empty() && text.chars().all(|c| c.is_ascii_digit()) => {
            text.parse().ok()
        }
        _ => None,
    }
}

fn truthy(raw: Option<&str>) -> bool {
    raw.map(|value| value.trim().to_ascii_lowercase())
        .is_some_and(|value| matches!(value.as_str(), "1" | "true" | "yes" | "on"))
}

impl SendNotificationsRequest {
    fn record_kind(&self) -> Result<RecordKind, Error> {
        match self.kind.as_deref() {
            None => Ok(RecordKind::Warranty),
            Some(raw) => raw
                .parse()
                .map_err(|err: crate::domain::notifications::RecordKindParseError| {
                    Error::invalid_request(err.to_string())
                }),
        }
    }

    fn options(&self) -> NotificationOptions {
        NotificationOptions {
            window_days: parse_days(self.days.as_ref()),
            cc_admin_it: self.cc_admin_it,
            extra_cc: split_addresses(&self.additional_recipients),
            extra_to: split_addresses(&self.additional_to_recipients),
            assignees_only: self.assignees_only,
        }
    }
}

#[get("/notifications/send")]
pub async fn send_form(state: web::Data<HttpState>, _caller: Authorized<Viewers>) -> HttpResponse {
    let settings = state.notifier.settings();
    HttpResponse::Ok().json(SendForm {
        license_days_default: settings.license_window_days,
        warranty_days_default: settings.warranty_window_days,
        mail_available: state.notifier.mail_available(),
    })
}

/// Run one batch with the submitted options and return its summary.
#[post("/notifications/send")]
pub async fn send_notifications(
    state: web::Data<HttpState>,
    caller: Authorized<Viewers>,
    payload: web::Json<SendNotificationsRequest>,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let kind = payload
        .record_kind()
        .map_err(|err| session.flash_failure(err))?;
    let summary = state
        .notifier
        .notify(kind, &payload.options())
        .await
        .map_err(|err| session.flash_failure(err.into()))?;
    Ok(HttpResponse::Ok().json(summary))
}

async fn run_test_trigger(
    state: &HttpState,
    caller: &Authorized<Viewers>,
    kind: RecordKind,
    query: &TestTriggerQuery,
) -> ApiResult<HttpResponse> {
    let session = caller.session();
    let options = NotificationOptions {
        cc_admin_it: truthy(query.cc.as_deref()),
        ..NotificationOptions::default()
    };
    let summary = state
        .notifier
        .notify(kind, &options)
        .await
        .map_err(|err| session.flash_failure(err.into()))?;
    let message = kind.sent_message();
    session.flash(FlashLevel::Success, message)?;
    Ok(HttpResponse::Ok().json(RunResponse { message, summary }))
}

#[get("/notifications/test-license")]
pub async fn test_license(
    state: web::Data<HttpState>,
    caller: Authorized<Viewers>,
    query: web::Query<TestTriggerQuery>,
) -> ApiResult<HttpResponse> {
    run_test_trigger(&state, &caller, RecordKind::License, &query).await
}

#[get("/notifications/test-warranty")]
pub async fn test_warranty(
    state: web::Data<HttpState>,
    caller: Authorized<Viewers>,
    query: web::Query<TestTriggerQuery>,
) -> ApiResult<HttpResponse> {
    run_test_trigger(&state, &caller, RecordKind::Warranty, &query).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case(None, None)]
    #[case(Some(json!(14)), Some(14))]
    #[case(Some(json!("21")), Some(21))]
    #[case(Some(json!("")), None)]
    #[case(Some(json!("-3")), None)]
    #[case(Some(json!("ten")), None)]
    #[case(Some(json!(-3)), None)]
    fn days_accept_numbers_and_digit_strings(
        #[case] raw: Option<Value>,
        #[case] expected: Option<u32>,
    ) {
        assert_eq!(parse_days(raw.as_ref()), expected);
    }

    #[rstest]
    #[case(Some("1"), true)]
    #[case(Some("TRUE"), true)]
    #[case(Some("yes"), true)]
    #[case(Some("on"), true)]
    #[case(Some("0"), false)]
    #[case(Some("nope"), false)]
    #[case(None, false)]
    fn cc_flag_values(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(truthy(raw), expected);
    }

    #[test]
    fn request_defaults_to_warranty_and_assignees_only() {
        let request: SendNotificationsRequest =
            serde_json::from_value(json!({})).expect("empty body parses");
        assert_eq!(request.record_kind().expect("kind"), RecordKind::Warranty);
        let options = request.options();
        assert!(options.assignees_only);
        assert!(!options.cc_admin_it);
        assert_eq!(options.window_days, None);
    }

    #[test]
    fn recipient_lists_are_split_and_trimmed() {
        let request: SendNotificationsRequest = serde_json::from_value(json!({
            "type": "license",
            "additionalRecipients": " a@example.com, ,b@example.com ",
            "additionalToRecipients": "ops@example.com"
        }))
        .expect("body parses");
        assert_eq!(request.record_kind().expect("kind"), RecordKind::License);
        let options = request.options();
        assert_eq!(options.extra_cc, vec!["a@example.com", "b@example.com"]);
        assert_eq!(options.extra_to, vec!["ops@example.com"]);
    }

    #[test]
    fn unknown_type_is_rejected() {
        let request: SendNotificationsRequest =
            serde_json::from_value(json!({"type": "domain"})).expect("body parses");
        let err = request.record_kind().expect_err("unknown kind");
        assert_eq!(err.message(), "unknown notification type: domain");
    }
}
