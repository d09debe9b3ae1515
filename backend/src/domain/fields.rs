//! Normalisation of optional form fields shared by the inventory drafts.

use chrono::NaiveDate;

use super::Error;

/// Date format used on the wire and in exports.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Trim a free-text field; blank input becomes `None`.
pub fn optional_text(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}

/// Trim a required free-text field, rejecting blank input with `message`.
pub fn required_text(raw: &str, message: &str) -> Result<String, Error> {
    optional_text(Some(raw)).ok_or_else(|| Error::invalid_request(message))
}

/// Parse an optional `YYYY-MM-DD` date; blank input becomes `None`.
pub fn optional_date(field: &str, raw: Option<&str>) -> Result<Option<NaiveDate>, Error> {
    match raw.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => NaiveDate::parse_from_str(value, DATE_FORMAT)
            .map(Some)
            .map_err(|_| {
                Error::invalid_request(format!("Invalid {field}; expected YYYY-MM-DD"))
                    .with_details(serde_json::json!({ "field": field, "value": value }))
            }),
    }
}

/// Render an optional date as `YYYY-MM-DD`, or an empty string.
pub fn format_optional_date(date: Option<NaiveDate>) -> String {
    date.map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("   "), None)]
    #[case(Some(" Dell "), Some("Dell"))]
    fn optional_text_trims(#[case] raw: Option<&str>, #[case] expected: Option<&str>) {
        assert_eq!(optional_text(raw).as_deref(), expected);
    }

    #[rstest]
    #[case(None, None)]
    #[case(Some(""), None)]
    #[case(Some("2025-02-28"), NaiveDate::from_ymd_opt(2025, 2, 28))]
    fn optional_date_accepts_iso_dates(
        #[case] raw: Option<&str>,
        #[case] expected: Option<NaiveDate>,
    ) {
        assert_eq!(optional_date("expiry_date", raw).expect("valid"), expected);
    }

    #[rstest]
    #[case("28/02/2025")]
    #[case("2025-02-30")]
    #[case("tomorrow")]
    fn optional_date_rejects_other_formats(#[case] raw: &str) {
        let err = optional_date("expiry_date", Some(raw)).expect_err("invalid date");
        assert_eq!(err.message(), "Invalid expiry_date; expected YYYY-MM-DD");
    }

    #[test]
    fn missing_dates_render_empty() {
        assert_eq!(format_optional_date(None), "");
        assert_eq!(
            format_optional_date(NaiveDate::from_ymd_opt(2024, 1, 5)),
            "2024-01-05"
        );
    }
}
