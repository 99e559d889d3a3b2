//! Shared validation helpers for inbound HTTP adapters.

use serde_json::json;

use crate::domain::{CarId, Error, Page, PageValidationError};

/// Error for a field the request must provide but did not.
pub(crate) fn missing_field_error(field: &'static str) -> Error {
    Error::invalid_request(format!("{field} is required")).with_details(json!({
        "field": field,
        "code": "missing_field",
    }))
}

/// Parse the car id path segment.
pub(crate) fn parse_car_id(raw: &str) -> Result<CarId, Error> {
    CarId::new(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "id",
            "value": raw,
            "code": "invalid_id",
        }))
    })
}

/// Build a paging window from optional query values.
pub(crate) fn parse_page(skip: Option<i64>, limit: Option<i64>) -> Result<Page, Error> {
    Page::new(skip.unwrap_or(0), limit.unwrap_or(Page::DEFAULT_LIMIT)).map_err(|err| {
        let field = match err {
            PageValidationError::NegativeSkip => "skip",
            PageValidationError::NonPositiveLimit => "limit",
        };
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": field,
            "code": "invalid_paging",
        }))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[test]
    fn missing_field_carries_field_details() {
        let err = missing_field_error("model");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
        assert_eq!(err.details().expect("details")["field"], "model");
    }

    #[test]
    fn page_defaults_apply_when_query_is_empty() {
        let page = parse_page(None, None).expect("page");
        assert_eq!(page.skip(), 0);
        assert_eq!(page.limit(), Page::DEFAULT_LIMIT);
    }

    #[test]
    fn blank_id_is_rejected() {
        let err = parse_car_id("  ").expect_err("blank id");
        assert_eq!(err.details().expect("details")["code"], "invalid_id");
    }
}
