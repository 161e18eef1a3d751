//! Request pipeline: bearer token attachment and error normalization

use super::error::{ApiError, ErrorKind, TransportError};
use crate::messages::Locale;
use reqwest::header::{AUTHORIZATION, HeaderValue};
use reqwest::Request;
use serde_json::Value;

/// Path of the login endpoint
pub const LOGIN_PATH: &str = "/api/v1/auth/login/";
/// Path of the token refresh endpoint
pub const REFRESH_PATH: &str = "/api/v1/auth/refresh/";

/// Whether `path` targets the login or refresh endpoint. Trailing slashes
/// are ignored on both sides.
pub fn is_token_endpoint(path: &str) -> bool {
    let path = path.trim_end_matches('/');
    [LOGIN_PATH, REFRESH_PATH]
        .iter()
        .any(|endpoint| path.ends_with(endpoint.trim_end_matches('/')))
}

/// Add `Authorization: Bearer <token>` to `request`.
///
/// Requests to the token endpoints and requests made without a token pass
/// through untouched. Other headers are never modified.
pub fn attach_token(request: &mut Request, token: Option<&str>) {
    if is_token_endpoint(request.url().path()) {
        return;
    }

    let Some(token) = token else {
        return;
    };

    match HeaderValue::try_from(format!("Bearer {token}")) {
        Ok(mut value) => {
            value.set_sensitive(true);
            request.headers_mut().insert(AUTHORIZATION, value);
        }
        Err(e) => warn!("Stored access token is not a valid header value: {}", e),
    }
}

/// Turn a transport failure into the error shown to users
pub fn normalize(cause: TransportError, locale: Locale) -> ApiError {
    let kind = ErrorKind::classify(&cause);
    let message = match kind {
        ErrorKind::Validation => cause
            .body()
            .and_then(field_messages)
            .unwrap_or_else(|| locale.invalid_request().to_string()),
        ErrorKind::Unauthorized => locale.unauthorized().to_string(),
        ErrorKind::Forbidden => locale.forbidden().to_string(),
        ErrorKind::NotFound => locale.not_found().to_string(),
        ErrorKind::Server => locale.server_error().to_string(),
        ErrorKind::Transport => format!("Error {}: {}", cause.status_code(), cause),
        ErrorKind::Other => match &cause {
            TransportError::Status { status, .. } => format!(
                "Error {}: {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("Unknown status")
            ),
            _ => format!("Error {}: {}", cause.status_code(), cause),
        },
    };

    ApiError::new(kind, message, cause)
}

/// Render a `{"field": ["msg", ...]}` body as `field: msg, ...` lines.
///
/// Returns `None` when the body is not a JSON object, has no entries, or
/// holds a value that is neither a scalar nor a list of scalars.
fn field_messages(body: &str) -> Option<String> {
    let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) else {
        return None;
    };

    let lines = fields
        .iter()
        .map(|(field, value)| render_value(value).map(|text| format!("{field}: {text}")))
        .collect::<Option<Vec<String>>>()?;

    if lines.is_empty() {
        None
    } else {
        Some(lines.join("\n"))
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Array(items) => items
            .iter()
            .map(render_scalar)
            .collect::<Option<Vec<_>>>()
            .map(|texts| texts.join(", ")),
        scalar => render_scalar(scalar),
    }
}

fn render_scalar(value: &Value) -> Option<String> {
    match value {
        Value::String(text) => Some(text.clone()),
        Value::Number(number) => Some(number.to_string()),
        Value::Bool(flag) => Some(flag.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::CONTENT_TYPE;
    use reqwest::{Method, StatusCode, Url};

    fn request(path: &str) -> Request {
        let url = Url::parse("http://localhost:8000").unwrap().join(path).unwrap();
        Request::new(Method::GET, url)
    }

    fn status(code: u16, body: &str) -> TransportError {
        TransportError::Status {
            status: StatusCode::from_u16(code).unwrap(),
            body: body.to_string(),
        }
    }

    #[test]
    fn attaches_bearer_token() {
        let mut req = request("/api/v1/auth/persons/");
        attach_token(&mut req, Some("test-token-123"));
        assert_eq!(
            req.headers().get(AUTHORIZATION).unwrap(),
            "Bearer test-token-123"
        );
        assert!(req.headers().get(AUTHORIZATION).unwrap().is_sensitive());
    }

    #[test]
    fn no_token_no_header() {
        let mut req = request("/api/v1/auth/persons/");
        attach_token(&mut req, None);
        assert!(req.headers().get(AUTHORIZATION).is_none());
    }

    #[test]
    fn token_endpoints_are_skipped() {
        for path in [
            "/api/v1/auth/login/",
            "/api/v1/auth/login",
            "/api/v1/auth/refresh/",
            "/api/v1/auth/refresh",
        ] {
            let mut req = request(path);
            attach_token(&mut req, Some("test-token-123"));
            assert!(req.headers().get(AUTHORIZATION).is_none(), "{path}");
        }
    }

    #[test]
    fn other_auth_paths_get_the_token() {
        let mut req = request("/api/v1/auth/users");
        attach_token(&mut req, Some("test-token-123"));
        assert!(req.headers().get(AUTHORIZATION).is_some());
    }

    #[test]
    fn existing_headers_are_preserved() {
        let mut req = request("/api/v1/auth/persons/");
        req.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        req.headers_mut()
            .insert("x-custom-header", HeaderValue::from_static("custom-value"));

        attach_token(&mut req, Some("test-token-123"));

        assert_eq!(req.headers().get(CONTENT_TYPE).unwrap(), "application/json");
        assert_eq!(req.headers().get("x-custom-header").unwrap(), "custom-value");
        assert_eq!(req.headers().len(), 3);
    }

    #[test]
    fn validation_body_becomes_field_lines() {
        let err = normalize(status(400, r#"{"email": ["Invalid email"]}"#), Locale::En);
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.message(), "email: Invalid email");
    }

    #[test]
    fn validation_fields_keep_server_order() {
        let body = r#"{"sku": ["Too short", "Already taken"], "name": "Required"}"#;
        let err = normalize(status(400, body), Locale::En);
        assert_eq!(err.message(), "sku: Too short, Already taken\nname: Required");
    }

    #[test]
    fn unparseable_validation_body_falls_back() {
        for body in ["Validation error", "", "{}", "[\"x\"]"] {
            let err = normalize(status(400, body), Locale::En);
            assert_eq!(err.message(), "Invalid request. Please check the data.", "{body:?}");
        }
    }

    #[test]
    fn nested_or_null_values_fall_back() {
        for body in [
            r#"{"owner": {"id": ["bad"]}, "x": null}"#,
            r#"{"name": ["ok"], "x": null}"#,
            r#"{"tags": [["nested"]]}"#,
        ] {
            let err = normalize(status(400, body), Locale::En);
            assert_eq!(err.message(), "Invalid request. Please check the data.", "{body}");
        }
    }

    #[test]
    fn scalar_values_are_rendered_as_is() {
        let body = r#"{"price": [1, "must be positive"], "active": false}"#;
        let err = normalize(status(400, body), Locale::En);
        assert_eq!(err.message(), "price: 1, must be positive\nactive: false");
    }

    #[test]
    fn fixed_messages_per_status() {
        assert_eq!(
            normalize(status(401, ""), Locale::En).message(),
            "Unauthorized. Please sign in."
        );
        assert_eq!(
            normalize(status(403, ""), Locale::En).message(),
            "You do not have permission to perform this action."
        );
        assert_eq!(normalize(status(404, ""), Locale::En).message(), "Resource not found.");
        assert_eq!(
            normalize(status(500, "Server error"), Locale::En).message(),
            "Internal server error. Please try again later."
        );
    }

    #[test]
    fn spanish_messages() {
        assert_eq!(
            normalize(status(404, ""), Locale::Es).message(),
            "Recurso no encontrado."
        );
        assert_eq!(
            normalize(status(401, ""), Locale::Es).message(),
            "No autorizado. Por favor inicia sesión."
        );
    }

    #[test]
    fn other_statuses_echo_the_code() {
        let err = normalize(status(418, ""), Locale::En);
        assert_eq!(err.kind(), ErrorKind::Other);
        assert_eq!(err.status(), 418);
        assert_eq!(err.message(), "Error 418: I'm a teapot");
    }

    #[test]
    fn decode_failures_keep_the_status() {
        let source = serde_json::from_str::<Value>("not json").unwrap_err();
        let err = normalize(
            TransportError::Decode {
                status: StatusCode::OK,
                source,
            },
            Locale::En,
        );
        assert_eq!(err.status(), 200);
        assert!(err.message().starts_with("Error 200: "));
    }
}
