//! Request validators.
//!
//! Every inbound payload, header, query and path parameter is checked here
//! before a handler touches the store. A failed check returns a
//! `ValidationError` listing each offending field of one request segment.

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Query,
    },
    http::{header::AUTHORIZATION, HeaderMap},
    Json,
};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::num::{IntErrorKind, ParseIntError};
use utoipa::ToSchema;

use super::handlers::types::{CreateIncidentRequest, CreateOngRequest, CreateSessionRequest};

const WHATSAPP_MIN: usize = 10;
const WHATSAPP_MAX: usize = 11;
const UF_LEN: usize = 2;

/// Request segment a violation was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Body,
    Headers,
    Query,
    Params,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct FieldViolation {
    pub field: String,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub source: Source,
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    fn single(source: Source, field: &str, message: String) -> Self {
        Self {
            source,
            violations: vec![FieldViolation {
                field: field.to_string(),
                message,
            }],
        }
    }

    /// Names of the offending fields, in the order they were checked.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        self.violations.iter().map(|v| v.field.as_str()).collect()
    }

    /// Joined human readable message.
    #[must_use]
    pub fn message(&self) -> String {
        self.violations
            .iter()
            .map(|v| v.message.as_str())
            .collect::<Vec<_>>()
            .join(". ")
    }
}

/// Collects per-field violations for one segment.
struct Checker {
    source: Source,
    violations: Vec<FieldViolation>,
}

impl Checker {
    fn new(source: Source) -> Self {
        Self {
            source,
            violations: Vec::new(),
        }
    }

    fn fail(&mut self, field: &str, message: String) {
        self.violations.push(FieldViolation {
            field: field.to_string(),
            message,
        });
    }

    /// Required, non-blank string; returns the trimmed value.
    fn required(&mut self, field: &str, value: Option<&Value>) -> Option<String> {
        match value {
            None | Some(Value::Null) => {
                self.fail(field, format!("\"{field}\" is required"));
                None
            }
            Some(Value::String(text)) if text.trim().is_empty() => {
                self.fail(field, format!("\"{field}\" is not allowed to be empty"));
                None
            }
            Some(Value::String(text)) => Some(text.trim().to_string()),
            Some(_) => {
                self.fail(field, format!("\"{field}\" must be a string"));
                None
            }
        }
    }

    fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, ValidationError> {
        if !self.violations.is_empty() {
            return Err(ValidationError {
                source: self.source,
                violations: self.violations,
            });
        }
        value().ok_or_else(|| {
            ValidationError::single(self.source, "body", "invalid request".to_string())
        })
    }
}

/// Lightweight email sanity check.
pub fn valid_email(email: &str) -> bool {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").is_ok_and(|re| re.is_match(email))
}

/// Unwraps a JSON body, turning a malformed body into a `ValidationError`.
///
/// # Errors
/// Returns `ValidationError` on `Source::Body` if the body is not valid JSON
/// for `T`.
pub fn body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, ValidationError> {
    payload
        .map(|Json(value)| value)
        .map_err(|rejection| ValidationError::single(Source::Body, "body", rejection.body_text()))
}

/// Unwraps a query string, turning an undecodable one into a
/// `ValidationError`.
///
/// # Errors
/// Returns `ValidationError` on `Source::Query` if the query string does not
/// decode into `T`, for example when a parameter is repeated.
pub fn query<T>(payload: Result<Query<T>, QueryRejection>) -> Result<T, ValidationError> {
    payload
        .map(|Query(value)| value)
        .map_err(|rejection| ValidationError::single(Source::Query, "query", rejection.body_text()))
}

/// Validated registration fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OngFields {
    pub name: String,
    pub email: String,
    pub whatsapp: String,
    pub city: String,
    pub uf: String,
}

/// Checks an ONG registration payload, reporting every bad field at once.
///
/// # Errors
/// Returns `ValidationError` on `Source::Body`.
pub fn ong(payload: &CreateOngRequest) -> Result<OngFields, ValidationError> {
    let mut check = Checker::new(Source::Body);

    let name = check.required("name", payload.name.as_ref());

    let email = check
        .required("email", payload.email.as_ref())
        .filter(|email| {
            let ok = valid_email(email);
            if !ok {
                check.fail("email", "\"email\" must be a valid email".to_string());
            }
            ok
        });

    let whatsapp = check
        .required("whatsapp", payload.whatsapp.as_ref())
        .filter(|whatsapp| {
            let len = whatsapp.chars().count();
            if len < WHATSAPP_MIN {
                check.fail(
                    "whatsapp",
                    format!("\"whatsapp\" length must be at least {WHATSAPP_MIN} characters long"),
                );
                false
            } else if len > WHATSAPP_MAX {
                check.fail(
                    "whatsapp",
                    format!(
                        "\"whatsapp\" length must be less than or equal to {WHATSAPP_MAX} characters long"
                    ),
                );
                false
            } else if !whatsapp.chars().all(|c| c.is_ascii_digit()) {
                check.fail("whatsapp", "\"whatsapp\" must only contain digits".to_string());
                false
            } else {
                true
            }
        });

    let city = check.required("city", payload.city.as_ref());

    let uf = check
        .required("uf", payload.uf.as_ref())
        .filter(|uf| {
            let ok = uf.chars().count() == UF_LEN;
            if !ok {
                check.fail(
                    "uf",
                    format!("\"uf\" length must be {UF_LEN} characters long"),
                );
            }
            ok
        })
        .map(|uf| uf.to_uppercase());

    check.finish(|| {
        Some(OngFields {
            name: name?,
            email: email?,
            whatsapp: whatsapp?,
            city: city?,
            uf: uf?,
        })
    })
}

/// Checks a session payload and returns the submitted identifier.
///
/// # Errors
/// Returns `ValidationError` on `Source::Body`.
pub fn session(payload: &CreateSessionRequest) -> Result<String, ValidationError> {
    let mut check = Checker::new(Source::Body);
    let id = check.required("id", payload.id.as_ref());
    check.finish(|| id)
}

/// Validated incident fields.
#[derive(Debug, Clone, PartialEq)]
pub struct IncidentFields {
    pub title: String,
    pub description: String,
    pub value: f64,
}

/// Checks an incident payload. `value` may be a JSON number or a numeric
/// string.
///
/// # Errors
/// Returns `ValidationError` on `Source::Body`.
pub fn incident(payload: &CreateIncidentRequest) -> Result<IncidentFields, ValidationError> {
    let mut check = Checker::new(Source::Body);

    let title = check.required("title", payload.title.as_ref());
    let description = check.required("description", payload.description.as_ref());

    let value = match &payload.value {
        None | Some(Value::Null) => {
            check.fail("value", "\"value\" is required".to_string());
            None
        }
        Some(raw) => {
            let parsed = match raw {
                Value::Number(number) => number.as_f64(),
                Value::String(text) => text.trim().parse::<f64>().ok(),
                _ => None,
            }
            .filter(|value| value.is_finite());

            if parsed.is_none() {
                check.fail("value", "\"value\" must be a number".to_string());
            }
            parsed
        }
    };

    check.finish(|| {
        Some(IncidentFields {
            title: title?,
            description: description?,
            value: value?,
        })
    })
}

/// Returns the bearer identifier from the `Authorization` header.
///
/// Only presence is checked; whether it names an ONG is up to the handler.
///
/// # Errors
/// Returns `ValidationError` on `Source::Headers` when the header is missing,
/// blank or not valid ASCII.
pub fn authorization(headers: &HeaderMap) -> Result<String, ValidationError> {
    let Some(value) = headers.get(AUTHORIZATION) else {
        return Err(ValidationError::single(
            Source::Headers,
            "authorization",
            "\"authorization\" is required".to_string(),
        ));
    };

    match value.to_str().map(str::trim) {
        Ok("") => Err(ValidationError::single(
            Source::Headers,
            "authorization",
            "\"authorization\" is not allowed to be empty".to_string(),
        )),
        Ok(value) => Ok(value.to_string()),
        Err(_) => Err(ValidationError::single(
            Source::Headers,
            "authorization",
            "\"authorization\" must be a string".to_string(),
        )),
    }
}

/// Parses the optional `page` query value, defaulting to 1.
///
/// # Errors
/// Returns `ValidationError` on `Source::Query` unless the value is a positive
/// integer.
pub fn page(raw: Option<&str>) -> Result<i64, ValidationError> {
    let Some(raw) = raw else {
        return Ok(1);
    };

    match raw.trim().parse::<i64>() {
        Ok(page) if page >= 1 => Ok(page),
        Ok(_) => Err(ValidationError::single(
            Source::Query,
            "page",
            "\"page\" must be greater than or equal to 1".to_string(),
        )),
        Err(err) if overflowed(&err) => Err(ValidationError::single(
            Source::Query,
            "page",
            "\"page\" must be a safe number".to_string(),
        )),
        Err(_) => Err(ValidationError::single(
            Source::Query,
            "page",
            "\"page\" must be a number".to_string(),
        )),
    }
}

/// Parses the `id` path parameter of an incident.
///
/// # Errors
/// Returns `ValidationError` on `Source::Params` unless the value is an
/// integer.
pub fn incident_id(raw: &str) -> Result<i64, ValidationError> {
    raw.trim().parse::<i64>().map_err(|err| {
        let message = if overflowed(&err) {
            "\"id\" must be a safe number"
        } else {
            "\"id\" must be a number"
        };
        ValidationError::single(Source::Params, "id", message.to_string())
    })
}

fn overflowed(err: &ParseIntError) -> bool {
    matches!(
        err.kind(),
        IntErrorKind::PosOverflow | IntErrorKind::NegOverflow
    )
}
