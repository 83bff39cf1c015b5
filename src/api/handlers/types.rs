//! Request/response payloads shared between handlers and `OpenAPI` generation.
//!
//! Request fields are untyped JSON values so that a missing or wrongly typed
//! field reaches the validators and is reported by name instead of failing
//! JSON decoding.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateOngRequest {
    #[schema(value_type = Option<String>)]
    pub name: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub email: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub whatsapp: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub city: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub uf: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedOng {
    pub id: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateSessionRequest {
    #[schema(value_type = Option<String>)]
    pub id: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct SessionResponse {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct CreateIncidentRequest {
    #[schema(value_type = Option<String>)]
    pub title: Option<Value>,
    #[schema(value_type = Option<String>)]
    pub description: Option<Value>,
    #[schema(value_type = Option<f64>)]
    pub value: Option<Value>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CreatedIncident {
    pub id: i64,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PageQuery {
    /// Page number, starting at 1.
    #[param(value_type = Option<i64>, minimum = 1)]
    pub page: Option<String>,
}
