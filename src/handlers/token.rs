use axum::Json;
use serde_json::{json, Value};

use crate::auth;
use crate::config;
use crate::error::ApiResult;

/// POST /jwt - sign whatever body the client submitted and return the token.
/// The signed payload is not validated; the gate only cares about the email
/// claim when an ownership check runs downstream.
pub async fn issue(Json(payload): Json<Value>) -> ApiResult<Json<Value>> {
    let secret = &config::config().security.jwt_secret;
    let token = auth::sign_claims(&payload, secret)?;
    Ok(Json(json!({ "token": token })))
}
