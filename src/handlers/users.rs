use axum::{
    extract::{Extension, Path},
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};

use crate::config;
use crate::database::collection::{Collection, UpdateResult};
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// POST /users - upsert-on-first-contact registration.
///
/// A repeat email gets the sentinel message back, not an error. The default
/// mode is a non-atomic check-then-insert; ATOMIC_REGISTRATION switches to
/// the race-free unique insert with identical responses.
pub async fn create(Json(payload): Json<Value>) -> ApiResult<Response> {
    let users = Collection::users()?;

    if config::config().registration.atomic {
        return match users.insert_one_unique("email", payload).await? {
            Some(result) => Ok(Json(result).into_response()),
            None => Ok(Json(json!({ "message": "user already exist" })).into_response()),
        };
    }

    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();
    if users.find_one_eq("email", &email).await?.is_some() {
        return Ok(Json(json!({ "message": "user already exist" })).into_response());
    }
    let result = users.insert_one(payload).await?;
    Ok(Json(result).into_response())
}

/// GET /allUsers - gate only, no role restriction
pub async fn list_all(Extension(_auth): Extension<AuthUser>) -> ApiResult<Json<Vec<Value>>> {
    let users = Collection::users()?;
    Ok(Json(users.find_all().await?))
}

async fn set_role(id: &str, role: &str) -> ApiResult<Json<UpdateResult>> {
    let users = Collection::users()?;
    Ok(Json(users.set_fields(id, json!({ "role": role })).await?))
}

/// PATCH /makeInstructor/:id
pub async fn make_instructor(Path(id): Path<String>) -> ApiResult<Json<UpdateResult>> {
    set_role(&id, "instructor").await
}

/// PATCH /makeAdmin/:id
pub async fn make_admin(Path(id): Path<String>) -> ApiResult<Json<UpdateResult>> {
    set_role(&id, "admin").await
}

/// PATCH /student/:id
pub async fn make_student(Path(id): Path<String>) -> ApiResult<Json<UpdateResult>> {
    set_role(&id, "student").await
}
