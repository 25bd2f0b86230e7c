use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::{json, Value};

use crate::database::collection::{Collection, InsertOneResult, UpdateResult};
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// GET /classes - public catalog, no filter
pub async fn list_all() -> ApiResult<Json<Vec<Value>>> {
    let classes = Collection::classes()?;
    Ok(Json(classes.find_all().await?))
}

/// GET /popularAllClass - public catalog sorted by price descending
pub async fn list_popular() -> ApiResult<Json<Vec<Value>>> {
    let classes = Collection::classes()?;
    Ok(Json(classes.find_all_sorted_desc("price").await?))
}

/// GET /classes/:email - classes owned by one instructor
pub async fn list_by_instructor(
    Path(email): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Value>>> {
    auth.require_owner(&email)?;
    let classes = Collection::classes()?;
    Ok(Json(classes.find_eq("userEmail", &email).await?))
}

/// GET /allClasses - admin view. Gate only; any authenticated caller passes.
pub async fn list_all_admin(
    Extension(_auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Value>>> {
    let classes = Collection::classes()?;
    Ok(Json(classes.find_all().await?))
}

/// POST /classes - create from the submitted record, no required fields
pub async fn create(Json(payload): Json<Value>) -> ApiResult<Json<InsertOneResult>> {
    let classes = Collection::classes()?;
    Ok(Json(classes.insert_one(payload).await?))
}

/// PUT /updateInsData/:id - replace the four mutable display fields
pub async fn update_details(
    Path(id): Path<String>,
    Json(payload): Json<Value>,
) -> ApiResult<Json<UpdateResult>> {
    let fields = json!({
        "courseName": payload.get("courseName").cloned().unwrap_or(Value::Null),
        "img": payload.get("img").cloned().unwrap_or(Value::Null),
        "availableSeats": payload.get("availableSeats").cloned().unwrap_or(Value::Null),
        "price": payload.get("price").cloned().unwrap_or(Value::Null),
    });
    let classes = Collection::classes()?;
    Ok(Json(classes.set_fields(&id, fields).await?))
}

/// PATCH /approved/:id - unconditional set; re-approving succeeds silently
pub async fn approve(Path(id): Path<String>) -> ApiResult<Json<UpdateResult>> {
    let classes = Collection::classes()?;
    Ok(Json(classes.set_fields(&id, json!({ "status": "approved" })).await?))
}

/// PATCH /deny/:id - unconditional set, last write wins
pub async fn deny(Path(id): Path<String>) -> ApiResult<Json<UpdateResult>> {
    let classes = Collection::classes()?;
    Ok(Json(classes.set_fields(&id, json!({ "status": "deny" })).await?))
}
