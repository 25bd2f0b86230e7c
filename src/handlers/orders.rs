use axum::{
    extract::{Extension, Path},
    Json,
};
use serde_json::Value;

use crate::database::collection::{Collection, DeleteResult, InsertOneResult};
use crate::error::ApiResult;
use crate::middleware::AuthUser;

/// POST /selectCurse/ - enroll in a class. The referenced class is not
/// checked for existence; referential integrity is advisory only.
pub async fn create(Json(payload): Json<Value>) -> ApiResult<Json<InsertOneResult>> {
    let orders = Collection::orders()?;
    Ok(Json(orders.insert_one(payload).await?))
}

/// GET /selectClass/:email - one user's enrollments
pub async fn list_by_user(
    Path(email): Path<String>,
    Extension(auth): Extension<AuthUser>,
) -> ApiResult<Json<Vec<Value>>> {
    auth.require_owner(&email)?;
    let orders = Collection::orders()?;
    Ok(Json(orders.find_eq("user", &email).await?))
}

/// DELETE /classDelete/:id - cancel an enrollment. The path name is
/// historical; classes themselves have no delete operation.
pub async fn delete(Path(id): Path<String>) -> ApiResult<Json<DeleteResult>> {
    let orders = Collection::orders()?;
    Ok(Json(orders.delete_one(&id).await?))
}
