use super::{AppState, LookupFailure};
use crate::domain::Product;
use axum::{
    extract::{Path, State},
    Json,
};

/// GET /database/getItem/{id}
///
/// The department and optional member sale come back resolved inside the
/// product, so the caller never chases references.
pub async fn get_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Option<Product>>, LookupFailure> {
    let Ok(product_id) = id.parse::<i64>() else {
        return Ok(Json(None));
    };

    Ok(Json(state.database.get_product(product_id).await?))
}
