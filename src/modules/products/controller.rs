use axum::response::Response;
use serde_json::Value;
use uuid::Uuid;

use crate::AppState;
use crate::modules::api::{
    error::{ApiError, ApiResult},
    payload::{created, ok, parse, parse_valid, success, IdPayload},
};
use crate::modules::products::{
    crud::ProductCrud,
    model::Product,
    schema::{ProductInput, ProductResponse},
};

fn to_response(product: Product) -> ApiResult<ProductResponse> {
    ProductResponse::try_from(product).map_err(ApiError::Internal)
}

pub async fn get_products(state: &AppState) -> ApiResult<Response> {
    let products = ProductCrud::new(state.db.clone()).list().await?;

    // A row with an unknown category is skipped rather than failing the whole listing
    let responses: Vec<ProductResponse> = products
        .into_iter()
        .filter_map(|p| {
            let id = p.id.clone();
            ProductResponse::try_from(p)
                .map_err(|e| tracing::warn!(product_id = %id, error = %e, "skipping product"))
                .ok()
        })
        .collect();

    Ok(ok(responses))
}

pub async fn get_product(state: &AppState, payload: Value) -> ApiResult<Response> {
    let IdPayload { id } = parse(payload)?;
    let product = ProductCrud::new(state.db.clone())
        .find_by_id(&id)
        .await?
        .ok_or(ApiError::NotFound("Product"))?;

    Ok(ok(to_response(product)?))
}

pub async fn create_product(state: &AppState, payload: Value) -> ApiResult<Response> {
    let input: ProductInput = parse_valid(payload)?;
    let crud = ProductCrud::new(state.db.clone());
    let id = Uuid::new_v4().to_string();

    crud.create(&id, &input).await?;
    tracing::info!(product_id = %id, "product created");

    let product = crud.find_by_id(&id).await?.ok_or(ApiError::NotFound("Product"))?;
    Ok(created(to_response(product)?))
}

pub async fn update_product(state: &AppState, payload: Value) -> ApiResult<Response> {
    let input: ProductInput = parse_valid(payload)?;
    let id = input
        .id
        .clone()
        .ok_or_else(|| ApiError::BadRequest("Product id is required".into()))?;

    let crud = ProductCrud::new(state.db.clone());
    crud.find_by_id(&id).await?.ok_or(ApiError::NotFound("Product"))?;
    crud.update(&id, &input).await?;

    let product = crud.find_by_id(&id).await?.ok_or(ApiError::NotFound("Product"))?;
    Ok(ok(to_response(product)?))
}

pub async fn delete_product(state: &AppState, payload: Value) -> ApiResult<Response> {
    let IdPayload { id } = parse(payload)?;

    if !ProductCrud::new(state.db.clone()).delete(&id).await? {
        return Err(ApiError::NotFound("Product"));
    }

    tracing::info!(product_id = %id, "product deleted");
    Ok(success())
}
