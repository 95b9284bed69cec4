//! Envelope entry points for the purchase functions.

use atrium_core::{AppError, RequestEnvelope};
use atrium_models::{
    CreatePurchaseDto, ListPurchasesQuery, MessageResponse, Purchase, PurchaseKey, PurchaseList,
    RefreshPurchasesDto, RefreshPurchasesResponse,
};

use super::service::PurchaseService;
use crate::state::AppState;

pub async fn create_purchase(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<Purchase, AppError> {
    let dto: CreatePurchaseDto = request.input()?;
    PurchaseService::create_purchase(state, request.bearer_token().as_deref(), dto).await
}

pub async fn list_purchases(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<PurchaseList, AppError> {
    let query: ListPurchasesQuery = request.input()?;
    PurchaseService::list_purchases(state, request.bearer_token().as_deref(), query).await
}

pub async fn update_purchases(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<RefreshPurchasesResponse, AppError> {
    let dto: RefreshPurchasesDto = request.input()?;
    PurchaseService::refresh_purchases(state, request.bearer_token().as_deref(), dto).await
}

pub async fn delete_purchase(
    state: &AppState,
    request: &RequestEnvelope,
) -> Result<MessageResponse, AppError> {
    let key: PurchaseKey = request.input()?;
    PurchaseService::delete_purchase(state, request.bearer_token().as_deref(), key).await
}
