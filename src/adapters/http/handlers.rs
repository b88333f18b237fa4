//! Route handlers.
//!
//! Each handler decodes its input, calls one use case and serializes the
//! result. Failures become `ApiError`.

use std::sync::Arc;

use axum::Json;
use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::extract::{Path, State};

use super::dto::{
  BalanceResponse, BalancesRequest, BalancesResponse, HolderActivityRow, HolderRow, TokenInfoResponse,
  TopHoldersResponse, holder_activity_rows, holder_rows,
};
use super::error::ApiError;
use crate::usecases::{BalanceService, HolderSource, TokenInfoService, TopHoldersService};

/// Services shared by every handler.
#[derive(Clone)]
pub struct AppState {
  pub balances: Arc<BalanceService>,
  pub token_info: Arc<TokenInfoService>,
  pub top_holders: Arc<TopHoldersService>,
}

type ApiResult<T> = Result<Json<T>, ApiError>;

pub async fn balance(
  State(state): State<AppState>,
  Path(address): Path<String>,
) -> ApiResult<BalanceResponse> {
  let record = state.balances.balance(&address).await?;
  Ok(Json(record.into()))
}

pub async fn balances(
  State(state): State<AppState>,
  body: Result<Json<BalancesRequest>, JsonRejection>,
) -> ApiResult<BalancesResponse> {
  let Json(request) = body?;
  let looked_up: Vec<Option<f64>> = state
    .balances
    .balances(&request.candidates())
    .await
    .into_iter()
    .map(|amount| amount.map(|a| a.to_f64()))
    .collect();
  let balances = request.align(looked_up);

  Ok(Json(BalancesResponse { balances }))
}

pub async fn token_info(
  State(state): State<AppState>,
  Path(address): Path<String>,
) -> ApiResult<TokenInfoResponse> {
  let meta = state.token_info.token_info(&address).await?;
  Ok(Json(meta.into()))
}

async fn ranking(
  state: &AppState,
  source: HolderSource,
  token: Option<&str>,
  top_n: i64,
) -> ApiResult<TopHoldersResponse<HolderRow>> {
  let holders = state.top_holders.top_holders(source, token, top_n).await?;
  Ok(Json(TopHoldersResponse {
    top_holders: holder_rows(holders),
  }))
}

pub async fn top(
  State(state): State<AppState>,
  top_n: Result<Path<i64>, PathRejection>,
) -> ApiResult<TopHoldersResponse<HolderRow>> {
  let Path(top_n) = top_n?;
  ranking(&state, HolderSource::Graph, None, top_n).await
}

pub async fn top_explorer(
  State(state): State<AppState>,
  top_n: Result<Path<i64>, PathRejection>,
) -> ApiResult<TopHoldersResponse<HolderRow>> {
  let Path(top_n) = top_n?;
  ranking(&state, HolderSource::Explorer, None, top_n).await
}

pub async fn top_for_token(
  State(state): State<AppState>,
  params: Result<Path<(String, i64)>, PathRejection>,
) -> ApiResult<TopHoldersResponse<HolderRow>> {
  let Path((token, top_n)) = params?;
  ranking(&state, HolderSource::Graph, Some(&token), top_n).await
}

pub async fn top_with_tx(
  State(state): State<AppState>,
  top_n: Result<Path<i64>, PathRejection>,
) -> ApiResult<TopHoldersResponse<HolderActivityRow>> {
  let Path(top_n) = top_n?;
  let holders = state
    .top_holders
    .top_holders(HolderSource::GraphWithActivity, None, top_n)
    .await?;

  Ok(Json(TopHoldersResponse {
    top_holders: holder_activity_rows(holders),
  }))
}
