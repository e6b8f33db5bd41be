//! Handlers for `/camps` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/camps` | All camps |
//! | `GET`    | `/camps/{id}` | Optional `?includeSpeakers=true` |
//! | `POST`   | `/camps` | Body: [`CampModel`]; 201 + `Location` |
//! | `PUT`/`PATCH` | `/camps/{id}` | Body: [`CampPatchModel`]; partial update |
//! | `DELETE` | `/camps/{id}` | 200, empty body |

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
};
use camp_core::{
  camp::{CampId, NewCamp},
  repository::{CampRepository, UnitOfWork},
};
use serde::Deserialize;
use tracing::info;

use crate::{
  ApiState, commit_work,
  error::{ApiError, Operation},
  extract::{ApiJson, ApiPath, ApiQuery, lenient_bool},
  models::{CampModel, CampPatchModel},
};

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /camps`
pub async fn list<R>(State(state): State<ApiState<R>>) -> Result<Json<Vec<CampModel>>, ApiError>
where
  R: CampRepository,
{
  let camps = state
    .repo
    .list_camps()
    .await
    .map_err(|e| ApiError::store(Operation::ListCamps, e))?;
  Ok(Json(camps.iter().map(|c| state.mapper.to_camp_model(c)).collect()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct GetParams {
  #[serde(
    default,
    rename = "includeSpeakers",
    alias = "include_speakers",
    deserialize_with = "lenient_bool"
  )]
  pub include_speakers: bool,
}

/// `GET /camps/{id}[?includeSpeakers=true]`
pub async fn get_one<R>(
  State(state): State<ApiState<R>>,
  ApiPath(id): ApiPath<CampId>,
  ApiQuery(params): ApiQuery<GetParams>,
) -> Result<Json<CampModel>, ApiError>
where
  R: CampRepository,
{
  let found = if params.include_speakers {
    state.repo.get_camp_with_speakers(id).await
  } else {
    state.repo.get_camp(id).await
  };

  let camp = found
    .map_err(|e| ApiError::store(Operation::GetCamp, e))?
    .ok_or_else(|| ApiError::NotFound(format!("Camp {id} not found.")))?;
  Ok(Json(state.mapper.to_camp_model(&camp)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /camps` — returns 201, a `Location` header, and the stored camp.
pub async fn create<R>(
  State(state): State<ApiState<R>>,
  ApiJson(body): ApiJson<CampModel>,
) -> Result<impl IntoResponse, ApiError>
where
  R: CampRepository,
{
  info!(moniker = %body.moniker, "creating new camp");

  let new_camp = NewCamp::from(body);
  new_camp.validate()?;

  let mut work = UnitOfWork::new();
  let pending = work.add_camp(new_camp.clone());
  let commit = commit_work(state.repo.as_ref(), work, Operation::CreateCamp).await?;
  let id = commit
    .assigned_id(pending)
    .ok_or(ApiError::NotPersisted { op: Operation::CreateCamp })?;

  let camp = new_camp.into_camp(id);
  Ok((
    StatusCode::CREATED,
    [(header::LOCATION, state.mapper.camp_url(id))],
    Json(state.mapper.to_camp_model(&camp)),
  ))
}

// ─── Partial update ───────────────────────────────────────────────────────────

/// `PUT|PATCH /camps/{id}` — only provided fields are applied.
pub async fn update<R>(
  State(state): State<ApiState<R>>,
  ApiPath(id): ApiPath<CampId>,
  ApiJson(body): ApiJson<CampPatchModel>,
) -> Result<Json<CampModel>, ApiError>
where
  R: CampRepository,
{
  let mut camp = state
    .repo
    .get_camp(id)
    .await
    .map_err(|e| ApiError::store(Operation::UpdateCamp, e))?
    .ok_or_else(|| ApiError::NotFound(format!("Could not find camp id {id}")))?;

  camp.apply_patch(body.into());

  let mut work = UnitOfWork::new();
  work.update_camp(&camp);
  commit_work(state.repo.as_ref(), work, Operation::UpdateCamp).await?;

  Ok(Json(state.mapper.to_camp_model(&camp)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /camps/{id}` — speakers of the camp are removed with it.
pub async fn delete<R>(
  State(state): State<ApiState<R>>,
  ApiPath(id): ApiPath<CampId>,
) -> Result<StatusCode, ApiError>
where
  R: CampRepository,
{
  let camp = state
    .repo
    .get_camp(id)
    .await
    .map_err(|e| ApiError::store(Operation::DeleteCamp, e))?
    .ok_or_else(|| ApiError::NotFound(format!("Could not find camp id {id}")))?;

  let mut work = UnitOfWork::new();
  work.delete_camp(&camp);
  commit_work(state.repo.as_ref(), work, Operation::DeleteCamp).await?;

  Ok(StatusCode::OK)
}
