//! Handlers for `/camps/{moniker}/speakers` endpoints.
//!
//! Every handler that addresses a single speaker first checks that the
//! speaker belongs to the camp named in the path. A speaker that exists under
//! another camp is a `400`, not a `404`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `GET`    | `/camps/{moniker}/speakers` | Speakers of the camp |
//! | `GET`    | `/camps/{moniker}/speakers/{id}` | Scope-checked |
//! | `POST`   | `/camps/{moniker}/speakers` | Body: [`SpeakerModel`]; 201 + `Location` |
//! | `PUT`/`PATCH` | `/camps/{moniker}/speakers/{id}` | Full overwrite; scope-checked |
//! | `DELETE` | `/camps/{moniker}/speakers/{id}` | Scope-checked |

use axum::{
  Json,
  extract::State,
  http::{StatusCode, header},
  response::IntoResponse,
};
use camp_core::{
  repository::{CampRepository, UnitOfWork},
  speaker::{CampRef, Speaker, SpeakerId, SpeakerProfile},
};
use tracing::info;

use crate::{
  ApiState, commit_work,
  error::{ApiError, Operation},
  extract::{ApiJson, ApiPath},
  models::SpeakerModel,
};

/// Load speaker `id` and verify it lives under `moniker`.
async fn load_scoped<R>(
  repo: &R,
  moniker: &str,
  id: SpeakerId,
  op: Operation,
) -> Result<Speaker, ApiError>
where
  R: CampRepository,
{
  let speaker = repo
    .get_speaker(id)
    .await
    .map_err(|e| ApiError::store(op, e))?
    .ok_or_else(|| ApiError::NotFound(format!("Speaker {id} not found.")))?;

  if !speaker.belongs_to(moniker) {
    return Err(ApiError::ScopeMismatch);
  }
  Ok(speaker)
}

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /camps/{moniker}/speakers`
pub async fn list<R>(
  State(state): State<ApiState<R>>,
  ApiPath(moniker): ApiPath<String>,
) -> Result<Json<Vec<SpeakerModel>>, ApiError>
where
  R: CampRepository,
{
  let speakers = state
    .repo
    .list_speakers_by_moniker(&moniker)
    .await
    .map_err(|e| ApiError::store(Operation::ListSpeakers, e))?;
  Ok(Json(speakers.iter().map(|s| state.mapper.to_speaker_model(s)).collect()))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /camps/{moniker}/speakers/{id}`
pub async fn get_one<R>(
  State(state): State<ApiState<R>>,
  ApiPath((moniker, id)): ApiPath<(String, SpeakerId)>,
) -> Result<Json<SpeakerModel>, ApiError>
where
  R: CampRepository,
{
  let speaker = load_scoped(state.repo.as_ref(), &moniker, id, Operation::GetSpeaker).await?;
  Ok(Json(state.mapper.to_speaker_model(&speaker)))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /camps/{moniker}/speakers` — attaches the new speaker to the camp
/// named by `moniker`.
pub async fn create<R>(
  State(state): State<ApiState<R>>,
  ApiPath(moniker): ApiPath<String>,
  ApiJson(body): ApiJson<SpeakerModel>,
) -> Result<impl IntoResponse, ApiError>
where
  R: CampRepository,
{
  let profile = SpeakerProfile::from(body);
  profile.validate()?;

  let camp = state
    .repo
    .get_camp_by_moniker(&moniker)
    .await
    .map_err(|e| ApiError::store(Operation::CreateSpeaker, e))?
    .ok_or_else(|| ApiError::BadRequest(format!("could not find camp moniker {moniker}")))?;

  info!(moniker = %camp.moniker, name = %profile.name, "creating new speaker");

  let mut work = UnitOfWork::new();
  let pending = work.add_speaker(&camp, profile.clone());
  let commit = commit_work(state.repo.as_ref(), work, Operation::CreateSpeaker).await?;
  let id = commit
    .assigned_id(pending)
    .ok_or(ApiError::NotPersisted { op: Operation::CreateSpeaker })?;

  let speaker = Speaker { id, camp: CampRef { id: camp.id, moniker: camp.moniker }, profile };
  Ok((
    StatusCode::CREATED,
    [(header::LOCATION, state.mapper.speaker_url(&speaker.camp.moniker, id))],
    Json(state.mapper.to_speaker_model(&speaker)),
  ))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PUT|PATCH /camps/{moniker}/speakers/{id}` — every field in the body
/// replaces the stored one.
pub async fn update<R>(
  State(state): State<ApiState<R>>,
  ApiPath((moniker, id)): ApiPath<(String, SpeakerId)>,
  ApiJson(body): ApiJson<SpeakerModel>,
) -> Result<Json<SpeakerModel>, ApiError>
where
  R: CampRepository,
{
  SpeakerProfile::from(body.clone()).validate()?;

  let mut speaker =
    load_scoped(state.repo.as_ref(), &moniker, id, Operation::UpdateSpeaker).await?;
  state.mapper.apply_speaker_model(body, &mut speaker);

  let mut work = UnitOfWork::new();
  work.update_speaker(&speaker);
  commit_work(state.repo.as_ref(), work, Operation::UpdateSpeaker).await?;

  Ok(Json(state.mapper.to_speaker_model(&speaker)))
}

// ─── Delete ───────────────────────────────────────────────────────────────────

/// `DELETE /camps/{moniker}/speakers/{id}`
pub async fn delete<R>(
  State(state): State<ApiState<R>>,
  ApiPath((moniker, id)): ApiPath<(String, SpeakerId)>,
) -> Result<StatusCode, ApiError>
where
  R: CampRepository,
{
  let speaker =
    load_scoped(state.repo.as_ref(), &moniker, id, Operation::DeleteSpeaker).await?;

  let mut work = UnitOfWork::new();
  work.delete_speaker(&speaker);
  commit_work(state.repo.as_ref(), work, Operation::DeleteSpeaker).await?;

  Ok(StatusCode::OK)
}
