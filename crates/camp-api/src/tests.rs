//! Router-level tests: requests go through the full axum stack.

use std::sync::Arc;

use axum::{
  Router,
  body::Body,
  http::{HeaderMap, Method, Request, StatusCode, header},
};
use camp_core::{
  camp::{Camp, CampId},
  repository::{CampRepository, Commit, UnitOfWork},
  speaker::{CampRef, Speaker, SpeakerId, SpeakerProfile},
};
use camp_store_sqlite::SqliteRepository;
use serde_json::{Value, json};
use tower::ServiceExt as _;

use crate::{AllowAll, ApiError, ApiState, Authorize, Mapper, api_router};

fn router_for<R>(repo: R, authorizer: Arc<dyn Authorize>) -> Router
where
  R: CampRepository + 'static,
{
  let state = ApiState::new(Arc::new(repo), Mapper::new("http://localhost/api"), authorizer);
  Router::new().nest("/api", api_router(state))
}

async fn app() -> Router {
  let repo = SqliteRepository::open_in_memory().await.unwrap();
  router_for(repo, Arc::new(AllowAll))
}

async fn send(
  app: &Router,
  method: Method,
  uri: &str,
  body: Option<Value>,
) -> (StatusCode, HeaderMap, Value) {
  let mut builder = Request::builder().method(method).uri(uri);
  let body = match body {
    Some(v) => {
      builder = builder.header(header::CONTENT_TYPE, "application/json");
      Body::from(v.to_string())
    }
    None => Body::empty(),
  };
  let resp = app.clone().oneshot(builder.body(body).unwrap()).await.unwrap();
  let status = resp.status();
  let headers = resp.headers().clone();
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let value = if bytes.is_empty() { Value::Null } else { serde_json::from_slice(&bytes).unwrap() };
  (status, headers, value)
}

async fn create_camp(app: &Router, moniker: &str) -> i64 {
  let (status, _, body) = send(
    app,
    Method::POST,
    "/api/camps",
    Some(json!({ "moniker": moniker, "name": "Code Camp", "length": 1, "eventDate": "2024-06-01" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

async fn create_speaker(app: &Router, moniker: &str, name: &str) -> i64 {
  let (status, _, body) = send(
    app,
    Method::POST,
    &format!("/api/camps/{moniker}/speakers"),
    Some(json!({ "name": name, "companyName": "Acme" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  body["id"].as_i64().unwrap()
}

// ─── Camps ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_then_get_with_speakers() {
  let app = app().await;
  let (status, headers, body) = send(
    &app,
    Method::POST,
    "/api/camps",
    Some(json!({
      "name": "Code Camp",
      "moniker": "cc2024",
      "length": 1,
      "eventDate": "2024-06-01"
    })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = body["id"].as_i64().unwrap();
  let location = headers.get(header::LOCATION).unwrap().to_str().unwrap();
  assert_eq!(location, format!("http://localhost/api/camps/{id}"));

  let (status, _, camp) =
    send(&app, Method::GET, &format!("/api/camps/{id}?includeSpeakers=true"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(camp["name"], "Code Camp");
  assert_eq!(camp["moniker"], "cc2024");
  assert_eq!(camp["length"], 1);
  assert_eq!(camp["eventDate"], "2024-06-01");
  assert_eq!(camp["url"], location);
  assert_eq!(camp["speakers"], json!([]));
}

#[tokio::test]
async fn get_without_include_omits_speakers() {
  let app = app().await;
  let id = create_camp(&app, "cc2024").await;
  create_speaker(&app, "cc2024", "Jane").await;

  let (_, _, camp) = send(&app, Method::GET, &format!("/api/camps/{id}"), None).await;
  assert!(camp.get("speakers").is_none());

  let (_, _, camp) =
    send(&app, Method::GET, &format!("/api/camps/{id}?includeSpeakers=true"), None).await;
  assert_eq!(camp["speakers"][0]["name"], "Jane");
}

#[tokio::test]
async fn list_camps() {
  let app = app().await;
  let (status, _, body) = send(&app, Method::GET, "/api/camps", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));

  create_camp(&app, "a").await;
  create_camp(&app, "b").await;
  let (_, _, body) = send(&app, Method::GET, "/api/camps", None).await;
  assert_eq!(body.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn get_missing_camp_is_404_with_message() {
  let app = app().await;
  let (status, _, body) = send(&app, Method::GET, "/api/camps/42", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Camp 42 not found.");
}

#[tokio::test]
async fn create_camp_requires_moniker() {
  let app = app().await;
  let (status, _, body) =
    send(&app, Method::POST, "/api/camps", Some(json!({ "name": "No Slug" }))).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "moniker is required");
}

#[tokio::test]
async fn duplicate_moniker_is_generic_create_error() {
  let app = app().await;
  create_camp(&app, "cc2024").await;
  let (status, _, body) = send(
    &app,
    Method::POST,
    "/api/camps",
    Some(json!({ "moniker": "cc2024", "name": "Again" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "create camp error");
}

#[tokio::test]
async fn partial_update_ignores_absent_fields() {
  let app = app().await;
  let (_, _, created) = send(
    &app,
    Method::POST,
    "/api/camps",
    Some(json!({ "moniker": "devcon", "name": "DevCon", "length": 2, "location": "Atlanta" })),
  )
  .await;
  let id = created["id"].as_i64().unwrap();

  let (status, _, body) = send(
    &app,
    Method::PATCH,
    &format!("/api/camps/{id}"),
    Some(json!({ "length": 0, "eventDate": null, "name": "" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "DevCon");
  assert_eq!(body["length"], 2);
  assert_eq!(body["location"], "Atlanta");

  let (status, _, body) = send(
    &app,
    Method::PUT,
    &format!("/api/camps/{id}"),
    Some(json!({ "location": "Boston", "length": 3, "eventDate": "2025-01-15" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["location"], "Boston");

  let (_, _, stored) = send(&app, Method::GET, &format!("/api/camps/{id}"), None).await;
  assert_eq!(stored["name"], "DevCon");
  assert_eq!(stored["location"], "Boston");
  assert_eq!(stored["length"], 3);
  assert_eq!(stored["eventDate"], "2025-01-15");
  assert_eq!(stored["moniker"], "devcon");
}

#[tokio::test]
async fn null_length_in_patch_keeps_stored_length() {
  let app = app().await;
  let id = create_camp(&app, "cc2024").await;

  let (status, _, body) = send(
    &app,
    Method::PATCH,
    &format!("/api/camps/{id}"),
    Some(json!({ "name": "DevCon East", "length": null })),
  )
  .await;
  assert_eq!(status, StatusCode::OK, "{body}");

  let (_, _, stored) = send(&app, Method::GET, &format!("/api/camps/{id}"), None).await;
  assert_eq!(stored["name"], "DevCon East");
  assert_eq!(stored["length"], 1);
}

#[tokio::test]
async fn null_length_on_create_means_unset() {
  let app = app().await;
  let (status, _, body) = send(
    &app,
    Method::POST,
    "/api/camps",
    Some(json!({ "moniker": "cc2024", "name": "Code Camp", "length": null })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED, "{body}");
  assert_eq!(body["length"], 0);
}

#[tokio::test]
async fn malformed_input_gets_json_error_body() {
  let app = app().await;
  let id = create_camp(&app, "cc2024").await;

  let (status, _, body) = send(
    &app,
    Method::POST,
    "/api/camps",
    Some(json!({ "moniker": "x", "name": "y", "length": "two" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, _, body) = send(
    &app,
    Method::PATCH,
    &format!("/api/camps/{id}"),
    Some(json!({ "eventDate": "someday" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  // No JSON content type at all.
  let req = Request::builder()
    .method(Method::POST)
    .uri("/api/camps/cc2024/speakers")
    .body(Body::from(r#"{"name":"Jane"}"#))
    .unwrap();
  let resp = app.clone().oneshot(req).await.unwrap();
  assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
  let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
  let body: Value = serde_json::from_slice(&bytes).unwrap();
  assert!(body["error"].is_string());

  let (status, _, body) = send(&app, Method::GET, "/api/camps/not-a-number", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());

  let (status, _, body) = send(&app, Method::GET, "/api/camps/cc2024/speakers/abc", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn include_speakers_flag_ignores_case() {
  let app = app().await;
  let id = create_camp(&app, "cc2024").await;

  for flag in ["True", "TRUE", "true"] {
    let (status, _, camp) =
      send(&app, Method::GET, &format!("/api/camps/{id}?includeSpeakers={flag}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(camp["speakers"], json!([]), "{flag}");
  }

  let (_, _, camp) =
    send(&app, Method::GET, &format!("/api/camps/{id}?includeSpeakers=False"), None).await;
  assert!(camp.get("speakers").is_none());

  let (status, _, body) =
    send(&app, Method::GET, &format!("/api/camps/{id}?includeSpeakers=maybe"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_missing_camp_is_404() {
  let app = app().await;
  let (status, _, body) =
    send(&app, Method::PUT, "/api/camps/7", Some(json!({ "name": "Ghost" }))).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Could not find camp id 7");
}

#[tokio::test]
async fn delete_then_get_is_404() {
  let app = app().await;
  let id = create_camp(&app, "cc2024").await;

  let (status, _, body) = send(&app, Method::DELETE, &format!("/api/camps/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, Value::Null);

  let (status, _, _) = send(&app, Method::GET, &format!("/api/camps/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  let (status, _, _) = send(&app, Method::DELETE, &format!("/api/camps/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Speakers ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn speaker_scenario_with_scope_mismatch() {
  let app = app().await;
  create_camp(&app, "cc2024").await;
  create_camp(&app, "other-moniker").await;

  let (status, headers, body) = send(
    &app,
    Method::POST,
    "/api/camps/cc2024/speakers",
    Some(json!({ "name": "Jane" })),
  )
  .await;
  assert_eq!(status, StatusCode::CREATED);
  let id = body["id"].as_i64().unwrap();
  assert_eq!(
    headers.get(header::LOCATION).unwrap(),
    format!("http://localhost/api/camps/cc2024/speakers/{id}").as_str()
  );

  let (status, _, speaker) =
    send(&app, Method::GET, &format!("/api/camps/cc2024/speakers/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(speaker["name"], "Jane");

  let (status, _, body) =
    send(&app, Method::GET, &format!("/api/camps/other-moniker/speakers/{id}"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "Speaker not in specified camp");
}

#[tokio::test]
async fn create_speaker_for_unknown_camp_has_no_side_effect() {
  let app = app().await;
  let (status, _, body) = send(
    &app,
    Method::POST,
    "/api/camps/nowhere/speakers",
    Some(json!({ "name": "Jane" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "could not find camp moniker nowhere");

  let (status, _, body) = send(&app, Method::GET, "/api/camps/nowhere/speakers", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]));
}

#[tokio::test]
async fn create_speaker_requires_name() {
  let app = app().await;
  create_camp(&app, "cc2024").await;
  let (status, _, body) = send(
    &app,
    Method::POST,
    "/api/camps/cc2024/speakers",
    Some(json!({ "bio": "anonymous" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "name is required");
}

#[tokio::test]
async fn list_speakers_is_scoped_to_moniker() {
  let app = app().await;
  create_camp(&app, "cc2024").await;
  create_camp(&app, "rc2025").await;
  create_speaker(&app, "cc2024", "Jane").await;
  create_speaker(&app, "cc2024", "Sam").await;
  create_speaker(&app, "rc2025", "Ferris").await;

  let (_, _, body) = send(&app, Method::GET, "/api/camps/cc2024/speakers", None).await;
  let names: Vec<_> = body.as_array().unwrap().iter().map(|s| s["name"].clone()).collect();
  assert_eq!(names, [json!("Jane"), json!("Sam")]);
}

#[tokio::test]
async fn get_missing_speaker_is_404() {
  let app = app().await;
  create_camp(&app, "cc2024").await;
  let (status, _, _) = send(&app, Method::GET, "/api/camps/cc2024/speakers/99", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_or_delete_missing_speaker_is_404() {
  let app = app().await;
  create_camp(&app, "cc2024").await;

  let (status, _, body) = send(
    &app,
    Method::PUT,
    "/api/camps/cc2024/speakers/99",
    Some(json!({ "name": "Ghost" })),
  )
  .await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Speaker 99 not found.");

  let (status, _, body) = send(&app, Method::DELETE, "/api/camps/cc2024/speakers/99", None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
  assert_eq!(body["error"], "Speaker 99 not found.");
}

#[tokio::test]
async fn update_speaker_overwrites_every_field() {
  let app = app().await;
  create_camp(&app, "cc2024").await;
  let id = create_speaker(&app, "cc2024", "Jane").await;

  let (status, _, body) = send(
    &app,
    Method::PUT,
    &format!("/api/camps/cc2024/speakers/{id}"),
    Some(json!({ "name": "Jane Doe", "bio": "Rustacean" })),
  )
  .await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body["name"], "Jane Doe");
  assert_eq!(body["bio"], "Rustacean");
  assert_eq!(body["companyName"], Value::Null, "omitted fields are cleared");
  assert_eq!(body["id"], id);
}

#[tokio::test]
async fn update_and_delete_speaker_are_scope_checked() {
  let app = app().await;
  create_camp(&app, "cc2024").await;
  create_camp(&app, "other").await;
  let id = create_speaker(&app, "cc2024", "Jane").await;

  let (status, _, _) = send(
    &app,
    Method::PATCH,
    &format!("/api/camps/other/speakers/{id}"),
    Some(json!({ "name": "Hijacked" })),
  )
  .await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (status, _, _) =
    send(&app, Method::DELETE, &format!("/api/camps/other/speakers/{id}"), None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);

  let (_, _, speaker) =
    send(&app, Method::GET, &format!("/api/camps/cc2024/speakers/{id}"), None).await;
  assert_eq!(speaker["name"], "Jane");

  let (status, _, _) =
    send(&app, Method::DELETE, &format!("/api/camps/cc2024/speakers/{id}"), None).await;
  assert_eq!(status, StatusCode::OK);
  let (status, _, _) =
    send(&app, Method::GET, &format!("/api/camps/cc2024/speakers/{id}"), None).await;
  assert_eq!(status, StatusCode::NOT_FOUND);
}

// ─── Failure paths ───────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
#[error("disk on fire")]
struct Boom;

#[derive(Clone, Copy)]
enum CommitOutcome {
  NothingPersisted,
  Fails,
}

/// A repository holding one camp whose reads succeed and whose commits
/// misbehave in a configurable way.
struct FlakyRepo {
  outcome: CommitOutcome,
}

impl FlakyRepo {
  fn camp() -> Camp {
    Camp {
      id:          1,
      moniker:     "cc2024".into(),
      name:        "Code Camp".into(),
      description: None,
      location:    None,
      length:      1,
      event_date:  None,
      speakers:    None,
    }
  }

  fn speaker() -> Speaker {
    Speaker {
      id:      1,
      camp:    CampRef { id: 1, moniker: "cc2024".into() },
      profile: SpeakerProfile { name: "Jane".into(), ..Default::default() },
    }
  }
}

impl CampRepository for FlakyRepo {
  type Error = Boom;

  async fn list_camps(&self) -> Result<Vec<Camp>, Boom> { Err(Boom) }

  async fn get_camp(&self, id: CampId) -> Result<Option<Camp>, Boom> {
    Ok((id == 1).then(Self::camp))
  }

  async fn get_camp_with_speakers(&self, _: CampId) -> Result<Option<Camp>, Boom> { Err(Boom) }

  async fn get_camp_by_moniker(&self, moniker: &str) -> Result<Option<Camp>, Boom> {
    Ok((moniker == "cc2024").then(Self::camp))
  }

  async fn get_speaker(&self, id: SpeakerId) -> Result<Option<Speaker>, Boom> {
    Ok((id == 1).then(Self::speaker))
  }

  async fn list_speakers_by_moniker(&self, _: &str) -> Result<Vec<Speaker>, Boom> { Ok(vec![]) }

  async fn commit(&self, _: UnitOfWork) -> Result<Commit, Boom> {
    match self.outcome {
      CommitOutcome::NothingPersisted => Ok(Commit::default()),
      CommitOutcome::Fails => Err(Boom),
    }
  }
}

#[tokio::test]
async fn unpersisted_and_failed_commits_look_the_same() {
  for outcome in [CommitOutcome::NothingPersisted, CommitOutcome::Fails] {
    let app = router_for(FlakyRepo { outcome }, Arc::new(AllowAll));

    let (status, _, body) =
      send(&app, Method::PATCH, "/api/camps/1", Some(json!({ "name": "New" }))).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "update camp error");

    let (status, _, body) = send(&app, Method::DELETE, "/api/camps/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "delete camp error");

    let (status, _, body) = send(
      &app,
      Method::POST,
      "/api/camps/cc2024/speakers",
      Some(json!({ "name": "Jane" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "create speaker error");

    let (status, _, body) = send(
      &app,
      Method::PUT,
      "/api/camps/cc2024/speakers/1",
      Some(json!({ "name": "Jane Doe" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "update speaker error");

    let (status, _, body) = send(&app, Method::DELETE, "/api/camps/cc2024/speakers/1", None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "delete speaker error");
  }
}

#[tokio::test]
async fn store_errors_on_reads_are_client_errors() {
  let app = router_for(FlakyRepo { outcome: CommitOutcome::Fails }, Arc::new(AllowAll));

  let (status, _, body) = send(&app, Method::GET, "/api/camps", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "list camps error");

  let (status, _, body) = send(&app, Method::GET, "/api/camps/1?includeSpeakers=true", None).await;
  assert_eq!(status, StatusCode::BAD_REQUEST);
  assert_eq!(body["error"], "get camp error");
}

// ─── Authorization ───────────────────────────────────────────────────────────

struct ReadOnly;

impl Authorize for ReadOnly {
  fn authorize(&self, method: &Method, _: &HeaderMap) -> Result<(), ApiError> {
    if method == Method::GET { Ok(()) } else { Err(ApiError::Forbidden) }
  }
}

#[tokio::test]
async fn authorizer_runs_before_handlers() {
  let repo = SqliteRepository::open_in_memory().await.unwrap();
  let app = router_for(repo, Arc::new(ReadOnly));

  let (status, _, _) = send(
    &app,
    Method::POST,
    "/api/camps",
    Some(json!({ "moniker": "cc2024", "name": "Code Camp" })),
  )
  .await;
  assert_eq!(status, StatusCode::FORBIDDEN);

  let (status, _, body) = send(&app, Method::GET, "/api/camps", None).await;
  assert_eq!(status, StatusCode::OK);
  assert_eq!(body, json!([]), "rejected create left no trace");
}
