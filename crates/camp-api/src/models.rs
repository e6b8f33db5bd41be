//! Transfer models: the JSON shapes accepted and returned by the API.
//!
//! Every field is optional on input (`#[serde(default)]`); `url` and `id` are
//! filled in by the [`Mapper`](crate::mapper::Mapper) on output and ignored on
//! input.

use camp_core::camp::CampPatch;
use chrono::NaiveDate;
use serde::{Deserialize, Deserializer, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampModel {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url:         Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:          Option<i64>,
  pub moniker:     String,
  pub name:        String,
  pub description: Option<String>,
  pub location:    Option<String>,
  #[serde(deserialize_with = "null_as_default")]
  pub length:      i32,
  pub event_date:  Option<NaiveDate>,
  /// Present only when the camp was fetched with `includeSpeakers=true`.
  #[serde(skip_serializing_if = "Option::is_none")]
  pub speakers:    Option<Vec<SpeakerModel>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SpeakerModel {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub url:           Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub id:            Option<i64>,
  pub name:          String,
  pub company_name:  Option<String>,
  pub phone_number:  Option<String>,
  pub website_url:   Option<String>,
  pub twitter_name:  Option<String>,
  pub github_name:   Option<String>,
  pub bio:           Option<String>,
  pub head_shot_url: Option<String>,
}

/// Body of `PUT`/`PATCH /camps/{id}`. See [`CampPatch`] for which values
/// count as provided.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CampPatchModel {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub length:      Option<i32>,
  pub event_date:  Option<NaiveDate>,
}

impl From<CampPatchModel> for CampPatch {
  fn from(m: CampPatchModel) -> Self {
    CampPatch {
      name:        m.name,
      description: m.description,
      location:    m.location,
      length:      m.length.unwrap_or(0),
      event_date:  m.event_date,
    }
  }
}

/// Treat an explicit `null` like an absent field.
fn null_as_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
  D: Deserializer<'de>,
  T: Default + Deserialize<'de>,
{
  Ok(Option::<T>::deserialize(d)?.unwrap_or_default())
}
