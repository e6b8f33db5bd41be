//! Camp — a conference event, addressed by numeric id or by moniker.

use chrono::NaiveDate;

use crate::{Error, Result, speaker::Speaker};

pub type CampId = i64;

/// A persisted camp.
///
/// `speakers` is `None` unless the camp was loaded together with its
/// speakers (see [`CampRepository::get_camp_with_speakers`]).
///
/// [`CampRepository::get_camp_with_speakers`]:
///   crate::repository::CampRepository::get_camp_with_speakers
#[derive(Debug, Clone, PartialEq)]
pub struct Camp {
  pub id:          CampId,
  pub moniker:     String,
  pub name:        String,
  pub description: Option<String>,
  pub location:    Option<String>,
  /// Duration in days. Zero means "not set".
  pub length:      i32,
  pub event_date:  Option<NaiveDate>,
  pub speakers:    Option<Vec<Speaker>>,
}

/// Input for creating a camp. The id is assigned by the repository.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NewCamp {
  pub moniker:     String,
  pub name:        String,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub length:      i32,
  pub event_date:  Option<NaiveDate>,
}

impl NewCamp {
  /// Reject camps that could never be routed to or that carry a nonsensical
  /// length.
  pub fn validate(&self) -> Result<()> {
    if self.moniker.trim().is_empty() {
      return Err(Error::Required("moniker"));
    }
    if self.name.trim().is_empty() {
      return Err(Error::Required("name"));
    }
    if self.length < 0 {
      return Err(Error::NegativeLength(self.length));
    }
    Ok(())
  }

  /// The camp as stored once the repository has assigned `id`.
  pub fn into_camp(self, id: CampId) -> Camp {
    Camp {
      id,
      moniker: self.moniker,
      name: self.name,
      description: self.description,
      location: self.location,
      length: self.length,
      event_date: self.event_date,
      speakers: None,
    }
  }
}

/// A partial update. Each field is applied only when it counts as provided:
///
/// - strings: `Some` and non-empty
/// - `length`: strictly positive
/// - `event_date`: `Some`
///
/// A `length` of zero is indistinguishable from "absent" and is ignored.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CampPatch {
  pub name:        Option<String>,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub length:      i32,
  pub event_date:  Option<NaiveDate>,
}

impl Camp {
  /// Merge `patch` into `self` under the per-field rules of [`CampPatch`].
  pub fn apply_patch(&mut self, patch: CampPatch) {
    if let Some(name) = provided(patch.name) {
      self.name = name;
    }
    if let Some(description) = provided(patch.description) {
      self.description = Some(description);
    }
    if let Some(location) = provided(patch.location) {
      self.location = Some(location);
    }
    if patch.length > 0 {
      self.length = patch.length;
    }
    if patch.event_date.is_some() {
      self.event_date = patch.event_date;
    }
  }
}

fn provided(value: Option<String>) -> Option<String> {
  value.filter(|v| !v.is_empty())
}
