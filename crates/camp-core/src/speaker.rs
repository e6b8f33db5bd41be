//! Speaker — a presenter belonging to exactly one camp.

use crate::{Error, Result, camp::CampId};

pub type SpeakerId = i64;

/// The owning camp of a speaker, as much of it as scope checks need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CampRef {
  pub id:      CampId,
  pub moniker: String,
}

/// Descriptive speaker fields, carried through the API unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SpeakerProfile {
  pub name:          String,
  pub company_name:  Option<String>,
  pub phone_number:  Option<String>,
  pub website_url:   Option<String>,
  pub twitter_name:  Option<String>,
  pub github_name:   Option<String>,
  pub bio:           Option<String>,
  pub head_shot_url: Option<String>,
}

impl SpeakerProfile {
  pub fn validate(&self) -> Result<()> {
    if self.name.trim().is_empty() {
      return Err(Error::Required("name"));
    }
    Ok(())
  }
}

/// A persisted speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Speaker {
  pub id:      SpeakerId,
  pub camp:    CampRef,
  pub profile: SpeakerProfile,
}

impl Speaker {
  /// Whether this speaker is addressable under the camp named `moniker`.
  pub fn belongs_to(&self, moniker: &str) -> bool { self.camp.moniker == moniker }
}
