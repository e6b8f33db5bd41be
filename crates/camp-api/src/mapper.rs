//! Hand-written entity ⇄ transfer-model mapping.

use camp_core::{
  camp::{Camp, CampId, NewCamp},
  speaker::{Speaker, SpeakerId, SpeakerProfile},
};

use crate::models::{CampModel, SpeakerModel};

/// Converts between entities and transfer models, and builds resource URLs.
#[derive(Debug, Clone)]
pub struct Mapper {
  /// Absolute URL the API router is mounted at, e.g. `http://host/api`.
  base_url: String,
}

impl Mapper {
  pub fn new(base_url: impl Into<String>) -> Self {
    let base_url = base_url.into().trim_end_matches('/').to_owned();
    Self { base_url }
  }

  pub fn camp_url(&self, id: CampId) -> String { format!("{}/camps/{id}", self.base_url) }

  pub fn speaker_url(&self, moniker: &str, id: SpeakerId) -> String {
    format!("{}/camps/{moniker}/speakers/{id}", self.base_url)
  }

  pub fn to_camp_model(&self, camp: &Camp) -> CampModel {
    CampModel {
      url:         Some(self.camp_url(camp.id)),
      id:          Some(camp.id),
      moniker:     camp.moniker.clone(),
      name:        camp.name.clone(),
      description: camp.description.clone(),
      location:    camp.location.clone(),
      length:      camp.length,
      event_date:  camp.event_date,
      speakers:    camp
        .speakers
        .as_ref()
        .map(|speakers| speakers.iter().map(|s| self.to_speaker_model(s)).collect()),
    }
  }

  pub fn to_speaker_model(&self, speaker: &Speaker) -> SpeakerModel {
    let p = &speaker.profile;
    SpeakerModel {
      url:           Some(self.speaker_url(&speaker.camp.moniker, speaker.id)),
      id:            Some(speaker.id),
      name:          p.name.clone(),
      company_name:  p.company_name.clone(),
      phone_number:  p.phone_number.clone(),
      website_url:   p.website_url.clone(),
      twitter_name:  p.twitter_name.clone(),
      github_name:   p.github_name.clone(),
      bio:           p.bio.clone(),
      head_shot_url: p.head_shot_url.clone(),
    }
  }

  /// Overwrite every profile field of `speaker` from `model`; fields absent
  /// from the model are cleared. Identity and camp are left alone.
  pub fn apply_speaker_model(&self, model: SpeakerModel, speaker: &mut Speaker) {
    speaker.profile = SpeakerProfile::from(model);
  }
}

impl From<CampModel> for NewCamp {
  fn from(m: CampModel) -> Self {
    NewCamp {
      moniker:     m.moniker,
      name:        m.name,
      description: m.description,
      location:    m.location,
      length:      m.length,
      event_date:  m.event_date,
    }
  }
}

impl From<SpeakerModel> for SpeakerProfile {
  fn from(m: SpeakerModel) -> Self {
    SpeakerProfile {
      name:          m.name,
      company_name:  m.company_name,
      phone_number:  m.phone_number,
      website_url:   m.website_url,
      twitter_name:  m.twitter_name,
      github_name:   m.github_name,
      bio:           m.bio,
      head_shot_url: m.head_shot_url,
    }
  }
}
