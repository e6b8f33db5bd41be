//! Encoding and decoding helpers between domain types and SQLite columns.
//!
//! Event dates are stored as `YYYY-MM-DD` text. Rows are first read into
//! `Raw*` structs inside the connection thread and decoded afterwards.

use camp_core::{
  camp::Camp,
  speaker::{CampRef, Speaker, SpeakerProfile},
};
use chrono::NaiveDate;

use crate::{Error, Result};

// ─── NaiveDate ────────────────────────────────────────────────────────────────

const DATE_FORMAT: &str = "%Y-%m-%d";

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

// ─── Camps ────────────────────────────────────────────────────────────────────

pub const CAMP_COLUMNS: &str = "id, moniker, name, description, location, length, event_date";

pub struct RawCamp {
  pub id:          i64,
  pub moniker:     String,
  pub name:        String,
  pub description: Option<String>,
  pub location:    Option<String>,
  pub length:      i32,
  pub event_date:  Option<String>,
}

impl RawCamp {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawCamp {
      id:          row.get(0)?,
      moniker:     row.get(1)?,
      name:        row.get(2)?,
      description: row.get(3)?,
      location:    row.get(4)?,
      length:      row.get(5)?,
      event_date:  row.get(6)?,
    })
  }

  pub fn into_camp(self) -> Result<Camp> {
    Ok(Camp {
      id:          self.id,
      moniker:     self.moniker,
      name:        self.name,
      description: self.description,
      location:    self.location,
      length:      self.length,
      event_date:  self.event_date.as_deref().map(decode_date).transpose()?,
      speakers:    None,
    })
  }
}

// ─── Speakers ─────────────────────────────────────────────────────────────────

/// Columns for a speaker joined to its camp as `s` / `c`.
pub const SPEAKER_COLUMNS: &str = "s.id, s.camp_id, c.moniker, s.name, s.company_name, \
  s.phone_number, s.website_url, s.twitter_name, s.github_name, s.bio, s.head_shot_url";

pub struct RawSpeaker {
  pub id:            i64,
  pub camp_id:       i64,
  pub camp_moniker:  String,
  pub name:          String,
  pub company_name:  Option<String>,
  pub phone_number:  Option<String>,
  pub website_url:   Option<String>,
  pub twitter_name:  Option<String>,
  pub github_name:   Option<String>,
  pub bio:           Option<String>,
  pub head_shot_url: Option<String>,
}

impl RawSpeaker {
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(RawSpeaker {
      id:            row.get(0)?,
      camp_id:       row.get(1)?,
      camp_moniker:  row.get(2)?,
      name:          row.get(3)?,
      company_name:  row.get(4)?,
      phone_number:  row.get(5)?,
      website_url:   row.get(6)?,
      twitter_name:  row.get(7)?,
      github_name:   row.get(8)?,
      bio:           row.get(9)?,
      head_shot_url: row.get(10)?,
    })
  }

  pub fn into_speaker(self) -> Speaker {
    Speaker {
      id:      self.id,
      camp:    CampRef { id: self.camp_id, moniker: self.camp_moniker },
      profile: SpeakerProfile {
        name:          self.name,
        company_name:  self.company_name,
        phone_number:  self.phone_number,
        website_url:   self.website_url,
        twitter_name:  self.twitter_name,
        github_name:   self.github_name,
        bio:           self.bio,
        head_shot_url: self.head_shot_url,
      },
    }
  }
}
