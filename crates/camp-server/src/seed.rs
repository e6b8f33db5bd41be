//! Sample data for a fresh database.

use camp_core::{
  camp::NewCamp,
  repository::{CampRepository, UnitOfWork},
  speaker::SpeakerProfile,
};
use chrono::NaiveDate;
use tracing::info;

pub const SAMPLE_MONIKER: &str = "ATL2016";

fn sample_camp() -> NewCamp {
  NewCamp {
    moniker:     SAMPLE_MONIKER.to_owned(),
    name:        "Your First Code Camp".to_owned(),
    description: Some("This is the first code camp".to_owned()),
    location:    Some("Atlanta, GA".to_owned()),
    length:      1,
    event_date:  NaiveDate::from_ymd_opt(2016, 10, 18),
  }
}

fn sample_speakers() -> Vec<SpeakerProfile> {
  vec![
    SpeakerProfile {
      name:         "Ada Byron".to_owned(),
      company_name: Some("Analytical Engines".to_owned()),
      bio:          Some("Writes the first programs".to_owned()),
      ..Default::default()
    },
    SpeakerProfile {
      name:         "Grace Hopper".to_owned(),
      company_name: Some("US Navy".to_owned()),
      bio:          Some("Finds the first bug".to_owned()),
      ..Default::default()
    },
  ]
}

/// Insert the sample camp and its speakers if `repo` holds no camps.
///
/// Returns `true` if anything was inserted.
pub async fn seed_if_empty<R>(repo: &R) -> Result<bool, R::Error>
where
  R: CampRepository,
{
  if !repo.list_camps().await?.is_empty() {
    return Ok(false);
  }

  let mut work = UnitOfWork::new();
  work.add_camp(sample_camp());
  repo.commit(work).await?;

  // Speakers need the camp's assigned id, so they go in a second unit.
  let Some(camp) = repo.get_camp_by_moniker(SAMPLE_MONIKER).await? else {
    return Ok(false);
  };
  let mut work = UnitOfWork::new();
  for profile in sample_speakers() {
    work.add_speaker(&camp, profile);
  }
  repo.commit(work).await?;

  info!(moniker = SAMPLE_MONIKER, "seeded sample camp");
  Ok(true)
}
