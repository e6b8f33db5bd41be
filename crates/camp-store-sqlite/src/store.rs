//! [`SqliteRepository`] — the SQLite implementation of [`CampRepository`].

use std::path::Path;

use camp_core::{
  camp::{Camp, CampId},
  repository::{CampRepository, Change, Commit, UnitOfWork},
  speaker::{Speaker, SpeakerId},
};
use rusqlite::OptionalExtension as _;
use tracing::debug;

use crate::{
  Result,
  encode::{CAMP_COLUMNS, RawCamp, RawSpeaker, SPEAKER_COLUMNS, encode_date},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A camp repository backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteRepository {
  conn: tokio_rusqlite::Connection,
}

impl SqliteRepository {
  /// Open (or create) a database at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  /// Open an in-memory database — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let repo = Self { conn };
    repo.init_schema().await?;
    Ok(repo)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

/// Apply one staged change inside an open transaction.
///
/// Returns `(rows_affected, assigned_id)`.
fn apply_change(
  conn: &rusqlite::Connection,
  change: &Change,
) -> rusqlite::Result<(usize, Option<i64>)> {
  match change {
    Change::AddCamp(camp) => {
      let rows = conn.execute(
        "INSERT INTO camps (moniker, name, description, location, length, event_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        rusqlite::params![
          camp.moniker,
          camp.name,
          camp.description,
          camp.location,
          camp.length,
          camp.event_date.map(encode_date),
        ],
      )?;
      Ok((rows, Some(conn.last_insert_rowid())))
    }
    Change::AddSpeaker { camp_id, profile } => {
      let rows = conn.execute(
        "INSERT INTO speakers (
           camp_id, name, company_name, phone_number, website_url,
           twitter_name, github_name, bio, head_shot_url
         ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        rusqlite::params![
          camp_id,
          profile.name,
          profile.company_name,
          profile.phone_number,
          profile.website_url,
          profile.twitter_name,
          profile.github_name,
          profile.bio,
          profile.head_shot_url,
        ],
      )?;
      Ok((rows, Some(conn.last_insert_rowid())))
    }
    Change::UpdateCamp(camp) => {
      let rows = conn.execute(
        "UPDATE camps
         SET name = ?2, description = ?3, location = ?4, length = ?5, event_date = ?6
         WHERE id = ?1",
        rusqlite::params![
          camp.id,
          camp.name,
          camp.description,
          camp.location,
          camp.length,
          camp.event_date.map(encode_date),
        ],
      )?;
      Ok((rows, None))
    }
    Change::UpdateSpeaker(speaker) => {
      let p = &speaker.profile;
      let rows = conn.execute(
        "UPDATE speakers
         SET name = ?2, company_name = ?3, phone_number = ?4, website_url = ?5,
             twitter_name = ?6, github_name = ?7, bio = ?8, head_shot_url = ?9
         WHERE id = ?1",
        rusqlite::params![
          speaker.id,
          p.name,
          p.company_name,
          p.phone_number,
          p.website_url,
          p.twitter_name,
          p.github_name,
          p.bio,
          p.head_shot_url,
        ],
      )?;
      Ok((rows, None))
    }
    Change::DeleteCamp(id) => {
      let rows = conn.execute("DELETE FROM camps WHERE id = ?1", rusqlite::params![id])?;
      Ok((rows, None))
    }
    Change::DeleteSpeaker(id) => {
      let rows = conn.execute("DELETE FROM speakers WHERE id = ?1", rusqlite::params![id])?;
      Ok((rows, None))
    }
  }
}

// ─── CampRepository impl ─────────────────────────────────────────────────────

impl CampRepository for SqliteRepository {
  type Error = crate::Error;

  // ── Camps ─────────────────────────────────────────────────────────────────

  async fn list_camps(&self) -> Result<Vec<Camp>> {
    let raws: Vec<RawCamp> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!("SELECT {CAMP_COLUMNS} FROM camps ORDER BY id"))?;
        let rows = stmt
          .query_map([], RawCamp::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawCamp::into_camp).collect()
  }

  async fn get_camp(&self, id: CampId) -> Result<Option<Camp>> {
    let raw: Option<RawCamp> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CAMP_COLUMNS} FROM camps WHERE id = ?1"),
              rusqlite::params![id],
              RawCamp::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCamp::into_camp).transpose()
  }

  async fn get_camp_with_speakers(&self, id: CampId) -> Result<Option<Camp>> {
    let found: Option<(RawCamp, Vec<RawSpeaker>)> = self
      .conn
      .call(move |conn| {
        let camp = conn
          .query_row(
            &format!("SELECT {CAMP_COLUMNS} FROM camps WHERE id = ?1"),
            rusqlite::params![id],
            RawCamp::from_row,
          )
          .optional()?;

        let Some(camp) = camp else {
          return Ok(None);
        };

        let mut stmt = conn.prepare(&format!(
          "SELECT {SPEAKER_COLUMNS}
           FROM speakers s JOIN camps c ON c.id = s.camp_id
           WHERE s.camp_id = ?1
           ORDER BY s.id"
        ))?;
        let speakers = stmt
          .query_map(rusqlite::params![id], RawSpeaker::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(Some((camp, speakers)))
      })
      .await?;

    let Some((raw_camp, raw_speakers)) = found else {
      return Ok(None);
    };

    let mut camp = raw_camp.into_camp()?;
    camp.speakers = Some(raw_speakers.into_iter().map(RawSpeaker::into_speaker).collect());
    Ok(Some(camp))
  }

  async fn get_camp_by_moniker(&self, moniker: &str) -> Result<Option<Camp>> {
    let moniker = moniker.to_owned();

    let raw: Option<RawCamp> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {CAMP_COLUMNS} FROM camps WHERE moniker = ?1"),
              rusqlite::params![moniker],
              RawCamp::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawCamp::into_camp).transpose()
  }

  // ── Speakers ──────────────────────────────────────────────────────────────

  async fn get_speaker(&self, id: SpeakerId) -> Result<Option<Speaker>> {
    let raw: Option<RawSpeaker> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {SPEAKER_COLUMNS}
                 FROM speakers s JOIN camps c ON c.id = s.camp_id
                 WHERE s.id = ?1"
              ),
              rusqlite::params![id],
              RawSpeaker::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(raw.map(RawSpeaker::into_speaker))
  }

  async fn list_speakers_by_moniker(&self, moniker: &str) -> Result<Vec<Speaker>> {
    let moniker = moniker.to_owned();

    let raws: Vec<RawSpeaker> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {SPEAKER_COLUMNS}
           FROM speakers s JOIN camps c ON c.id = s.camp_id
           WHERE c.moniker = ?1
           ORDER BY s.id"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![moniker], RawSpeaker::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(raws.into_iter().map(RawSpeaker::into_speaker).collect())
  }

  // ── Writes ────────────────────────────────────────────────────────────────

  async fn commit(&self, work: UnitOfWork) -> Result<Commit> {
    if work.is_empty() {
      return Ok(Commit::default());
    }

    let changes = work.into_changes();
    let staged = changes.len();

    // One transaction per unit of work; dropping `tx` on error rolls back.
    let commit = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let mut commit = Commit { affected: 0, assigned: Vec::with_capacity(changes.len()) };
        for change in &changes {
          let (rows, assigned) = apply_change(&tx, change)?;
          commit.affected += rows;
          commit.assigned.push(assigned);
        }
        tx.commit()?;
        Ok(commit)
      })
      .await?;

    debug!(staged, affected = commit.affected, "committed unit of work");
    Ok(commit)
  }
}
