//! The `CampRepository` trait and the unit of work it commits.
//!
//! Reads go straight to the repository. Writes are staged on a
//! [`UnitOfWork`] and made durable by a single
//! [`CampRepository::commit`] call, which either applies every staged change
//! or none of them.

use std::future::Future;

use crate::{
  camp::{Camp, CampId, NewCamp},
  speaker::{Speaker, SpeakerId, SpeakerProfile},
};

// ─── Unit of work ────────────────────────────────────────────────────────────

/// A single staged write.
#[derive(Debug, Clone, PartialEq)]
pub enum Change {
  AddCamp(NewCamp),
  AddSpeaker { camp_id: CampId, profile: SpeakerProfile },
  UpdateCamp(Camp),
  UpdateSpeaker(Speaker),
  DeleteCamp(CampId),
  DeleteSpeaker(SpeakerId),
}

/// Handle to a staged insert; resolves to the assigned id via
/// [`Commit::assigned_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pending(usize);

/// An ordered batch of changes to be committed atomically.
#[derive(Debug, Clone, Default)]
pub struct UnitOfWork {
  changes: Vec<Change>,
}

impl UnitOfWork {
  pub fn new() -> Self { Self::default() }

  pub fn add_camp(&mut self, camp: NewCamp) -> Pending {
    self.push(Change::AddCamp(camp))
  }

  /// Stage a new speaker attached to `camp`.
  pub fn add_speaker(&mut self, camp: &Camp, profile: SpeakerProfile) -> Pending {
    self.push(Change::AddSpeaker { camp_id: camp.id, profile })
  }

  pub fn update_camp(&mut self, camp: &Camp) {
    self.push(Change::UpdateCamp(camp.clone()));
  }

  pub fn update_speaker(&mut self, speaker: &Speaker) {
    self.push(Change::UpdateSpeaker(speaker.clone()));
  }

  /// Stage removal of a previously loaded camp.
  pub fn delete_camp(&mut self, camp: &Camp) {
    self.push(Change::DeleteCamp(camp.id));
  }

  /// Stage removal of a previously loaded speaker.
  pub fn delete_speaker(&mut self, speaker: &Speaker) {
    self.push(Change::DeleteSpeaker(speaker.id));
  }

  pub fn is_empty(&self) -> bool { self.changes.is_empty() }

  #[cfg(test)]
  pub(crate) fn changes(&self) -> &[Change] { &self.changes }

  pub fn into_changes(self) -> Vec<Change> { self.changes }

  fn push(&mut self, change: Change) -> Pending {
    self.changes.push(change);
    Pending(self.changes.len() - 1)
  }
}

/// Outcome of a successful [`CampRepository::commit`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Commit {
  /// Total rows touched across all changes.
  pub affected: usize,
  /// Ids assigned to inserts, indexed by change position.
  pub assigned: Vec<Option<i64>>,
}

impl Commit {
  /// `true` if at least one row was written.
  pub fn persisted(&self) -> bool { self.affected > 0 }

  pub fn assigned_id(&self, pending: Pending) -> Option<i64> {
    self.assigned.get(pending.0).copied().flatten()
  }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a camp/speaker storage backend.
///
/// All methods return `Send` futures so the trait can be used from axum
/// handlers on a multi-threaded runtime.
pub trait CampRepository: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Camps ─────────────────────────────────────────────────────────────

  fn list_camps(&self) -> impl Future<Output = Result<Vec<Camp>, Self::Error>> + Send + '_;

  /// Retrieve a camp without its speakers. Returns `None` if not found.
  fn get_camp(
    &self,
    id: CampId,
  ) -> impl Future<Output = Result<Option<Camp>, Self::Error>> + Send + '_;

  /// Retrieve a camp with `speakers` populated.
  fn get_camp_with_speakers(
    &self,
    id: CampId,
  ) -> impl Future<Output = Result<Option<Camp>, Self::Error>> + Send + '_;

  fn get_camp_by_moniker<'a>(
    &'a self,
    moniker: &'a str,
  ) -> impl Future<Output = Result<Option<Camp>, Self::Error>> + Send + 'a;

  // ── Speakers ──────────────────────────────────────────────────────────

  /// Retrieve a speaker together with its owning camp's moniker.
  fn get_speaker(
    &self,
    id: SpeakerId,
  ) -> impl Future<Output = Result<Option<Speaker>, Self::Error>> + Send + '_;

  /// All speakers of the camp named `moniker`; empty if no such camp.
  fn list_speakers_by_moniker<'a>(
    &'a self,
    moniker: &'a str,
  ) -> impl Future<Output = Result<Vec<Speaker>, Self::Error>> + Send + 'a;

  // ── Writes ────────────────────────────────────────────────────────────

  /// Apply every change in `work` atomically.
  ///
  /// An `Err` means nothing was applied. An `Ok` with
  /// [`Commit::persisted`] `== false` means the changes matched no rows.
  fn commit(
    &self,
    work: UnitOfWork,
  ) -> impl Future<Output = Result<Commit, Self::Error>> + Send + '_;
}
