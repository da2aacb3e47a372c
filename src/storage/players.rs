//! Player repository backed by a JSONL file.

use tokio::sync::RwLock;
use tracing::{debug, info};

use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError};
use crate::models::{Player, PlayerId, Position, RawStats, RawStatsUpdate};

/// Fields for creating or refreshing a player.
#[derive(Debug, Clone)]
pub struct NewPlayer {
    pub name: String,
    pub position: Position,
    pub description: Option<String>,
    pub stats: RawStats,
}

/// What an upsert did to the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Created(PlayerId),
    Updated(PlayerId),
}

/// All players, held in memory in ascending id order and written through
/// to disk on every change.
pub struct PlayerStore {
    writer: JsonlWriter<Player>,
    players: RwLock<Vec<Player>>,
}

impl PlayerStore {
    /// Load the store from the data directory. A missing file yields an
    /// empty store.
    pub fn open(config: &StorageConfig) -> Result<Self, StorageError> {
        let path = config.players_path();
        let mut players = JsonlReader::<Player>::new(path.clone()).read_all()?;
        players.sort_by_key(|p| p.id);
        players.dedup_by_key(|p| p.id);

        info!("Loaded {} players from {:?}", players.len(), path);

        Ok(Self {
            writer: JsonlWriter::new(path),
            players: RwLock::new(players),
        })
    }

    /// Snapshot of every player, ascending by id.
    pub async fn list(&self) -> Vec<Player> {
        self.players.read().await.clone()
    }

    pub async fn get(&self, id: PlayerId) -> Option<Player> {
        let players = self.players.read().await;
        let found = players.iter().find(|p| p.id == id).cloned();
        debug!("Lookup player {}: found={}", id, found.is_some());
        found
    }

    /// Apply a counting-stats update. Returns `None` if the id is unknown.
    pub async fn update_stats(
        &self,
        id: PlayerId,
        update: &RawStatsUpdate,
    ) -> Result<Option<Player>, StorageError> {
        let mut players = self.players.write().await;
        let Some(idx) = players.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let mut next = players.clone();
        let player = &mut next[idx];
        player.stats = player.stats.apply(update);
        player.touch();
        let updated = player.clone();

        *players = self.persist(next).await?;

        info!(
            "Updated stats for {} ({}): {:?}",
            updated.name,
            updated.id,
            update.field_names()
        );
        Ok(Some(updated))
    }

    /// Set a player's description. Returns `None` if the id is unknown.
    pub async fn set_description(
        &self,
        id: PlayerId,
        description: String,
    ) -> Result<Option<Player>, StorageError> {
        let mut players = self.players.write().await;
        let Some(idx) = players.iter().position(|p| p.id == id) else {
            return Ok(None);
        };

        let mut next = players.clone();
        let player = &mut next[idx];
        player.description = Some(description);
        player.touch();
        let updated = player.clone();

        *players = self.persist(next).await?;

        info!("Set description for {} ({})", updated.name, updated.id);
        Ok(Some(updated))
    }

    /// Create or refresh players by name in a single write.
    ///
    /// Existing players keep their id, creation time and description
    /// (unless a new description is supplied).
    pub async fn upsert_batch(
        &self,
        batch: Vec<NewPlayer>,
    ) -> Result<Vec<UpsertOutcome>, StorageError> {
        validate_batch(&batch)?;

        let mut players = self.players.write().await;
        let mut next = players.clone();
        let outcomes = merge_batch(&mut next, batch);

        *players = self.persist(next).await?;

        info!("Upserted {} players", outcomes.len());
        Ok(outcomes)
    }

    /// Replace every player with `batch` in a single write.
    ///
    /// Ids restart from 1. Returns how many players were removed and what
    /// happened to each batch entry. On error the store is unchanged.
    pub async fn replace_all(
        &self,
        batch: Vec<NewPlayer>,
    ) -> Result<(usize, Vec<UpsertOutcome>), StorageError> {
        validate_batch(&batch)?;

        let mut players = self.players.write().await;
        let removed = players.len();
        let mut next = Vec::with_capacity(batch.len());
        let outcomes = merge_batch(&mut next, batch);

        *players = self.persist(next).await?;

        info!("Replaced {} players with {}", removed, players.len());
        Ok((removed, outcomes))
    }

    /// Write `next` to disk off the async runtime, handing it back once the
    /// file is in place.
    async fn persist(&self, next: Vec<Player>) -> Result<Vec<Player>, StorageError> {
        let writer = self.writer.clone();
        tokio::task::spawn_blocking(move || writer.write_all(&next).map(|_| next))
            .await
            .map_err(|e| StorageError::Io(std::io::Error::other(e)))?
    }
}

fn validate_batch(batch: &[NewPlayer]) -> Result<(), StorageError> {
    for new in batch {
        validate_name(&new.name)?;
    }
    Ok(())
}

/// Fold `batch` into `players`, matching on name.
fn merge_batch(players: &mut Vec<Player>, batch: Vec<NewPlayer>) -> Vec<UpsertOutcome> {
    let mut outcomes = Vec::with_capacity(batch.len());

    for new in batch {
        match players.iter_mut().find(|p| p.name == new.name) {
            Some(existing) => {
                existing.position = new.position;
                existing.stats = new.stats;
                if new.description.is_some() {
                    existing.description = new.description;
                }
                existing.touch();
                outcomes.push(UpsertOutcome::Updated(existing.id));
            }
            None => {
                let player = build_player(next_id(players), new);
                outcomes.push(UpsertOutcome::Created(player.id));
                players.push(player);
            }
        }
    }

    outcomes
}

fn validate_name(name: &str) -> Result<(), StorageError> {
    if name.trim().is_empty() {
        return Err(StorageError::InvalidRecord("player name is empty".to_string()));
    }
    Ok(())
}

fn next_id(players: &[Player]) -> PlayerId {
    players
        .iter()
        .map(|p| p.id)
        .max()
        .map(PlayerId::next)
        .unwrap_or(PlayerId::new(1))
}

fn build_player(id: PlayerId, new: NewPlayer) -> Player {
    let player = Player::new(id, new.name, new.position, new.stats);
    match new.description {
        Some(description) => player.with_description(description),
        None => player,
    }
}
