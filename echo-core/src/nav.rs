//! Navigation and access control for the memory matrix.
//!
//! The sector graph is plain data and [`SessionState`] only records what
//! happened; every traversal and disclosure rule lives here. All failures
//! are recoverable and leave both graph and session state untouched.

use crate::world::{Fragment, SectorGraph, SessionState};
use rand::Rng;
use thiserror::Error;

/// Maximum preview length for fragment listings, in characters.
const PREVIEW_CHARS: usize = 50;

/// Suffixes tried when expanding a player-typed sector name to a full id.
const ID_SUFFIXES: [&str; 4] = ["_RECORDS", "_DATA", "_LOGS", "_SECTOR"];

/// Errors surfaced by matrix operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AccessError {
    #[error("memory sector '{0}' not found")]
    SectorNotFound(String),

    #[error("data fragment '{0}' not found or not accessible")]
    FragmentNotFound(String),

    #[error("no pathway from {from} to {to}")]
    NoPath { from: String, to: String },

    /// Target sector is locked and not yet in the session's unlocked set.
    #[error("{sector} requires: {requirement}")]
    Locked { sector: String, requirement: String },

    /// Unlock key did not match the sector's requirement.
    #[error("invalid key for {0}")]
    InvalidKey(String),

    #[error("{0} is not locked")]
    NotLocked(String),
}

impl AccessError {
    /// True for the credential-failure family (locked sector, wrong key).
    pub fn is_access_denied(&self) -> bool {
        matches!(self, AccessError::Locked { .. } | AccessError::InvalidKey(_))
    }
}

/// The navigation and access controller.
///
/// Owns the sector graph for the lifetime of a session and mediates every
/// mutation of it; callers never write sector fields directly.
#[derive(Debug, Clone)]
pub struct MemoryMatrix {
    graph: SectorGraph,
}

impl MemoryMatrix {
    pub fn new(graph: SectorGraph) -> Self {
        Self { graph }
    }

    pub fn graph(&self) -> &SectorGraph {
        &self.graph
    }

    /// Expand a player-typed sector name to a known id, trying the common
    /// suffix patterns of the ECHO-7 naming scheme.
    pub fn resolve_sector_id(&self, input: &str) -> Option<String> {
        let upper = input.to_uppercase();
        if self.graph.contains(&upper) {
            return Some(upper);
        }
        ID_SUFFIXES
            .iter()
            .map(|suffix| format!("{upper}{suffix}"))
            .find(|candidate| self.graph.contains(candidate))
    }

    /// Move the session to `target_id`.
    ///
    /// Checks run in order: the target must exist, must be listed in the
    /// current sector's adjacency (directional only; no reverse edge is
    /// required), and must not be locked without credentials. On success the
    /// previous sector is recorded and the target joins the unlocked set
    /// permanently, whether or not it was ever flagged locked.
    pub fn navigate(
        &self,
        state: &mut SessionState,
        target_id: &str,
    ) -> Result<String, AccessError> {
        let target = self
            .graph
            .get(target_id)
            .ok_or_else(|| AccessError::SectorNotFound(target_id.to_string()))?;
        let current = self.current_sector(state)?;

        if !current.connections.iter().any(|c| c == target_id) {
            return Err(AccessError::NoPath {
                from: current.name.clone(),
                to: target.name.clone(),
            });
        }

        // The locked flag alone does not bar entry: sectors already in the
        // unlocked set stay open even while still flagged locked.
        if target.locked && !state.is_unlocked(target_id) {
            return Err(AccessError::Locked {
                sector: target.name.clone(),
                requirement: target
                    .unlock_requirement
                    .clone()
                    .unwrap_or_else(|| "unknown credential".to_string()),
            });
        }

        state.move_to(target_id);
        Ok(format!("Navigated to {}.", target.name))
    }

    /// Produce the scan report for the current sector: corrupted description,
    /// corruption warning, annotated connections, and accessible fragment
    /// count.
    pub fn scan_current_sector<R: Rng>(
        &self,
        state: &SessionState,
        rng: &mut R,
    ) -> Result<String, AccessError> {
        let sector = self.current_sector(state)?;
        let mut lines = Vec::new();

        lines.push(format!("[SCANNING: {}]", sector.name));
        lines.push("-".repeat(50));
        lines.push(sector.display_description_with_rng(rng));

        if sector.corrupted {
            lines.push(format!(
                "\n[WARNING] Corruption Level: {:.0}%",
                sector.corruption_level * 100.0
            ));
        }

        lines.push("\n[CONNECTIONS]".to_string());
        for conn_id in &sector.connections {
            let name = self
                .graph
                .get(conn_id)
                .map(|s| s.name.as_str())
                .unwrap_or(conn_id.as_str());
            let status = if state.is_unlocked(conn_id) {
                "ACCESSIBLE"
            } else {
                "LOCKED"
            };
            lines.push(format!("  -> {name} [{status}]"));
        }

        let accessible = sector
            .fragments
            .iter()
            .filter(|f| is_visible(f, state))
            .count();
        lines.push(format!("\n[DATA FRAGMENTS] {accessible} accessible"));

        Ok(lines.join("\n"))
    }

    /// Fetch a fragment from the current sector only. Puzzle-gated fragments
    /// stay hidden until their required puzzle is solved; other sectors are
    /// never searched.
    pub fn get_fragment<'a>(
        &'a self,
        state: &SessionState,
        fragment_id: &str,
    ) -> Result<&'a Fragment, AccessError> {
        let sector = self.current_sector(state)?;
        sector
            .fragments
            .iter()
            .find(|f| f.id == fragment_id)
            .filter(|f| is_visible(f, state))
            .ok_or_else(|| AccessError::FragmentNotFound(fragment_id.to_string()))
    }

    /// List (id, preview) pairs for the fragments currently visible in the
    /// current sector. Previews are the first line of the corrupted content,
    /// truncated to 50 characters with an ellipsis marker.
    pub fn list_fragments<R: Rng>(
        &self,
        state: &SessionState,
        rng: &mut R,
    ) -> Result<Vec<(String, String)>, AccessError> {
        let sector = self.current_sector(state)?;
        Ok(sector
            .fragments
            .iter()
            .filter(|f| is_visible(f, state))
            .map(|f| {
                let display = f.display_content_with_rng(rng);
                let first_line = display.lines().next().unwrap_or("");
                (f.id.clone(), preview_of(first_line))
            })
            .collect())
    }

    /// Attempt to unlock a sector with a key, compared case-insensitively
    /// against the sector's requirement. On success the locked flag is
    /// cleared and the sector joins the unlocked set; any failure leaves
    /// both untouched.
    pub fn unlock_sector(
        &mut self,
        state: &mut SessionState,
        sector_id: &str,
        key: &str,
    ) -> Result<String, AccessError> {
        let sector = self
            .graph
            .get_mut(sector_id)
            .ok_or_else(|| AccessError::SectorNotFound(sector_id.to_string()))?;

        if !sector.locked {
            return Err(AccessError::NotLocked(sector.name.clone()));
        }

        match &sector.unlock_requirement {
            Some(requirement) if key.eq_ignore_ascii_case(requirement) => {
                sector.locked = false;
                state.mark_unlocked(sector_id);
                Ok(format!("{} unlocked!", sector.name))
            }
            _ => Err(AccessError::InvalidKey(sector.name.clone())),
        }
    }

    fn current_sector(&self, state: &SessionState) -> Result<&crate::world::Sector, AccessError> {
        self.graph
            .get(state.current_sector())
            .ok_or_else(|| AccessError::SectorNotFound(state.current_sector().to_string()))
    }
}

fn is_visible(fragment: &Fragment, state: &SessionState) -> bool {
    fragment
        .requires_puzzle
        .as_deref()
        .map_or(true, |puzzle| state.has_solved(puzzle))
}

fn preview_of(line: &str) -> String {
    let mut preview: String = line.chars().take(PREVIEW_CHARS).collect();
    if line.chars().count() > PREVIEW_CHARS {
        preview.push_str("...");
    }
    preview
}
