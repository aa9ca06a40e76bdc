//! GameSession - the primary public API for an investigation.
//!
//! Wraps the memory matrix, session state, and an injectable RNG into a
//! single interface the frontend drives one command at a time. All mutation
//! of session state happens synchronously inside these methods.

use crate::nav::{AccessError, MemoryMatrix};
use crate::persist::{PersistError, SavedGame};
use crate::world::{SectorGraph, SessionState};
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use std::time::Instant;

/// A fragment as shown to the player: corrupted content plus any clue that
/// was newly discovered by this read.
#[derive(Debug, Clone)]
pub struct FragmentView {
    pub id: String,
    pub content: String,
    pub clue_discovered: Option<String>,
}

/// One investigation session.
///
/// The graph is constructed once at startup and owned by the matrix; there
/// is no global sector table. The RNG drives corruption rendering and can be
/// seeded for reproducible output.
#[derive(Debug)]
pub struct GameSession {
    matrix: MemoryMatrix,
    state: SessionState,
    rng: StdRng,
    started: Instant,
}

impl GameSession {
    /// Start a fresh investigation on the standard ECHO-7 matrix.
    pub fn new() -> Self {
        Self::with_graph(SectorGraph::echo7(), "BOOT_SECTOR")
    }

    /// Start a fresh investigation on a custom graph.
    pub fn with_graph(graph: SectorGraph, starting_sector: impl Into<String>) -> Self {
        let starting_sector = starting_sector.into();
        let state = SessionState::new(starting_sector);
        Self::from_parts(graph, state, StdRng::from_entropy())
    }

    /// Start with a specific RNG seed (useful for testing).
    pub fn with_seed(graph: SectorGraph, starting_sector: impl Into<String>, seed: u64) -> Self {
        let state = SessionState::new(starting_sector.into());
        Self::from_parts(graph, state, StdRng::seed_from_u64(seed))
    }

    /// Resume from previously saved state. The graph is rebuilt fresh from
    /// its definitions; only the session state comes from the save.
    pub fn from_state(graph: SectorGraph, state: SessionState) -> Self {
        Self::from_parts(graph, state, StdRng::from_entropy())
    }

    fn from_parts(graph: SectorGraph, state: SessionState, rng: StdRng) -> Self {
        Self {
            matrix: MemoryMatrix::new(graph),
            state,
            rng,
            started: Instant::now(),
        }
    }

    // ========================================================================
    // Matrix operations
    // ========================================================================

    /// Navigate to another sector. Returns the confirmation message.
    pub fn navigate(&mut self, target_id: &str) -> Result<String, AccessError> {
        self.matrix.navigate(&mut self.state, target_id)
    }

    /// Scan report for the current sector.
    pub fn scan(&mut self) -> Result<String, AccessError> {
        self.matrix.scan_current_sector(&self.state, &mut self.rng)
    }

    /// The current sector's description with corruption applied, as shown
    /// after a successful navigation.
    pub fn describe_current(&mut self) -> Result<String, AccessError> {
        let sector = self
            .matrix
            .graph()
            .get(self.state.current_sector())
            .ok_or_else(|| AccessError::SectorNotFound(self.state.current_sector().to_string()))?;
        Ok(sector.display_description_with_rng(&mut self.rng))
    }

    /// Read a fragment from the current sector, recording its clue (once)
    /// in the session state.
    pub fn read_fragment(&mut self, fragment_id: &str) -> Result<FragmentView, AccessError> {
        let fragment = self.matrix.get_fragment(&self.state, fragment_id)?;
        let content = fragment.display_content_with_rng(&mut self.rng);
        let id = fragment.id.clone();
        let clue_id = fragment.clue_id.clone();

        let clue_discovered = match clue_id {
            Some(clue) if self.state.record_clue(clue.clone()) => Some(clue),
            _ => None,
        };

        Ok(FragmentView {
            id,
            content,
            clue_discovered,
        })
    }

    /// (id, preview) pairs for the fragments visible in the current sector.
    pub fn list_fragments(&mut self) -> Result<Vec<(String, String)>, AccessError> {
        self.matrix.list_fragments(&self.state, &mut self.rng)
    }

    /// Attempt to unlock a sector. Returns the confirmation message.
    pub fn unlock_sector(&mut self, sector_id: &str, key: &str) -> Result<String, AccessError> {
        self.matrix.unlock_sector(&mut self.state, sector_id, key)
    }

    /// Expand a player-typed sector name to a known id.
    pub fn resolve_sector_id(&self, input: &str) -> Option<String> {
        self.matrix.resolve_sector_id(input)
    }

    // ========================================================================
    // Reports
    // ========================================================================

    /// The status summary shown by the `status` command.
    pub fn status_report(&self) -> String {
        let play_time = self.play_time_seconds();
        let hours = play_time / 3600;
        let minutes = (play_time % 3600) / 60;
        let seconds = play_time % 60;

        let mut lines = Vec::new();
        lines.push("[STATUS] ECHO-7 System Status".to_string());
        lines.push("-".repeat(30));
        lines.push(format!("Current Sector: {}", self.state.current_sector()));
        lines.push(format!(
            "Memory Integrity: {:.1}%",
            self.state.integrity() * 100.0
        ));
        lines.push(format!(
            "Clues Discovered: {}",
            self.state.discovered_clues().len()
        ));
        lines.push(format!(
            "Puzzles Solved: {}",
            self.state.solved_puzzles().len()
        ));
        lines.push(format!(
            "Sectors Accessible: {}",
            self.state.unlocked_sectors().len()
        ));
        lines.push(format!("Time Active: {hours:02}:{minutes:02}:{seconds:02}"));
        lines.join("\n")
    }

    /// The evidence summary shown by the `analyze` command.
    pub fn analysis_report(&self) -> String {
        let clue_count = self.state.discovered_clues().len();
        let mut lines = vec![
            "[ANALYSIS] Evidence Summary".to_string(),
            format!("Clues discovered: {clue_count}"),
        ];
        if clue_count >= 3 {
            lines.push(String::new());
            lines.push("[INSIGHT] Multiple evidence points suggest deliberate sabotage.".to_string());
            lines.push("Someone with high-level access wanted to destroy ECHO-7.".to_string());
        }
        lines.join("\n")
    }

    // ========================================================================
    // State access
    // ========================================================================

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn matrix(&self) -> &MemoryMatrix {
        &self.matrix
    }

    /// Display name of the current sector.
    pub fn current_sector_name(&self) -> &str {
        self.matrix
            .graph()
            .get(self.state.current_sector())
            .map(|s| s.name.as_str())
            .unwrap_or_else(|| self.state.current_sector())
    }

    /// Record a solved puzzle (driven by the puzzle layer). Returns true if
    /// it was new.
    pub fn record_solved_puzzle(&mut self, puzzle_id: &str) -> bool {
        self.state.record_solved_puzzle(puzzle_id)
    }

    /// Total play time: what previous sessions banked plus this one.
    pub fn play_time_seconds(&self) -> u64 {
        self.state.play_time_seconds() + self.started.elapsed().as_secs()
    }

    // ========================================================================
    // Persistence
    // ========================================================================

    /// Save the session state to a JSON file. The graph is not saved.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), PersistError> {
        let mut state = self.state.clone();
        state.add_play_time(self.started.elapsed().as_secs());
        SavedGame::new(state).save_json(path).await
    }

    /// Load a session from a save file, rebuilding the standard ECHO-7
    /// graph fresh.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, PersistError> {
        let saved = SavedGame::load_json(path).await?;
        Ok(Self::from_state(SectorGraph::echo7(), saved.state))
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new()
    }
}
