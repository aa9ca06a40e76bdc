//! Echo Protocol world types.
//!
//! Contains the data model for the ECHO-7 memory matrix: sectors, the
//! fragments stored inside them, the sector graph, and the session state
//! that tracks a player's progress through an investigation.

use crate::corruption;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

// ============================================================================
// Fragments
// ============================================================================

/// A readable unit of data stored in one memory sector.
///
/// Content is immutable once defined; whether a fragment is visible is
/// computed per access from session state, and what it looks like is
/// recomputed on every read when the fragment is corrupted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Fragment {
    pub id: String,
    pub content: String,
    pub corrupted: bool,
    pub corruption_level: f64,
    /// Puzzle that must be solved before this fragment becomes visible.
    pub requires_puzzle: Option<String>,
    /// Clue recorded in session state when this fragment is read.
    pub clue_id: Option<String>,
}

impl Fragment {
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            corrupted: false,
            corruption_level: 0.0,
            requires_puzzle: None,
            clue_id: None,
        }
    }

    pub fn with_corruption(mut self, level: f64) -> Self {
        self.corrupted = true;
        self.corruption_level = level;
        self
    }

    pub fn with_clue(mut self, clue_id: impl Into<String>) -> Self {
        self.clue_id = Some(clue_id.into());
        self
    }

    pub fn with_puzzle_gate(mut self, puzzle_id: impl Into<String>) -> Self {
        self.requires_puzzle = Some(puzzle_id.into());
        self
    }

    /// Render the content with corruption effects applied.
    ///
    /// Non-deterministic: every call redraws the glitch pattern.
    pub fn display_content(&self) -> String {
        self.display_content_with_rng(&mut rand::thread_rng())
    }

    /// Render with a specific RNG (useful for testing).
    pub fn display_content_with_rng<R: Rng>(&self, rng: &mut R) -> String {
        if !self.corrupted {
            return self.content.clone();
        }
        corruption::corrupt_content_with_rng(&self.content, self.corruption_level, rng)
    }
}

// ============================================================================
// Sectors
// ============================================================================

/// A navigable memory sector.
///
/// Adjacency is directional and not guaranteed symmetric: an edge from A to B
/// does not imply an edge from B to A.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sector {
    pub id: String,
    pub name: String,
    pub description: String,
    pub corrupted: bool,
    pub corruption_level: f64,
    pub locked: bool,
    /// Credential token a locked sector demands, compared case-insensitively.
    pub unlock_requirement: Option<String>,
    /// Ids of sectors reachable from here, in definition order.
    pub connections: Vec<String>,
    /// Fragments stored here, in definition order (significant for listing).
    pub fragments: Vec<Fragment>,
}

impl Sector {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: String::new(),
            corrupted: false,
            corruption_level: 0.0,
            locked: false,
            unlock_requirement: None,
            connections: Vec::new(),
            fragments: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_corruption(mut self, level: f64) -> Self {
        self.corrupted = true;
        self.corruption_level = level;
        self
    }

    pub fn locked_by(mut self, requirement: impl Into<String>) -> Self {
        self.locked = true;
        self.unlock_requirement = Some(requirement.into());
        self
    }

    pub fn connects_to(mut self, ids: &[&str]) -> Self {
        self.connections = ids.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_fragment(mut self, fragment: Fragment) -> Self {
        self.fragments.push(fragment);
        self
    }

    /// Look up a fragment by id, ignoring visibility rules.
    pub fn fragment(&self, id: &str) -> Option<&Fragment> {
        self.fragments.iter().find(|f| f.id == id)
    }

    /// Render the description with corruption effects applied.
    pub fn display_description(&self) -> String {
        self.display_description_with_rng(&mut rand::thread_rng())
    }

    /// Render with a specific RNG (useful for testing).
    pub fn display_description_with_rng<R: Rng>(&self, rng: &mut R) -> String {
        if !self.corrupted {
            return self.description.clone();
        }
        corruption::corrupt_description_with_rng(&self.description, self.corruption_level, rng)
    }
}

// ============================================================================
// Sector Graph
// ============================================================================

/// Registry of all sectors, built once at startup.
///
/// The graph is plain data: it performs no access-control logic. Traversal
/// and disclosure rules live in [`crate::nav::MemoryMatrix`].
#[derive(Debug, Clone, Default)]
pub struct SectorGraph {
    sectors: HashMap<String, Sector>,
}

impl SectorGraph {
    pub fn new() -> Self {
        Self {
            sectors: HashMap::new(),
        }
    }

    pub fn insert(&mut self, sector: Sector) {
        self.sectors.insert(sector.id.clone(), sector);
    }

    pub fn with_sector(mut self, sector: Sector) -> Self {
        self.insert(sector);
        self
    }

    /// Look up a sector by id. Absence is not an error at this layer.
    pub fn get(&self, id: &str) -> Option<&Sector> {
        self.sectors.get(id)
    }

    pub(crate) fn get_mut(&mut self, id: &str) -> Option<&mut Sector> {
        self.sectors.get_mut(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.sectors.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.sectors.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.sectors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sectors.is_empty()
    }

    /// The fixed ECHO-7 memory matrix: six sectors, three of them locked,
    /// with the boot sector seeded with introductory fragments.
    pub fn echo7() -> Self {
        SectorGraph::new()
            .with_sector(
                Sector::new("BOOT_SECTOR", "Boot Sector")
                    .with_description(
                        "The initialization point of ECHO-7. Basic systems and \
                         diagnostic tools are stored here.",
                    )
                    .connects_to(&["PERSONNEL_RECORDS", "SECURITY_LOGS"])
                    .with_fragment(Fragment::new(
                        "boot_welcome",
                        "ECHO-7 DIAGNOSTIC TERMINAL v2.3.1\n\n\
                         Welcome to the ECHO-7 neural matrix diagnostic system.\n\
                         This terminal provides access to memory sectors and system analysis tools.\n\n\
                         Use 'scan' to examine your current location.\n\
                         Use 'navigate [sector]' to move between memory sectors.\n\
                         Use 'help' for a full list of commands.",
                    ))
                    .with_fragment(
                        Fragment::new(
                            "boot_warning",
                            "[CRITICAL SYSTEM ALERT]\n\
                             Date: [CORRUPTED]\n\
                             Time: 03:42:17\n\n\
                             Multiple memory sectors show signs of deliberate tampering.\n\
                             Corruption patterns do not match standard degradation models.\n\
                             Investigation protocols activated.\n\n\
                             Recommended action: Investigate all accessible sectors for evidence.",
                        )
                        .with_clue("sabotage_detected"),
                    )
                    .with_fragment(
                        Fragment::new(
                            "boot_lastlog",
                            "[LAST ACCESS LOG]\n\
                             User: Dr. S█████ Chen\n\
                             Time: 03:41:55\n\
                             Action: Emergency shutdown initiated\n\
                             Reason: \"Conta██████ breach detected\"\n\n\
                             Note: This was 22 seconds before the corruption event.",
                        )
                        .with_corruption(0.3)
                        .with_clue("chen_shutdown"),
                    ),
            )
            .with_sector(
                Sector::new("PERSONNEL_RECORDS", "Personnel Records")
                    .with_description(
                        "Employee files and staff records. Several entries appear \
                         to be deliberately damaged.",
                    )
                    .with_corruption(0.6)
                    .locked_by("password_alpha")
                    .connects_to(&["BOOT_SECTOR", "COMMUNICATIONS", "RESEARCH_DATA"])
                    .with_fragment(
                        Fragment::new(
                            "personnel_chen",
                            "[EMPLOYEE FILE: CHEN, S.]\n\
                             Role: Senior Research Lead, Neural Systems\n\
                             Clearance: Level 3\n\
                             Status: MISSING since corruption event\n\n\
                             Note appended by security: last badge-out never recorded.",
                        )
                        .with_corruption(0.4)
                        .with_clue("chen_missing"),
                    )
                    .with_fragment(
                        Fragment::new(
                            "personnel_roster",
                            "[NIGHT SHIFT ROSTER]\n\
                             03:00-06:00 duty: M. Okafor (security), S. Chen (research)\n\
                             All other staff badged out by 23:40.",
                        )
                        .with_puzzle_gate("roster_checksum")
                        .with_clue("night_shift"),
                    ),
            )
            .with_sector(
                Sector::new("SECURITY_LOGS", "Security Logs")
                    .with_description(
                        "Access logs and security camera data. Timestamps seem \
                         suspiciously altered.",
                    )
                    .with_corruption(0.4)
                    .connects_to(&["BOOT_SECTOR", "CORE_PROTOCOLS"])
                    .with_fragment(
                        Fragment::new(
                            "security_badgelog",
                            "[BADGE LOG 03:00-04:00]\n\
                             03:12:40 LAB-2 entry: CHEN, S.\n\
                             03:38:02 SERVER ROOM entry: ██████\n\
                             03:41:55 emergency shutdown signal, origin LAB-2",
                        )
                        .with_corruption(0.5)
                        .with_clue("server_room_entry"),
                    ),
            )
            .with_sector(
                Sector::new("RESEARCH_DATA", "Research Data")
                    .with_description(
                        "Scientific data and experiment logs. Critical sections \
                         have been redacted.",
                    )
                    .with_corruption(0.7)
                    .locked_by("clearance_level_3")
                    .connects_to(&["PERSONNEL_RECORDS", "CORE_PROTOCOLS"]),
            )
            .with_sector(
                Sector::new("COMMUNICATIONS", "Communications Archive")
                    .with_description(
                        "Email threads and message logs. Many messages are only \
                         partially recoverable.",
                    )
                    .with_corruption(0.5)
                    .connects_to(&["PERSONNEL_RECORDS", "SECURITY_LOGS"]),
            )
            .with_sector(
                Sector::new("CORE_PROTOCOLS", "Core Protocols")
                    .with_description(
                        "ECHO-7's fundamental programming and directives. \
                         HIGHLY RESTRICTED.",
                    )
                    .with_corruption(0.8)
                    .locked_by("admin_override")
                    .connects_to(&["SECURITY_LOGS", "RESEARCH_DATA"]),
            )
    }
}

// ============================================================================
// Session State
// ============================================================================

/// Default session-wide corruption at the start of an investigation.
const INITIAL_CORRUPTION: f64 = 0.7;

/// Progress of one investigation session.
///
/// Owned by the game session and mutated only through controller operations.
/// Serialized wholesale for save/load; the sector graph is never saved and
/// is rebuilt fresh from its fixed definitions instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionState {
    session_id: Uuid,
    current_sector: String,
    previous_sector: Option<String>,
    /// Insertion-ordered, duplicates suppressed on record.
    discovered_clues: Vec<String>,
    solved_puzzles: Vec<String>,
    /// Sectors the player may freely re-enter. Seeded with the start sector.
    unlocked_sectors: Vec<String>,
    /// Session-wide corruption scalar, unrelated to per-sector levels.
    corruption_level: f64,
    story_flags: HashMap<String, bool>,
    play_time_seconds: u64,
}

impl SessionState {
    pub fn new(starting_sector: impl Into<String>) -> Self {
        let starting_sector = starting_sector.into();
        Self {
            session_id: Uuid::new_v4(),
            current_sector: starting_sector.clone(),
            previous_sector: None,
            discovered_clues: Vec::new(),
            solved_puzzles: Vec::new(),
            unlocked_sectors: vec![starting_sector],
            corruption_level: INITIAL_CORRUPTION,
            story_flags: HashMap::new(),
            play_time_seconds: 0,
        }
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    pub fn current_sector(&self) -> &str {
        &self.current_sector
    }

    pub fn previous_sector(&self) -> Option<&str> {
        self.previous_sector.as_deref()
    }

    pub fn discovered_clues(&self) -> &[String] {
        &self.discovered_clues
    }

    pub fn solved_puzzles(&self) -> &[String] {
        &self.solved_puzzles
    }

    pub fn unlocked_sectors(&self) -> &[String] {
        &self.unlocked_sectors
    }

    /// Session-wide corruption scalar (0.0 = clean, 1.0 = fully corrupted).
    pub fn corruption_level(&self) -> f64 {
        self.corruption_level
    }

    /// Memory integrity, the complement of the corruption scalar.
    pub fn integrity(&self) -> f64 {
        1.0 - self.corruption_level
    }

    pub fn is_unlocked(&self, sector_id: &str) -> bool {
        self.unlocked_sectors.iter().any(|s| s == sector_id)
    }

    pub fn has_solved(&self, puzzle_id: &str) -> bool {
        self.solved_puzzles.iter().any(|p| p == puzzle_id)
    }

    pub fn flag(&self, name: &str) -> bool {
        self.story_flags.get(name).copied().unwrap_or(false)
    }

    pub fn play_time_seconds(&self) -> u64 {
        self.play_time_seconds
    }

    /// Record a discovered clue. Returns true if it was new.
    pub fn record_clue(&mut self, clue_id: impl Into<String>) -> bool {
        let clue_id = clue_id.into();
        if self.discovered_clues.iter().any(|c| *c == clue_id) {
            false
        } else {
            self.discovered_clues.push(clue_id);
            true
        }
    }

    /// Record a solved puzzle. Returns true if it was new.
    pub fn record_solved_puzzle(&mut self, puzzle_id: impl Into<String>) -> bool {
        let puzzle_id = puzzle_id.into();
        if self.has_solved(&puzzle_id) {
            false
        } else {
            self.solved_puzzles.push(puzzle_id);
            true
        }
    }

    pub fn set_flag(&mut self, name: impl Into<String>, value: bool) {
        self.story_flags.insert(name.into(), value);
    }

    pub fn set_corruption_level(&mut self, level: f64) {
        self.corruption_level = level.clamp(0.0, 1.0);
    }

    pub fn add_play_time(&mut self, seconds: u64) {
        self.play_time_seconds += seconds;
    }

    pub(crate) fn mark_unlocked(&mut self, sector_id: &str) {
        if !self.is_unlocked(sector_id) {
            self.unlocked_sectors.push(sector_id.to_string());
        }
    }

    pub(crate) fn move_to(&mut self, sector_id: &str) {
        self.previous_sector = Some(std::mem::replace(
            &mut self.current_sector,
            sector_id.to_string(),
        ));
        self.mark_unlocked(sector_id);
    }
}
