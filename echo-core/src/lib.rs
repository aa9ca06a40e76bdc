//! Echo Protocol memory investigation engine.
//!
//! This crate provides:
//! - The ECHO-7 memory sector graph with locked and corrupted sectors
//! - Navigation and access control for moving through the matrix
//! - Stochastic corruption rendering of displayed text
//! - Versioned session persistence
//!
//! # Quick Start
//!
//! ```ignore
//! use echo_core::GameSession;
//!
//! let mut session = GameSession::new();
//! println!("{}", session.scan()?);
//!
//! session.unlock_sector("PERSONNEL_RECORDS", "password_alpha")?;
//! println!("{}", session.navigate("PERSONNEL_RECORDS")?);
//!
//! session.save("saves/autosave.json").await?;
//! ```

pub mod corruption;
pub mod nav;
pub mod persist;
pub mod session;
pub mod world;

// Primary public API
pub use nav::{AccessError, MemoryMatrix};
pub use persist::{list_saves, save_path, PersistError, SaveInfo, SaveMetadata, SavedGame};
pub use session::{FragmentView, GameSession};
pub use world::{Fragment, Sector, SectorGraph, SessionState};
