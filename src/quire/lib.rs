//! # Quire Architecture
//!
//! Quire keeps notebooks of exactly 100 pages each, all of them serialized into a single
//! storage slot. Like any UI on top of it, the `quire` binary is just one client of the
//! library.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │  CLI Layer (cli/, wired by main.rs)                         │
//! │  - Parses arguments, prompts, formats output                │
//! │  - The ONLY place that knows about stdout/stderr/exit codes │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  API Layer (api.rs, editor.rs)                              │
//! │  - Session handle owning the store and the page cursor      │
//! │  - Resets the cursor when selection or store changes        │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Command Layer (commands/*.rs)                              │
//! │  - Notebook, page, export and import logic                  │
//! │  - Plain functions over Store + repository                  │
//! └─────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │  Storage Layer (repository.rs, slot/)                       │
//! │  - Load with repair, persist after every mutation           │
//! │  - SlotBackend trait: FsSlot (production), MemSlot (tests)  │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No I/O Assumptions in Core
//!
//! From `api.rs` inward, code never prints, never prompts and never exits. Destructive
//! commands take a [`commands::Confirmation`] instead of asking, and every command reports
//! back through [`commands::CmdResult`] messages and events.
//!
//! ## Module Overview
//!
//! - [`api`]: The session facade, entry point for all operations
//! - [`commands`]: Business logic per area
//! - [`repository`]: Load/repair/persist of the whole store
//! - [`slot`]: Storage slot abstraction and implementations
//! - [`model`]: `Page`, `Notebook`, `Store`
//! - [`index`]: Clamped 1-based page numbers
//! - [`editor`]: The one-page cursor and its edit buffer
//! - [`config`]: Configuration management
//! - [`error`]: Error types
//! - `cli`: Argument parsing and printing for the binary (not part of the lib API)

pub mod api;
pub mod commands;
pub mod config;
pub mod editor;
pub mod error;
pub mod index;
pub mod model;
pub mod repository;
pub mod slot;
