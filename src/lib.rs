//! # Feed Harness
//!
//! Turns a queue of plain-text notes into a dated, tagged content tree.
//!
//! Each queue file becomes one record with a numeric identifier. Identifiers
//! keep increasing across runs: the next one is always recovered from the
//! largest leaf already present in the tree, so there is no counter file to
//! drift out of sync.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ Queue (txt)  │──▶│  Normalize  │──▶│ Sort + Assign│──▶│ Content tree │
//! │ connector_fs │   │ text + tags │   │  ids (ingest)│   │ YYYY/MM/DD   │
//! └──────────────┘   └─────────────┘   └──────▲───────┘   └──────┬───────┘
//!                                             │   next_id        │
//!                                             └──────────────────┘
//! ```
//!
//! ## Content tree
//!
//! ```text
//! feed/2024/_index.md
//! feed/2024/03/_index.md
//! feed/2024/03/05/_index.md
//! feed/2024/03/05/17.md
//! ```
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | TOML configuration parsing |
//! | [`models`] | Core data types |
//! | [`normalize`] | Text cleanup and tag extraction |
//! | [`next_id`] | Next identifier recovery |
//! | [`connector_fs`] | Queue directory scanner |
//! | [`tree`] | Content tree writer |
//! | [`ingest`] | Batch orchestration |

pub mod config;
pub mod connector_fs;
pub mod ingest;
pub mod models;
pub mod next_id;
pub mod normalize;
pub mod tree;
