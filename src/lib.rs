//! Tandem - loosely synchronized side-by-side video viewing.
//!
//! Tandem keeps two or three independently-owned embedded video players in
//! loose sync: play, pause and stop propagate across players, and seeking
//! one player re-bases the others by the same relative offset. The main
//! pieces are:
//!
//! - URL resolver extracting canonical video references
//! - Player adapter wrapping one embedded widget behind a uniform surface
//! - Sync coordinator state machine with seek debouncing and re-basing
//! - Session view composing players under one coordinator
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use tandem::config::TandemConfig;
//! use tandem::player::sim::SimulatedFactory;
//! use tandem::player::WidgetFactory;
//! use tandem::session::{PlayMode, SessionView, WatchRequest};
//!
//! # async fn demo() -> tandem::Result<()> {
//! let factory: Arc<dyn WidgetFactory> = Arc::new(SimulatedFactory::new());
//! let request = WatchRequest::from_urls(
//!     PlayMode::Video,
//!     &["https://youtu.be/abc123", "https://youtu.be/def456"],
//! );
//! let session = SessionView::mount(factory, request, &TandemConfig::default()).await?;
//! session.set_sync_enabled(true);
//! # Ok(())
//! # }
//! ```

/// Shared reactive primitives.
pub mod common;

/// Crate configuration with TOML loading.
pub mod config;

/// Core error types and result aliases.
pub mod core;

/// Player adapter over the embedded widget boundary.
pub mod player;

/// Video URL resolution.
pub mod resolver;

/// Session composition and the input/viewing handoff.
pub mod session;

/// The cross-player sync coordinator.
pub mod sync;

/// Tracing setup for binaries.
pub mod tracing_config;

/// Re-exported core types for convenience.
pub use core::{Result, TandemError};
