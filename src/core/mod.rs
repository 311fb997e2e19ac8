//! Core functionality module
//!
//! This module contains the platform-independent part of the photo widget:
//! the asset model, the collection and its manager, configuration, error
//! handling and teardown signalling.
//!
//! # Submodules
//!
//! - `asset` - Raw and encoded asset types
//! - `cancel` - Cancellation token fired on teardown
//! - `collection` - Ordered photo collection with the busy flag
//! - `config` - Configuration loading, saving, and management
//! - `error` - Error types and result aliases
//! - `manager` - Collection manager driving acquisition and removal

pub mod asset;
pub mod cancel;
pub mod collection;
pub mod config;
pub mod error;
pub mod manager;
