//! Core domain types
//!
//! This module contains the core domain structures used across the service.
//! These types are shared between the job store (which owns them) and the
//! API layer (which renders snapshots of them).

pub mod job;
