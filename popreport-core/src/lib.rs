//! Population Report Core
//!
//! Core types and computations for the population report service.
//!
//! This crate contains:
//! - Domain types: Core business entities (Job, status, result)
//! - DTOs: Data transfer objects for the HTTP surface
//! - Geo: Coordinate validation and geodesic buffering
//! - Payload: Request bodies for the external statistics service

pub mod domain;
pub mod dto;
pub mod geo;
pub mod payload;
