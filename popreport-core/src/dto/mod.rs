//! Data Transfer Objects for the HTTP surface
//!
//! This module contains the request and response bodies exchanged with
//! callers of the service. They are kept separate from the domain types so
//! the wire format can stay stable while the job record grows.

pub mod report;
