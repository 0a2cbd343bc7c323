//! Trip Booking - capacity-limited trips with owners and participants
//!
//! Registered users create trips, join and leave them as participants, and
//! manage them as owners. Every mutation of a trip is checked against who is
//! acting and runs under a per-trip lock, so concurrent joins can never
//! overbook a trip and concurrent edits never interleave.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
