// Copyright (c) 2025 - Cowboy AI, Inc.
//! Topology Domain Models
//!
//! Value objects shared by the topology map, the diff engine and the
//! reconciler.
//!
//! # Value Objects with Invariants
//!
//! - [`EdgeId`] - Directed `(backend, frontend)` attachment identity
//! - [`MacAddress`] - Canonical lowercase colon-separated hardware address
//! - [`Parameters`] - Per-attachment configuration compared by canonical string

pub mod edge;
pub mod network;
pub mod parameters;

pub use edge::EdgeId;
pub use network::MacAddress;
pub use parameters::Parameters;
