// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests Entry Point
//!
//! This test suite uses proptest to verify properties of parameter
//! canonicalization and the diff engine that must hold for all inputs.

mod property;
