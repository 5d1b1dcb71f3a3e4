// Copyright 2026 Filmstat Contributors
// SPDX-License-Identifier: Apache-2.0

//! Filmstat library — scrape a box-office table and answer four fixed questions.
//!
//! This library crate exposes the core modules for integration testing.

pub mod analysis;
pub mod error;
pub mod fetch;
pub mod plot;
pub mod rest;
pub mod stats;
pub mod table;
