// ABOUTME: Shared test helpers and utilities for integration tests
// ABOUTME: Exports the axum request harness and fake integrations
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(dead_code)]

pub mod axum_test;
pub mod test_utils;
