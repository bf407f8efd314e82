//! Shared test utilities for lpbuilder integration tests.
//!
//! This module provides:
//! - `TestHarness` for scratch directories holding input files and downloads
//! - `FakeBuildServer`, an in-process build service speaking the real protocol
//! - Builders for zip fixtures, configs and scripted build services

pub mod builders;
pub mod harness;

pub use builders::*;
pub use harness::{FakeBuildServer, FakeReply, ReceivedPart, TestHarness};
