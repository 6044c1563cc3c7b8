//! Shared test support for exporter integration tests

pub mod mocks;
