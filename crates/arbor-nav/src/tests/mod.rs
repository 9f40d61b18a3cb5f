//! Shared fixtures and cross-module unit tests.

mod unit;
