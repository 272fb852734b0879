//! Unit-level tests against the public library API

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod period_properties;
mod registry_concurrency;
mod store_persistence;
