//! End-to-end tests through the HTTP router and service wiring

#![allow(clippy::unwrap_used, clippy::expect_used)]

mod reminder_flow_tests;
mod settings_api_tests;
mod support;
mod timer_api_tests;
