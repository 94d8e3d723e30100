//! Integration tests against a live memoQ Server.
//!
//! These tests require a reachable server and are ignored by default.
//!
//! # Running Tests
//!
//! 1. Create a `.env` file in the project root with the variables listed in
//!    [`memoq`]
//! 2. Run with: `cargo test -- --ignored`
