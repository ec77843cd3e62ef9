//! Unit test suite for pybootstrap
//!
//! Properties of the pure building blocks, checked over whole tables of
//! inputs rather than single examples.
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! - **requirement_laws**: formatter idempotence and the formatter/extractor inverse law
//! - **classifier**: conflict classification never fails on arbitrary text

mod classifier;
mod requirement_laws;
