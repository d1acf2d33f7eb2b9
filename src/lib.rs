// Library target exists solely for the criterion benchmarks and the
// integration tests. The binary entry point is main.rs; this re-declares the
// module tree so harnesses can import via `typemaster::session::*`.
// Most code is only exercised through the binary, so suppress dead_code
// warnings.
#![allow(dead_code)]

// Public: used directly by benchmarks and integration tests
pub mod catalog;
pub mod certificate;
pub mod session;
pub mod store;

// Private: required transitively (won't compile without them)
mod app;
mod config;
mod event;
mod ui;
