//! End-to-end tests live in `tests/`; this crate has no runtime code.
