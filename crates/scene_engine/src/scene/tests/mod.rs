//! Scene-level integration tests

mod support;
