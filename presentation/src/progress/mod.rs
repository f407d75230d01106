//! Progress reporting for self-test runs

pub mod reporter;
