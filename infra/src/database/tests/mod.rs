//! Database module tests

#[cfg(test)]
mod connection_tests;
