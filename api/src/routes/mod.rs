//! HTTP route handlers

pub mod worklogs;
