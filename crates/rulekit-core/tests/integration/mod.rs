//! Integration tests for rule creation, evaluation and the rule catalog

mod catalog_tests;
mod config_tests;
mod engine_tests;
