//! Интеграционные тесты для sqlscan

pub mod common;
pub mod concurrency_tests;
pub mod full_cycle_tests;
pub mod reconstruction_tests;
