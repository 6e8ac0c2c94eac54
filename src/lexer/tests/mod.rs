//! Тесты лексера sqlscan
