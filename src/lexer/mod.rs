//! Лексер SQL подмножества для sqlscan

pub mod catalog;
pub mod lexer;
pub mod pattern;
pub mod rules;
pub mod scanner;
pub mod token;

#[cfg(test)]
mod tests;

// Переэкспортируем основные типы
pub use catalog::TokenCatalog;
pub use lexer::{Lexer, LexerBuilder};
pub use pattern::{Match, Matcher, NfaMatcher};
pub use rules::{Action, Rule, RuleTable, RuleTableBuilder};
pub use scanner::{Lexeme, ScanState, Scanner, UnconsumedInput};
pub use token::{Position, Token, TokenKind, TokenRecord};
