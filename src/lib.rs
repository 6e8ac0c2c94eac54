//! sqlscan - лексер SQL подмножества на таблице правил
//!
//! Упорядоченная таблица правил компилируется один раз в автомат, после чего
//! сканер проходит по буферу и выдает токены по принципу самого длинного
//! совпадения; при равной длине побеждает правило, добавленное раньше.
//!
//! ```
//! use sqlscan::lexer::{Lexer, TokenKind};
//!
//! let lexer = Lexer::sql().unwrap();
//! let tokens = lexer.tokenize(b"select t.a from tb").unwrap();
//! assert_eq!(tokens[1].kind, TokenKind::Field);
//! ```

pub mod cli;
pub mod common;
pub mod lexer;

pub use common::error::{Error, Result};
pub use lexer::{Lexer, Token, TokenKind};

/// Версия библиотеки
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Пример запроса, который разбирается без аргументов командной строки
pub const SAMPLE_QUERY: &str = "select t.a
     // haha cc
\t/* comm */ from (select a from tb) as t";
