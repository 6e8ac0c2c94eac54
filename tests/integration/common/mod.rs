//! Общие утилиты для интеграционных тестов

use sqlscan::lexer::{Lexer, Scanner, TokenKind};

/// Виды токенов из результата разбора
pub fn token_kinds(lexer: &Lexer, input: &str) -> sqlscan::Result<Vec<TokenKind>> {
    Ok(lexer
        .tokenize_str(input)?
        .iter()
        .map(|token| token.kind)
        .collect())
}

/// Склеивает текст всех совпадений, включая пропущенные, до терминального результата
///
/// Возвращает восстановленный текст и смещение ошибки, если она была.
pub fn concat_lexemes(scanner: &mut Scanner<'_, '_>) -> (Vec<u8>, Option<usize>) {
    let mut rebuilt = Vec::new();
    loop {
        match scanner.next_lexeme() {
            Ok(Some(lexeme)) => rebuilt.extend_from_slice(lexeme.text),
            Ok(None) => return (rebuilt, None),
            Err(err) => return (rebuilt, Some(err.offset())),
        }
    }
}
