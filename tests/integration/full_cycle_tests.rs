//! Тесты полного цикла разбора

use super::common::*;
use sqlscan::common::{CommentMode, ScannerConfig};
use sqlscan::lexer::{Lexer, Position, TokenKind};
use sqlscan::{Error, Result, SAMPLE_QUERY};

#[test]
fn test_nested_select() -> Result<()> {
    let lexer = Lexer::sql()?;
    let kinds = token_kinds(&lexer, "select t.a from (select a from tb) as t")?;

    assert_eq!(
        kinds,
        vec![
            TokenKind::Select,
            TokenKind::Field,
            TokenKind::From,
            TokenKind::LeftParen,
            TokenKind::Select,
            TokenKind::Id,
            TokenKind::From,
            TokenKind::Id,
            TokenKind::RightParen,
            TokenKind::As,
            TokenKind::Id,
        ]
    );
    Ok(())
}

#[test]
fn test_token_text_and_spans() -> Result<()> {
    let source = "select t.a from (select a from tb) as t";
    let lexer = Lexer::sql()?;

    for token in lexer.tokenize_str(source)? {
        assert_eq!(&source.as_bytes()[token.span()], token.lexeme);
        assert_eq!(token.end.offset - token.start.offset, token.len());
    }
    Ok(())
}

#[test]
fn test_sample_query() -> Result<()> {
    let lexer = Lexer::sql()?;
    let tokens = lexer.tokenize_str(SAMPLE_QUERY)?;

    let comments: Vec<_> = tokens
        .iter()
        .filter(|t| t.kind == TokenKind::Comment)
        .collect();
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].text(), "// haha cc\n");
    assert_eq!(comments[1].text(), "/* comm */");
    assert_eq!(tokens.last().map(|t| t.kind), Some(TokenKind::Id));
    Ok(())
}

#[test]
fn test_comment_mode_skip() -> Result<()> {
    let config = ScannerConfig {
        comments: CommentMode::Skip,
        ..Default::default()
    };
    let lexer = Lexer::with_config(&config)?;
    let tokens = lexer.tokenize_str(SAMPLE_QUERY)?;

    assert!(tokens.iter().all(|t| t.kind != TokenKind::Comment));
    assert_eq!(tokens.len(), 11);
    Ok(())
}

#[test]
fn test_quoted_pieces() -> Result<()> {
    let lexer = Lexer::sql()?;
    let kinds = token_kinds(&lexer, "select `col` from tb as \"\"")?;

    assert_eq!(
        kinds,
        vec![
            TokenKind::Select,
            TokenKind::Backtick,
            TokenKind::Id,
            TokenKind::Backtick,
            TokenKind::From,
            TokenKind::Id,
            TokenKind::As,
            TokenKind::EmptyQuote,
        ]
    );
    Ok(())
}

#[test]
fn test_error_reports_position() -> Result<()> {
    let lexer = Lexer::sql()?;
    match lexer.tokenize_str("select a\nfrom tb;") {
        Err(Error::UnconsumedInput(err)) => {
            assert_eq!(err.position, Position::new(2, 8, 16));
            assert_eq!(err.byte, b';');
        }
        other => panic!("expected unconsumed input, got {:?}", other),
    }
    Ok(())
}

#[test]
fn test_configuration_errors_are_fatal() {
    let mut builder = Lexer::builder();
    builder
        .rule("[a-z]+", sqlscan::lexer::Action::Emit(TokenKind::Id))
        .rule("x?", sqlscan::lexer::Action::Skip);

    let err = builder.build().unwrap_err();
    assert!(err.is_configuration());
    assert!(matches!(err, Error::EmptyMatch { rule: 1 }));
}
