//! Восстановление исходного текста из совпадений
//!
//! Склейка текста всех совпадений, включая пропущенные, должна давать
//! исходный буфер; при ошибке склейка равна префиксу до места ошибки.

use super::common::*;
use rand::prelude::*;
use rand::rngs::StdRng;
use sqlscan::lexer::Lexer;
use sqlscan::Result;

/// Фрагменты, из которых собираются корректные запросы
const FRAGMENTS: &[&str] = &[
    "select", "SELECT", "from", "As", "t.a", "tb", "col_1", "42", "(", ")", "'", "`", "\"\"",
    " ", "\t", "\n", "\r\n", "// note\n", "/* a * b */", "/**/",
];

/// Байты, из которых собирается произвольный ввод
const ALPHABET: &[u8] = b"aZ09_. \t\n/*()'`\"@;";

fn random_query(rng: &mut StdRng) -> String {
    let len = rng.random_range(0..40);
    let mut query = String::new();
    for _ in 0..len {
        let fragment = FRAGMENTS[rng.random_range(0..FRAGMENTS.len())];
        query.push_str(fragment);
        // Разделитель, чтобы соседние слова не слипались в другие токены
        query.push(' ');
    }
    query
}

fn random_bytes(rng: &mut StdRng) -> Vec<u8> {
    let len = rng.random_range(0..64);
    (0..len)
        .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())])
        .collect()
}

#[test]
fn test_valid_queries_reconstruct_exactly() -> Result<()> {
    let lexer = Lexer::sql()?;
    let mut rng = StdRng::seed_from_u64(0x5eed);

    for _ in 0..200 {
        let query = random_query(&mut rng);
        let mut scanner = lexer.scanner(query.as_bytes());
        let (rebuilt, failure) = concat_lexemes(&mut scanner);

        assert_eq!(failure, None, "query {:?}", query);
        assert_eq!(rebuilt, query.as_bytes());
    }
    Ok(())
}

#[test]
fn test_arbitrary_input_reconstructs_prefix() -> Result<()> {
    let lexer = Lexer::sql()?;
    let mut rng = StdRng::seed_from_u64(7);

    for _ in 0..500 {
        let input = random_bytes(&mut rng);
        let mut scanner = lexer.scanner(&input);
        let (rebuilt, failure) = concat_lexemes(&mut scanner);

        match failure {
            None => assert_eq!(rebuilt, input),
            Some(offset) => {
                assert_eq!(rebuilt.len(), offset);
                assert_eq!(&input[..offset], &rebuilt[..]);
                assert!(offset < input.len());
            }
        }
    }
    Ok(())
}

#[test]
fn test_recovering_scan_terminates() -> Result<()> {
    let lexer = Lexer::sql()?;
    let mut rng = StdRng::seed_from_u64(99);

    for _ in 0..200 {
        let input = random_bytes(&mut rng);
        let (tokens, errors) = lexer.tokenize_recovering(&input);

        let covered: usize = tokens.iter().map(|t| t.len()).sum();
        assert!(covered + errors.len() <= input.len());
        for pair in errors.windows(2) {
            assert!(pair[0].offset() < pair[1].offset());
        }
    }
    Ok(())
}
