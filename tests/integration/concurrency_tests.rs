//! Разделение одного лексера между потоками

use sqlscan::lexer::{Lexer, TokenKind};
use sqlscan::Result;
use std::sync::Arc;
use std::thread;

#[test]
fn test_shared_lexer_across_threads() -> Result<()> {
    let lexer = Arc::new(Lexer::sql()?);
    let mut handles = Vec::new();

    for i in 0..8 {
        let lexer = Arc::clone(&lexer);
        handles.push(thread::spawn(move || -> Result<usize> {
            let query = format!("select t{i}.a from (select a from tb{i}) as t{i}");
            let mut count = 0;
            for _ in 0..50 {
                let tokens = lexer.tokenize_str(&query)?;
                assert_eq!(tokens[1].kind, TokenKind::Field);
                assert_eq!(tokens[1].text(), format!("t{i}.a"));
                count += tokens.len();
            }
            Ok(count)
        }));
    }

    for handle in handles {
        let count = handle.join().expect("scanner thread panicked")?;
        assert_eq!(count, 50 * 11);
    }
    Ok(())
}

#[test]
fn test_scoped_scanners_share_borrowed_lexer() -> Result<()> {
    let lexer = Lexer::sql()?;
    let inputs = ["select a", "from (b)", "as c // d"];

    let counts: Vec<usize> = thread::scope(|scope| {
        let handles: Vec<_> = inputs
            .iter()
            .map(|input| {
                let lexer = &lexer;
                scope.spawn(move || lexer.scanner(input.as_bytes()).count())
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("scanner thread panicked"))
            .collect()
    });

    assert_eq!(counts, vec![2, 4, 3]);
    Ok(())
}
