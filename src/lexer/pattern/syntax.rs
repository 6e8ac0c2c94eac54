//! Разбор шаблонов правил
//!
//! Поддерживается небольшое подмножество: литеральные байты, экранирование
//! через `\`, `.` (любой байт кроме перевода строки), классы `[...]` с
//! диапазонами и отрицанием `^`, группы `(...)`, альтернатива `|` и
//! постфиксные `*`, `+`, `?`.

use crate::common::{Error, Result};

/// Множество байтов
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ByteSet([u64; 4]);

impl ByteSet {
    pub fn empty() -> Self {
        Self([0; 4])
    }

    pub fn single(byte: u8) -> Self {
        let mut set = Self::empty();
        set.insert(byte);
        set
    }

    /// Любой байт кроме `\n`
    pub fn any_but_newline() -> Self {
        let mut set = Self::single(b'\n');
        set.negate();
        set
    }

    pub fn insert(&mut self, byte: u8) {
        self.0[(byte >> 6) as usize] |= 1u64 << (byte & 63);
    }

    pub fn insert_range(&mut self, from: u8, to: u8) {
        for byte in from..=to {
            self.insert(byte);
        }
    }

    pub fn contains(&self, byte: u8) -> bool {
        self.0[(byte >> 6) as usize] & (1u64 << (byte & 63)) != 0
    }

    pub fn negate(&mut self) {
        for word in &mut self.0 {
            *word = !*word;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|word| *word == 0)
    }
}

/// Дерево разобранного шаблона
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Ast {
    Empty,
    Bytes(ByteSet),
    Concat(Vec<Ast>),
    Alternate(Vec<Ast>),
    Star(Box<Ast>),
    Plus(Box<Ast>),
    Optional(Box<Ast>),
}

/// Разбирает шаблон правила с индексом `rule`
pub fn parse(pattern: &str, rule: usize) -> Result<Ast> {
    if pattern.is_empty() {
        return Err(Error::pattern(rule, 0, "empty pattern"));
    }
    let mut parser = PatternParser {
        input: pattern.as_bytes(),
        position: 0,
        rule,
    };
    let ast = parser.parse_alternation()?;
    match parser.peek() {
        None => Ok(ast),
        Some(b')') => Err(parser.error("unmatched ')'")),
        Some(byte) => Err(parser.error(format!("unexpected '{}'", byte as char))),
    }
}

struct PatternParser<'p> {
    input: &'p [u8],
    position: usize,
    rule: usize,
}

impl PatternParser<'_> {
    fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    fn bump(&mut self) -> Option<u8> {
        let byte = self.peek()?;
        self.position += 1;
        Some(byte)
    }

    fn error(&self, message: impl Into<String>) -> Error {
        Error::pattern(self.rule, self.position, message)
    }

    fn parse_alternation(&mut self) -> Result<Ast> {
        let mut branches = vec![self.parse_concat()?];
        while self.peek() == Some(b'|') {
            self.position += 1;
            branches.push(self.parse_concat()?);
        }
        Ok(if branches.len() == 1 {
            branches.remove(0)
        } else {
            Ast::Alternate(branches)
        })
    }

    fn parse_concat(&mut self) -> Result<Ast> {
        let mut items = Vec::new();
        while let Some(byte) = self.peek() {
            if byte == b'|' || byte == b')' {
                break;
            }
            items.push(self.parse_repeat()?);
        }
        Ok(match items.len() {
            0 => Ast::Empty,
            1 => items.remove(0),
            _ => Ast::Concat(items),
        })
    }

    fn parse_repeat(&mut self) -> Result<Ast> {
        let mut ast = self.parse_atom()?;
        loop {
            ast = match self.peek() {
                Some(b'*') => Ast::Star(Box::new(ast)),
                Some(b'+') => Ast::Plus(Box::new(ast)),
                Some(b'?') => Ast::Optional(Box::new(ast)),
                _ => return Ok(ast),
            };
            self.position += 1;
        }
    }

    fn parse_atom(&mut self) -> Result<Ast> {
        let start = self.position;
        let byte = self
            .bump()
            .ok_or_else(|| self.error("unexpected end of pattern"))?;
        match byte {
            b'(' => {
                let inner = self.parse_alternation()?;
                if self.bump() != Some(b')') {
                    return Err(Error::pattern(self.rule, start, "unclosed group"));
                }
                Ok(inner)
            }
            b'[' => self.parse_class(start).map(Ast::Bytes),
            b'.' => Ok(Ast::Bytes(ByteSet::any_but_newline())),
            b'\\' => self.parse_escape().map(|b| Ast::Bytes(ByteSet::single(b))),
            b'*' | b'+' | b'?' => Err(Error::pattern(self.rule, start, "nothing to repeat")),
            b'^' | b'$' | b'{' | b'}' => Err(Error::pattern(
                self.rule,
                start,
                format!("unsupported operator '{}'", byte as char),
            )),
            literal => Ok(Ast::Bytes(ByteSet::single(literal))),
        }
    }

    fn parse_escape(&mut self) -> Result<u8> {
        match self.bump() {
            Some(b'n') => Ok(b'\n'),
            Some(b't') => Ok(b'\t'),
            Some(b'r') => Ok(b'\r'),
            Some(b'0') => Ok(0),
            Some(other) => Ok(other),
            None => Err(self.error("dangling escape")),
        }
    }

    fn parse_class(&mut self, start: usize) -> Result<ByteSet> {
        let mut set = ByteSet::empty();
        let negated = if self.peek() == Some(b'^') {
            self.position += 1;
            true
        } else {
            false
        };

        loop {
            let from = match self.bump() {
                None => return Err(Error::pattern(self.rule, start, "unclosed class")),
                Some(b']') => break,
                Some(b'\\') => self.parse_escape()?,
                Some(byte) => byte,
            };

            let after_dash = self.input.get(self.position + 1).copied();
            let is_range = self.peek() == Some(b'-') && !matches!(after_dash, None | Some(b']'));
            if !is_range {
                set.insert(from);
                continue;
            }

            self.position += 1;
            let to = match self.bump() {
                Some(b'\\') => self.parse_escape()?,
                Some(byte) => byte,
                None => return Err(Error::pattern(self.rule, start, "unclosed class")),
            };
            if to < from {
                return Err(self.error(format!(
                    "invalid range '{}-{}'",
                    from as char, to as char
                )));
            }
            set.insert_range(from, to);
        }

        if set.is_empty() {
            return Err(Error::pattern(self.rule, start, "empty class"));
        }
        if negated {
            set.negate();
        }
        Ok(set)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn set_of(ast: &Ast) -> ByteSet {
        match ast {
            Ast::Bytes(set) => *set,
            other => panic!("expected byte set, got {:?}", other),
        }
    }

    #[test]
    fn test_literal_concat() {
        let ast = parse("ab", 0).unwrap();
        assert_eq!(
            ast,
            Ast::Concat(vec![
                Ast::Bytes(ByteSet::single(b'a')),
                Ast::Bytes(ByteSet::single(b'b')),
            ])
        );
    }

    #[test]
    fn test_class_ranges_and_negation() {
        let set = set_of(&parse("[a-cX_]", 0).unwrap());
        assert!(set.contains(b'b'));
        assert!(set.contains(b'X'));
        assert!(set.contains(b'_'));
        assert!(!set.contains(b'd'));

        let set = set_of(&parse(r"[^*/]", 0).unwrap());
        assert!(!set.contains(b'*'));
        assert!(!set.contains(b'/'));
        assert!(set.contains(b'\n'));

        let set = set_of(&parse("[a-]", 0).unwrap());
        assert!(set.contains(b'-'));
    }

    #[test]
    fn test_escapes() {
        assert_eq!(set_of(&parse(r"\n", 0).unwrap()), ByteSet::single(b'\n'));
        assert_eq!(set_of(&parse(r"\(", 0).unwrap()), ByteSet::single(b'('));
        let dot = set_of(&parse(".", 0).unwrap());
        assert!(dot.contains(b'x'));
        assert!(!dot.contains(b'\n'));
    }

    #[test]
    fn test_repeat_and_alternation() {
        let ast = parse("a|b*", 0).unwrap();
        assert!(matches!(ast, Ast::Alternate(ref branches) if branches.len() == 2));
        assert!(matches!(parse("(ab)+", 0).unwrap(), Ast::Plus(_)));
        assert!(matches!(parse("a?", 0).unwrap(), Ast::Optional(_)));
    }

    #[test]
    fn test_malformed_patterns() {
        let cases = [
            ("", "empty pattern"),
            ("(ab", "unclosed group"),
            ("ab)", "unmatched ')'"),
            ("[ab", "unclosed class"),
            ("*a", "nothing to repeat"),
            ("a\\", "dangling escape"),
            ("[z-a]", "invalid range"),
            ("a{2}", "unsupported operator"),
        ];
        for (pattern, expected) in cases {
            match parse(pattern, 7) {
                Err(Error::Pattern { rule, message, .. }) => {
                    assert_eq!(rule, 7);
                    assert!(
                        message.contains(expected),
                        "pattern {:?}: {}",
                        pattern,
                        message
                    );
                }
                other => panic!("pattern {:?}: expected error, got {:?}", pattern, other),
            }
        }
    }

    #[test]
    fn test_error_position() {
        match parse("ab(cd", 0) {
            Err(Error::Pattern { position, .. }) => assert_eq!(position, 2),
            other => panic!("expected pattern error, got {:?}", other),
        }
    }
}
