//! Токены для SQL лексера sqlscan
//!
//! Определяет закрытый набор видов токенов, позицию в исходном тексте
//! и сам токен, который ссылается на байты исходного буфера.

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Позиция в исходном тексте
///
/// Строки и колонки нумеруются с 1, колонка считается в байтах.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl Position {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    pub fn start() -> Self {
        Self::new(1, 1, 0)
    }

    /// Сдвигает позицию за переданные байты
    pub fn advance(&mut self, bytes: &[u8]) {
        for &b in bytes {
            if b == b'\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
        self.offset += bytes.len();
    }

    /// Вычисляет позицию смещения `offset` в буфере `input`
    pub fn locate(input: &[u8], offset: usize) -> Self {
        let mut position = Self::start();
        position.advance(&input[..offset.min(input.len())]);
        position
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Виды токенов
///
/// Порядок вариантов совпадает с порядком регистрации в каталоге:
/// структурные, затем ключевые слова, затем литералы. Дискриминант
/// является стабильным идентификатором вида.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum TokenKind {
    // === Структурные ===
    Comment = 0,
    Id = 1,
    Field = 2,

    // === Ключевые слова ===
    Select = 3,
    From = 4,
    As = 5,

    // === Литералы ===
    EmptyQuote = 6,
    Quote = 7,
    Backtick = 8,
    LeftParen = 9,
    RightParen = 10,
}

impl TokenKind {
    /// Все виды в порядке каталога
    pub const ALL: [TokenKind; 11] = [
        TokenKind::Comment,
        TokenKind::Id,
        TokenKind::Field,
        TokenKind::Select,
        TokenKind::From,
        TokenKind::As,
        TokenKind::EmptyQuote,
        TokenKind::Quote,
        TokenKind::Backtick,
        TokenKind::LeftParen,
        TokenKind::RightParen,
    ];

    pub const STRUCTURAL: [TokenKind; 3] = [TokenKind::Comment, TokenKind::Id, TokenKind::Field];

    pub const KEYWORDS: [TokenKind; 3] = [TokenKind::Select, TokenKind::From, TokenKind::As];

    pub const LITERALS: [TokenKind; 5] = [
        TokenKind::EmptyQuote,
        TokenKind::Quote,
        TokenKind::Backtick,
        TokenKind::LeftParen,
        TokenKind::RightParen,
    ];

    /// Стабильный числовой идентификатор
    pub fn id(self) -> usize {
        self as usize
    }

    /// Имя вида; для литералов совпадает с их текстом
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Comment => "COMMENT",
            TokenKind::Id => "ID",
            TokenKind::Field => "FIELD",
            TokenKind::Select => "SELECT",
            TokenKind::From => "FROM",
            TokenKind::As => "AS",
            TokenKind::EmptyQuote => "\"\"",
            TokenKind::Quote => "'",
            TokenKind::Backtick => "`",
            TokenKind::LeftParen => "(",
            TokenKind::RightParen => ")",
        }
    }

    pub fn from_name(name: &str) -> Option<TokenKind> {
        Self::ALL.iter().copied().find(|kind| kind.name() == name)
    }

    pub fn from_id(id: usize) -> Option<TokenKind> {
        Self::ALL.get(id).copied()
    }

    pub fn is_keyword(self) -> bool {
        matches!(self, TokenKind::Select | TokenKind::From | TokenKind::As)
    }

    pub fn is_literal(self) -> bool {
        self.id() >= TokenKind::EmptyQuote.id()
    }

    pub fn is_structural(self) -> bool {
        self.id() <= TokenKind::Field.id()
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Токен, ссылающийся на исходный буфер
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'s> {
    pub kind: TokenKind,
    pub lexeme: &'s [u8],
    pub start: Position,
    pub end: Position,
}

impl<'s> Token<'s> {
    pub fn new(kind: TokenKind, lexeme: &'s [u8], start: Position, end: Position) -> Self {
        Self {
            kind,
            lexeme,
            start,
            end,
        }
    }

    /// Текст токена; невалидный UTF-8 заменяется символом замены
    pub fn text(&self) -> Cow<'s, str> {
        String::from_utf8_lossy(self.lexeme)
    }

    /// Диапазон байтов токена в исходном буфере
    pub fn span(&self) -> std::ops::Range<usize> {
        self.start.offset..self.end.offset
    }

    pub fn len(&self) -> usize {
        self.lexeme.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lexeme.is_empty()
    }

    pub fn to_record(&self) -> TokenRecord {
        TokenRecord::from(self)
    }
}

impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({:?}) at {}", self.kind, self.text(), self.start)
    }
}

/// Владеющая копия токена для вывода и сериализации
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRecord {
    pub kind: String,
    pub id: usize,
    pub text: String,
    pub start: Position,
    pub end: Position,
}

impl From<&Token<'_>> for TokenRecord {
    fn from(token: &Token<'_>) -> Self {
        Self {
            kind: token.kind.name().to_string(),
            id: token.kind.id(),
            text: token.text().into_owned(),
            start: token.start,
            end: token.end,
        }
    }
}
