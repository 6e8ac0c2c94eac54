//! Таблица правил лексера
//!
//! Правило связывает шаблон с действием: выдать токен заданного вида или
//! пропустить совпадение. Позиция правила в таблице является его приоритетом:
//! при равной длине совпадения побеждает правило с меньшим индексом.

use crate::common::{CommentMode, Result};
use crate::lexer::catalog::TokenCatalog;
use crate::lexer::token::TokenKind;
use std::fmt;

/// Однострочный комментарий; перевод строки в конце входа необязателен
pub const LINE_COMMENT_PATTERN: &str = r"//[^\n]*\n?";

/// Блочный комментарий без вложенности
pub const BLOCK_COMMENT_PATTERN: &str = r"/\*([^*]|\*+[^*/])*\*+/";

/// Идентификатор
pub const IDENTIFIER_PATTERN: &str = r"[a-zA-Z0-9_]+";

/// Поле с квалификатором: `t.a`
pub const FIELD_PATTERN: &str = r"[a-zA-Z0-9_]+\.[a-zA-Z0-9_]+";

/// Пробельные символы
pub const WHITESPACE_PATTERN: &str = r"[ \t\n\r]+";

/// Символы, имеющие особый смысл в языке шаблонов
const META_CHARACTERS: &[char] = &[
    '\\', '.', '[', ']', '(', ')', '|', '*', '+', '?', '^', '$', '{', '}',
];

/// Действие правила
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Выдать токен указанного вида
    Emit(TokenKind),
    /// Пропустить совпадение
    Skip,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Emit(kind) => write!(f, "emit {}", kind),
            Action::Skip => write!(f, "skip"),
        }
    }
}

/// Правило лексера
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rule {
    pub pattern: String,
    pub action: Action,
    pub priority: usize,
}

/// Упорядоченная таблица правил
#[derive(Debug, Clone, Default)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    pub fn builder() -> RuleTableBuilder {
        RuleTableBuilder::default()
    }

    /// Стандартная таблица правил для SQL подмножества
    pub fn sql(catalog: &TokenCatalog, comments: CommentMode) -> Result<Self> {
        let mut builder = Self::builder();

        for kind in TokenKind::LITERALS {
            builder.literal(kind.name(), catalog.lookup(kind.name())?);
        }

        for kind in TokenKind::KEYWORDS {
            builder.keyword(kind.name(), catalog.lookup(kind.name())?);
        }

        let comment = match comments {
            CommentMode::Emit => Action::Emit(catalog.lookup("COMMENT")?),
            CommentMode::Skip => Action::Skip,
        };
        builder
            .add(LINE_COMMENT_PATTERN, comment)
            .add(BLOCK_COMMENT_PATTERN, comment)
            .add(IDENTIFIER_PATTERN, Action::Emit(catalog.lookup("ID")?))
            .add(FIELD_PATTERN, Action::Emit(catalog.lookup("FIELD")?))
            .add(WHITESPACE_PATTERN, Action::Skip);

        Ok(builder.build())
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn get(&self, priority: usize) -> Option<&Rule> {
        self.rules.get(priority)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Rule> {
        self.rules.iter()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

impl<'a> IntoIterator for &'a RuleTable {
    type Item = &'a Rule;
    type IntoIter = std::slice::Iter<'a, Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.iter()
    }
}

/// Построитель таблицы правил; приоритет равен порядку добавления
#[derive(Debug, Clone, Default)]
pub struct RuleTableBuilder {
    rules: Vec<Rule>,
}

impl RuleTableBuilder {
    /// Добавляет правило с произвольным шаблоном
    pub fn add(&mut self, pattern: impl Into<String>, action: Action) -> &mut Self {
        let priority = self.rules.len();
        self.rules.push(Rule {
            pattern: pattern.into(),
            action,
            priority,
        });
        self
    }

    /// Добавляет правило, совпадающее с текстом посимвольно
    pub fn literal(&mut self, text: &str, kind: TokenKind) -> &mut Self {
        self.add(escape_literal(text), Action::Emit(kind))
    }

    /// Добавляет ключевое слово без учета регистра
    pub fn keyword(&mut self, text: &str, kind: TokenKind) -> &mut Self {
        self.add(keyword_pattern(text), Action::Emit(kind))
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn build(&mut self) -> RuleTable {
        RuleTable {
            rules: std::mem::take(&mut self.rules),
        }
    }
}

/// Экранирует метасимволы языка шаблонов
pub fn escape_literal(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() * 2);
    for ch in text.chars() {
        if META_CHARACTERS.contains(&ch) {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

/// Шаблон ключевого слова: каждая буква превращается в класс `[xX]`
pub fn keyword_pattern(keyword: &str) -> String {
    let mut pattern = String::with_capacity(keyword.len() * 4);
    for ch in keyword.to_lowercase().chars() {
        if ch.is_ascii_alphabetic() {
            pattern.push('[');
            pattern.push(ch);
            pattern.push(ch.to_ascii_uppercase());
            pattern.push(']');
        } else {
            pattern.push_str(&escape_literal(ch.encode_utf8(&mut [0; 4])));
        }
    }
    pattern
}
