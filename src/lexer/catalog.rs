//! Каталог видов токенов
//!
//! Связывает имена токенов с видами `TokenKind`. Заполняется один раз при
//! инициализации и дальше только читается.

use crate::common::{Error, Result};
use crate::lexer::token::TokenKind;
use std::collections::HashMap;

/// Каталог зарегистрированных видов токенов
#[derive(Debug, Clone, Default)]
pub struct TokenCatalog {
    kinds: Vec<TokenKind>,
    by_name: HashMap<&'static str, TokenKind>,
}

impl TokenCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Стандартный каталог: структурные виды, ключевые слова, литералы
    pub fn sql() -> Result<Self> {
        let mut catalog = Self::new();
        for kind in TokenKind::STRUCTURAL
            .iter()
            .chain(TokenKind::KEYWORDS.iter())
            .chain(TokenKind::LITERALS.iter())
        {
            catalog.register(kind.name())?;
        }
        Ok(catalog)
    }

    /// Регистрирует имя токена и возвращает его вид
    pub fn register(&mut self, name: &str) -> Result<TokenKind> {
        let kind = TokenKind::from_name(name).ok_or_else(|| Error::unknown_token(name))?;
        if self.by_name.contains_key(kind.name()) {
            return Err(Error::duplicate_token(name));
        }
        self.by_name.insert(kind.name(), kind);
        self.kinds.push(kind);
        Ok(kind)
    }

    /// Ищет вид по имени
    pub fn lookup(&self, name: &str) -> Result<TokenKind> {
        self.by_name
            .get(name)
            .copied()
            .ok_or_else(|| Error::unknown_token(name))
    }

    pub fn contains(&self, kind: TokenKind) -> bool {
        self.by_name.contains_key(kind.name())
    }

    /// Виды в порядке регистрации
    pub fn kinds(&self) -> &[TokenKind] {
        &self.kinds
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }
}
