//! Лексический анализатор SQL для sqlscan
//!
//! `Lexer` хранит каталог, таблицу правил и скомпилированный движок. После
//! построения он неизменяем, поэтому один лексер можно разделять между
//! потоками и создавать из него сколько угодно независимых сканеров.

use crate::common::{Error, Result, ScannerConfig};
use crate::lexer::catalog::TokenCatalog;
use crate::lexer::pattern::{Matcher, NfaMatcher};
use crate::lexer::rules::{Action, RuleTable, RuleTableBuilder};
use crate::lexer::scanner::{Scanner, UnconsumedInput};
use crate::lexer::token::{Token, TokenKind};

/// Скомпилированный лексер
#[derive(Debug, Clone)]
pub struct Lexer<M: Matcher = NfaMatcher> {
    catalog: TokenCatalog,
    rules: RuleTable,
    matcher: M,
}

impl Lexer<NfaMatcher> {
    /// Лексер для SQL подмножества с настройками по умолчанию
    pub fn sql() -> Result<Self> {
        Self::with_config(&ScannerConfig::default())
    }

    /// Лексер для SQL подмножества
    pub fn with_config(config: &ScannerConfig) -> Result<Self> {
        let catalog = TokenCatalog::sql()?;
        let rules = RuleTable::sql(&catalog, config.comments)?;
        Self::from_rules(catalog, rules)
    }

    /// Компилирует произвольную таблицу правил
    pub fn from_rules(catalog: TokenCatalog, rules: RuleTable) -> Result<Self> {
        let matcher = NfaMatcher::compile(&rules)?;
        Self::with_matcher(catalog, rules, matcher)
    }

    pub fn builder() -> LexerBuilder {
        LexerBuilder::default()
    }
}

impl<M: Matcher> Lexer<M> {
    /// Собирает лексер из уже скомпилированного движка
    pub fn with_matcher(catalog: TokenCatalog, rules: RuleTable, matcher: M) -> Result<Self> {
        for rule in &rules {
            if let Action::Emit(kind) = rule.action {
                if !catalog.contains(kind) {
                    return Err(Error::unknown_token(kind.name()));
                }
            }
        }
        if matcher.rule_count() != rules.len() {
            return Err(Error::configuration(format!(
                "matcher compiled from {} rules, table has {}",
                matcher.rule_count(),
                rules.len()
            )));
        }

        log::debug!(
            "Лексер готов: {} видов токенов, {} правил",
            catalog.len(),
            rules.len()
        );
        Ok(Self {
            catalog,
            rules,
            matcher,
        })
    }

    /// Создает сканер для буфера
    pub fn scanner<'s>(&self, input: &'s [u8]) -> Scanner<'_, 's, M> {
        Scanner::from_parts(&self.rules, &self.matcher, input)
    }

    /// Возвращает все токены или первую ошибку нераспознанного ввода
    pub fn tokenize<'s>(&self, input: &'s [u8]) -> Result<Vec<Token<'s>>> {
        let mut scanner = self.scanner(input);
        let mut tokens = Vec::new();
        while let Some(token) = scanner.next_token()? {
            tokens.push(token);
        }
        Ok(tokens)
    }

    pub fn tokenize_str<'s>(&self, input: &'s str) -> Result<Vec<Token<'s>>> {
        self.tokenize(input.as_bytes())
    }

    /// Сканирует до конца, пропуская по одному байту после каждой ошибки
    pub fn tokenize_recovering<'s>(&self, input: &'s [u8]) -> (Vec<Token<'s>>, Vec<UnconsumedInput>) {
        let mut scanner = self.scanner(input);
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        loop {
            match scanner.next_token() {
                Ok(Some(token)) => tokens.push(token),
                Ok(None) => break,
                Err(err) => {
                    errors.push(err);
                    scanner.skip_unconsumed();
                }
            }
        }
        (tokens, errors)
    }

    pub fn catalog(&self) -> &TokenCatalog {
        &self.catalog
    }

    pub fn rules(&self) -> &RuleTable {
        &self.rules
    }

    pub fn matcher(&self) -> &M {
        &self.matcher
    }
}

/// Построитель лексера с собственными правилами
#[derive(Debug, Clone, Default)]
pub struct LexerBuilder {
    catalog: Option<TokenCatalog>,
    rules: RuleTableBuilder,
}

impl LexerBuilder {
    /// Каталог видов; по умолчанию используется `TokenCatalog::sql()`
    pub fn catalog(&mut self, catalog: TokenCatalog) -> &mut Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn rule(&mut self, pattern: impl Into<String>, action: Action) -> &mut Self {
        self.rules.add(pattern, action);
        self
    }

    pub fn literal(&mut self, text: &str, kind: TokenKind) -> &mut Self {
        self.rules.literal(text, kind);
        self
    }

    pub fn keyword(&mut self, text: &str, kind: TokenKind) -> &mut Self {
        self.rules.keyword(text, kind);
        self
    }

    pub fn build(&mut self) -> Result<Lexer> {
        let catalog = match self.catalog.take() {
            Some(catalog) => catalog,
            None => TokenCatalog::sql()?,
        };
        Lexer::from_rules(catalog, self.rules.build())
    }
}
