//! Сканер: проход курсором по буферу
//!
//! На каждом шаге сканер спрашивает движок о самом длинном совпадении от
//! курсора, применяет действие правила и сдвигает курсор. Конец входа и
//! нераспознанный ввод являются терминальными результатами: повторные вызовы
//! возвращают тот же результат, пока вызывающий код явно не сдвинет курсор.

use crate::common::{Error, Result};
use crate::lexer::pattern::{Matcher, NfaMatcher};
use crate::lexer::rules::{Action, RuleTable};
use crate::lexer::token::{Position, Token};

/// Ни одно правило не совпало в позиции `position`
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unconsumed input at {position} (offset {}): byte {byte:#04x}", .position.offset)]
pub struct UnconsumedInput {
    /// Позиция первого нераспознанного байта
    pub position: Position,
    /// Нераспознанный байт
    pub byte: u8,
}

impl UnconsumedInput {
    pub fn offset(&self) -> usize {
        self.position.offset
    }

    /// Смещение сразу за нераспознанным байтом
    pub fn resume_offset(&self) -> usize {
        self.position.offset + 1
    }
}

/// Состояние сканера
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanState {
    Running,
    Done,
    Error(UnconsumedInput),
}

/// Совпадение любого правила, включая пропускаемые
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lexeme<'s> {
    pub rule: usize,
    pub action: Action,
    pub text: &'s [u8],
    pub start: Position,
    pub end: Position,
}

impl<'s> Lexeme<'s> {
    /// Токен, если правило его выдает
    pub fn token(&self) -> Option<Token<'s>> {
        match self.action {
            Action::Emit(kind) => Some(Token::new(kind, self.text, self.start, self.end)),
            Action::Skip => None,
        }
    }

    pub fn is_skipped(&self) -> bool {
        self.action == Action::Skip
    }
}

/// Сканер одного буфера
///
/// Сканер не владеет ни буфером, ни скомпилированными правилами.
pub struct Scanner<'l, 's, M: Matcher + ?Sized = NfaMatcher> {
    rules: &'l RuleTable,
    matcher: &'l M,
    input: &'s [u8],
    position: Position,
    state: ScanState,
}

impl<'l, 's, M: Matcher + ?Sized> Scanner<'l, 's, M> {
    /// Создает сканер; движок должен быть скомпилирован из той же таблицы
    pub fn new(rules: &'l RuleTable, matcher: &'l M, input: &'s [u8]) -> Result<Self> {
        if matcher.rule_count() != rules.len() {
            return Err(Error::configuration(format!(
                "matcher compiled from {} rules, table has {}",
                matcher.rule_count(),
                rules.len()
            )));
        }
        Ok(Self::from_parts(rules, matcher, input))
    }

    pub(crate) fn from_parts(rules: &'l RuleTable, matcher: &'l M, input: &'s [u8]) -> Self {
        Self {
            rules,
            matcher,
            input,
            position: Position::start(),
            state: ScanState::Running,
        }
    }

    /// Возвращает следующее совпадение, включая пропускаемые
    ///
    /// `Ok(None)` означает конец входа.
    pub fn next_lexeme(&mut self) -> std::result::Result<Option<Lexeme<'s>>, UnconsumedInput> {
        match &self.state {
            ScanState::Running => {}
            ScanState::Done => return Ok(None),
            ScanState::Error(err) => return Err(err.clone()),
        }

        let cursor = self.position.offset;
        if cursor == self.input.len() {
            self.state = ScanState::Done;
            return Ok(None);
        }

        let remaining = self.input.len() - cursor;
        let found = self
            .matcher
            .find_at(self.input, cursor)
            .filter(|m| m.len > 0 && m.len <= remaining && m.rule < self.rules.len());

        let Some(found) = found else {
            let err = UnconsumedInput {
                position: self.position,
                byte: self.input[cursor],
            };
            log::debug!("{}", err);
            self.state = ScanState::Error(err.clone());
            return Err(err);
        };

        let rule = &self.rules.rules()[found.rule];
        let text = &self.input[cursor..cursor + found.len];
        let start = self.position;
        self.position.advance(text);

        log::trace!(
            "{} {:?} at {}",
            rule.action,
            String::from_utf8_lossy(text),
            start
        );

        Ok(Some(Lexeme {
            rule: found.rule,
            action: rule.action,
            text,
            start,
            end: self.position,
        }))
    }

    /// Возвращает следующий токен, пропуская совпадения с действием `Skip`
    ///
    /// `Ok(None)` означает конец входа.
    pub fn next_token(&mut self) -> std::result::Result<Option<Token<'s>>, UnconsumedInput> {
        while let Some(lexeme) = self.next_lexeme()? {
            if let Some(token) = lexeme.token() {
                return Ok(Some(token));
            }
        }
        Ok(None)
    }

    /// Переносит курсор в `offset` и возобновляет сканирование
    pub fn resume_at(&mut self, offset: usize) -> Result<()> {
        if offset > self.input.len() {
            return Err(Error::internal(format!(
                "resume offset {} is past end of input ({} bytes)",
                offset,
                self.input.len()
            )));
        }

        if offset >= self.position.offset {
            let skipped = &self.input[self.position.offset..offset];
            self.position.advance(skipped);
        } else {
            self.position = Position::locate(self.input, offset);
        }
        self.state = ScanState::Running;
        Ok(())
    }

    /// Пропускает нераспознанный байт после ошибки
    ///
    /// Возвращает false, если сканер не в состоянии ошибки.
    pub fn skip_unconsumed(&mut self) -> bool {
        let ScanState::Error(err) = &self.state else {
            return false;
        };
        let resume = err.resume_offset();
        log::warn!("Пропуск нераспознанного ввода: {}", err);
        self.position.advance(&self.input[self.position.offset..resume]);
        self.state = ScanState::Running;
        true
    }

    pub fn cursor(&self) -> usize {
        self.position.offset
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn state(&self) -> &ScanState {
        &self.state
    }

    pub fn is_finished(&self) -> bool {
        self.state != ScanState::Running
    }

    pub fn input(&self) -> &'s [u8] {
        self.input
    }

    pub fn remaining(&self) -> &'s [u8] {
        &self.input[self.position.offset..]
    }
}

impl<'s, M: Matcher + ?Sized> Iterator for Scanner<'_, 's, M> {
    type Item = std::result::Result<Token<'s>, UnconsumedInput>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.is_finished() {
            return None;
        }
        self.next_token().transpose()
    }
}
