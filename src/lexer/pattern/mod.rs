//! Сопоставление шаблонов правил
//!
//! Сканер зависит только от трейта `Matcher`: самое длинное совпадение от
//! курсора, при равной длине побеждает правило с меньшим индексом.

pub mod nfa;
pub mod syntax;

pub use nfa::NfaMatcher;

/// Результат сопоставления
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Индекс правила в таблице
    pub rule: usize,
    /// Длина совпадения в байтах, всегда больше нуля
    pub len: usize,
}

/// Движок сопоставления, скомпилированный из таблицы правил
pub trait Matcher: Send + Sync {
    /// Ищет самое длинное совпадение, начинающееся ровно в `cursor`
    fn find_at(&self, input: &[u8], cursor: usize) -> Option<Match>;

    /// Количество правил, из которых скомпилирован движок
    fn rule_count(&self) -> usize;
}
