//! Недетерминированный автомат для таблицы правил
//!
//! Все правила компилируются в один автомат Томпсона с отдельной стартовой
//! вершиной на каждое правило. Поиск идет одновременно по всем правилам и
//! запоминает последнюю позицию, в которой было принимающее состояние.

use crate::common::{Error, Result};
use crate::lexer::pattern::syntax::{self, Ast, ByteSet};
use crate::lexer::pattern::{Match, Matcher};
use crate::lexer::rules::RuleTable;

/// Состояние автомата
#[derive(Debug, Clone)]
enum State {
    /// Переход по байту из множества
    Bytes { set: ByteSet, next: usize },
    /// Два эпсилон-перехода
    Split { first: usize, second: usize },
    /// Принимающее состояние правила
    Match { rule: usize },
}

/// Скомпилированный автомат правил
#[derive(Debug, Clone)]
pub struct NfaMatcher {
    states: Vec<State>,
    starts: Vec<usize>,
}

impl NfaMatcher {
    /// Компилирует таблицу правил
    ///
    /// Ошибка разбора любого шаблона или шаблон, допускающий пустое совпадение,
    /// делает компиляцию невозможной.
    pub fn compile(table: &RuleTable) -> Result<Self> {
        if table.is_empty() {
            return Err(Error::configuration("rule table is empty"));
        }

        let mut compiler = Compiler { states: Vec::new() };
        let mut starts = Vec::with_capacity(table.len());

        for rule in table {
            let ast = syntax::parse(&rule.pattern, rule.priority)?;
            let accept = compiler.push(State::Match {
                rule: rule.priority,
            });
            starts.push(compiler.compile(&ast, accept));
        }

        let matcher = Self {
            states: compiler.states,
            starts,
        };

        let mut set = StateSet::new(matcher.states.len());
        let mut stack = Vec::new();
        for (rule, &start) in matcher.starts.iter().enumerate() {
            set.clear();
            matcher.add_closure(&mut set, start, &mut stack);
            if matcher.accepting_rule(&set).is_some() {
                return Err(Error::EmptyMatch { rule });
            }
        }

        log::debug!(
            "Скомпилировано правил: {}, состояний автомата: {}",
            matcher.starts.len(),
            matcher.states.len()
        );
        Ok(matcher)
    }

    /// Количество состояний автомата
    pub fn state_count(&self) -> usize {
        self.states.len()
    }

    fn add_closure(&self, set: &mut StateSet, start: usize, stack: &mut Vec<usize>) {
        stack.push(start);
        while let Some(id) = stack.pop() {
            if !set.insert(id) {
                continue;
            }
            if let State::Split { first, second } = self.states[id] {
                stack.push(second);
                stack.push(first);
            }
        }
    }

    /// Наименьший индекс правила среди принимающих состояний множества
    fn accepting_rule(&self, set: &StateSet) -> Option<usize> {
        set.iter()
            .filter_map(|id| match self.states[id] {
                State::Match { rule } => Some(rule),
                _ => None,
            })
            .min()
    }
}

impl Matcher for NfaMatcher {
    fn find_at(&self, input: &[u8], cursor: usize) -> Option<Match> {
        if cursor >= input.len() {
            return None;
        }

        let mut current = StateSet::new(self.states.len());
        let mut next = StateSet::new(self.states.len());
        let mut stack = Vec::new();
        for &start in &self.starts {
            self.add_closure(&mut current, start, &mut stack);
        }

        let mut best = None;
        let mut position = cursor;
        loop {
            if position > cursor {
                if let Some(rule) = self.accepting_rule(&current) {
                    best = Some(Match {
                        rule,
                        len: position - cursor,
                    });
                }
            }
            if current.is_empty() || position == input.len() {
                break;
            }

            let byte = input[position];
            next.clear();
            for id in current.iter() {
                if let State::Bytes { set, next: target } = &self.states[id] {
                    if set.contains(byte) {
                        self.add_closure(&mut next, *target, &mut stack);
                    }
                }
            }
            std::mem::swap(&mut current, &mut next);
            position += 1;
        }

        best
    }

    fn rule_count(&self) -> usize {
        self.starts.len()
    }
}

/// Построение автомата Томпсона от конца к началу
struct Compiler {
    states: Vec<State>,
}

impl Compiler {
    fn push(&mut self, state: State) -> usize {
        self.states.push(state);
        self.states.len() - 1
    }

    /// Компилирует `ast` так, что после совпадения управление переходит в `next`
    fn compile(&mut self, ast: &Ast, next: usize) -> usize {
        match ast {
            Ast::Empty => next,
            Ast::Bytes(set) => self.push(State::Bytes { set: *set, next }),
            Ast::Concat(items) => items
                .iter()
                .rev()
                .fold(next, |target, item| self.compile(item, target)),
            Ast::Alternate(branches) => {
                let mut starts: Vec<usize> = branches
                    .iter()
                    .map(|branch| self.compile(branch, next))
                    .collect();
                let mut entry = starts.pop().unwrap_or(next);
                while let Some(start) = starts.pop() {
                    entry = self.push(State::Split {
                        first: start,
                        second: entry,
                    });
                }
                entry
            }
            Ast::Star(inner) => {
                let split = self.push(State::Split {
                    first: next,
                    second: next,
                });
                let body = self.compile(inner, split);
                self.states[split] = State::Split {
                    first: body,
                    second: next,
                };
                split
            }
            Ast::Plus(inner) => {
                let split = self.push(State::Split {
                    first: next,
                    second: next,
                });
                let body = self.compile(inner, split);
                self.states[split] = State::Split {
                    first: body,
                    second: next,
                };
                body
            }
            Ast::Optional(inner) => {
                let body = self.compile(inner, next);
                self.push(State::Split {
                    first: body,
                    second: next,
                })
            }
        }
    }
}

/// Множество состояний с сохранением порядка вставки
struct StateSet {
    dense: Vec<usize>,
    present: Vec<bool>,
}

impl StateSet {
    fn new(capacity: usize) -> Self {
        Self {
            dense: Vec::with_capacity(capacity),
            present: vec![false; capacity],
        }
    }

    fn insert(&mut self, id: usize) -> bool {
        if self.present[id] {
            return false;
        }
        self.present[id] = true;
        self.dense.push(id);
        true
    }

    fn clear(&mut self) {
        for &id in &self.dense {
            self.present[id] = false;
        }
        self.dense.clear();
    }

    fn is_empty(&self) -> bool {
        self.dense.is_empty()
    }

    fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.dense.iter().copied()
    }
}
