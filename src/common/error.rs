//! Обработка ошибок для sqlscan
//!
//! Ошибки конфигурации (каталог токенов, шаблоны правил) возникают только
//! при построении лексера. Ошибка сканирования одна: `UnconsumedInput`.

use crate::lexer::scanner::UnconsumedInput;
use thiserror::Error;

/// Основной тип ошибки для sqlscan
#[derive(Error, Debug)]
pub enum Error {
    /// Ошибка I/O операций
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Ошибка сериализации/десериализации
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Ошибка разбора TOML
    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Имя токена зарегистрировано повторно
    #[error("Token '{name}' is already registered")]
    DuplicateToken { name: String },

    /// Имя токена отсутствует в каталоге
    #[error("Unknown token '{name}'")]
    UnknownToken { name: String },

    /// Некорректный шаблон правила
    #[error("Malformed pattern in rule {rule} at byte {position}: {message}")]
    Pattern {
        rule: usize,
        position: usize,
        message: String,
    },

    /// Шаблон допускает пустое совпадение
    #[error("Pattern of rule {rule} matches the empty string")]
    EmptyMatch { rule: usize },

    /// Нераспознанный ввод при сканировании
    #[error("{0}")]
    UnconsumedInput(UnconsumedInput),

    /// Ошибка конфигурации
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Внутренняя ошибка
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Тип результата для sqlscan
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Создает ошибку повторной регистрации токена
    pub fn duplicate_token(name: impl Into<String>) -> Self {
        Self::DuplicateToken { name: name.into() }
    }

    /// Создает ошибку неизвестного токена
    pub fn unknown_token(name: impl Into<String>) -> Self {
        Self::UnknownToken { name: name.into() }
    }

    /// Создает ошибку разбора шаблона
    pub fn pattern(rule: usize, position: usize, message: impl Into<String>) -> Self {
        Self::Pattern {
            rule,
            position,
            message: message.into(),
        }
    }

    /// Создает ошибку конфигурации
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Создает внутреннюю ошибку
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    /// Возвращает true для ошибок, возникающих при построении лексера
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::DuplicateToken { .. }
                | Self::UnknownToken { .. }
                | Self::Pattern { .. }
                | Self::EmptyMatch { .. }
                | Self::Configuration { .. }
        )
    }
}

impl From<UnconsumedInput> for Error {
    fn from(err: UnconsumedInput) -> Self {
        Self::UnconsumedInput(err)
    }
}
