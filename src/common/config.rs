//! Конфигурация для sqlscan
//!
//! Предоставляет структуры конфигурации сканера, вывода и логирования

use crate::common::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Обработка комментариев сканером
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CommentMode {
    /// Комментарии выдаются как токены COMMENT
    #[default]
    Emit,
    /// Комментарии пропускаются как пробелы
    Skip,
}

impl FromStr for CommentMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "emit" => Ok(Self::Emit),
            "skip" => Ok(Self::Skip),
            other => Err(Error::configuration(format!(
                "unknown comment mode '{}', expected 'emit' or 'skip'",
                other
            ))),
        }
    }
}

/// Формат вывода токенов
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Одна строка на токен
    #[default]
    Text,
    /// JSON массив записей токенов
    Json,
}

impl FromStr for OutputFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            other => Err(Error::configuration(format!(
                "unknown output format '{}', expected 'text' or 'json'",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Конфигурация сканера
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScannerConfig {
    /// Что делать с комментариями
    pub comments: CommentMode,
    /// Пропускать нераспознанные байты вместо остановки
    pub recover_unconsumed: bool,
}

/// Конфигурация вывода
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Формат вывода
    pub format: OutputFormat,
}

/// Конфигурация логирования
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Уровень логирования
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "warn".to_string(),
        }
    }
}

/// Основная конфигурация sqlscan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LexerConfig {
    pub scanner: ScannerConfig,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
}

const LOG_LEVELS: [&str; 6] = ["off", "error", "warn", "info", "debug", "trace"];

impl LexerConfig {
    /// Загружает конфигурацию из TOML файла
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: LexerConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Сохраняет конфигурацию в TOML файл
    pub fn to_file(&self, path: impl AsRef<Path>) -> Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| Error::configuration(format!("cannot serialize config: {}", e)))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Загружает конфигурацию, если файл есть
    ///
    /// Отсутствующий файл дает конфигурацию по умолчанию, остальные ошибки
    /// (в том числе неверный TOML) возвращаются.
    pub fn from_file_or_default(path: impl AsRef<Path>) -> Result<Self> {
        match Self::from_file(path) {
            Err(Error::Io(e)) if e.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            other => other,
        }
    }

    /// Загружает конфигурацию из переменных окружения поверх значений по умолчанию
    pub fn from_env() -> Result<Self> {
        Ok(Self::default().merge(ConfigOverrides::from_env()?))
    }

    /// Накладывает заданные переопределения
    ///
    /// Заменяются только поля, явно заданные в `overrides`, даже если их
    /// значение совпадает со значением по умолчанию.
    pub fn merge(mut self, overrides: ConfigOverrides) -> Self {
        if let Some(comments) = overrides.comments {
            self.scanner.comments = comments;
        }
        if let Some(recover) = overrides.recover_unconsumed {
            self.scanner.recover_unconsumed = recover;
        }
        if let Some(format) = overrides.format {
            self.output.format = format;
        }
        if let Some(level) = overrides.log_level {
            self.logging.level = level;
        }
        self
    }

    /// Валидирует конфигурацию
    pub fn validate(&self) -> Result<()> {
        let level = self.logging.level.to_ascii_lowercase();
        if !LOG_LEVELS.contains(&level.as_str()) {
            return Err(Error::configuration(format!(
                "unknown log level '{}'",
                self.logging.level
            )));
        }
        Ok(())
    }
}

/// Переопределения конфигурации из окружения или аргументов командной строки
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigOverrides {
    pub comments: Option<CommentMode>,
    pub recover_unconsumed: Option<bool>,
    pub format: Option<OutputFormat>,
    pub log_level: Option<String>,
}

impl ConfigOverrides {
    /// Читает `SQLSCAN_FORMAT`, `SQLSCAN_LOG_LEVEL`, `SQLSCAN_RECOVER` и `SQLSCAN_COMMENTS`
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Читает переменные через `lookup`; отсутствующая переменная не меняет поле
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut overrides = Self::default();

        if let Some(format) = lookup("SQLSCAN_FORMAT") {
            overrides.format = Some(format.parse()?);
        }

        if let Some(level) = lookup("SQLSCAN_LOG_LEVEL") {
            overrides.log_level = Some(level);
        }

        if let Some(recover) = lookup("SQLSCAN_RECOVER") {
            let value = recover.parse().map_err(|_| {
                Error::configuration(format!("SQLSCAN_RECOVER must be a bool, got '{}'", recover))
            })?;
            overrides.recover_unconsumed = Some(value);
        }

        if let Some(comments) = lookup("SQLSCAN_COMMENTS") {
            overrides.comments = Some(comments.parse()?);
        }

        Ok(overrides)
    }
}
