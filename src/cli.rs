//! CLI интерфейс для sqlscan
//!
//! Разбирает SQL из аргумента, файла или стандартного ввода и печатает токены,
//! а также показывает таблицу правил и каталог видов.

use crate::common::{ConfigOverrides, LexerConfig, OutputFormat};
use crate::lexer::{Lexer, TokenKind, TokenRecord, UnconsumedInput};
use crate::SAMPLE_QUERY;
use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use serde::Serialize;
use std::io::{IsTerminal, Read, Write};
use std::path::PathBuf;

/// Конфигурационный файл, который ищется в текущей директории
pub const DEFAULT_CONFIG_FILE: &str = "sqlscan.toml";

/// sqlscan - лексер SQL подмножества
#[derive(Parser, Debug)]
#[command(name = "sqlscan")]
#[command(about = "sqlscan - rule-table driven SQL tokenizer")]
#[command(version)]
pub struct Cli {
    /// Конфигурационный файл
    #[arg(short, long, value_name = "CONFIG")]
    pub config: Option<PathBuf>,

    /// Уровень детализации логирования
    #[arg(long, value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Формат вывода
    #[arg(short, long, value_enum)]
    pub format: Option<OutputFormat>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Разобрать SQL на токены
    Tokenize {
        /// SQL текст; без него читается файл или стандартный ввод
        sql: Option<String>,

        /// Файл с SQL текстом
        #[arg(long, conflicts_with = "sql")]
        file: Option<PathBuf>,

        /// Пропускать нераспознанные байты
        #[arg(long)]
        recover: bool,
    },

    /// Показать таблицу правил в порядке приоритета
    Rules,

    /// Показать каталог видов токенов
    Catalog,

    /// Управление конфигурацией
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Записать конфигурацию по умолчанию
    Init {
        /// Путь к файлу
        #[arg(default_value = DEFAULT_CONFIG_FILE)]
        path: PathBuf,
    },

    /// Показать итоговую конфигурацию
    Show,
}

/// Нераспознанный ввод в отчете
#[derive(Debug, Serialize)]
struct UnconsumedRecord {
    offset: usize,
    line: usize,
    column: usize,
    byte: u8,
}

impl From<&UnconsumedInput> for UnconsumedRecord {
    fn from(err: &UnconsumedInput) -> Self {
        Self {
            offset: err.offset(),
            line: err.position.line,
            column: err.position.column,
            byte: err.byte,
        }
    }
}

/// Результат разбора для JSON вывода
#[derive(Debug, Serialize)]
struct TokenizeReport {
    tokens: Vec<TokenRecord>,
    errors: Vec<UnconsumedRecord>,
}

impl Cli {
    /// Загружает конфигурацию: файл, переменные окружения, аргументы
    pub fn load_config(&self) -> anyhow::Result<LexerConfig> {
        let config = if let Some(path) = &self.config {
            LexerConfig::from_file(path)
                .with_context(|| format!("cannot load config {}", path.display()))?
        } else {
            LexerConfig::from_file_or_default(DEFAULT_CONFIG_FILE)
                .with_context(|| format!("cannot load config {}", DEFAULT_CONFIG_FILE))?
        };

        let config = config
            .merge(ConfigOverrides::from_env()?)
            .merge(self.overrides());

        config.validate()?;
        Ok(config)
    }

    /// Переопределения, заданные аргументами командной строки
    pub fn overrides(&self) -> ConfigOverrides {
        let recover = matches!(&self.command, Some(Commands::Tokenize { recover: true, .. }));
        ConfigOverrides {
            recover_unconsumed: recover.then_some(true),
            format: self.format,
            log_level: self.log_level.clone(),
            ..Default::default()
        }
    }

    /// Выполняет команду
    pub fn execute(&self, config: &LexerConfig, out: &mut dyn Write) -> anyhow::Result<()> {
        match &self.command {
            Some(Commands::Tokenize { sql, file, .. }) => {
                let input = read_input(sql.as_deref(), file.as_ref())?;
                tokenize(config, &input, out)
            }
            Some(Commands::Rules) => show_rules(config, out),
            Some(Commands::Catalog) => show_catalog(out),
            Some(Commands::Config { action }) => handle_config_command(config, action, out),
            None => tokenize(config, SAMPLE_QUERY.as_bytes(), out),
        }
    }
}

/// Инициализирует логирование; `RUST_LOG` имеет приоритет над `level`
pub fn init_logging(level: &str) {
    let env = env_logger::Env::default().default_filter_or(level);
    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .try_init();
}

fn read_input(sql: Option<&str>, file: Option<&PathBuf>) -> anyhow::Result<Vec<u8>> {
    if let Some(sql) = sql {
        return Ok(sql.as_bytes().to_vec());
    }
    if let Some(path) = file {
        return std::fs::read(path).with_context(|| format!("cannot read {}", path.display()));
    }

    let stdin = std::io::stdin();
    if stdin.is_terminal() {
        return Ok(SAMPLE_QUERY.as_bytes().to_vec());
    }
    let mut input = Vec::new();
    stdin.lock().read_to_end(&mut input)?;
    Ok(input)
}

fn tokenize(config: &LexerConfig, input: &[u8], out: &mut dyn Write) -> anyhow::Result<()> {
    let lexer = Lexer::with_config(&config.scanner)?;

    let (tokens, errors) = if config.scanner.recover_unconsumed {
        lexer.tokenize_recovering(input)
    } else {
        let mut tokens = Vec::new();
        let mut errors = Vec::new();
        for item in lexer.scanner(input) {
            match item {
                Ok(token) => tokens.push(token),
                Err(err) => errors.push(err),
            }
        }
        (tokens, errors)
    };

    log::info!(
        "Разобрано токенов: {}, ошибок: {}",
        tokens.len(),
        errors.len()
    );

    match config.output.format {
        OutputFormat::Text => {
            for token in &tokens {
                writeln!(
                    out,
                    "{:>4}:{:<4} {:<8} {:?}",
                    token.start.line,
                    token.start.column,
                    token.kind.name(),
                    token.text()
                )?;
            }
            for err in &errors {
                writeln!(out, "error: {}", err)?;
            }
        }
        OutputFormat::Json => {
            let report = TokenizeReport {
                tokens: tokens.iter().map(TokenRecord::from).collect(),
                errors: errors.iter().map(UnconsumedRecord::from).collect(),
            };
            serde_json::to_writer_pretty(&mut *out, &report)?;
            writeln!(out)?;
        }
    }

    if !config.scanner.recover_unconsumed {
        if let Some(err) = errors.into_iter().next() {
            return Err(err.into());
        }
    }
    Ok(())
}

fn show_rules(config: &LexerConfig, out: &mut dyn Write) -> anyhow::Result<()> {
    let lexer = Lexer::with_config(&config.scanner)?;
    for rule in lexer.rules() {
        writeln!(
            out,
            "{:>3}  {:<14} {}",
            rule.priority,
            rule.action.to_string(),
            rule.pattern
        )?;
    }
    Ok(())
}

fn show_catalog(out: &mut dyn Write) -> anyhow::Result<()> {
    for kind in TokenKind::ALL {
        writeln!(out, "{:>3}  {}", kind.id(), kind.name())?;
    }
    Ok(())
}

fn handle_config_command(
    config: &LexerConfig,
    action: &ConfigCommands,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    match action {
        ConfigCommands::Init { path } => {
            if path.exists() {
                bail!("{} already exists", path.display());
            }
            LexerConfig::default().to_file(path)?;
            writeln!(out, "Wrote {}", path.display())?;
        }
        ConfigCommands::Show => {
            write!(out, "{}", toml::to_string_pretty(config)?)?;
        }
    }
    Ok(())
}
