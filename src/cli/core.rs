//! Shell context, dispatch and error reporting.

use std::{io, path::PathBuf, time::Duration};

use spendy_config::{Config, ConfigError, ConfigManager};
use spendy_core::{
    Clock, CoreError, LocalSession, MonthBucketing, ReportRequest, RetryPolicy, Session,
    SessionEvent, SessionProvider, StoreError, TransactionFilter, TransactionService,
};
use spendy_domain::{OwnerId, Transaction};
use spendy_storage_json::JsonTransactionStore;
use strsim::levenshtein;

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output;
use super::render::MoneyFormat;
use crate::{errors::SpendyError, utils};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Core(#[from] CoreError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<StoreError> for CommandError {
    fn from(err: StoreError) -> Self {
        CommandError::Core(CoreError::Store(err))
    }
}

pub struct ShellContext {
    pub mode: CliMode,
    pub registry: CommandRegistry,
    config_manager: ConfigManager,
    pub config: Config,
    store: JsonTransactionStore,
    session: LocalSession,
    clock: Box<dyn Clock>,
    pub running: bool,
}

impl ShellContext {
    pub fn new(mode: CliMode) -> Result<Self, SpendyError> {
        Self::with_base_dir(mode, utils::resolve_base_dir(), Box::new(utils::SystemClock))
    }

    pub fn with_base_dir(
        mode: CliMode,
        base: PathBuf,
        clock: Box<dyn Clock>,
    ) -> Result<Self, SpendyError> {
        let registry = CommandRegistry::new(commands::all_definitions());
        let config_manager = ConfigManager::with_base_dir(base)?;
        let config = config_manager.load()?;
        output::apply_config(&config, mode == CliMode::Script);
        let store = JsonTransactionStore::new(config_manager.data_root(&config))?;
        let session = match &config.last_user {
            Some(user) => LocalSession::signed_in(OwnerId::new(user.as_str())),
            None => LocalSession::new(),
        };
        tracing::debug!(
            base = %config_manager.base_dir().display(),
            data = %store.root().display(),
            "shell context ready"
        );

        Ok(ShellContext {
            mode,
            registry,
            config_manager,
            config,
            store,
            session,
            clock,
            running: true,
        })
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn prompt(&self) -> String {
        match self.session.current_user() {
            Some(user) => format!("spendy({})> ", user),
            None => "spendy> ".into(),
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        let needle = input.to_lowercase();
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &needle), name))
            .min_by_key(|(distance, _)| *distance);

        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::hint(format!("Did you mean `{}`?", name));
            }
        }
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::hint("Use `help <command>` for usage details.");
            }
            CommandError::Core(CoreError::NotAuthenticated) => {
                output::error("Not signed in.");
                output::hint("Use `login <user>` first.");
            }
            CommandError::Core(err) if err.is_retryable() => {
                output::error(format!("{}", err));
                output::hint("The store is still preparing; try again in a moment.");
            }
            other => output::error(other),
        }
    }

    pub(crate) fn now(&self) -> chrono::NaiveDateTime {
        self.clock.now()
    }

    pub(crate) fn money(&self) -> MoneyFormat {
        MoneyFormat::new(self.config.currency.as_str(), self.config.locale.as_str())
    }

    pub(crate) fn session(&self) -> Result<Session, CommandError> {
        Ok(Session::from_provider(&self.session)?)
    }

    pub(crate) fn store(&self) -> &JsonTransactionStore {
        &self.store
    }

    pub(crate) fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::new(
            self.config.fetch_retry_attempts,
            Duration::from_millis(self.config.fetch_retry_delay_ms),
        )
    }

    /// Fresh snapshot of the signed-in user's transactions.
    pub(crate) fn load_transactions(&self) -> Result<Vec<Transaction>, CommandError> {
        let session = self.session()?;
        Ok(TransactionService::load(
            &self.store,
            &session,
            self.retry_policy(),
        )?)
    }

    /// Report defaults taken from the saved preferences.
    pub(crate) fn default_request(&self) -> ReportRequest {
        ReportRequest {
            filter: TransactionFilter::from_values(
                "",
                &self.config.date_range,
                &self.config.sort_by,
                &self.config.sort_order,
            ),
            page: 1,
            page_size: self.config.page_size,
            bucketing: MonthBucketing::from_value(&self.config.month_bucketing),
        }
    }

    pub(crate) fn login(&mut self, user: &str) -> Result<Vec<SessionEvent>, CommandError> {
        let events = self.session.login(OwnerId::new(user));
        self.config.last_user = Some(user.to_string());
        self.persist_config()?;
        Ok(events)
    }

    pub(crate) fn logout(&mut self) -> Result<Option<SessionEvent>, CommandError> {
        let event = self.session.logout();
        self.config.last_user = None;
        self.persist_config()?;
        Ok(event)
    }

    pub(crate) fn current_user(&self) -> Option<OwnerId> {
        self.session.current_user()
    }

    pub(crate) fn persist_config(&self) -> CommandResult {
        self.config_manager.save(&self.config)?;
        Ok(())
    }

    /// Applies a setting, persists it and re-points the store when the data root moves.
    pub(crate) fn set_config_value(&mut self, key: &str, value: &str) -> CommandResult {
        self.config.set(key, value)?;
        self.persist_config()?;
        match key {
            "data_root" => {
                self.store = JsonTransactionStore::new(self.config_manager.data_root(&self.config))?;
            }
            "color" => output::apply_config(&self.config, self.mode == CliMode::Script),
            _ => {}
        }
        Ok(())
    }

    /// Runs one input line. Blank lines and `#` comments are skipped.
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        if line.trim_start().starts_with('#') {
            return Ok(LoopControl::Continue);
        }
        let tokens = match shell_words::split(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                output::warning(err);
                return Ok(LoopControl::Continue);
            }
        };
        let Some(raw) = tokens.first() else {
            return Ok(LoopControl::Continue);
        };
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        let control = self.dispatch(&raw.to_lowercase(), raw, &args)?;
        if control == LoopControl::Exit {
            self.running = false;
        }
        Ok(control)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use spendy_core::FixedClock;
    use spendy_domain::parse_occurred_at;
    use tempfile::tempdir;

    fn context(base: PathBuf) -> ShellContext {
        let now = parse_occurred_at("2024-02-10T12:00:00").expect("now");
        ShellContext::with_base_dir(CliMode::Script, base, Box::new(FixedClock(now)))
            .expect("shell context")
    }

    #[test]
    fn commands_require_login() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path().to_path_buf());
        let err = ctx.process_line("totals").unwrap_err();
        assert!(matches!(err, CommandError::Core(CoreError::NotAuthenticated)));
    }

    #[test]
    fn added_transactions_survive_a_new_context() {
        let dir = tempdir().unwrap();
        {
            let mut ctx = context(dir.path().to_path_buf());
            ctx.process_line("login dana").unwrap();
            ctx.process_line("add expense food 12.50 2024-02-01 \"Corner shop\"")
                .unwrap();
        }

        let ctx = context(dir.path().to_path_buf());
        assert_eq!(ctx.current_user(), Some(OwnerId::new("dana")));
        let loaded = ctx.load_transactions().unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(loaded[0].description, "Corner shop");
    }

    #[test]
    fn invalid_add_is_reported_as_validation_error() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path().to_path_buf());
        ctx.process_line("login dana").unwrap();
        let err = ctx
            .process_line("add income food 10 2024-02-01 Lunch")
            .unwrap_err();
        assert!(matches!(err, CommandError::Core(CoreError::Validation(_))));
    }

    #[test]
    fn exit_stops_the_loop_and_unknown_commands_continue() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path().to_path_buf());
        assert_eq!(ctx.process_line("totls").unwrap(), LoopControl::Continue);
        assert_eq!(ctx.process_line("   ").unwrap(), LoopControl::Continue);
        assert_eq!(ctx.process_line("# exit").unwrap(), LoopControl::Continue);
        assert_eq!(ctx.process_line("add \"unterminated").unwrap(), LoopControl::Continue);
        assert!(ctx.running);
        assert_eq!(ctx.process_line("exit").unwrap(), LoopControl::Exit);
        assert!(!ctx.running);
    }

    #[test]
    fn config_defaults_feed_report_requests() {
        let dir = tempdir().unwrap();
        let mut ctx = context(dir.path().to_path_buf());
        ctx.process_line("config set page_size 5").unwrap();
        ctx.process_line("config set month_bucketing month").unwrap();
        let request = ctx.default_request();
        assert_eq!(request.page_size, 5);
        assert_eq!(request.bucketing, MonthBucketing::MonthName);
    }
}
