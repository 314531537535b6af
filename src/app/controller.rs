use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;

use crate::adapters::{ChatCompletionClient, TomlConfigStore, WhisperHttpTranscriber};
use crate::app::session::{Session, TurnInput};
use crate::domain::locale::{Language, LocaleBundle};
use crate::domain::recipe::ShelfView;
use crate::domain::stream::ReplyStream;
use crate::domain::{AppConfig, DomainError};
use crate::infrastructure::init_logging;
use crate::ports::{CompletionClient, ConfigStore, GenerationParams, Transcriber};

/// Orchestration facade owning configuration, the adapters, and the single
/// active session.
///
/// Turn methods take `&mut self`: one user-visible turn runs to completion
/// before the next is accepted, so the session never needs a lock.
pub struct SessionController {
    config: RwLock<AppConfig>,
    config_store: Option<Arc<TomlConfigStore>>,
    completion: Arc<dyn CompletionClient>,
    transcriber: Arc<dyn Transcriber>,
    session: Session,
    _log_guard: Option<WorkerGuard>,
}

impl SessionController {
    /// Initialize the controller from persisted configuration.
    /// This sets up the config store, logging, and both HTTP adapters.
    pub fn new() -> Result<Self, DomainError> {
        // Step 1: Initialize config store
        let config_store = Arc::new(TomlConfigStore::new()?);

        // Step 2: Load configuration
        let config = config_store.load()?;

        // Step 3: Initialize logging
        let log_guard = init_logging(
            &config_store.logs_dir(),
            &config.logging.level,
            config.logging.file_logging,
        )?;

        info!("SousChef starting up");

        // Step 4: Build the adapters from config
        let completion: Arc<dyn CompletionClient> =
            Arc::new(ChatCompletionClient::new(&config.completion)?);
        let transcriber: Arc<dyn Transcriber> =
            Arc::new(WhisperHttpTranscriber::new(&config.transcription)?);

        // Step 5: Open the session in the configured language
        let language = Language::from_tag(&config.ui.language).unwrap_or(Language::English);
        let session = Session::new(language);

        info!(language = language.tag(), "SessionController initialized");

        Ok(Self {
            config: RwLock::new(config),
            config_store: Some(config_store),
            completion,
            transcriber,
            session,
            _log_guard: log_guard,
        })
    }

    /// Build a controller around caller-supplied ports, without touching
    /// the filesystem or the network. Configuration is not persisted.
    pub fn with_ports(
        config: AppConfig,
        completion: Arc<dyn CompletionClient>,
        transcriber: Arc<dyn Transcriber>,
    ) -> Self {
        let language = Language::from_tag(&config.ui.language).unwrap_or(Language::English);
        Self {
            config: RwLock::new(config),
            config_store: None,
            completion,
            transcriber,
            session: Session::new(language),
            _log_guard: None,
        }
    }

    fn params(&self) -> GenerationParams {
        let config = self.config.read();
        GenerationParams {
            temperature: config.completion.temperature,
            top_p: config.completion.top_p,
            max_tokens: config.completion.max_tokens,
            stream: false,
        }
    }

    fn step_delay(&self) -> Duration {
        Duration::from_millis(self.config.read().streaming.step_delay_ms)
    }

    /// Process one user submission and return the paced reply stream, or
    /// `None` for an empty submission.
    pub async fn submit_turn(
        &mut self,
        input: TurnInput,
    ) -> Result<Option<ReplyStream>, DomainError> {
        let params = self.params();
        let reply = self
            .session
            .submit_turn(input, self.transcriber.as_ref(), self.completion.as_ref(), &params)
            .await?;
        Ok(reply.map(|r| ReplyStream::new(r, self.step_delay())))
    }

    /// Submit a custom-recipe request built from include/exclude lists.
    pub async fn submit_custom_recipe(
        &mut self,
        include: &str,
        exclude: &str,
    ) -> Result<Option<ReplyStream>, DomainError> {
        let params = self.params();
        let reply = self
            .session
            .submit_custom_recipe(include, exclude, self.completion.as_ref(), &params)
            .await?;
        Ok(reply.map(|r| ReplyStream::new(r, self.step_delay())))
    }

    /// Save the last assistant response to the recipe shelf.
    pub async fn save_recipe(&mut self) -> Result<ShelfView, DomainError> {
        let params = self.params();
        self.session
            .save_recipe(self.completion.as_ref(), &params)
            .await
    }

    /// Empty the recipe shelf.
    pub fn clear_recipes(&mut self) -> ShelfView {
        self.session.clear_recipes()
    }

    /// Switch the interface language by selector tag.
    pub fn switch_language(&mut self, tag: &str) -> Result<&'static LocaleBundle, DomainError> {
        let language = Language::from_tag(tag)
            .ok_or_else(|| DomainError::Config(format!("Unknown language tag '{}'", tag)))?;
        Ok(self.session.switch_language(language))
    }

    pub fn select_units(&mut self, units: &str) {
        self.session.select_units(units);
    }

    pub fn select_diet(&mut self, diet: &str) {
        self.session.select_diet(diet);
    }

    /// The active session (read access for rendering).
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Get the current configuration.
    pub fn config(&self) -> AppConfig {
        self.config.read().clone()
    }

    /// Update the configuration. Endpoint settings take effect on the next
    /// startup; generation and streaming parameters apply immediately.
    pub fn update_config(&self, config: AppConfig) -> Result<(), DomainError> {
        if let Some(store) = &self.config_store {
            store.save(&config)?;
        }
        *self.config.write() = config;
        info!("Configuration updated");
        Ok(())
    }
}
