// assure/src/commands/mod.rs

pub mod analyze;
pub mod categorize;
pub mod documents;
pub mod download;
pub mod review;
pub mod session;
pub mod signoff;
pub mod summary;
pub mod track;

use anyhow::{Context as _, bail};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use assure_core::application::PollSettings;
use assure_core::infrastructure::config::{ClientConfig, load_client_config};
use assure_core::infrastructure::{HttpApiClient, Session, SessionHandle, TokenStore};

/// Everything a command needs: configuration, session, and the API adapter.
pub struct Context {
    pub config: ClientConfig,
    pub token_path: PathBuf,
    pub session: SessionHandle,
    pub api: Arc<HttpApiClient>,
}

impl Context {
    pub fn load(config_path: Option<&Path>) -> anyhow::Result<Self> {
        let root = std::env::current_dir()?;
        let config = load_client_config(&root, config_path).context("Failed to load configuration")?;

        let token_path = config.token_path(&root);
        let session = SessionHandle::new(
            Session::init(TokenStore::new(&token_path))
                .with_context(|| format!("Failed to read token at {}", token_path.display()))?,
        );
        let api = Arc::new(HttpApiClient::new(&config.api, session.clone())?);

        Ok(Self {
            config,
            token_path,
            session,
            api,
        })
    }

    pub fn require_login(&self) -> anyhow::Result<()> {
        if !self.session.is_authenticated() {
            bail!("🔒 Not logged in.\n👉 Run 'assure login --token <TOKEN>' first.");
        }
        Ok(())
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            max_duration: self.config.max_poll_duration(),
            total_questions: self.config.polling.total_questions,
        }
    }
}
