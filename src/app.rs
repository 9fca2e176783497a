//! Application state management.
//!
//! This module contains the `App` struct that owns the session store, the
//! auth client, and all UI state. A login attempt runs as a background task
//! so the UI stays responsive; its outcome comes back over an MPSC channel
//! and is applied on the UI thread, which keeps session writes free of
//! cross-thread races.

use std::path::PathBuf;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};

use crate::api::{AuthClient, AuthOutcome, Credentials};
use crate::config::Config;
use crate::session::{FilePrefs, SessionStore};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the login outcome channel.
/// Only one attempt is ever in flight, so a single slot would do.
const CHANNEL_BUFFER_SIZE: usize = 4;

/// Maximum length for email input.
/// Long enough for real addresses while keeping the form box intact.
const MAX_EMAIL_LENGTH: usize = 48;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Showing the login form
    LoggingIn,
    /// Logged in, showing the greeting view
    Home,
    /// Menu overlay open on the greeting view
    MenuOpen,
    Quitting,
}

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Email,
    Password,
    Button,
}

/// Whether another character fits in the email field
pub fn can_add_email_char(len: usize, c: char) -> bool {
    len < MAX_EMAIL_LENGTH && !c.is_control()
}

/// Whether another character fits in the password field
pub fn can_add_password_char(len: usize, c: char) -> bool {
    len < MAX_PASSWORD_LENGTH && !c.is_control()
}

/// Greeting line for the home view.
/// A blank stored name gets the generic greeting.
pub fn greeting_for(name: &str) -> String {
    if name.trim().is_empty() {
        "Hello!".to_string()
    } else {
        format!("Welcome, {}!", name)
    }
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub session: SessionStore,
    pub auth: AuthClient,

    pub state: AppState,

    // Login form state
    pub login_email: String,
    pub login_password: String,
    pub login_focus: LoginFocus,
    pub login_error: Option<String>,
    pub login_in_flight: bool,

    // Background login channel. The cancel token tears down an in-flight
    // attempt on shutdown so a late completion never lands on dead UI state.
    outcome_rx: mpsc::Receiver<AuthOutcome>,
    outcome_tx: mpsc::Sender<AuthOutcome>,
    login_cancel: Option<CancellationToken>,
}

impl App {
    /// Create a new application instance
    pub fn new() -> anyhow::Result<Self> {
        let config = match Config::load() {
            Ok(c) => c,
            Err(e) => {
                warn!(error = %e, "Failed to load config, using defaults");
                Config::default()
            }
        };

        let prefs_dir = Config::app_dir().unwrap_or_else(|_| PathBuf::from("."));
        let session = SessionStore::new(Box::new(FilePrefs::new(prefs_dir)));

        let auth = AuthClient::new()?;

        Ok(Self::with_services(config, session, auth))
    }

    /// Assemble an app from explicit services.
    /// `new` wires up the production backends; tests inject their own.
    pub fn with_services(config: Config, session: SessionStore, auth: AuthClient) -> Self {
        let state = if session.is_logged_in() {
            AppState::Home
        } else {
            AppState::LoggingIn
        };

        // Prefill the form from env vars or the remembered email
        let login_email = std::env::var("BISSOY_EMAIL")
            .ok()
            .or_else(|| config.last_email.clone())
            .unwrap_or_default();
        let login_password = std::env::var("BISSOY_PASSWORD").unwrap_or_default();

        let login_focus = if login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Self {
            config,
            session,
            auth,

            state,

            login_email,
            login_password,
            login_focus,
            login_error: None,
            login_in_flight: false,

            outcome_rx: rx,
            outcome_tx: tx,
            login_cancel: None,
        }
    }

    // =========================================================================
    // Login
    // =========================================================================

    /// Kick off a login attempt with the credentials from the form.
    ///
    /// The request runs in a background task so the UI keeps rendering; the
    /// submit control stays disabled until the outcome arrives, which also
    /// makes duplicate submissions no-ops.
    pub fn attempt_login(&mut self) {
        if self.login_in_flight {
            return;
        }

        if self.login_email.is_empty() || self.login_password.is_empty() {
            self.login_error = Some("Email and password required".to_string());
            return;
        }

        self.login_error = None;
        self.login_in_flight = true;

        let credentials = Credentials {
            email: self.login_email.clone(),
            password: self.login_password.clone(),
        };

        let auth = self.auth.clone();
        let tx = self.outcome_tx.clone();
        let cancel = CancellationToken::new();
        self.login_cancel = Some(cancel.clone());

        info!(email = %credentials.email, "Login attempt started");

        tokio::spawn(async move {
            tokio::select! {
                () = cancel.cancelled() => {
                    // Screen torn down mid-request; drop the outcome.
                }
                outcome = auth.login(&credentials) => {
                    if tx.send(outcome).await.is_err() {
                        warn!("Login outcome dropped - channel closed");
                    }
                }
            }
        });
    }

    /// Apply any login outcome delivered by the background task
    pub fn check_background_tasks(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.process_login_outcome(outcome);
        }
    }

    fn process_login_outcome(&mut self, outcome: AuthOutcome) {
        self.login_in_flight = false;
        self.login_cancel = None;

        match outcome {
            AuthOutcome::Success { username } => {
                if let Err(e) = self.session.login(&username) {
                    warn!(error = %e, "Failed to persist session");
                }

                self.config.last_email = Some(self.login_email.clone());
                if let Err(e) = self.config.save() {
                    warn!(error = %e, "Failed to save config");
                }

                self.login_password.clear();
                self.login_error = None;
                self.state = AppState::Home;
                info!(username = %self.session.username(), "Login successful");
            }
            AuthOutcome::Failure { message } => {
                self.login_error = Some(message);
            }
        }
    }

    /// Cancel any in-flight login attempt. Called on shutdown.
    pub fn cancel_pending_login(&mut self) {
        if let Some(cancel) = self.login_cancel.take() {
            cancel.cancel();
        }
    }

    // =========================================================================
    // Logout
    // =========================================================================

    /// Clear the session and return to the login form
    pub fn logout(&mut self) {
        if let Err(e) = self.session.logout() {
            warn!(error = %e, "Failed to clear session");
        }

        self.login_password.clear();
        self.login_error = None;
        self.login_focus = if self.login_email.is_empty() {
            LoginFocus::Email
        } else {
            LoginFocus::Password
        };
        self.state = AppState::LoggingIn;
        info!("Logged out");
    }
}
