//! Application state for the duckgate shell.
//!
//! The `App` struct plays the UI layer: it owns the navigator, runs the
//! auth flows and decides where to go from the outcomes they return.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use tracing::{debug, info, warn};

use duckgate_core::auth::{AuthError, Registration, SessionStore};
use duckgate_core::{
    ApiClient, AuthApi, Config, Navigation, Navigator, Route, Session, SessionContext, TokenStore,
    ViewScope,
};

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for username input.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

pub const HELP_TEXT: &str = "\
Commands:
  go <path>          navigate (/ducks, /my-profile, /login, /register)
  login [username]   sign in
  register           create an account
  logout             sign out
  whoami             show the signed-in user
  where              show the current view
  help               show this text
  quit               exit";

// ============================================================================
// Commands
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Go(String),
    Login(Option<String>),
    Register,
    Logout,
    WhoAmI,
    Where,
    Help,
    Quit,
    Empty,
    Unknown(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let mut parts = line.split_whitespace();
        let Some(head) = parts.next() else {
            return Command::Empty;
        };
        let arg = parts.next().map(str::to_string);

        match head.to_lowercase().as_str() {
            "go" | "cd" | "open" => match arg {
                Some(path) => Command::Go(path),
                None => Command::Unknown("go needs a path".to_string()),
            },
            "login" | "signin" => Command::Login(arg),
            "register" | "signup" => Command::Register,
            "logout" | "signout" => Command::Logout,
            "whoami" => Command::WhoAmI,
            "where" | "pwd" => Command::Where,
            "help" | "?" => Command::Help,
            "quit" | "exit" | "q" => Command::Quit,
            other if other.starts_with('/') => Command::Go(head.to_string()),
            other => Command::Unknown(other.to_string()),
        }
    }
}

/// Input the login form collected
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Input the registration form collected
#[derive(Debug, Clone, Default)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

// ============================================================================
// App
// ============================================================================

pub struct App {
    pub config: Config,
    /// Where `config` is saved; `None` keeps it in memory
    config_path: Option<PathBuf>,
    store: SessionStore,
    registration: Registration,
    navigator: Navigator,
    scope: Arc<ViewScope>,
}

impl App {
    /// Create a new application instance talking to the configured API
    pub fn new(config: Config) -> Result<Self> {
        let api = Arc::new(ApiClient::new(config.api_base_url())?);
        let tokens = config.token_store()?;
        let config_path = Config::config_path().ok();
        debug!(
            api = config.api_base_url(),
            backend = tokens.backend_name(),
            "App configured"
        );

        let mut app = Self::with_parts(config, api, tokens);
        app.config_path = config_path;
        Ok(app)
    }

    /// Build an app around explicit collaborators. The config is not saved.
    pub fn with_parts(config: Config, api: Arc<dyn AuthApi>, tokens: Arc<dyn TokenStore>) -> Self {
        let store = SessionStore::new(api.clone(), tokens, SessionContext::new());
        let registration = Registration::new(api);

        Self {
            config,
            config_path: None,
            store,
            registration,
            navigator: Navigator::new(),
            scope: Arc::new(ViewScope::new()),
        }
    }

    pub fn session(&self) -> &SessionContext {
        self.store.session()
    }

    /// Scope every collaborator call runs in; cancelling it aborts them
    pub fn scope(&self) -> Arc<ViewScope> {
        self.scope.clone()
    }

    pub fn current_route(&self) -> Option<Route> {
        self.navigator.current()
    }

    pub fn intent(&self) -> Option<Route> {
        self.navigator.intent()
    }

    /// Restore any persisted session, then navigate to `path`
    pub async fn start(&mut self, path: &str) -> Navigation {
        match self.scope.run(self.store.initialize()).await {
            Some(true) => info!("Signed in from saved token"),
            Some(false) => debug!("Starting signed out"),
            None => warn!("Session restore cancelled"),
        }
        self.go(path).await
    }

    pub async fn go(&mut self, path: &str) -> Navigation {
        let authenticated = self.session().is_authenticated().await;
        self.navigator.navigate(path, authenticated)
    }

    /// Run the login flow and follow its outcome.
    /// Returns a short status line for the user.
    ///
    /// The intent stays on the login view until a login succeeds, so a
    /// failed attempt does not lose the page the user asked for.
    pub async fn login(&mut self, form: LoginForm) -> String {
        if let Err(msg) = validate_length("Username", &form.username, MAX_USERNAME_LENGTH)
            .and_then(|()| validate_length("Password", &form.password, MAX_PASSWORD_LENGTH))
        {
            return msg;
        }

        let intent = self.navigator.intent();
        let result = self
            .scope
            .run(self.store.login(&form.username, &form.password, intent))
            .await;

        match result {
            Some(Ok(outcome)) => {
                self.navigator.take_intent();
                self.config.last_username = Some(outcome.user.username.clone());
                self.save_config();
                self.go(outcome.destination.path()).await;
                format!("Welcome, {}!", outcome.user.username)
            }
            Some(Err(e)) => login_error_message(&e),
            None => "Login cancelled".to_string(),
        }
    }

    pub async fn register(&mut self, form: RegisterForm) -> String {
        if let Err(msg) = validate_length("Username", &form.username, MAX_USERNAME_LENGTH)
            .and_then(|()| validate_length("Email", &form.email, MAX_EMAIL_LENGTH))
            .and_then(|()| validate_length("Password", &form.password, MAX_PASSWORD_LENGTH))
        {
            return msg;
        }

        let result = self
            .scope
            .run(self.registration.register(
                &form.username,
                &form.email,
                &form.password,
                &form.confirm_password,
            ))
            .await;

        match result {
            Some(Ok(outcome)) => {
                self.go(outcome.destination.path()).await;
                "Account created. Please log in.".to_string()
            }
            Some(Err(AuthError::PasswordMismatch)) => "Passwords do not match".to_string(),
            Some(Err(e)) => format!("Registration failed: {}", e),
            None => "Registration cancelled".to_string(),
        }
    }

    pub async fn logout(&mut self) -> Navigation {
        self.store.logout().await;
        let authenticated = self.session().is_authenticated().await;
        self.navigator
            .refresh(authenticated)
            .unwrap_or_else(|| self.navigator.navigate(Route::Login.path(), authenticated))
    }

    /// Text for the current view
    pub async fn render(&self) -> String {
        match self.navigator.current() {
            Some(route) => render_view(route, &self.session().snapshot().await),
            None => String::new(),
        }
    }

    fn save_config(&self) {
        if let Some(ref path) = self.config_path {
            if let Err(e) = self.config.save_to(path) {
                warn!(error = %e, "Failed to save config");
            }
        }
    }
}

/// Render one view as plain text
pub fn render_view(route: Route, session: &Session) -> String {
    let username = session.user().map(|u| u.username.as_str()).unwrap_or("");
    match route {
        Route::Ducks => format!(
            "== Ducks ==\nHello, {}! The ducks are waddling.\n(go /my-profile to see your profile)",
            username
        ),
        Route::MyProfile => {
            let email = session.user().map(|u| u.email.as_str()).unwrap_or("");
            format!("== My profile ==\nUsername: {}\nEmail:    {}", username, email)
        }
        Route::Login => {
            "== Log in ==\nType `login` to sign in, or `go /register` to create an account."
                .to_string()
        }
        Route::Register => {
            "== Sign up ==\nType `register` to create an account, or `go /login` if you have one."
                .to_string()
        }
    }
}

/// User-facing message for a failed login
fn login_error_message(err: &AuthError) -> String {
    use duckgate_core::ApiError;

    match err {
        AuthError::MissingCredentials => "Username and password required".to_string(),
        AuthError::Api(ApiError::BadRequest(_) | ApiError::Unauthorized) => {
            "Invalid username or password".to_string()
        }
        AuthError::Api(ApiError::MissingToken) => "Login failed: no token received".to_string(),
        AuthError::Api(ApiError::NetworkError(e)) if e.is_timeout() => {
            "Connection timed out. Please try again.".to_string()
        }
        AuthError::Api(ApiError::NetworkError(_)) => {
            "Unable to connect to server. Check your internet connection.".to_string()
        }
        other => format!("Login failed: {}", other),
    }
}

fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

fn validate_length(field: &str, value: &str, max: usize) -> std::result::Result<(), String> {
    if value.chars().count() > max {
        return Err(format!("{} is too long (max {} characters)", field, max));
    }
    if !value.chars().all(is_valid_input_char) {
        return Err(format!("{} contains invalid characters", field));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use duckgate_core::auth::MemoryTokenStore;
    use duckgate_core::models::AuthorizeResponse;
    use duckgate_core::{ApiError, User};

    /// Accepts alice/secret and token "abc"
    struct StubApi;

    #[async_trait]
    impl AuthApi for StubApi {
        async fn register(&self, _: &str, _: &str, _: &str) -> Result<(), ApiError> {
            Ok(())
        }

        async fn authorize(
            &self,
            _username: &str,
            password: &str,
        ) -> Result<AuthorizeResponse, ApiError> {
            if password != "secret" {
                return Err(ApiError::Unauthorized);
            }
            Ok(AuthorizeResponse {
                jwt: Some("abc".to_string()),
                user: Some(User::new("alice", "a@x.com")),
            })
        }

        async fn fetch_user_info(&self, token: &str) -> Result<User, ApiError> {
            match token {
                "abc" => Ok(User::new("alice", "a@x.com")),
                _ => Err(ApiError::Unauthorized),
            }
        }
    }

    fn test_app(tokens: MemoryTokenStore) -> App {
        App::with_parts(Config::default(), Arc::new(StubApi), Arc::new(tokens))
    }

    fn login_form(password: &str) -> LoginForm {
        LoginForm {
            username: "alice".to_string(),
            password: password.to_string(),
        }
    }

    fn register_form(confirm: &str) -> RegisterForm {
        RegisterForm {
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password: "secret".to_string(),
            confirm_password: confirm.to_string(),
        }
    }

    // -------------------------------------------------------------------------
    // Command Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_command_parse() {
        assert_eq!(Command::parse("go /ducks"), Command::Go("/ducks".to_string()));
        assert_eq!(Command::parse("/my-profile"), Command::Go("/my-profile".to_string()));
        assert_eq!(Command::parse("login"), Command::Login(None));
        assert_eq!(
            Command::parse("LOGIN alice"),
            Command::Login(Some("alice".to_string()))
        );
        assert_eq!(Command::parse("register"), Command::Register);
        assert_eq!(Command::parse("logout"), Command::Logout);
        assert_eq!(Command::parse("whoami"), Command::WhoAmI);
        assert_eq!(Command::parse("where"), Command::Where);
        assert_eq!(Command::parse("?"), Command::Help);
        assert_eq!(Command::parse("exit"), Command::Quit);
    }

    #[test]
    fn test_command_parse_edge_cases() {
        assert_eq!(Command::parse(""), Command::Empty);
        assert_eq!(Command::parse("   "), Command::Empty);
        assert!(matches!(Command::parse("go"), Command::Unknown(_)));
        assert_eq!(Command::parse("quack"), Command::Unknown("quack".to_string()));
    }

    // -------------------------------------------------------------------------
    // Rendering Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_render_profile_shows_user() {
        let session = Session::authenticated("abc".to_string(), User::new("alice", "a@x.com"));
        let text = render_view(Route::MyProfile, &session);
        assert!(text.contains("alice"));
        assert!(text.contains("a@x.com"));
    }

    #[test]
    fn test_render_anonymous_views() {
        let session = Session::default();
        assert!(render_view(Route::Login, &session).contains("Log in"));
        assert!(render_view(Route::Register, &session).contains("Sign up"));
    }

    // -------------------------------------------------------------------------
    // Input Validation Tests
    // -------------------------------------------------------------------------

    #[test]
    fn test_validate_length() {
        assert!(validate_length("Username", "alice", MAX_USERNAME_LENGTH).is_ok());
        assert!(validate_length("Username", &"a".repeat(50), MAX_USERNAME_LENGTH).is_ok());
        assert!(validate_length("Username", &"a".repeat(51), MAX_USERNAME_LENGTH).is_err());
        assert!(validate_length("Password", "pass\tword", MAX_PASSWORD_LENGTH).is_err());
        assert!(validate_length("Password", "", MAX_PASSWORD_LENGTH).is_ok());
    }

    #[test]
    fn test_login_error_messages() {
        assert_eq!(
            login_error_message(&AuthError::MissingCredentials),
            "Username and password required"
        );
        assert_eq!(
            login_error_message(&AuthError::Api(ApiError::Unauthorized)),
            "Invalid username or password"
        );
        assert!(login_error_message(&AuthError::Api(ApiError::ServerError("boom".into())))
            .starts_with("Login failed"));
    }

    // -------------------------------------------------------------------------
    // Navigation Tests
    // -------------------------------------------------------------------------

    #[tokio::test]
    async fn test_failed_login_keeps_intent() {
        let mut app = test_app(MemoryTokenStore::new());
        app.start("/my-profile").await;
        assert_eq!(app.current_route(), Some(Route::Login));
        assert_eq!(app.intent(), Some(Route::MyProfile));

        assert_eq!(app.login(login_form("")).await, "Username and password required");
        assert_eq!(app.login(login_form("wrong")).await, "Invalid username or password");
        assert_eq!(app.intent(), Some(Route::MyProfile));
        assert_eq!(app.current_route(), Some(Route::Login));

        assert_eq!(app.login(login_form("secret")).await, "Welcome, alice!");
        assert_eq!(app.current_route(), Some(Route::MyProfile));
        assert_eq!(app.intent(), None);
    }

    #[tokio::test]
    async fn test_login_then_logout() {
        let mut app = test_app(MemoryTokenStore::new());
        app.start("/login").await;

        app.login(login_form("secret")).await;
        assert_eq!(app.current_route(), Some(Route::Ducks));
        assert_eq!(app.config.last_username.as_deref(), Some("alice"));
        assert!(app.render().await.contains("alice"));

        let navigation = app.logout().await;
        assert!(navigation.redirected);
        assert_eq!(navigation.route, Route::Login);
        assert!(!app.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_register_goes_to_login() {
        let mut app = test_app(MemoryTokenStore::new());
        app.start("/register").await;

        assert_eq!(app.register(register_form("other")).await, "Passwords do not match");
        assert_eq!(app.current_route(), Some(Route::Register));

        app.register(register_form("secret")).await;
        assert_eq!(app.current_route(), Some(Route::Login));
        assert!(!app.session().is_authenticated().await);
    }

    #[tokio::test]
    async fn test_start_with_saved_token() {
        let mut app = test_app(MemoryTokenStore::with_token("abc"));
        let navigation = app.start("/login").await;
        assert!(navigation.redirected);
        assert_eq!(navigation.route, Route::Ducks);
        assert_eq!(app.scope().in_flight(), 0);
    }
}
