//! Login credentials for the PocketRadar API.

use std::fmt;

/// A login/password pair with an optional cached access token.
///
/// # Examples
///
/// ```
/// use pocketradar::Credential;
///
/// let credential = Credential::new("a@b.com", "secret").with_access_token("T123");
/// assert_eq!(credential.login(), "a@b.com");
/// assert_eq!(credential.access_token(), Some("T123"));
/// assert!(!format!("{:?}", credential).contains("secret"));
/// ```
#[derive(Clone, PartialEq, Eq)]
pub struct Credential {
    login: String,
    password: String,
    access_token: Option<String>,
}

impl Credential {
    /// Creates a credential without an access token.
    pub fn new(login: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            login: login.into(),
            password: password.into(),
            access_token: None,
        }
    }

    /// Attaches an access token, builder style.
    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn login(&self) -> &str {
        &self.login
    }

    pub fn password(&self) -> &str {
        &self.password
    }

    pub fn access_token(&self) -> Option<&str> {
        self.access_token.as_deref()
    }

    pub fn set_login(&mut self, login: impl Into<String>) {
        self.login = login.into();
    }

    pub fn set_password(&mut self, password: impl Into<String>) {
        self.password = password.into();
    }

    pub fn set_access_token(&mut self, token: Option<String>) {
        self.access_token = token;
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credential")
            .field("login", &self.login)
            .field("password", &"<redacted>")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}
