use crate::{params::Params, transport::RequestOptions, Client, Response, Result};
use http::Method;

/// Session endpoints.
pub struct Login<'a> {
    client: &'a Client,
}

impl<'a> Login<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// Logs in with an email and password.
    ///
    /// A successful response carries the access token in its `token` field.
    pub async fn session(&self, email: &str, password: &str) -> Result<Response> {
        let params = Params::new()
            .with("email", email)
            .with("password", password);

        self.client
            .dispatch(Method::POST, "session", params, RequestOptions::new())
            .await
    }
}
