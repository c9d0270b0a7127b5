use crate::{
    params::{ParamValue, Params},
    transport::RequestOptions,
    Client, Response, Result,
};
use http::Method;
use serde::Serialize;

const SPORTS_ENDPOINT: &str = "users/settings/sports";
const ACTIVITIES_ENDPOINT: &str = "users/settings/activities";

/// Sport and activity tag settings of the current user.
pub struct Tags<'a> {
    client: &'a Client,
}

impl<'a> Tags<'a> {
    pub(crate) fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn get_sports_tags(&self) -> Result<Response> {
        self.client
            .dispatch(Method::GET, SPORTS_ENDPOINT, Params::new(), RequestOptions::new())
            .await
    }

    /// Replaces the custom sports list.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SerializationFailed`](crate::Error::SerializationFailed)
    /// if the tags cannot be represented as JSON.
    pub async fn set_sports_tags<T: Serialize>(&self, custom_sports: &[T]) -> Result<Response> {
        let params = Params::new().with("customSports", ParamValue::from_serialize(custom_sports)?);

        self.client
            .dispatch(Method::PATCH, SPORTS_ENDPOINT, params, RequestOptions::new())
            .await
    }

    pub async fn get_activities_tags(&self) -> Result<Response> {
        self.client
            .dispatch(Method::GET, ACTIVITIES_ENDPOINT, Params::new(), RequestOptions::new())
            .await
    }

    /// Replaces the custom activities list.
    pub async fn set_activities_tags<T: Serialize>(&self, custom_activities: &[T]) -> Result<Response> {
        let params = Params::new().with(
            "customActivities",
            ParamValue::from_serialize(custom_activities)?,
        );

        self.client
            .dispatch(Method::PATCH, ACTIVITIES_ENDPOINT, params, RequestOptions::new())
            .await
    }
}
