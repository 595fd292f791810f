//! Logged JSON request guard that captures and logs request bodies.
//!
//! A drop-in replacement for `Json<T>` on write endpoints: the parsed body
//! is re-serialized and written to the log before the handler runs.

use rocket::serde::json::Json;
use rocket::serde::{Deserialize, Serialize};
use rocket::{
    Data, Request,
    data::{self, FromData},
};

/// A wrapper around Rocket's Json that logs the request data.
pub struct LoggedJson<T>(pub T);

impl<T> LoggedJson<T> {
    /// Extract the inner value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> std::ops::Deref for LoggedJson<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<T> std::ops::DerefMut for LoggedJson<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.0
    }
}

/// Formats the log line for a parsed request body.
fn body_log_line(method: &str, path: &str, body: Option<&str>) -> String {
    format!(
        "API Request Body: {} {} | Data: {}",
        method,
        path,
        body.unwrap_or("<failed to serialize>")
    )
}

#[rocket::async_trait]
impl<'r, T: Deserialize<'r> + Serialize> FromData<'r> for LoggedJson<T> {
    type Error = rocket::serde::json::Error<'r>;

    async fn from_data(req: &'r Request<'_>, data: Data<'r>) -> data::Outcome<'r, Self> {
        match Json::<T>::from_data(req, data).await {
            data::Outcome::Success(json_data) => {
                let serialized = serde_json::to_string(&json_data.0).ok();
                info!(
                    "{}",
                    body_log_line(
                        req.method().as_str(),
                        req.uri().path().as_str(),
                        serialized.as_deref()
                    )
                );
                data::Outcome::Success(LoggedJson(json_data.into_inner()))
            }
            data::Outcome::Error(e) => {
                warn!(
                    "API Request Body: {} {} | rejected: {:?}",
                    req.method().as_str(),
                    req.uri().path(),
                    e.1
                );
                data::Outcome::Error(e)
            }
            data::Outcome::Forward(f) => data::Outcome::Forward(f),
        }
    }
}

impl<T: Serialize> Serialize for LoggedJson<T> {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.0.serialize(serializer)
    }
}

impl<T: Clone> Clone for LoggedJson<T> {
    fn clone(&self) -> Self {
        LoggedJson(self.0.clone())
    }
}

impl<T: std::fmt::Debug> std::fmt::Debug for LoggedJson<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_body_log_line() {
        assert_eq!(
            body_log_line("POST", "/api/1/DailyLogs", Some(r#"{"employee_id":1}"#)),
            r#"API Request Body: POST /api/1/DailyLogs | Data: {"employee_id":1}"#
        );
        assert_eq!(
            body_log_line("PUT", "/api/1/Config", None),
            "API Request Body: PUT /api/1/Config | Data: <failed to serialize>"
        );
    }
}
