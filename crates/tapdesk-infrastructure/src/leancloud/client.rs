//! LeanCloudClient - REST implementation of the backend collaborators.
//!
//! Authentication goes through `/1.1/login`, `/1.1/users/me` and
//! `/1.1/logout`; directory reads through `/1.1/roles` and
//! `/1.1/classes/Group`; cloud functions through `/1.1/functions/{name}`.
//!
//! The client remembers the token of the last login/restore and sends it as
//! `X-LC-Session` on cloud function calls. Directory reads always use the
//! token of the session they are evaluated for.

use super::dto::{
    ApiErrorBody, AuthenticatedUser, FunctionResult, GroupRecord, LoginRequest, QueryResults,
    RoleRecord,
};
use super::where_clause;
use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::{PoisonError, RwLock};
use std::time::Duration;
use tapdesk_core::backend::{Authenticator, CloudFunctions, DirectoryBackend};
use tapdesk_core::config::BackendConfig;
use tapdesk_core::role::RoleQuery;
use tapdesk_core::{DeskError, Group, Result, Role, Session};

const HEADER_APP_ID: &str = "X-LC-Id";
const HEADER_APP_KEY: &str = "X-LC-Key";
const HEADER_SESSION: &str = "X-LC-Session";

/// Largest page the query endpoints hand out.
const QUERY_LIMIT: &str = "1000";

/// Error codes LeanCloud uses for rejected credentials.
///
/// 210: username and password mismatch, 211: user not found,
/// 219: too many failed logins.
const CREDENTIAL_ERROR_CODES: [i64; 3] = [210, 211, 219];

/// REST client for a single LeanCloud application.
#[derive(Debug)]
pub struct LeanCloudClient {
    http: Client,
    base_url: String,
    app_id: String,
    app_key: String,
    session_token: RwLock<Option<String>>,
}

impl LeanCloudClient {
    /// Creates a client from validated backend credentials.
    pub fn new(config: &BackendConfig) -> Result<Self> {
        config.validate()?;
        let http = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self {
            http,
            base_url: config.server_url.trim_end_matches('/').to_string(),
            app_id: config.app_id.clone(),
            app_key: config.app_key.clone(),
            session_token: RwLock::new(None),
        })
    }

    /// Binds (or clears) the token sent with cloud function calls.
    pub fn bind_session(&self, session_token: Option<String>) {
        *self
            .session_token
            .write()
            .unwrap_or_else(PoisonError::into_inner) = session_token;
    }

    /// Returns the currently bound session token.
    pub fn session_token(&self) -> Option<String> {
        self.session_token
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn url(&self, path: &str) -> String {
        format!("{}/1.1/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn request(&self, method: Method, path: &str, session_token: Option<&str>) -> RequestBuilder {
        let mut request = self
            .http
            .request(method, self.url(path))
            .header(HEADER_APP_ID, &self.app_id)
            .header(HEADER_APP_KEY, &self.app_key);
        if let Some(token) = session_token {
            request = request.header(HEADER_SESSION, token);
        }
        request
    }

    /// Sends `request` and decodes a successful body as `T`.
    async fn send<T: DeserializeOwned>(&self, query: &str, request: RequestBuilder) -> Result<T> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let err = error_from_response(query, status, &body);
            tracing::warn!("[LeanCloud] {} failed: {}", query, err);
            return Err(err);
        }

        let body = response.text().await?;
        serde_json::from_str(&body)
            .map_err(|e| DeskError::upstream(query, format!("unexpected response body: {e}")))
    }

    async fn query_class<T: DeserializeOwned>(
        &self,
        query: &str,
        path: &str,
        filter: &Value,
        session_token: &str,
    ) -> Result<Vec<T>> {
        let request = self
            .request(Method::GET, path, Some(session_token))
            .query(&[("where", filter.to_string().as_str()), ("limit", QUERY_LIMIT)]);
        let results: QueryResults<T> = self.send(query, request).await?;
        Ok(results.results)
    }
}

/// Maps a non-success response onto a `DeskError`.
///
/// Rejected credentials become `Unauthorized`; everything else is a failed
/// upstream query carrying the server's message.
pub(crate) fn error_from_response(query: &str, status: StatusCode, body: &str) -> DeskError {
    let parsed: ApiErrorBody = serde_json::from_str(body).unwrap_or_default();
    let message = parsed
        .text()
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {status}"));

    let rejected = status == StatusCode::UNAUTHORIZED
        || parsed
            .code
            .is_some_and(|code| CREDENTIAL_ERROR_CODES.contains(&code));
    if rejected {
        DeskError::unauthorized(message)
    } else {
        DeskError::upstream(query, message)
    }
}

#[async_trait]
impl Authenticator for LeanCloudClient {
    async fn login(&self, username: &str, password: &str) -> Result<Session> {
        let request = self
            .request(Method::POST, "login", None)
            .json(&LoginRequest { username, password });
        let user: AuthenticatedUser = self.send("login", request).await?;
        let session = Session::from(user);
        self.bind_session(Some(session.session_token.clone()));
        Ok(session)
    }

    async fn become_user(&self, session_token: &str) -> Result<Session> {
        let request = self.request(Method::GET, "users/me", Some(session_token));
        let user: AuthenticatedUser = self.send("users/me", request).await?;
        let session = Session::from(user);
        self.bind_session(Some(session.session_token.clone()));
        Ok(session)
    }

    async fn logout(&self, session_token: &str) -> Result<()> {
        if self.session_token().as_deref() == Some(session_token) {
            self.bind_session(None);
        }
        let request = self.request(Method::POST, "logout", Some(session_token));
        let _: Value = self.send("logout", request).await?;
        Ok(())
    }
}

#[async_trait]
impl DirectoryBackend for LeanCloudClient {
    async fn find_roles(&self, session: &Session, query: &RoleQuery) -> Result<Vec<Role>> {
        let filter = where_clause::role_filter(query);
        let records: Vec<RoleRecord> = self
            .query_class("roles", "roles", &filter, &session.session_token)
            .await?;
        Ok(records.into_iter().map(Role::from).collect())
    }

    async fn find_groups_by_roles(
        &self,
        session: &Session,
        role_ids: &[String],
    ) -> Result<Vec<Group>> {
        let filter = where_clause::groups_by_roles_filter(role_ids);
        let records: Vec<GroupRecord> = self
            .query_class("groups", "classes/Group", &filter, &session.session_token)
            .await?;
        Ok(records.into_iter().map(Group::from).collect())
    }
}

#[async_trait]
impl CloudFunctions for LeanCloudClient {
    async fn run(&self, name: &str, params: Value) -> Result<Value> {
        let token = self.session_token();
        let request = self
            .request(Method::POST, &format!("functions/{name}"), token.as_deref())
            .json(&params);
        let response: FunctionResult = self.send(name, request).await?;
        Ok(response.result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> BackendConfig {
        BackendConfig {
            app_id: "app".to_string(),
            app_key: "key".to_string(),
            server_url: "https://api.example.com/".to_string(),
        }
    }

    #[test]
    fn test_new_rejects_incomplete_config() {
        let err = LeanCloudClient::new(&BackendConfig::default()).unwrap_err();
        assert!(err.is_config());
    }

    #[test]
    fn test_url_joins_api_version() {
        let client = LeanCloudClient::new(&config()).unwrap();
        assert_eq!(client.url("classes/Group"), "https://api.example.com/1.1/classes/Group");
        assert_eq!(client.url("/login"), "https://api.example.com/1.1/login");
    }

    #[test]
    fn test_session_binding() {
        let client = LeanCloudClient::new(&config()).unwrap();
        assert_eq!(client.session_token(), None);
        client.bind_session(Some("tok".to_string()));
        assert_eq!(client.session_token().as_deref(), Some("tok"));
        client.bind_session(None);
        assert_eq!(client.session_token(), None);
    }

    #[test]
    fn test_request_carries_app_and_session_headers() {
        let client = LeanCloudClient::new(&config()).unwrap();
        let request = client
            .request(Method::GET, "users/me", Some("tok"))
            .build()
            .unwrap();
        assert_eq!(request.headers()[HEADER_APP_ID], "app");
        assert_eq!(request.headers()[HEADER_APP_KEY], "key");
        assert_eq!(request.headers()[HEADER_SESSION], "tok");

        let anonymous = client.request(Method::POST, "login", None).build().unwrap();
        assert!(anonymous.headers().get(HEADER_SESSION).is_none());
    }

    #[test]
    fn test_credential_errors_are_unauthorized() {
        let err = error_from_response(
            "login",
            StatusCode::BAD_REQUEST,
            r#"{"code":210,"error":"The username and password mismatch."}"#,
        );
        assert_eq!(
            err,
            DeskError::unauthorized("The username and password mismatch.")
        );

        let err = error_from_response("users/me", StatusCode::UNAUTHORIZED, "");
        assert!(err.is_unauthorized());
    }

    #[test]
    fn test_other_errors_are_upstream_failures() {
        let err = error_from_response(
            "groups",
            StatusCode::SERVICE_UNAVAILABLE,
            r#"{"message":"try again later"}"#,
        );
        assert_eq!(err, DeskError::upstream("groups", "try again later"));

        let err = error_from_response("roles", StatusCode::BAD_GATEWAY, "<html>");
        assert_eq!(err, DeskError::upstream("roles", "HTTP 502 Bad Gateway"));
    }
}
