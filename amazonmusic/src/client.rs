use serde::{Deserialize, Serialize};

#[derive(Debug)]
/// An error that can occur when interacting with the client.
pub enum ClientError {
    /// An error that occurred when making a request.
    ReqwestError(reqwest::Error),
    /// An error that occurred when deserializing a response.
    DeserializationError(serde_json::Error),
    /// The service rejected the request.
    ServiceError {
        /// The HTTP status code.
        status: u16,
        /// The response body, if there was one.
        message: Option<String>,
    },
    /// A lookup succeeded, but returned nothing for the requested ASIN.
    NotFound {
        /// The ASIN that was looked up.
        asin: String,
    },
    /// A payload was missing a field that must always be present.
    MissingField {
        /// The field (or fields, primary and fallback) that were absent.
        field: &'static str,
    },
}
impl std::fmt::Display for ClientError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ClientError::ReqwestError(e) => write!(f, "Reqwest error: {e}"),
            ClientError::DeserializationError(e) => write!(f, "Deserialization error: {e}"),
            ClientError::ServiceError { status, message } => {
                write!(f, "Amazon Music error: HTTP {status}")?;
                if let Some(message) = message {
                    write!(f, ": {message}")?;
                }
                Ok(())
            }
            ClientError::NotFound { asin } => write!(f, "No album found for ASIN {asin}"),
            ClientError::MissingField { field } => write!(f, "Missing field: {field}"),
        }
    }
}
impl std::error::Error for ClientError {}
impl From<reqwest::Error> for ClientError {
    fn from(e: reqwest::Error) -> Self {
        ClientError::ReqwestError(e)
    }
}
impl From<serde_json::Error> for ClientError {
    fn from(e: serde_json::Error) -> Self {
        ClientError::DeserializationError(e)
    }
}
/// A result type for the client.
pub type ClientResult<T> = Result<T, ClientError>;

/// The details of an already-authenticated web player session.
///
/// These are lifted from a logged-in browser session; the client does not
/// perform the login itself.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Session {
    /// The web player's base URL.
    pub base_url: String,
    /// The region segment of API paths, e.g. `EU` or `NA`.
    pub region: String,
    /// The music territory, e.g. `GB` or `US`.
    pub territory: String,
    /// The device ID assigned to the web player.
    pub device_id: String,
    /// The device type assigned to the web player.
    pub device_type: String,
    /// The customer ID of the account.
    pub customer_id: String,
    /// The raw `Cookie` header of the session.
    pub cookies: String,
    /// The CSRF token.
    pub csrf_token: String,
    /// The CSRF nonce.
    pub csrf_rnd: String,
    /// The CSRF timestamp.
    pub csrf_ts: String,
}
impl Default for Session {
    fn default() -> Self {
        Self {
            base_url: "https://music.amazon.co.uk".to_string(),
            region: "EU".to_string(),
            territory: "GB".to_string(),
            device_id: "YOUR_DEVICE_ID".to_string(),
            device_type: "A16ZV8BU3SN1N3".to_string(),
            customer_id: "YOUR_CUSTOMER_ID".to_string(),
            cookies: String::new(),
            csrf_token: String::new(),
            csrf_rnd: String::new(),
            csrf_ts: String::new(),
        }
    }
}

/// A client for the Amazon Music web API.
pub struct Client {
    pub(crate) session: Session,
    pub(crate) client: reqwest::Client,
}
impl Client {
    /// Create a new client for an existing session.
    pub fn new(session: Session) -> Self {
        Self {
            session,
            client: reqwest::Client::new(),
        }
    }

    /// The session this client makes requests with.
    pub fn session(&self) -> &Session {
        &self.session
    }
}
impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.session.base_url)
            .field("region", &self.session.region)
            .finish_non_exhaustive()
    }
}
