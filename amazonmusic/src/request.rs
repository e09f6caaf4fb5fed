use serde::{Serialize, de::DeserializeOwned};

use crate::{Client, ClientError, ClientResult};

/// Making requests to the Amazon Music web API.
impl Client {
    /// Make a call to the web API. `endpoint` is the path under `/{region}/api/`,
    /// and `target` is the service operation named by the `X-Amz-Target` header.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails, the service responds with a
    /// non-success status, or the response is not valid.
    pub async fn call<T: DeserializeOwned>(
        &self,
        endpoint: &str,
        target: &str,
        body: &impl Serialize,
    ) -> ClientResult<T> {
        let bytes = self.call_raw(endpoint, target, body).await?;
        Ok(serde_json::from_slice(&bytes)?)
    }

    pub(crate) async fn call_raw(
        &self,
        endpoint: &str,
        target: &str,
        body: &impl Serialize,
    ) -> ClientResult<Vec<u8>> {
        let session = &self.session;
        let url = format!("{}/{}/api/{endpoint}", session.base_url, session.region);
        tracing::trace!("calling {target} at {url}");

        let mut request = self
            .client
            .post(url)
            .header("X-Amz-Target", target)
            .header("Content-Encoding", "amz-1.0")
            .header("Content-Type", "application/json")
            .header("csrf-token", &session.csrf_token)
            .header("csrf-rnd", &session.csrf_rnd)
            .header("csrf-ts", &session.csrf_ts)
            .body(serde_json::to_vec(body)?);
        if !session.cookies.is_empty() {
            request = request.header("Cookie", &session.cookies);
        }

        let response = request.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;
        Self::check_status(status.as_u16(), bytes.into())
    }

    fn check_status(status: u16, bytes: Vec<u8>) -> ClientResult<Vec<u8>> {
        if (200..300).contains(&status) {
            return Ok(bytes);
        }

        let message = String::from_utf8_lossy(&bytes).trim().to_string();
        Err(ClientError::ServiceError {
            status,
            message: (!message.is_empty()).then_some(message),
        })
    }
}
