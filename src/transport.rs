use crate::error::ClientError;

/// Reusable HTTP transport shared by every call made through one [`Client`].
///
/// [`Client`]: crate::client::Client
#[derive(Debug, Clone)]
pub struct HttpTransport(reqwest::Client);

impl AsRef<reqwest::Client> for HttpTransport {
    fn as_ref(&self) -> &reqwest::Client {
        &self.0
    }
}

impl HttpTransport {
    /// Builds the transport. With `self_signed` set, certificate verification
    /// is disabled so the client can talk to servers using a self-signed
    /// certificate.
    pub fn new(self_signed: bool) -> Result<Self, ClientError> {
        let mut builder = reqwest::Client::builder()
            .use_rustls_tls()
            .timeout(std::time::Duration::from_secs(30));

        if self_signed {
            builder = builder.danger_accept_invalid_certs(true);
        }

        Ok(Self(builder.build().map_err(ClientError::Transport)?))
    }

    pub fn request(&self, method: http::Method, url: &str) -> reqwest::RequestBuilder {
        self.0.request(method, url)
    }
}
