use bytes::Bytes;
use reqwest::header::{HeaderName, HeaderValue};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::{Error, RequestMethod, Response, Result, TransportError, TransportResult};
use std::{collections::HashMap, sync::LazyLock};

static DEFAULT_CLIENT: LazyLock<reqwest::Client> = LazyLock::new(reqwest::Client::new);

fn default_client() -> reqwest::Client {
    DEFAULT_CLIENT.clone()
}

/// A fluent HTTP request builder.
///
/// Configuration calls take and return the builder. Execution borrows it, so
/// the same request can be sent any number of times. Unless `client` is
/// set, every request sends through one process-wide connection pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Request {
    url: String,
    #[serde(default)]
    method: RequestMethod,
    #[serde(default)]
    headers: HashMap<String, String>,
    #[serde(default)]
    body: Option<Bytes>,
    #[serde(skip, default = "default_client")]
    client: reqwest::Client,
}

impl Request {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            method: RequestMethod::Get,
            headers: HashMap::new(),
            body: None,
            client: default_client(),
        }
    }

    pub fn get(url: impl Into<String>) -> Self {
        Self::new(url)
    }

    pub fn head(url: impl Into<String>) -> Self {
        Self::new(url).method(RequestMethod::Head)
    }

    pub fn options(url: impl Into<String>) -> Self {
        Self::new(url).method(RequestMethod::Options)
    }

    pub fn delete(url: impl Into<String>) -> Self {
        Self::new(url).method(RequestMethod::Delete)
    }

    /// A `POST` request. A `Some` payload is sent as a JSON body.
    pub fn post<T>(url: impl Into<String>, payload: Option<&T>) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        Self::new(url).method(RequestMethod::Post).with_json(payload)
    }

    /// A `PUT` request. A `Some` payload is sent as a JSON body.
    pub fn put<T>(url: impl Into<String>, payload: Option<&T>) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        Self::new(url).method(RequestMethod::Put).with_json(payload)
    }

    fn with_json<T>(mut self, payload: Option<&T>) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        if let Some(payload) = payload {
            let body = serde_json::to_vec(payload).map_err(Error::EncodingError)?;
            self.body = Some(Bytes::from(body));
            self.headers
                .insert("Content-Type".to_string(), "application/json".to_string());
        }
        Ok(self)
    }

    pub fn method(mut self, method: impl Into<RequestMethod>) -> Self {
        self.method = method.into();
        self
    }

    /// Keys are kept as given, so `content-type` and `Content-Type` are two
    /// entries and both are sent.
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Merges `headers` into the existing ones. Later values win.
    pub fn headers<I, K, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.headers
            .extend(headers.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Sends through `client` instead of the shared default one.
    pub fn client(mut self, client: reqwest::Client) -> Self {
        self.client = client;
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn get_method(&self) -> &RequestMethod {
        &self.method
    }

    pub fn get_headers(&self) -> &HashMap<String, String> {
        &self.headers
    }

    pub fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    fn build(&self) -> TransportResult<reqwest::RequestBuilder> {
        let method = self.method.resolve()?;
        let url = url::Url::parse(&self.url)
            .map_err(|e| TransportError::InvalidUrl(format!("{} for {}", e, self.url)))?;
        let mut builder = self.client.request(method, url);
        for (key, value) in self.headers.iter() {
            let name = HeaderName::from_bytes(key.as_bytes())
                .map_err(|_| TransportError::InvalidHeader(format!("name {:?}", key)))?;
            let value = HeaderValue::from_str(value)
                .map_err(|_| TransportError::InvalidHeader(format!("value {:?} for {}", value, key)))?;
            builder = builder.header(name, value);
        }
        if let Some(body) = &self.body {
            builder = builder.body(body.clone());
        }
        Ok(builder)
    }

    /// Performs one round trip and drains the whole response body.
    ///
    /// No timeout is applied beyond what the client was built with.
    #[instrument(skip(self), fields(method = %self.method, url = %self.url))]
    pub async fn execute(&self) -> Result<Response> {
        let builder = self.build()?;
        let mut response = builder.send().await.map_err(TransportError::Network)?;
        let status = response.status();
        let headers = std::mem::take(response.headers_mut());
        let body = response.bytes().await.map_err(TransportError::Body)?;
        debug!(status = status.as_u16(), length = body.len(), "response received");
        Ok(Response::new(status, headers, body))
    }

    /// Executes the request and deserializes the JSON body.
    pub async fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        self.execute().await?.json()
    }

    /// Executes the request and deserializes the JSON body into `target`.
    ///
    /// `target` is replaced as a whole, not merged: a field missing from the
    /// body is a `DecodingError` unless `T` marks it `#[serde(default)]`.
    /// `target` is left untouched on failure.
    pub async fn decode_into<T: DeserializeOwned>(&self, target: &mut T) -> Result<()> {
        *target = self.decode().await?;
        Ok(())
    }

    /// Executes a copy of the request on the tokio runtime. Dropping the
    /// handle detaches the call.
    ///
    /// Panics when called outside a tokio runtime.
    pub fn spawn(&self) -> JoinHandle<Result<Response>> {
        let request = self.clone();
        tokio::spawn(async move { request.execute().await })
    }
}
