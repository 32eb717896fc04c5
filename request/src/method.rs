use serde::{Deserialize, Serialize};

use crate::{StdResult, TransportError, TransportResult};
use std::{convert::Infallible, fmt, str::FromStr};

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum RequestMethod {
    #[default]
    Get,
    Head,
    Put,
    Post,
    Options,
    Delete,
    /// Any verb outside the shorthand set, sent as given. An empty string
    /// stands for an unset method.
    Extension(String),
}

impl RequestMethod {
    pub fn as_str(&self) -> &str {
        match self {
            RequestMethod::Get => "GET",
            RequestMethod::Head => "HEAD",
            RequestMethod::Put => "PUT",
            RequestMethod::Post => "POST",
            RequestMethod::Options => "OPTIONS",
            RequestMethod::Delete => "DELETE",
            RequestMethod::Extension(method) => method,
        }
    }

    /// The method put on the wire. An unset method becomes `GET` here and
    /// nowhere else.
    pub(crate) fn resolve(&self) -> TransportResult<reqwest::Method> {
        match self {
            RequestMethod::Get => Ok(reqwest::Method::GET),
            RequestMethod::Head => Ok(reqwest::Method::HEAD),
            RequestMethod::Put => Ok(reqwest::Method::PUT),
            RequestMethod::Post => Ok(reqwest::Method::POST),
            RequestMethod::Options => Ok(reqwest::Method::OPTIONS),
            RequestMethod::Delete => Ok(reqwest::Method::DELETE),
            RequestMethod::Extension(method) if method.is_empty() => Ok(reqwest::Method::GET),
            RequestMethod::Extension(method) => reqwest::Method::from_bytes(method.as_bytes())
                .map_err(|_| TransportError::InvalidMethod(format!("{:?}", method))),
        }
    }
}

impl FromStr for RequestMethod {
    type Err = Infallible;

    fn from_str(s: &str) -> StdResult<Self, Self::Err> {
        Ok(match s {
            "GET" => RequestMethod::Get,
            "HEAD" => RequestMethod::Head,
            "PUT" => RequestMethod::Put,
            "POST" => RequestMethod::Post,
            "OPTIONS" => RequestMethod::Options,
            "DELETE" => RequestMethod::Delete,
            other => RequestMethod::Extension(other.to_string()),
        })
    }
}

impl From<&str> for RequestMethod {
    fn from(s: &str) -> Self {
        match s.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        }
    }
}

impl From<String> for RequestMethod {
    fn from(s: String) -> Self {
        RequestMethod::from(s.as_str())
    }
}

impl AsRef<str> for RequestMethod {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for RequestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for RequestMethod {
    fn serialize<S>(&self, serializer: S) -> StdResult<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.as_str().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for RequestMethod {
    fn deserialize<D>(deserializer: D) -> StdResult<RequestMethod, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(RequestMethod::from(s))
    }
}
