use crate::codec;
use crate::codec::FormVariant;

/// HTTP method subset used by the diamond protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl std::fmt::Display for HttpMethod {
    fn fmt(
        &self,
        f: &mut std::fmt::Formatter<'_>,
    ) -> std::fmt::Result {
        match self {
            HttpMethod::Get => write!(f, "GET"),
            HttpMethod::Post => write!(f, "POST"),
        }
    }
}

/// One logical request to the diamond service.
///
/// Query and header pairs keep insertion order; the signature is
/// derived from the same ordered fields the body was encoded from.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    /// `http` or `https`
    pub protocol: &'static str,
    pub method: HttpMethod,
    pub host: String,
    pub port: Option<u16>,
    pub path: String,
    pub query: Vec<(String, String)>,
    /// Form-encoded body, when present
    pub body: Option<String>,
    pub headers: Vec<(String, String)>,
}

impl ApiRequest {
    pub(crate) fn new(
        method: HttpMethod,
        host: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            protocol: "https",
            method,
            host: host.into(),
            port: None,
            path: path.into(),
            query: Vec::new(),
            body: None,
            headers: Vec::new(),
        }
    }

    pub(crate) fn with_protocol(
        mut self,
        protocol: &'static str,
    ) -> Self {
        self.protocol = protocol;
        self
    }

    pub(crate) fn with_port(
        mut self,
        port: u16,
    ) -> Self {
        self.port = Some(port);
        self
    }

    pub(crate) fn query(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.query.push((name.into(), value.into()));
        self
    }

    pub(crate) fn header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub(crate) fn body(
        mut self,
        body: String,
    ) -> Self {
        self.body = Some(body);
        self
    }

    /// Full request URL including the encoded query string.
    pub(crate) fn url(&self) -> String {
        let mut url = format!("{}://{}", self.protocol, self.host);
        if let Some(port) = self.port {
            url.push_str(&format!(":{port}"));
        }
        url.push_str(&self.path);
        if !self.query.is_empty() {
            let pairs: Vec<(&str, &str)> = self
                .query
                .iter()
                .map(|(k, v)| (k.as_str(), v.as_str()))
                .collect();
            url.push('?');
            url.push_str(&codec::encode_form(&pairs, FormVariant::Form));
        }
        url
    }
}

/// Status and fully-buffered body of one transport round trip.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

impl ApiResponse {
    pub(crate) fn is_5xx(&self) -> bool {
        self.status >= 500
    }

    pub(crate) fn is_4xx(&self) -> bool {
        (400..500).contains(&self.status)
    }

    /// Body decoded from the service charset.
    pub(crate) fn text(&self) -> String {
        codec::decode_response_text(&self.body)
    }
}
