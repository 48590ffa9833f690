//! HTTP gateway for the registry REST API.
//!
//! Every body is classified by its root element before anything else looks
//! at it: an `error` root is the registry's error envelope and always wins,
//! the resource's own root is decoded into the resource, and anything else
//! is a decode failure. HTTP status codes are not consulted.

use std::io::Write;
use std::sync::Mutex;
use std::time::Duration;

use anyhow::Context;
use async_trait::async_trait;
use quick_xml::events::Event;
use quick_xml::Reader;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::{Method, Url};
use tracing::debug;

use crate::config::Config;
use crate::error::CliError;
use crate::model::{ErrorEnvelope, Resource};
use crate::url::{build_url, parse_origin};

/// Per-call timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Sends a single request and returns the raw response body.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, method: Method, url: Url) -> Result<String, CliError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static("application/xml"));

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client })
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, method: Method, url: Url) -> Result<String, CliError> {
        let response = self.client.request(method, url).send().await?;
        debug!(status = response.status().as_u16(), "registry responded");
        Ok(response.text().await?)
    }
}

/// Registry API client.
pub struct RegistryClient {
    transport: Box<dyn Transport>,
    origin: Url,
    api_key: Option<String>,
    dump: Option<Mutex<Box<dyn Write + Send>>>,
}

impl RegistryClient {
    /// Create a client over HTTP from config.
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let transport = HttpTransport::new()?;
        Ok(Self::with_transport(config, Box::new(transport))?)
    }

    /// Create a client over an arbitrary transport.
    pub fn with_transport(
        config: &Config,
        transport: Box<dyn Transport>,
    ) -> Result<Self, CliError> {
        let client = Self {
            transport,
            origin: parse_origin(&config.base_url)?,
            api_key: config.api_key.clone(),
            dump: None,
        };
        Ok(if config.dump {
            client.with_dump_sink(Box::new(std::io::stderr()))
        } else {
            client
        })
    }

    /// Write raw response bodies to `sink` instead of stderr.
    pub fn with_dump_sink(mut self, sink: Box<dyn Write + Send>) -> Self {
        self.dump = Some(Mutex::new(sink));
        self
    }

    /// URL of a resource of type `T`.
    pub fn resource_url<T: Resource>(&self, handle: &str) -> Result<Url, CliError> {
        build_url(&self.origin, T::ROUTE, self.api_key.as_deref(), &[handle])
    }

    /// GET a resource.
    pub async fn get<T: Resource>(&self, url: Url) -> Result<T, CliError> {
        let body = self.execute(Method::GET, url).await?;
        decode(&body)
    }

    /// DELETE a resource and decode the registry's echo of it.
    pub async fn delete<T: Resource>(&self, url: Url) -> Result<T, CliError> {
        let body = self.execute(Method::DELETE, url).await?;
        decode(&body)
    }

    /// DELETE a resource, dropping whatever the registry answers unless it
    /// is an error envelope.
    pub async fn delete_discarding(&self, url: Url) -> Result<(), CliError> {
        let body = self.execute(Method::DELETE, url).await?;
        match root_element(&body) {
            Some(root) if root == ErrorEnvelope::ROOT => Err(decode_envelope(&body)),
            _ => Ok(()),
        }
    }

    async fn execute(&self, method: Method, url: Url) -> Result<String, CliError> {
        // Only the path is logged; the query carries the API key.
        debug!(method = %method, path = url.path(), "registry request");
        let body = self.transport.send(method, url).await?;
        self.dump_body(&body);
        Ok(body)
    }

    /// Raw body, before any classification, when dumping is on.
    fn dump_body(&self, body: &str) {
        let Some(sink) = &self.dump else {
            return;
        };
        if let Ok(mut sink) = sink.lock() {
            let _ = writeln!(sink, "{}", body);
            let _ = sink.flush();
        }
    }
}

/// Decode a response body as `T`, unless it is an error envelope.
pub fn decode<T: Resource>(body: &str) -> Result<T, CliError> {
    match root_element(body) {
        Some(root) if root == ErrorEnvelope::ROOT => Err(decode_envelope(body)),
        Some(root) if root == T::ROOT => quick_xml::de::from_str(body)
            .map_err(|e| CliError::Decode(format!("invalid {} payload: {}", T::KIND, e))),
        Some(root) => Err(CliError::Decode(format!(
            "expected <{}> but the registry sent <{}>",
            T::ROOT,
            root
        ))),
        None => Err(CliError::Decode("response is not an XML document".to_string())),
    }
}

fn decode_envelope(body: &str) -> CliError {
    match quick_xml::de::from_str::<ErrorEnvelope>(body) {
        Ok(envelope) => {
            let details = envelope.details();
            CliError::registry(envelope.code, envelope.message, details)
        }
        Err(e) => CliError::Decode(format!("invalid error payload: {}", e)),
    }
}

/// Local name of the document's root element, if the body has one.
fn root_element(body: &str) -> Option<String> {
    let mut reader = Reader::from_str(body);
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                return Some(String::from_utf8_lossy(e.local_name().as_ref()).into_owned());
            }
            Ok(Event::Eof) | Err(_) => return None,
            Ok(Event::Text(text)) if !text.iter().all(u8::is_ascii_whitespace) => return None,
            Ok(_) => continue,
        }
    }
}


#[cfg(test)]
mod tests {
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use super::fake::{client, FakeTransport, SharedSink};
    use super::*;
    use crate::model::fixtures::{CUSTOMER_XML, ERROR_XML, NETWORK_XML};
    use crate::model::{Customer, Network};

    #[test]
    fn test_error_envelope_wins_over_result() {
        let err = decode::<Customer>(ERROR_XML).unwrap_err();
        match err {
            CliError::Registry { code, message, .. } => {
                assert_eq!(code, "E_OBJECT_NOT_FOUND");
                assert_eq!(message, "Handle not found");
            }
            other => panic!("expected registry error, got {other:?}"),
        }
    }

    #[test]
    fn test_result_root_decodes_into_resource() {
        let network: Network = decode(NETWORK_XML).unwrap();
        assert_eq!(network.handle, "NET-192-0-2-0-1");
    }

    #[test]
    fn test_unknown_root_is_a_decode_error() {
        let body = r#"<ticketedRequest xmlns="http://www.arin.net/regrws/core/v1"><ticket/></ticketedRequest>"#;
        assert!(matches!(decode::<Network>(body), Err(CliError::Decode(_))));
    }

    #[test]
    fn test_wrong_resource_root_is_a_decode_error() {
        assert!(matches!(
            decode::<Network>(CUSTOMER_XML),
            Err(CliError::Decode(_))
        ));
    }

    #[test]
    fn test_non_xml_body_is_a_decode_error() {
        assert!(matches!(
            decode::<Customer>("Service Unavailable"),
            Err(CliError::Decode(_))
        ));
        assert!(matches!(decode::<Customer>(""), Err(CliError::Decode(_))));
    }

    #[test]
    fn test_root_element_ignores_prolog_and_prefix() {
        let body = "<?xml version=\"1.0\"?>\n<!-- hi -->\n<ns2:error xmlns:ns2=\"urn:x\"/>";
        assert_eq!(root_element(body).as_deref(), Some("error"));
    }

    #[tokio::test]
    async fn test_delete_discarding_accepts_ticket_and_empty_bodies() {
        let transport = FakeTransport::new();
        transport
            .respond(Method::DELETE, "/rest/net/NET-1", "<ticketedRequest/>")
            .respond(Method::DELETE, "/rest/net/NET-2", "");
        let client = client(&transport);

        let url = client.resource_url::<Network>("NET-1").unwrap();
        client.delete_discarding(url).await.unwrap();
        let url = client.resource_url::<Network>("NET-2").unwrap();
        client.delete_discarding(url).await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_discarding_surfaces_envelope() {
        let transport = FakeTransport::new();
        transport.respond(Method::DELETE, "/rest/net/NET-1", ERROR_XML);
        let client = client(&transport);

        let url = client.resource_url::<Network>("NET-1").unwrap();
        let err = client.delete_discarding(url).await.unwrap_err();
        assert_eq!(err.to_string(), "Handle not found");
    }

    #[tokio::test]
    async fn test_dump_writes_envelope_body_before_failing() {
        let transport = FakeTransport::new();
        transport.respond(Method::GET, "/rest/customer/CUST-9", ERROR_XML);
        let sink = SharedSink::default();
        let client = client(&transport).with_dump_sink(Box::new(sink.clone()));

        let url = client.resource_url::<Customer>("CUST-9").unwrap();
        let err = client.get::<Customer>(url).await.unwrap_err();
        assert_eq!(err.to_string(), "Handle not found");
        assert_eq!(sink.contents(), format!("{ERROR_XML}\n"));
        assert_eq!(transport.calls().len(), 1);
    }

    #[tokio::test]
    async fn test_dump_writes_each_body_on_success() {
        let transport = FakeTransport::new();
        transport
            .respond(Method::GET, "/rest/customer/C07654321", CUSTOMER_XML)
            .respond(Method::DELETE, "/rest/net/NET-1", "<ticketedRequest/>");
        let sink = SharedSink::default();
        let client = client(&transport).with_dump_sink(Box::new(sink.clone()));

        let url = client.resource_url::<Customer>("C07654321").unwrap();
        let customer = client.get::<Customer>(url).await.unwrap();
        assert_eq!(customer.handle, "C07654321");
        let url = client.resource_url::<Network>("NET-1").unwrap();
        client.delete_discarding(url).await.unwrap();

        assert_eq!(
            sink.contents(),
            format!("{CUSTOMER_XML}\n<ticketedRequest/>\n")
        );
    }

    #[test]
    fn test_no_dump_sink_unless_enabled() {
        let transport = FakeTransport::new();
        assert!(client(&transport).dump.is_none());

        let config = Config {
            dump: true,
            ..super::fake::config()
        };
        let client = RegistryClient::with_transport(&config, Box::new(transport)).unwrap();
        assert!(client.dump.is_some());
    }

    fn http_config(server: &MockServer) -> Config {
        Config {
            api_key: Some("API-KEY-1".to_string()),
            base_url: server.uri(),
            ..Config::default()
        }
    }

    #[tokio::test]
    async fn test_http_get_sends_key_and_decodes_body() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/customer/C07654321"))
            .and(query_param("apikey", "API-KEY-1"))
            .respond_with(ResponseTemplate::new(200).set_body_string(CUSTOMER_XML))
            .expect(1)
            .mount(&server)
            .await;

        let client = RegistryClient::new(&http_config(&server)).unwrap();
        let url = client.resource_url::<Customer>("C07654321").unwrap();
        let customer: Customer = client.get(url).await.unwrap();
        assert_eq!(customer.customer_name, "Acme Hosting");
    }

    #[tokio::test]
    async fn test_http_envelope_is_an_error_even_with_success_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/rest/customer/CUST-9"))
            .respond_with(ResponseTemplate::new(200).set_body_string(ERROR_XML))
            .mount(&server)
            .await;

        let client = RegistryClient::new(&http_config(&server)).unwrap();
        let url = client.resource_url::<Customer>("CUST-9").unwrap();
        let result = client.get::<Customer>(url).await;
        assert_eq!(result.unwrap_err().to_string(), "Handle not found");
    }

    #[tokio::test]
    async fn test_http_error_status_with_resource_body_still_decodes() {
        let server = MockServer::start().await;
        Mock::given(method("DELETE"))
            .and(path("/rest/customer/C07654321"))
            .respond_with(ResponseTemplate::new(500).set_body_string(CUSTOMER_XML))
            .mount(&server)
            .await;

        let client = RegistryClient::new(&http_config(&server)).unwrap();
        let url = client.resource_url::<Customer>("C07654321").unwrap();
        let customer: Customer = client.delete(url).await.unwrap();
        assert_eq!(customer.handle, "C07654321");
    }

    #[tokio::test]
    async fn test_unreachable_registry_is_a_transport_error() {
        // Grab a free port, then close it so nothing is listening there.
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let config = Config {
            api_key: Some("API-KEY-1".to_string()),
            base_url: format!("http://{addr}"),
            ..Config::default()
        };
        let client = RegistryClient::new(&config).unwrap();
        let url = client.resource_url::<Network>("NET-1").unwrap();
        let result = client.get::<Network>(url).await;
        assert!(matches!(result, Err(CliError::Transport(_))));
    }
}
