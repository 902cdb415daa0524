/// Device shadow fetching over the NETPIE REST API
use log::{debug, warn};
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::future::Future;
use thiserror::Error;
use tokio::time::Duration;
use url::Url;

use crate::config::DashboardConfig;
use crate::models::ShadowReading;

const REQUEST_TIMEOUT_SECS: u64 = 10;

// Field names in the device's published shadow document
const FIELD_TEMPERATURE: &str = "Temperature";
const FIELD_HUMIDITY: &str = "Humidity";
const FIELD_LIGHTNESS: &str = "Lightness";
const FIELD_SOIL_MOISTURE: &str = "Soil Moisture";

#[derive(Debug, Error)]
pub enum ShadowError {
    #[error("Request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Shadow endpoint returned {0}")]
    Status(StatusCode),

    #[error("Malformed shadow document: {0}")]
    Malformed(String),
}

/// Values decoded from one shadow document
///
/// A field is `None` when the device hasn't published it or it isn't a number.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ShadowFields {
    pub temperature: Option<f64>,
    pub humidity: Option<f64>,
    pub soil_moisture: Option<f64>,
    pub raw_light: Option<f64>,
}

impl ShadowFields {
    /// Overlay the decoded values on the previous reading
    ///
    /// Fields missing from the document keep their last-known value.
    pub fn merge_into(&self, previous: &ShadowReading) -> ShadowReading {
        let pick = |name: &str, value: Option<f64>, last: f64| match value {
            Some(v) => v,
            None => {
                warn!("Shadow field '{}' missing, keeping {}", name, last);
                last
            }
        };

        ShadowReading {
            temperature: pick(FIELD_TEMPERATURE, self.temperature, previous.temperature),
            humidity: pick(FIELD_HUMIDITY, self.humidity, previous.humidity),
            soil_moisture: pick(FIELD_SOIL_MOISTURE, self.soil_moisture, previous.soil_moisture),
            raw_light: pick(FIELD_LIGHTNESS, self.raw_light, previous.raw_light),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShadowDocument {
    data: serde_json::Map<String, Value>,
}

/// Decode a shadow response body
///
/// The body must be JSON with a `data` object. Individual fields are optional.
pub fn decode_shadow(body: &str) -> Result<ShadowFields, ShadowError> {
    let document: ShadowDocument =
        serde_json::from_str(body).map_err(|e| ShadowError::Malformed(e.to_string()))?;

    let number = |name: &str| document.data.get(name).and_then(Value::as_f64);

    Ok(ShadowFields {
        temperature: number(FIELD_TEMPERATURE),
        humidity: number(FIELD_HUMIDITY),
        soil_moisture: number(FIELD_SOIL_MOISTURE),
        raw_light: number(FIELD_LIGHTNESS),
    })
}

/// Anything that can hand the poller a shadow document on demand
pub trait ShadowSource {
    fn fetch(&self) -> impl Future<Output = Result<ShadowFields, ShadowError>> + Send;
}

/// Shadow source backed by the NETPIE device shadow endpoint
#[derive(Debug, Clone)]
pub struct NetpieShadowClient {
    http: reqwest::Client,
    url: Url,
    authorization: String,
}

impl NetpieShadowClient {
    pub fn new(config: &DashboardConfig) -> Result<Self, ShadowError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .build()?;

        Ok(Self {
            http,
            url: config.shadow_url.clone(),
            authorization: config.authorization_header(),
        })
    }
}

impl ShadowSource for NetpieShadowClient {
    async fn fetch(&self) -> Result<ShadowFields, ShadowError> {
        debug!("GET {}", self.url);

        let response = self
            .http
            .get(self.url.clone())
            .header(reqwest::header::AUTHORIZATION, &self.authorization)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(ShadowError::Status(status));
        }

        let body = response.text().await?;
        decode_shadow(&body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;
    use tokio::task::JoinHandle;

    /// Answer one request with a canned response and hand back the raw request head
    async fn serve_once(status_line: &'static str, body: &'static str) -> (Url, JoinHandle<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            while !request.windows(4).any(|w| w == b"\r\n\r\n") {
                let n = socket.read(&mut buf).await.unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
            }

            let response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status_line,
                body.len(),
                body
            );
            socket.write_all(response.as_bytes()).await.unwrap();
            socket.shutdown().await.unwrap();
            String::from_utf8_lossy(&request).into_owned()
        });

        let url = Url::parse(&format!("http://{}/v2/device/shadow/data", addr)).unwrap();
        (url, server)
    }

    fn client_for(url: &Url) -> NetpieShadowClient {
        let config = DashboardConfig::from_lookup(|key| match key {
            "NETPIE_CLIENT_ID" => Some("cid".to_string()),
            "NETPIE_TOKEN" => Some("tok".to_string()),
            "NETPIE_SHADOW_URL" => Some(url.to_string()),
            _ => None,
        })
        .unwrap();
        NetpieShadowClient::new(&config).unwrap()
    }

    #[tokio::test]
    async fn fetch_sends_device_credentials_and_decodes_body() {
        let (url, server) = serve_once(
            "200 OK",
            r#"{"data":{"Temperature":22,"Humidity":45,"Lightness":2048,"Soil Moisture":55}}"#,
        )
        .await;

        let fields = client_for(&url).fetch().await.unwrap();
        assert_eq!(
            fields,
            ShadowFields {
                temperature: Some(22.0),
                humidity: Some(45.0),
                soil_moisture: Some(55.0),
                raw_light: Some(2048.0),
            }
        );

        let request = server.await.unwrap().to_ascii_lowercase();
        assert!(request.starts_with("get /v2/device/shadow/data "));
        assert!(request.contains("authorization: device cid:tok\r\n"));
    }

    #[tokio::test]
    async fn fetch_maps_error_status() {
        let (url, server) = serve_once("503 Service Unavailable", r#"{"message":"down"}"#).await;

        let err = client_for(&url).fetch().await.unwrap_err();
        assert!(matches!(
            err,
            ShadowError::Status(status) if status == StatusCode::SERVICE_UNAVAILABLE
        ));
        server.await.unwrap();
    }

    #[tokio::test]
    async fn fetch_rejects_body_without_data() {
        let (url, server) = serve_once("200 OK", r#"{"status":"ok"}"#).await;

        let err = client_for(&url).fetch().await.unwrap_err();
        assert!(matches!(err, ShadowError::Malformed(_)));
        server.await.unwrap();
    }

    #[test]
    fn decodes_full_document() {
        let body = r#"{
            "deviceid": "abc",
            "data": {
                "Temperature": 22,
                "Humidity": 45.5,
                "Lightness": 2048,
                "Soil Moisture": 55
            },
            "rev": 1204
        }"#;

        let fields = decode_shadow(body).unwrap();
        assert_eq!(
            fields,
            ShadowFields {
                temperature: Some(22.0),
                humidity: Some(45.5),
                soil_moisture: Some(55.0),
                raw_light: Some(2048.0),
            }
        );
    }

    #[test]
    fn missing_and_non_numeric_fields_are_none() {
        let body = r#"{"data": {"Temperature": "hot", "Humidity": 40}}"#;
        let fields = decode_shadow(body).unwrap();
        assert_eq!(fields.temperature, None);
        assert_eq!(fields.humidity, Some(40.0));
        assert_eq!(fields.soil_moisture, None);
        assert_eq!(fields.raw_light, None);
    }

    #[test]
    fn body_without_data_is_malformed() {
        assert!(matches!(
            decode_shadow(r#"{"status": "ok"}"#),
            Err(ShadowError::Malformed(_))
        ));
        assert!(matches!(
            decode_shadow("<html>502</html>"),
            Err(ShadowError::Malformed(_))
        ));
        assert!(matches!(
            decode_shadow(r#"{"data": 12}"#),
            Err(ShadowError::Malformed(_))
        ));
    }

    #[test]
    fn missing_fields_keep_previous_values() {
        let previous = ShadowReading {
            temperature: 21.0,
            humidity: 48.0,
            soil_moisture: 60.0,
            raw_light: 1500.0,
        };
        let fields = ShadowFields {
            temperature: Some(23.5),
            raw_light: Some(900.0),
            ..Default::default()
        };

        let merged = fields.merge_into(&previous);
        assert_eq!(
            merged,
            ShadowReading {
                temperature: 23.5,
                humidity: 48.0,
                soil_moisture: 60.0,
                raw_light: 900.0,
            }
        );
    }

    #[test]
    fn status_error_message() {
        let err = ShadowError::Status(StatusCode::UNAUTHORIZED);
        assert_eq!(
            err.to_string(),
            "Shadow endpoint returned 401 Unauthorized"
        );
    }
}
