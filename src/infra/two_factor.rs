use reqwest::Client;
use secrecy::{ExposeSecret, SecretString};
use tracing::{info, warn};

use crate::config::ProviderConfig;
use crate::domain::otp::{OtpCommand, ProviderReply};
use crate::error::RelayError;

/// Outbound client for the 2Factor SMS OTP API.
///
/// Both calls are plain GETs whose path encodes the whole request:
/// `{base}/{key}/SMS/{phone}/AUTOGEN[/{template}]` and
/// `{base}/{key}/SMS/VERIFY/{session}/{otp}`.
pub struct TwoFactorClient {
    base_url: String,
    api_key: SecretString,
    http: Client,
}

impl TwoFactorClient {
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        let mut builder = Client::builder().user_agent("sms-otp-relay");
        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }
        let http = builder.build()?;

        Ok(Self {
            base_url: config.base_url,
            api_key: config.api_key,
            http,
        })
    }

    pub fn endpoint(&self, command: &OtpCommand) -> String {
        format!(
            "{}/{}/SMS/{}",
            self.base_url,
            self.api_key.expose_secret(),
            command_path(command)
        )
    }

    /// Same as [`endpoint`](Self::endpoint) with the key, session id and OTP
    /// masked, for logs.
    pub fn redacted_endpoint(&self, command: &OtpCommand) -> String {
        let path = match command {
            OtpCommand::Verify { .. } => "VERIFY/***/***".to_string(),
            OtpCommand::Send { .. } => command_path(command),
        };
        format!("{}/***/SMS/{}", self.base_url, path)
    }

    pub async fn dispatch(&self, command: &OtpCommand) -> Result<ProviderReply, RelayError> {
        let target = self.redacted_endpoint(command);
        info!(action = command.action().as_str(), url = %target, "calling provider");

        let response = self.http.get(self.endpoint(command)).send().await?;
        let status = response.status();
        if !status.is_success() {
            // 2Factor reports failures in the body, so keep going and read it.
            warn!(%status, url = %target, "provider answered with non-success HTTP status");
        }

        let body = response.bytes().await?;
        serde_json::from_slice::<ProviderReply>(&body)
            .map_err(|err| RelayError::ProviderReply(err.to_string()))
    }
}

fn command_path(command: &OtpCommand) -> String {
    match command {
        OtpCommand::Send {
            phone,
            template: Some(template),
        } => format!("{phone}/AUTOGEN/{template}"),
        OtpCommand::Send {
            phone,
            template: None,
        } => format!("{phone}/AUTOGEN"),
        OtpCommand::Verify { session_id, otp } => format!("VERIFY/{session_id}/{otp}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::phone::PhoneNumber;
    use serde_json::json;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const KEY: &str = "test-api-key";

    fn client(base_url: &str) -> TwoFactorClient {
        TwoFactorClient::new(ProviderConfig::new(base_url, SecretString::new(KEY.into())))
            .expect("client should build")
    }

    fn send(raw_phone: &str, template: Option<&str>) -> OtpCommand {
        OtpCommand::Send {
            phone: PhoneNumber::normalize(raw_phone),
            template: template.map(str::to_string),
        }
    }

    #[test]
    fn send_endpoint_without_template() {
        let client = client("https://2factor.in/API/V1");
        assert_eq!(
            client.endpoint(&send("9876543210", None)),
            "https://2factor.in/API/V1/test-api-key/SMS/9876543210/AUTOGEN"
        );
    }

    #[test]
    fn send_endpoint_with_template() {
        let client = client("https://2factor.in/API/V1");
        let url = client.endpoint(&send("+919876543210", Some("OTP1")));
        assert!(url.ends_with("/SMS/9876543210/AUTOGEN/OTP1"), "{url}");
    }

    #[test]
    fn verify_endpoint_is_verbatim() {
        let client = client("https://2factor.in/API/V1");
        let command = OtpCommand::Verify {
            session_id: "abc123".into(),
            otp: "4567".into(),
        };
        assert_eq!(
            client.endpoint(&command),
            "https://2factor.in/API/V1/test-api-key/SMS/VERIFY/abc123/4567"
        );
    }

    #[test]
    fn redacted_endpoint_hides_key() {
        let client = client("https://2factor.in/API/V1");
        let url = client.redacted_endpoint(&send("9876543210", None));
        assert!(!url.contains(KEY));
        assert_eq!(url, "https://2factor.in/API/V1/***/SMS/9876543210/AUTOGEN");
    }

    #[test]
    fn redacted_endpoint_hides_verify_secrets() {
        let client = client("https://2factor.in/API/V1");
        let command = OtpCommand::Verify {
            session_id: "sess-77".into(),
            otp: "918273".into(),
        };
        let url = client.redacted_endpoint(&command);
        assert!(!url.contains("sess-77"));
        assert!(!url.contains("918273"));
        assert_eq!(url, "https://2factor.in/API/V1/***/SMS/VERIFY/***/***");
    }

    #[tokio::test]
    async fn dispatch_parses_provider_reply() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/test-api-key/SMS/9876543210/AUTOGEN"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "Status": "Success",
                "Details": "session-1"
            })))
            .expect(1)
            .mount(&server)
            .await;

        let reply = client(&server.uri())
            .dispatch(&send("9876543210", None))
            .await
            .expect("provider call should succeed");

        assert!(reply.is_success());
        assert_eq!(reply.details, "session-1");
    }

    #[tokio::test]
    async fn dispatch_reads_body_of_error_status() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "Status": "Error",
                "Details": "Invalid Phone Number"
            })))
            .mount(&server)
            .await;

        let reply = client(&server.uri())
            .dispatch(&send("123", None))
            .await
            .expect("error bodies are still replies");

        assert!(!reply.is_success());
        assert_eq!(reply.details, "Invalid Phone Number");
    }

    #[tokio::test]
    async fn non_json_reply_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(502).set_body_string("<html>bad gateway</html>"))
            .mount(&server)
            .await;

        let err = client(&server.uri())
            .dispatch(&send("9876543210", None))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::ProviderReply(_)));
    }

    #[tokio::test]
    async fn transport_error_does_not_leak_key() {
        // Nothing listens on port 1.
        let err = client("http://127.0.0.1:1")
            .dispatch(&send("9876543210", None))
            .await
            .unwrap_err();

        assert!(matches!(err, RelayError::ProviderUnreachable(_)));
        assert!(!err.to_string().contains(KEY));
    }
}
