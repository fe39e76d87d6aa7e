use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::phone::PhoneNumber;
use crate::error::RelayError;

/// Caller payload, as posted by the browser client.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpRequest {
    // Fields stay untyped until the action is known, so an unknown action is
    // rejected as such no matter what the other fields hold.
    #[serde(default)]
    pub action: Option<Value>,
    #[serde(default)]
    pub phone_number: Option<Value>,
    #[serde(default)]
    pub session_id: Option<Value>,
    #[serde(default)]
    pub otp: Option<Value>,
    #[serde(default)]
    pub template: Option<Value>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OtpAction {
    Send,
    Verify,
}

impl OtpAction {
    pub fn as_str(self) -> &'static str {
        match self {
            OtpAction::Send => "send",
            OtpAction::Verify => "verify",
        }
    }
}

impl TryFrom<Option<&Value>> for OtpAction {
    type Error = RelayError;

    fn try_from(value: Option<&Value>) -> Result<Self, Self::Error> {
        match value.and_then(Value::as_str) {
            Some("send") => Ok(OtpAction::Send),
            Some("verify") => Ok(OtpAction::Verify),
            _ => Err(RelayError::InvalidAction),
        }
    }
}

/// A validated request, ready to be turned into a provider call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OtpCommand {
    Send {
        phone: PhoneNumber,
        template: Option<String>,
    },
    Verify {
        session_id: String,
        otp: String,
    },
}

impl OtpCommand {
    pub fn action(&self) -> OtpAction {
        match self {
            OtpCommand::Send { .. } => OtpAction::Send,
            OtpCommand::Verify { .. } => OtpAction::Verify,
        }
    }
}

impl OtpRequest {
    pub fn parse(body: &[u8]) -> Result<Self, RelayError> {
        serde_json::from_slice(body).map_err(|err| RelayError::MalformedRequest(err.to_string()))
    }

    pub fn into_command(self) -> Result<OtpCommand, RelayError> {
        match OtpAction::try_from(self.action.as_ref())? {
            OtpAction::Send => {
                let raw = string_field(self.phone_number, "phoneNumber")?
                    .ok_or(RelayError::MissingField("phoneNumber"))?;
                let template =
                    string_field(self.template, "template")?.filter(|t| !t.trim().is_empty());
                Ok(OtpCommand::Send {
                    phone: PhoneNumber::normalize(&raw),
                    template,
                })
            }
            OtpAction::Verify => {
                let session_id = string_field(self.session_id, "sessionId")?
                    .ok_or(RelayError::MissingField("sessionId"))?;
                let otp = string_field(self.otp, "otp")?.ok_or(RelayError::MissingField("otp"))?;
                Ok(OtpCommand::Verify { session_id, otp })
            }
        }
    }
}

fn string_field(value: Option<Value>, name: &'static str) -> Result<Option<String>, RelayError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => Ok(Some(s)),
        Some(_) => Err(RelayError::MalformedRequest(format!("{name} must be a string"))),
    }
}

/// Reply body from the provider. Anything beyond these two fields is ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct ProviderReply {
    #[serde(rename = "Status")]
    pub status: String,
    #[serde(rename = "Details")]
    pub details: String,
}

impl ProviderReply {
    pub fn is_success(&self) -> bool {
        self.status == "Success"
    }
}

/// Body returned to the caller.
///
/// `sessionId` carries the provider's `Details` on every mapped reply: the
/// session identifier after a send, a status string after a verify.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OtpResponse {
    pub success: bool,
    #[serde(rename = "sessionId", skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    pub message: String,
}

impl OtpResponse {
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            session_id: None,
            message: message.into(),
        }
    }
}

impl From<ProviderReply> for OtpResponse {
    fn from(reply: ProviderReply) -> Self {
        Self {
            success: reply.is_success(),
            session_id: Some(reply.details.clone()),
            message: reply.details,
        }
    }
}
