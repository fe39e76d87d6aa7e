use tracing::{info, warn};

use crate::domain::otp::{OtpRequest, OtpResponse};
use crate::error::RelayError;
use crate::infra::two_factor::TwoFactorClient;

/// Runs one relay exchange: parse the caller body, validate it, call the
/// provider once and map its reply.
///
/// Provider-side rejections come back as `Ok` with `success: false`; only
/// bad input and transport/decoding failures are `Err`.
pub async fn handle(provider: &TwoFactorClient, body: &[u8]) -> Result<OtpResponse, RelayError> {
    let command = OtpRequest::parse(body)?.into_command()?;
    let action = command.action().as_str();

    let reply = provider.dispatch(&command).await?;
    if reply.is_success() {
        info!(action, "provider accepted request");
    } else {
        warn!(action, status = %reply.status, details = %reply.details, "provider rejected request");
    }

    Ok(OtpResponse::from(reply))
}
