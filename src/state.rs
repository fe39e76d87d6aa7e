use std::sync::Arc;

use crate::config::{CorsConfig, RelayConfig};
use crate::infra::two_factor::TwoFactorClient;

pub struct AppState {
    pub provider: TwoFactorClient,
    pub cors: CorsConfig,
}

impl AppState {
    pub fn new(provider: TwoFactorClient, cors: CorsConfig) -> Arc<Self> {
        Arc::new(Self { provider, cors })
    }

    pub fn from_config(config: RelayConfig) -> anyhow::Result<Arc<Self>> {
        let provider = TwoFactorClient::new(config.provider)?;
        Ok(Self::new(provider, config.cors))
    }
}
