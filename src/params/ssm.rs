use async_trait::async_trait;
use aws_config::{BehaviorVersion, Region};
use aws_sdk_ssm::error::DisplayErrorContext;

use super::store::{Parameter, ParameterStore};
use crate::utils::{log_warn, ChatbotError, Result};

/// AWS Systems Manager Parameter Store
pub struct SsmParameterStore {
    client: aws_sdk_ssm::Client,
}

impl SsmParameterStore {
    /// Client for `region`, credentials from the default provider chain
    pub async fn from_region(region: &str) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        Self {
            client: aws_sdk_ssm::Client::new(&shared),
        }
    }
}

#[async_trait]
impl ParameterStore for SsmParameterStore {
    async fn get_parameters(&self, names: &[String], with_decryption: bool) -> Result<Vec<Parameter>> {
        let output = self
            .client
            .get_parameters()
            .set_names(Some(names.to_vec()))
            .with_decryption(with_decryption)
            .send()
            .await
            .map_err(|e| ChatbotError::ParameterError(DisplayErrorContext(&e).to_string()))?;

        if !output.invalid_parameters().is_empty() {
            log_warn("ssm", format!("unknown parameters: {}", output.invalid_parameters().join(", ")));
        }

        Ok(output
            .parameters()
            .iter()
            .filter_map(|p| {
                Some(Parameter {
                    name: p.name()?.to_string(),
                    value: p.value()?.to_string(),
                })
            })
            .collect())
    }
}
