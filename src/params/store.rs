use async_trait::async_trait;

use crate::utils::Result;

/// One named value read from the parameter store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Full path, e.g. `/chatbot-mvp/cognito-client-id`
    pub name: String,
    pub value: String,
}

impl Parameter {
    /// Last path segment of the name
    pub fn key(&self) -> &str {
        self.name.rsplit('/').next().unwrap_or(self.name.as_str())
    }
}

/// Read access to an external key-value parameter store
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParameterStore: Send + Sync {
    /// Fetch the named parameters. Names the store does not know are simply
    /// absent from the result.
    async fn get_parameters(&self, names: &[String], with_decryption: bool) -> Result<Vec<Parameter>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_is_trailing_segment() {
        let param = Parameter {
            name: "/chatbot-mvp/cognito-client-id".to_string(),
            value: "abc".to_string(),
        };
        assert_eq!(param.key(), "cognito-client-id");

        let bare = Parameter {
            name: "plain".to_string(),
            value: String::new(),
        };
        assert_eq!(bare.key(), "plain");
    }
}
