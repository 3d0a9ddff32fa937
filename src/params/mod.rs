/// Parameter store access and generated configuration - Gateway
mod fetcher;
mod ssm;
mod store;

pub use fetcher::{render, ConfigFetcher, ConfigFormat, FetchedIdentity};
pub use ssm::SsmParameterStore;
pub use store::{Parameter, ParameterStore};
