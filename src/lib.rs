pub mod config;
pub mod content;
pub mod discovery;
pub mod distribution;
pub mod generator;
pub mod pipeline;
pub mod store;
pub mod types;
pub mod utils;
pub mod validation;

pub use config::{AffiliateSlot, GeneratorBackend, PipelineConfig};
pub use content::ContentAgent;
pub use discovery::DiscoveryAgent;
pub use distribution::{DistributionAgent, PublishReport};
pub use generator::{ArticleGenerator, OllamaGenerator, TemplateGenerator};
pub use pipeline::{Pipeline, SitePaths};
pub use store::{RunHistory, TopicStore};
pub use types::*;
pub use validation::{RejectReason, ValidationAgent, Verdict};
