//! Company profile research agent
//!
//! Researches public companies with a web-grounded generative model and
//! keeps the results locally:
//!
//! - [`gateway`]: fetches profiles and chat replies, either in-process or
//!   through the proxy [`server`]
//! - [`extract`] and [`verify`]: fence-stripping, parsing, citation
//!   extraction and the rule rejecting uncited data
//! - [`store`]: JSON-file persistence keyed by lowercase query
//! - [`orchestrator`]: the search flow state machine
//!
//! # Example
//!
//! ```no_run
//! use profile_agent::{JsonFileStore, Orchestrator, ProfileConfig, gateway};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ProfileConfig::from_env()?;
//!     let gateway = gateway::build(&config)?;
//!     let store = JsonFileStore::new(&config.store_path);
//!
//!     let mut orchestrator = Orchestrator::new(gateway, store);
//!     let result = orchestrator.search("Tesla", false).await?;
//!     println!("{}", result.company_data.revenue);
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod display;
pub mod error;
pub mod extract;
pub mod gateway;
pub mod model;
pub mod orchestrator;
pub mod prompts;
pub mod server;
pub mod store;
pub mod verify;

pub use config::{GatewayMode, ProfileConfig, ProfileConfigBuilder};
pub use error::{Operation, ProfileError, Result};
pub use gateway::{ChatGateway, ChatOptions, ChatReply, ProfileGateway, ReasoningTier};
pub use model::{AgentResult, Citation, CompanyRecord, Scalar, Store};
pub use orchestrator::{Event, Orchestrator, View, ViewState, transition};
pub use store::{JsonFileStore, MemoryStore, ProfileStore};
pub use verify::VerificationPolicy;
