//! Apodimo Azure DevOps - migration source backed by the Azure DevOps REST API

mod client;
mod error;
mod models;
mod source;

pub use client::{AzureDevOpsClient, AzureDevOpsClientBuilder, DEFAULT_API_VERSION};
pub use error::{Error, Result};
pub use models::field_text;
pub use source::WORK_ITEM_BATCH_SIZE;
