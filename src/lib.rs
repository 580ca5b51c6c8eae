//! myGengo - async client for the myGengo human and machine translation API
//!
//! The client signs every request with the account's private key, spaces
//! requests out so the service does not refuse them, and decodes each answer
//! into a typed record.
//!
//! ```rust,no_run
//! use mygengo::{ClientConfig, GengoClient, JobSubmission};
//!
//! # async fn run() -> mygengo::Result<()> {
//! let client = GengoClient::new(ClientConfig::new("api-key", "private-key"))?;
//! println!("{}", client.get_account_balance().await?);
//!
//! let job = client
//!     .submit_job(&JobSubmission::new("big red car", "fr").auto_approve(true))
//!     .await?;
//! let job = client.get_job(&job.job_id, true).await?;
//! println!("{:?}", job.body_tgt);
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod cli;
pub mod core;

// Re-export key types for convenience
pub use core::{
    client::GengoClient,
    config::ClientConfig,
    errors::{GengoError, Result},
    models::{
        AccountBalance, AccountStats, Comment, Feedback, Job, JobAction, JobFilter,
        JobGroupReceipt, JobStatus, JobSubmission, JobSummary, Language, LanguagePair,
        RejectReason, Revision, Tier,
    },
    signer::RequestSigner,
};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
