//! CLI command definitions and handlers

use clap::Subcommand;
use serde::Serialize;
use std::path::PathBuf;
use tracing::info;

use crate::core::client::GengoClient;
use crate::core::config::ClientConfig;
use crate::core::models::{JobAction, JobFilter, JobStatus, JobSubmission, RejectReason, Tier};

/// Commands for the myGengo CLI
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show the account credit balance
    Balance,

    /// Show account statistics
    Stats,

    /// List supported languages
    Languages,

    /// List supported language pairs
    LanguagePairs {
        /// Only pairs translating from this language
        #[arg(long)]
        source: Option<String>,
    },

    /// Submit a job for translation
    Submit {
        /// Text to translate
        text: String,

        /// Target language code
        target: String,

        /// Source language code (auto-detect if not specified)
        #[arg(long)]
        source: Option<String>,

        /// Translation tier: machine, standard, pro or ultra
        #[arg(long, default_value = "machine")]
        tier: Tier,

        /// Approve the translation without review
        #[arg(long)]
        auto_approve: bool,

        /// Instructions for the translator
        #[arg(long)]
        comment: Option<String>,

        /// Short description shown to the translator
        #[arg(long)]
        slug: Option<String>,

        /// URL notified when the job changes state
        #[arg(long)]
        callback_url: Option<String>,
    },

    /// Show a job
    Job {
        /// Job id
        id: String,

        /// Include the machine translation while the job is pending
        #[arg(long)]
        pre_mt: bool,
    },

    /// List recent jobs
    Jobs {
        /// Only jobs with this status
        #[arg(long)]
        status: Option<String>,

        /// Only jobs created after this unix timestamp
        #[arg(long)]
        timestamp_after: Option<i64>,

        /// Maximum number of jobs
        #[arg(long)]
        count: Option<u32>,
    },

    /// Show the jobs of a group
    JobGroup {
        /// Group id
        id: String,
    },

    /// Cancel a job
    Cancel {
        /// Job id
        id: String,
    },

    /// Pay for a job submitted without enough credits
    Purchase {
        /// Job id
        id: String,
    },

    /// Approve a translation
    Approve {
        /// Job id
        id: String,

        /// Rating from 1 to 5
        #[arg(long)]
        rating: Option<u8>,

        /// Feedback for the translator
        #[arg(long)]
        for_translator: Option<String>,

        /// Feedback for myGengo
        #[arg(long)]
        for_mygengo: Option<String>,

        /// Allow the feedback to be shared publicly
        #[arg(long)]
        public: bool,
    },

    /// Ask the translator for a revision
    Revise {
        /// Job id
        id: String,

        /// What should change
        comment: String,
    },

    /// Reject a translation
    Reject {
        /// Job id
        id: String,

        /// quality, incomplete or other
        reason: RejectReason,

        /// Why the translation is rejected
        comment: String,

        /// Text shown in the job's captcha image
        captcha: String,

        /// What to do with the job afterwards: requeue or cancel
        #[arg(long)]
        follow_up: Option<String>,
    },

    /// Add a comment to a job
    Comment {
        /// Job id
        id: String,

        /// Comment text
        body: String,
    },

    /// Show a job's comments
    Comments {
        /// Job id
        id: String,
    },

    /// List a job's revisions
    Revisions {
        /// Job id
        id: String,
    },

    /// Show one revision of a job
    Revision {
        /// Job id
        id: String,

        /// Revision id
        revision: String,
    },

    /// Show the feedback left for a job
    Feedback {
        /// Job id
        id: String,
    },

    /// Save the preview image of a job
    Preview {
        /// Job id
        id: String,

        /// Output file
        #[arg(short, long)]
        output: PathBuf,
    },
}

/// Build a client from an ini file or the environment
pub fn build_client(config: Option<PathBuf>, sandbox: Option<bool>) -> anyhow::Result<GengoClient> {
    let mut config = match config {
        Some(path) => {
            info!("Loading configuration from {}", path.display());
            ClientConfig::from_file(&path)?
        }
        None => ClientConfig::from_env()?,
    };

    if let Some(sandbox) = sandbox {
        config.sandbox = sandbox;
    }

    Ok(GengoClient::new(config)?)
}

/// Run a command against the API
pub async fn handle(client: &GengoClient, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Balance => {
            let balance = client.get_account_balance().await?;
            println!("{}", balance);
        }
        Commands::Stats => print_json(&client.get_account_stats().await?)?,
        Commands::Languages => print_json(&client.get_languages().await?)?,
        Commands::LanguagePairs { source } => {
            print_json(&client.get_language_pairs(source.as_deref()).await?)?
        }
        Commands::Submit {
            text,
            target,
            source,
            tier,
            auto_approve,
            comment,
            slug,
            callback_url,
        } => {
            let mut submission = JobSubmission::new(text, target)
                .with_tier(tier)
                .auto_approve(auto_approve);
            if let Some(source) = source {
                submission = submission.with_source_lang(source);
            }
            if let Some(comment) = comment {
                submission = submission.with_comment(comment);
            }
            if let Some(slug) = slug {
                submission = submission.with_slug(slug);
            }
            if let Some(callback_url) = callback_url {
                submission = submission.with_callback_url(callback_url);
            }

            handle_submit(client, &submission).await?;
        }
        Commands::Job { id, pre_mt } => print_json(&client.get_job(&id, pre_mt).await?)?,
        Commands::Jobs {
            status,
            timestamp_after,
            count,
        } => {
            let filter = JobFilter {
                status: status.map(JobStatus::from),
                timestamp_after,
                count,
            };
            print_json(&client.get_jobs(&filter).await?)?
        }
        Commands::JobGroup { id } => print_json(&client.get_job_group(&id).await?)?,
        Commands::Cancel { id } => {
            client.cancel_job(&id).await?;
            println!("✅ Job {} cancelled", id);
        }
        Commands::Purchase { id } => handle_update(client, &id, &JobAction::Purchase).await?,
        Commands::Approve {
            id,
            rating,
            for_translator,
            for_mygengo,
            public,
        } => {
            let action = JobAction::Approve {
                rating,
                for_translator,
                for_mygengo,
                public,
            };
            handle_update(client, &id, &action).await?
        }
        Commands::Revise { id, comment } => {
            let action = JobAction::Revise { comment };
            handle_update(client, &id, &action).await?
        }
        Commands::Reject {
            id,
            reason,
            comment,
            captcha,
            follow_up,
        } => {
            let action = JobAction::Reject {
                reason,
                comment,
                captcha,
                follow_up,
            };
            handle_update(client, &id, &action).await?
        }
        Commands::Comment { id, body } => {
            client.submit_job_comment(&id, &body).await?;
            println!("✅ Comment added to job {}", id);
        }
        Commands::Comments { id } => print_json(&client.get_job_comments(&id).await?)?,
        Commands::Revisions { id } => print_json(&client.get_job_revisions(&id).await?)?,
        Commands::Revision { id, revision } => {
            print_json(&client.get_job_revision(&id, &revision).await?)?
        }
        Commands::Feedback { id } => print_json(&client.get_job_feedback(&id).await?)?,
        Commands::Preview { id, output } => {
            let written = client.save_job_preview(&id, &output).await?;
            println!("✅ Preview saved to {} ({} bytes)", output.display(), written);
        }
    }

    Ok(())
}

/// Handle job submission
async fn handle_submit(client: &GengoClient, submission: &JobSubmission) -> anyhow::Result<()> {
    info!("Submitting job");
    info!("Target language: {}", submission.target_lang);
    info!("Tier: {}", submission.tier);
    info!("Auto-approve: {}", submission.auto_approve);

    let job = client.submit_job(submission).await?;

    println!("✅ Job {} submitted", job.job_id);
    if let Some(status) = &job.status {
        println!("   Status: {}", status);
    }
    if let Some(credits) = &job.credits {
        println!("   Credits: {}", credits);
    }
    if let Some(translation) = job.translation() {
        println!("   Translation: {}", translation);
    }

    Ok(())
}

/// Handle a purchase, revision request, approval or rejection
async fn handle_update(client: &GengoClient, id: &str, action: &JobAction) -> anyhow::Result<()> {
    client.update_job(id, action).await?;
    println!("✅ Job {}: {} done", id, action.name());
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
