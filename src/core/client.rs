//! Async myGengo client with request signing and throttling

use reqwest::header::ACCEPT;
use reqwest::{Method, Url};
use serde_json::{json, Value};
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info};

use crate::core::config::ClientConfig;
use crate::core::errors::{GengoError, Result};
use crate::core::models::{
    is_language_code, AccountBalance, AccountStats, Comment, Feedback, Job, JobAction, JobFilter,
    JobGroupReceipt, JobSubmission, JobSummary, Language, LanguagePair, Revision,
};
use crate::core::response::{
    decode_envelope, error_from_status, from_payload, number_literal, reject_envelope, take_field,
};
use crate::core::signer::{canonical_json, RequestSigner};
use crate::core::throttle::RequestThrottle;

/// Client for the myGengo translation API
#[derive(Debug, Clone)]
pub struct GengoClient {
    client: reqwest::Client,
    config: Arc<ClientConfig>,
    base_url: Url,
    signer: RequestSigner,
    throttle: RequestThrottle,
}

impl GengoClient {
    /// Create a new client
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let client = reqwest::Client::builder()
            .pool_idle_timeout(Some(Duration::from_secs(30)))
            .pool_max_idle_per_host(10)
            .build()?;

        let base_url = Url::parse(&config.base_url()).map_err(|e| GengoError::ConfigError {
            message: format!("Invalid API URL: {}", e),
        })?;
        let signer = RequestSigner::new(&config.private_key);
        let throttle =
            RequestThrottle::new(Duration::from_millis(config.min_request_interval_ms));

        info!(base_url = %base_url, "Created myGengo client");

        Ok(Self {
            client,
            config: Arc::new(config),
            base_url,
            signer,
            throttle,
        })
    }

    /// Create from environment
    pub fn from_env() -> Result<Self> {
        Self::new(ClientConfig::from_env()?)
    }

    /// Active configuration
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Return account statistics, such as credits spent
    pub async fn get_account_stats(&self) -> Result<AccountStats> {
        let response = self.get("account/stats", &[]).await?;
        from_payload(response)
    }

    /// Return the account credit balance
    pub async fn get_account_balance(&self) -> Result<AccountBalance> {
        let bytes = self
            .execute(Method::GET, "account/balance", &[], None, self.config.timeout())
            .await?;
        let mut balance: AccountBalance = from_payload(decode_envelope(&bytes)?)?;
        // A bare number keeps its formatting ("42.50", not "42.5")
        if let Some(literal) = number_literal(&bytes, "credits") {
            balance.credits = literal;
        }
        balance.validate()?;
        Ok(balance)
    }

    /// Submit a job for translation. If the text has already been submitted
    /// the service returns the existing job.
    pub async fn submit_job(&self, submission: &JobSubmission) -> Result<Job> {
        submission.validate()?;

        let body = json!({ "job": submission.to_payload() });
        let response = self
            .send(Method::POST, "translate/job", &[], Some(&body), self.config.submit_timeout())
            .await?;
        let job: Job = take_field(response, "job")?;

        info!(job_id = %job.job_id, lc_tgt = %submission.target_lang, "Submitted job");
        Ok(job)
    }

    /// Return a job; `pre_mt` asks for the machine translation while a human
    /// translation is still pending
    pub async fn get_job(&self, job_id: impl fmt::Display, pre_mt: bool) -> Result<Job> {
        let job_id = checked_id("job id", &job_id)?;
        let path = format!("translate/job/{}", job_id);
        let mut params = Vec::new();
        if pre_mt {
            params.push(("pre_mt", "1".to_string()));
        }

        let mut response = self.get(&path, &params).await?;
        // The service may leave out the id of the job that was asked for
        if let Some(job) = response.get_mut("job").and_then(Value::as_object_mut) {
            job.entry("job_id").or_insert(Value::String(job_id));
        }
        take_field(response, "job")
    }

    /// Purchase, revise, approve or reject a job
    pub async fn update_job(&self, job_id: impl fmt::Display, action: &JobAction) -> Result<()> {
        let path = job_path(&job_id, "")?;
        action.validate()?;

        let body = action.to_payload();
        self.send(Method::PUT, &path, &[], Some(&body), self.config.timeout())
            .await?;

        info!(job_id = %job_id, action = action.name(), "Updated job");
        Ok(())
    }

    /// Cancel a job that has not been picked up by a translator
    pub async fn cancel_job(&self, job_id: impl fmt::Display) -> Result<()> {
        let path = job_path(&job_id, "")?;
        self.send(Method::DELETE, &path, &[], None, self.config.timeout())
            .await?;

        info!(job_id = %job_id, "Cancelled job");
        Ok(())
    }

    /// Return the JPEG preview of a job's translated text
    ///
    /// Errors still arrive as JSON envelopes and are returned as such.
    pub async fn get_job_preview(&self, job_id: impl fmt::Display) -> Result<Vec<u8>> {
        let path = job_path(&job_id, "/preview")?;
        let image = self
            .execute(Method::GET, &path, &[], None, self.config.timeout())
            .await?;
        reject_envelope(&image)?;
        Ok(image)
    }

    /// Write a job's preview image to `path`
    pub async fn save_job_preview(
        &self,
        job_id: impl fmt::Display,
        path: impl AsRef<Path>,
    ) -> Result<usize> {
        let image = self.get_job_preview(job_id).await?;
        tokio::fs::write(path.as_ref(), &image).await?;
        debug!("Wrote {} bytes to {}", image.len(), path.as_ref().display());
        Ok(image.len())
    }

    /// Return the list of revisions for a job
    pub async fn get_job_revisions(&self, job_id: impl fmt::Display) -> Result<Vec<Revision>> {
        let path = job_path(&job_id, "/revisions")?;
        let response = self.get(&path, &[]).await?;
        take_field(response, "revisions")
    }

    /// Return one revision of a job
    pub async fn get_job_revision(
        &self,
        job_id: impl fmt::Display,
        revision_id: impl fmt::Display,
    ) -> Result<Revision> {
        let revision_id = checked_id("revision id", &revision_id)?;
        let path = job_path(&job_id, &format!("/revision/{}", revision_id))?;
        let response = self.get(&path, &[]).await?;
        take_field(response, "revision")
    }

    /// Return the feedback submitted for a job
    pub async fn get_job_feedback(&self, job_id: impl fmt::Display) -> Result<Feedback> {
        let path = job_path(&job_id, "/feedback")?;
        let response = self.get(&path, &[]).await?;
        take_field(response, "feedback")
    }

    /// Add a comment to a job's thread
    pub async fn submit_job_comment(&self, job_id: impl fmt::Display, comment: &str) -> Result<()> {
        let path = job_path(&job_id, "/comment")?;
        if comment.trim().is_empty() {
            return Err(GengoError::invalid("comment must not be empty"));
        }

        let body = json!({ "body": comment });
        self.send(Method::POST, &path, &[], Some(&body), self.config.timeout())
            .await?;
        Ok(())
    }

    /// Return a job's comment thread
    pub async fn get_job_comments(&self, job_id: impl fmt::Display) -> Result<Vec<Comment>> {
        let path = job_path(&job_id, "/comments")?;
        let response = self.get(&path, &[]).await?;
        take_field(response, "thread")
    }

    /// Return recent jobs matching the filter
    pub async fn get_jobs(&self, filter: &JobFilter) -> Result<Vec<JobSummary>> {
        let response = self.get("translate/jobs", &filter.to_params()).await?;
        from_payload(response)
    }

    /// Submit several jobs at once; `as_group` asks for one translator to handle all of them
    pub async fn submit_job_group(
        &self,
        jobs: &[JobSubmission],
        as_group: bool,
        process: bool,
    ) -> Result<JobGroupReceipt> {
        if jobs.is_empty() {
            return Err(GengoError::invalid("a job group needs at least one job"));
        }
        for job in jobs {
            job.validate()?;
        }

        let payloads: Vec<Value> = jobs.iter().map(JobSubmission::to_payload).collect();
        let body = json!({
            "jobs": payloads,
            "as_group": flag(as_group),
            "process": flag(process),
        });
        let response = self
            .send(Method::POST, "translate/jobs", &[], Some(&body), self.config.group_timeout())
            .await?;

        info!(count = jobs.len(), as_group, "Submitted job group");
        from_payload(response)
    }

    /// Return the jobs submitted together as one group
    pub async fn get_job_group(&self, group_id: impl fmt::Display) -> Result<Vec<JobSummary>> {
        let group_id = checked_id("group id", &group_id)?;
        let response = self
            .get(&format!("translate/jobs/{}", group_id), &[])
            .await?;
        take_field(response, "jobs")
    }

    /// Return supported languages
    pub async fn get_languages(&self) -> Result<Vec<Language>> {
        let response = self.get("translate/service/languages", &[]).await?;
        from_payload(response)
    }

    /// Return supported language pairs, optionally only those from `source`
    pub async fn get_language_pairs(&self, source: Option<&str>) -> Result<Vec<LanguagePair>> {
        let mut params = Vec::new();
        if let Some(source) = source {
            if !is_language_code(source) {
                return Err(GengoError::invalid(format!(
                    "Unrecognized source language code: {:?}",
                    source
                )));
            }
            params.push(("lc_src", source.to_string()));
        }

        let response = self
            .get("translate/service/language_pairs", &params)
            .await?;
        from_payload(response)
    }

    async fn get(&self, path: &str, params: &[(&str, String)]) -> Result<Value> {
        self.send(Method::GET, path, params, None, self.config.timeout())
            .await
    }

    /// Send a request and unwrap the response envelope
    async fn send(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Value> {
        let bytes = self.execute(method, path, params, body, timeout).await?;
        decode_envelope(&bytes)
    }

    /// Send a request. GETs are tried up to `max_retries` times while the
    /// service is unavailable; the default is a single try.
    async fn execute(
        &self,
        method: Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        // Anything but a GET may bill or mutate twice if repeated
        let max_tries = if method == Method::GET {
            self.config.max_retries
        } else {
            1
        };
        let delay = Duration::from_millis(self.config.retry_delay_ms);

        let mut attempt = 0;
        loop {
            attempt += 1;
            self.throttle.wait().await;

            match self.send_once(&method, path, params, body, timeout).await {
                Ok(bytes) => {
                    if attempt > 1 {
                        info!("{} {} succeeded after {} tries", method, path, attempt);
                    }
                    return Ok(bytes);
                }
                Err(e) if e.is_retryable() && attempt < max_tries => {
                    info!(
                        "{}, waiting {:?} and trying again ({}/{})",
                        e, delay, attempt, max_tries
                    );
                    sleep(delay).await;
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn send_once(
        &self,
        method: &Method,
        path: &str,
        params: &[(&str, String)],
        body: Option<&Value>,
        timeout: Duration,
    ) -> Result<Vec<u8>> {
        let ts = chrono::Utc::now().timestamp().to_string();

        let request = if *method == Method::POST || *method == Method::PUT {
            let empty = json!({});
            let form = self.signed_form(body.unwrap_or(&empty), &ts);
            self.client
                .request(method.clone(), self.endpoint(path)?)
                .form(&form)
        } else {
            let url = self.signed_url(path, params, &ts)?;
            self.client.request(method.clone(), url)
        };

        debug!("Sending {} {}", method, path);
        let response = request
            .header(ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        let bytes = response.bytes().await?;
        debug!("{} {} -> {} ({} bytes)", method, path, status, bytes.len());

        if !status.is_success() {
            return Err(error_from_status(status.as_u16(), &bytes));
        }

        Ok(bytes.to_vec())
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        self.base_url.join(path).map_err(|e| GengoError::ConfigError {
            message: format!("Invalid API path {}: {}", path, e),
        })
    }

    /// URL with `api_key`, `ts` and the signature of the sorted query appended
    fn signed_url(&self, path: &str, params: &[(&str, String)], ts: &str) -> Result<Url> {
        let mut pairs: Vec<(&str, &str)> = params.iter().map(|(k, v)| (*k, v.as_str())).collect();
        pairs.push(("api_key", self.config.api_key.as_str()));
        pairs.push(("ts", ts));
        pairs.sort();

        let mut url = self.endpoint(path)?;
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());

        let api_sig = self.signer.sign(url.query().unwrap_or_default());
        url.query_pairs_mut().append_pair("api_sig", &api_sig);
        Ok(url)
    }

    /// Form fields for a POST/PUT body
    fn signed_form(&self, body: &Value, ts: &str) -> Vec<(&'static str, String)> {
        let data = canonical_json(body);
        let api_sig = self.signer.sign_form(&self.config.api_key, &data, ts);

        vec![
            ("api_key", self.config.api_key.clone()),
            ("api_sig", api_sig),
            ("data", data),
            ("ts", ts.to_string()),
        ]
    }
}

fn flag(value: bool) -> &'static str {
    if value {
        "1"
    } else {
        "0"
    }
}

/// Ids end up in the request path, so only plain tokens are allowed
fn checked_id(kind: &str, id: &dyn fmt::Display) -> Result<String> {
    let id = id.to_string();
    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');

    if valid {
        Ok(id)
    } else {
        Err(GengoError::invalid(format!("Invalid {}: {:?}", kind, id)))
    }
}

fn job_path(job_id: &dyn fmt::Display, suffix: &str) -> Result<String> {
    let job_id = checked_id("job id", job_id)?;
    Ok(format!("translate/job/{}{}", job_id, suffix))
}
