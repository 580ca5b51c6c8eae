//! Typed records for myGengo requests and responses

use chrono::{DateTime, TimeZone, Utc};
use regex::Regex;
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;
use std::sync::OnceLock;

use crate::core::errors::{GengoError, Result};

/// Whether `code` looks like a language code the service accepts (`en`, `fr`,
/// `zh-tw`, `pt-br`, `zh-Hant`)
pub fn is_language_code(code: &str) -> bool {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN
        .get_or_init(|| Regex::new(r"^[a-z]{2,3}(-[A-Za-z]{2,4})?$").expect("valid regex"))
        .is_match(code)
}

/// Translation quality level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    /// Machine translation, free of charge
    #[default]
    Machine,
    /// Native speaker translation
    Standard,
    /// Professional translator
    Pro,
    /// Professional translation with an extra proofreading pass
    Ultra,
}

impl Tier {
    /// Name the service uses for the tier
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Machine => "machine",
            Tier::Standard => "standard",
            Tier::Pro => "pro",
            Tier::Ultra => "ultra",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Tier {
    type Err = GengoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "machine" => Ok(Tier::Machine),
            "standard" => Ok(Tier::Standard),
            "pro" => Ok(Tier::Pro),
            "ultra" => Ok(Tier::Ultra),
            other => Err(GengoError::invalid(format!("Unknown tier: {}", other))),
        }
    }
}

/// Job status as reported by the service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum JobStatus {
    /// Waiting for payment
    Unpaid,
    /// Waiting for a translator
    Available,
    /// Being translated
    Pending,
    /// Translated, waiting for approval
    Reviewable,
    /// Translation accepted
    Approved,
    /// Sent back for a revision
    Revising,
    /// Translation refused
    Rejected,
    /// Cancelled before a translator picked it up
    Cancelled,
    /// Held by the service for review
    Held,
    /// A status this client does not know about, kept verbatim
    Other(String),
}

impl JobStatus {
    /// Name the service uses for the status
    pub fn as_str(&self) -> &str {
        match self {
            JobStatus::Unpaid => "unpaid",
            JobStatus::Available => "available",
            JobStatus::Pending => "pending",
            JobStatus::Reviewable => "reviewable",
            JobStatus::Approved => "approved",
            JobStatus::Revising => "revising",
            JobStatus::Rejected => "rejected",
            JobStatus::Cancelled => "cancelled",
            JobStatus::Held => "held",
            JobStatus::Other(s) => s,
        }
    }

    /// Whether the translated text is available for this status
    pub fn has_translation(&self) -> bool {
        matches!(self, JobStatus::Reviewable | JobStatus::Approved)
    }
}

impl From<String> for JobStatus {
    fn from(s: String) -> Self {
        match s.as_str() {
            "unpaid" => JobStatus::Unpaid,
            "available" => JobStatus::Available,
            "pending" => JobStatus::Pending,
            "reviewable" => JobStatus::Reviewable,
            "approved" => JobStatus::Approved,
            "revising" => JobStatus::Revising,
            "rejected" => JobStatus::Rejected,
            "cancelled" => JobStatus::Cancelled,
            "held" => JobStatus::Held,
            _ => JobStatus::Other(s),
        }
    }
}

impl From<JobStatus> for String {
    fn from(status: JobStatus) -> Self {
        status.as_str().to_string()
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A translation job snapshot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Job {
    /// Id of the job; `get_job` fills in the requested id when the service
    /// leaves it out
    #[serde(deserialize_with = "string_or_number")]
    pub job_id: String,
    /// Text to translate
    #[serde(default)]
    pub body_src: Option<String>,
    /// Translated text, once available
    #[serde(default)]
    pub body_tgt: Option<String>,
    /// Source language code
    #[serde(default)]
    pub lc_src: Option<String>,
    /// Target language code
    #[serde(default)]
    pub lc_tgt: Option<String>,
    /// Words or characters billed
    #[serde(default, deserialize_with = "opt_u64")]
    pub unit_count: Option<u64>,
    /// Translation tier
    #[serde(default)]
    pub tier: Option<String>,
    /// Credits charged
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub credits: Option<String>,
    /// Current status
    #[serde(default)]
    pub status: Option<JobStatus>,
    /// Estimated seconds until completion
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub eta: Option<String>,
    /// Creation time as a unix timestamp
    #[serde(default, deserialize_with = "opt_i64")]
    pub ctime: Option<i64>,
    /// Short description shown to the translator
    #[serde(default)]
    pub slug: Option<String>,
    /// Opaque data stored with the job
    #[serde(default)]
    pub custom_data: Option<String>,
    /// Whether the translation is approved without review
    #[serde(default, deserialize_with = "opt_flag")]
    pub auto_approve: Option<bool>,
    /// Captcha image to read before rejecting
    #[serde(default)]
    pub captcha_url: Option<String>,
    /// Preview image of the translation
    #[serde(default)]
    pub preview_url: Option<String>,
    /// Whether the translation was produced by machine
    #[serde(default, deserialize_with = "opt_flag")]
    pub mt: Option<bool>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Job {
    /// Creation time of the job
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.ctime.and_then(timestamp)
    }

    /// Translated text, once the job has reached a reviewable state
    pub fn translation(&self) -> Option<&str> {
        self.body_tgt.as_deref().filter(|t| !t.is_empty())
    }

    /// Whether the service has not finished translating yet
    pub fn is_pending(&self) -> bool {
        match &self.status {
            Some(status) => !status.has_translation(),
            None => self.translation().is_none(),
        }
    }
}

/// Account credit balance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// Credits exactly as formatted by the service, e.g. `"42.50"`
    #[serde(deserialize_with = "string_or_number")]
    pub credits: String,
    /// Currency of the credits
    #[serde(default)]
    pub currency: Option<String>,
}

impl AccountBalance {
    /// Credits as a number
    pub fn as_f64(&self) -> Result<f64> {
        self.credits
            .trim()
            .parse::<f64>()
            .map_err(|_| GengoError::decode(format!("Bad JSON: credits {:?} is not a number", self.credits)))
    }

    /// Check the balance is a non-negative number
    pub(crate) fn validate(&self) -> Result<()> {
        let credits = self.as_f64()?;
        if credits < 0.0 || !credits.is_finite() {
            return Err(GengoError::decode(format!(
                "Bad JSON: credits {:?} is not a valid balance",
                self.credits
            )));
        }
        Ok(())
    }
}

impl fmt::Display for AccountBalance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.currency {
            Some(currency) => write!(f, "{} {}", self.credits, currency),
            None => f.write_str(&self.credits),
        }
    }
}

/// Account statistics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccountStats {
    /// Credits spent since the account was created
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub credits_spent: Option<String>,
    /// Account creation time as a unix timestamp
    #[serde(default, deserialize_with = "opt_i64")]
    pub user_since: Option<i64>,
    /// Currency of the credits
    #[serde(default)]
    pub currency: Option<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl AccountStats {
    /// When the account was created
    pub fn member_since(&self) -> Option<DateTime<Utc>> {
        self.user_since.and_then(timestamp)
    }
}

/// An entry in a job's comment thread
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Comment text
    pub body: String,
    /// `customer` or `translator`
    #[serde(default)]
    pub author: Option<String>,
    /// Unix timestamp
    #[serde(default, deserialize_with = "opt_i64")]
    pub ctime: Option<i64>,
}

/// A revision of a job's translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Revision {
    /// Revision id
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub rev_id: Option<String>,
    /// Unix timestamp
    #[serde(default, deserialize_with = "opt_i64")]
    pub ctime: Option<i64>,
    /// Translation at this revision
    #[serde(default)]
    pub body_tgt: Option<String>,
}

/// Feedback left when a job was approved
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Feedback {
    /// Rating from 1 to 5
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub rating: Option<String>,
    /// Comment left for the translator
    #[serde(default)]
    pub for_translator: Option<String>,
}

/// A language supported by the service
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Language {
    /// Language code
    pub lc: String,
    /// English name
    #[serde(default)]
    pub language: Option<String>,
    /// Name in the language itself
    #[serde(default)]
    pub localized_name: Option<String>,
    /// `word` or `character`
    #[serde(default)]
    pub unit_type: Option<String>,
}

/// A supported source/target combination and its price
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LanguagePair {
    /// Source language code
    pub lc_src: String,
    /// Target language code
    pub lc_tgt: String,
    /// Tier the price applies to
    pub tier: String,
    /// Credits per unit
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub unit_price: Option<String>,
}

/// Short job reference returned by job listings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSummary {
    /// Id of the job
    #[serde(deserialize_with = "string_or_number")]
    pub job_id: String,
    /// Creation time as a unix timestamp
    #[serde(default, deserialize_with = "opt_i64")]
    pub ctime: Option<i64>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Answer to a group submission
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobGroupReceipt {
    /// Id of the new group
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub group_id: Option<String>,
    /// Fields not modelled above
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Filter for listing recent jobs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JobFilter {
    /// Only jobs with this status
    pub status: Option<JobStatus>,
    /// Only jobs created after this unix timestamp
    pub timestamp_after: Option<i64>,
    /// Maximum number of jobs
    pub count: Option<u32>,
}

impl JobFilter {
    pub(crate) fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = Vec::new();
        if let Some(status) = &self.status {
            params.push(("status", status.to_string()));
        }
        if let Some(ts) = self.timestamp_after {
            params.push(("timestamp_after", ts.to_string()));
        }
        if let Some(count) = self.count {
            params.push(("count", count.to_string()));
        }
        params
    }
}

/// A job to submit for translation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobSubmission {
    /// Text to translate
    pub text: String,
    /// Target language code
    pub target_lang: String,
    /// Left unset, the service detects the source language
    pub source_lang: Option<String>,
    /// Translation tier
    pub tier: Tier,
    /// Approve the translation without review
    pub auto_approve: bool,
    /// Short description shown to the translator
    pub slug: Option<String>,
    /// Opaque data stored with the job
    pub custom_data: Option<String>,
    /// Instructions for the translator
    pub comment: Option<String>,
    /// URL notified when the job changes state
    pub callback_url: Option<String>,
}

impl JobSubmission {
    /// Machine translation of `text` into `target_lang`
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_lang: target_lang.into(),
            source_lang: None,
            tier: Tier::default(),
            auto_approve: false,
            slug: None,
            custom_data: None,
            comment: None,
            callback_url: None,
        }
    }

    /// Set the source language
    pub fn with_source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = Some(source_lang.into());
        self
    }

    /// Set the tier
    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }

    /// Approve the translation without review
    pub fn auto_approve(mut self, auto_approve: bool) -> Self {
        self.auto_approve = auto_approve;
        self
    }

    /// Set the description shown to the translator
    pub fn with_slug(mut self, slug: impl Into<String>) -> Self {
        self.slug = Some(slug.into());
        self
    }

    /// Attach data returned with the job
    pub fn with_custom_data(mut self, custom_data: impl Into<String>) -> Self {
        self.custom_data = Some(custom_data.into());
        self
    }

    /// Add instructions for the translator
    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Set the URL notified on state changes
    pub fn with_callback_url(mut self, callback_url: impl Into<String>) -> Self {
        self.callback_url = Some(callback_url.into());
        self
    }

    /// Reject input the service would refuse anyway
    pub fn validate(&self) -> Result<()> {
        if self.text.trim().is_empty() {
            return Err(GengoError::invalid("text must not be empty"));
        }

        if !is_language_code(&self.target_lang) {
            return Err(GengoError::invalid(format!(
                "Unrecognized target language code: {:?}",
                self.target_lang
            )));
        }

        if let Some(source) = &self.source_lang {
            if !is_language_code(source) {
                return Err(GengoError::invalid(format!(
                    "Unrecognized source language code: {:?}",
                    source
                )));
            }
            if source.eq_ignore_ascii_case(&self.target_lang) {
                return Err(GengoError::invalid(
                    "source and target language must differ",
                ));
            }
        }

        Ok(())
    }

    /// Job object as the service expects it inside `data`
    pub fn to_payload(&self) -> Value {
        let mut job = Map::new();
        job.insert("body_src".into(), Value::String(self.text.clone()));
        job.insert("lc_tgt".into(), Value::String(self.target_lang.clone()));
        job.insert("tier".into(), Value::String(self.tier.to_string()));
        job.insert("auto_approve".into(), flag(self.auto_approve));

        if let Some(source) = &self.source_lang {
            job.insert("lc_src".into(), Value::String(source.clone()));
        }

        let optional = [
            ("slug", &self.slug),
            ("custom_data", &self.custom_data),
            ("comment", &self.comment),
            ("callback_url", &self.callback_url),
        ];
        for (key, value) in optional {
            if let Some(value) = value {
                job.insert(key.into(), Value::String(value.clone()));
            }
        }

        Value::Object(job)
    }
}

/// Reason given when rejecting a translation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Poor translation quality
    Quality,
    /// Parts of the text were not translated
    Incomplete,
    /// Any other reason
    Other,
}

impl RejectReason {
    /// Name the service uses for the reason
    pub fn as_str(&self) -> &'static str {
        match self {
            RejectReason::Quality => "quality",
            RejectReason::Incomplete => "incomplete",
            RejectReason::Other => "other",
        }
    }
}

impl FromStr for RejectReason {
    type Err = GengoError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "quality" => Ok(RejectReason::Quality),
            "incomplete" => Ok(RejectReason::Incomplete),
            "other" => Ok(RejectReason::Other),
            other => Err(GengoError::invalid(format!(
                "Unknown reject reason: {} (expected quality, incomplete or other)",
                other
            ))),
        }
    }
}

/// Update applied to an existing job
#[derive(Debug, Clone, PartialEq)]
pub enum JobAction {
    /// Pay for a job that was submitted without enough credits
    Purchase,
    /// Send the job back to the translator
    Revise {
        /// What should change
        comment: String,
    },
    /// Accept the translation
    Approve {
        /// Rating from 1 to 5
        rating: Option<u8>,
        /// Feedback for the translator
        for_translator: Option<String>,
        /// Feedback for myGengo
        for_mygengo: Option<String>,
        /// Allow the feedback to be shared publicly
        public: bool,
    },
    /// Refuse the translation; `captcha` is the text of the job's captcha image
    Reject {
        /// Why the translation is refused
        reason: RejectReason,
        /// Details for the translator
        comment: String,
        /// Text of the captcha image
        captcha: String,
        /// `requeue` or `cancel`
        follow_up: Option<String>,
    },
}

impl JobAction {
    /// Value of the `action` parameter
    pub fn name(&self) -> &'static str {
        match self {
            JobAction::Purchase => "purchase",
            JobAction::Revise { .. } => "revise",
            JobAction::Approve { .. } => "approve",
            JobAction::Reject { .. } => "reject",
        }
    }

    /// Reject actions missing what the service requires
    pub fn validate(&self) -> Result<()> {
        match self {
            JobAction::Purchase => Ok(()),
            JobAction::Revise { comment } if comment.trim().is_empty() => {
                Err(GengoError::invalid("revise requires a comment"))
            }
            JobAction::Revise { .. } => Ok(()),
            JobAction::Approve {
                rating: Some(rating),
                ..
            } if !(1..=5).contains(rating) => Err(GengoError::invalid(format!(
                "rating must be between 1 and 5, got {}",
                rating
            ))),
            JobAction::Approve { .. } => Ok(()),
            JobAction::Reject {
                comment, captcha, ..
            } => {
                if comment.trim().is_empty() {
                    return Err(GengoError::invalid("reject requires a comment"));
                }
                if captcha.trim().is_empty() {
                    return Err(GengoError::invalid("reject requires the captcha text"));
                }
                Ok(())
            }
        }
    }

    /// Parameters sent in the PUT body
    pub fn to_payload(&self) -> Value {
        let mut params = Map::new();
        params.insert("action".into(), Value::String(self.name().to_string()));

        match self {
            JobAction::Purchase => {}
            JobAction::Revise { comment } => {
                params.insert("comment".into(), Value::String(comment.clone()));
            }
            JobAction::Approve {
                rating,
                for_translator,
                for_mygengo,
                public,
            } => {
                if let Some(rating) = rating {
                    params.insert("rating".into(), Value::String(rating.to_string()));
                }
                if let Some(text) = for_translator {
                    params.insert("for_translator".into(), Value::String(text.clone()));
                }
                if let Some(text) = for_mygengo {
                    params.insert("for_mygengo".into(), Value::String(text.clone()));
                }
                params.insert("public".into(), flag(*public));
            }
            JobAction::Reject {
                reason,
                comment,
                captcha,
                follow_up,
            } => {
                params.insert("reason".into(), Value::String(reason.as_str().to_string()));
                params.insert("comment".into(), Value::String(comment.clone()));
                params.insert("captcha".into(), Value::String(captcha.clone()));
                if let Some(follow_up) = follow_up {
                    params.insert("follow_up".into(), Value::String(follow_up.clone()));
                }
            }
        }

        Value::Object(params)
    }
}

fn flag(value: bool) -> Value {
    Value::String(if value { "1" } else { "0" }.to_string())
}

fn timestamp(secs: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_opt(secs, 0).single()
}

fn string_or_number<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(s) => Ok(s),
        Value::Number(n) => Ok(n.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

fn opt_string_or_number<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::String(s) => Ok(Some(s)),
        Value::Number(n) => Ok(Some(n.to_string())),
        other => Err(de::Error::custom(format!(
            "expected a string or number, got {}",
            other
        ))),
    }
}

fn opt_i64<'de, D>(deserializer: D) -> std::result::Result<Option<i64>, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_string_or_number(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s
            .parse::<i64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected an integer, got {:?}", s))),
    }
}

fn opt_u64<'de, D>(deserializer: D) -> std::result::Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match opt_string_or_number(deserializer)? {
        None => Ok(None),
        Some(s) if s.is_empty() => Ok(None),
        Some(s) => s
            .parse::<u64>()
            .map(Some)
            .map_err(|_| de::Error::custom(format!("expected a count, got {:?}", s))),
    }
}

fn opt_flag<'de, D>(deserializer: D) -> std::result::Result<Option<bool>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Null => Ok(None),
        Value::Bool(b) => Ok(Some(b)),
        Value::Number(n) => Ok(Some(n.as_i64() != Some(0))),
        Value::String(s) => match s.as_str() {
            "1" | "true" => Ok(Some(true)),
            "0" | "false" | "" => Ok(Some(false)),
            _ => Err(de::Error::custom(format!("expected a flag, got {:?}", s))),
        },
        other => Err(de::Error::custom(format!("expected a flag, got {}", other))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_json_diff::assert_json_eq;
    use serde_json::json;

    #[test]
    fn test_language_codes() {
        for code in ["en", "fr", "ja", "zh-tw", "pt-br", "zh-Hant", "fil"] {
            assert!(is_language_code(code), "{} should be accepted", code);
        }
        for code in ["", "e", "english", "FR", "fr_", "fr-", "12", "en-toolong"] {
            assert!(!is_language_code(code), "{} should be rejected", code);
        }
    }

    #[test]
    fn test_job_accepts_numeric_fields() {
        let job: Job = serde_json::from_value(json!({
            "job_id": 1234,
            "body_src": "big red car",
            "lc_src": "en",
            "lc_tgt": "fr",
            "unit_count": "3",
            "tier": "machine",
            "credits": 0,
            "status": "approved",
            "eta": -1,
            "ctime": 1300000000,
            "auto_approve": "1",
            "mt": 1,
            "body_tgt": "grande voiture rouge"
        }))
        .unwrap();

        assert_eq!(job.job_id, "1234");
        assert_eq!(job.unit_count, Some(3));
        assert_eq!(job.credits.as_deref(), Some("0"));
        assert_eq!(job.status, Some(JobStatus::Approved));
        assert_eq!(job.auto_approve, Some(true));
        assert_eq!(job.mt, Some(true));
        assert_eq!(job.translation(), Some("grande voiture rouge"));
        assert!(!job.is_pending());
        assert_eq!(job.created_at().unwrap().timestamp(), 1300000000);
    }

    #[test]
    fn test_job_requires_job_id() {
        let result: std::result::Result<Job, _> =
            serde_json::from_value(json!({"body_tgt": "Il s'agit d'un test"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_job_keeps_unknown_fields() {
        let job: Job = serde_json::from_value(json!({
            "job_id": "7",
            "status": "translating",
            "word_count": 12
        }))
        .unwrap();

        assert_eq!(job.status, Some(JobStatus::Other("translating".to_string())));
        assert_eq!(job.extra.get("word_count"), Some(&json!(12)));
        assert!(job.is_pending());
    }

    #[test]
    fn test_balance_keeps_formatting() {
        let balance: AccountBalance =
            serde_json::from_value(json!({"credits": "42.50", "currency": "USD"})).unwrap();

        assert_eq!(balance.credits, "42.50");
        assert_eq!(balance.as_f64().unwrap(), 42.5);
        assert_eq!(balance.to_string(), "42.50 USD");
        assert!(balance.validate().is_ok());
    }

    #[test]
    fn test_negative_balance_is_rejected() {
        let balance = AccountBalance {
            credits: "-1.00".to_string(),
            currency: None,
        };
        assert!(matches!(
            balance.validate(),
            Err(GengoError::DecodeError { .. })
        ));
    }

    #[test]
    fn test_submission_payload() {
        let submission = JobSubmission::new("This is a test", "fr")
            .auto_approve(true)
            .with_comment("thanks")
            .with_callback_url("http://example.com/cb");

        assert_json_eq!(
            submission.to_payload(),
            json!({
                "body_src": "This is a test",
                "lc_tgt": "fr",
                "tier": "machine",
                "auto_approve": "1",
                "comment": "thanks",
                "callback_url": "http://example.com/cb"
            })
        );
    }

    #[test]
    fn test_submission_with_source_language() {
        let submission = JobSubmission::new("big red car", "fr")
            .with_source_lang("en")
            .with_tier(Tier::Standard);
        let payload = submission.to_payload();

        assert_eq!(payload["lc_src"], "en");
        assert_eq!(payload["tier"], "standard");
        assert_eq!(payload["auto_approve"], "0");
    }

    #[test]
    fn test_submission_validation() {
        assert!(JobSubmission::new("hello", "fr").validate().is_ok());
        assert!(JobSubmission::new("   ", "fr").validate().is_err());
        assert!(JobSubmission::new("hello", "french").validate().is_err());
        assert!(JobSubmission::new("hello", "fr")
            .with_source_lang("fr")
            .validate()
            .is_err());
    }

    #[test]
    fn test_job_action_payloads() {
        assert_json_eq!(JobAction::Purchase.to_payload(), json!({"action": "purchase"}));

        let approve = JobAction::Approve {
            rating: Some(5),
            for_translator: Some("Great job".to_string()),
            for_mygengo: None,
            public: true,
        };
        assert_json_eq!(
            approve.to_payload(),
            json!({
                "action": "approve",
                "rating": "5",
                "for_translator": "Great job",
                "public": "1"
            })
        );

        let reject = JobAction::Reject {
            reason: RejectReason::Quality,
            comment: "Too literal".to_string(),
            captcha: "XYZ".to_string(),
            follow_up: Some("requeue".to_string()),
        };
        assert_eq!(reject.to_payload()["reason"], "quality");
        assert_eq!(reject.to_payload()["follow_up"], "requeue");
    }

    #[test]
    fn test_job_action_validation() {
        let bad_rating = JobAction::Approve {
            rating: Some(9),
            for_translator: None,
            for_mygengo: None,
            public: false,
        };
        assert!(bad_rating.validate().is_err());

        let no_captcha = JobAction::Reject {
            reason: RejectReason::Other,
            comment: "wrong".to_string(),
            captcha: "".to_string(),
            follow_up: None,
        };
        assert!(no_captcha.validate().is_err());

        assert!(JobAction::Revise {
            comment: " ".to_string()
        }
        .validate()
        .is_err());
    }

    #[test]
    fn test_filter_params() {
        let filter = JobFilter {
            status: Some(JobStatus::Reviewable),
            timestamp_after: None,
            count: Some(10),
        };
        assert_eq!(
            filter.to_params(),
            vec![("status", "reviewable".to_string()), ("count", "10".to_string())]
        );
    }

    #[test]
    fn test_tier_parsing() {
        assert_eq!("Pro".parse::<Tier>().unwrap(), Tier::Pro);
        assert!("gold".parse::<Tier>().is_err());
    }
}
