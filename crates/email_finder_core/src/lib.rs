//! # email_finder_core
//!
//! Corporate email discovery library: derives plausible email addresses from a
//! person's name and a company website, then asks an external verification
//! oracle which one (if any) is deliverable.
//!
//! ## Features
//!
//! - **Domain normalization** of free-form website strings
//! - **Name parsing** into first/middle/last parts
//! - **Candidate generation** from a fixed, ordered library of username templates
//! - **Verification cascade** with early exit on decisive oracle answers
//! - **Result normalization** into a stable output schema
//!
//! ## Example
//!
//! ```rust,no_run
//! use email_finder_core::{EmailFinder, FindRequest, FinderConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let finder = EmailFinder::from_config(&FinderConfig::default())?;
//!
//!     let request = FindRequest {
//!         full_name: "John Smith".to_string(),
//!         company_website: "https://www.example.com".to_string(),
//!         token: "oracle-token".to_string(),
//!     };
//!     let result = finder.find(&request).await?;
//!     println!("{} -> {}", result.email, result.message);
//!
//!     Ok(())
//! }
//! ```

pub mod candidates;
pub mod cascade;
pub mod domain;
pub mod finder;
pub mod names;
pub mod oracle;
pub mod result;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration for the email finder
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinderConfig {
    /// Base URL of the verification oracle
    pub oracle_url: String,
    /// Per-query timeout for oracle calls in milliseconds
    pub oracle_timeout_ms: u64,
    /// User-Agent header sent to the oracle
    pub user_agent: String,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            oracle_url: "http://127.0.0.1:8080/verify".to_string(),
            oracle_timeout_ms: 10_000,
            user_agent: format!("email-finder/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Errors that can cross the finder boundary
#[derive(Error, Debug)]
pub enum FinderError {
    #[error("Verification token is required")]
    MissingToken,
    #[error("Unparsable input: {0}")]
    UnparsableInput(String),
    #[error("No email candidates could be generated")]
    NoCandidates,
    #[error("No verification result after {ver_ops} oracle queries")]
    Indeterminate { ver_ops: u32 },
    #[error("Configuration error: {0}")]
    ConfigurationError(String),
}

pub type Result<T> = std::result::Result<T, FinderError>;

// Re-export main types
pub use candidates::{generate_candidates, CandidateSet};
pub use cascade::{run_cascade, CascadeOutcome};
pub use domain::normalize_domain;
pub use finder::{EmailFinder, FindRequest};
pub use names::NameParts;
pub use oracle::{HttpOracle, OracleError, OracleResponse, VerificationOracle};
pub use result::{MailboxStatus, VerificationResult};
