//! Request orchestration
//!
//! This module coordinates one email search: input checks, domain and name
//! normalization, candidate generation, the verification cascade, and the
//! final timing stamp.

use crate::{
    candidates::{generate_candidates, CandidateSet},
    cascade::{run_cascade, CascadeOutcome},
    domain::normalize_domain,
    names::NameParts,
    oracle::{HttpOracle, VerificationOracle},
    result::VerificationResult,
    FinderConfig, FinderError, Result,
};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, instrument, warn, Span};

/// One email search request
#[derive(Debug, Clone, Default)]
pub struct FindRequest {
    pub full_name: String,
    pub company_website: String,
    /// Credential forwarded to the verification oracle
    pub token: String,
}

/// Entry point for email searches
pub struct EmailFinder {
    oracle: Arc<dyn VerificationOracle>,
}

impl EmailFinder {
    pub fn new(oracle: Arc<dyn VerificationOracle>) -> Self {
        Self { oracle }
    }

    /// Build a finder backed by the HTTP oracle described in `config`
    pub fn from_config(config: &FinderConfig) -> Result<Self> {
        let oracle = HttpOracle::from_config(config)
            .map_err(|e| FinderError::ConfigurationError(e.to_string()))?;
        Ok(Self::new(Arc::new(oracle)))
    }

    /// Validate the request and build its ordered candidate set
    ///
    /// # Returns
    /// * `Ok(CandidateSet)` - non-empty candidates
    /// * `Err(FinderError)` - missing token, empty name/domain, or no candidates
    pub fn candidates_for(&self, request: &FindRequest) -> Result<CandidateSet> {
        if request.token.trim().is_empty() {
            return Err(FinderError::MissingToken);
        }

        // Non-empty but malformed domains (no TLD, ports) fall through to an
        // empty candidate set
        let domain = normalize_domain(&request.company_website);
        if domain.is_empty() {
            return Err(FinderError::UnparsableInput(format!(
                "'{}' does not contain a domain",
                request.company_website
            )));
        }

        let name = NameParts::parse(&request.full_name);
        if name.first.is_empty() {
            return Err(FinderError::UnparsableInput("full name is empty".to_string()));
        }

        let candidates = generate_candidates(&name, &domain);
        if candidates.is_empty() {
            return Err(FinderError::NoCandidates);
        }

        Span::current().record("domain", domain.as_str());
        Ok(candidates)
    }

    /// Find the most confident verification result for a person
    ///
    /// # Returns
    /// * `Ok(VerificationResult)` - decisive or best-effort rejected result,
    ///   with `ver_ops` and `time_exec` stamped
    /// * `Err(FinderError)` - input problems, or no parseable oracle answer at all
    #[instrument(skip(self, request), fields(domain))]
    pub async fn find(&self, request: &FindRequest) -> Result<VerificationResult> {
        let started = Instant::now();

        // Step 1: Input validation and candidate generation
        let candidates = self.candidates_for(request)?;
        debug!("Trying {} candidates", candidates.len());

        // Step 2: Sequential verification
        let outcome = run_cascade(self.oracle.as_ref(), candidates, &request.token).await;

        let result = match outcome {
            CascadeOutcome::Decisive(result) | CascadeOutcome::Rejected(result) => result,
            CascadeOutcome::Indeterminate { ver_ops } => {
                warn!("No oracle answer after {} attempts", ver_ops);
                return Err(FinderError::Indeterminate { ver_ops });
            }
        };

        // Step 3: Timing
        let result = result.with_time_exec(started.elapsed());

        info!(
            "Search completed: message='{}', status='{}', ver_ops={} ({:.3}s)",
            result.message,
            result.status.as_str(),
            result.ver_ops,
            result.time_exec
        );

        Ok(result)
    }
}
