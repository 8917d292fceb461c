//! Sequential verification cascade
//!
//! Candidates are checked one at a time, in generation order. A decisive
//! oracle answer ends the search at once; plain rejections are remembered so
//! the caller still gets a best-effort answer when nothing better turns up.

use crate::candidates::CandidateSet;
use crate::oracle::{OracleResponse, VerificationOracle};
use crate::result::VerificationResult;
use tracing::{debug, info, instrument, warn};

/// Oracle messages that end the cascade immediately
pub const TERMINAL_MESSAGES: [&str; 8] = [
    "Catch-All",
    "No MX",
    "MX Error",
    "Timeout",
    "Invalid Token",
    "SPAM Block",
    "Accepted",
    "Limited",
];

/// How an oracle message steers the cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// Stop and report this answer
    Terminal,
    /// Remember as the fallback answer and keep going
    Inconclusive,
}

impl Verdict {
    pub fn classify(message: &str) -> Self {
        if TERMINAL_MESSAGES.contains(&message) {
            Verdict::Terminal
        } else {
            Verdict::Inconclusive
        }
    }
}

/// What the cascade concluded
#[derive(Debug, Clone, PartialEq)]
pub enum CascadeOutcome {
    /// A terminal answer, stamped with the queries spent to reach it
    Decisive(VerificationResult),
    /// Only rejections (or unknown messages): the last one seen
    Rejected(VerificationResult),
    /// No oracle query produced a parseable answer
    Indeterminate { ver_ops: u32 },
}

impl CascadeOutcome {
    pub fn ver_ops(&self) -> u32 {
        match self {
            CascadeOutcome::Decisive(result) | CascadeOutcome::Rejected(result) => result.ver_ops,
            CascadeOutcome::Indeterminate { ver_ops } => *ver_ops,
        }
    }

    /// The finalized result, if the cascade reached one
    pub fn into_result(self) -> Option<VerificationResult> {
        match self {
            CascadeOutcome::Decisive(result) | CascadeOutcome::Rejected(result) => Some(result),
            CascadeOutcome::Indeterminate { .. } => None,
        }
    }
}

/// Run the cascade over all candidates
///
/// # Arguments
/// * `oracle` - Verification oracle to query
/// * `candidates` - Ordered candidates; consumed
/// * `token` - Caller credential forwarded to the oracle on every query
///
/// # Returns
/// * `CascadeOutcome` - never an error; oracle failures only skip a candidate
#[instrument(skip_all, fields(candidates = candidates.len()))]
pub async fn run_cascade<O>(oracle: &O, candidates: CandidateSet, token: &str) -> CascadeOutcome
where
    O: VerificationOracle + ?Sized,
{
    let mut ver_ops: u32 = 0;
    let mut last_rejected: Option<OracleResponse> = None;

    for email in candidates {
        ver_ops += 1;

        let response = match oracle.verify(&email, token).await {
            Ok(response) => response,
            Err(e) => {
                warn!("Skipping candidate #{} after oracle failure: {}", ver_ops, e);
                continue;
            }
        };

        match Verdict::classify(response.message()) {
            Verdict::Terminal => {
                info!(
                    "Cascade stopped on '{}' after {} queries",
                    response.message(),
                    ver_ops
                );
                let result = VerificationResult::from_response(response).with_ver_ops(ver_ops);
                return CascadeOutcome::Decisive(result);
            }
            Verdict::Inconclusive => {
                debug!("Candidate {} inconclusive: '{}'", email, response.message());
                last_rejected = Some(response);
            }
        }
    }

    match last_rejected {
        Some(response) => {
            info!("Cascade exhausted after {} queries, returning last rejection", ver_ops);
            let result = VerificationResult::from_response(response).with_ver_ops(ver_ops);
            CascadeOutcome::Rejected(result)
        }
        None => {
            warn!("Cascade exhausted after {} queries without a usable answer", ver_ops);
            CascadeOutcome::Indeterminate { ver_ops }
        }
    }
}
