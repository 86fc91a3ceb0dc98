//! Resilient submission to the healthcare API
//!
//! [`Submitter`] sends one payload with bounded retries, exponential backoff
//! plus jitter ([`RetryPolicy`]) and records permanent failures in the
//! [`FailureLedger`].

pub mod ledger;
pub mod response;
pub mod retry;
pub mod submitter;

pub use ledger::FailureLedger;
pub use response::{ApiResponse, ResponseBody};
pub use retry::RetryPolicy;
pub use submitter::Submitter;
