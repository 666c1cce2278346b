//! Inbound Ports (Driving Ports / API)

use crate::domain::entities::{RenumberPlan, ReorderReport, TargetOrder, VerificationReport};
use crate::domain::errors::ReorderError;
use async_trait::async_trait;

/// Primary Category Reorder API
#[async_trait]
pub trait CategoryReorderApi: Send + Sync {
    /// Renumber the category table to match `target`.
    ///
    /// Runs Stage, Commit and Resequence inside one transaction. Any error
    /// rolls the transaction back and leaves the table untouched.
    async fn reorder(&self, target: &TargetOrder) -> Result<ReorderReport, ReorderError>;

    /// Dry run: read the current rows and compute the plan without writing.
    async fn plan(&self, target: &TargetOrder) -> Result<RenumberPlan, ReorderError>;

    /// Read-only check of the table against `target`.
    ///
    /// Findings are reported, not raised; only a failed read is an error.
    async fn verify(&self, target: &TargetOrder) -> Result<VerificationReport, ReorderError>;
}
