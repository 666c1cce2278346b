//! Category Reorder Service
//!
//! Main service implementing `CategoryReorderApi`.

use crate::algorithms::{build_plan, verify_against_target};
use crate::config::ReorderConfig;
use crate::domain::entities::{
    Category, RenumberPlan, ReorderReport, TargetOrder, VerificationIssue, VerificationReport,
};
use crate::domain::errors::ReorderError;
use crate::domain::invariants::{
    invariant_rows_at, invariant_sequence_ahead, invariant_staging_disjoint,
};
use crate::domain::value_objects::{CategoryKey, PhaseTracker, RenumberPhase};
use crate::ports::inbound::CategoryReorderApi;
use crate::ports::outbound::{CategoryStore, CategoryTransaction};
use crate::SUBSYSTEM;
use aspirasi_telemetry::{log_category_event, log_event};
use async_trait::async_trait;
use chrono::Utc;
use tracing::instrument;

/// Category Reorder Service
///
/// Runs the renumbering inside one store transaction:
/// 1. Lock the table (optional) and read the rows
/// 2. Build the plan from the live maximum key
/// 3. Stage every row by name
/// 4. Move every row from its staging key to its desired key
/// 5. Advance the key generator past the maximum key
/// 6. Commit, then verify outside the transaction
pub struct CategoryReorderService<S: CategoryStore> {
    store: S,
    config: ReorderConfig,
}

impl<S: CategoryStore> CategoryReorderService<S> {
    /// Create a new service with default config
    pub fn new(store: S) -> Self {
        Self::with_config(store, ReorderConfig::default())
    }

    /// Create a new service with custom config
    pub fn with_config(store: S, config: ReorderConfig) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &ReorderConfig {
        &self.config
    }

    /// Stage, Commit and Resequence on an open transaction.
    async fn run_phases(
        &self,
        tx: &mut dyn CategoryTransaction,
        target: &TargetOrder,
    ) -> Result<(RenumberPlan, CategoryKey), ReorderError> {
        let mut phase = PhaseTracker::new();

        if self.config.lock_table {
            tx.lock_exclusive().await?;
            log_event!(debug, SUBSYSTEM, "table locked");
        }

        let rows = tx.list_categories().await?;
        let plan = build_plan(target, &rows, self.config.staging_offset, self.config.max_key)?;
        if !invariant_staging_disjoint(&plan) {
            return Err(ReorderError::PhaseInvariantViolated {
                phase: phase.current(),
                detail: "staging keys overlap current or desired keys".to_string(),
            });
        }

        log_event!(
            info,
            SUBSYSTEM,
            "renumbering categories",
            categories = plan.len(),
            current_max = plan.current_max,
            staging_base = plan.staging_base,
            staging_side = plan.staging_side.as_str()
        );

        // Stage: matched by name, current keys are about to move
        for a in &plan.assignments {
            let affected = tx.rekey_by_name(&a.name, a.staging_key).await?;
            match affected {
                1 => {}
                0 => return Err(ReorderError::UnmatchedName { name: a.name.clone() }),
                n => {
                    return Err(ReorderError::AmbiguousName {
                        name: a.name.clone(),
                        matches: n as usize,
                    })
                }
            }
            log_category_event!(info, SUBSYSTEM, "staged", a.name, a.current_key, a.staging_key);
        }
        phase.advance(RenumberPhase::Staged)?;
        self.check_boundary(tx, RenumberPhase::Staged, &plan).await?;

        // Commit order: staging keys are disjoint from desired keys
        for a in &plan.assignments {
            let affected = tx.rekey(a.staging_key, a.final_key).await?;
            if affected != 1 {
                return Err(ReorderError::UnexpectedRowCount {
                    phase: RenumberPhase::Committed,
                    key: a.staging_key,
                    affected,
                });
            }
            log_category_event!(info, SUBSYSTEM, "committed", a.name, a.staging_key, a.final_key);
        }
        phase.advance(RenumberPhase::Committed)?;
        let committed = self
            .check_boundary(tx, RenumberPhase::Committed, &plan)
            .await?
            .unwrap_or_else(|| plan.final_categories());

        // Resequence
        let next_key = tx.advance_sequence().await?;
        phase.advance(RenumberPhase::Resequenced)?;
        if !invariant_sequence_ahead(next_key, &committed) {
            return Err(ReorderError::PhaseInvariantViolated {
                phase: RenumberPhase::Resequenced,
                detail: format!(
                    "key generator next value {next_key} does not exceed max key {}",
                    committed.iter().map(|c| c.key).max().unwrap_or(0)
                ),
            });
        }
        log_event!(info, SUBSYSTEM, "key generator advanced", next_key = next_key);

        Ok((plan, next_key))
    }

    /// Re-read the table inside the transaction and compare with the plan.
    ///
    /// Returns the rows read, or `None` when boundary checks are disabled.
    async fn check_boundary(
        &self,
        tx: &mut dyn CategoryTransaction,
        phase: RenumberPhase,
        plan: &RenumberPlan,
    ) -> Result<Option<Vec<Category>>, ReorderError> {
        if !self.config.check_phase_boundaries {
            return Ok(None);
        }

        let rows = tx.list_categories().await?;
        invariant_rows_at(phase, plan, &rows)
            .map_err(|detail| ReorderError::PhaseInvariantViolated { phase, detail })?;

        log_event!(debug, SUBSYSTEM, "phase boundary verified", phase = %phase, rows = rows.len());
        Ok(Some(rows))
    }

    async fn abort(&self, tx: &mut dyn CategoryTransaction, cause: &ReorderError) {
        log_event!(error, SUBSYSTEM, "renumbering aborted, rolling back", error = %cause);

        if let Err(rollback_err) = tx.rollback().await {
            // The server discards the transaction when the connection goes away
            log_event!(warn, SUBSYSTEM, "rollback failed", error = %rollback_err);
        }
    }

    /// Verification after commit; read failures become an issue, not an error.
    async fn verify_committed(&self, target: &TargetOrder) -> VerificationReport {
        match self.verify(target).await {
            Ok(report) => report,
            Err(err) => VerificationReport::unavailable(err.to_string()),
        }
    }
}

#[async_trait]
impl<S: CategoryStore> CategoryReorderApi for CategoryReorderService<S> {
    #[instrument(skip(self, target), fields(subsystem = SUBSYSTEM, categories = target.len()))]
    async fn reorder(&self, target: &TargetOrder) -> Result<ReorderReport, ReorderError> {
        self.config.validate()?;

        let mut tx = self.store.begin(&self.config.transaction_options()).await?;

        let (plan, next_key) = match self.run_phases(&mut *tx, target).await {
            Ok(outcome) => outcome,
            Err(err) => {
                self.abort(&mut *tx, &err).await;
                return Err(err);
            }
        };

        tx.commit().await?;
        log_event!(info, SUBSYSTEM, "renumbering committed", categories = plan.len(), next_key = next_key);

        let verification = if self.config.verify_after_commit {
            let report = self.verify_committed(target).await;
            for issue in &report.issues {
                log_event!(warn, SUBSYSTEM, "post-commit verification disagrees", issue = %issue);
            }
            Some(report)
        } else {
            None
        };

        Ok(ReorderReport {
            final_categories: plan.final_categories(),
            plan,
            next_key,
            verification,
            completed_at: Utc::now(),
        })
    }

    #[instrument(skip(self, target), fields(subsystem = SUBSYSTEM, categories = target.len()))]
    async fn plan(&self, target: &TargetOrder) -> Result<RenumberPlan, ReorderError> {
        self.config.validate()?;

        let rows = self.store.list_categories().await?;
        let plan = build_plan(target, &rows, self.config.staging_offset, self.config.max_key)?;

        log_event!(
            info,
            SUBSYSTEM,
            "dry run planned",
            categories = plan.len(),
            unchanged = plan.assignments.iter().filter(|a| a.is_unchanged()).count()
        );
        Ok(plan)
    }

    async fn verify(&self, target: &TargetOrder) -> Result<VerificationReport, ReorderError> {
        let rows: Vec<Category> = self.store.list_categories().await?;

        let (next_value, peek_error) = match self.store.next_sequence_value().await {
            Ok(value) => (Some(value), None),
            Err(err) => (None, Some(err)),
        };

        let mut report = verify_against_target(target, rows, next_value);
        if let Some(err) = peek_error {
            report.issues.push(VerificationIssue::Unavailable {
                reason: format!("key generator: {err}"),
            });
        }
        Ok(report)
    }
}
