//! Step contract for workflow execution
//!
//! ワークフローは小さなstepに分割され、schedulerがoperationを渡して
//! 繰り返し呼び出す。各stepは冪等であること: クラッシュ後のリプレイでも
//! 外部への副作用が二重に起きないよう、事前チェックか write-once フラグで
//! 守る。

use crate::error::Result;
use async_trait::async_trait;
use clusterflow_core::Operation;
use std::time::Duration;

/// Outcome of one step invocation
#[derive(Debug, Clone, PartialEq)]
pub enum StepOutcome {
    /// The step finished; the scheduler advances to the next step
    Complete(Operation),
    /// Not finished yet; re-invoke the same step no sooner than `after`
    Retry {
        operation: Operation,
        after: Duration,
    },
}

impl StepOutcome {
    /// The operation carried by either variant
    pub fn operation(&self) -> &Operation {
        match self {
            StepOutcome::Complete(operation) => operation,
            StepOutcome::Retry { operation, .. } => operation,
        }
    }

    pub fn into_operation(self) -> Operation {
        match self {
            StepOutcome::Complete(operation) => operation,
            StepOutcome::Retry { operation, .. } => operation,
        }
    }

    pub fn is_complete(&self) -> bool {
        matches!(self, StepOutcome::Complete(_))
    }
}

/// Result of a step invocation — exactly three outcomes
///
/// * `Ok(StepOutcome::Complete(_))` — done, move on.
/// * `Ok(StepOutcome::Retry { after, .. })` — not done; `after` is a lower
///   bound, the scheduler may wait longer but never re-invokes sooner.
/// * `Err(ProcessError::OperationFailed { .. })` — terminal; the failed
///   state is already persisted and the workflow must not be re-invoked.
pub type StepResult = Result<StepOutcome>;

/// One idempotent, retryable unit of a workflow
#[async_trait]
pub trait Step: Send + Sync {
    /// Step name used by the scheduler and in logs
    fn name(&self) -> &'static str;

    /// Execute one invocation against the persisted operation
    async fn run(&self, operation: Operation) -> StepResult;
}

#[cfg(test)]
mod tests {
    use super::*;
    use clusterflow_core::OperationKind;

    #[test]
    fn test_outcome_accessors() {
        let operation = Operation::new(OperationKind::Provision, "runtime-a");

        let complete = StepOutcome::Complete(operation.clone());
        assert!(complete.is_complete());
        assert_eq!(complete.operation().runtime_id, "runtime-a");

        let retry = StepOutcome::Retry {
            operation: operation.clone(),
            after: Duration::from_secs(30),
        };
        assert!(!retry.is_complete());
        assert_eq!(retry.into_operation().id, operation.id);
    }
}
