//! Resource budget validation
//!
//! The agent init container reserves a fixed slice of the task's CPU and
//! memory ([`AGENT_OVERHEAD_CPU`](crate::AGENT_OVERHEAD_CPU) /
//! [`AGENT_OVERHEAD_MEMORY`](crate::AGENT_OVERHEAD_MEMORY)). Validation is a
//! pure function over the declared sizes and runs before any plan is
//! assembled: an over-budget spec must fail at compile time, never at
//! scheduling time.

use crate::error::BudgetError;
use crate::spec::WorkloadSpec;
use crate::{AGENT_OVERHEAD_CPU, AGENT_OVERHEAD_MEMORY};

/// Validate that the application plus agent overhead fits the task budget
///
/// When the agent is disabled the overhead is zero, so the check reduces to
/// application ≤ task.
///
/// # Errors
/// Returns [`BudgetError`] with the numeric shortfall when either dimension
/// exceeds its budget. CPU is checked before memory.
pub fn validate(spec: &WorkloadSpec) -> Result<(), BudgetError> {
    let (overhead_cpu, overhead_memory) = if spec.agent_enabled {
        (AGENT_OVERHEAD_CPU, AGENT_OVERHEAD_MEMORY)
    } else {
        (0, 0)
    };

    // Sums are widened so values near u32::MAX cannot overflow; the
    // shortfall saturates on the way back down.
    let needed_cpu = u64::from(spec.application_cpu) + u64::from(overhead_cpu);
    if needed_cpu > u64::from(spec.task_cpu) {
        return Err(BudgetError::InsufficientCpu {
            shortfall: saturating_shortfall(needed_cpu, spec.task_cpu),
        });
    }

    let needed_memory = u64::from(spec.application_memory) + u64::from(overhead_memory);
    if needed_memory > u64::from(spec.task_memory) {
        return Err(BudgetError::InsufficientMemory {
            shortfall: saturating_shortfall(needed_memory, spec.task_memory),
        });
    }

    Ok(())
}

fn saturating_shortfall(needed: u64, budget: u32) -> u32 {
    u32::try_from(needed - u64::from(budget)).unwrap_or(u32::MAX)
}
