//! Symbol-table stress source generator.
//!
//! Generation is split in two phases. [`plan`] decides every function
//! signature and where the stub functions go; [`emit`] renders the plan.
//! Keeping the plan around lets the declaration and definition blocks be
//! produced from one source of truth.

pub mod emit;
pub mod names;
pub mod plan;

pub use emit::{emit, render};
pub use names::{next_name, NameOdometer};
pub use plan::{plan, DefinitionItem, FunctionSignature, Local, PlanSummary, StressPlan};

use std::io::Write;

use rand::Rng;
use tracing::info;

use crate::config::StressConfig;
use crate::GenResult;

/// Plans and writes a complete stress source, returning its summary.
pub fn generate<R: Rng + ?Sized, W: Write>(
    rng: &mut R,
    config: &StressConfig,
    out: &mut W,
) -> GenResult<PlanSummary> {
    let plan = plan(rng, config)?;
    let summary = plan.summary();
    info!(
        functions = summary.functions,
        stubs = summary.stubs,
        params = summary.params,
        returns = summary.returns,
        locals = summary.locals,
        "planned stress source"
    );
    emit(&plan, out)?;
    Ok(summary)
}
