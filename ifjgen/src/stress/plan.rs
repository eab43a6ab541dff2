//! Plan phase: every signature and the definition order, decided up front.
//!
//! The emitter renders declarations and definitions from the same plan, so
//! both blocks always agree on names, arities and types.

use rand::Rng;
use tracing::debug;

use super::names::NameOdometer;
use crate::config::{StressConfig, TypeTag};
use crate::GenResult;

/// A local variable declared in a function body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Local {
    pub name: String,
    pub ty: TypeTag,
}

/// The shape of one generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FunctionSignature {
    pub name: String,
    pub params: Vec<TypeTag>,
    pub returns: Vec<TypeTag>,
    pub locals: Vec<Local>,
}

/// One entry of the definition block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefinitionItem {
    /// Definition of `functions[index]`.
    Function(usize),
    /// An empty-body stub with the given number.
    Stub(usize),
}

/// Totals over a plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlanSummary {
    pub functions: usize,
    pub stubs: usize,
    pub params: usize,
    pub returns: usize,
    pub locals: usize,
}

/// A complete, ready-to-emit stress source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StressPlan {
    pub header: String,
    pub stub_prefix: String,
    pub functions: Vec<FunctionSignature>,
    pub definitions: Vec<DefinitionItem>,
}

impl StressPlan {
    /// Name of the stub with the given number.
    pub fn stub_name(&self, number: usize) -> String {
        format!("{}{}", self.stub_prefix, number)
    }

    pub fn summary(&self) -> PlanSummary {
        let mut summary = PlanSummary {
            functions: self.functions.len(),
            ..PlanSummary::default()
        };
        for function in &self.functions {
            summary.params += function.params.len();
            summary.returns += function.returns.len();
            summary.locals += function.locals.len();
        }
        summary.stubs = self
            .definitions
            .iter()
            .filter(|item| matches!(item, DefinitionItem::Stub(_)))
            .count();
        summary
    }
}

fn choose_type<R: Rng + ?Sized>(rng: &mut R, types: &[TypeTag]) -> TypeTag {
    types[rng.gen_range(0..types.len())]
}

fn choose_types<R: Rng + ?Sized>(rng: &mut R, types: &[TypeTag], max: usize) -> Vec<TypeTag> {
    let count = rng.gen_range(0..=max);
    (0..count).map(|_| choose_type(rng, types)).collect()
}

/// Generates one signature named `name`.
pub fn plan_signature<R: Rng + ?Sized>(
    rng: &mut R,
    config: &StressConfig,
    name: String,
) -> FunctionSignature {
    let params = choose_types(rng, &config.types, config.max_params);
    let returns = choose_types(rng, &config.types, config.max_returns);
    let local_count = rng.gen_range(0..=config.max_locals);
    let locals = (0..local_count)
        .map(|index| Local {
            name: format!("locvar{index}"),
            ty: choose_type(rng, &config.types),
        })
        .collect();

    FunctionSignature {
        name,
        params,
        returns,
        locals,
    }
}

/// Plans the whole stress source.
///
/// Stubs are numbered counting down from `config.stubs`. Before each real
/// definition a fair coin decides whether one stub is placed first; stubs
/// left over once every function is placed go at the end.
pub fn plan<R: Rng + ?Sized>(rng: &mut R, config: &StressConfig) -> GenResult<StressPlan> {
    config.validate()?;

    let functions: Vec<FunctionSignature> = NameOdometer::new(config.base_name.clone())
        .take(config.functions)
        .map(|name| plan_signature(rng, config, name))
        .collect();

    let mut definitions = Vec::with_capacity(functions.len() + config.stubs);
    let mut remaining = config.stubs;
    for index in 0..functions.len() {
        if rng.gen_bool(0.5) && remaining > 0 {
            definitions.push(DefinitionItem::Stub(remaining));
            remaining -= 1;
        }
        definitions.push(DefinitionItem::Function(index));
    }
    debug!(interleaved = config.stubs - remaining, trailing = remaining, "placed stubs");
    definitions.extend((1..=remaining).rev().map(DefinitionItem::Stub));

    Ok(StressPlan {
        header: config.header.clone(),
        stub_prefix: config.stub_prefix.clone(),
        functions,
        definitions,
    })
}
