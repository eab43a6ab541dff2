//! Emit phase: renders a [`StressPlan`] as target-language source.
//!
//! Layout:
//!
//! ```text
//! require "ifj"
//!
//! global a : function(integer, nil) : string
//! ...
//!
//!
//! function f100()
//! end
//!
//!
//! function a(p0 : integer, p1 : nil) : string
//! local locvar0 : number
//! end
//!
//! ...
//! ```

use std::io::Write;

use super::plan::{DefinitionItem, FunctionSignature, StressPlan};
use crate::config::TypeTag;
use crate::GenResult;

fn write_type_list<W: Write>(out: &mut W, types: &[TypeTag]) -> GenResult<()> {
    for (index, ty) in types.iter().enumerate() {
        if index != 0 {
            write!(out, ", ")?;
        }
        write!(out, "{ty}")?;
    }
    Ok(())
}

fn write_returns<W: Write>(out: &mut W, returns: &[TypeTag]) -> GenResult<()> {
    if !returns.is_empty() {
        write!(out, " : ")?;
        write_type_list(out, returns)?;
    }
    Ok(())
}

/// Writes `global <name> : function(<params>) : <returns>`.
pub fn write_declaration<W: Write>(out: &mut W, function: &FunctionSignature) -> GenResult<()> {
    write!(out, "global {} : function(", function.name)?;
    write_type_list(out, &function.params)?;
    write!(out, ")")?;
    write_returns(out, &function.returns)?;
    writeln!(out)?;
    Ok(())
}

/// Writes a definition whose body only declares the function's locals.
pub fn write_definition<W: Write>(out: &mut W, function: &FunctionSignature) -> GenResult<()> {
    write!(out, "function {}(", function.name)?;
    for (index, ty) in function.params.iter().enumerate() {
        if index != 0 {
            write!(out, ", ")?;
        }
        write!(out, "p{index} : {ty}")?;
    }
    write!(out, ")")?;
    write_returns(out, &function.returns)?;
    writeln!(out)?;

    for local in &function.locals {
        writeln!(out, "local {} : {}", local.name, local.ty)?;
    }
    writeln!(out, "end")?;
    writeln!(out)?;
    Ok(())
}

/// Writes an empty-body stub. An interleaved stub (one still ahead of a real
/// definition) is followed by two blank lines, a trailing one by a single
/// blank line.
pub fn write_stub<W: Write>(out: &mut W, name: &str, interleaved: bool) -> GenResult<()> {
    write!(out, "function {name}() \nend \n\n")?;
    if interleaved {
        writeln!(out)?;
    }
    Ok(())
}

/// Writes the whole plan: header, declaration block, definition block.
pub fn emit<W: Write>(plan: &StressPlan, out: &mut W) -> GenResult<()> {
    writeln!(out, "{}", plan.header)?;
    writeln!(out)?;

    for function in &plan.functions {
        write_declaration(out, function)?;
    }
    write!(out, "\n\n\n")?;

    let mut pending = plan.functions.len();
    for item in &plan.definitions {
        match *item {
            DefinitionItem::Function(index) => {
                write_definition(out, &plan.functions[index])?;
                pending = pending.saturating_sub(1);
            }
            DefinitionItem::Stub(number) => {
                write_stub(out, &plan.stub_name(number), pending > 0)?
            }
        }
    }
    out.flush()?;
    Ok(())
}

/// Renders the plan into a string.
pub fn render(plan: &StressPlan) -> GenResult<String> {
    let mut out = Vec::new();
    emit(plan, &mut out)?;
    Ok(String::from_utf8_lossy(&out).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stress::plan::Local;
    use pretty_assertions::assert_eq;

    fn sample_plan() -> StressPlan {
        StressPlan {
            header: "require \"ifj\"".to_string(),
            stub_prefix: "f".to_string(),
            functions: vec![
                FunctionSignature {
                    name: "a".to_string(),
                    params: vec![TypeTag::Integer, TypeTag::Nil],
                    returns: vec![TypeTag::String],
                    locals: vec![Local {
                        name: "locvar0".to_string(),
                        ty: TypeTag::Number,
                    }],
                },
                FunctionSignature {
                    name: "b".to_string(),
                    params: vec![],
                    returns: vec![],
                    locals: vec![],
                },
            ],
            definitions: vec![
                DefinitionItem::Stub(2),
                DefinitionItem::Function(0),
                DefinitionItem::Function(1),
                DefinitionItem::Stub(1),
            ],
        }
    }

    #[test]
    fn test_render_layout() {
        let expected = concat!(
            "require \"ifj\"\n",
            "\n",
            "global a : function(integer, nil) : string\n",
            "global b : function()\n",
            "\n\n\n",
            "function f2() \nend \n\n\n",
            "function a(p0 : integer, p1 : nil) : string\n",
            "local locvar0 : number\n",
            "end\n",
            "\n",
            "function b()\n",
            "end\n",
            "\n",
            "function f1() \nend \n\n",
        );
        assert_eq!(render(&sample_plan()).unwrap(), expected);
    }

    #[test]
    fn test_stub_spacing_interleaved_and_trailing() {
        let mut plan = sample_plan();
        plan.functions.truncate(1);
        plan.definitions = vec![
            DefinitionItem::Stub(3),
            DefinitionItem::Function(0),
            DefinitionItem::Stub(2),
            DefinitionItem::Stub(1),
        ];
        let text = render(&plan).unwrap();
        let definitions = text.split_once("\n\n\n\n").unwrap().1;
        assert_eq!(
            definitions,
            concat!(
                "function f3() \nend \n\n\n",
                "function a(p0 : integer, p1 : nil) : string\n",
                "local locvar0 : number\n",
                "end\n\n",
                "function f2() \nend \n\n",
                "function f1() \nend \n\n",
            )
        );
    }

    #[test]
    fn test_stubs_without_functions_are_trailing() {
        let plan = StressPlan {
            functions: vec![],
            definitions: vec![DefinitionItem::Stub(1)],
            ..sample_plan()
        };
        assert_eq!(
            render(&plan).unwrap(),
            "require \"ifj\"\n\n\n\n\nfunction f1() \nend \n\n"
        );
    }

    #[test]
    fn test_declaration_multiple_returns() {
        let function = FunctionSignature {
            name: "zz".to_string(),
            params: vec![TypeTag::Number],
            returns: vec![TypeTag::Integer, TypeTag::Nil],
            locals: vec![],
        };
        let mut out = Vec::new();
        write_declaration(&mut out, &function).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "global zz : function(number) : integer, nil\n"
        );
    }
}
