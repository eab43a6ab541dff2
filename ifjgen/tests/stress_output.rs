//! End-to-end tests for the stress generator output.
//!
//! The generated text is read back line by line and the declaration block
//! is compared with the definition block.

use std::collections::HashSet;

use ifjgen::stress::{self, NameOdometer};
use ifjgen::{Config, StressConfig};
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rand::SeedableRng;

/// Name, parameter types and return types of one function header.
type Header = (String, Vec<String>, Vec<String>);

fn split_list(list: &str) -> Vec<String> {
    if list.trim().is_empty() {
        Vec::new()
    } else {
        list.split(", ").map(str::to_string).collect()
    }
}

fn split_returns(rest: &str) -> Vec<String> {
    rest.strip_prefix(" : ").map(split_list).unwrap_or_default()
}

fn parse_declaration(line: &str) -> Header {
    let rest = line.strip_prefix("global ").expect("declaration prefix");
    let (name, rest) = rest.split_once(" : function(").expect("declaration shape");
    let (params, rest) = rest.split_once(')').expect("closing paren");
    (name.to_string(), split_list(params), split_returns(rest))
}

fn parse_definition(line: &str) -> Header {
    let rest = line.strip_prefix("function ").expect("definition prefix");
    let (name, rest) = rest.split_once('(').expect("opening paren");
    let (params, rest) = rest.split_once(')').expect("closing paren");
    let params = split_list(params)
        .into_iter()
        .enumerate()
        .map(|(index, param)| {
            let (pname, ty) = param.split_once(" : ").expect("typed parameter");
            assert_eq!(pname, format!("p{index}"));
            ty.to_string()
        })
        .collect();
    (name.to_string(), params, split_returns(rest))
}

fn generate(seed: u64, config: &StressConfig) -> String {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    let mut out = Vec::new();
    stress::generate(&mut rng, config, &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

fn small_config() -> StressConfig {
    StressConfig {
        functions: 60,
        stubs: 15,
        max_params: 6,
        max_returns: 4,
        max_locals: 5,
        ..Config::default().stress
    }
}

#[test]
fn test_header_and_blocks() {
    let text = generate(42, &small_config());
    assert!(text.starts_with("require \"ifj\"\n\nglobal a : function("));

    let declarations: Vec<Header> = text
        .lines()
        .filter(|l| l.starts_with("global "))
        .map(parse_declaration)
        .collect();
    let definitions: Vec<Header> = text
        .lines()
        .filter(|l| l.starts_with("function ") && !l.ends_with("() "))
        .map(parse_definition)
        .collect();

    assert_eq!(declarations.len(), 60);
    assert_eq!(declarations, definitions);
}

#[test]
fn test_stub_functions_present() {
    let text = generate(7, &small_config());
    let stubs: Vec<&str> = text.lines().filter(|l| l.ends_with("() ")).collect();
    assert_eq!(stubs.len(), 15);
    assert_eq!(stubs.first().copied(), Some("function f15() "));
    let unique: HashSet<&str> = stubs.iter().copied().collect();
    assert_eq!(unique.len(), 15);
}

#[test]
fn test_every_definition_ends() {
    let text = generate(3, &small_config());
    let opened = text.lines().filter(|l| l.starts_with("function ")).count();
    let closed = text.lines().filter(|l| l.trim_end() == "end").count();
    assert_eq!(opened, 75);
    assert_eq!(opened, closed);
}

#[test]
fn test_locals_declared_in_order() {
    let text = generate(11, &small_config());
    let mut expected_index = 0;
    for line in text.lines() {
        if line.starts_with("function ") {
            expected_index = 0;
        } else if let Some(rest) = line.strip_prefix("local ") {
            let (name, ty) = rest.split_once(" : ").unwrap();
            assert_eq!(name, format!("locvar{expected_index}"));
            assert!(["integer", "nil", "string", "number"].contains(&ty));
            expected_index += 1;
        }
    }
}

#[test]
fn test_same_seed_same_output() {
    let config = small_config();
    assert_eq!(generate(99, &config), generate(99, &config));
}

proptest! {
    #[test]
    fn odometer_names_distinct_and_increasing(count in 1usize..2000) {
        let names: Vec<String> = NameOdometer::new("a").take(count).collect();
        let unique: HashSet<&String> = names.iter().collect();
        prop_assert_eq!(unique.len(), count);
        for pair in names.windows(2) {
            let (a, b) = (&pair[0], &pair[1]);
            prop_assert!(b.bytes().all(|c| c.is_ascii_lowercase()));
            prop_assert!((a.len(), a) < (b.len(), b), "{} !< {}", a, b);
        }
    }

    #[test]
    fn declarations_match_definitions(seed in any::<u64>()) {
        let text = generate(seed, &small_config());
        let declarations: Vec<Header> = text
            .lines()
            .filter(|l| l.starts_with("global "))
            .map(parse_declaration)
            .collect();
        let definitions: Vec<Header> = text
            .lines()
            .filter(|l| l.starts_with("function ") && !l.ends_with("() "))
            .map(parse_definition)
            .collect();
        prop_assert_eq!(declarations, definitions);
    }
}
