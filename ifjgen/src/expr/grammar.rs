//! Random leftmost derivation over the expression grammar.
//!
//! The grammar has one non-terminal `E` and one terminal marker `i`:
//!
//! ```text
//! E -> i | (E) | E+E | E-E | E*E | E/E
//! ```
//!
//! The working sentence is a buffer of one-character symbols. Since every
//! step rewrites the leftmost `E`, everything before the cursor is already
//! terminal and the search for the next `E` never rescans it.

use std::fmt;

use rand::Rng;
use tracing::debug;

/// A binary operator of the generated language.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinOp {
    pub fn as_char(self) -> char {
        match self {
            BinOp::Add => '+',
            BinOp::Sub => '-',
            BinOp::Mul => '*',
            BinOp::Div => '/',
        }
    }
}

/// A symbol of the working sentence. Each renders as exactly one character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Symbol {
    /// The non-terminal `E`.
    NonTerminal,
    /// The terminal marker `i`, later replaced by a literal.
    Terminal,
    OpenParen,
    CloseParen,
    Op(BinOp),
}

impl Symbol {
    pub fn as_char(self) -> char {
        match self {
            Symbol::NonTerminal => 'E',
            Symbol::Terminal => 'i',
            Symbol::OpenParen => '(',
            Symbol::CloseParen => ')',
            Symbol::Op(op) => op.as_char(),
        }
    }
}

/// A production for `E`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// `i`
    Terminal,
    /// `(E)`
    Group,
    /// `E<op>E`
    Binary(BinOp),
}

impl Rule {
    /// The fixed rule set, chosen from uniformly.
    pub const ALL: [Rule; 6] = [
        Rule::Terminal,
        Rule::Group,
        Rule::Binary(BinOp::Add),
        Rule::Binary(BinOp::Sub),
        Rule::Binary(BinOp::Mul),
        Rule::Binary(BinOp::Div),
    ];

    /// Picks a rule uniformly at random.
    pub fn choose<R: Rng + ?Sized>(rng: &mut R) -> Rule {
        Rule::ALL[rng.gen_range(0..Rule::ALL.len())]
    }

    /// The right-hand side of this rule.
    pub fn symbols(self) -> &'static [Symbol] {
        use Symbol::{CloseParen, NonTerminal, Op, OpenParen};

        const TERMINAL: &[Symbol] = &[Symbol::Terminal];
        const GROUP: &[Symbol] = &[OpenParen, NonTerminal, CloseParen];
        const ADD: &[Symbol] = &[NonTerminal, Op(BinOp::Add), NonTerminal];
        const SUB: &[Symbol] = &[NonTerminal, Op(BinOp::Sub), NonTerminal];
        const MUL: &[Symbol] = &[NonTerminal, Op(BinOp::Mul), NonTerminal];
        const DIV: &[Symbol] = &[NonTerminal, Op(BinOp::Div), NonTerminal];

        match self {
            Rule::Terminal => TERMINAL,
            Rule::Group => GROUP,
            Rule::Binary(BinOp::Add) => ADD,
            Rule::Binary(BinOp::Sub) => SUB,
            Rule::Binary(BinOp::Mul) => MUL,
            Rule::Binary(BinOp::Div) => DIV,
        }
    }
}

/// Bookkeeping from one derivation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DerivationStats {
    /// Single-occurrence rewrites performed before the sentence was terminal.
    pub substitutions: usize,
    /// Whether the length guard had to force the remaining non-terminals.
    pub forced: bool,
}

/// A working sentence under leftmost derivation.
#[derive(Debug, Clone)]
pub struct Derivation {
    symbols: Vec<Symbol>,
    /// Every symbol before this index is terminal.
    cursor: usize,
    max_length: usize,
    stats: DerivationStats,
}

impl Derivation {
    /// Starts a derivation from the start symbol `E`.
    pub fn new(max_length: usize) -> Self {
        Self {
            symbols: vec![Symbol::NonTerminal],
            cursor: 0,
            max_length,
            stats: DerivationStats::default(),
        }
    }

    /// The current sentence.
    pub fn symbols(&self) -> &[Symbol] {
        &self.symbols
    }

    /// Number of symbols in the current sentence.
    pub fn length(&self) -> usize {
        self.symbols.len()
    }

    pub fn stats(&self) -> DerivationStats {
        self.stats
    }

    /// Position of the leftmost non-terminal, if any remain.
    fn leftmost(&mut self) -> Option<usize> {
        let offset = self.symbols[self.cursor..]
            .iter()
            .position(|&s| s == Symbol::NonTerminal)?;
        self.cursor += offset;
        Some(self.cursor)
    }

    /// Performs one derivation step.
    ///
    /// Returns `false` once the sentence contains no non-terminal. The length
    /// guard is checked before every substitution, so once the sentence has
    /// reached `max_length` all remaining `E` become `i` in a single pass.
    pub fn step<R: Rng + ?Sized>(&mut self, rng: &mut R) -> bool {
        if self.symbols.len() >= self.max_length && !self.stats.forced {
            self.force_terminals();
        }

        let Some(at) = self.leftmost() else {
            return false;
        };

        let rule = Rule::choose(rng);
        self.symbols.splice(at..=at, rule.symbols().iter().copied());
        self.stats.substitutions += 1;
        true
    }

    /// Rewrites every remaining `E` to `i`.
    fn force_terminals(&mut self) {
        let mut forced = 0;
        for symbol in &mut self.symbols[self.cursor..] {
            if *symbol == Symbol::NonTerminal {
                *symbol = Symbol::Terminal;
                forced += 1;
            }
        }
        debug!(
            length = self.symbols.len(),
            forced, "length guard reached, forcing terminals"
        );
        self.stats.forced = true;
    }

    /// Runs the derivation until only terminal symbols remain.
    pub fn run<R: Rng + ?Sized>(mut self, rng: &mut R) -> Self {
        while self.step(rng) {}
        self
    }

    /// Replaces each terminal marker, leftmost first, with a random literal
    /// in `min..=max` and renders the finished expression.
    ///
    /// Non-terminals left in the sentence are rendered as `E`; callers run
    /// the derivation to completion first.
    pub fn fill_literals<R: Rng + ?Sized>(&self, rng: &mut R, min: u32, max: u32) -> String {
        let mut text = String::with_capacity(self.symbols.len() * 3);
        for &symbol in &self.symbols {
            match symbol {
                Symbol::Terminal => {
                    let value = rng.gen_range(min..=max);
                    text.push_str(&value.to_string());
                }
                other => text.push(other.as_char()),
            }
        }
        text
    }
}

impl fmt::Display for Derivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for symbol in &self.symbols {
            write!(f, "{}", symbol.as_char())?;
        }
        Ok(())
    }
}
