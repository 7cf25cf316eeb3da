//! Parameter-file language for converter configurations.
//!
//! The format is line-oriented, SPICE-flavoured and human-editable. Any
//! parameter left out keeps its default value.
//!
//! # Grammar Overview
//!
//! ```text
//! file        = { line }
//! line        = comment | directive | assignment | empty
//! comment     = ('#' | ';') { any_char }
//! assignment  = name '=' value
//! directive   = ".thermal" device ['('] { param '=' value } [')']
//!             | ".tran" value [value]
//!             | ".init" ("zero" | "ambient")
//!
//! device      = "mosfet" | "diode"
//! value       = number [unit_suffix]
//! number      = ['-'|'+'] digit+ ['.' digit+] [('e'|'E') ['-'|'+'] digit+]
//! unit_suffix = 'p' | 'n' | 'u' | 'µ' | 'm' | 'k' | 'M' | 'G'
//! ```
//!
//! # Parameter Names
//!
//! | Name | Meaning | Default |
//! |------|---------|---------|
//! | vin | Input voltage (V) | 24 |
//! | vref | Output reference (V) | 12 |
//! | rload | Load resistance (Ω) | 10 |
//! | l | Inductance (H) | 150u |
//! | c | Output capacitance (F) | 220u |
//! | rl | Inductor ESR (Ω) | 0.08 |
//! | rds | MOSFET on-resistance (Ω) | 0.04 |
//! | vd | Diode forward voltage (V) | 0.7 |
//! | tr, tf | Switch rise/fall time (s) | 40n |
//! | lambda | Sliding-surface gain | 800 |
//! | eta | Boundary-layer half-width | 10m |
//! | fsw | Switching frequency (Hz) | 50k |
//! | tamb | Ambient temperature (°C) | 25 |
//! | rth_mos, cth_mos | MOSFET thermal network | 0.5, 5m |
//! | rth_d, cth_d | Diode thermal network | 2, 2m |
//! | tsim | Simulated duration (s) | 30m |
//! | dt | Timestep (s) | 1/fsw/40 |
//!
//! # Example
//!
//! ```text
//! # 24 V -> 12 V buck, heavier load
//! vin   = 24
//! vref  = 12
//! rload = 5
//!
//! .thermal mosfet (rth=0.5 cth=5m)
//! .thermal diode  (rth=2 cth=2m)
//! .tran 30m
//! .init ambient
//! ```

mod ast;
mod lexer;
mod parser;

pub use ast::*;
pub use lexer::{parse_value, Lexer, Token, TokenKind};
pub use parser::Parser;

use crate::error::Result;

/// Parse a parameter-file string into an AST.
pub fn parse(input: &str) -> Result<ConfigAst> {
    let lexer = Lexer::new(input);
    let mut parser = Parser::new(lexer)?;
    parser.parse()
}

/// Parse a parameter file from disk.
pub fn parse_file(path: &std::path::Path) -> Result<ConfigAst> {
    let content =
        std::fs::read_to_string(path).map_err(|e| crate::error::ConverterError::FileReadError {
            path: path.display().to_string(),
            source: e,
        })?;
    parse(&content)
}
