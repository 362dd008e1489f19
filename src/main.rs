use std::path::Path;
use std::process::ExitCode;

use rpal::common::source::Source;
use rpal::compiler::{flatten, lex, parse, standardize};
use rpal::vm::machine::Machine;

fn main() -> ExitCode {
    let mut dump_ast = false;
    let mut dump_st = false;
    let mut path = None;

    for arg in std::env::args().skip(1) {
        match arg.as_str() {
            "-ast" => dump_ast = true,
            "-st" => dump_st = true,
            other => path = Some(other.to_string()),
        }
    }

    let path = match path {
        Some(p) => p,
        None => {
            eprintln!("Usage: rpal [-ast] [-st] <file>");
            return ExitCode::FAILURE;
        },
    };

    let source = match Source::path(Path::new(&path)) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: couldn't read '{}': {}", path, e);
            return ExitCode::FAILURE;
        },
    };

    let tokens = match lex::lex(&source) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };

    let ast = match parse::parse(tokens) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("{}", e);
            return ExitCode::FAILURE;
        },
    };
    if dump_ast {
        println!("{:#?}", ast);
        return ExitCode::SUCCESS;
    }

    let standardized = standardize::standardize(&ast);
    if dump_st {
        println!("{:#?}", standardized);
        return ExitCode::SUCCESS;
    }

    let cs_map = flatten::flatten(&standardized);
    match Machine::new(cs_map).run() {
        Ok(value) => {
            println!("{}", value);
            ExitCode::SUCCESS
        },
        Err(trace) => {
            eprintln!("{}", trace);
            ExitCode::FAILURE
        },
    }
}
