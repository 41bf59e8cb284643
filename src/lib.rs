#![allow(clippy::needless_return)]

//! Basalt is a tree-walk interpreter for the Lox language: dynamically
//! typed, lexically scoped, with first-class functions, closures and
//! single-inheritance classes. It follows the language described in the
//! [Crafting Interpreters](https://craftinginterpreters.com/) book by
//! Bob Nystrom and aims to be output-compatible with the reference Lox
//! test suite.
//!
//! ## Scanning
//! The first step is scanning: converting a string of characters into a
//! list of tokens. The scanner is implemented in the
//! [`scanner`](scanner) module as a state machine over the characters
//! of the source with a single extra character of lookahead for
//! two-character operators and numeric fractional parts.
//!
//! The scanner reports syntax errors as [`ScanError`](error::ScanError)
//! and keeps going after reporting one, so as many problems as possible
//! surface in a single pass.
//!
//! ## Parsing
//! The second step is parsing: converting the list of tokens into an
//! abstract syntax tree. The parser is implemented in the
//! [`parser`](parser) module as a recursive descent parser producing
//! [`expressions`](expr::Expr), pieces of code that evaluate to an
//! [`Object`](object::Object), and [`statements`](stmt::Stmt), pieces
//! of code executed for their effect.
//!
//! The parser reports syntax errors as [`ParseError`](error::ParseError)
//! and recovers by synchronizing: tokens are discarded until a likely
//! statement boundary and parsing resumes, so one mistake does not hide
//! the rest of the file.
//!
//! ## Resolving
//! The third step is resolving. Before anything runs, the
//! [`resolver`](resolver) walks the tree once and computes, for every
//! local variable reference, how many scopes away its binding lives.
//! The interpreter later uses those distances to index the environment
//! chain directly, which is what makes closures capture variables by
//! scope rather than by name-at-call-time. The same pass rejects code
//! that is syntactically fine but semantically wrong, reported as a
//! [`ResolveError`](error::ResolveError): reading a local in its own
//! initializer, `this` outside a class, `return` at the top level, a
//! class inheriting from itself, and the like.
//!
//! ## Interpreting
//! The final step is interpreting. The [`interpreter`](interpreter)
//! walks the tree and evaluates it against a chain of
//! [`environments`](environment::Environment), one per scope. Runtime
//! failures, like adding a string to a number, are reported as a
//! [`RuntimeError`](error::RuntimeError) and abort the program run.

use std::io::Write;
use std::{fs, process};

pub mod ast;
pub mod class;
pub mod environment;
pub mod error;
pub mod expr;
pub mod function;
pub mod interpreter;
pub mod literal;
pub mod object;
pub mod parser;
pub mod resolver;
pub mod scanner;
pub mod stmt;
pub mod token;

use parser::Parser;
use resolver::Resolver;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use scanner::Scanner;

/// The driver: owns the interpreter and runs source through the
/// scan/parse/resolve/interpret pipeline. Program output goes to the
/// writer supplied at construction; diagnostics go to stderr.
#[allow(non_camel_case_types)]
pub struct basalt<'a> {
    interpreter: interpreter::Interpreter<'a>,
}

impl<'a> basalt<'a> {
    pub fn new(out: &'a mut dyn Write) -> Self {
        basalt {
            interpreter: interpreter::Interpreter::new(out),
        }
    }

    /// Runs a script in batch. Exits the process with code 65 if the
    /// script had a compile-time error and 70 if it had a runtime error.
    pub fn run_file(&mut self, path: String) {
        let contents = fs::read_to_string(path)
            .expect("Should have been able to read the file");

        self.run(&contents);

        if error::had_error() || error::had_runtime_error() {
            // The buffered program output should not be lost to the exit.
            std::io::stdout().flush().expect("flush stdout");

            if error::had_error() {
                process::exit(65);
            }
            process::exit(70);
        }
    }

    /// Runs an interactive prompt. Each line is a complete program; the
    /// error flags are cleared between lines so one mistake does not
    /// poison the session. History is kept across sessions.
    pub fn run_prompt(&mut self) {
        let mut editor = DefaultEditor::new().expect("readline editor");

        let history = home::home_dir().map(|dir| dir.join(".basalt_history"));
        if let Some(history) = &history {
            // A missing history file is fine on the first run.
            let _ = editor.load_history(history);
        }

        loop {
            match editor.readline("> ") {
                Ok(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }

                    let _ = editor.add_history_entry(&line);
                    self.run(&line);
                    error::reset_error();
                },
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(error) => {
                    eprintln!("{error}");
                    break;
                },
            }
        }

        if let Some(history) = &history {
            let _ = editor.save_history(history);
        }
    }

    /// Runs a complete source text through the pipeline. Each stage only
    /// runs if the previous ones reported no error.
    pub fn run(&mut self, source: &str) {
        let mut scanner = Scanner::new(source);
        let tokens = scanner.scan_tokens();

        if error::had_error() {
            return;
        }

        let mut parser = Parser::new(tokens);
        let statements = parser.parse();

        if error::had_error() {
            return;
        }

        let mut resolver = Resolver::new(&mut self.interpreter);
        resolver.resolve(&statements);

        if error::had_error() {
            return;
        }

        self.interpreter.interpret(&statements);
    }
}
