//! Interactive Monkey REPL
//!
//! Usage: monkey [--parse-only] [--ast] [--max-depth <n>] [script]
//!
//! Logging is enabled with `RUST_LOG=monkey=debug` (or `trace`).

use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::Once;

use anyhow::{bail, Context, Result};
use monkey::{Env, EvalConfig, Environment, Evaluator, Parser, Value};

const PROMPT: &str = ">> ";

static TRACING_INIT: Once = Once::new();

fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        // Only initialize if RUST_LOG is set
        if std::env::var("RUST_LOG").is_ok() {
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_writer(io::stderr))
                .with(EnvFilter::from_default_env())
                .init();
        }
    });
}

#[derive(Debug, Default, PartialEq)]
struct Options {
    /// Echo the canonical rendering instead of evaluating
    parse_only: bool,
    /// Print each parsed program as JSON
    show_ast: bool,
    config: EvalConfig,
    script: Option<PathBuf>,
}

fn parse_args(args: &[String]) -> Result<Options> {
    let mut options = Options::default();
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--parse-only" => options.parse_only = true,
            "--ast" => options.show_ast = true,
            "--max-depth" => {
                let value = iter.next().context("--max-depth requires a value")?;
                let depth = value
                    .parse()
                    .with_context(|| format!("invalid --max-depth value: {}", value))?;
                options.config = options.config.with_max_call_depth(depth);
            }
            flag if flag.starts_with("--") => bail!("unknown option: {}", flag),
            path => {
                if options.script.is_some() {
                    bail!("only one script may be given");
                }
                options.script = Some(PathBuf::from(path));
            }
        }
    }

    Ok(options)
}

/// One REPL session: a single environment reused across lines
struct Session {
    env: Env,
    evaluator: Evaluator,
    parse_only: bool,
    show_ast: bool,
}

impl Session {
    fn new(options: &Options) -> Self {
        Session {
            env: Environment::new().into_shared(),
            evaluator: Evaluator::with_config(options.config.clone()),
            parse_only: options.parse_only,
            show_ast: options.show_ast,
        }
    }

    /// Runs one chunk of source and returns what should be printed
    fn handle(&mut self, source: &str) -> Result<Option<String>> {
        let mut parser = Parser::from_source(source);
        let program = parser.parse_program();

        if !parser.errors().is_empty() {
            let mut out = String::from("parser errors:");
            for msg in parser.error_messages() {
                out.push_str("\n\t");
                out.push_str(&msg);
            }
            return Ok(Some(out));
        }

        let mut out = Vec::new();
        if self.show_ast {
            out.push(serde_json::to_string_pretty(&program)?);
        }

        if self.parse_only {
            out.push(program.to_string());
        } else {
            match self.evaluator.eval(&program, &self.env) {
                Value::Null => {}
                val => out.push(val.to_string()),
            }
        }

        Ok((!out.is_empty()).then(|| out.join("\n")))
    }
}

// Functions bound at top level hold the global environment, so the bindings
// are cleared to let the session's values be freed.
impl Drop for Session {
    fn drop(&mut self) {
        self.env.borrow_mut().clear();
    }
}

fn repl(input: impl BufRead, mut output: impl Write, options: &Options) -> Result<()> {
    let mut session = Session::new(options);
    write!(output, "{}", PROMPT)?;
    output.flush()?;

    for line in input.lines() {
        let line = line.context("failed to read input")?;
        match line.trim() {
            "" => {}
            ":quit" | ":exit" => break,
            ":reset" => {
                session = Session::new(options);
                writeln!(output, "environment cleared")?;
            }
            ":ast" => {
                session.show_ast = !session.show_ast;
                writeln!(output, "ast output {}", if session.show_ast { "on" } else { "off" })?;
            }
            source => {
                if let Some(text) = session.handle(source)? {
                    writeln!(output, "{}", text)?;
                }
            }
        }
        write!(output, "{}", PROMPT)?;
        output.flush()?;
    }

    Ok(())
}

fn run_script(path: &PathBuf, options: &Options) -> Result<()> {
    let source = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let mut session = Session::new(options);
    if let Some(text) = session.handle(&source)? {
        println!("{}", text);
    }
    Ok(())
}

fn main() -> Result<()> {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = parse_args(&args)?;

    if let Some(path) = &options.script {
        return run_script(path, &options);
    }

    println!("Monkey {} - type :quit to exit", monkey::VERSION);
    let stdin = io::stdin();
    repl(stdin.lock(), io::stdout().lock(), &options)
}
