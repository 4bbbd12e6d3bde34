//! Quill interpreter CLI
//!
//! Runs `.quill` scripts, or drops into a REPL when no script is given.

use std::io::{self, BufRead, Write};
use std::process::ExitCode;

use quill_eval::{Console, Interpreter, Value};

const PRELUDE: &str = include_str!("../prelude.quill");

fn main() -> ExitCode {
    init_tracing();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut scripts = Vec::new();
    let mut with_prelude = true;

    for arg in &args {
        match arg.as_str() {
            "--no-prelude" => with_prelude = false,
            "--help" | "-h" => {
                print_usage();
                return ExitCode::SUCCESS;
            }
            other if other.starts_with('-') => {
                eprintln!("error: unknown option `{other}`");
                print_usage();
                return ExitCode::FAILURE;
            }
            path => scripts.push(path.to_string()),
        }
    }

    let mut builder = Interpreter::builder().console(Console::stdout());
    if with_prelude {
        builder = builder.prelude(PRELUDE);
    }
    let interp = match builder.build() {
        Ok(interp) => interp,
        Err(msg) => {
            eprintln!("error: {msg}");
            return ExitCode::FAILURE;
        }
    };

    if scripts.is_empty() {
        repl(&interp)
    } else {
        run_scripts(&interp, &scripts)
    }
}

fn run_scripts(interp: &Interpreter, scripts: &[String]) -> ExitCode {
    let mut status = ExitCode::SUCCESS;
    for path in scripts {
        let result = interp.run_file(path);
        if result.is_err() {
            println!("{result}");
            status = ExitCode::FAILURE;
        }
    }
    status
}

fn repl(interp: &Interpreter) -> ExitCode {
    println!("Quill Version {}", env!("CARGO_PKG_VERSION"));
    println!("`exit` or Ctrl+C to exit\n");

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("quill> ");
        if io::stdout().flush().is_err() {
            return ExitCode::FAILURE;
        }
        let Some(line) = lines.next() else {
            println!();
            return ExitCode::SUCCESS;
        };
        let line = match line {
            Ok(line) => line,
            Err(err) => {
                eprintln!("error: {err}");
                return ExitCode::FAILURE;
            }
        };
        if line.trim().is_empty() {
            continue;
        }

        let result = interp.eval_line(&line);
        match result {
            Value::Unit => {}
            Value::Exit => {
                println!("{result}");
                return ExitCode::SUCCESS;
            }
            other => println!("{other}"),
        }
    }
}

fn print_usage() {
    println!("Usage: quill [options] [script.quill ...]");
    println!();
    println!("With no scripts, starts an interactive session.");
    println!();
    println!("Options:");
    println!("  --no-prelude    Skip the bundled standard prelude");
    println!("  -h, --help      Show this help");
    println!();
    println!("Environment:");
    println!("  QUILL_LOG       Tracing filter (e.g. quill_eval=trace)");
}

/// Enable with `QUILL_LOG=quill_eval=debug` or similar.
fn init_tracing() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    if let Ok(filter) = EnvFilter::try_from_env("QUILL_LOG") {
        tracing_subscriber::registry()
            .with(fmt::layer().with_target(true).with_level(true).with_writer(io::stderr))
            .with(filter)
            .init();
    }
}
