//! dim - dimensional-analysis calculator, command line entry point.
//!
//! With no arguments the program runs a REPL when stdin is a terminal and
//! otherwise evaluates stdin line by line. Runtime errors from individual
//! expressions go to stderr and do not affect the exit code; only argument
//! misuse exits with 64 (EX_USAGE).

use anyhow::Context;
use dim_expr::Engine;
use std::fs;
use std::io::{self, BufRead, IsTerminal, Write};
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

const EX_USAGE: u8 = 64;

const USAGE: &str = "\
Usage: dim [EXPR]
       dim --file <PATH> | -f <PATH>
       dim -
       dim --help | -h

With no arguments, starts a REPL (or reads stdin when piped).
One expression per line; `list`, `show NAME`, `clear NAME` and
`clear all` manage session constants.";

fn main() -> ExitCode {
    init_logging();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match run(&args) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("dim: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: &[String]) -> anyhow::Result<ExitCode> {
    let mut engine = Engine::new();

    match args {
        [] => {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                tracing::debug!("starting interactive session");
                repl(&mut engine)?;
            } else {
                eval_stream(&mut engine, stdin.lock())?;
            }
            Ok(ExitCode::SUCCESS)
        }
        [flag] if flag == "--help" || flag == "-h" => {
            println!("{USAGE}");
            Ok(ExitCode::SUCCESS)
        }
        [dash] if dash == "-" => {
            eval_stream(&mut engine, io::stdin().lock())?;
            Ok(ExitCode::SUCCESS)
        }
        [flag, path] if flag == "--file" || flag == "-f" => {
            let source = fs::read_to_string(path)
                .with_context(|| format!("failed to read '{path}'"))?;
            for line in source.lines() {
                eval_line(&mut engine, line);
            }
            Ok(ExitCode::SUCCESS)
        }
        [flag, ..] if flag.starts_with('-') && flag != "-" => {
            eprintln!("dim: unrecognized option '{flag}'\n{USAGE}");
            Ok(ExitCode::from(EX_USAGE))
        }
        rest => {
            // Shell word-splitting is transparent: `dim 2 m + 3 m` is the
            // same expression as `dim '2 m + 3 m'`.
            let expr = rest.join(" ");
            eval_line(&mut engine, &expr);
            Ok(ExitCode::SUCCESS)
        }
    }
}

fn repl(engine: &mut Engine) -> anyhow::Result<()> {
    let stdin = io::stdin();
    let mut stdout = io::stdout();
    let mut line = String::new();

    loop {
        stdout.write_all(b"> ").context("failed to write prompt")?;
        stdout.flush().context("failed to flush prompt")?;

        line.clear();
        let read = stdin
            .lock()
            .read_line(&mut line)
            .context("failed to read input")?;
        if read == 0 {
            break; // EOF
        }
        eval_line(engine, &line);
    }
    Ok(())
}

fn eval_stream(engine: &mut Engine, reader: impl BufRead) -> anyhow::Result<()> {
    for line in reader.lines() {
        let line = line.context("failed to read input")?;
        eval_line(engine, &line);
    }
    Ok(())
}

fn eval_line(engine: &mut Engine, line: &str) {
    let line = line.trim();
    if line.is_empty() {
        return;
    }
    match engine.eval(line) {
        Ok(output) => {
            if !output.is_empty() {
                println!("{output}");
            }
        }
        Err(err) => eprintln!("{}", err.report()),
    }
}

fn init_logging() {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "dim=warn".into()))
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_writer(io::stderr),
        )
        .init();
}
