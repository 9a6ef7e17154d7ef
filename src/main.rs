use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};
use clap::Parser;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use minisql::{
    backend::{Backend, MemoryBackend, QueryResults},
    parse,
    sql::ast::Statement,
};

/// Interactive shell over an in-memory database.
#[derive(Parser)]
#[command(name = "minisql", version, about)]
struct Cli {
    /// Log parser diagnostics and backend activity.
    #[arg(short, long)]
    verbose: bool,

    /// Run one batch of statements and exit.
    #[arg(short, long)]
    command: Option<String>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).context("install log subscriber")?;

    let mut backend = MemoryBackend::new();

    if let Some(command) = cli.command {
        return execute(&mut backend, &command);
    }

    println!("Welcome to minisql.");
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();
    loop {
        print!("# ");
        io::stdout().flush()?;

        let Some(line) = lines.next() else {
            break;
        };
        let line = line.context("read input")?;
        let line = line.trim_end_matches(['\r', '\n']);

        if let Err(err) = execute(&mut backend, line) {
            println!("error: {err:#}");
        }
    }

    Ok(())
}

fn execute(backend: &mut MemoryBackend, source: &str) -> Result<()> {
    let ast = parse(source)?;
    for statement in ast.statements {
        match statement {
            Statement::CreateTable(create) => {
                backend.create_table(create)?;
                println!("ok");
            }
            Statement::Insert(insert) => {
                backend.insert(insert)?;
                println!("ok");
            }
            Statement::Select(select) => {
                let results = backend.select(select)?;
                print_results(&results);
                println!("ok");
            }
        }
    }
    Ok(())
}

fn print_results(results: &QueryResults) {
    for column in &results.columns {
        print!("| {} ", column.name);
    }
    println!("|");
    println!("{}", "=".repeat(20));

    for row in &results.rows {
        print!("|");
        for (cell, column) in row.iter().zip(&results.columns) {
            print!(" {} |", cell.render(column.column_type));
        }
        println!();
    }
}
