//! IMP driver binary.
//!
//! Runs the bundled sample programs against stdin, executes IR trees
//! from their JSON-serialized form, and dumps the samples in that form.
//! Data goes to stdout, diagnostics to stderr; exit codes distinguish
//! runtime errors (1), usage errors (2), and I/O failures (3).

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use imp_cli::programs::{calculator, hello_world, mergesort, Language};
use imp_core::ir::Ir;
use imp_interp::{run_with, Options};

/// IMP interpreter and sample programs.
#[derive(Parser)]
#[command(name = "imp", about = "IMP interpreter and sample programs")]
struct Cli {
    /// Abort after this many evaluation steps.
    #[arg(long, global = true)]
    max_steps: Option<u64>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Evaluate one `<int> <op> <int>` expression from stdin.
    Calculator,
    /// Greet the name given on stdin.
    HelloWorld {
        /// Greeting language: english, francais, or chinese.
        #[arg(short, long, default_value = "english")]
        language: String,
    },
    /// Sort a comma-separated integer list from stdin.
    Mergesort,
    /// Run an IR tree stored as JSON against stdin.
    Run {
        /// Path to the serialized program.
        #[arg(short, long)]
        program: PathBuf,
    },
    /// Print a sample program's IR as JSON.
    Dump {
        /// One of: calculator, hello-world, mergesort.
        program: String,
    },
}

fn main() {
    let cli = Cli::parse();
    let opts = Options {
        max_steps: cli.max_steps,
        ..Options::default()
    };
    process::exit(dispatch(cli.command, &opts));
}

fn dispatch(command: Commands, opts: &Options) -> i32 {
    match command {
        Commands::Calculator => run_program(&calculator(), opts),
        Commands::HelloWorld { language } => match parse_language(&language) {
            Some(lang) => run_program(&hello_world(lang), opts),
            None => {
                eprintln!(
                    "error: unknown language '{}', expected english/francais/chinese",
                    language
                );
                2
            }
        },
        Commands::Mergesort => run_program(&mergesort(), opts),
        Commands::Run { program } => {
            let json = match std::fs::read_to_string(&program) {
                Ok(s) => s,
                Err(e) => {
                    eprintln!("error: failed to read {}: {}", program.display(), e);
                    return 3;
                }
            };
            let ir: Ir = match serde_json::from_str(&json) {
                Ok(ir) => ir,
                Err(e) => {
                    eprintln!("error: {} is not a serialized program: {}", program.display(), e);
                    return 2;
                }
            };
            run_program(&ir, opts)
        }
        Commands::Dump { program } => {
            let ir = match program.as_str() {
                "calculator" => calculator(),
                "hello-world" => hello_world(Language::English),
                "mergesort" => mergesort(),
                other => {
                    eprintln!(
                        "error: unknown program '{}', expected calculator/hello-world/mergesort",
                        other
                    );
                    return 2;
                }
            };
            match serde_json::to_string_pretty(&ir) {
                Ok(json) => {
                    println!("{}", json);
                    0
                }
                Err(e) => {
                    eprintln!("error: failed to serialize program: {}", e);
                    1
                }
            }
        }
    }
}

fn parse_language(s: &str) -> Option<Language> {
    match s.to_ascii_lowercase().as_str() {
        "english" => Some(Language::English),
        "francais" | "français" => Some(Language::Francais),
        "chinese" | "zhongwen" => Some(Language::Chinese),
        _ => None,
    }
}

/// Reads all of stdin, runs the program, and writes its output.
fn run_program(program: &Ir, opts: &Options) -> i32 {
    let mut input = String::new();
    if let Err(e) = std::io::stdin().read_to_string(&mut input) {
        eprintln!("error: failed to read stdin: {}", e);
        return 3;
    }
    match run_with(program, &input, opts) {
        Ok(output) => {
            print!("{}", output);
            0
        }
        Err(e) => {
            eprintln!("error: {}", e);
            1
        }
    }
}
