//! The `basalt` CLI: banner/version/help/info/run/repl (spec.md §6.1),
//! wired on top of the pure [`basalt`] library crate.
//!
//! Grounded on `rhai-cli`'s `clap`-derive `Parser`/`Subcommand` shape and
//! `tracing-subscriber` setup (`rhai-cli/src/args.rs`, `src/bin/rhai.rs`),
//! resolved against `basalt.py:1430-1544`'s `main` for the exact flag set,
//! banner ASCII art, and help/info text this crate's users already expect.

use std::io::Write as _;

use clap::Parser;
use colored::Colorize;

use basalt::{report_error, run_line, run_source, seed_globals, Environment, Interpreter, NativeHost};

const VERSION: &str = "1.1.0";
const BUILD: &str = "2026-01-27";

const BANNER: &str = r"
 /$$$$$$$                                /$$   /$$
| $$__  $$                              | $$  | $$
| $$  \ $$  /$$$$$$   /$$$$$$$  /$$$$$$ | $$ /$$$$$$
| $$$$$$$  |____  $$ /$$_____/ |____  $$| $$|_  $$_/
| $$__  $$  /$$$$$$$|  $$$$$$   /$$$$$$$| $$  | $$
| $$  \ $$ /$$__  $$ \____  $$ /$$__  $$| $$  | $$ /$$
| $$$$$$$/|  $$$$$$$ /$$$$$$$/|  $$$$$$$| $$  |  $$$$/
|_______/  \_______/|_______/  \_______/|__/   \___/
";

const HELP_TEXT: &str = "Basalt Syntax:
  fn name() { }                         Define a function
  let [var] = [val]                     Declare an immutable variable
  let mut [var] = [val]                 Declare a mutable variable
  let undef [var]                       Declare a null variable (mutable)
  print(\"text\"), println(\"text\")        String/Number printing
  printf(\"[var]\")                       Formatted string printing
  list [op]([args])                     List operations (get, add, remove, len, pop)
  dict [op]([args])                     Dict operations (get, set, delete)
  file [op]([args])                     File operations (read, write, append)
  [loop] [condition] { }                Start a loop (repeat, while, foreach)
Good To Know:
  [] vs ()          You can use both [] and () when defining or calling a user-defined function,
                    but you can only use () when calling a pre-defined function (e.g. print()).
  Mutable?          Only 'mut' and 'undef' variables are mutable (let [mut/undef] [var] = [val]).
                    Variables with only 'let' before their names are immutable.
  mut()/immut()     The mut() keyword makes a variable mutable, while immut() makes a variable
                    immutable. Use when you can't figure out why your variable is immutable.
  Interpolation     printf(\"Val: [x]\") only works with [brackets], not {braces}.
  Case-Sensitivity  Basalt is case sensitive, e.g. 'Let' is not the same as 'let'.";

/// The Basalt scripting language interpreter.
#[derive(Parser)]
#[command(name = "basalt", version = VERSION, about = "Interpret Basalt scripts")]
struct Cli {
    /// Show engine info instead of running anything.
    #[arg(short = 'i', long = "info", conflicts_with_all = ["run", "repl"])]
    info: bool,
    /// Run the interactive REPL instead of a file.
    #[arg(short = 'e', long = "repl", conflicts_with = "run")]
    repl: bool,
    /// A `.basalt` file to interpret.
    #[arg(short = 'r', long = "run", value_name = "FILE")]
    run: Option<std::path::PathBuf>,
    /// Arguments forwarded to the script as `argv`/`argc`.
    #[arg(trailing_var_arg = true)]
    script_args: Vec<String>,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if cli.info {
        print_info();
        return;
    }
    if cli.repl {
        run_repl();
        return;
    }
    match cli.run {
        Some(path) => run_file(&path, &cli.script_args),
        None => print_banner(),
    }
}

fn print_banner() {
    println!("{}", BANNER.cyan());
    println!("Basalt Language v{VERSION}");
    println!("Build: {BUILD}");
    println!("Usage: basalt [-flag/--flag] [file.basalt]");
    println!("{HELP_TEXT}");
}

fn print_info() {
    println!("Basalt Engine Information:");
    println!("  Version: {VERSION}");
    println!("  Build: {BUILD}");
    println!("  Interpreter written in: Rust");
    println!("  Developed by: BasaltDev");
}

fn run_file(path: &std::path::Path, script_args: &[String]) {
    let source = match std::fs::read_to_string(path) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("{}", format!("Error: could not read '{}': {e}", path.display()).red());
            std::process::exit(1);
        }
    };

    let mut args = vec![path.display().to_string()];
    args.extend(script_args.iter().cloned());

    let host = NativeHost;
    match run_source(&source, &host, &args) {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            report_error(&err);
            std::process::exit(1);
        }
    }
}

fn run_repl() {
    println!("{}", BANNER.cyan());
    println!("Basalt REPL (Build {BUILD})");

    let host = NativeHost;
    let mut env = Environment::new();
    seed_globals(&mut env, &[]);
    let mut interpreter = Interpreter::new(&host);

    loop {
        print!("> ");
        let _ = std::io::stdout().flush();
        let mut line = String::new();
        if std::io::stdin().read_line(&mut line).unwrap_or(0) == 0 {
            break;
        }
        match run_line(&mut interpreter, &mut env, &line) {
            Ok(basalt::Flow::Exit(code)) => std::process::exit(code),
            Ok(_) => {}
            Err(err) => report_error(&err),
        }
        println!();
    }
}
