//! Command-line tool converting YAML-subset documents to JSON.
//!
//! Usage: yj [OPTIONS] [FILE]
//!
//! Options:
//!   -i, --indent <N>    JSON indent width [default: 4]
//!   --tree              Print the value tree instead of JSON
//!   -h, --help          Print help
//!   -V, --version       Print version

use libyj::{convert, convert_file, Options, Output, ParseError};
use std::io::{self, Read};
use std::process;

fn main() {
    let args: Vec<String> = std::env::args().collect();

    let mut options = Options::default();
    let mut input_path: Option<&str> = None;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return;
            }
            "-V" | "--version" => {
                println!("yj {}", env!("CARGO_PKG_VERSION"));
                return;
            }
            "-i" | "--indent" => {
                i += 1;
                if i >= args.len() {
                    eprintln!("Error: --indent requires a number");
                    process::exit(1);
                }
                options.indent = match args[i].parse() {
                    Ok(n) => n,
                    Err(_) => {
                        eprintln!("Error: Invalid indent width: {}", args[i]);
                        process::exit(1);
                    }
                };
            }
            "--tree" => {
                options.json = false;
            }
            "-" => {
                // input_path stays None, which means stdin
            }
            arg if arg.starts_with('-') => {
                eprintln!("Error: Unknown option: {}", arg);
                process::exit(1);
            }
            _ => {
                if input_path.is_some() {
                    eprintln!("Error: Multiple input paths not supported");
                    process::exit(1);
                }
                input_path = Some(&args[i]);
            }
        }
        i += 1;
    }

    let result = match input_path {
        Some(path) => convert_file(path, &options),
        None => {
            let mut buffer = String::new();
            if let Err(e) = io::stdin().read_to_string(&mut buffer) {
                eprintln!("Error reading stdin: {}", e);
                process::exit(1);
            }
            convert(&buffer, &options)
        }
    };

    match result {
        Ok(Output::Json(json)) => println!("{}", json),
        Ok(Output::Value(value)) => println!("{:#?}", value),
        Err(e @ ParseError::Io { .. }) => {
            eprintln!("{}", e);
            process::exit(1);
        }
        Err(e) => {
            if let Some(path) = input_path {
                eprintln!("{}: {}", path, e);
            } else {
                eprintln!("Parse error: {}", e);
            }
            process::exit(1);
        }
    }
}

fn print_help() {
    println!(
        "yj - convert a YAML subset to JSON

USAGE:
    yj [OPTIONS] [FILE]

ARGS:
    [FILE]    Input file (reads from stdin if not provided or -)

OPTIONS:
    -i, --indent <N>    JSON indent width [default: 4]

    --tree              Print the parsed value tree instead of JSON

    -h, --help          Print help

    -V, --version       Print version

EXAMPLES:
    # Convert a document to JSON
    yj config.yml

    # Convert with two-space indentation
    yj -i 2 config.yml

    # Inspect the value tree
    cat config.yml | yj --tree
"
    );
}
