//! Convert every fixture in test/yml/ and compare against test/json/.
//!
//! Run with `cargo run --example check_fixtures`.

use libyj::{convert_file, Options, Output};
use std::fs;
use std::path::Path;
use std::process;

fn main() {
    let test_dir = Path::new(env!("CARGO_MANIFEST_DIR"))
        .parent()
        .map(|root| root.join("test"))
        .unwrap_or_else(|| Path::new("test").to_path_buf());

    let mut sources: Vec<_> = match fs::read_dir(test_dir.join("yml")) {
        Ok(entries) => entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| path.extension().map(|e| e == "yml").unwrap_or(false))
            .collect(),
        Err(e) => {
            eprintln!("Error reading {}: {}", test_dir.display(), e);
            process::exit(1);
        }
    };
    sources.sort();

    let options = Options::default();
    let mut passed = 0;
    let mut total = 0;

    for path in &sources {
        total += 1;
        print!(":: Testing {}... ", path.display());

        let basename = path.file_stem().unwrap_or_default().to_string_lossy();
        let expected_path = test_dir.join("json").join(format!("{}.json", basename));
        let expected = match fs::read_to_string(&expected_path) {
            Ok(s) => s,
            Err(e) => {
                println!("failed.");
                println!("Error reading {}: {}", expected_path.display(), e);
                continue;
            }
        };

        let result = match convert_file(path, &options) {
            Ok(Output::Json(json)) => json,
            Ok(Output::Value(_)) => String::new(),
            Err(e) => {
                println!("failed.");
                println!("{}", e);
                continue;
            }
        };

        if result == expected.trim_end() {
            println!("passed.");
            passed += 1;
        } else {
            println!("failed.");
            println!("-- EXPECTED --");
            println!("{}", expected.trim_end());
            println!("-- RESULT --");
            println!("{}", result);
        }
    }

    println!(":: Passed {}/{}.", passed, total);
    if passed != total {
        process::exit(1);
    }
}
