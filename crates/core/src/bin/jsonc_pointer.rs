//! `jsonc-pointer` — look up a JSON Pointer in a JSONC document.
//!
//! Usage:
//!   jsonc-pointer '<pointer>'
//!
//! The document is read from stdin; comments and trailing commas are fine.
//! Prints the value at the pointer and its line/column span, or
//! `undefined` when the location holds no value.

use json_lens_core::Instance;
use std::io::{self, Read};

fn main() {
    let args: Vec<String> = std::env::args().collect();
    let pointer = match args.get(1) {
        Some(p) => p.clone(),
        None => {
            eprintln!("First argument must be a JSON Pointer.");
            std::process::exit(1);
        }
    };

    let mut buf = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut buf) {
        eprintln!("{e}");
        std::process::exit(1);
    }

    let root = Instance::parse(buf);
    let instance = match root.get(&format!("#{pointer}")) {
        Ok(instance) => instance,
        Err(e) => {
            eprintln!("{e}");
            std::process::exit(1);
        }
    };

    match instance.value() {
        Some(value) => {
            println!("{value}");
            if let (Some(start), Some(end)) = (instance.start_position(), instance.end_position()) {
                println!(
                    "{}:{}..{}:{}",
                    start.line + 1,
                    start.character + 1,
                    end.line + 1,
                    end.character + 1
                );
            }
        }
        None => {
            println!("undefined");
            std::process::exit(2);
        }
    }
}
