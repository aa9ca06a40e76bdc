//! ECHO-7 diagnostic terminal.
//!
//! Interactive text frontend for the echo-core investigation engine. Reads
//! commands from stdin and writes plain text to stdout, so it works equally
//! well interactively and piped.

mod commands;
mod repl;

use std::path::PathBuf;
use std::process::ExitCode;

const DEFAULT_SAVE_DIR: &str = "saves";

#[tokio::main]
async fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().skip(1).collect();

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_usage();
        return ExitCode::SUCCESS;
    }

    let save_dir = match parse_save_dir(&args) {
        Ok(dir) => dir,
        Err(msg) => {
            eprintln!("{msg}");
            print_usage();
            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = repl::run(save_dir).await {
        eprintln!("[ERROR] Terminal failure: {err}");
        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

fn parse_save_dir(args: &[String]) -> Result<PathBuf, String> {
    let mut save_dir = PathBuf::from(DEFAULT_SAVE_DIR);
    let mut iter = args.iter();

    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--save-dir" => {
                let value = iter
                    .next()
                    .ok_or_else(|| "--save-dir requires a path".to_string())?;
                save_dir = PathBuf::from(value);
            }
            other => return Err(format!("Unknown argument: '{other}'")),
        }
    }

    Ok(save_dir)
}

fn print_usage() {
    println!("echo-protocol - ECHO-7 memory investigation terminal");
    println!();
    println!("Usage: echo-protocol [OPTIONS]");
    println!();
    println!("Options:");
    println!("  --save-dir <path>   Directory for save files (default: {DEFAULT_SAVE_DIR})");
    println!("  -h, --help          Show this help");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_save_dir() {
        let dir = parse_save_dir(&[]).unwrap();
        assert_eq!(dir, PathBuf::from("saves"));
    }

    #[test]
    fn test_custom_save_dir() {
        let args = vec!["--save-dir".to_string(), "/tmp/echo".to_string()];
        assert_eq!(parse_save_dir(&args).unwrap(), PathBuf::from("/tmp/echo"));
    }

    #[test]
    fn test_unknown_argument_rejected() {
        let args = vec!["--verbose".to_string()];
        assert!(parse_save_dir(&args).is_err());
    }

    #[test]
    fn test_missing_save_dir_value_rejected() {
        let args = vec!["--save-dir".to_string()];
        assert!(parse_save_dir(&args).is_err());
    }
}
