//! Parse manifest file(s) and print the canonical form.
//!
//! Usage:
//!   mnfs_dump FILE.mnfs [FILE.mnfs ...]
//!   mnfs_dump < file.mnfs
//!
//! Non-fatal warnings (non-incremental bundle ids) go to stderr; any parse
//! error is reported per file and the exit status is 1.

use std::io::Read;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let mut has_error = false;

    if args.is_empty() {
        let mut source = String::new();
        std::io::stdin().read_to_string(&mut source)?;
        match mnfs::parse(&source) {
            Ok(manifest) => print!("{manifest}"),
            Err(e) => {
                eprintln!("<stdin>: {e}");
                has_error = true;
            }
        }
    } else {
        let mut first = true;
        for path in &args {
            match mnfs::parse_file(path) {
                Ok(manifest) => {
                    if !first {
                        println!();
                    }
                    print!("{manifest}");
                    first = false;
                }
                Err(e) => {
                    eprintln!("{path}: {e}");
                    has_error = true;
                }
            }
        }
    }

    if has_error {
        std::process::exit(1);
    }
    Ok(())
}
