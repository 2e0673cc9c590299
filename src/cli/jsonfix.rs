use std::path::PathBuf;

use crate::{
    error,
    jsonfix::{self, JsonFixer},
    success, warning,
};

/// Options of the `jsonfix` command.
#[derive(Debug, Clone)]
pub struct JsonFixArgs {
    pub file: PathBuf,
    pub output: Option<PathBuf>,
    pub in_place: bool,
    pub check: bool,
    pub pretty: bool,
    pub indent: usize,
    pub verbose: bool,
    pub quiet: bool,
}

/// Repairs a JSON file and writes the result to stdout, a file or in place.
///
/// With `check` nothing is written and the process exits with 0 when the
/// (repaired) content is valid, 1 otherwise.
pub async fn jsonfix(args: JsonFixArgs) {
    if !args.file.exists() {
        error!("File not found: {}", args.file.display());
    }

    let bytes = match async_fs::read(&args.file).await {
        Ok(bytes) => bytes,
        Err(e) => error!("Error reading file: {}", e),
    };
    let content = jsonfix::decode_text(&bytes);

    let mut fixer = JsonFixer::new(args.verbose);
    let report = fixer.fix_and_validate(&content);

    if !args.quiet {
        if report.valid {
            success!("{}", report.message);
        } else {
            warning!("{}", report.message);
        }

        if !fixer.fixes_applied().is_empty() && !args.verbose {
            eprintln!("  Fixes applied:");
            for fix in fixer.fixes_applied() {
                eprintln!("    - {}", fix);
            }
        }
    }

    if args.check {
        std::process::exit(if report.valid { 0 } else { 1 });
    }

    if !report.valid {
        warning!("JSON may not be fully valid");
    }

    let mut fixed = report.content;
    if args.pretty && report.valid {
        if let Ok(formatted) = jsonfix::pretty(&fixed, args.indent) {
            fixed = formatted;
        }
    }

    if args.in_place {
        if let Err(e) = async_fs::write(&args.file, &fixed).await {
            error!("Error writing file: {}", e);
        }
        if !args.quiet {
            eprintln!("File modified: {}", args.file.display());
        }
    } else if let Some(output) = &args.output {
        if let Err(e) = async_fs::write(output, &fixed).await {
            error!("Error writing file: {}", e);
        }
        if !args.quiet {
            eprintln!("Saved to: {}", output.display());
        }
    } else {
        println!("{}", fixed);
    }
}
