// Command-line interface for Oxipatch.
//
// Thin wrapper over the BPS core: explicit subcommands, diagnostics on
// stderr with an `oxipatch:` prefix, data on stdout. Exit code 0 means
// the requested operation succeeded in full.

use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use clap::{ArgAction, Args, Parser, Subcommand};

use crate::bps;
use crate::detect::{self, PatchKind};

// ---------------------------------------------------------------------------
// Clap CLI definition
// ---------------------------------------------------------------------------

/// BPS binary patch validator and applier.
#[derive(Parser, Debug)]
#[command(
    name = "oxipatch",
    version,
    about = "BPS patch validator and applier",
    arg_required_else_help = true
)]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Force overwrite existing output files.
    #[arg(short = 'f', long, global = true)]
    force: bool,

    /// Quiet mode (suppress non-error output).
    #[arg(short = 'q', long, global = true, conflicts_with = "verbose")]
    quiet: bool,

    /// Verbose mode (use multiple times for more detail).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    /// Check that a patch is structurally valid.
    Validate(ValidateArgs),
    /// Print patch header fields and stored checksums.
    Info(InfoArgs),
    /// Apply a patch to a source file.
    Apply(ApplyArgs),
}

#[derive(Args, Debug)]
struct ValidateArgs {
    /// Patch file.
    patch: PathBuf,
}

#[derive(Args, Debug)]
struct InfoArgs {
    /// Patch file.
    patch: PathBuf,

    /// Print the fields as a JSON object.
    #[arg(long)]
    json: bool,
}

#[derive(Args, Debug)]
struct ApplyArgs {
    /// Source file the patch was built against.
    source: PathBuf,

    /// Patch file.
    patch: PathBuf,

    /// Output file (stdout if omitted).
    output: Option<PathBuf>,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Read a patch file, rejecting recognizable non-BPS containers with a
/// clearer message than the magic check would give.
fn read_patch(path: &Path) -> Result<Vec<u8>, String> {
    let data = std::fs::read(path).map_err(|e| format!("{}: {e}", path.display()))?;
    match detect::identify(&data) {
        Some(PatchKind::Bps) | None => Ok(data),
        Some(PatchKind::Ips) => Err(format!(
            "{}: IPS patch detected; only BPS patches are supported",
            path.display()
        )),
    }
}

// ---------------------------------------------------------------------------
// Subcommands
// ---------------------------------------------------------------------------

fn cmd_validate(args: &ValidateArgs, quiet: bool) -> i32 {
    let patch = match read_patch(&args.patch) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("oxipatch: {e}");
            return 1;
        }
    };
    match bps::validate_patch(&patch) {
        Ok(()) => {
            if !quiet {
                println!("{}: ok", args.patch.display());
            }
            0
        }
        Err(e) => {
            eprintln!("oxipatch: {}: {e}", args.patch.display());
            1
        }
    }
}

fn cmd_info(args: &InfoArgs, verbose: u8) -> i32 {
    let patch = match read_patch(&args.patch) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("oxipatch: {e}");
            return 1;
        }
    };
    let info = match bps::patch_info(&patch) {
        Ok(info) => info,
        Err(e) => {
            eprintln!("oxipatch: {}: {e}", args.patch.display());
            return 1;
        }
    };

    if args.json {
        let value = serde_json::json!({
            "source_size": info.source_size,
            "target_size": info.target_size,
            "metadata_size": info.metadata.len(),
            "metadata": String::from_utf8_lossy(&info.metadata),
            "source_checksum": info.source_checksum,
            "target_checksum": info.target_checksum,
        });
        println!("{value}");
        return 0;
    }

    println!("source size:     {} bytes", info.source_size);
    println!("target size:     {} bytes", info.target_size);
    if info.metadata.is_empty() {
        println!("metadata:        (empty)");
    } else {
        println!("metadata:        {} bytes", info.metadata.len());
        if verbose > 0 {
            println!("{}", String::from_utf8_lossy(&info.metadata));
        }
    }
    println!("source checksum: {:#010x}", info.source_checksum);
    println!("target checksum: {:#010x}", info.target_checksum);
    0
}

fn cmd_apply(args: &ApplyArgs, force: bool, quiet: bool) -> i32 {
    if let Some(ref path) = args.output {
        if path.exists() && !force {
            eprintln!(
                "oxipatch: output file exists, use -f to overwrite: {}",
                path.display()
            );
            return 1;
        }
    }

    let source = match std::fs::read(&args.source) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("oxipatch: {}: {e}", args.source.display());
            return 1;
        }
    };
    let patch = match read_patch(&args.patch) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("oxipatch: {e}");
            return 1;
        }
    };

    let output = match bps::apply_patch(&source, &patch) {
        Ok(output) => output,
        Err(e) => {
            eprintln!("oxipatch: {}: {e}", args.patch.display());
            return 1;
        }
    };

    if let Some(ref path) = args.output {
        if let Err(e) = std::fs::write(path, &output) {
            eprintln!("oxipatch: {}: {e}", path.display());
            return 1;
        }
        if !quiet {
            eprintln!(
                "oxipatch: wrote {} ({} bytes from {} source bytes)",
                path.display(),
                output.len(),
                source.len()
            );
        }
    } else {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        if let Err(e) = out.write_all(&output) {
            eprintln!("oxipatch: write: {e}");
            return 1;
        }
    }

    0
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Main CLI entry point. Parses arguments via clap, dispatches commands.
pub fn run() -> ! {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format_timestamp(None)
        .format_target(false)
        .init();

    let cli = Cli::parse();

    let exit_code = match cli.command {
        Cmd::Validate(ref args) => cmd_validate(args, cli.quiet),
        Cmd::Info(ref args) => cmd_info(args, cli.verbose),
        Cmd::Apply(ref args) => cmd_apply(args, cli.force, cli.quiet),
    };

    process::exit(exit_code);
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
