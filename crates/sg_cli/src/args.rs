// crates/sg_cli/src/args.rs
//
// Offline CLI argument surface: raw flags, validation, and merging with an
// optional run manifest into a `RunPlan`.
//
// Rules:
// - Exactly one input source: --input FILE  XOR  --manifest FILE
// - No networked paths (reject any scheme:// on every path flag)
// - Flags override manifest values; unset everything falls back to defaults
//   (5 groups, both strategies, branch files on, Roll/Name/Email, out = ".")

use std::path::{Path, PathBuf};

use clap::{ArgAction, Parser, ValueEnum};
use sg_core::{FieldMap, GroupCount, Strategy};
use sg_io::{looks_like_url_strict, manifest, IoError};
use sg_pipeline::RunConfig;

/// Output root when neither flag nor manifest names one.
pub const DEFAULT_OUT: &str = ".";

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StrategyArg {
    #[value(alias = "branchwise")]
    RoundRobin,
    #[value(alias = "uniform")]
    SizeBalanced,
    Both,
}

impl StrategyArg {
    pub fn strategies(self) -> Vec<Strategy> {
        match self {
            StrategyArg::RoundRobin => vec![Strategy::RoundRobin],
            StrategyArg::SizeBalanced => vec![Strategy::SizeBalanced],
            StrategyArg::Both => Strategy::ALL.to_vec(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub enum RenderFormat {
    /// Human summary on stdout.
    Text,
    /// `report.json` under the output root.
    Json,
}

/// Parsed CLI arguments (raw).
#[derive(Debug, Parser, Clone)]
#[command(
    name = "sg",
    version,
    disable_help_subcommand = true,
    about = "Split a student roster into balanced groups (branch-wise and uniform)"
)]
pub struct Args {
    // --- Input ---
    /// Student table (CSV with a header row).
    #[arg(long, conflicts_with = "manifest")]
    pub input: Option<PathBuf>,
    /// Run manifest JSON (input path, groups, options); flags override its values.
    #[arg(long)]
    pub manifest: Option<PathBuf>,

    // --- Allocation ---
    /// Number of groups (integer from 2 to 20). Default: 5.
    #[arg(long, value_parser = parse_groups)]
    pub groups: Option<GroupCount>,
    /// Strategy to run. Default: both.
    #[arg(long, value_enum)]
    pub strategy: Option<StrategyArg>,

    // --- Columns ---
    /// Identifier column (category is read from characters 5-6). Default: Roll.
    #[arg(long)]
    pub id_column: Option<String>,
    /// Name column, used to order members. Default: Name.
    #[arg(long)]
    pub name_column: Option<String>,
    /// Contact column, passed through. Default: Email.
    #[arg(long)]
    pub contact_column: Option<String>,

    // --- Output & rendering ---
    /// Output root directory. Default: current directory.
    #[arg(long)]
    pub out: Option<PathBuf>,
    /// Skip the per-category member files.
    #[arg(long)]
    pub no_branch_files: bool,
    /// Report format(s); repeat for several. Default: text unless --quiet.
    #[arg(long, value_enum)]
    pub render: Vec<RenderFormat>,

    // --- Control ---
    /// Load and check the input only; write nothing.
    #[arg(long)]
    pub validate_only: bool,
    /// Errors only; no summary.
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    pub quiet: bool,
    /// More logging (-v info, -vv debug, -vvv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

/// Errors surfaced by argument validation and manifest merging.
#[derive(Debug)]
pub enum CliError {
    Missing(&'static str),
    NonLocalPath(String),
    NotFound(String),
    BadValue(String),
    Manifest(IoError),
}

impl std::fmt::Display for CliError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use CliError::*;
        match self {
            Missing(s) => write!(f, "missing required flag: {s}"),
            NonLocalPath(p) => write!(f, "path must be local (no scheme): {p}"),
            NotFound(p) => write!(f, "file not found: {p}"),
            BadValue(s) => write!(f, "invalid value: {s}"),
            Manifest(e) => write!(f, "manifest: {e}"),
        }
    }
}
impl std::error::Error for CliError {}

/// Group count parser for clap.
pub fn parse_groups(s: &str) -> Result<GroupCount, String> {
    s.parse::<GroupCount>().map_err(|e| e.to_string())
}

/// Everything `main` needs, after defaults and manifest values are merged.
#[derive(Debug, Clone)]
pub struct RunPlan {
    pub input: PathBuf,
    pub cfg: RunConfig,
    pub render: Vec<RenderFormat>,
    pub validate_only: bool,
    pub quiet: bool,
}

#[inline]
fn ensure_local_path(p: &Path) -> Result<(), CliError> {
    if let Some(s) = p.to_str() {
        if looks_like_url_strict(s) {
            return Err(CliError::NonLocalPath(s.to_string()));
        }
    }
    Ok(())
}

fn ensure_local_file(p: &Path, label: &'static str) -> Result<(), CliError> {
    ensure_local_path(p)?;
    match std::fs::metadata(p) {
        Ok(m) if m.is_file() => Ok(()),
        _ => Err(CliError::NotFound(format!("{label} {}", p.display()))),
    }
}

fn non_empty(label: &str, v: &Option<String>) -> Result<(), CliError> {
    match v {
        Some(s) if s.trim().is_empty() => Err(CliError::BadValue(format!("{label} must not be empty"))),
        _ => Ok(()),
    }
}

/// Entry point used by main.rs.
pub fn parse_and_validate() -> Result<Args, CliError> {
    validate(Args::parse())
}

/// Mode and path checks on already-parsed flags.
pub fn validate(args: Args) -> Result<Args, CliError> {
    for p in [args.input.as_deref(), args.manifest.as_deref(), args.out.as_deref()]
        .into_iter()
        .flatten()
    {
        ensure_local_path(p)?;
    }

    match (&args.input, &args.manifest) {
        (Some(i), None) => ensure_local_file(i, "--input")?,
        (None, Some(m)) => ensure_local_file(m, "--manifest")?,
        _ => return Err(CliError::Missing("--input or --manifest")),
    }

    non_empty("--id-column", &args.id_column)?;
    non_empty("--name-column", &args.name_column)?;
    non_empty("--contact-column", &args.contact_column)?;
    Ok(args)
}

/// Merge manifest (if any), defaults and flags.
pub fn resolve_plan(args: &Args) -> Result<RunPlan, CliError> {
    let (input, mut cfg) = match (&args.manifest, &args.input) {
        (Some(mp), _) => {
            let man = manifest::load_manifest(mp).map_err(CliError::Manifest)?;
            let r = manifest::resolve_paths(mp, &man).map_err(CliError::Manifest)?;
            let out = r.out_dir.unwrap_or_else(|| PathBuf::from(DEFAULT_OUT));
            let mut cfg = RunConfig::new(r.groups, out);
            cfg.strategies = r.strategies;
            cfg.emit_branch_files = r.emit_branch_files;
            cfg.columns = r.columns;
            (r.input_path, cfg)
        }
        (None, Some(i)) => (i.clone(), RunConfig::new(GroupCount::default(), DEFAULT_OUT)),
        (None, None) => return Err(CliError::Missing("--input or --manifest")),
    };

    if let Some(g) = args.groups {
        cfg.groups = g;
    }
    if let Some(o) = &args.out {
        cfg.out_dir = o.clone();
    }
    if let Some(s) = args.strategy {
        cfg.strategies = s.strategies();
    }
    apply_columns(&mut cfg.columns, args);
    if args.no_branch_files {
        cfg.emit_branch_files = false;
    }

    let mut render = args.render.clone();
    render.sort();
    render.dedup();
    if render.is_empty() && !args.quiet {
        render.push(RenderFormat::Text);
    }

    Ok(RunPlan { input, cfg, render, validate_only: args.validate_only, quiet: args.quiet })
}

fn apply_columns(cols: &mut FieldMap, args: &Args) {
    if let Some(c) = &args.id_column {
        cols.id = c.clone();
    }
    if let Some(c) = &args.name_column {
        cols.name = c.clone();
    }
    if let Some(c) = &args.contact_column {
        cols.contact = c.clone();
    }
}
