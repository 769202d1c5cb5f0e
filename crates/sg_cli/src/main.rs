// crates/sg_cli/src/main.rs
//
// Exit codes, typed error mapping, the validate-only short-circuit and the
// full run path (load → allocate → emit → run record → optional reports).

mod args;
mod logging;

mod exitcodes {
    pub const OK: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const IO: i32 = 4;
}

use std::process::ExitCode;

use args::{parse_and_validate as parse_cli, resolve_plan, CliError, RenderFormat, RunPlan};
use sg_io::IoError;
use sg_pipeline::{load_roster, run_with_roster, PipelineError, PipelineOutputs, Roster};
use sg_report::{build_model, render_text, ReportError, ReportModel};
use tracing::{debug, info};

/// File name of the JSON report under the output root.
const REPORT_JSON_FILE: &str = "report.json";

/// Central error type for CLI → exit-code mapping.
#[derive(Debug)]
enum MainError {
    /// Bad flags, bad manifest, missing column, bad identifier or category, bad group count
    Validation(String),
    /// Read/write/path/limit failures
    Io(String),
}

impl std::fmt::Display for MainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MainError::Validation(m) | MainError::Io(m) => f.write_str(m),
        }
    }
}

fn main() -> ExitCode {
    let rc = match parse_cli() {
        Ok(args) => {
            logging::init_logging(args.verbose, args.quiet);
            match resolve_plan(&args).map_err(map_cli_err).and_then(|plan| execute(&plan)) {
                Ok(()) => exitcodes::OK,
                Err(e) => report_failure(&e),
            }
        }
        Err(e) => report_failure(&map_cli_err(e)),
    };
    ExitCode::from(rc as u8)
}

fn execute(plan: &RunPlan) -> Result<(), MainError> {
    if plan.validate_only {
        validate_only(plan)
    } else {
        run_once(plan)
    }
}

fn report_failure(e: &MainError) -> i32 {
    eprintln!("sg: error: {e}");
    let rc = map_error(e);
    debug!(rc, "exiting with failure");
    rc
}

fn map_error(e: &MainError) -> i32 {
    match e {
        MainError::Validation(_) => exitcodes::VALIDATION,
        MainError::Io(_) => exitcodes::IO,
    }
}

fn map_io_err(e: IoError) -> MainError {
    match e {
        IoError::Csv(_) | IoError::Json(_) | IoError::Manifest(_) => MainError::Validation(e.to_string()),
        IoError::Path(_) | IoError::Limit(_) => MainError::Io(e.to_string()),
    }
}

fn map_cli_err(e: CliError) -> MainError {
    match e {
        CliError::Manifest(io) => map_io_err(io),
        CliError::NotFound(_) => MainError::Io(e.to_string()),
        CliError::Missing(_) | CliError::NonLocalPath(_) | CliError::BadValue(_) => {
            MainError::Validation(e.to_string())
        }
    }
}

fn map_pipeline_err(e: PipelineError) -> MainError {
    use PipelineError::*;
    match e {
        Io(io) => map_io_err(io),
        Emit(_) => MainError::Io(e.to_string()),
        MissingField(_)
        | MalformedIdentifier { .. }
        | UnusableCategory { .. }
        | CategoryCaseClash { .. }
        | InvalidGroupCount(_)
        | Config(_) => {
            MainError::Validation(e.to_string())
        }
    }
}

fn map_report_err(e: ReportError) -> MainError {
    match e {
        ReportError::Inconsistent(_) => MainError::Validation(e.to_string()),
        ReportError::Render(_) => MainError::Io(e.to_string()),
    }
}

/// Load and normalize only; print the dataset summary. Writes nothing.
fn validate_only(plan: &RunPlan) -> Result<(), MainError> {
    let roster = load_roster(&plan.input, &plan.cfg.columns).map_err(map_pipeline_err)?;
    info!(records = roster.len(), "validate-only: input OK");
    if plan.render.contains(&RenderFormat::Text) {
        let model = build_model(&roster, &[], None).map_err(map_report_err)?;
        print!("{}", render_text(&model));
    }
    if !plan.quiet {
        eprintln!("validate-only: {} records OK", roster.len());
    }
    Ok(())
}

fn run_once(plan: &RunPlan) -> Result<(), MainError> {
    let roster = load_roster(&plan.input, &plan.cfg.columns).map_err(map_pipeline_err)?;
    let outs = run_with_roster(&roster, &plan.cfg).map_err(map_pipeline_err)?;

    maybe_render_reports(plan, &roster, &outs)?;

    if !plan.quiet {
        eprintln!(
            "run: {} files written to {}",
            outs.written.len(),
            plan.cfg.out_dir.display()
        );
    }
    Ok(())
}

fn maybe_render_reports(plan: &RunPlan, roster: &Roster, outs: &PipelineOutputs) -> Result<(), MainError> {
    if plan.render.is_empty() {
        return Ok(());
    }
    let model = build_model(roster, &outs.runs, Some(&outs.run_record)).map_err(map_report_err)?;
    for fmt in &plan.render {
        match fmt {
            RenderFormat::Text => print!("{}", render_text(&model)),
            RenderFormat::Json => render_json_report(&model, plan)?,
        }
    }
    Ok(())
}

// Always accept the concrete model type; gate body by feature.
fn render_json_report(model: &ReportModel, plan: &RunPlan) -> Result<(), MainError> {
    #[cfg(feature = "report-json")]
    {
        let body = sg_report::render_json(model).map_err(map_report_err)?;
        let path = plan.cfg.out_dir.join(REPORT_JSON_FILE);
        sg_io::writer::write_atomic(&path, body.as_bytes())
            .map_err(|e| MainError::Io(format!("write {}: {e}", path.display())))?;
        info!(path = %path.display(), "json report written");
        Ok(())
    }
    #[cfg(not(feature = "report-json"))]
    {
        let _ = (model, plan, REPORT_JSON_FILE);
        Err(MainError::Validation(
            "json renderer not enabled (build with feature `report-json`)".into(),
        ))
    }
}
