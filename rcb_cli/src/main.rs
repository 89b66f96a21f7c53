//! # RCB CLI Application
//!
//! Runs one JSON calculation request through `rcb_core` and prints the
//! result as JSON on stdout.
//!
//! ```text
//! rcb_cli <request.json> [--code <design_code.json>]
//! ```
//!
//! Logging goes to stderr and is controlled by `RUST_LOG`
//! (default `warn`).

use std::path::PathBuf;
use std::process::ExitCode;

use rcb_core::{load_design_code, load_request, CalcError, CalcResult, CalculationOutput, DesignCode};
use tracing_subscriber::{fmt, EnvFilter};

const USAGE: &str = "Usage: rcb_cli <request.json> [--code <design_code.json>]";

/// Command-line arguments.
#[derive(Debug)]
struct Args {
    request: PathBuf,
    code: Option<PathBuf>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut request = None;
    let mut code = None;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--code" => {
                let path = args.next().ok_or("--code needs a file path")?;
                code = Some(PathBuf::from(path));
            }
            "-h" | "--help" => return Err(String::new()),
            _ if arg.starts_with('-') => return Err(format!("unknown option '{}'", arg)),
            _ if request.is_none() => request = Some(PathBuf::from(arg)),
            _ => return Err(format!("unexpected argument '{}'", arg)),
        }
    }

    let request = request.ok_or("missing request file")?;
    Ok(Args { request, code })
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    fmt().with_env_filter(filter).with_writer(std::io::stderr).init();
}

fn run(args: &Args) -> CalcResult<CalculationOutput> {
    let code = match &args.code {
        Some(path) => load_design_code(path)?,
        None => DesignCode::nscp_2015(),
    };
    let request = load_request(&args.request)?;
    tracing::info!(calc_type = request.calc_type(), label = request.label(), code = %code.name, "request loaded");

    let output = request.run(&code)?;

    eprintln!("{} [{}]", request.calc_type(), request.label());
    eprintln!("  {}", output.message());
    if let Some(phi_mn) = output.phi_mn_knm() {
        eprintln!("  φMn = {:.2} kN·m", phi_mn);
    }
    Ok(output)
}

fn report_error(err: &CalcError) {
    eprintln!("Error [{}]: {}", err.error_code(), err);
    if let Ok(json) = serde_json::to_string_pretty(err) {
        eprintln!("{}", json);
    }
}

fn main() -> ExitCode {
    let args = match parse_args(std::env::args().skip(1)) {
        Ok(args) => args,
        Err(reason) => {
            if !reason.is_empty() {
                eprintln!("Error: {}", reason);
            }
            eprintln!("{}", USAGE);
            return ExitCode::from(2);
        }
    };

    init_logging();

    match run(&args) {
        Ok(output) => match serde_json::to_string_pretty(&output) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                report_error(&CalcError::SerializationError { reason: e.to_string() });
                ExitCode::FAILURE
            }
        },
        Err(err) => {
            report_error(&err);
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> impl Iterator<Item = String> {
        list.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn test_parse_request_only() {
        let parsed = parse_args(args(&["beam.json"])).unwrap();
        assert_eq!(parsed.request, PathBuf::from("beam.json"));
        assert!(parsed.code.is_none());
    }

    #[test]
    fn test_parse_code_override() {
        let parsed = parse_args(args(&["--code", "aci.json", "beam.json"])).unwrap();
        assert_eq!(parsed.code, Some(PathBuf::from("aci.json")));
        assert_eq!(parsed.request, PathBuf::from("beam.json"));
    }

    #[test]
    fn test_parse_errors() {
        assert!(parse_args(args(&[])).is_err());
        assert!(parse_args(args(&["--code"])).is_err());
        assert!(parse_args(args(&["a.json", "b.json"])).is_err());
        assert!(parse_args(args(&["--verbose", "a.json"])).is_err());
        assert_eq!(parse_args(args(&["--help"])).unwrap_err(), "");
    }
}
