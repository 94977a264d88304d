#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line crime dashboard for UK postcodes.
//!
//! `police_postcode report <POSTCODE>` prints the dashboard as text (or
//! JSON with `--json`), `police_postcode serve` starts the HTTP API, and
//! running with no subcommand prompts for a postcode.
//!
//! Uses `indicatif-log-bridge` (via [`police_postcode_cli_utils::init_logger`])
//! so log lines and the spinner never fight for the terminal.

mod render;

use clap::{Parser, Subcommand};
use dialoguer::Input;
use police_postcode_cli_utils::MultiProgress;
use police_postcode_dashboard::build_dashboard;
use police_postcode_geocoder::PostcodeResolver;
use police_postcode_server::{AppState, ServerConfig};
use police_postcode_source::CrimeSource;

#[derive(Parser)]
#[command(name = "police_postcode", about = "Police-recorded crime near a UK postcode")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the crime dashboard for a postcode
    Report {
        /// UK postcode (e.g., "SW1A 1AA"); passed to the geocoder as-is
        postcode: String,
        /// Print the dashboard as JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Start the dashboard HTTP API (`BIND_ADDR` / `PORT`)
    Serve,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let multi = police_postcode_cli_utils::init_logger();
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Report { postcode, json }) => report(&multi, &postcode, json).await,
        Some(Commands::Serve) => {
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(police_postcode_server::run_server(
                    AppState::from_env(),
                    ServerConfig::from_env(),
                ))
            })
            .await??;
            Ok(())
        }
        None => {
            let postcode: String = Input::new()
                .with_prompt("Enter a UK postcode")
                .interact_text()?;

            report(&multi, &postcode, false).await
        }
    }
}

/// What one report run produced.
#[derive(Debug)]
enum ReportOutput {
    /// The rendered report, for stdout.
    Rendered(String),
    /// The user message for a postcode that does not resolve or has no
    /// recorded crimes, for stderr.
    NotFound(String),
}

/// Runs one dashboard pass and prints it.
///
/// A postcode that does not resolve, or resolves to a place with no
/// recorded crimes, prints the user message and exits with status 1.
async fn report(
    multi: &MultiProgress,
    postcode: &str,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let state = AppState::from_env();

    let spinner = police_postcode_cli_utils::spinner(
        multi,
        &format!("Fetching crimes near {}...", postcode.to_uppercase()),
    );
    let output = render_report(state.resolver.as_ref(), state.source.as_ref(), postcode, json).await;
    spinner.finish_and_clear();

    match output? {
        ReportOutput::Rendered(out) => {
            print!("{out}");
            Ok(())
        }
        ReportOutput::NotFound(message) => {
            eprintln!("{message}");
            std::process::exit(1);
        }
    }
}

/// Builds the dashboard for `postcode` and renders it as text or JSON.
///
/// # Errors
///
/// Returns an error if an upstream service fails or rendering fails.
async fn render_report(
    resolver: &dyn PostcodeResolver,
    source: &dyn CrimeSource,
    postcode: &str,
    json: bool,
) -> Result<ReportOutput, Box<dyn std::error::Error>> {
    let dashboard = match build_dashboard(resolver, source, postcode).await {
        Ok(dashboard) => dashboard,
        Err(e) if e.is_not_found() => return Ok(ReportOutput::NotFound(e.to_string())),
        Err(e) => return Err(e.into()),
    };

    let out = if json {
        let mut out = serde_json::to_string_pretty(&dashboard)?;
        out.push('\n');
        out
    } else {
        let mut out = String::new();
        render::render_text(&dashboard, &mut out)?;
        out
    };

    Ok(ReportOutput::Rendered(out))
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;
    use police_postcode_crime_models::{CrimeRecord, CrimeTable, Location};
    use police_postcode_geocoder::GeocodeError;
    use police_postcode_source::SourceError;

    use super::*;

    struct FixedResolver(Option<Location>);

    #[async_trait]
    impl PostcodeResolver for FixedResolver {
        async fn resolve(&self, _postcode: &str) -> Result<Location, GeocodeError> {
            self.0.ok_or(GeocodeError::Status { status: 404 })
        }
    }

    struct FixedSource(Result<Vec<CrimeRecord>, u16>);

    #[async_trait]
    impl CrimeSource for FixedSource {
        fn id(&self) -> &str {
            "fixed"
        }

        async fn fetch(&self, _location: Location) -> Result<CrimeTable, SourceError> {
            match &self.0 {
                Ok(records) => Ok(CrimeTable::new(records.clone())),
                Err(status) => Err(SourceError::Status { status: *status }),
            }
        }
    }

    fn record(id: &str, category: &str) -> CrimeRecord {
        CrimeRecord {
            id: id.to_string(),
            category: category.to_string(),
            month: "2024-02".parse().unwrap(),
            category_code: "under-investigation".to_string(),
            category_name: "Under investigation".to_string(),
            longitude: -1.13,
            latitude: 52.63,
            location_type: Some("Force".to_string()),
            location_subtype: None,
        }
    }

    fn leicester() -> FixedResolver {
        FixedResolver(Some(Location::new(52.63, -1.13)))
    }

    #[tokio::test]
    async fn json_output_is_the_dashboard() {
        let source = FixedSource(Ok(vec![record("1", "drugs"), record("2", "shoplifting")]));

        let output = render_report(&leicester(), &source, "le1 5ww", true)
            .await
            .unwrap();

        let ReportOutput::Rendered(out) = output else {
            panic!("expected rendered output, got {output:?}");
        };
        let json: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(json["postcode"], "le1 5ww");
        assert_eq!(json["totalCrimes"], 2);
        assert_eq!(json["records"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn text_output_has_a_single_heading() {
        let source = FixedSource(Ok(vec![record("1", "drugs")]));

        let output = render_report(&leicester(), &source, "LE1 5WW", false)
            .await
            .unwrap();

        let ReportOutput::Rendered(out) = output else {
            panic!("expected rendered output, got {output:?}");
        };
        assert_eq!(out.matches("Crime by Postcode").count(), 1);
        assert!(out.contains("Total Crimes 1"));
    }

    #[tokio::test]
    async fn unresolved_postcode_is_not_found() {
        let source = FixedSource(Ok(vec![record("1", "drugs")]));

        let output = render_report(&FixedResolver(None), &source, "NOPE", false)
            .await
            .unwrap();

        assert!(matches!(
            output,
            ReportOutput::NotFound(ref message)
                if message == "Invalid postcode or unable to retrieve location information."
        ));
    }

    #[tokio::test]
    async fn empty_result_is_not_found() {
        let output = render_report(&leicester(), &FixedSource(Ok(Vec::new())), "le1 5ww", true)
            .await
            .unwrap();

        assert!(matches!(
            output,
            ReportOutput::NotFound(ref message) if message == "No crimes recorded near LE1 5WW."
        ));
    }

    #[tokio::test]
    async fn upstream_failure_is_an_error() {
        let result = render_report(&leicester(), &FixedSource(Err(503)), "le1 5ww", false).await;
        assert!(result.is_err());
    }
}
