//! Extension validator CLI entrypoint.
//!
//! Validates a package on disk with the same pipeline the upload service
//! runs, so authors can check an extension before submitting it.

mod cli;

use camino::Utf8PathBuf;
use clap::Parser;
use cli::Cli;
use extension_validator::archive::intake::UploadedPackage;
use extension_validator::config::{ConfigError, ValidatorConfig};
use extension_validator::error::ExtensionError;
use extension_validator::validator::ExtensionValidator;
use log::debug;
use std::fs::File;
use std::io::{BufReader, Write};

/// Exit status for an accepted package.
const EXIT_ACCEPTED: i32 = 0;
/// Exit status for a rejected package.
const EXIT_REJECTED: i32 = 1;
/// Exit status when the package or configuration could not be read.
const EXIT_FAILED: i32 = 2;

/// Errors that stop the CLI.
#[derive(Debug, thiserror::Error)]
enum CliError {
    /// The package was rejected by the validator.
    #[error(transparent)]
    Rejected(#[from] ExtensionError),

    /// The configuration file could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The package file could not be opened.
    #[error("failed to open package {path}: {source}")]
    Open {
        path: Utf8PathBuf,
        #[source]
        source: std::io::Error,
    },
}

type Result<T> = std::result::Result<T, CliError>;

fn main() {
    let cli = Cli::parse();
    init_logging(&cli);
    let mut stdout = std::io::stdout();
    let mut stderr = std::io::stderr();
    let run_result = run(&cli, &mut stdout);
    let exit_code = exit_code_for_run_result(run_result, cli.json, &mut stderr);
    if exit_code != EXIT_ACCEPTED {
        std::process::exit(exit_code);
    }
}

fn init_logging(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(cli.log_level()).parse_default_env();
    if builder.try_init().is_err() {
        // A logger is already installed.
    }
}

fn run(cli: &Cli, stdout: &mut dyn Write) -> Result<()> {
    let config = match &cli.config {
        Some(path) => ValidatorConfig::load(path)?,
        None => ValidatorConfig::default(),
    };
    let messages = config.message_table();
    let validator = ExtensionValidator::new(&config, &messages);

    let file = File::open(&cli.package).map_err(|source| CliError::Open {
        path: cli.package.clone(),
        source,
    })?;
    let mut upload = UploadedPackage::new(
        BufReader::new(file),
        cli.content_type.as_str(),
        cli.package_name(),
    );
    debug!("validating {}", cli.package);
    validator.validate(&mut upload)?;

    if !cli.quiet {
        write_line(stdout, format!("accepted: {}", cli.package_name()));
    }
    Ok(())
}

fn exit_code_for_run_result(result: Result<()>, json: bool, stderr: &mut dyn Write) -> i32 {
    match result {
        Ok(()) => EXIT_ACCEPTED,
        Err(CliError::Rejected(error)) => {
            write_line(stderr, rejection_report(&error, json));
            EXIT_REJECTED
        }
        Err(err) => {
            write_line(stderr, format!("error: {err}"));
            EXIT_FAILED
        }
    }
}

/// Render a rejection as plain text or as the `{key, message}` payload.
fn rejection_report(error: &ExtensionError, json: bool) -> String {
    if json {
        serde_json::json!({
            "key": error.key(),
            "message": error.message(),
        })
        .to_string()
    } else {
        match error.key() {
            Some(key) => format!("rejected: {key}: {}", error.message()),
            None => format!("rejected: {}", error.message()),
        }
    }
}

fn write_line(out: &mut dyn Write, message: impl std::fmt::Display) {
    if writeln!(out, "{message}").is_err() {
        // Best-effort output; ignore write failures.
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use extension_validator::error::{ErrorKey, ValidationError};
    use rstest::{fixture, rstest};
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::write::{SimpleFileOptions, ZipWriter};

    const VALID_MANIFEST: &str = r#"{"name": "My Extension", "version": "1.0"}"#;

    struct Workspace {
        dir: TempDir,
    }

    impl Workspace {
        fn path(&self, name: &str) -> Utf8PathBuf {
            Utf8PathBuf::from_path_buf(self.dir.path().join(name)).expect("UTF-8 temp path")
        }

        fn write_package(&self, name: &str, manifest: &str) -> Utf8PathBuf {
            let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
            writer
                .start_file("manifest.json", SimpleFileOptions::default())
                .expect("start manifest");
            writer
                .write_all(manifest.as_bytes())
                .expect("write manifest");
            let bytes = writer.finish().expect("finish archive").into_inner();
            let path = self.path(name);
            std::fs::write(&path, bytes).expect("write package");
            path
        }
    }

    #[fixture]
    fn workspace() -> Workspace {
        Workspace {
            dir: TempDir::new().expect("temp dir"),
        }
    }

    fn cli_for(path: &Utf8PathBuf, extra: &[&str]) -> Cli {
        let mut args = vec!["extension-validator"];
        args.extend_from_slice(extra);
        args.push(path.as_str());
        Cli::try_parse_from(args).expect("arguments should parse")
    }

    #[rstest]
    fn accepted_package_is_reported(workspace: Workspace) {
        let package = workspace.write_package("ext.zip", VALID_MANIFEST);
        let mut stdout = Vec::new();

        let result = run(&cli_for(&package, &[]), &mut stdout);

        assert!(result.is_ok());
        assert_eq!(String::from_utf8(stdout).expect("UTF-8"), "accepted: ext.zip\n");
    }

    #[rstest]
    fn quiet_suppresses_the_acceptance_line(workspace: Workspace) {
        let package = workspace.write_package("ext.zip", VALID_MANIFEST);
        let mut stdout = Vec::new();

        let result = run(&cli_for(&package, &["--quiet"]), &mut stdout);

        assert!(result.is_ok());
        assert!(stdout.is_empty());
    }

    #[rstest]
    fn rejected_package_exits_with_one(workspace: Workspace) {
        let package = workspace.write_package("ext.zip", r#"{"version": "1.0"}"#);
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let result = run(&cli_for(&package, &[]), &mut stdout);
        let exit_code = exit_code_for_run_result(result, false, &mut stderr);

        assert_eq!(exit_code, EXIT_REJECTED);
        let text = String::from_utf8(stderr).expect("UTF-8");
        assert!(text.starts_with("rejected: NAME_MISSING: "));
    }

    #[rstest]
    fn declared_content_type_is_honoured(workspace: Workspace) {
        let package = workspace.write_package("ext.zip", VALID_MANIFEST);
        let mut stdout = Vec::new();

        let result = run(&cli_for(&package, &["--content-type", "text/plain"]), &mut stdout);

        let Err(CliError::Rejected(error)) = result else {
            panic!("expected a rejection");
        };
        assert_eq!(error.key(), Some(ErrorKey::BadContentType));
    }

    #[rstest]
    fn config_overrides_messages(workspace: Workspace) {
        let package = workspace.write_package("ext.zip", r#"{"version": "1.0"}"#);
        let config = workspace.path("validator.toml");
        std::fs::write(&config, "[messages]\nNAME_MISSING = \"Nom manquant.\"\n")
            .expect("write config");
        let mut stdout = Vec::new();

        let result = run(&cli_for(&package, &["--config", config.as_str()]), &mut stdout);

        let Err(CliError::Rejected(error)) = result else {
            panic!("expected a rejection");
        };
        assert_eq!(error.message(), "Nom manquant.");
    }

    #[rstest]
    fn missing_package_is_an_operational_failure(workspace: Workspace) {
        let package = workspace.path("absent.zip");
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let result = run(&cli_for(&package, &[]), &mut stdout);
        let exit_code = exit_code_for_run_result(result, false, &mut stderr);

        assert_eq!(exit_code, EXIT_FAILED);
        let text = String::from_utf8(stderr).expect("UTF-8");
        assert!(text.contains("failed to open package"));
    }

    #[rstest]
    fn invalid_config_is_an_operational_failure(workspace: Workspace) {
        let package = workspace.write_package("ext.zip", VALID_MANIFEST);
        let config = workspace.path("validator.toml");
        std::fs::write(&config, "[archive]\nunknown = 1\n").expect("write config");
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let result = run(&cli_for(&package, &["--config", config.as_str()]), &mut stdout);
        let exit_code = exit_code_for_run_result(result, false, &mut stderr);

        assert_eq!(exit_code, EXIT_FAILED);
    }

    #[test]
    fn success_writes_nothing_to_stderr() {
        let mut stderr = Vec::new();
        assert_eq!(exit_code_for_run_result(Ok(()), false, &mut stderr), EXIT_ACCEPTED);
        assert!(stderr.is_empty());
    }

    #[test]
    fn json_report_carries_key_and_message() {
        let error = ExtensionError::from(ValidationError::new(ErrorKey::VersionInvalid, "bad"));

        let report = rejection_report(&error, true);

        let payload: serde_json::Value = serde_json::from_str(&report).expect("JSON report");
        assert_eq!(payload, serde_json::json!({"key": "VERSION_INVALID", "message": "bad"}));
    }

    #[rstest]
    fn json_report_for_unsafe_archive_has_null_key(workspace: Workspace) {
        let package = workspace.path("not-a-zip.zip");
        std::fs::write(&package, b"definitely not a zip").expect("write package");
        let mut stdout = Vec::new();
        let mut stderr = Vec::new();

        let result = run(&cli_for(&package, &[]), &mut stdout);
        let exit_code = exit_code_for_run_result(result, true, &mut stderr);

        assert_eq!(exit_code, EXIT_REJECTED);
        let payload: serde_json::Value =
            serde_json::from_slice(&stderr).expect("JSON report");
        assert_eq!(payload.get("key"), Some(&serde_json::Value::Null));
    }
}
