//! CLI argument definitions for the extension validator.

use camino::Utf8PathBuf;
use clap::Parser;
use extension_validator::archive::intake::EXPECTED_CONTENT_TYPE;
use log::LevelFilter;

/// Validate an extension package before uploading it.
#[derive(Parser, Debug, Clone)]
#[command(name = "extension-validator")]
#[command(version, about)]
#[command(long_about = concat!(
    "Validate an extension package before uploading it.\n\n",
    "The package must be a zip archive with a manifest.json at its root. ",
    "The archive is checked for unsafe entries, the manifest is decoded, and ",
    "the name, description, author, version, and icons fields are validated. ",
    "The first problem found is reported.",
))]
#[command(after_help = concat!(
    "EXIT STATUS:\n",
    "  0  the package was accepted\n",
    "  1  the package was rejected\n",
    "  2  the package or configuration could not be read\n\n",
    "EXAMPLES:\n",
    "  Validate a package:\n",
    "    $ extension-validator my-extension.zip\n\n",
    "  Print the rejection as JSON:\n",
    "    $ extension-validator --json my-extension.zip\n\n",
    "  Apply local limits and messages:\n",
    "    $ extension-validator --config validator.toml my-extension.zip",
))]
pub struct Cli {
    /// Path to the package to validate.
    #[arg(value_name = "PACKAGE")]
    pub package: Utf8PathBuf,

    /// Content type to declare for the upload.
    #[arg(long, value_name = "MIME", default_value = EXPECTED_CONTENT_TYPE)]
    pub content_type: String,

    /// TOML file with archive limits and message overrides.
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<Utf8PathBuf>,

    /// Print rejections as a JSON `{key, message}` payload.
    #[arg(long)]
    pub json: bool,

    /// Increase log verbosity (repeatable: -v, -vv).
    #[arg(
        short,
        long = "verbose",
        action = clap::ArgAction::Count,
        conflicts_with = "quiet"
    )]
    pub verbosity: u8,

    /// Suppress progress output (rejections are still shown).
    #[arg(short, long, conflicts_with = "verbosity")]
    pub quiet: bool,
}

impl Cli {
    /// Return the default log filter implied by the verbosity flags.
    #[must_use]
    pub const fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbosity {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    /// Return the filename reported for the package.
    #[must_use]
    pub fn package_name(&self) -> &str {
        self.package.file_name().unwrap_or(self.package.as_str())
    }
}
