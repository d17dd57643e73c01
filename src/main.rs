use clap::{ArgAction, Parser, ValueEnum};
use std::ffi::OsString;
use std::path::PathBuf;
use volume_similarity::config::MetricsConfig;
use volume_similarity::logging::{init_logging, LoggingConfig};
use volume_similarity::{emit, run, HeaderStyle, OutputFormat, ReportConfig, RunConfig};

/// Compute similarity metrics between two coregistered NIfTI volumes.
///
/// Reports Pearson cross-correlation (CC), structural similarity (SSIM),
/// mean squared error (MSE), normalized cross-correlation (NCC) and
/// normalized mutual information (NMI), optionally inside a mask.
#[derive(Parser, Debug)]
#[command(name = "volsim")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    volsim -ses2_file sub-01_ses-02_T2w.nii.gz -ses1reg_file sub-01_ses-01_T2w_reg.nii.gz \\
           -acquisition T2w -method SCT_rigid -mask_file sc_mask.nii.gz -o intersession_t2w.csv")]
struct Cli {
    /// Session 2 NIfTI file (fixed image)
    #[arg(long = "ses2_file", visible_alias = "ses2-file", value_name = "PATH")]
    ses2_file: PathBuf,

    /// Registered session 1 NIfTI file
    #[arg(long = "ses1reg_file", visible_alias = "ses1reg-file", value_name = "PATH")]
    ses1reg_file: PathBuf,

    /// Acquisition type (e.g. T1w, T2w)
    #[arg(long)]
    acquisition: String,

    /// Registration method used (e.g. SCT_rigid, ANTS_syn)
    #[arg(long)]
    method: String,

    /// Binary mask NIfTI file with the same shape as both volumes
    #[arg(long = "mask_file", visible_alias = "mask-file", value_name = "PATH")]
    mask_file: Option<PathBuf>,

    /// Output file; the record is printed when omitted
    #[arg(short = 'o', long = "output_csv", visible_alias = "output-csv", value_name = "PATH")]
    output_csv: Option<PathBuf>,

    /// Output file format
    #[arg(long, value_enum, default_value = "csv")]
    format: FormatArg,

    /// Use column names that spell out each metric
    #[arg(long)]
    descriptive_headers: bool,

    /// Metric settings file (TOML or JSON)
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Directory for JSON log files
    #[arg(long, value_name = "DIR")]
    log_dir: Option<PathBuf>,

    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,

    /// Only log errors
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum FormatArg {
    Csv,
    Json,
}

impl From<FormatArg> for OutputFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Csv => OutputFormat::Csv,
            FormatArg::Json => OutputFormat::Json,
        }
    }
}

/// Multi-character flags that are also accepted with a single dash.
const SINGLE_DASH_FLAGS: [&str; 6] = [
    "ses2_file",
    "ses1reg_file",
    "acquisition",
    "method",
    "mask_file",
    "output_csv",
];

/// Rewrite `-ses2_file x` and `-ses2_file=x` into their `--` form.
fn normalize_single_dash_flags<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    args.into_iter()
        .map(|arg| {
            let rewritten = arg.to_str().and_then(|text| {
                let name = text.strip_prefix('-')?;
                if name.starts_with('-') {
                    return None;
                }
                let flag = name.split('=').next().unwrap_or(name);
                SINGLE_DASH_FLAGS
                    .contains(&flag)
                    .then(|| OsString::from(format!("-{}", text)))
            });
            rewritten.unwrap_or(arg)
        })
        .collect()
}

impl Cli {
    fn into_run_config(self) -> anyhow::Result<RunConfig> {
        let metrics = match &self.config {
            Some(path) => MetricsConfig::load_from_file(path)?,
            None => MetricsConfig::default(),
        };

        let header_style = if self.descriptive_headers {
            HeaderStyle::Descriptive
        } else {
            HeaderStyle::Short
        };

        Ok(RunConfig {
            ses2_file: self.ses2_file,
            ses1reg_file: self.ses1reg_file,
            acquisition: self.acquisition,
            method: self.method,
            mask_file: self.mask_file,
            output_csv: self.output_csv,
            metrics,
            report: ReportConfig {
                format: self.format.into(),
                header_style,
            },
        })
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_from(normalize_single_dash_flags(std::env::args_os()));

    let logging = LoggingConfig::from_verbosity(cli.verbose, cli.quiet)
        .with_log_directory(cli.log_dir.clone());
    let _guard = init_logging(&logging)?;

    let config = cli.into_run_config()?;
    let record = run(&config)?;
    emit(&record, &config)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(list: &[&str]) -> Vec<OsString> {
        list.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_single_dash_flags_are_rewritten() {
        let normalized = normalize_single_dash_flags(args(&[
            "volsim",
            "-ses2_file",
            "a.nii",
            "-ses1reg_file=b.nii",
            "-o",
            "out.csv",
            "-vv",
            "--method",
            "ANTS_syn",
        ]));
        assert_eq!(
            normalized,
            args(&[
                "volsim",
                "--ses2_file",
                "a.nii",
                "--ses1reg_file=b.nii",
                "-o",
                "out.csv",
                "-vv",
                "--method",
                "ANTS_syn",
            ])
        );
    }

    #[test]
    fn test_cli_parses_single_dash_spelling() {
        let cli = Cli::parse_from(normalize_single_dash_flags(args(&[
            "volsim",
            "-ses2_file",
            "ses2.nii.gz",
            "-ses1reg_file",
            "ses1_reg.nii.gz",
            "-acquisition",
            "T2w",
            "-method",
            "SCT_rigid",
            "-mask_file",
            "mask.nii.gz",
        ])));
        let config = cli.into_run_config().unwrap();
        assert_eq!(config.acquisition, "T2w");
        assert_eq!(config.mask_file, Some(PathBuf::from("mask.nii.gz")));
        assert!(config.output_csv.is_none());
        assert_eq!(config.report.format, OutputFormat::Csv);
    }

    #[test]
    fn test_missing_required_flag_fails() {
        let result = Cli::try_parse_from(args(&["volsim", "--ses2_file", "a.nii"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_definition_is_consistent() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
