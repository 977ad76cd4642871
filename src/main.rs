use clap::{Parser, Subcommand};
use handball_prep::{config, convert, output, photos};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use thiserror::Error;

#[derive(Parser)]
#[command(name = "handball-prep")]
#[command(about = "Prepare data files for the handball stats web app")]
#[command(long_about = "\
Prepare data files for the handball stats web app

Both commands read from and write to the working root (default: current
directory) and fully regenerate their outputs on every run.

Working root layout:

  ./
  ├── handball.toml                # Optional overrides (see gen-config)
  ├── Events.csv                   # Stats export            → data
  ├── data.js                      # Generated by `data`
  ├── photos-index.js              # Generated by `photos`
  └── Effectifs/                   # One directory per team  → photos
      ├── Seniors/
      │   ├── index.json           # Generated by `photos`
      │   ├── 07-lea.jpg
      │   └── staff/coach.png
      └── Juniors/

Exit codes: 0 success, 1 unexpected failure or usage error, 2 input missing,
3 no valid rows.")]
#[command(version)]
struct Cli {
    /// Working root holding the export, the photo directory, and the outputs
    #[arg(long, default_value = ".", global = true)]
    root: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert Events.csv into data.js, dropping blank and duplicate rows
    Data,
    /// Write index.json per team and photos-index.js from Effectifs/
    Photos,
    /// Print a stock handball.toml with all options documented
    GenConfig,
}

#[derive(Error, Debug)]
enum CliError {
    #[error(transparent)]
    Config(#[from] config::ConfigError),
    #[error(transparent)]
    Convert(#[from] convert::ConvertError),
    #[error(transparent)]
    Photos(#[from] photos::PhotosError),
}

impl CliError {
    fn exit_code(&self) -> u8 {
        match self {
            CliError::Convert(convert::ConvertError::SourceNotFound(_))
            | CliError::Photos(photos::PhotosError::RootNotFound(_)) => 2,
            CliError::Convert(convert::ConvertError::NoRows(_)) => 3,
            _ => 1,
        }
    }

    /// Extra line telling the operator how to fix a missing input.
    fn hint(&self) -> Option<String> {
        match self {
            CliError::Convert(convert::ConvertError::SourceNotFound(path)) => Some(format!(
                "Place {} in the working root.",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default()
            )),
            CliError::Photos(photos::PhotosError::RootNotFound(path)) => {
                Some(format!("Create the directory: {}", path.display()))
            }
            _ => None,
        }
    }
}

fn main() -> ExitCode {
    // usage errors exit 1 so that 2 keeps meaning "input missing"
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let _ = err.print();
            return if err.use_stderr() {
                ExitCode::from(1)
            } else {
                ExitCode::SUCCESS
            };
        }
    };

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("ERROR: {err}");
            if let Some(hint) = err.hint() {
                eprintln!("  {hint}");
            }
            ExitCode::from(err.exit_code())
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    match cli.command {
        Command::Data => {
            let config = config::load_config(&cli.root)?;
            run_data(&cli.root, &config.data)?;
        }
        Command::Photos => {
            let config = config::load_config(&cli.root)?;
            run_photos(&cli.root, &config.photos)?;
        }
        Command::GenConfig => {
            print!("{}", config::stock_config_toml());
        }
    }
    Ok(())
}

fn run_data(root: &Path, config: &config::DataConfig) -> Result<(), CliError> {
    output::print_data_header(&root.join(&config.source), &root.join(&config.output));
    let report = convert::convert(root, config, output::print_convert_event)?;
    output::print_data_report(&report);
    Ok(())
}

fn run_photos(root: &Path, config: &config::PhotosConfig) -> Result<(), CliError> {
    output::print_photos_header(root, &root.join(&config.root));
    let report = photos::index(root, config, output::print_team_line)?;
    output::print_photos_report(&report);
    Ok(())
}
