//! Command-line interface implementation for Stencil.
//! Provides argument parsing and help text formatting using clap, and merges
//! command-line values over the configuration file.

use clap::{error::ErrorKind, CommandFactory, Parser, Subcommand};
use std::path::PathBuf;

use crate::config::{ApplyConfig, RenderConfig};
use crate::error::{Error, Result};
use crate::fileset::FileSet;
use crate::processor::{ApplyTemplate, Transformation};

/// Command-line arguments structure for Stencil.
#[derive(Parser, Debug)]
#[command(author, version, about = "Stencil: apply templates to files and file sets", long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Enable verbose logging output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Configuration file (defaults to stencil.yaml, stencil.yml or stencil.json
    /// in the working directory)
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Character set used to read and write files
    #[arg(short, long, value_name = "CHARSET", global = true)]
    pub encoding: Option<String>,

    /// Define or override a `system` property
    #[arg(
        short = 'D',
        long = "define",
        value_name = "KEY=VALUE",
        value_parser = parse_key_value,
        global = true
    )]
    pub defines: Vec<(String, String)>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render templates to single output files
    Render(RenderArgs),
    /// Apply a template to every file of a file set
    Apply(ApplyArgs),
}

#[derive(clap::Args, Debug, Default)]
pub struct RenderArgs {
    /// Template: an embedded resource name or a file path
    #[arg(short, long, value_name = "TEMPLATE")]
    pub template: Option<String>,

    /// File the template is rendered to
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Additional template and output pair, rendered after the primary one
    #[arg(long = "transformation", value_name = "TEMPLATE=OUTPUT", value_parser = parse_key_value)]
    pub transformations: Vec<(String, String)>,
}

#[derive(clap::Args, Debug, Default)]
pub struct ApplyArgs {
    /// Template name, looked up as an embedded resource and then below the
    /// template directory
    #[arg(short, long, value_name = "NAME")]
    pub template: Option<String>,

    /// Directory holding the template (defaults to the file-set directory)
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,

    /// File-set directory
    #[arg(short, long, value_name = "DIR")]
    pub dir: Option<PathBuf>,

    /// Output directory (defaults to the file-set directory)
    #[arg(short, long, value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// Include pattern; replaces the configured includes
    #[arg(short, long = "include", value_name = "GLOB")]
    pub includes: Vec<String>,

    /// Exclude pattern; replaces the configured excludes
    #[arg(short = 'x', long = "exclude", value_name = "GLOB")]
    pub excludes: Vec<String>,

    /// Property bound for the template, overriding configured properties
    #[arg(short = 'P', long = "property", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub properties: Vec<(String, String)>,

    /// Do not add the default VCS and editor excludes
    #[arg(long)]
    pub no_default_excludes: bool,

    /// Follow symbolic links while scanning the file set
    #[arg(long)]
    pub follow_symlinks: bool,
}

/// Parses a `KEY=VALUE` argument.
pub fn parse_key_value(s: &str) -> std::result::Result<(String, String), String> {
    match s.split_once('=') {
        Some((key, value)) if !key.is_empty() => Ok((key.to_string(), value.to_string())),
        _ => Err(format!("invalid KEY=VALUE: `{s}`")),
    }
}

impl RenderArgs {
    /// The primary transformation, command-line values taking precedence.
    ///
    /// # Errors
    /// * `Error::ConfigError` if only one of template and output file is set
    pub fn primary(&self, config: &RenderConfig) -> Result<Option<Transformation>> {
        let template = self.template.clone().or_else(|| config.template.clone());
        let output = self.output.clone().or_else(|| config.output_file.clone());

        match (template, output) {
            (Some(template), Some(output)) => Ok(Some(Transformation::new(template, output))),
            (None, None) => Ok(None),
            (Some(template), None) => Err(Error::ConfigError(format!(
                "template '{template}' has no output file"
            ))),
            (None, Some(output)) => Err(Error::ConfigError(format!(
                "output file '{}' has no template",
                output.display()
            ))),
        }
    }

    /// Configured transformations followed by those given on the command line.
    pub fn transformations(&self, config: &RenderConfig) -> Vec<Transformation> {
        config
            .transformations
            .iter()
            .cloned()
            .chain(
                self.transformations
                    .iter()
                    .map(|(template, output)| Transformation::new(template, output)),
            )
            .collect()
    }
}

impl ApplyArgs {
    /// Builds the request for the file-set processor, command-line values
    /// taking precedence over `config`.
    ///
    /// # Errors
    /// * `Error::ConfigError` if no template name or no file-set directory is
    ///   configured
    pub fn request(&self, config: &ApplyConfig) -> Result<ApplyTemplate> {
        let template_name = self
            .template
            .clone()
            .or_else(|| config.template_name.clone())
            .ok_or_else(|| Error::ConfigError("no template name configured".to_string()))?;

        let mut file_set = match (&self.dir, &config.file_set) {
            (Some(dir), Some(configured)) => FileSet { directory: dir.clone(), ..configured.clone() },
            (Some(dir), None) => FileSet::new(dir),
            (None, Some(configured)) => configured.clone(),
            (None, None) => {
                return Err(Error::ConfigError("no file set directory configured".to_string()))
            }
        };
        if let Some(output_dir) = &self.output_dir {
            file_set.output_directory = Some(output_dir.clone());
        }
        if !self.includes.is_empty() {
            file_set.includes = self.includes.clone();
        }
        if !self.excludes.is_empty() {
            file_set.excludes = self.excludes.clone();
        }
        if self.no_default_excludes {
            file_set.use_default_excludes = false;
        }
        if self.follow_symlinks {
            file_set.follow_symlinks = true;
        }

        let mut properties = config.properties.clone();
        properties.extend(self.properties.iter().cloned());

        Ok(ApplyTemplate {
            template_name,
            template_directory: self.template_dir.clone().or_else(|| config.template_directory.clone()),
            file_set,
            properties,
        })
    }
}

/// Parses command line arguments and returns the Args structure.
///
/// # Exits
/// * With status code 1 and the help text if the command is missing
/// * With clap's default error handling for other argument errors
pub fn get_args() -> Args {
    match Args::try_parse() {
        Ok(args) => args,
        Err(e) => match e.kind() {
            ErrorKind::MissingRequiredArgument
            | ErrorKind::MissingSubcommand
            | ErrorKind::DisplayHelpOnMissingArgumentOrSubcommand => {
                let _ = Args::command()
                    .help_template(
                        r#"{about-section}
{usage-heading} {usage}

{all-args}
{after-help}
"#,
                    )
                    .print_help();
                std::process::exit(1);
            }
            _ => e.exit(),
        },
    }
}
