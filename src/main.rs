//! Stencil's main application entry point.
//! Handles command-line argument parsing, configuration loading and
//! dispatches to the render and apply processors.

use std::sync::Arc;

use stencil::{
    ambient::AmbientContext,
    cli::{get_args, Args, Command},
    config::load_config,
    encoding::resolve_encoding,
    error::{default_error_handler, Error, Result},
    logger::{init_logger, HostLog, LogSink},
    processor::{FileSetProcessor, TransformProcessor},
    resources::EmbeddedResources,
};

/// Main application entry point.
fn main() {
    let args = get_args();

    init_logger(args.verbose);

    if let Err(err) = run(args) {
        default_error_handler(err);
    }
}

/// Main application logic execution.
///
/// # Flow
/// 1. Loads the configuration file, if any
/// 2. Resolves the character set
/// 3. Captures the ambient context
/// 4. Runs the requested processor
fn run(args: Args) -> Result<()> {
    let working_dir = std::env::current_dir().map_err(Error::IoError)?;
    let config = load_config(args.config.as_deref(), &working_dir)?;

    let sink: Arc<dyn LogSink> = Arc::new(HostLog::default());
    let configured_encoding = args.encoding.as_deref().or(config.encoding.as_deref());
    let encoding = resolve_encoding(configured_encoding, &config.project, &*sink)?;

    let mut system = config.system.clone();
    system.extend(args.defines.iter().cloned());
    let ambient = AmbientContext::capture(&config.project, &system)?;
    let resources = Arc::new(EmbeddedResources::bundled());

    let written = match &args.command {
        Command::Render(render) => {
            let primary = render.primary(&config.render)?;
            let transformations = render.transformations(&config.render);
            if primary.is_none() && transformations.is_empty() {
                sink.warn("No template to render, nothing to do");
            }
            TransformProcessor::new(resources, &ambient, encoding, Arc::clone(&sink))
                .run(primary.as_ref(), &transformations)?
        }
        Command::Apply(apply) => {
            let request = apply.request(&config.apply)?;
            FileSetProcessor::new(resources, &ambient, encoding, Arc::clone(&sink)).run(&request)?
        }
    };

    for path in &written {
        println!("Rendered: '{}'", path.display());
    }
    println!("Template processing completed successfully, {} file(s) written.", written.len());
    Ok(())
}
