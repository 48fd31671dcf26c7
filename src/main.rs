use std::{
    fs,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use clap::Parser;
use miette::{IntoDiagnostic, Result, WrapErr};
use prost::Message;
use protoc_gen_php::{plugin, Output};
use tracing_subscriber::EnvFilter;

/// Generates PHP message classes from protobuf descriptors.
///
/// When run without arguments, acts as a protoc plugin: a code generator request is read
/// from stdin and the response is written to stdout.
#[derive(Debug, Parser)]
#[clap(version)]
pub struct Args {
    /// Generate code from an encoded file descriptor set instead of a plugin request.
    #[clap(long, visible_alias = "descriptor_set_in", value_name = "PATH", value_parser)]
    descriptor_set: Option<PathBuf>,
    /// The directory in which to write generated files, when reading a descriptor set.
    #[clap(
        short = 'o',
        long = "output",
        value_name = "PATH",
        default_value = ".",
        requires = "descriptor_set",
        value_parser
    )]
    output: PathBuf,
    /// Generator parameters, e.g. 'multifile,suffix=.inc.php'.
    #[clap(short = 'p', long, value_name = "PARAMS", requires = "descriptor_set")]
    parameter: Option<String>,
    /// Names of the files in the descriptor set to generate code for. Defaults to all files.
    #[clap(value_name = "PROTO_FILES", requires = "descriptor_set")]
    files: Vec<String>,
}

pub fn main() -> Result<()> {
    miette::set_panic_hook();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();

    let args = Args::parse();
    match args.descriptor_set {
        Some(path) => {
            let bytes = fs::read(&path)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to read '{}'", path.display()))?;
            let output = plugin::generate_descriptor_set(
                bytes.as_slice(),
                &args.files,
                args.parameter.as_deref(),
            )?;
            write_output(&args.output, &output)
        }
        None => {
            let mut request = Vec::new();
            io::stdin()
                .read_to_end(&mut request)
                .into_diagnostic()
                .wrap_err("failed to read code generator request")?;

            let response = plugin::response(plugin::generate_request(request.as_slice()));
            io::stdout()
                .write_all(&response.encode_to_vec())
                .into_diagnostic()
                .wrap_err("failed to write code generator response")
        }
    }
}

fn write_output(dir: &Path, output: &Output) -> Result<()> {
    for warning in &output.warnings {
        tracing::warn!("{}", warning);
    }

    for file in &output.files {
        let path = dir.join(file.name());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .into_diagnostic()
                .wrap_err_with(|| format!("failed to create '{}'", parent.display()))?;
        }
        fs::write(&path, file.content())
            .into_diagnostic()
            .wrap_err_with(|| format!("failed to write '{}'", path.display()))?;
        tracing::info!(path = %path.display(), "wrote file");
    }
    Ok(())
}
