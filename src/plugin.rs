//! Running the generator as a `protoc` plugin, or over an encoded file descriptor set.
//!
//! Descriptors are decoded into a [`DescriptorPool`] rather than directly into
//! [`prost_types`] structs, so that the `php.*` extension options declared in
//! `php.proto` are preserved.

use bytes::{Buf, Bytes};
use prost::Message;
use prost_reflect::{DescriptorPool, FileDescriptor};
use prost_types::compiler::{code_generator_response, CodeGeneratorResponse};

use crate::{
    error::{Error, ErrorKind},
    Generator, NamespaceTable, Options, Output,
};

/// A `google.protobuf.compiler.CodeGeneratorRequest` with its files left encoded.
#[derive(Clone, PartialEq, Message)]
struct RawCodeGeneratorRequest {
    #[prost(string, repeated, tag = "1")]
    file_to_generate: Vec<String>,
    #[prost(string, optional, tag = "2")]
    parameter: Option<String>,
    #[prost(bytes = "bytes", repeated, tag = "15")]
    proto_file: Vec<Bytes>,
}

/// A `google.protobuf.FileDescriptorSet` with its files left encoded.
#[derive(Clone, PartialEq, Message)]
struct RawFileDescriptorSet {
    #[prost(bytes = "bytes", repeated, tag = "1")]
    file: Vec<Bytes>,
}

/// Generates code for an encoded `CodeGeneratorRequest`, as sent by `protoc` on stdin.
///
/// The request parameter is parsed with [`Options::from_parameter`]. Every file in the
/// request contributes to the [`NamespaceTable`], but only the files listed in
/// `file_to_generate` produce output.
pub fn generate_request<B>(buf: B) -> Result<Output, Error>
where
    B: Buf,
{
    let request = RawCodeGeneratorRequest::decode(buf).map_err(|err| {
        Error::from_kind(ErrorKind::Decode {
            what: "code generator request",
            err,
        })
    })?;

    let options = Options::from_parameter(request.parameter.as_deref().unwrap_or_default())?;
    let pool = decode_files(request.proto_file)?;
    generate_pool(&pool, &request.file_to_generate, &options)
}

/// Generates code for an encoded `FileDescriptorSet`, such as one written by
/// `protoc --descriptor_set_out --include_imports` or `protox -o`.
///
/// If `files` is empty, code is generated for every file in the set.
pub fn generate_descriptor_set<B>(
    buf: B,
    files: &[String],
    parameter: Option<&str>,
) -> Result<Output, Error>
where
    B: Buf,
{
    let set = RawFileDescriptorSet::decode(buf).map_err(|err| {
        Error::from_kind(ErrorKind::Decode {
            what: "file descriptor set",
            err,
        })
    })?;

    let options = Options::from_parameter(parameter.unwrap_or_default())?;
    let pool = decode_files(set.file)?;
    if files.is_empty() {
        let all: Vec<String> = pool.files().map(|file| file.name().to_owned()).collect();
        generate_pool(&pool, &all, &options)
    } else {
        generate_pool(&pool, files, &options)
    }
}

/// Converts the result of a run into the response returned to `protoc`.
///
/// Warnings are logged, since the response has no field to carry them.
pub fn response(result: Result<Output, Error>) -> CodeGeneratorResponse {
    match result {
        Ok(output) => {
            for warning in &output.warnings {
                tracing::warn!("{}", warning);
            }

            CodeGeneratorResponse {
                file: output
                    .files
                    .iter()
                    .map(|file| code_generator_response::File {
                        name: Some(file.name().to_owned()),
                        content: Some(file.content().to_owned()),
                        ..Default::default()
                    })
                    .collect(),
                supported_features: Some(
                    code_generator_response::Feature::Proto3Optional as u64,
                ),
                ..Default::default()
            }
        }
        Err(err) => CodeGeneratorResponse {
            error: Some(err.to_string()),
            ..Default::default()
        },
    }
}

fn decode_files(files: Vec<Bytes>) -> Result<DescriptorPool, Error> {
    let mut pool = DescriptorPool::new();
    for file in files {
        pool.decode_file_descriptor_proto(file)?;
    }
    Ok(pool)
}

fn generate_pool(
    pool: &DescriptorPool,
    names: &[String],
    defaults: &Options,
) -> Result<Output, Error> {
    let files: Vec<(FileDescriptor, Options)> = pool
        .files()
        .map(|file| {
            let options = defaults.clone().with_file_descriptor(&file);
            (file, options)
        })
        .collect();

    let table = NamespaceTable::from_files(
        files
            .iter()
            .map(|(file, options)| (file.file_descriptor_proto(), options)),
    );
    tracing::debug!(packages = table.len(), "built namespace table");

    let generator = Generator::new(table);
    let mut output = Output::default();
    for name in names {
        let (file, options) = files
            .iter()
            .find(|(file, _)| file.name() == name.as_str())
            .ok_or_else(|| Error::from_kind(ErrorKind::FileNotFound { name: name.clone() }))?;

        tracing::debug!(file = %name, multifile = options.multifile, "generating file");
        output.extend(generator.generate_file(file.file_descriptor_proto(), options)?);
    }
    Ok(output)
}
