mod assemble;
mod extension;
mod field;
mod message;
mod source;

use std::{mem, path::Path};

use chrono::{Local, NaiveDateTime};
use prost_types::FileDescriptorProto;

use crate::{Error, NamespacePath, NamespaceTable, Options, Warning};

use self::{
    assemble::{assemble, Preamble},
    extension::ExtensionCollector,
};

/// Generates PHP source files from protobuf file descriptors.
///
/// A generator holds the [`NamespaceTable`] shared by every file of an invocation. Each
/// call to [`generate_file`](Generator::generate_file) is independent of the others.
#[derive(Debug, Clone)]
pub struct Generator {
    table: NamespaceTable,
    timestamp: Option<NaiveDateTime>,
}

/// A generated source file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedFile {
    name: String,
    content: String,
}

/// The result of a successful generation run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct Output {
    /// The generated files, in generation order.
    pub files: Vec<GeneratedFile>,
    /// Problems found during generation which did not prevent it from completing.
    pub warnings: Vec<Warning>,
}

/// A generated type, before it is assembled into a file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OutputUnit {
    namespace: NamespacePath,
    name: String,
    source: String,
}

/// State accumulated while generating a single file.
#[derive(Debug)]
pub(crate) struct Context<'a> {
    table: &'a NamespaceTable,
    units: Vec<OutputUnit>,
    extensions: ExtensionCollector<'a>,
    warnings: Vec<Warning>,
}

impl Generator {
    /// Creates a generator that resolves type references with the given table.
    pub fn new(table: NamespaceTable) -> Self {
        Generator {
            table,
            timestamp: None,
        }
    }

    /// Sets the date written in the header of generated files.
    ///
    /// By default the current local time is used. Fixing the timestamp makes the output
    /// fully reproducible.
    pub fn timestamp(&mut self, timestamp: NaiveDateTime) -> &mut Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// The table used to resolve type references.
    pub fn namespace_table(&self) -> &NamespaceTable {
        &self.table
    }

    /// Generates the PHP files for a single protobuf file.
    ///
    /// # Errors
    ///
    /// Returns an error if any type reference in the file is not fully qualified. In that
    /// case no files are returned.
    pub fn generate_file(
        &self,
        file: &FileDescriptorProto,
        options: &Options,
    ) -> Result<Output, Error> {
        let namespace = options.namespace_for(file.package());
        let mut ctx = Context::new(&self.table);

        for enum_ in &file.enum_type {
            ctx.push(message::generate_enum(&namespace, enum_));
        }

        for message in &file.message_type {
            message::generate_message(&mut ctx, &namespace, message)?;
        }

        for extension in &file.extension {
            ctx.extensions.collect(&namespace, extension);
        }

        let stem = file_stem(file.name());
        let extensions = mem::take(&mut ctx.extensions);
        tracing::debug!(
            file = file.name(),
            extensions = extensions.len(),
            "collected extensions"
        );
        if let Some(unit) = extensions.generate(&mut ctx, stem)? {
            ctx.push(unit);
        }

        let preamble = Preamble {
            source: file.name(),
            timestamp: self
                .timestamp
                .unwrap_or_else(|| Local::now().naive_local()),
        };
        let files = assemble(&ctx.units, stem, options, &preamble);

        tracing::debug!(
            file = file.name(),
            units = ctx.units.len(),
            files = files.len(),
            warnings = ctx.warnings.len(),
            "generated file"
        );

        Ok(Output {
            files,
            warnings: ctx.warnings,
        })
    }
}

impl GeneratedFile {
    /// The path of the file, relative to the output directory.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The full source text of the file.
    pub fn content(&self) -> &str {
        &self.content
    }
}

impl Output {
    /// Appends the files and warnings of another run.
    pub fn extend(&mut self, other: Output) {
        self.files.extend(other.files);
        self.warnings.extend(other.warnings);
    }

    /// Returns the file with the given name, if it was generated.
    pub fn file(&self, name: &str) -> Option<&GeneratedFile> {
        self.files.iter().find(|file| file.name == name)
    }
}

impl OutputUnit {
    pub(crate) fn new(namespace: NamespacePath, name: impl Into<String>, source: String) -> Self {
        OutputUnit {
            namespace,
            name: name.into(),
            source,
        }
    }

    /// The namespace-qualified name identifying this unit.
    pub(crate) fn key(&self) -> String {
        self.namespace.child(&self.name).dotted()
    }

    pub(crate) fn file_path(&self) -> String {
        self.namespace.child(&self.name).to_file_path()
    }
}

impl<'a> Context<'a> {
    fn new(table: &'a NamespaceTable) -> Self {
        Context {
            table,
            units: Vec::new(),
            extensions: ExtensionCollector::default(),
            warnings: Vec::new(),
        }
    }

    /// Resolves a type reference. Each distinct warning is reported once per run.
    pub(crate) fn resolve(&mut self, name: &str) -> Result<NamespacePath, Error> {
        let mut warnings = Vec::new();
        let namespace = self.table.resolve(name, &mut warnings)?;
        for warning in warnings {
            if !self.warnings.contains(&warning) {
                self.warnings.push(warning);
            }
        }
        Ok(namespace)
    }

    pub(crate) fn push(&mut self, unit: OutputUnit) {
        tracing::trace!(unit = %unit.key(), "generated unit");
        self.units.push(unit);
    }
}

fn file_stem(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}
