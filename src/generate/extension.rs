use indexmap::IndexMap;
use prost_types::FieldDescriptorProto;

use crate::{Error, NamespacePath};

use super::{field::Field, source::SourceWriter, Context, OutputUnit};

/// Extension fields found in a file, grouped by the message they extend.
#[derive(Debug, Default)]
pub(crate) struct ExtensionCollector<'a> {
    extendees: IndexMap<&'a str, Vec<(NamespacePath, &'a FieldDescriptorProto)>>,
}

impl<'a> ExtensionCollector<'a> {
    /// Records an extension declared in `namespace`.
    pub fn collect(&mut self, namespace: &NamespacePath, field: &'a FieldDescriptorProto) {
        self.extendees
            .entry(field.extendee())
            .or_default()
            .push((namespace.clone(), field));
    }

    pub fn len(&self) -> usize {
        self.extendees.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.extendees.is_empty()
    }

    /// Generates the registration of every collected extension.
    ///
    /// The registrations are placed in the global namespace in a unit named after the
    /// source file, since the extended messages may live in any number of namespaces.
    pub fn generate(self, ctx: &mut Context<'_>, stem: &str) -> Result<Option<OutputUnit>, Error> {
        if self.is_empty() {
            return Ok(None);
        }

        let mut w = SourceWriter::new();
        w.line("namespace {").indent();
        for (extendee, fields) in &self.extendees {
            let extendee = ctx.resolve(extendee)?;
            for (namespace, proto) in fields {
                let field = Field::extension(ctx, proto, namespace)?;

                w.line(format!("\\{}::extension(function(){{", extendee))
                    .indent();
                field.write_metadata(&mut w);
                w.line("return $f;");
                w.dedent().line("});");
            }
        }
        w.dedent().line("}");

        Ok(Some(OutputUnit::new(
            NamespacePath::root(),
            format!("{}-extensions", stem),
            w.finish(),
        )))
    }
}
