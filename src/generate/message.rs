use prost_types::{DescriptorProto, EnumDescriptorProto};

use crate::{Error, NamespacePath};

use super::{field::Field, source::SourceWriter, Context, OutputUnit};

const MESSAGE_BASE_CLASS: &str = "\\DrSlump\\Protobuf\\Message";

/// Generates a class holding one integer constant per enum value, in declaration order.
pub(crate) fn generate_enum(namespace: &NamespacePath, enum_: &EnumDescriptorProto) -> OutputUnit {
    let mut w = SourceWriter::new();

    open_namespace(&mut w, namespace);
    w.line(format!("class {} {{", enum_.name())).indent();
    for value in &enum_.value {
        w.line(format!("const {} = {};", value.name(), value.number()));
    }
    w.dedent().line("}");
    close_namespace(&mut w);

    OutputUnit::new(namespace.clone(), enum_.name(), w.finish())
}

/// Generates the class for a message, preceded by its nested enums and messages.
///
/// Nested types are placed in a namespace named after the enclosing message, and
/// extensions declared inside the message are handed to the extension collector.
pub(crate) fn generate_message<'a>(
    ctx: &mut Context<'a>,
    namespace: &NamespacePath,
    message: &'a DescriptorProto,
) -> Result<(), Error> {
    let name = message.name();
    let class = namespace.child(name);

    let fields = message
        .field
        .iter()
        .map(|field| Field::new(ctx, field))
        .collect::<Result<Vec<_>, Error>>()?;

    let mut w = SourceWriter::new();
    open_namespace(&mut w, namespace);
    w.line(format!("class {} extends {} {{", name, MESSAGE_BASE_CLASS))
        .indent()
        .blank();

    w.line("/** @var \\DrSlump\\Protobuf\\Descriptor */");
    w.line("protected static $__descriptor;");
    w.line("/** @var \\Closure[] */");
    w.line("protected static $__extensions = array();");
    w.blank();

    w.line("public static function descriptor(\\DrSlump\\Protobuf\\Descriptor $descriptor = NULL)");
    w.line("{").indent();
    w.line("if (NULL !== $descriptor) {").indent();
    w.line("self::$__descriptor = $descriptor;");
    w.line("return self::$__descriptor;");
    w.dedent().line("}").blank();
    w.line("if (!self::$__descriptor) {").indent();
    w.line(format!(
        "$descriptor = new \\DrSlump\\Protobuf\\Descriptor('\\{}');",
        class
    ));
    w.blank();
    for field in &fields {
        field.write_metadata(&mut w);
        w.line("$descriptor->addField($f);");
        w.blank();
    }
    w.line("foreach (self::$__extensions as $cb) {").indent();
    w.line("$descriptor->addField($cb(), true);");
    w.dedent().line("}").blank();
    w.line("self::$__descriptor = $descriptor;");
    w.dedent().line("}").blank();
    w.line("return self::$__descriptor;");
    w.dedent().line("}").blank();

    for field in &fields {
        field.write_property(&mut w);
    }
    w.blank();

    for field in &fields {
        field.write_accessors(&mut w, &class);
    }

    w.dedent().line("}");
    close_namespace(&mut w);
    let unit = OutputUnit::new(namespace.clone(), name, w.finish());

    for enum_ in &message.enum_type {
        ctx.push(generate_enum(&class, enum_));
    }

    for nested in &message.nested_type {
        generate_message(ctx, &class, nested)?;
    }

    for extension in &message.extension {
        ctx.extensions.collect(&class, extension);
    }

    ctx.push(unit);
    Ok(())
}

fn open_namespace(w: &mut SourceWriter, namespace: &NamespacePath) {
    if namespace.is_root() {
        w.line("namespace {");
    } else {
        w.line(format!("namespace {} {{", namespace));
    }
    w.blank().indent();
}

fn close_namespace(w: &mut SourceWriter) {
    w.dedent().line("}");
}
