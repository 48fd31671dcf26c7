use prost_types::{
    field_descriptor_proto::{Label, Type},
    FieldDescriptorProto,
};

use crate::{case::to_pascal_case, generate::Context, Error, NamespacePath};

use super::source::SourceWriter;

/// The PHP representation of a field's value, derived from its protobuf type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ValueKind {
    Float,
    Int,
    Bool,
    String,
    Bytes,
    Message(NamespacePath),
    Enum(NamespacePath),
    Group(Option<NamespacePath>),
}

impl ValueKind {
    fn reference(&self) -> Option<&NamespacePath> {
        match self {
            ValueKind::Message(path) | ValueKind::Enum(path) => Some(path),
            ValueKind::Group(path) => path.as_ref(),
            ValueKind::Float
            | ValueKind::Int
            | ValueKind::Bool
            | ValueKind::String
            | ValueKind::Bytes => None,
        }
    }

    /// The type used in `@var`, `@param` and `@return` doc comments.
    fn doc_type(&self) -> String {
        match self {
            ValueKind::Float => "float".to_owned(),
            ValueKind::Int => "int".to_owned(),
            ValueKind::Bool => "boolean".to_owned(),
            ValueKind::String | ValueKind::Bytes => "string".to_owned(),
            ValueKind::Message(path) => format!("\\{}", path),
            ValueKind::Enum(path) => format!("int - \\{}", path),
            ValueKind::Group(_) => "unknown".to_owned(),
        }
    }

    /// The parameter type declaration for setters. Only messages have one.
    fn type_hint(&self) -> Option<String> {
        match self {
            ValueKind::Message(path) => Some(format!("\\{}", path)),
            _ => None,
        }
    }
}

/// A field prepared for code generation, with its type reference resolved.
#[derive(Debug)]
pub(crate) struct Field<'a> {
    proto: &'a FieldDescriptorProto,
    name: String,
    kind: ValueKind,
}

impl<'a> Field<'a> {
    pub fn new(ctx: &mut Context<'_>, proto: &'a FieldDescriptorProto) -> Result<Self, Error> {
        let mut reference = || ctx.resolve(proto.type_name());

        let kind = match proto.r#type() {
            Type::Double | Type::Float => ValueKind::Float,
            Type::Int64
            | Type::Uint64
            | Type::Int32
            | Type::Fixed64
            | Type::Fixed32
            | Type::Uint32
            | Type::Sfixed32
            | Type::Sfixed64
            | Type::Sint32
            | Type::Sint64 => ValueKind::Int,
            Type::Bool => ValueKind::Bool,
            Type::String => ValueKind::String,
            Type::Bytes => ValueKind::Bytes,
            Type::Message => ValueKind::Message(reference()?),
            Type::Enum => ValueKind::Enum(reference()?),
            Type::Group if proto.type_name.is_some() => ValueKind::Group(Some(reference()?)),
            Type::Group => ValueKind::Group(None),
        };

        Ok(Field {
            proto,
            name: proto.name().to_owned(),
            kind,
        })
    }

    /// Prepares an extension field. Its metadata name is qualified with the namespace
    /// in which it was declared.
    pub fn extension(
        ctx: &mut Context<'_>,
        proto: &'a FieldDescriptorProto,
        namespace: &NamespacePath,
    ) -> Result<Self, Error> {
        let mut field = Field::new(ctx, proto)?;
        field.name = namespace.child(proto.name()).dotted();
        Ok(field)
    }

    pub fn number(&self) -> i32 {
        self.proto.number()
    }

    pub fn is_repeated(&self) -> bool {
        self.proto.label() == Label::Repeated
    }

    /// Writes the statements building the `\DrSlump\Protobuf\Field` metadata object into `$f`.
    pub fn write_metadata(&self, w: &mut SourceWriter) {
        let proto = self.proto;
        let type_name = match proto.type_name.as_deref() {
            Some(name) => name.to_owned(),
            None => scalar_name(proto.r#type()),
        };

        w.line(format!(
            "// {} {} {} = {}",
            label_name(proto.label()),
            type_name,
            self.name,
            proto.number()
        ));
        w.line("$f = new \\DrSlump\\Protobuf\\Field();");
        w.line(format!("$f->number    = {};", proto.number()));
        w.line(format!("$f->name      = {};", quote(&self.name)));
        w.line(format!("$f->type      = {};", proto.r#type() as i32));
        w.line(format!("$f->rule      = {};", proto.label() as i32));
        if let Some(reference) = self.kind.reference() {
            w.line(format!("$f->reference = '\\{}';", reference));
        }
        if let Some(default) = proto.default_value.as_deref() {
            w.line(format!("$f->default   = {};", default_literal(&self.kind, default)));
        }
    }

    /// Writes the public property holding the field's value.
    pub fn write_property(&self, w: &mut SourceWriter) {
        let name = self.proto.name();
        if self.is_repeated() {
            w.line(format!("/** @var {}[] */", self.kind.doc_type()));
            w.line(format!("public ${} = array();", name));
        } else {
            let default = match self.proto.default_value.as_deref() {
                Some(default) => default_literal(&self.kind, default),
                None => "null".to_owned(),
            };
            w.line(format!("/** @var {} */", self.kind.doc_type()));
            w.line(format!("public ${} = {};", name, default));
        }
        w.blank();
    }

    /// Writes the accessor methods. Every accessor addresses the value by tag number.
    ///
    /// `owner` is the fully qualified name of the generated class, returned by the
    /// chainable methods.
    pub fn write_accessors(&self, w: &mut SourceWriter, owner: &NamespacePath) {
        let tag = self.number();
        let name = self.proto.name();
        let camel = to_pascal_case(name);
        let doc = self.kind.doc_type();
        let param = match self.kind.type_hint() {
            Some(hint) => format!("{} $value", hint),
            None => "$value".to_owned(),
        };

        doc_comment(w, &format!("Check if <{}> has a value", name), &[], "boolean");
        w.line(format!("public function has{}(){{", camel));
        w.line(format!("  return $this->_has({});", tag));
        w.line("}");
        w.blank();

        doc_comment(w, &format!("Clear <{}> value", name), &[], &format!("\\{}", owner));
        w.line(format!("public function clear{}(){{", camel));
        w.line(format!("  return $this->_clear({});", tag));
        w.line("}");
        w.blank();

        if self.is_repeated() {
            doc_comment(w, &format!("Get <{}> value", name), &["int $idx".to_owned()], &doc);
            w.line(format!("public function get{}($idx = NULL){{", camel));
            w.line(format!("  return $this->_get({}, $idx);", tag));
            w.line("}");
            w.blank();

            doc_comment(
                w,
                &format!("Set <{}> value", name),
                &[format!("{} $value", doc), "int $idx".to_owned()],
                &format!("\\{}", owner),
            );
            w.line(format!("public function set{}({}, $idx = NULL){{", camel, param));
            w.line(format!("  return $this->_set({}, $value, $idx);", tag));
            w.line("}");
            w.blank();

            doc_comment(w, &format!("Get all elements of <{}>", name), &[], &format!("{}[]", doc));
            w.line(format!("public function get{}List(){{", camel));
            w.line(format!("  return $this->_get({});", tag));
            w.line("}");
            w.blank();

            doc_comment(
                w,
                &format!("Add a new element to <{}>", name),
                &[format!("{} $value", doc)],
                &format!("\\{}", owner),
            );
            w.line(format!("public function add{}({}){{", camel, param));
            w.line(format!("  return $this->_add({}, $value);", tag));
            w.line("}");
            w.blank();
        } else {
            doc_comment(w, &format!("Get <{}> value", name), &[], &doc);
            w.line(format!("public function get{}(){{", camel));
            w.line(format!("  return $this->_get({});", tag));
            w.line("}");
            w.blank();

            doc_comment(
                w,
                &format!("Set <{}> value", name),
                &[format!("{} $value", doc)],
                &format!("\\{}", owner),
            );
            w.line(format!("public function set{}({}){{", camel, param));
            w.line(format!("  return $this->_set({}, $value);", tag));
            w.line("}");
            w.blank();
        }
    }
}

fn doc_comment(w: &mut SourceWriter, summary: &str, params: &[String], returns: &str) {
    w.line("/**");
    w.line(format!(" * {}", summary));
    w.line(" *");
    for param in params {
        w.line(format!(" * @param {}", param));
    }
    w.line(format!(" * @return {}", returns));
    w.line(" */");
}

fn label_name(label: Label) -> &'static str {
    match label {
        Label::Optional => "optional",
        Label::Required => "required",
        Label::Repeated => "repeated",
    }
}

fn scalar_name(ty: Type) -> String {
    ty.as_str_name()
        .trim_start_matches("TYPE_")
        .to_ascii_lowercase()
}

/// Converts the default value of a field, as written in the descriptor, into a PHP literal.
pub(crate) fn default_literal(kind: &ValueKind, raw: &str) -> String {
    match kind {
        ValueKind::Bool => match parse_bool(raw) {
            Some(true) => "true".to_owned(),
            Some(false) => "false".to_owned(),
            None => "null".to_owned(),
        },
        ValueKind::String | ValueKind::Bytes => quote(raw),
        ValueKind::Enum(path) => format!("\\{}::{}", path, raw),
        ValueKind::Float => match raw {
            "inf" => "INF".to_owned(),
            "-inf" => "-INF".to_owned(),
            "nan" => "NAN".to_owned(),
            _ => raw.to_owned(),
        },
        ValueKind::Int | ValueKind::Message(_) | ValueKind::Group(_) => raw.to_owned(),
    }
}

/// Parses a boolean leniently, accepting the spellings PHP's boolean filter accepts.
///
/// Returns `None` if the value is not recognized.
pub(crate) fn parse_bool(raw: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "on" | "yes" => Some(true),
        "0" | "false" | "off" | "no" | "" => Some(false),
        _ => None,
    }
}

/// Formats a double-quoted PHP string literal.
pub(crate) fn quote(value: &str) -> String {
    let mut result = String::with_capacity(value.len() + 2);
    result.push('"');
    for ch in value.chars() {
        if matches!(ch, '"' | '\\' | '$') {
            result.push('\\');
        }
        result.push(ch);
    }
    result.push('"');
    result
}
