//! A protobuf compiler plugin which generates PHP message classes.
//!
//! The generated classes target the `DrSlump\Protobuf` runtime: every message class
//! extends `\DrSlump\Protobuf\Message`, registers its field metadata lazily in a static
//! `descriptor()` method, and exposes `has`, `clear`, `get` and `set` accessors (plus
//! `getList` and `add` for repeated fields) which address values by tag number.
//!
//! Most users run the `protoc-gen-php` binary as a `protoc` plugin:
//!
//! ```text
//! protoc --plugin=protoc-gen-php --php_out=multifile:out/ root.proto
//! ```
//!
//! The library can also be used directly with descriptors from any source, such as
//! [`protox`](https://crates.io/crates/protox) or [`prost-types`](https://crates.io/crates/prost-types).
//!
//! # Examples
//!
//! ```
//! use prost_types::{
//!     field_descriptor_proto::{Label, Type},
//!     DescriptorProto, FieldDescriptorProto, FileDescriptorProto,
//! };
//! use protoc_gen_php::Options;
//!
//! let file = FileDescriptorProto {
//!     name: Some("shop.proto".to_owned()),
//!     package: Some("shop".to_owned()),
//!     message_type: vec![DescriptorProto {
//!         name: Some("Item".to_owned()),
//!         field: vec![FieldDescriptorProto {
//!             name: Some("unit_price".to_owned()),
//!             number: Some(1),
//!             label: Some(Label::Optional as i32),
//!             r#type: Some(Type::Double as i32),
//!             ..Default::default()
//!         }],
//!         ..Default::default()
//!     }],
//!     ..Default::default()
//! };
//! let options = Options {
//!     namespace: Some("App\\Shop".to_owned()),
//!     ..Default::default()
//! };
//!
//! let output = protoc_gen_php::generate(&[(file, options)]).unwrap();
//!
//! assert_eq!(output.files.len(), 1);
//! assert_eq!(output.files[0].name(), "shop.php");
//! assert!(output.files[0].content().contains("namespace App\\Shop {"));
//! assert!(output.files[0].content().contains("public function getUnitPrice(){"));
//! assert!(output.warnings.is_empty());
//! ```
//!
//! ### Namespaces
//!
//! The PHP namespace of a file is its protobuf package, unless overridden by the
//! `php.package` or `php.namespace` options (see [`Options`]). Nested types are placed
//! in a namespace named after their enclosing message. References to types in other
//! files are resolved through a [`NamespaceTable`] built from every file of the
//! invocation; references to unknown packages produce a [`Warning`].
#![warn(missing_debug_implementations, missing_docs)]
#![deny(unsafe_code)]
#![doc(html_root_url = "https://docs.rs/protoc-gen-php/0.1.0/")]

pub mod plugin;

mod case;
mod error;
mod generate;
mod names;
mod options;

pub use {prost, prost_reflect, prost_types};

pub use self::case::to_pascal_case;
pub use self::error::{Error, Warning};
pub use self::generate::{GeneratedFile, Generator, Output};
pub use self::names::{NamespacePath, NamespaceTable};
pub use self::options::{Options, DEFAULT_SUFFIX};

/// The version of this generator, written in the header of every generated file.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Generates PHP code for a set of protobuf files.
///
/// The [`NamespaceTable`] is built from every file before any code is generated, so files
/// may reference types declared in each other. The output files of each input file are
/// returned in order.
///
/// # Errors
///
/// Returns an error if any file contains a type reference which is not fully qualified.
pub fn generate(files: &[(prost_types::FileDescriptorProto, Options)]) -> Result<Output, Error> {
    let table = NamespaceTable::from_files(files.iter().map(|(file, options)| (file, options)));
    let generator = Generator::new(table);

    let mut output = Output::default();
    for (file, options) in files {
        output.extend(generator.generate_file(file, options)?);
    }
    Ok(output)
}
