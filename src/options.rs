use prost_reflect::FileDescriptor;
use prost_types::FileDescriptorProto;

use crate::{
    error::{Error, ErrorKind},
    NamespacePath,
};

/// The file extension used for generated files when no suffix is configured.
pub const DEFAULT_SUFFIX: &str = ".php";

/// Options controlling how a single protobuf file is generated.
///
/// Options may be set on the command line through the plugin parameter (see
/// [`Options::from_parameter`]), and are then overridden by the options declared in
/// each file (see [`Options::with_file_descriptor`]).
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Options {
    /// Replaces the protobuf package when deriving the PHP namespace.
    pub package: Option<String>,
    /// Replaces the PHP namespace entirely. Takes precedence over `package`.
    pub namespace: Option<String>,
    /// Emit one file per generated type instead of one file per protobuf file.
    pub multifile: bool,
    /// The file extension of generated files, including the leading dot.
    pub suffix: Option<String>,
}

impl Options {
    /// Parses the parameter string passed to the plugin by `protoc`.
    ///
    /// The parameter is a comma-separated list of `multifile`, `multifile=<bool>` and
    /// `suffix=<ext>` entries.
    ///
    /// # Examples
    ///
    /// ```
    /// # use protoc_gen_php::Options;
    /// let options = Options::from_parameter("multifile,suffix=.inc.php").unwrap();
    /// assert!(options.multifile);
    /// assert_eq!(options.suffix(), ".inc.php");
    ///
    /// assert!(Options::from_parameter("namespace=Foo").is_err());
    /// ```
    pub fn from_parameter(parameter: &str) -> Result<Self, Error> {
        let mut options = Options::default();

        for param in parameter.split(',').map(str::trim) {
            if param.is_empty() {
                continue;
            }

            let invalid = || {
                Error::from_kind(ErrorKind::InvalidParameter {
                    param: param.to_owned(),
                })
            };

            match param.split_once('=') {
                None if param == "multifile" => options.multifile = true,
                Some(("multifile", value)) => {
                    options.multifile = value.trim().parse().map_err(|_| invalid())?
                }
                Some(("suffix", value)) if !value.trim().is_empty() => {
                    options.suffix = Some(value.trim().to_owned())
                }
                _ => return Err(invalid()),
            }
        }

        Ok(options)
    }

    /// Applies the standard options of a file descriptor.
    ///
    /// The `php_namespace` file option overrides the namespace.
    pub fn with_file_descriptor_proto(mut self, file: &FileDescriptorProto) -> Self {
        if let Some(namespace) = file
            .options
            .as_ref()
            .and_then(|options| options.php_namespace.as_deref())
        {
            self.namespace = Some(namespace.to_owned());
        }
        self
    }

    /// Applies the standard options of a file, followed by the `php.package`,
    /// `php.namespace`, `php.multifile` and `php.suffix` extension options declared
    /// in `php.proto`, if the file sets them.
    pub fn with_file_descriptor(self, file: &FileDescriptor) -> Self {
        let mut options = self.with_file_descriptor_proto(file.file_descriptor_proto());

        let pool = file.parent_pool();
        let file_options = file.options();
        let get = |name: &str| {
            pool.get_extension_by_name(name)
                .filter(|ext| file_options.has_extension(ext))
                .map(|ext| file_options.get_extension(&ext).into_owned())
        };

        if let Some(package) = get("php.package") {
            if let Some(package) = package.as_str() {
                options.package = Some(package.to_owned());
            }
        }
        if let Some(namespace) = get("php.namespace") {
            if let Some(namespace) = namespace.as_str() {
                options.namespace = Some(namespace.to_owned());
            }
        }
        if let Some(multifile) = get("php.multifile").and_then(|value| value.as_bool()) {
            options.multifile = multifile;
        }
        if let Some(suffix) = get("php.suffix") {
            if let Some(suffix) = suffix.as_str().filter(|suffix| !suffix.is_empty()) {
                options.suffix = Some(suffix.to_owned());
            }
        }

        options
    }

    /// The PHP namespace of types declared in a file with the given package.
    pub fn namespace_for(&self, package: &str) -> NamespacePath {
        let namespace = self
            .namespace
            .as_deref()
            .or(self.package.as_deref())
            .unwrap_or(package);
        NamespacePath::parse(namespace)
    }

    /// The file extension of generated files.
    pub fn suffix(&self) -> &str {
        self.suffix.as_deref().unwrap_or(DEFAULT_SUFFIX)
    }
}
