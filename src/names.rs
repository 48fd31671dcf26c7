use std::{collections::BTreeMap, fmt};

use crate::{
    error::{Error, Warning},
    Options,
};

/// An output namespace, stored as its individual segments.
///
/// Segments are never re-split, so a name is never confused with a separator of the
/// output language.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NamespacePath {
    segments: Vec<String>,
}

impl NamespacePath {
    /// The root namespace.
    pub fn root() -> Self {
        NamespacePath::default()
    }

    /// Parses a namespace written with either `.` or `\` separators.
    ///
    /// Leading, trailing and repeated separators are ignored, so `.App\Model.` and
    /// `App.Model` are the same namespace.
    pub fn parse(namespace: &str) -> Self {
        NamespacePath {
            segments: namespace
                .split(|ch| ch == '.' || ch == '\\')
                .filter(|segment| !segment.is_empty())
                .map(str::to_owned)
                .collect(),
        }
    }

    /// Returns a new namespace nested inside this one.
    pub fn child(&self, name: &str) -> Self {
        let mut segments = self.segments.clone();
        segments.push(name.to_owned());
        NamespacePath { segments }
    }

    /// Returns a new namespace with `other` appended to this one.
    pub fn join(&self, other: &NamespacePath) -> Self {
        let mut segments = self.segments.clone();
        segments.extend(other.segments.iter().cloned());
        NamespacePath { segments }
    }

    /// The segments of this namespace, outermost first.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Returns true if this is the root namespace.
    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Formats the namespace with `.` separators.
    pub fn dotted(&self) -> String {
        self.segments.join(".")
    }

    /// Formats the namespace as a relative file path.
    pub fn to_file_path(&self) -> String {
        self.segments.join("/")
    }
}

/// Formats the namespace as written in PHP source, without a leading `\`.
impl fmt::Display for NamespacePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("\\"))
    }
}

/// Maps protobuf package names to PHP namespaces.
///
/// The table is built once from every file in an invocation before any code is generated,
/// and is only read afterwards.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct NamespaceTable {
    packages: BTreeMap<String, NamespacePath>,
}

impl NamespaceTable {
    /// Creates an empty table.
    pub fn new() -> Self {
        Default::default()
    }

    /// Builds a table from a set of files and the options that apply to each of them.
    ///
    /// When several files declare the same package, the namespace of the last one is used.
    pub fn from_files<'a, I>(files: I) -> Self
    where
        I: IntoIterator<Item = (&'a prost_types::FileDescriptorProto, &'a Options)>,
    {
        let mut table = NamespaceTable::new();
        for (file, options) in files {
            table.insert(file.package(), options.namespace_for(file.package()));
        }
        table
    }

    /// Registers the namespace used for `package`, replacing any previous entry.
    pub fn insert(&mut self, package: impl Into<String>, namespace: NamespacePath) -> &mut Self {
        self.packages.insert(package.into(), namespace);
        self
    }

    /// Returns the namespace registered for `package`, if any.
    pub fn get(&self, package: &str) -> Option<&NamespacePath> {
        self.packages.get(package)
    }

    /// Returns the number of registered packages.
    pub fn len(&self) -> usize {
        self.packages.len()
    }

    /// Returns true if no packages are registered.
    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// Converts a fully-qualified protobuf type name (such as `.foo.bar.Message`) into the
    /// PHP name of the generated type.
    ///
    /// A name equal to a registered package maps to that package's namespace. Otherwise the
    /// longest registered package that prefixes the name is replaced with its namespace.
    /// If no package matches, the name belongs to the empty package, and is placed in its
    /// namespace when one is registered. Otherwise a [`Warning::UntrackedPackage`] is
    /// pushed to `warnings` and the name is converted segment by segment.
    ///
    /// # Errors
    ///
    /// Returns an error if `name` does not start with `.`.
    pub fn resolve(&self, name: &str, warnings: &mut Vec<Warning>) -> Result<NamespacePath, Error> {
        let name = match name.strip_prefix('.') {
            Some(name) => name,
            None => return Err(Error::unqualified_reference(name)),
        };

        if let Some(namespace) = self.packages.get(name) {
            return Ok(namespace.clone());
        }

        let mut best: Option<(&str, &NamespacePath)> = None;
        for (package, namespace) in &self.packages {
            if package.is_empty() {
                continue;
            }

            let is_prefix = name
                .strip_prefix(package.as_str())
                .map_or(false, |rest| rest.starts_with('.'));
            if is_prefix && best.map_or(true, |(current, _)| package.len() > current.len()) {
                best = Some((package.as_str(), namespace));
            }
        }

        match best {
            Some((package, namespace)) => {
                Ok(namespace.join(&NamespacePath::parse(&name[package.len()..])))
            }
            None => match self.packages.get("") {
                Some(root) => Ok(root.join(&NamespacePath::parse(name))),
                None => {
                    warnings.push(Warning::UntrackedPackage {
                        name: name.to_owned(),
                    });
                    Ok(NamespacePath::parse(name))
                }
            },
        }
    }
}
