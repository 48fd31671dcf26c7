use chrono::NaiveDateTime;
use indexmap::IndexMap;

use crate::{Options, VERSION};

use super::{GeneratedFile, OutputUnit};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The header written at the top of every generated file.
#[derive(Debug, Clone)]
pub(crate) struct Preamble<'a> {
    pub source: &'a str,
    pub timestamp: NaiveDateTime,
}

impl Preamble<'_> {
    fn wrap(&self, content: &str) -> String {
        format!(
            "<?php\n\
             // DO NOT EDIT! Generated by Protobuf for PHP protoc plugin {}\n\
             // Source: {}\n\
             //   Date: {}\n\
             \n\
             {}",
            VERSION,
            self.source,
            self.timestamp.format(TIMESTAMP_FORMAT),
            content
        )
    }
}

/// Partitions generated units into files.
///
/// In single-file mode every unit is written, in order, to a file named after the source
/// file. In multi-file mode each distinct unit key gets its own file, at a path derived
/// from the key.
pub(crate) fn assemble(
    units: &[OutputUnit],
    stem: &str,
    options: &Options,
    preamble: &Preamble<'_>,
) -> Vec<GeneratedFile> {
    let suffix = options.suffix();

    if !options.multifile {
        let content: String = units.iter().map(|unit| unit.source.as_str()).collect();
        return vec![GeneratedFile {
            name: format!("{}{}", stem, suffix),
            content: preamble.wrap(&content),
        }];
    }

    let mut files: IndexMap<String, String> = IndexMap::new();
    for unit in units {
        files
            .entry(unit.file_path())
            .or_default()
            .push_str(&unit.source);
    }

    files
        .into_iter()
        .map(|(path, content)| GeneratedFile {
            name: format!("{}{}", path, suffix),
            content: preamble.wrap(&content),
        })
        .collect()
}
