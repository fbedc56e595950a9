//! Parser for the `DESC:` line protocol.
//!
//! The grammar is deliberately small: split on delimiters, check arities,
//! and reject anything that does not fit. A malformed line aborts the whole
//! catalog since it means the engine speaks a different protocol version.

use rustc_hash::FxHashMap;
use thiserror::Error;

use crate::error::{Error, Result};

use super::types::{Descriptor, DescriptorCatalog, ParamDescriptor};

/// Prefix marking a descriptor line in the engine's query output.
const DESCRIPTOR_PREFIX: &str = "DESC:";

/// Separator between the four parenthesized groups.
const GROUP_SEPARATOR: &str = ")(";

/// Ways a single descriptor line can be malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DescriptorError {
    /// Line does not start with `DESC:`.
    #[error("missing 'DESC:' prefix")]
    MissingPrefix,

    /// No `:` between the operation name and its groups.
    #[error("missing ':' after operation name")]
    MissingNameSeparator,

    #[error("empty operation name")]
    EmptyName,

    /// Payload is not enclosed in `(` ... `)`.
    #[error("groups are not wrapped in parentheses")]
    Unwrapped,

    /// Payload does not split into exactly four groups.
    #[error("expected 4 groups, found {found}")]
    GroupCount { found: usize },

    /// Descriptor line is not valid UTF-8.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// Parameter entry is not a `type:name:default` triple.
    #[error("parameter '{entry}' has {fields} ':'-separated fields, expected 3")]
    ParamArity { entry: String, fields: usize },
}

/// Parse the full stdout of a query-mode engine run into a catalog.
///
/// Only lines starting with `DESC:` are considered; other lines may hold
/// arbitrary bytes. When an operation name repeats, the later line wins.
///
/// # Errors
/// Returns [`Error::Protocol`] for the first malformed descriptor line,
/// including one that is not valid UTF-8; no partial catalog is produced.
pub fn parse_catalog(output: impl AsRef<[u8]>) -> Result<DescriptorCatalog> {
    let mut descriptors = FxHashMap::default();
    let mut ignored = 0usize;

    for (index, raw) in output.as_ref().split(|&b| b == b'\n').enumerate() {
        if !raw.starts_with(DESCRIPTOR_PREFIX.as_bytes()) {
            ignored += 1;
            continue;
        }

        let protocol_error = |source| Error::Protocol {
            line: index + 1,
            text: String::from_utf8_lossy(raw).trim().to_string(),
            source,
        };

        let line =
            std::str::from_utf8(raw).map_err(|_| protocol_error(DescriptorError::InvalidUtf8))?;
        let (name, desc) = parse_descriptor_line(line).map_err(protocol_error)?;

        if descriptors.insert(name, desc).is_some() {
            tracing::debug!("Descriptor on line {} replaces an earlier one", index + 1);
        }
    }

    tracing::debug!("Ignored {} non-descriptor lines", ignored);
    Ok(DescriptorCatalog::from_map(descriptors))
}

/// Parse one `DESC:` line into its operation name and descriptor.
pub fn parse_descriptor_line(
    line: &str,
) -> std::result::Result<(String, Descriptor), DescriptorError> {
    let body = line
        .trim()
        .strip_prefix(DESCRIPTOR_PREFIX)
        .ok_or(DescriptorError::MissingPrefix)?;

    // The name cannot contain ':'; everything after the first one is groups.
    let (name, payload) = body
        .split_once(':')
        .ok_or(DescriptorError::MissingNameSeparator)?;
    if name.is_empty() {
        return Err(DescriptorError::EmptyName);
    }

    let inner = payload
        .strip_prefix('(')
        .and_then(|rest| rest.strip_suffix(')'))
        .ok_or(DescriptorError::Unwrapped)?;

    let groups: Vec<&str> = inner.split(GROUP_SEPARATOR).collect();
    let [inputs, outputs, params, categories] = groups[..] else {
        return Err(DescriptorError::GroupCount {
            found: groups.len(),
        });
    };

    let desc = Descriptor {
        inputs: split_group(inputs),
        outputs: split_group(outputs),
        params: split_entries(params)
            .map(parse_param)
            .collect::<std::result::Result<_, _>>()?,
        categories: split_group(categories),
    };

    Ok((name.to_string(), desc))
}

/// Comma-separated entries with empty ones dropped.
fn split_entries(group: &str) -> impl Iterator<Item = &str> {
    group.split(',').filter(|entry| !entry.is_empty())
}

fn split_group(group: &str) -> Vec<String> {
    split_entries(group).map(str::to_string).collect()
}

fn parse_param(entry: &str) -> std::result::Result<ParamDescriptor, DescriptorError> {
    let fields: Vec<&str> = entry.split(':').collect();
    match fields[..] {
        [type_tag, name, default] => Ok(ParamDescriptor::new(type_tag, name, default)),
        _ => Err(DescriptorError::ParamArity {
            entry: entry.to_string(),
            fields: fields.len(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_parse_basic_line() {
        let (name, desc) = parse_descriptor_line("DESC:Foo:(a,b)()(int:x:0)(cat1)").unwrap();
        assert_eq!(name, "Foo");
        assert_eq!(desc.inputs, strings(&["a", "b"]));
        assert!(desc.outputs.is_empty());
        assert_eq!(desc.params, vec![ParamDescriptor::new("int", "x", "0")]);
        assert_eq!(desc.categories, strings(&["cat1"]));
    }

    #[test]
    fn test_parse_all_empty_groups() {
        let (name, desc) = parse_descriptor_line("DESC:Bar:()()()()").unwrap();
        assert_eq!(name, "Bar");
        assert_eq!(desc, Descriptor::default());
    }

    #[test]
    fn test_parse_wire_example() {
        let line = "DESC:MyOp:(in1,in2)(out1)(int:foo:0,float:bar:1.0)(category1,category2)";
        let (name, desc) = parse_descriptor_line(line).unwrap();
        assert_eq!(name, "MyOp");
        assert_eq!(desc.inputs, strings(&["in1", "in2"]));
        assert_eq!(desc.outputs, strings(&["out1"]));
        assert_eq!(
            desc.params,
            vec![
                ParamDescriptor::new("int", "foo", "0"),
                ParamDescriptor::new("float", "bar", "1.0"),
            ]
        );
        assert_eq!(desc.categories, strings(&["category1", "category2"]));
    }

    #[test]
    fn test_stray_commas_are_dropped() {
        let (_, desc) = parse_descriptor_line("DESC:Op:(,a,,b,)(,)(,int:n:3,)(c,)").unwrap();
        assert_eq!(desc.inputs, strings(&["a", "b"]));
        assert!(desc.outputs.is_empty());
        assert_eq!(desc.params, vec![ParamDescriptor::new("int", "n", "3")]);
        assert_eq!(desc.categories, strings(&["c"]));
    }

    #[test]
    fn test_empty_default_is_kept() {
        let (_, desc) = parse_descriptor_line("DESC:Op:()()(string:path:)()").unwrap();
        assert_eq!(desc.params, vec![ParamDescriptor::new("string", "path", "")]);
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        let (name, desc) = parse_descriptor_line("DESC:Op:(a)()()()  \r").unwrap();
        assert_eq!(name, "Op");
        assert_eq!(desc.inputs, strings(&["a"]));
    }

    #[test]
    fn test_reject_two_groups() {
        let err = parse_descriptor_line("DESC:Baz:(a)(b)").unwrap_err();
        assert_eq!(err, DescriptorError::GroupCount { found: 2 });
    }

    #[test]
    fn test_reject_five_groups() {
        let err = parse_descriptor_line("DESC:Baz:()()()()()").unwrap_err();
        assert_eq!(err, DescriptorError::GroupCount { found: 5 });
    }

    #[test]
    fn test_reject_missing_name_separator() {
        let err = parse_descriptor_line("DESC:Baz").unwrap_err();
        assert_eq!(err, DescriptorError::MissingNameSeparator);
    }

    #[test]
    fn test_reject_empty_name() {
        let err = parse_descriptor_line("DESC::()()()()").unwrap_err();
        assert_eq!(err, DescriptorError::EmptyName);
    }

    #[test]
    fn test_reject_unwrapped_payload() {
        assert_eq!(
            parse_descriptor_line("DESC:Baz:a)()()()").unwrap_err(),
            DescriptorError::Unwrapped
        );
        assert_eq!(
            parse_descriptor_line("DESC:Baz:()()()(c").unwrap_err(),
            DescriptorError::Unwrapped
        );
    }

    #[test]
    fn test_reject_bad_param_triple() {
        let err = parse_descriptor_line("DESC:Baz:()()(int:x)()").unwrap_err();
        assert_eq!(
            err,
            DescriptorError::ParamArity {
                entry: "int:x".to_string(),
                fields: 2,
            }
        );

        let err = parse_descriptor_line("DESC:Baz:()()(int:x:0:1)()").unwrap_err();
        assert!(matches!(err, DescriptorError::ParamArity { fields: 4, .. }));
    }

    #[test]
    fn test_catalog_ignores_other_lines() {
        let output = "\
[engine] loading plugins
DESC:Foo:(a,b)()(int:x:0)(cat1)
some DESC:Fake:()()()() in the middle
DESC:Bar:()()()()
done
";
        let catalog = parse_catalog(output).unwrap();
        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.names(), vec!["Bar", "Foo"]);
        assert!(!catalog.contains("Fake"));
    }

    #[test]
    fn test_catalog_last_write_wins() {
        let output = "DESC:Foo:(a)()()()\nDESC:Foo:(b,c)(d)()(late)\n";
        let catalog = parse_catalog(output).unwrap();
        assert_eq!(catalog.len(), 1);
        let foo = catalog.get("Foo").unwrap();
        assert_eq!(foo.inputs, strings(&["b", "c"]));
        assert_eq!(foo.outputs, strings(&["d"]));
        assert_eq!(foo.categories, strings(&["late"]));
    }

    #[test]
    fn test_catalog_malformed_line_is_fatal() {
        let output = "DESC:Foo:()()()()\nnoise\nDESC:Baz:(a)(b)\n";
        match parse_catalog(output) {
            Err(Error::Protocol { line, text, source }) => {
                assert_eq!(line, 3);
                assert_eq!(text, "DESC:Baz:(a)(b)");
                assert_eq!(source, DescriptorError::GroupCount { found: 2 });
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_rejects_invalid_utf8_descriptor() {
        let output = b"DESC:Foo:()()()()\nDESC:Bad:(\xff)()()()\n";
        match parse_catalog(output) {
            Err(Error::Protocol { line, source, .. }) => {
                assert_eq!(line, 2);
                assert_eq!(source, DescriptorError::InvalidUtf8);
            }
            other => panic!("expected protocol error, got {:?}", other),
        }
    }

    #[test]
    fn test_catalog_tolerates_binary_noise() {
        let output = b"\xfe\xff engine banner\r\nDESC:Foo:(a)()()()\r\n";
        let catalog = parse_catalog(output).unwrap();
        assert_eq!(catalog.names(), vec!["Foo"]);
        assert_eq!(catalog.get("Foo").unwrap().inputs, strings(&["a"]));
    }

    #[test]
    fn test_catalog_of_empty_output() {
        let catalog = parse_catalog("").unwrap();
        assert!(catalog.is_empty());
    }
}
