use crate::generator::base::Generator;
use crate::record::TypeRecord;
use anyhow::Result;
use quick_xml::se::Serializer;
use serde::Serialize;
use std::io::Write;

#[derive(Debug, Clone, Default)]
pub struct XmlGeneratorOptions {
    /// Pretty-print with this many spaces per nesting level. `None` writes
    /// the whole document on one line.
    pub indent: Option<usize>,
}

/// Writes every record as a `<type>` element under one `<types>` root.
pub struct XmlGenerator {
    options: XmlGeneratorOptions,
}

#[derive(Serialize)]
#[serde(rename = "types")]
struct TypesDocument<'a> {
    #[serde(rename = "type")]
    types: &'a [TypeRecord],
}

impl XmlGenerator {
    pub fn new(options: XmlGeneratorOptions) -> Self {
        XmlGenerator { options }
    }
}

impl Generator for XmlGenerator {
    fn output(&self, records: &[TypeRecord], writer: &mut dyn Write) -> Result<()> {
        let mut document = String::new();
        let mut serializer = Serializer::new(&mut document);
        if let Some(width) = self.options.indent {
            serializer.indent(' ', width);
        }
        TypesDocument { types: records }.serialize(serializer)?;

        writeln!(writer, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
        writeln!(writer, "{}", document)?;
        Ok(())
    }
}
