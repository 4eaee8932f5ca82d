//! Output generators rendering extracted type records.
//!
//! The extractors hand finished `TypeRecord`s to one of these generators;
//! everything concerning layout and document format lives here.

pub mod base;
pub mod xlsx;
pub mod xml;

use crate::config::Language;
use crate::record::Visibility;

#[derive(Debug, Clone)]
pub enum GeneratorOptions {
    Xlsx(xlsx::XlsxGeneratorOptions),
    Xml(xml::XmlGeneratorOptions),
}

impl GeneratorOptions {
    /// Instantiates the generator described by these options.
    pub fn build(&self) -> Box<dyn base::Generator> {
        match self {
            GeneratorOptions::Xlsx(options) => Box::new(xlsx::XlsxGenerator::new(options.clone())),
            GeneratorOptions::Xml(options) => Box::new(xml::XmlGenerator::new(options.clone())),
        }
    }
}

/// Fixed texts written around the extracted data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub typedef_heading: &'static str,
    pub typedef_columns: [&'static str; 2],
    pub enum_heading: &'static str,
    pub enum_columns: [&'static str; 2],
    pub attribute_suffix: &'static str,
    pub attribute_columns: [&'static str; 3],
    pub method_suffix: &'static str,
    pub function_suffix: &'static str,
    pub function_rows: [&'static str; 5],
    /// Sentence written in place of an empty section.
    pub nothing: &'static str,
    /// Cell text for an empty parameter or return entry.
    pub placeholder: &'static str,
}

impl Labels {
    pub fn for_language(language: Language) -> Self {
        match language {
            Language::Zh => Labels {
                typedef_heading: "类型重定义",
                typedef_columns: ["类型定义", "类型描述"],
                enum_heading: "枚举值定义",
                enum_columns: ["枚举值", "说明"],
                attribute_suffix: "属性",
                attribute_columns: ["属性名称", "数据类型", "数据描述"],
                method_suffix: "方法",
                function_suffix: "方法",
                function_rows: ["函数原型", "函数描述", "参数说明", "返 回 值", "流 程 图"],
                nothing: "无。",
                placeholder: "无",
            },
            Language::En => Labels {
                typedef_heading: "Type Definitions",
                typedef_columns: ["Definition", "Description"],
                enum_heading: "Enumerations",
                enum_columns: ["Value", "Description"],
                attribute_suffix: " Attributes",
                attribute_columns: ["Name", "Type", "Description"],
                method_suffix: " Methods",
                function_suffix: " Method",
                function_rows: [
                    "Prototype",
                    "Description",
                    "Parameters",
                    "Return Value",
                    "Flow Chart",
                ],
                nothing: "None.",
                placeholder: "None",
            },
        }
    }

    /// Heading of a visibility's attribute section (`Public属性`).
    pub fn attribute_heading(&self, visibility: Visibility) -> String {
        format!("{}{}", visibility.label(), self.attribute_suffix)
    }

    /// Heading of a visibility's function section (`Public方法`).
    pub fn method_heading(&self, visibility: Visibility) -> String {
        format!("{}{}", visibility.label(), self.method_suffix)
    }

    /// Heading of a single function, named after the first word of its signature.
    pub fn function_heading(&self, signature: &str) -> String {
        let name = signature.split_whitespace().next().unwrap_or_default();
        format!("{}{}", name, self.function_suffix)
    }
}
