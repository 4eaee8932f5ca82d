//! Generator markup markers and language selection.
//!
//! Doxygen localises the headings it writes into class pages, so every text
//! marker the extractors look for is collected here rather than hard-coded.

use clap::ValueEnum;

use crate::record::Visibility;

/// Language of the Doxygen output being read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum Language {
    /// `OUTPUT_LANGUAGE = Chinese`
    #[default]
    Zh,
    /// `OUTPUT_LANGUAGE = English`
    En,
}

impl Language {
    pub fn captions(self) -> Captions {
        match self {
            Language::Zh => Captions::default(),
            Language::En => Captions::english(),
        }
    }
}

/// Text markers identifying sections of a generated page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Captions {
    /// Heading preceding the type's description block.
    pub detailed_description: String,
    /// Suffix of the per-visibility attribute table caption (`Public 属性`).
    pub attributes: String,
    /// Suffix of the per-visibility function table caption (`Public 成员函数`).
    pub member_functions: String,
    /// Link text pointing from a summary row to its detail block.
    pub more_marker: String,
    /// Header cell text of an enumeration value table.
    pub enum_values: String,
    /// Keyword identifying type alias rows.
    pub typedef_keyword: String,
    /// File name of the "all types" listing inside the html directory.
    pub index_file: String,
    /// Text standing in for a missing description.
    pub placeholder: String,
    /// Separator placed between joined description paragraphs.
    pub paragraph_separator: String,
}

impl Default for Captions {
    fn default() -> Self {
        Captions {
            detailed_description: "详细描述".to_string(),
            attributes: "属性".to_string(),
            member_functions: "成员函数".to_string(),
            more_marker: "更多...".to_string(),
            enum_values: "枚举值".to_string(),
            typedef_keyword: "typedef".to_string(),
            index_file: "annotated.html".to_string(),
            placeholder: "无".to_string(),
            paragraph_separator: "。".to_string(),
        }
    }
}

impl Captions {
    pub fn english() -> Self {
        Captions {
            detailed_description: "Detailed Description".to_string(),
            attributes: "Attributes".to_string(),
            member_functions: "Member Functions".to_string(),
            more_marker: "More...".to_string(),
            enum_values: "Enumerator".to_string(),
            typedef_keyword: "typedef".to_string(),
            index_file: "annotated.html".to_string(),
            placeholder: "None".to_string(),
            // English paragraphs end with their own full stop.
            paragraph_separator: " ".to_string(),
        }
    }

    /// Caption of the attribute table for `visibility`, e.g. `Public 属性`.
    pub fn attribute_caption(&self, visibility: Visibility) -> String {
        format!("{} {}", visibility.label(), self.attributes)
    }

    /// Caption of the member function table for `visibility`.
    pub fn function_caption(&self, visibility: Visibility) -> String {
        format!("{} {}", visibility.label(), self.member_functions)
    }

    /// Returns `text`, or the placeholder when `text` is empty.
    pub fn or_placeholder(&self, text: String) -> String {
        if text.is_empty() {
            self.placeholder.clone()
        } else {
            text
        }
    }
}
