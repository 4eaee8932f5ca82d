use crate::config::Language;
use crate::generator::base::Generator;
use crate::generator::Labels;
use crate::record::{MemberFunction, TypeRecord};
use anyhow::Result;
use regex::Regex;
use rust_xlsxwriter::{Color, ColNum, Format, FormatAlign, FormatBorder, RowNum, Workbook, Worksheet};
use std::collections::HashSet;
use std::io::Write;

/// Longest sheet name accepted by spreadsheet applications.
const MAX_SHEET_NAME: usize = 31;

#[derive(Debug, Clone, Default)]
pub struct XlsxGeneratorOptions {
    /// Language of the fixed labels.
    pub language: Language,
    /// If true, set the background color of all cells to white.
    pub shironuri: bool,
}

/// Writes one worksheet per type.
pub struct XlsxGenerator {
    options: XlsxGeneratorOptions,
}

impl XlsxGenerator {
    pub fn new(options: XlsxGeneratorOptions) -> Self {
        XlsxGenerator { options }
    }

    /// Lays out `record` on `worksheet` in document order: title, description,
    /// typedefs, enumerations, attributes per visibility, functions per
    /// visibility.
    pub fn output_to_worksheet(&self, worksheet: &mut Worksheet, record: &TypeRecord) -> Result<()> {
        let labels = Labels::for_language(self.options.language);
        let formats = Formats::new(self.options.shironuri);

        if self.options.shironuri {
            let cell_format = Format::new().set_background_color(Color::White);
            worksheet.set_column_range_format(0, 16383, &cell_format)?;
        }
        worksheet.set_column_width(0, 18)?;
        worksheet.set_column_width(1, 50)?;
        worksheet.set_column_width(2, 40)?;

        let mut sheet = SheetWriter {
            worksheet,
            formats: &formats,
            labels: &labels,
            row: 0,
        };

        sheet.line(record.name(), Style::Title)?;
        sheet.line(record.description(), Style::Body)?;
        sheet.row += 1;

        sheet.line(labels.typedef_heading, Style::Heading)?;
        let typedef_rows: Vec<Vec<String>> = record
            .typedefs()
            .iter()
            .map(|t| vec![t.declaration.clone(), t.description.clone()])
            .collect();
        sheet.table(&labels.typedef_columns, &typedef_rows)?;

        sheet.line(labels.enum_heading, Style::Heading)?;
        let enum_rows: Vec<Vec<String>> = record
            .enum_values()
            .iter()
            .map(|e| vec![e.value_name.clone(), e.description.clone()])
            .collect();
        sheet.table(&labels.enum_columns, &enum_rows)?;

        for (visibility, variables) in record.variables().iter() {
            sheet.line(&labels.attribute_heading(visibility), Style::Heading)?;
            let rows: Vec<Vec<String>> = variables
                .iter()
                .map(|v| {
                    vec![
                        v.name.clone(),
                        v.declared_type.clone(),
                        v.short_description.clone(),
                    ]
                })
                .collect();
            sheet.table(&labels.attribute_columns, &rows)?;
        }

        for (visibility, functions) in record.functions().iter() {
            sheet.line(&labels.method_heading(visibility), Style::Heading)?;
            if functions.is_empty() {
                sheet.line(labels.nothing, Style::Body)?;
                sheet.row += 1;
                continue;
            }
            for function in functions {
                sheet.line(&labels.function_heading(&function.signature), Style::Subheading)?;
                sheet.function_table(function)?;
            }
        }

        Ok(())
    }
}

impl Generator for XlsxGenerator {
    fn output(&self, records: &[TypeRecord], writer: &mut dyn Write) -> Result<()> {
        let mut workbook = Workbook::new();
        let mut sheet_names = SheetNames::new()?;

        if records.is_empty() {
            workbook.add_worksheet();
        }
        for (index, record) in records.iter().enumerate() {
            let worksheet = workbook.add_worksheet();
            worksheet.set_name(sheet_names.unique(record.name(), index))?;
            self.output_to_worksheet(worksheet, record)?;
        }

        let buffer = workbook.save_to_buffer()?;
        writer.write_all(&buffer)?;
        Ok(())
    }
}

/// The declaration cell of a function: template line, then type and signature.
pub fn prototype(function: &MemberFunction) -> String {
    let declaration = if function.declared_type.is_empty() {
        function.signature.clone()
    } else {
        format!("{} {}", function.declared_type, function.signature)
    };
    if function.template_description.is_empty() {
        declaration
    } else {
        format!("{}\n{}", function.template_description, declaration)
    }
}

#[derive(Debug, Clone, Copy)]
enum Style {
    Title,
    Heading,
    Subheading,
    Body,
}

struct Formats {
    title: Format,
    heading: Format,
    subheading: Format,
    body: Format,
    header: Format,
    cell: Format,
}

impl Formats {
    fn new(shironuri: bool) -> Self {
        let base = if shironuri {
            Format::new().set_background_color(Color::White)
        } else {
            Format::new()
        };
        Formats {
            title: base.clone().set_bold().set_font_size(16),
            heading: base.clone().set_bold().set_font_size(13),
            subheading: base.clone().set_bold(),
            body: base.clone(),
            header: base
                .clone()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_text_wrap(),
            cell: base
                .set_border(FormatBorder::Thin)
                .set_text_wrap()
                .set_align(FormatAlign::Top),
        }
    }

    fn get(&self, style: Style) -> &Format {
        match style {
            Style::Title => &self.title,
            Style::Heading => &self.heading,
            Style::Subheading => &self.subheading,
            Style::Body => &self.body,
        }
    }
}

/// Row cursor over one worksheet.
struct SheetWriter<'w> {
    worksheet: &'w mut Worksheet,
    formats: &'w Formats,
    labels: &'w Labels,
    row: RowNum,
}

impl SheetWriter<'_> {
    fn line(&mut self, text: &str, style: Style) -> Result<()> {
        let format = self.formats.get(style);
        self.worksheet
            .write_string_with_format(self.row, 0, text, format)?;
        self.row += 1;
        Ok(())
    }

    /// A bordered table with a header row, or the "nothing" sentence when
    /// `rows` is empty. Leaves one blank row after it.
    fn table(&mut self, header: &[&str], rows: &[Vec<String>]) -> Result<()> {
        if rows.is_empty() {
            self.line(self.labels.nothing, Style::Body)?;
            self.row += 1;
            return Ok(());
        }

        let formats = self.formats;
        for (col_index, label) in header.iter().enumerate() {
            self.worksheet.write_string_with_format(
                self.row,
                col_index as ColNum,
                *label,
                &formats.header,
            )?;
        }
        self.row += 1;

        for values in rows {
            for (col_index, value) in values.iter().enumerate() {
                self.worksheet.write_string_with_format(
                    self.row,
                    col_index as ColNum,
                    value.as_str(),
                    &formats.cell,
                )?;
            }
            self.row += 1;
        }
        self.row += 1;
        Ok(())
    }

    /// Two-column table describing one function.
    fn function_table(&mut self, function: &MemberFunction) -> Result<()> {
        let placeholder = self.labels.placeholder;
        let parameters = if function.parameter_docs.is_empty() {
            placeholder.to_string()
        } else {
            function.parameter_docs.join("\n")
        };
        let return_doc = if function.return_doc.is_empty() {
            placeholder.to_string()
        } else {
            function.return_doc.clone()
        };
        let values = [
            prototype(function),
            function.description.clone(),
            parameters,
            return_doc,
            placeholder.to_string(),
        ];

        let formats = self.formats;
        for (label, value) in self.labels.function_rows.iter().zip(values.iter()) {
            self.worksheet
                .write_string_with_format(self.row, 0, *label, &formats.header)?;
            self.worksheet
                .write_string_with_format(self.row, 1, value.as_str(), &formats.cell)?;
            self.row += 1;
        }
        self.row += 1;
        Ok(())
    }
}

/// Produces unique, valid worksheet names from type names.
struct SheetNames {
    invalid: Regex,
    used: HashSet<String>,
}

impl SheetNames {
    fn new() -> Result<Self> {
        Ok(SheetNames {
            invalid: Regex::new(r"[\[\]:*?/\\]")?,
            used: HashSet::new(),
        })
    }

    /// Sheet name for the `index`-th record named `name`.
    fn unique(&mut self, name: &str, index: usize) -> String {
        let cleaned = self.invalid.replace_all(name, "_");
        let cleaned = cleaned.trim_matches('\'');
        let base: String = if cleaned.is_empty() {
            format!("Type{}", index + 1)
        } else {
            cleaned.chars().take(MAX_SHEET_NAME).collect()
        };

        let mut candidate = base.clone();
        let mut counter = 2;
        // Sheet names compare case-insensitively.
        while self.used.contains(&candidate.to_lowercase()) {
            let suffix = format!("~{}", counter);
            let keep = MAX_SHEET_NAME - suffix.chars().count();
            candidate = base.chars().take(keep).collect::<String>() + &suffix;
            counter += 1;
        }
        self.used.insert(candidate.to_lowercase());
        candidate
    }
}
