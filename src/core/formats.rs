// DataLoader - core/formats.rs
//
// Format tags and the parsing collaborators behind each loader.
// Parsing itself is delegated to third-party crates (csv, serde_json,
// scraper, quick-xml, lopdf); this module only shapes their output into
// `LoadedData`.

use crate::core::model::{LoadedData, Table};
use crate::util::error::LoadError;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Format tags
// =============================================================================

/// Every input format a loader exists for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FileFormat {
    Csv,
    Json,
    Html,
    Xml,
    Pdf,
}

impl FileFormat {
    pub fn all() -> &'static [FileFormat] {
        &[
            FileFormat::Csv,
            FileFormat::Json,
            FileFormat::Html,
            FileFormat::Xml,
            FileFormat::Pdf,
        ]
    }

    /// Resolve a tag such as `"csv"`. Matching is exact: tags are lowercase.
    pub fn from_tag(tag: &str) -> Option<FileFormat> {
        match tag {
            "csv" => Some(FileFormat::Csv),
            "json" => Some(FileFormat::Json),
            "html" => Some(FileFormat::Html),
            "xml" => Some(FileFormat::Xml),
            "pdf" => Some(FileFormat::Pdf),
            _ => None,
        }
    }

    pub fn tag(&self) -> &'static str {
        match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Html => "html",
            FileFormat::Xml => "xml",
            FileFormat::Pdf => "pdf",
        }
    }

    /// Uppercase name used in log messages.
    pub fn label(&self) -> &'static str {
        match self {
            FileFormat::Csv => "CSV",
            FileFormat::Json => "JSON",
            FileFormat::Html => "HTML",
            FileFormat::Xml => "XML",
            FileFormat::Pdf => "PDF",
        }
    }

    /// Run the format's parser over raw bytes.
    pub fn parse(&self, bytes: &[u8]) -> Result<LoadedData, LoadError> {
        match self {
            FileFormat::Csv => parse_csv(bytes).map(LoadedData::Table),
            FileFormat::Json => parse_json(bytes).map(LoadedData::Table),
            FileFormat::Html => parse_html(bytes).map(LoadedData::Table),
            FileFormat::Xml => parse_xml(bytes).map(LoadedData::Table),
            FileFormat::Pdf => extract_pdf_text(bytes).map(LoadedData::Text),
        }
    }
}

impl std::fmt::Display for FileFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.tag())
    }
}

// =============================================================================
// CSV
// =============================================================================

/// First record is the header. Short rows are padded; long rows are an
/// error.
pub fn parse_csv(bytes: &[u8]) -> Result<Table, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(bytes);

    let headers = reader.headers()?.clone();
    if headers.is_empty() {
        return Err(LoadError::Empty);
    }

    let mut table = Table::new(headers.iter().map(|h| h.trim().to_string()).collect());
    let width = table.columns.len();

    for result in reader.records() {
        let record = result?;
        if record.len() > width {
            let line = record.position().map(|p| p.line()).unwrap_or_default();
            return Err(LoadError::Shape {
                reason: format!(
                    "Error tokenizing data. Expected {width} fields in line {line}, saw {}",
                    record.len()
                ),
            });
        }
        let mut row: Vec<String> = record.iter().map(str::to_string).collect();
        row.resize(width, String::new());
        table.rows.push(row);
    }

    Ok(table)
}

// =============================================================================
// JSON
// =============================================================================

fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Accepts an array of records (objects or scalars) or a column-oriented
/// object whose values are arrays or index-keyed objects.
pub fn parse_json(bytes: &[u8]) -> Result<Table, LoadError> {
    let value: Value = serde_json::from_slice(bytes)?;

    match value {
        Value::Array(items) => {
            let records = items
                .iter()
                .map(|item| match item {
                    Value::Object(map) => map
                        .iter()
                        .map(|(k, v)| (k.clone(), cell_text(v)))
                        .collect(),
                    scalar => vec![("0".to_string(), cell_text(scalar))],
                })
                .collect();
            Ok(Table::from_records(records))
        }
        Value::Object(columns) => {
            let mut index: Vec<String> = Vec::new();
            let mut cells: Vec<(String, Vec<(String, String)>)> = Vec::new();

            for (column, values) in &columns {
                let entries: Vec<(String, String)> = match values {
                    Value::Array(a) => a
                        .iter()
                        .enumerate()
                        .map(|(i, v)| (i.to_string(), cell_text(v)))
                        .collect(),
                    Value::Object(o) => o.iter().map(|(k, v)| (k.clone(), cell_text(v))).collect(),
                    _ => {
                        return Err(LoadError::Shape {
                            reason: "If using all scalar values, you must pass an index"
                                .to_string(),
                        })
                    }
                };
                for (key, _) in &entries {
                    if !index.contains(key) {
                        index.push(key.clone());
                    }
                }
                cells.push((column.clone(), entries));
            }

            let mut table = Table::new(cells.iter().map(|(c, _)| c.clone()).collect());
            for key in &index {
                let row = cells
                    .iter()
                    .map(|(_, entries)| {
                        entries
                            .iter()
                            .find(|(k, _)| k == key)
                            .map(|(_, v)| v.clone())
                            .unwrap_or_default()
                    })
                    .collect();
                table.rows.push(row);
            }
            Ok(table)
        }
        _ => Err(LoadError::Shape {
            reason: "expected a JSON array or object".to_string(),
        }),
    }
}

// =============================================================================
// HTML
// =============================================================================

fn selector(css: &'static str) -> Result<scraper::Selector, LoadError> {
    scraper::Selector::parse(css).map_err(|e| LoadError::Shape {
        reason: format!("invalid selector '{css}': {e:?}"),
    })
}

/// First `<table>` in the document. A leading row made only of `<th>`
/// cells becomes the header; otherwise columns are numbered from 0.
pub fn parse_html(bytes: &[u8]) -> Result<Table, LoadError> {
    let text = std::str::from_utf8(bytes)?;
    let document = scraper::Html::parse_document(text);
    let table_sel = selector("table")?;
    let row_sel = selector("tr")?;
    let cell_sel = selector("th, td")?;

    let table = document.select(&table_sel).next().ok_or(LoadError::NoTables)?;

    let mut header: Option<Vec<String>> = None;
    let mut rows: Vec<Vec<String>> = Vec::new();

    for tr in table.select(&row_sel) {
        let cells: Vec<scraper::ElementRef> = tr.select(&cell_sel).collect();
        if cells.is_empty() {
            continue;
        }
        let all_th = cells.iter().all(|c| c.value().name() == "th");
        let texts: Vec<String> = cells
            .iter()
            .map(|c| c.text().collect::<Vec<_>>().join(" "))
            .map(|t| t.split_whitespace().collect::<Vec<_>>().join(" "))
            .collect();

        if header.is_none() && rows.is_empty() && all_th {
            header = Some(texts);
        } else {
            rows.push(texts);
        }
    }

    let width = rows
        .iter()
        .map(Vec::len)
        .chain(header.as_ref().map(Vec::len))
        .max()
        .unwrap_or(0);
    if width == 0 {
        return Err(LoadError::Empty);
    }

    let mut columns = header.unwrap_or_default();
    for i in columns.len()..width {
        columns.push(i.to_string());
    }

    let mut out = Table::new(columns);
    for mut row in rows {
        row.resize(width, String::new());
        out.rows.push(row);
    }
    Ok(out)
}

// =============================================================================
// XML
// =============================================================================

fn junk_after_root() -> LoadError {
    LoadError::Shape {
        reason: "junk after document element".to_string(),
    }
}

/// One row per child of the root element; one column per grandchild tag,
/// holding that element's leading text (text after a nested child is
/// not part of it). The document must have exactly one root element.
pub fn parse_xml(bytes: &[u8]) -> Result<Table, LoadError> {
    use quick_xml::events::Event;

    let text = std::str::from_utf8(bytes)?;
    let mut reader = quick_xml::Reader::from_str(text);
    reader.trim_text(true);

    let mut depth = 0usize;
    let mut saw_root = false;
    let mut root_closed = false;
    let mut records: Vec<Vec<(String, String)>> = Vec::new();
    let mut current: Vec<(String, String)> = Vec::new();
    let mut field: Option<(String, String)> = None;
    // Only the text before a field's first child belongs to the field.
    let mut field_text_done = false;

    loop {
        match reader.read_event()? {
            Event::Start(e) => {
                if root_closed {
                    return Err(junk_after_root());
                }
                depth += 1;
                saw_root = true;
                match depth {
                    1 => {}
                    2 => current = Vec::new(),
                    3 => {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        field = Some((name, String::new()));
                        field_text_done = false;
                    }
                    _ => field_text_done = true,
                }
            }
            Event::Empty(e) => {
                if root_closed {
                    return Err(junk_after_root());
                }
                match depth + 1 {
                    1 => {
                        saw_root = true;
                        root_closed = true;
                    }
                    2 => records.push(Vec::new()),
                    3 => {
                        let name = String::from_utf8_lossy(e.name().as_ref()).into_owned();
                        current.push((name, String::new()));
                    }
                    _ => field_text_done = true,
                }
            }
            Event::Text(t) => {
                if root_closed {
                    return Err(junk_after_root());
                }
                if depth == 3 && !field_text_done {
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&t.unescape()?);
                    }
                }
            }
            Event::CData(c) => {
                if depth == 3 && !field_text_done {
                    if let Some((_, value)) = field.as_mut() {
                        value.push_str(&String::from_utf8_lossy(&c));
                    }
                }
            }
            Event::End(_) => {
                match depth {
                    3 => {
                        if let Some(f) = field.take() {
                            current.push(f);
                        }
                    }
                    2 => records.push(std::mem::take(&mut current)),
                    1 => root_closed = true,
                    _ => {}
                }
                depth = depth.saturating_sub(1);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if !saw_root {
        return Err(LoadError::Shape {
            reason: "no element found".to_string(),
        });
    }
    if depth != 0 {
        return Err(LoadError::Shape {
            reason: "no element found: document ends inside an open element".to_string(),
        });
    }

    Ok(Table::from_records(records))
}

// =============================================================================
// PDF
// =============================================================================

/// Concatenated text of every page, in page order.
pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, LoadError> {
    let document = lopdf::Document::load_mem(bytes)?;
    let mut text = String::new();
    for page in document.get_pages().keys() {
        text.push_str(&document.extract_text(&[*page])?);
    }
    Ok(text)
}

/// A one-page PDF showing `text` in a standard font.
#[cfg(test)]
pub(crate) fn single_page_pdf(text: &str) -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![72.into(), 720.into()]),
            Operation::new("Tj", vec![Object::string_literal(text)]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(dictionary! {}, content.encode().unwrap()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
