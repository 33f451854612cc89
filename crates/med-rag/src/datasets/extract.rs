//! Format-specific dataset extraction

use serde_json::Value;
use std::path::Path;
use walkdir::WalkDir;

use crate::error::{Error, Result};
use crate::types::{DatasetFormat, IngestedDocument};

/// JSON object fields treated as the document text, in lookup order
const TEXT_FIELDS: &[&str] = &["text", "content", "body", "description"];

/// Extract searchable documents from a dataset file
pub fn extract(path: &Path, format: DatasetFormat, text_column: &str) -> Result<Vec<IngestedDocument>> {
    let dataset = dataset_name(path);
    match format {
        DatasetFormat::Json => extract_json(path, &dataset),
        DatasetFormat::Csv => extract_csv(path, &dataset, text_column),
        DatasetFormat::Pdf => extract_pdf_batch(path, &dataset),
    }
}

fn dataset_name(path: &Path) -> String {
    path.file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("dataset")
        .to_string()
}

/// JSON: one document per array element. Question/answer pairs and known
/// text fields are formatted; anything else is serialized whole.
fn extract_json(path: &Path, dataset: &str) -> Result<Vec<IngestedDocument>> {
    let raw = std::fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&raw)?;
    let source = path.to_string_lossy().to_string();

    let elements: Vec<Value> = match value {
        Value::Array(items) => items,
        other => vec![other],
    };

    let mut documents = Vec::with_capacity(elements.len());
    for (index, element) in elements.into_iter().enumerate() {
        let content = json_element_text(&element);
        if content.trim().is_empty() {
            continue;
        }
        documents.push(
            IngestedDocument::new(dataset, source.clone(), content)
                .with_extra("index", serde_json::json!(index)),
        );
    }

    Ok(documents)
}

fn json_element_text(element: &Value) -> String {
    match element {
        Value::String(s) => s.clone(),
        Value::Object(obj) => {
            // Question/answer records keep both halves searchable
            if let Some(question) = obj.get("question").and_then(|v| v.as_str()) {
                let answer = obj
                    .get("answer")
                    .or_else(|| obj.get("ground_truth"))
                    .and_then(|v| v.as_str())
                    .unwrap_or_default();
                return format!("Question: {}\nAnswer: {}", question, answer);
            }

            for field in TEXT_FIELDS {
                if let Some(text) = obj.get(*field).and_then(|v| v.as_str()) {
                    return text.to_string();
                }
            }

            element.to_string()
        }
        other => other.to_string(),
    }
}

/// CSV: one document per row. The designated text column wins when the
/// header has it; otherwise every column becomes a "Header: value" line.
fn extract_csv(path: &Path, dataset: &str, text_column: &str) -> Result<Vec<IngestedDocument>> {
    let mut reader = csv::Reader::from_path(path)
        .map_err(|e| Error::internal(format!("Cannot open CSV {}: {}", path.display(), e)))?;

    let headers = reader
        .headers()
        .map_err(|e| Error::internal(format!("Cannot read CSV headers: {}", e)))?
        .clone();

    let text_index = headers
        .iter()
        .position(|h| h.eq_ignore_ascii_case(text_column));

    let source = path.to_string_lossy().to_string();
    let mut documents = Vec::new();

    for (row, record) in reader.records().enumerate() {
        let record = match record {
            Ok(r) => r,
            Err(e) => {
                tracing::warn!("Skipping malformed CSV row {}: {}", row + 2, e);
                continue;
            }
        };

        let content = match text_index {
            Some(index) => record.get(index).unwrap_or_default().to_string(),
            None => headers
                .iter()
                .zip(record.iter())
                .filter(|(_, value)| !value.trim().is_empty())
                .map(|(header, value)| format!("{}: {}", header, value))
                .collect::<Vec<_>>()
                .join("\n"),
        };

        if content.trim().is_empty() {
            continue;
        }

        documents.push(
            IngestedDocument::new(dataset, source.clone(), content)
                .with_extra("row", serde_json::json!(row + 1)),
        );
    }

    Ok(documents)
}

/// PDF: directory-level batch. Every .pdf next to the requested file is
/// extracted, one document per file.
fn extract_pdf_batch(path: &Path, dataset: &str) -> Result<Vec<IngestedDocument>> {
    let directory = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir,
        _ => Path::new("."),
    };

    let mut pdf_paths: Vec<std::path::PathBuf> = WalkDir::new(directory)
        .max_depth(1)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .filter(|p| {
            p.extension()
                .and_then(|e| e.to_str())
                .map(|e| e.eq_ignore_ascii_case("pdf"))
                .unwrap_or(false)
        })
        .collect();
    pdf_paths.sort();

    let mut documents = Vec::new();
    for pdf_path in pdf_paths {
        match extract_pdf_text(&pdf_path) {
            Ok(text) if !text.trim().is_empty() => {
                let pages = pdf_page_count(&pdf_path);
                let mut doc = IngestedDocument::new(
                    dataset,
                    pdf_path.to_string_lossy().to_string(),
                    text,
                );
                if let Some(pages) = pages {
                    doc = doc.with_extra("pages", serde_json::json!(pages));
                }
                documents.push(doc);
            }
            Ok(_) => {
                tracing::warn!("No text extracted from {}", pdf_path.display());
            }
            Err(e) => {
                tracing::warn!("Skipping {}: {}", pdf_path.display(), e);
            }
        }
    }

    Ok(documents)
}

fn extract_pdf_text(path: &Path) -> Result<String> {
    let text = pdf_extract::extract_text(path)
        .map_err(|e| Error::internal(format!("PDF extraction failed: {}", e)))?;
    Ok(normalize_extracted_text(&text))
}

fn pdf_page_count(path: &Path) -> Option<usize> {
    lopdf::Document::load(path)
        .map(|doc| doc.get_pages().len())
        .ok()
}

/// Collapse extraction artifacts: normalized newlines, at most one blank
/// line in a row, trimmed ends.
fn normalize_extracted_text(text: &str) -> String {
    let unified = text.replace("\r\n", "\n");
    let mut result = String::with_capacity(unified.len());
    let mut blank_run = 0;

    for line in unified.lines() {
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        result.push_str(line.trim_end());
        result.push('\n');
    }

    result.trim().to_string()
}
