use std::collections::HashSet;
use bytes::Bytes;
use reqwest::Client;
use crate::error::AppError;

/// Lowercase and trim a header the way every loaded table is normalized.
pub fn normalize_header(name: &str) -> String {
    name.to_lowercase().trim().to_string()
}

/// Turn the raw header row into the table's column names.
///
/// Empty cells are named `Unnamed: {index}` after their position in the
/// sheet (`offset` is the sheet column of the first cell). A cell holding
/// only whitespace is not empty and normalizes to `""`. Names are then
/// normalized, and repeats get a `.1`, `.2`, ... suffix.
pub fn header_names(raw: &[Option<String>], offset: usize) -> Vec<String> {
    let mut existing_names = HashSet::new();
    raw.iter()
        .enumerate()
        .map(|(idx, cell)| {
            let name = match cell.as_deref() {
                Some(text) if !text.is_empty() => normalize_header(text),
                _ => normalize_header(&format!("Unnamed: {}", idx + offset)),
            };
            unique_name(name, &mut existing_names)
        })
        .collect()
}

fn unique_name(name: String, existing_names: &mut HashSet<String>) -> String {
    let mut cleaned = name.clone();
    let mut counter = 1;
    while !existing_names.insert(cleaned.clone()) {
        cleaned = format!("{}.{}", name, counter);
        counter += 1;
    }
    cleaned
}

/// Map a session id onto a single safe directory name.
pub fn clean_path_segment(name: &str) -> String {
    let cleaned = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect::<String>()
        .to_lowercase();

    if cleaned.chars().next().map_or(true, |c| !c.is_alphabetic()) {
        format!("session_{}", cleaned)
    } else {
        cleaned
    }
}

pub async fn load_file_from_url(url: &str) -> Result<Bytes, AppError> {
    let client = Client::new();
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| AppError::HttpError(format!("Failed to fetch file: {}", e)))?;

    if !response.status().is_success() {
        return Err(AppError::FileProcessingError(
            format!("Failed to fetch file. Status: {}", response.status())
        ));
    }

    response
        .bytes()
        .await
        .map_err(|e| AppError::HttpError(format!("Failed to read response bytes: {}", e)))
}
