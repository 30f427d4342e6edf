//! CSV export of normalized paper records.
//!
//! One file per export call; repeated exports for the same term on the same
//! day overwrite the previous file.

use std::fs;
use std::path::{Path, PathBuf};

use chrono::Local;
use thiserror::Error;
use tracing::info;

use crate::models::Paper;

/// CSV column headers, in the fixed export order
pub const CSV_HEADERS: [&str; 9] = [
    "Title",
    "Authors",
    "Citation Count",
    "Publication Year",
    "URL",
    "Search Term",
    "Abstract",
    "AI Summary",
    "Main Findings",
];

/// Errors that can occur while writing a CSV export
#[derive(Debug, Error)]
pub enum ExportError {
    /// File system error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV serialization error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Export papers to `output/{search_term}_top10_{YYYY-MM-DD}.csv`.
///
/// The `output` directory is created if absent. Returns the path of the
/// written file.
pub fn export_to_csv(papers: &[Paper], search_term: &str) -> Result<PathBuf, ExportError> {
    export_to_csv_in(Path::new("output"), papers, search_term)
}

/// Export papers to a CSV file under the given directory.
pub fn export_to_csv_in(
    dir: &Path,
    papers: &[Paper],
    search_term: &str,
) -> Result<PathBuf, ExportError> {
    fs::create_dir_all(dir)?;

    let date = Local::now().format("%Y-%m-%d");
    let path = dir.join(format!("{search_term}_top10_{date}.csv"));

    let mut writer = csv::Writer::from_path(&path)?;
    writer.write_record(CSV_HEADERS)?;
    for paper in papers {
        let authors = paper.author_names();
        let citations = paper.citation_count.to_string();
        let year = paper.publication_year.to_string();
        writer.write_record([
            paper.title.as_str(),
            authors.as_str(),
            citations.as_str(),
            year.as_str(),
            paper.url.as_str(),
            paper.search_term.as_str(),
            paper.r#abstract.as_str(),
            paper.ai_summary.as_str(),
            paper.main_findings.as_str(),
        ])?;
    }
    writer.flush()?;

    info!(count = papers.len(), path = %path.display(), "exported papers");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Author;

    fn sample_papers() -> Vec<Paper> {
        vec![
            Paper {
                title: "Test Paper 1".to_string(),
                authors: vec![Author::new("John Doe", Some("University 1".to_string()))],
                citation_count: 100,
                publication_year: 2023,
                r#abstract: "Test abstract 1".to_string(),
                url: "https://doi.org/10.1/one".to_string(),
                search_term: "test".to_string(),
                ai_summary: String::new(),
                main_findings: String::new(),
            },
            Paper {
                title: "Test Paper 2".to_string(),
                authors: vec![Author::new("Jane Smith", Some("University 2".to_string()))],
                citation_count: 50,
                publication_year: 2022,
                r#abstract: "Test abstract 2".to_string(),
                url: String::new(),
                search_term: "test".to_string(),
                ai_summary: String::new(),
                main_findings: String::new(),
            },
        ]
    }

    #[test]
    fn test_export_writes_header_and_rows_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_csv_in(dir.path(), &sample_papers(), "test").unwrap();
        assert!(path.exists());

        let contents = fs::read_to_string(&path).unwrap();
        let mut lines = contents.lines();
        assert_eq!(
            lines.next().unwrap(),
            "Title,Authors,Citation Count,Publication Year,URL,Search Term,\
Abstract,AI Summary,Main Findings"
        );

        let row1 = lines.next().unwrap();
        assert!(row1.starts_with("Test Paper 1,John Doe,100,2023,"));
        // Placeholder columns stay empty.
        assert!(row1.ends_with(",,"));
        let row2 = lines.next().unwrap();
        assert!(row2.starts_with("Test Paper 2,Jane Smith,50,2022,"));
        assert!(lines.next().is_none());
    }

    #[test]
    fn test_export_filename_pattern() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_csv_in(dir.path(), &[], "graphene").unwrap();
        let name = path.file_name().unwrap().to_string_lossy();
        let date = Local::now().format("%Y-%m-%d").to_string();
        assert_eq!(name, format!("graphene_top10_{date}.csv"));
    }

    #[test]
    fn test_export_empty_still_writes_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = export_to_csv_in(dir.path(), &[], "test").unwrap();
        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.lines().count(), 1);
    }

    #[test]
    fn test_export_creates_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("output");
        let path = export_to_csv_in(&nested, &sample_papers(), "test").unwrap();
        assert!(path.exists());
    }
}
