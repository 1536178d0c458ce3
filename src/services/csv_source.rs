//! CSV dataset source
//!
//! Stands in for the query pipeline: answers every `query.execute` with the
//! rows of a CSV file (or the bundled sample) tagged with the query text.
//! The query itself is never interpreted.

use crate::bus::{Bus, Payload, MSG_QUERY_DATASET, MSG_QUERY_ERROR, MSG_QUERY_EXECUTE};
use crate::model::Dataset;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

const SAMPLE_CSV: &str = include_str!("../../assets/sample.csv");

/// Where rows come from
#[derive(Debug, Clone)]
pub enum CsvSource {
    File(PathBuf),
    Sample,
}

impl CsvSource {
    pub fn from_path(path: Option<PathBuf>) -> Self {
        path.map_or(CsvSource::Sample, CsvSource::File)
    }

    /// Answer `query.execute` requests on the bus
    pub fn attach(self, bus: &Bus) {
        bus.subscribe(MSG_QUERY_EXECUTE, move |bus, payload| {
            let Payload::Query(query) = payload else {
                return;
            };
            match self.load(query) {
                Ok(dataset) => {
                    tracing::info!(rows = dataset.rows.len(), "dataset ready");
                    bus.publish(MSG_QUERY_DATASET, Payload::Dataset(dataset));
                }
                Err(err) => {
                    tracing::warn!(error = %format!("{:#}", err), "query failed");
                    bus.publish(MSG_QUERY_ERROR, Payload::Error(format!("{:#}", err)));
                }
            }
        });
    }

    /// Load the dataset for a query
    pub fn load(&self, query: &str) -> Result<Dataset> {
        if query.trim().is_empty() {
            anyhow::bail!("query is empty");
        }
        let (headers, rows) = match self {
            CsvSource::File(path) => {
                let file = File::open(path)
                    .with_context(|| format!("cannot open data file {}", path.display()))?;
                read_csv(file).with_context(|| format!("cannot read {}", path.display()))?
            }
            CsvSource::Sample => read_csv(SAMPLE_CSV.as_bytes())?,
        };
        Ok(Dataset::new(query).with_data(headers, rows))
    }

    pub fn describe(&self) -> String {
        match self {
            CsvSource::File(path) => display_name(path),
            CsvSource::Sample => "sample.csv".to_string(),
        }
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

fn read_csv<R: Read>(reader: R) -> Result<(Vec<String>, Vec<Vec<String>>)> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(reader);
    let headers = reader.headers()?.iter().map(str::to_string).collect();
    let mut rows = Vec::new();
    for record in reader.records() {
        rows.push(record?.iter().map(str::to_string).collect());
    }
    Ok((headers, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::io::Write;
    use std::rc::Rc;

    #[test]
    fn test_sample_source_loads() {
        let dataset = CsvSource::Sample.load("select * from trades").unwrap();
        assert_eq!(dataset.query, "select * from trades");
        assert!(!dataset.headers.is_empty());
        assert!(!dataset.rows.is_empty());
    }

    #[test]
    fn test_file_source_loads() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "name,value\na,1\nb,2").unwrap();

        let source = CsvSource::from_path(Some(file.path().to_path_buf()));
        let dataset = source.load("q").unwrap();
        assert_eq!(dataset.headers, vec!["name", "value"]);
        assert_eq!(dataset.rows, vec![vec!["a", "1"], vec!["b", "2"]]);
    }

    #[test]
    fn test_empty_query_rejected() {
        assert!(CsvSource::Sample.load("   ").is_err());
    }

    #[test]
    fn test_attach_publishes_dataset_or_error() {
        let bus = Bus::new();
        CsvSource::File(PathBuf::from("/definitely/missing.csv")).attach(&bus);

        let errors = Rc::new(RefCell::new(Vec::new()));
        let e = Rc::clone(&errors);
        bus.subscribe(MSG_QUERY_ERROR, move |_, payload| {
            if let Payload::Error(msg) = payload {
                e.borrow_mut().push(msg.clone());
            }
        });

        bus.publish(MSG_QUERY_EXECUTE, Payload::Query("select 1".into()));
        assert_eq!(errors.borrow().len(), 1);
        assert!(errors.borrow()[0].contains("missing.csv"));
    }
}
