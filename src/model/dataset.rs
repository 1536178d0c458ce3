//! Query result datasets delivered on the bus

use chrono::{DateTime, Local};

/// Result of a query, as published by the query pipeline
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    /// The query text that produced this dataset
    pub query: String,
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    pub executed_at: DateTime<Local>,
}

impl Dataset {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            headers: Vec::new(),
            rows: Vec::new(),
            executed_at: Local::now(),
        }
    }

    pub fn with_data(mut self, headers: Vec<String>, rows: Vec<Vec<String>>) -> Self {
        self.headers = headers;
        self.rows = rows;
        self
    }

    /// Parse a cell as a number, ignoring surrounding whitespace
    pub fn numeric_value(cell: &str) -> Option<f64> {
        cell.trim().parse::<f64>().ok().filter(|v| v.is_finite())
    }

    /// Index of the first column (other than `skip`) whose non-empty cells
    /// all parse as numbers
    pub fn first_numeric_column(&self, skip: Option<usize>) -> Option<usize> {
        (0..self.headers.len())
            .filter(|&col| Some(col) != skip)
            .find(|&col| {
                let mut cells = self
                    .rows
                    .iter()
                    .filter_map(|row| row.get(col))
                    .filter(|cell| !cell.trim().is_empty())
                    .peekable();
                cells.peek().is_some() && cells.all(|cell| Self::numeric_value(cell).is_some())
            })
    }

    pub fn formatted_time(&self) -> String {
        self.executed_at.format("%H:%M:%S").to_string()
    }
}
