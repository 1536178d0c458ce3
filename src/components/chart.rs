//! Quick visualisation of the latest dataset as a bar chart

use crate::bus::{Bus, Payload, MSG_QUERY_DATASET};
use crate::component::Component;
use crate::model::Dataset;
use anyhow::Result;
use ratatui::{
    layout::{Direction, Rect},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Bar, BarChart, BarGroup, Block, Borders, Paragraph},
    Frame,
};
use std::cell::RefCell;
use std::rc::Rc;

/// Bar values are scaled onto `0..=SCALE`
const SCALE: u64 = 1000;

#[derive(Debug, Clone, PartialEq)]
pub struct ChartBar {
    pub label: String,
    pub value: f64,
}

/// Chart widget for query results
#[derive(Debug, Default)]
pub struct ChartComponent {
    /// "<value column> by <label column>"
    subject: Option<String>,
    bars: Vec<ChartBar>,
    /// Shown instead of bars when the dataset cannot be charted
    hint: Option<String>,
}

impl ChartComponent {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a chart and subscribe it to the bus
    pub fn attach(bus: &Bus) -> Rc<RefCell<ChartComponent>> {
        let chart = Rc::new(RefCell::new(ChartComponent::new()));

        let c = Rc::clone(&chart);
        bus.subscribe(MSG_QUERY_DATASET, move |_, payload| {
            if let Payload::Dataset(dataset) = payload {
                c.borrow_mut().set_dataset(dataset);
            }
        });

        chart
    }

    /// Label by the first column, plot the first numeric column after it.
    /// A lone numeric column is plotted against row numbers.
    pub fn set_dataset(&mut self, dataset: &Dataset) {
        self.bars.clear();
        self.subject = None;
        self.hint = None;

        let (label_col, value_col) = match dataset.first_numeric_column(Some(0)) {
            Some(col) => (Some(0), col),
            None => match dataset.first_numeric_column(None) {
                Some(col) => (None, col),
                None => {
                    self.hint = Some("No numeric column to chart".to_string());
                    return;
                }
            },
        };

        for (i, row) in dataset.rows.iter().enumerate() {
            let Some(value) = row.get(value_col).and_then(|c| Dataset::numeric_value(c)) else {
                continue;
            };
            let label = match label_col {
                Some(col) => row.get(col).cloned().unwrap_or_default(),
                None => (i + 1).to_string(),
            };
            self.bars.push(ChartBar { label, value });
        }

        let value_name = &dataset.headers[value_col];
        self.subject = Some(match label_col {
            Some(col) => format!("{} by {}", value_name, dataset.headers[col]),
            None => value_name.clone(),
        });
    }

    #[cfg(test)]
    pub fn bars(&self) -> &[ChartBar] {
        &self.bars
    }

    #[cfg(test)]
    pub fn hint(&self) -> Option<&str> {
        self.hint.as_deref()
    }

    fn scaled(value: f64, max: f64) -> u64 {
        if max <= 0.0 || value <= 0.0 {
            0
        } else {
            ((value / max) * SCALE as f64).round() as u64
        }
    }
}

fn format_value(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

impl Component for ChartComponent {
    fn draw(&mut self, frame: &mut Frame, area: Rect) -> Result<()> {
        let title = match &self.subject {
            Some(subject) => format!(" Chart · {} ", subject),
            None => " Chart ".to_string(),
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .title(title)
            .border_style(Style::default().fg(Color::DarkGray));

        if self.bars.is_empty() {
            let message = self
                .hint
                .clone()
                .unwrap_or_else(|| "Run a query (F5) to chart results".to_string());
            let paragraph = Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            )))
            .block(block);
            frame.render_widget(paragraph, area);
            return Ok(());
        }

        let max = self.bars.iter().map(|b| b.value).fold(0.0, f64::max);
        let bars: Vec<Bar> = self
            .bars
            .iter()
            .map(|b| {
                Bar::default()
                    .label(Line::from(b.label.clone()))
                    .value(Self::scaled(b.value, max))
                    .text_value(format_value(b.value))
            })
            .collect();

        let chart = BarChart::default()
            .block(block)
            .direction(Direction::Horizontal)
            .bar_width(1)
            .bar_gap(0)
            .bar_style(Style::default().fg(Color::Cyan))
            .value_style(Style::default().fg(Color::Black).bg(Color::Cyan))
            .label_style(Style::default().fg(Color::White))
            .max(SCALE)
            .data(BarGroup::default().bars(&bars));

        frame.render_widget(chart, area);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, Terminal};

    fn trades() -> Dataset {
        Dataset::new("select symbol, side, price from trades").with_data(
            vec!["symbol".into(), "side".into(), "price".into()],
            vec![
                vec!["BTC".into(), "buy".into(), "100".into()],
                vec!["ETH".into(), "sell".into(), "25.5".into()],
                vec!["SOL".into(), "buy".into(), "n/a".into()],
            ],
        )
    }

    #[test]
    fn test_label_and_value_columns() {
        let mut chart = ChartComponent::new();
        // "n/a" makes price non-numeric, so nothing after the label qualifies
        chart.set_dataset(&trades());
        assert_eq!(chart.hint(), Some("No numeric column to chart"));

        let mut dataset = trades();
        dataset.rows.pop();
        chart.set_dataset(&dataset);
        assert_eq!(chart.hint(), None);
        assert_eq!(
            chart.bars(),
            &[
                ChartBar { label: "BTC".into(), value: 100.0 },
                ChartBar { label: "ETH".into(), value: 25.5 },
            ]
        );
        assert_eq!(chart.subject.as_deref(), Some("price by symbol"));
    }

    #[test]
    fn test_single_numeric_column_uses_row_numbers() {
        let dataset = Dataset::new("select count() from trades")
            .with_data(vec!["count".into()], vec![vec!["42".into()]]);
        let mut chart = ChartComponent::new();
        chart.set_dataset(&dataset);
        assert_eq!(chart.bars(), &[ChartBar { label: "1".into(), value: 42.0 }]);
        assert_eq!(chart.subject.as_deref(), Some("count"));
    }

    #[test]
    fn test_attach_follows_datasets() {
        let bus = Bus::new();
        let chart = ChartComponent::attach(&bus);
        let mut dataset = trades();
        dataset.rows.pop();
        bus.publish(MSG_QUERY_DATASET, Payload::Dataset(dataset));
        assert_eq!(chart.borrow().bars().len(), 2);
    }

    #[test]
    fn test_scaled_and_formatting() {
        assert_eq!(ChartComponent::scaled(50.0, 100.0), 500);
        assert_eq!(ChartComponent::scaled(-3.0, 100.0), 0);
        assert_eq!(ChartComponent::scaled(1.0, 0.0), 0);
        assert_eq!(format_value(3.0), "3");
        assert_eq!(format_value(2.5), "2.50");
    }

    fn rendered(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let area = buffer.area;
        (area.top()..area.bottom())
            .map(|y| {
                (area.left()..area.right())
                    .map(|x| buffer[(x, y)].symbol().to_string())
                    .collect::<String>()
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn test_draw_with_and_without_bars() {
        let mut chart = ChartComponent::new();
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|frame| chart.draw(frame, frame.area()).unwrap())
            .unwrap();
        let empty = rendered(&terminal);
        assert!(empty.contains("Run a query (F5) to chart results"), "{empty}");

        let mut dataset = trades();
        dataset.rows.pop();
        chart.set_dataset(&dataset);
        terminal
            .draw(|frame| chart.draw(frame, frame.area()).unwrap())
            .unwrap();
        let charted = rendered(&terminal);
        assert!(charted.contains("price by symbol"), "{charted}");
        assert!(charted.contains("BTC"), "{charted}");
        assert!(charted.contains("ETH"), "{charted}");
        assert!(!charted.contains("Run a query"), "{charted}");
    }

    #[test]
    fn test_draw_shows_hint_without_numeric_column() {
        let mut chart = ChartComponent::new();
        chart.set_dataset(&trades());
        let mut terminal = Terminal::new(TestBackend::new(40, 8)).unwrap();
        terminal
            .draw(|frame| chart.draw(frame, frame.area()).unwrap())
            .unwrap();
        let text = rendered(&terminal);
        assert!(text.contains("No numeric column to chart"), "{text}");
    }
}
