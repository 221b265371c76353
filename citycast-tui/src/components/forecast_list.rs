use citycast_core::weather::icon_glyph;
use citycast_core::{ForecastEntry, Units};
use ratatui::{
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Color, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use super::Component;
use crate::action::Action;

pub struct ForecastListProps<'a> {
    pub entries: &'a [ForecastEntry],
    pub units: Units,
}

/// Row of forecast cards, one per entry.
#[derive(Default)]
pub struct ForecastList;

impl Component<Action> for ForecastList {
    type Props<'a> = ForecastListProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let block = Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::Rgb(80, 80, 100)))
            .title(" 5-Day Forecast ")
            .title_style(Style::default().fg(Color::Cyan).bold())
            .title_alignment(Alignment::Center);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if props.entries.is_empty() {
            frame.render_widget(
                Paragraph::new(Line::from("No forecast available").fg(Color::DarkGray).centered()),
                inner,
            );
            return;
        }

        let columns = Layout::horizontal(
            props
                .entries
                .iter()
                .map(|_| Constraint::Ratio(1, props.entries.len() as u32)),
        )
        .split(inner);

        for (entry, area) in props.entries.iter().zip(columns.iter().copied()) {
            let range = format!(
                "{} to {}",
                props.units.format_temperature(entry.temp_min),
                props.units.format_temperature(entry.temp_max)
            );
            let lines = vec![
                Line::from(entry.date_label()).bold(),
                Line::from(icon_glyph(&entry.icon)),
                Line::from(range).fg(Color::Yellow),
                Line::from(entry.description.clone()).fg(Color::Gray),
            ];
            let card = Paragraph::new(lines)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true })
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Rgb(60, 60, 80))),
                );
            frame.render_widget(card, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::RenderHarness;

    #[test]
    fn test_empty_forecast() {
        let mut harness = RenderHarness::new(60, 8);
        let out = harness.render_to_string_plain(|frame| {
            ForecastList.render(
                frame,
                frame.area(),
                ForecastListProps {
                    entries: &[],
                    units: Units::Metric,
                },
            )
        });
        assert!(out.contains("5-Day Forecast"));
        assert!(out.contains("No forecast available"));
    }

    #[test]
    fn test_card_contents() {
        let entries = [ForecastEntry {
            timestamp: "2024-05-01 15:00:00".into(),
            description: "snow".into(),
            icon: "13d".into(),
            temp_min: 28.0,
            temp_max: 31.5,
        }];
        let mut harness = RenderHarness::new(60, 8);
        let out = harness.render_to_string_plain(|frame| {
            ForecastList.render(
                frame,
                frame.area(),
                ForecastListProps {
                    entries: &entries,
                    units: Units::Imperial,
                },
            )
        });
        assert!(out.contains("Wed 01 May 15:00"));
        assert!(out.contains("28.0°F to 31.5°F"));
        assert!(out.contains("snow"));
    }
}
