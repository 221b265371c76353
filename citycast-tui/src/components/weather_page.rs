//! Weather detail view for one tab

use citycast_core::weather::{icon_glyph, Backdrop, Presentation};
use citycast_core::{CurrentConditions, Units};
use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::{key_hint, spinner, Component, ForecastList, ForecastListProps, ERROR_ICON};
use crate::action::Action;
use crate::state::Tab;

pub struct WeatherPageProps<'a> {
    pub tab: &'a Tab,
    pub units: Units,
    pub forecast_entries: usize,
    pub tick_count: u32,
}

#[derive(Default)]
pub struct WeatherPage {
    forecast: ForecastList,
}

impl WeatherPage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for WeatherPage {
    type Props<'a> = WeatherPageProps<'a>;

    fn handle_event(&mut self, event: &EventKind, _props: Self::Props<'_>) -> Vec<Action> {
        match event {
            EventKind::Key(key) => match key.code {
                KeyCode::Char('r') | KeyCode::F(5) => vec![Action::WeatherRefresh],
                KeyCode::Esc | KeyCode::Backspace => vec![Action::NavigateBack],
                _ => vec![],
            },
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let city = props.tab.title();

        match props.tab.weather.presentation() {
            Presentation::Loading => {
                let dots = ".".repeat((props.tick_count as usize / 3) % 4);
                let line = Line::from(vec![
                    Span::styled(spinner(props.tick_count), Style::default().fg(Color::Cyan)),
                    Span::styled(
                        format!(" Fetching weather for {city}{dots:<3}"),
                        Style::default().fg(Color::Gray),
                    ),
                ])
                .centered();
                render_centered(frame, area, vec![line]);
            }
            Presentation::Error(message) => {
                let mut hints = vec![Span::styled("Press ", Style::default().fg(Color::DarkGray))];
                hints.extend(key_hint("r", " to retry, "));
                hints.extend(key_hint("Esc", " to go back"));

                let lines = vec![
                    Line::from(ERROR_ICON).centered(),
                    Line::from(Span::styled("Error", Style::default().fg(Color::Red).bold()))
                        .centered(),
                    Line::from(Span::styled(
                        message.to_string(),
                        Style::default().fg(Color::Rgb(200, 100, 100)),
                    ))
                    .centered(),
                    Line::from(""),
                    Line::from(hints).centered(),
                ];
                render_centered(frame, area, lines);
            }
            Presentation::Ready { current, forecast } => {
                let [card_area, forecast_area] =
                    Layout::vertical([Constraint::Length(CARD_HEIGHT), Constraint::Min(0)])
                        .areas(area);

                render_card(frame, card_area, current, props.units);

                let shown = &forecast[..forecast.len().min(props.forecast_entries)];
                self.forecast.render(
                    frame,
                    forecast_area,
                    ForecastListProps {
                        entries: shown,
                        units: props.units,
                    },
                );
            }
        }
    }
}

const CARD_HEIGHT: u16 = 11;

fn render_centered(frame: &mut Frame, area: Rect, lines: Vec<Line<'static>>) {
    let [area] = Layout::vertical([Constraint::Length(lines.len() as u16)])
        .flex(Flex::Center)
        .areas(area);
    frame.render_widget(Paragraph::new(lines), area);
}

fn render_card(frame: &mut Frame, area: Rect, current: &CurrentConditions, units: Units) {
    let backdrop = current.backdrop();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(backdrop_color(backdrop)))
        .title(format!(" Weather in {} ", current.name))
        .title_style(Style::default().fg(Color::Cyan).bold())
        .title_alignment(Alignment::Center);

    let temp_color = temp_to_color(units.to_celsius(current.temperature));
    let label = Style::default().fg(Color::DarkGray);

    let lines = vec![
        Line::from(vec![
            Span::raw(format!("{} ", icon_glyph(&current.icon))),
            Span::styled(
                units.format_temperature(current.temperature),
                Style::default().fg(temp_color).bold(),
            ),
        ])
        .centered(),
        Line::from(""),
        field(
            "Temperature: ",
            Span::styled(
                units.format_temperature(current.temperature),
                Style::default().fg(temp_color),
            ),
            label,
        ),
        field("High: ", Span::raw(units.format_temperature(current.temp_max)), label),
        field("Low: ", Span::raw(units.format_temperature(current.temp_min)), label),
        field("Weather: ", Span::raw(current.description.clone()), label),
        field(
            "Humidity: ",
            Span::raw(format!("{:.0}%", current.humidity)),
            label,
        ),
        field(
            "Wind Speed: ",
            Span::raw(format!("{:.1} {}", current.wind_speed, units.speed_suffix())),
            label,
        ),
        field(
            "Atmospheric Pressure: ",
            Span::raw(format!("{:.0} hPa", current.pressure)),
            label,
        ),
    ];

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn field(name: &'static str, value: Span<'static>, label: Style) -> Line<'static> {
    Line::from(vec![Span::styled(format!("  {name}"), label), value])
}

/// Terminal palette for a weather backdrop.
pub fn backdrop_color(backdrop: Backdrop) -> Color {
    match backdrop {
        Backdrop::ClearSky => Color::Rgb(255, 200, 80),
        Backdrop::Clouds => Color::Rgb(160, 170, 190),
        Backdrop::Rain => Color::Rgb(90, 140, 220),
        Backdrop::Snow => Color::Rgb(220, 235, 255),
        Backdrop::Thunderstorm => Color::Rgb(170, 110, 220),
        Backdrop::None => Color::Rgb(80, 80, 100),
    }
}

pub fn temp_to_color(celsius: f64) -> Color {
    match celsius.round() as i32 {
        ..=-10 => Color::Rgb(150, 200, 255),
        -9..=0 => Color::Rgb(100, 180, 255),
        1..=10 => Color::Rgb(100, 220, 200),
        11..=20 => Color::Rgb(150, 230, 150),
        21..=30 => Color::Rgb(255, 220, 100),
        31..=40 => Color::Rgb(255, 150, 80),
        _ => Color::Rgb(255, 100, 100),
    }
}
