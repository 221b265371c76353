//! Windowed city table with sortable headers

use citycast_core::{CityRecord, SortKey};
use crossterm::event::{KeyCode, MouseButton, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Modifier, Style, Stylize},
    text::Line,
    widgets::{Block, Borders, Row, Table},
    Frame,
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;
use crate::state::{Activation, DirectoryState};

const WIDTHS: [Constraint; 4] = [
    Constraint::Percentage(35),
    Constraint::Percentage(25),
    Constraint::Percentage(25),
    Constraint::Percentage(15),
];

const COLUMN_SPACING: u16 = 1;
const SCROLL_STEP: isize = 3;

pub struct CityTableProps<'a> {
    pub directory: &'a DirectoryState,
    pub is_focused: bool,
}

/// Only the rows that fit are built; the window follows the cursor.
#[derive(Default)]
pub struct CityTable {
    offset: usize,
    header: Rect,
    body: Rect,
    columns: Vec<Rect>,
}

impl CityTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// First visible row of the last render.
    pub fn offset(&self) -> usize {
        self.offset
    }

    fn page(&self) -> isize {
        self.body.height.max(1) as isize
    }

    fn scroll_into_view(&mut self, cursor: usize, rows: usize) {
        let height = self.body.height as usize;
        if height == 0 {
            return;
        }
        if cursor < self.offset {
            self.offset = cursor;
        } else if cursor >= self.offset + height {
            self.offset = cursor + 1 - height;
        }
        self.offset = self.offset.min(rows.saturating_sub(height));
    }

    fn row_at(&self, column: u16, row: u16) -> Option<usize> {
        self.body
            .contains(Position::new(column, row))
            .then(|| self.offset + (row - self.body.y) as usize)
    }

    fn column_at(&self, column: u16, row: u16) -> Option<SortKey> {
        if !self.header.contains(Position::new(column, row)) {
            return None;
        }
        self.columns
            .iter()
            .position(|rect| column >= rect.x && column < rect.right())
            .map(|i| SortKey::ALL[i])
    }

    fn select(city: Option<&CityRecord>, activation: Activation) -> Option<Action> {
        city.map(|city| Action::CitySelect {
            name: city.name.clone(),
            activation,
        })
    }

    fn handle_click(
        &self,
        button: MouseButton,
        column: u16,
        row: u16,
        directory: &DirectoryState,
    ) -> Vec<Action> {
        if let Some(key) = self.column_at(column, row) {
            return vec![Action::DirectorySortToggle(key)];
        }
        let Some(index) = self.row_at(column, row) else {
            return vec![];
        };
        let Some(city) = directory.visible_city(index) else {
            return vec![];
        };
        match button {
            MouseButton::Left => vec![
                Action::DirectoryCursorSet(index),
                Action::CitySelect {
                    name: city.name.clone(),
                    activation: Activation::Primary,
                },
            ],
            MouseButton::Middle => vec![Action::CitySelect {
                name: city.name.clone(),
                activation: Activation::Alternate,
            }],
            MouseButton::Right => vec![Action::DirectoryCursorSet(index)],
        }
    }
}

impl Component<Action> for CityTable {
    type Props<'a> = CityTableProps<'a>;

    fn handle_event(
        &mut self,
        event: &EventKind,
        props: Self::Props<'_>,
    ) -> Vec<Action> {
        let directory = props.directory;
        match event {
            EventKind::Scroll { column, row, delta } => {
                if self.body.contains(Position::new(*column, *row)) {
                    vec![Action::DirectoryCursorMove(delta * SCROLL_STEP)]
                } else {
                    vec![]
                }
            }
            EventKind::Mouse(mouse) => match mouse.kind {
                MouseEventKind::Down(button) => {
                    self.handle_click(button, mouse.column, mouse.row, directory)
                }
                _ => vec![],
            },
            EventKind::Key(key) if props.is_focused => {
                let action = match key.code {
                    KeyCode::Char('j') | KeyCode::Down => Some(Action::DirectoryCursorMove(1)),
                    KeyCode::Char('k') | KeyCode::Up => Some(Action::DirectoryCursorMove(-1)),
                    KeyCode::PageDown => Some(Action::DirectoryCursorMove(self.page())),
                    KeyCode::PageUp => Some(Action::DirectoryCursorMove(-self.page())),
                    KeyCode::Char('g') | KeyCode::Home => Some(Action::DirectoryCursorSet(0)),
                    KeyCode::Char('G') | KeyCode::End => {
                        Some(Action::DirectoryCursorSet(usize::MAX))
                    }
                    KeyCode::Char(c @ '1'..='4') => {
                        let index = c as usize - '1' as usize;
                        Some(Action::DirectorySortToggle(SortKey::ALL[index]))
                    }
                    KeyCode::Enter => Self::select(directory.selected(), Activation::Primary),
                    KeyCode::Char('o') => {
                        Self::select(directory.selected(), Activation::Alternate)
                    }
                    _ => None,
                };
                action.into_iter().collect()
            }
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let directory = props.directory;
        let border = if props.is_focused {
            Color::Cyan
        } else {
            Color::Rgb(80, 80, 100)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .title(" Cities ")
            .title_style(Style::default().fg(Color::Cyan).bold());

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [header, body] =
            Layout::vertical([Constraint::Length(1), Constraint::Min(0)]).areas(inner);
        self.header = header;
        self.body = body;
        self.columns = Layout::horizontal(WIDTHS)
            .spacing(COLUMN_SPACING)
            .split(header)
            .to_vec();

        let rows_total = directory.visible.len();
        self.scroll_into_view(directory.cursor, rows_total);

        let header_row = Row::new(SortKey::ALL.iter().map(|&key| {
            if key == directory.query.sort_key {
                Line::from(format!("{} {}", key.label(), directory.query.direction.arrow()))
                    .fg(Color::Yellow)
            } else {
                Line::from(key.label())
            }
        }))
        .style(Style::default().add_modifier(Modifier::BOLD));

        let end = (self.offset + body.height as usize).min(rows_total);
        let rows = (self.offset..end).filter_map(|index| {
            let city = directory.visible_city(index)?;
            let style = if index == directory.cursor {
                Style::default().bg(Color::Rgb(40, 60, 90)).bold()
            } else {
                Style::default()
            };
            Some(
                Row::new([
                    city.name.clone(),
                    city.country.clone(),
                    city.timezone.clone(),
                    format_population(city.population),
                ])
                .style(style),
            )
        });

        let table = Table::new(rows, WIDTHS)
            .header(header_row)
            .column_spacing(COLUMN_SPACING);
        frame.render_widget(table, inner);
    }
}

/// `1234567` -> `1,234,567`
pub fn format_population(population: u64) -> String {
    let digits = population.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use citycast_core::PageRequest;
    use crossterm::event::{KeyModifiers, MouseEvent};
    use tui_dispatch::testing::*;

    fn click(button: MouseButton, column: u16, row: u16) -> EventKind {
        EventKind::Mouse(MouseEvent {
            kind: MouseEventKind::Down(button),
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    fn directory(count: usize) -> DirectoryState {
        let mut directory = DirectoryState::default();
        let request = directory.catalog.request_next_page().unwrap();
        assert_eq!(request, PageRequest::first_attempt(0));
        let cities = (0..count)
            .map(|i| CityRecord::new(format!("City {i:03}"), "FR", "Europe/Paris", i as u64 * 1000))
            .collect();
        directory.catalog.page_loaded(request, cities);
        directory.refresh_view();
        directory
    }

    fn render(table: &mut CityTable, directory: &DirectoryState, height: u16) -> String {
        let mut harness = RenderHarness::new(80, height);
        harness.render_to_string_plain(|frame| {
            table.render(
                frame,
                frame.area(),
                CityTableProps {
                    directory,
                    is_focused: true,
                },
            )
        })
    }

    fn events(table: &mut CityTable, directory: &DirectoryState, event: EventKind) -> Vec<Action> {
        table.handle_event(
            &event,
            CityTableProps {
                directory,
                is_focused: true,
            },
        )
    }

    #[test]
    fn test_population_separators() {
        assert_eq!(format_population(0), "0");
        assert_eq!(format_population(999), "999");
        assert_eq!(format_population(1000), "1,000");
        assert_eq!(format_population(2_148_271), "2,148,271");
    }

    #[test]
    fn test_renders_header_with_sort_arrow() {
        let directory = directory(3);
        let out = render(&mut CityTable::new(), &directory, 10);
        assert!(out.contains("City Name ▲"));
        assert!(out.contains("Population"));
        assert!(out.contains("City 002"));
        assert!(out.contains("2,000"));
    }

    #[test]
    fn test_window_follows_cursor() {
        let mut directory = directory(50);
        let mut table = CityTable::new();

        // 10 rows tall: 2 borders and a header leave 7 body rows
        render(&mut table, &directory, 10);
        assert_eq!(table.offset(), 0);

        directory.cursor = 20;
        let out = render(&mut table, &directory, 10);
        assert_eq!(table.offset(), 14);
        assert!(out.contains("City 020"));
        assert!(!out.contains("City 013"));

        directory.cursor = 3;
        render(&mut table, &directory, 10);
        assert_eq!(table.offset(), 3);
    }

    #[test]
    fn test_keys() {
        let directory = directory(5);
        let mut table = CityTable::new();
        render(&mut table, &directory, 10);

        let actions = events(&mut table, &directory, EventKind::Key(key("j")));
        assert_eq!(actions, vec![Action::DirectoryCursorMove(1)]);

        let actions = events(&mut table, &directory, EventKind::Key(key("pagedown")));
        assert_eq!(actions, vec![Action::DirectoryCursorMove(7)]);

        let actions = events(&mut table, &directory, EventKind::Key(key("4")));
        assert_eq!(actions, vec![Action::DirectorySortToggle(SortKey::Population)]);

        let actions = events(&mut table, &directory, EventKind::Key(key("o")));
        actions.assert_first(Action::CitySelect {
            name: "City 000".into(),
            activation: Activation::Alternate,
        });
    }

    #[test]
    fn test_enter_on_empty_view_does_nothing() {
        let directory = DirectoryState::default();
        let mut table = CityTable::new();
        let actions = events(&mut table, &directory, EventKind::Key(key("enter")));
        actions.assert_empty();
    }

    #[test]
    fn test_click_row_and_header() {
        let directory = directory(5);
        let mut table = CityTable::new();
        render(&mut table, &directory, 10);

        // Border on row 0, header on row 1, first body row on 2
        let actions = events(&mut table, &directory, click(MouseButton::Left, 5, 4));
        actions.assert_first(Action::DirectoryCursorSet(2));
        actions.assert_last(Action::CitySelect {
            name: "City 002".into(),
            activation: Activation::Primary,
        });

        let actions = events(&mut table, &directory, click(MouseButton::Middle, 5, 2));
        actions.assert_none_match(|a| matches!(a, Action::DirectoryCursorSet(_)));
        actions.assert_any_matches(|a| {
            matches!(a, Action::CitySelect { activation: Activation::Alternate, .. })
        });

        let actions = events(&mut table, &directory, click(MouseButton::Left, 75, 1));
        assert_eq!(actions, vec![Action::DirectorySortToggle(SortKey::Population)]);

        // Below the last loaded row
        let actions = events(&mut table, &directory, click(MouseButton::Left, 5, 8));
        actions.assert_empty();
    }

    #[test]
    fn test_scroll_in_body() {
        let directory = directory(5);
        let mut table = CityTable::new();
        render(&mut table, &directory, 10);

        let scroll = EventKind::Scroll {
            column: 5,
            row: 3,
            delta: -1,
        };
        assert_eq!(
            events(&mut table, &directory, scroll),
            vec![Action::DirectoryCursorMove(-3)]
        );
    }
}
