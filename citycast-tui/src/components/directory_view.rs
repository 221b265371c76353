//! City directory: search bar, table and status footer

use crossterm::event::{KeyCode, MouseEventKind};
use ratatui::{
    layout::{Constraint, Layout, Position, Rect},
    style::{Color, Style, Stylize},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tui_dispatch::EventKind;

use super::{
    key_hint, spinner, CityTable, CityTableProps, Component, SearchBar, SearchBarProps, ERROR_ICON,
};
use crate::action::Action;
use crate::state::DirectoryState;

pub const LOADING_TEXT: &str = "Loading...";
pub const EXHAUSTED_TEXT: &str = "No more cities to load";

pub struct DirectoryViewProps<'a> {
    pub directory: &'a DirectoryState,
    pub tick_count: u32,
}

#[derive(Default)]
pub struct DirectoryView {
    search: SearchBar,
    table: CityTable,
}

impl DirectoryView {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Component<Action> for DirectoryView {
    type Props<'a> = DirectoryViewProps<'a>;

    fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> Vec<Action> {
        let directory = props.directory;
        let search_props = SearchBarProps {
            value: &directory.query.search,
            is_focused: directory.search_focused,
        };
        let table_props = CityTableProps {
            directory,
            is_focused: !directory.search_focused,
        };

        match event {
            EventKind::Key(_) if directory.search_focused => {
                self.search.handle_event(event, search_props)
            }
            EventKind::Key(key) => match key.code {
                KeyCode::Char('/') => vec![Action::DirectorySearchFocus],
                KeyCode::Char('r') if directory.catalog.failure().is_some() => {
                    vec![Action::CitiesRetry]
                }
                _ => self.table.handle_event(event, table_props),
            },
            EventKind::Mouse(mouse)
                if matches!(mouse.kind, MouseEventKind::Down(_))
                    && self
                        .search
                        .area()
                        .contains(Position::new(mouse.column, mouse.row)) =>
            {
                vec![Action::DirectorySearchFocus]
            }
            EventKind::Mouse(mouse) if matches!(mouse.kind, MouseEventKind::Down(_)) => {
                let mut actions = Vec::new();
                if directory.search_focused {
                    actions.push(Action::DirectorySearchBlur);
                }
                actions.extend(self.table.handle_event(event, table_props));
                actions
            }
            _ => self.table.handle_event(event, table_props),
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let directory = props.directory;
        let [search_area, table_area, footer_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .areas(area);

        self.search.render(
            frame,
            search_area,
            SearchBarProps {
                value: &directory.query.search,
                is_focused: directory.search_focused,
            },
        );
        self.table.render(
            frame,
            table_area,
            CityTableProps {
                directory,
                is_focused: !directory.search_focused,
            },
        );

        frame.render_widget(
            Paragraph::new(footer_line(directory, props.tick_count)),
            footer_area,
        );
    }
}

fn footer_line(directory: &DirectoryState, tick_count: u32) -> Line<'static> {
    let catalog = &directory.catalog;
    let mut spans = vec![Span::raw(" ")];

    if catalog.is_loading() {
        spans.push(Span::styled(spinner(tick_count), Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {LOADING_TEXT}"),
            Style::default().fg(Color::Gray),
        ));
    } else if let Some(failure) = catalog.failure() {
        spans.push(Span::raw(format!("{ERROR_ICON} ")));
        spans.push(Span::styled(
            failure.to_string(),
            Style::default().fg(Color::Rgb(200, 100, 100)),
        ));
        spans.push(Span::raw("  "));
        spans.extend(key_hint("r", " to retry"));
    } else if !catalog.has_more() {
        spans.push(Span::styled(EXHAUSTED_TEXT, Style::default().fg(Color::DarkGray)));
    }

    spans.push(Span::styled(
        format!("  {} of {} cities", directory.visible.len(), catalog.len()),
        Style::default().fg(Color::DarkGray).italic(),
    ));
    Line::from(spans)
}
