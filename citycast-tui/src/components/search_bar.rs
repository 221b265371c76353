//! Single-line search input above the city table

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use tui_dispatch::EventKind;

use super::Component;
use crate::action::Action;

pub struct SearchBarProps<'a> {
    pub value: &'a str,
    pub is_focused: bool,
}

/// Emits [`Action::DirectorySearchChange`] on every edit and
/// [`Action::DirectorySearchBlur`] on `Esc`/`Enter`.
#[derive(Default)]
pub struct SearchBar {
    /// Cursor position (byte index)
    cursor: usize,
    area: Rect,
}

impl SearchBar {
    pub fn new() -> Self {
        Self::default()
    }

    /// Area of the last render, for mouse hit-testing.
    pub fn area(&self) -> Rect {
        self.area
    }

    fn clamp_cursor(&mut self, value: &str) {
        self.cursor = self.cursor.min(value.len());
        while !value.is_char_boundary(self.cursor) {
            self.cursor -= 1;
        }
    }

    fn move_left(&mut self, value: &str) {
        if let Some((i, _)) = value[..self.cursor].char_indices().last() {
            self.cursor = i;
        }
    }

    fn move_right(&mut self, value: &str) {
        if let Some(c) = value[self.cursor..].chars().next() {
            self.cursor += c.len_utf8();
        }
    }

    fn insert(&mut self, value: &str, c: char) -> String {
        let mut next = String::with_capacity(value.len() + c.len_utf8());
        next.push_str(&value[..self.cursor]);
        next.push(c);
        next.push_str(&value[self.cursor..]);
        self.cursor += c.len_utf8();
        next
    }

    fn backspace(&mut self, value: &str) -> Option<String> {
        let (start, _) = value[..self.cursor].char_indices().last()?;
        let next = format!("{}{}", &value[..start], &value[self.cursor..]);
        self.cursor = start;
        Some(next)
    }

    fn delete(&self, value: &str) -> Option<String> {
        let c = value[self.cursor..].chars().next()?;
        Some(format!(
            "{}{}",
            &value[..self.cursor],
            &value[self.cursor + c.len_utf8()..]
        ))
    }

    fn on_key(&mut self, key: &KeyEvent, value: &str) -> Option<Action> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return match key.code {
                KeyCode::Char('a') => {
                    self.cursor = 0;
                    None
                }
                KeyCode::Char('e') => {
                    self.cursor = value.len();
                    None
                }
                KeyCode::Char('u') => {
                    self.cursor = 0;
                    Some(Action::DirectorySearchChange(String::new()))
                }
                _ => None,
            };
        }

        match key.code {
            KeyCode::Char(c) => Some(Action::DirectorySearchChange(self.insert(value, c))),
            KeyCode::Backspace => self
                .backspace(value)
                .map(Action::DirectorySearchChange),
            KeyCode::Delete => self.delete(value).map(Action::DirectorySearchChange),
            KeyCode::Left => {
                self.move_left(value);
                None
            }
            KeyCode::Right => {
                self.move_right(value);
                None
            }
            KeyCode::Home => {
                self.cursor = 0;
                None
            }
            KeyCode::End => {
                self.cursor = value.len();
                None
            }
            KeyCode::Esc | KeyCode::Enter | KeyCode::Down => Some(Action::DirectorySearchBlur),
            _ => None,
        }
    }
}

impl Component<Action> for SearchBar {
    type Props<'a> = SearchBarProps<'a>;

    fn handle_event(&mut self, event: &EventKind, props: Self::Props<'_>) -> Vec<Action> {
        match event {
            EventKind::Key(key) if props.is_focused => {
                self.clamp_cursor(props.value);
                self.on_key(key, props.value).into_iter().collect()
            }
            _ => vec![],
        }
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        self.area = area;
        self.clamp_cursor(props.value);

        let border = if props.is_focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border)
            .title(" Search ");

        let line = if props.value.is_empty() {
            Line::from(Span::styled(
                "Search by city name (press /)",
                Style::default().fg(Color::DarkGray),
            ))
        } else {
            Line::from(props.value)
        };

        let inner = block.inner(area);
        frame.render_widget(Paragraph::new(line).block(block), area);

        if props.is_focused {
            let offset = props.value[..self.cursor].chars().count() as u16;
            let x = inner.x.saturating_add(offset);
            if x < inner.right() {
                frame.set_cursor_position((x, inner.y));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tui_dispatch::testing::*;

    fn send(bar: &mut SearchBar, value: &str, k: &str) -> Vec<Action> {
        bar.handle_event(
            &EventKind::Key(key(k)),
            SearchBarProps {
                value,
                is_focused: true,
            },
        )
    }

    #[test]
    fn test_typing_emits_full_value() {
        let mut bar = SearchBar::new();
        assert_eq!(
            send(&mut bar, "", "p"),
            vec![Action::DirectorySearchChange("p".into())]
        );
        assert_eq!(
            send(&mut bar, "p", "a"),
            vec![Action::DirectorySearchChange("pa".into())]
        );
    }

    #[test]
    fn test_backspace_handles_multibyte() {
        let mut bar = SearchBar::new();
        bar.cursor = "Zürich".len();
        send(&mut bar, "Zürich", "left");
        send(&mut bar, "Zürich", "left");
        send(&mut bar, "Zürich", "left");
        send(&mut bar, "Zürich", "left");
        assert_eq!(
            send(&mut bar, "Zürich", "backspace"),
            vec![Action::DirectorySearchChange("Zrich".into())]
        );
    }

    #[test]
    fn test_esc_blurs() {
        let mut bar = SearchBar::new();
        assert_eq!(send(&mut bar, "x", "esc"), vec![Action::DirectorySearchBlur]);
        assert_eq!(send(&mut bar, "x", "enter"), vec![Action::DirectorySearchBlur]);
    }

    #[test]
    fn test_ctrl_u_clears() {
        let mut bar = SearchBar::new();
        assert_eq!(
            send(&mut bar, "paris", "ctrl+u"),
            vec![Action::DirectorySearchChange(String::new())]
        );
    }

    #[test]
    fn test_unfocused_ignores_keys() {
        let mut bar = SearchBar::new();
        let actions = bar.handle_event(
            &EventKind::Key(key("p")),
            SearchBarProps {
                value: "",
                is_focused: false,
            },
        );
        actions.assert_empty();
    }

    #[test]
    fn test_render_placeholder() {
        let mut render = RenderHarness::new(40, 3);
        let mut bar = SearchBar::new();
        let out = render.render_to_string_plain(|frame| {
            bar.render(
                frame,
                frame.area(),
                SearchBarProps {
                    value: "",
                    is_focused: false,
                },
            )
        });
        assert!(out.contains("Search by city name"));
    }
}
