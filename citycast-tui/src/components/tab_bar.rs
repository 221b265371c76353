use ratatui::{
    layout::Rect,
    style::{Color, Style, Stylize},
    text::Line,
    widgets::Tabs,
    Frame,
};

use super::Component;
use crate::action::Action;
use crate::state::Tab;

pub struct TabBarProps<'a> {
    pub tabs: &'a [Tab],
    pub active: usize,
}

#[derive(Default)]
pub struct TabBar;

impl Component<Action> for TabBar {
    type Props<'a> = TabBarProps<'a>;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let titles = props
            .tabs
            .iter()
            .enumerate()
            .map(|(i, tab)| Line::from(format!("{}:{}", i + 1, tab.title())));

        let tabs = Tabs::new(titles)
            .select(props.active)
            .style(Style::default().fg(Color::DarkGray))
            .highlight_style(Style::default().fg(Color::Cyan).bold())
            .divider("│");
        frame.render_widget(tabs, area);
    }
}
