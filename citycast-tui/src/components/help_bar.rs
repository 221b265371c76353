use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use super::{key_hint, Component};
use crate::action::Action;

/// Which key set the help bar describes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HelpContext {
    Directory,
    Search,
    Weather,
}

pub struct HelpBarProps {
    pub context: HelpContext,
    pub has_tabs: bool,
}

#[derive(Default)]
pub struct HelpBar;

impl HelpBar {
    fn hints(props: &HelpBarProps) -> Vec<(&'static str, &'static str)> {
        let mut hints = match props.context {
            HelpContext::Search => vec![("Esc/Enter", " done  "), ("Ctrl+U", " clear  ")],
            HelpContext::Directory => vec![
                ("/", " search  "),
                ("1-4", " sort  "),
                ("Enter", " open  "),
                ("o", " new tab  "),
            ],
            HelpContext::Weather => vec![("r", " refresh  "), ("Esc", " back  ")],
        };
        if props.context != HelpContext::Search {
            hints.push(("u", " units  "));
            if props.has_tabs {
                hints.push(("Tab", " next tab  "));
                hints.push(("x", " close  "));
            }
            hints.push(("q", " quit "));
        }
        hints
    }
}

impl Component<Action> for HelpBar {
    type Props<'a> = HelpBarProps;

    fn render(&mut self, frame: &mut Frame, area: Rect, props: Self::Props<'_>) {
        let mut spans = vec![Span::raw(" ")];
        for (key, label) in Self::hints(&props) {
            spans.extend(key_hint(key, label));
        }
        frame.render_widget(Paragraph::new(Line::from(spans).centered()), area);
    }
}
