pub mod city_table;
pub mod directory_view;
pub mod forecast_list;
pub mod help_bar;
pub mod search_bar;
pub mod tab_bar;
pub mod weather_page;

pub use tui_dispatch::Component;

pub use city_table::{CityTable, CityTableProps};
pub use directory_view::{DirectoryView, DirectoryViewProps};
pub use forecast_list::{ForecastList, ForecastListProps};
pub use help_bar::{HelpBar, HelpBarProps, HelpContext};
pub use search_bar::{SearchBar, SearchBarProps};
pub use tab_bar::{TabBar, TabBarProps};
pub use weather_page::{WeatherPage, WeatherPageProps};

use ratatui::style::{Color, Style, Stylize};
use ratatui::text::Span;

pub const ERROR_ICON: &str = "⚠";
pub const SPINNERS: [&str; 4] = ["◐", "◓", "◑", "◒"];

pub fn spinner(tick_count: u32) -> &'static str {
    SPINNERS[(tick_count as usize / 2) % SPINNERS.len()]
}

/// `key` in cyan bold followed by a dim label, as used in hint lines.
pub fn key_hint(key: &'static str, label: &'static str) -> [Span<'static>; 2] {
    [
        Span::styled(key, Style::default().fg(Color::Cyan).bold()),
        Span::styled(label, Style::default().fg(Color::DarkGray)),
    ]
}
