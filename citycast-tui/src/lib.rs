//! Terminal city directory with per-city weather
//!
//! State lives in [`state::AppState`] and only changes through
//! [`reducer::reducer`]. Network calls are [`effect::Effect`]s run by
//! [`effect::handle_effect`] on the runtime's task manager.

pub mod action;
pub mod app;
pub mod components;
pub mod effect;
pub mod logging;
pub mod reducer;
pub mod state;

pub use action::Action;
pub use app::CitycastUi;
pub use effect::{handle_effect, Effect, Services};
pub use reducer::reducer;
pub use state::AppState;
