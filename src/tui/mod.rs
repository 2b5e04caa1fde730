mod app;
mod event;
mod form;
mod keymap;
mod theme;
mod ui;
mod view;

use anyhow::Result;

use crate::api::Api;
use crate::config::Config;
use crate::store::Store;

use app::App;
pub use theme::ThemeConfig;

/// Take over the terminal and run the dashboard until the user quits.
pub fn run<A: Api>(store: Store<A>, config: &Config) -> Result<()> {
    let mut terminal = ratatui::init();
    let mut app = App::new(store, config);
    let result = app.run(&mut terminal);
    ratatui::restore();
    result
}
