use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyEvent};

pub enum AppEvent {
    Key(KeyEvent),
    Resize,
    Tick,
}

/// Wait up to `tick_rate` for terminal input.
pub fn poll(tick_rate: Duration) -> Result<AppEvent> {
    if event::poll(tick_rate)? {
        return Ok(match event::read()? {
            Event::Key(key) => AppEvent::Key(key),
            Event::Resize(..) => AppEvent::Resize,
            _ => AppEvent::Tick,
        });
    }
    Ok(AppEvent::Tick)
}
