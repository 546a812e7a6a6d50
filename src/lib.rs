//! Grid snake simulation on a toroidal board.
//!
//! [`Game`] owns all state and is driven from outside: feed it input through
//! [`Game::try_change_direction`], [`Game::toggle_pause`], [`Game::reset`] and
//! [`Game::quit`], advance it with [`Game::update`] once per frame, and read
//! back what to draw. It never renders, sleeps, or reads the clock itself.

mod config;
mod error;
mod game;
mod snake;

pub use config::{GameConfig, DEFAULT_HEIGHT, DEFAULT_WIDTH, INITIAL_SPEED, MAX_SPEED, SPEED_STEP};
pub use error::{GameError, Result};
pub use game::{Game, State};
pub use snake::{Direction, Field, Hit, Position, Snake};
