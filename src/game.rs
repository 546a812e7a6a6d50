use std::collections::VecDeque;

use log::{debug, info, trace, warn};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use crate::config::{next_speed, GameConfig, INITIAL_SPEED};
use crate::error::{GameError, Result};
use crate::snake::{Direction, Field, Hit, Position, Snake};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum State {
    Start,
    Running,
    Paused,
    Loss,
    Win,
    Quit,
}

/// The whole simulation: one snake on a toroidal field, advanced by
/// externally supplied millisecond timestamps.
///
/// Renderers read the queries after each `update`; input sources call
/// `try_change_direction`, `toggle_pause`, `reset` and `quit`.
#[derive(Clone, Debug)]
pub struct Game<R = StdRng> {
    field: Field,
    state: State,
    snake: Snake,
    food: Option<Position>,
    direction: Direction,
    directions: VecDeque<Direction>,
    speed: u32,
    last_move_ms: u64,
    rng: R,
}

impl Game<StdRng> {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        Game::with_rng(width, height, StdRng::from_entropy())
    }

    pub fn with_seed(width: u16, height: u16, seed: u64) -> Result<Self> {
        Game::with_rng(width, height, StdRng::seed_from_u64(seed))
    }

    pub fn from_config(config: &GameConfig) -> Result<Self> {
        match config.seed {
            Some(seed) => Game::with_seed(config.width, config.height, seed),
            None => Game::new(config.width, config.height),
        }
    }
}

impl<R> Game<R> {
    pub fn state(&self) -> State {
        self.state
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    /// `None` until the first start, and after the last tile has been eaten.
    pub fn food(&self) -> Option<Position> {
        self.food
    }

    /// Body tiles from tail to head.
    pub fn parts(&self) -> &VecDeque<Position> {
        self.snake.body()
    }

    /// Tiles per second.
    pub fn speed(&self) -> u32 {
        self.speed
    }

    pub fn direction(&self) -> Direction {
        self.direction
    }

    pub fn pending_directions(&self) -> &VecDeque<Direction> {
        &self.directions
    }

    pub fn width(&self) -> u16 {
        self.field.width()
    }

    pub fn height(&self) -> u16 {
        self.field.height()
    }

    pub fn score(&self) -> usize {
        self.snake.len() - 1
    }

    pub fn last_move_time(&self) -> u64 {
        self.last_move_ms
    }

    pub fn is_over(&self) -> bool {
        matches!(self.state, State::Loss | State::Win | State::Quit)
    }
}

impl<R: Rng> Game<R> {
    pub fn with_rng(width: u16, height: u16, rng: R) -> Result<Self> {
        let field = Field::new(width, height)?;

        let mut game = Game {
            field,
            state: State::Start,
            snake: Snake::new(field.center()),
            food: None,
            direction: Direction::Right,
            directions: VecDeque::new(),
            speed: INITIAL_SPEED,
            last_move_ms: 0,
            rng,
        };
        game.reset();
        Ok(game)
    }

    /// Advances the simulation to `now_ms`.
    ///
    /// Does nothing unless running. Moves as many whole tiles as the current
    /// speed covers since the last move; a call that covers no tile leaves the
    /// last move time alone so the remainder keeps accumulating.
    pub fn update(&mut self, now_ms: u64) -> Result<Hit> {
        if self.state != State::Running {
            return Ok(Hit::None);
        }

        let tiles = self.elapsed_tiles(now_ms)?;
        self.take_direction(tiles > 0);

        if tiles == 0 {
            return Ok(Hit::None);
        }

        self.last_move_ms = now_ms;
        let hit = self.snake.advance(&self.field, self.direction, tiles, self.food);
        trace!("moved {} tile(s) {:?} to {:?}: {:?}", tiles, self.direction, self.head(), hit);

        match hit {
            Hit::None => {}
            Hit::SelfCollision => {
                info!("snake ran into itself at {:?}, score {}", self.head(), self.score());
                self.state = State::Loss;
            }
            Hit::Food => self.state = self.consume_food(),
        }

        Ok(hit)
    }

    /// Queues a turn for a later tick. Returns whether it was queued.
    ///
    /// Only accepted while running, and never twice in a row for the same
    /// direction. Reversals are queued too but get thrown away when they
    /// come up.
    pub fn try_change_direction(&mut self, direction: Direction) -> bool {
        if self.state != State::Running {
            return false;
        }

        let pending = self.directions.back().copied().unwrap_or(self.direction);
        if direction == pending {
            return false;
        }

        self.directions.push_back(direction);
        true
    }

    pub fn toggle_pause(&mut self, now_ms: u64) {
        match self.state {
            State::Start => {
                self.reset();
                self.food = self.spawn_food();
                self.last_move_ms = now_ms;
                self.state = State::Running;
                info!("game started at {}ms on a {}x{} field", now_ms, self.width(), self.height());
            }
            State::Paused => {
                self.last_move_ms = now_ms;
                self.state = State::Running;
                info!("resumed at {}ms", now_ms);
            }
            State::Running => {
                self.state = State::Paused;
                info!("paused at {}ms", now_ms);
            }
            State::Loss | State::Win | State::Quit => {}
        }
    }

    pub fn reset(&mut self) {
        self.state = State::Start;
        self.snake = Snake::new(self.field.center());
        self.direction = Direction::Right;
        self.directions.clear();
        self.food = None;
        self.speed = INITIAL_SPEED;
        self.last_move_ms = 0;
        debug!("reset to {:?}", self.head());
    }

    pub fn quit(&mut self) {
        self.reset();
        self.state = State::Quit;
        info!("quit");
    }

    ///////////////////////////////////////////////////////////////////////////

    fn elapsed_tiles(&self, now_ms: u64) -> Result<usize> {
        if now_ms < self.last_move_ms {
            warn!("rejecting update at {}ms, last move was at {}ms", now_ms, self.last_move_ms);
            return Err(GameError::ClockWentBackwards { now: now_ms, last: self.last_move_ms });
        }

        let dt = now_ms - self.last_move_ms;
        // Rounded to the nearest whole tile.
        let tiles = (u64::from(self.speed).saturating_mul(dt).saturating_add(500)) / 1000;
        Ok(tiles as usize)
    }

    /// Looks at the oldest queued turn. A reversal is dropped on sight; any
    /// other turn is only taken once the snake actually moves.
    fn take_direction(&mut self, moving: bool) {
        let next = match self.directions.front() {
            Some(&next) => next,
            None => return,
        };

        if next == self.direction.opposite() {
            self.directions.pop_front();
            debug!("dropped reversal {:?} while heading {:?}", next, self.direction);
        } else if moving {
            self.directions.pop_front();
            self.direction = next;
        }
    }

    fn consume_food(&mut self) -> State {
        self.food = None;

        match self.snake.grow(&self.field, self.direction) {
            Some(tail) => debug!("ate food at {:?}, new tail {:?}", self.head(), tail),
            None => {
                info!("no room to grow behind {:?}, score {}", self.snake.tail(), self.score());
                return State::Loss;
            }
        }

        if self.snake.len() == self.field.area() {
            info!("board filled, score {}", self.score());
            return State::Win;
        }

        self.food = self.spawn_food();

        let speed = next_speed(self.speed);
        if speed != self.speed {
            debug!("speed {} -> {}", self.speed, speed);
            self.speed = speed;
        }

        State::Running
    }

    fn spawn_food(&mut self) -> Option<Position> {
        if self.snake.len() >= self.field.area() {
            warn!("no free tile left for food");
            return None;
        }

        let (width, height) = (self.field.width() as i32, self.field.height() as i32);
        loop {
            let pos = Position::new(self.rng.gen_range(0..width), self.rng.gen_range(0..height));
            if !self.snake.contains(pos) {
                debug!("food placed at {:?}", pos);
                return Some(pos);
            }
        }
    }
}
