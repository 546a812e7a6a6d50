use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use crate::error::{GameError, Result};
use Direction::*;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Position { x, y }
    }
}

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Up, Down, Left, Right];

    /// Unit step, with `y` growing downwards.
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn from_delta(dx: i32, dy: i32) -> Option<Direction> {
        match (dx, dy) {
            (0, -1) => Some(Up),
            (0, 1) => Some(Down),
            (-1, 0) => Some(Left),
            (1, 0) => Some(Right),
            _ => None,
        }
    }

    pub fn opposite(self) -> Direction {
        match self {
            Up => Down,
            Down => Up,
            Left => Right,
            Right => Left,
        }
    }

    pub fn is_vertical(self) -> bool {
        matches!(self, Up | Down)
    }
}

/// Outcome of one movement batch. At most one hit is reported per batch and
/// a collision always wins over food.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Hit {
    None,
    SelfCollision,
    Food,
}

/// The toroidal board. Moving past an edge re-enters from the opposite one.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Field {
    width: u16,
    height: u16,
}

impl Field {
    pub fn new(width: u16, height: u16) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(GameError::EmptyField { width, height });
        }
        Ok(Field { width, height })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    /// Number of tiles on the board.
    pub fn area(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Position {
        Position::new(self.width as i32 / 2, self.height as i32 / 2)
    }

    pub fn contains(&self, pos: Position) -> bool {
        (0..self.width as i32).contains(&pos.x) && (0..self.height as i32).contains(&pos.y)
    }

    /// The tile one step away from `pos` in `direction`.
    pub fn wrap_step(&self, pos: Position, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(
            (pos.x + dx).rem_euclid(self.width as i32),
            (pos.y + dy).rem_euclid(self.height as i32),
        )
    }

    /// Direction of the unit step leading from `from` to the adjacent tile `to`.
    ///
    /// A raw delta of `dimension - 1` across a wrapped edge is a single step
    /// the other way. Returns `None` if the tiles are not adjacent.
    pub fn direction_between(&self, from: Position, to: Position) -> Option<Direction> {
        let dx = unwrap_delta(to.x - from.x, self.width as i32);
        let dy = unwrap_delta(to.y - from.y, self.height as i32);
        Direction::from_delta(dx, dy)
    }
}

fn unwrap_delta(delta: i32, dimension: i32) -> i32 {
    match delta {
        0 => 0,
        d if d == dimension - 1 => -1,
        d if d == 1 - dimension => 1,
        d => d,
    }
}

/// Snake body, ordered from the tail (front) to the head (back). Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    pub fn new(pos: Position) -> Self {
        Snake { body: VecDeque::from(vec![pos]) }
    }

    #[cfg(test)]
    pub(crate) fn from_body(body: VecDeque<Position>) -> Self {
        assert!(!body.is_empty());
        Snake { body }
    }

    pub fn body(&self) -> &VecDeque<Position> {
        &self.body
    }

    pub fn head(&self) -> Position {
        *self.body.back().expect("Snake body should not be empty")
    }

    pub fn tail(&self) -> Position {
        *self.body.front().expect("Snake body should not be empty")
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Like `contains`, ignoring the first `skip_tail` tiles.
    fn contains_after(&self, pos: Position, skip_tail: usize) -> bool {
        self.body.iter().skip(skip_tail).any(|p| *p == pos)
    }

    /// Moves `tiles` steps in `direction` and trims the same number of tiles
    /// off the tail, so the length is unchanged.
    ///
    /// On step `i` the `i + 1` oldest tiles have already left, so running into
    /// them is not a collision. Once a collision is seen it sticks for the rest
    /// of the batch.
    pub fn advance(&mut self, field: &Field, direction: Direction, tiles: usize, food: Option<Position>) -> Hit {
        let mut hit = Hit::None;

        for i in 0..tiles {
            let new_head = field.wrap_step(self.head(), direction);

            if hit != Hit::SelfCollision {
                if self.contains_after(new_head, i + 1) {
                    hit = Hit::SelfCollision;
                } else if food == Some(new_head) {
                    hit = Hit::Food;
                }
            }

            self.body.push_back(new_head);
        }

        self.body.drain(0..tiles);
        hit
    }

    /// Direction the tail was travelling in, read off the two oldest tiles.
    /// A single-tile body has no history and takes `fallback`.
    pub fn tail_direction(&self, field: &Field, fallback: Direction) -> Direction {
        match (self.body.get(0), self.body.get(1)) {
            (Some(&tail), Some(&before_tail)) => field
                .direction_between(tail, before_tail)
                .unwrap_or(fallback),
            _ => fallback,
        }
    }

    /// Where a grown tail segment goes: one step behind the current tail.
    ///
    /// If that tile is taken, the two tiles to the side of the tail are tried
    /// in order (Left/Right for a vertical tail, Up/Down for a horizontal one).
    /// If all three are taken the tile behind is returned anyway.
    pub fn next_tail(&self, field: &Field, fallback: Direction) -> Position {
        let tail = self.tail();
        let tail_direction = self.tail_direction(field, fallback);
        let behind = field.wrap_step(tail, tail_direction.opposite());

        if !self.contains(behind) {
            return behind;
        }

        let sideways = if tail_direction.is_vertical() { [Left, Right] } else { [Up, Down] };
        match sideways.iter().map(|d| field.wrap_step(tail, *d)).find(|p| !self.contains(*p)) {
            Some(assisted) => {
                log::debug!("tail crash at {:?}, growing sideways to {:?}", behind, assisted);
                assisted
            }
            None => behind,
        }
    }

    /// Prepends a tail segment. Returns `None`, leaving the body untouched,
    /// when there is no free tile next to the tail.
    pub fn grow(&mut self, field: &Field, fallback: Direction) -> Option<Position> {
        let new_tail = self.next_tail(field, fallback);
        if self.contains(new_tail) {
            return None;
        }

        self.body.push_front(new_tail);
        Some(new_tail)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn field(width: u16, height: u16) -> Field {
        Field::new(width, height).unwrap()
    }

    fn snake(tiles: &[(i32, i32)]) -> Snake {
        Snake::from_body(tiles.iter().map(|&(x, y)| Position::new(x, y)).collect())
    }

    fn tiles(snake: &Snake) -> Vec<(i32, i32)> {
        snake.body().iter().map(|p| (p.x, p.y)).collect()
    }

    #[test]
    fn opposite_negates_delta() {
        for d in Direction::ALL.iter() {
            let (dx, dy) = d.delta();
            assert_eq!(d.opposite().delta(), (-dx, -dy));
            assert_eq!(Direction::from_delta(dx, dy), Some(*d));
        }
        assert_eq!(Direction::from_delta(1, 1), None);
        assert_eq!(Direction::from_delta(0, 0), None);
    }

    #[test]
    fn rejects_empty_field() {
        assert_eq!(Field::new(0, 5), Err(GameError::EmptyField { width: 0, height: 5 }));
        assert_eq!(Field::new(5, 0), Err(GameError::EmptyField { width: 5, height: 0 }));
    }

    #[test]
    fn wraps_on_every_edge() {
        let f = field(4, 3);
        assert_eq!(f.wrap_step(Position::new(3, 1), Right), Position::new(0, 1));
        assert_eq!(f.wrap_step(Position::new(0, 1), Left), Position::new(3, 1));
        assert_eq!(f.wrap_step(Position::new(2, 0), Up), Position::new(2, 2));
        assert_eq!(f.wrap_step(Position::new(2, 2), Down), Position::new(2, 0));
        assert_eq!(f.wrap_step(Position::new(1, 1), Down), Position::new(1, 2));
    }

    #[test]
    fn wrap_stays_on_field() {
        let f = field(3, 2);
        for x in 0..3 {
            for y in 0..2 {
                let pos = Position::new(x, y);
                assert!(f.contains(pos));
                for d in Direction::ALL.iter() {
                    assert!(f.contains(f.wrap_step(pos, *d)));
                }
            }
        }
        assert!(!f.contains(Position::new(3, 0)));
        assert!(!f.contains(Position::new(0, -1)));
    }

    #[test]
    fn direction_between_across_edges() {
        let f = field(5, 4);
        assert_eq!(f.direction_between(Position::new(1, 1), Position::new(2, 1)), Some(Right));
        assert_eq!(f.direction_between(Position::new(4, 1), Position::new(0, 1)), Some(Right));
        assert_eq!(f.direction_between(Position::new(0, 1), Position::new(4, 1)), Some(Left));
        assert_eq!(f.direction_between(Position::new(2, 0), Position::new(2, 3)), Some(Up));
        assert_eq!(f.direction_between(Position::new(2, 3), Position::new(2, 0)), Some(Down));
        assert_eq!(f.direction_between(Position::new(0, 0), Position::new(2, 0)), None);
    }

    #[test]
    fn direction_between_on_thin_fields() {
        let column = field(1, 4);
        assert_eq!(column.direction_between(Position::new(0, 1), Position::new(0, 2)), Some(Down));
        assert_eq!(column.direction_between(Position::new(0, 3), Position::new(0, 0)), Some(Down));

        let narrow = field(2, 2);
        assert!(narrow.direction_between(Position::new(0, 0), Position::new(1, 0)).is_some());
    }

    #[test]
    fn advance_keeps_length() {
        let f = field(10, 10);
        let mut s = snake(&[(1, 1), (2, 1), (3, 1)]);

        assert_eq!(s.advance(&f, Right, 2, None), Hit::None);
        assert_eq!(tiles(&s), vec![(3, 1), (4, 1), (5, 1)]);
        assert_eq!(s.head(), Position::new(5, 1));
        assert_eq!(s.tail(), Position::new(3, 1));
    }

    #[test]
    fn advance_zero_tiles_is_noop() {
        let f = field(10, 10);
        let mut s = snake(&[(1, 1), (2, 1)]);
        assert_eq!(s.advance(&f, Right, 0, Some(Position::new(3, 1))), Hit::None);
        assert_eq!(tiles(&s), vec![(1, 1), (2, 1)]);
    }

    #[test]
    fn advance_into_vacated_tail_is_safe() {
        let f = field(10, 10);
        let mut s = snake(&[(1, 1), (2, 1), (2, 2), (1, 2)]);

        assert_eq!(s.advance(&f, Up, 1, None), Hit::None);
        assert_eq!(tiles(&s), vec![(2, 1), (2, 2), (1, 2), (1, 1)]);
    }

    #[test]
    fn advance_into_body_collides() {
        let f = field(10, 10);
        let mut s = snake(&[(1, 1), (2, 1), (3, 1), (3, 2), (2, 2)]);
        assert_eq!(s.advance(&f, Up, 1, None), Hit::SelfCollision);
    }

    #[test]
    fn collision_beats_earlier_food() {
        let f = field(5, 5);
        let mut s = snake(&[(0, 0), (1, 0), (2, 0), (3, 0), (3, 1), (3, 2), (2, 2), (1, 2), (1, 1)]);
        assert_eq!(s.advance(&f, Right, 2, Some(Position::new(2, 1))), Hit::SelfCollision);
    }

    #[test]
    fn collision_sticks_past_later_food() {
        let f = field(6, 6);
        let mut s = snake(&[(0, 0), (1, 0), (2, 0), (2, 1), (1, 1), (0, 1), (0, 2), (1, 2)]);
        // Up from (1, 2) runs into (1, 1), then reaches the food at (1, 0).
        assert_eq!(s.advance(&f, Up, 2, Some(Position::new(1, 0))), Hit::SelfCollision);
    }

    #[test]
    fn reports_food_once() {
        let f = field(10, 10);
        let mut s = snake(&[(1, 1), (2, 1)]);
        assert_eq!(s.advance(&f, Right, 3, Some(Position::new(3, 1))), Hit::Food);
        assert_eq!(tiles(&s), vec![(4, 1), (5, 1)]);
    }

    #[test]
    fn long_batch_on_short_snake() {
        let f = field(4, 4);
        let mut s = snake(&[(1, 1)]);
        assert_eq!(s.advance(&f, Right, 6, None), Hit::None);
        assert_eq!(tiles(&s), vec![(3, 1)]);
    }

    #[test]
    fn tail_direction_from_history() {
        let f = field(6, 6);
        assert_eq!(snake(&[(1, 1), (1, 2)]).tail_direction(&f, Right), Down);
        assert_eq!(snake(&[(0, 3), (5, 3)]).tail_direction(&f, Right), Left);
        assert_eq!(snake(&[(4, 5), (4, 0)]).tail_direction(&f, Left), Down);
        assert_eq!(snake(&[(2, 2)]).tail_direction(&f, Up), Up);
    }

    #[test]
    fn grows_behind_tail() {
        let f = field(6, 6);
        let mut s = snake(&[(2, 2), (3, 2)]);
        assert_eq!(s.grow(&f, Right), Some(Position::new(1, 2)));
        assert_eq!(tiles(&s), vec![(1, 2), (2, 2), (3, 2)]);
    }

    #[test]
    fn grows_across_wrapped_edge() {
        let f = field(6, 6);
        let mut s = snake(&[(0, 3), (1, 3)]);
        assert_eq!(s.grow(&f, Right), Some(Position::new(5, 3)));

        let mut s = snake(&[(2, 5), (2, 0)]);
        assert_eq!(s.grow(&f, Left), Some(Position::new(2, 4)));
    }

    #[test]
    fn single_tile_grows_against_fallback() {
        let f = field(3, 3);
        let mut s = snake(&[(2, 1)]);
        assert_eq!(s.grow(&f, Right), Some(Position::new(1, 1)));
    }

    #[test]
    fn tail_crash_goes_sideways() {
        let f = field(6, 6);
        // Tail (2, 2) heads Right; the tile behind it, (1, 2), is taken.
        let s = snake(&[(2, 2), (3, 2), (3, 3), (2, 3), (1, 3), (1, 2)]);
        assert_eq!(s.next_tail(&f, Right), Position::new(2, 1));

        // Up is taken as well, so Down wins.
        let s = snake(&[(2, 2), (3, 2), (3, 1), (2, 1), (1, 1), (1, 2)]);
        assert_eq!(s.next_tail(&f, Right), Position::new(2, 3));

        // Vertical tail tries Left, then Right.
        let s = snake(&[(2, 2), (2, 3), (3, 3), (3, 4), (2, 4), (1, 4), (1, 3), (1, 2), (1, 1), (2, 1)]);
        assert_eq!(s.next_tail(&f, Right), Position::new(3, 2));
    }

    #[test]
    fn tail_crash_without_room() {
        let f = field(6, 6);
        let mut s = snake(&[
            (2, 2), (3, 2), (3, 3), (2, 3), (1, 3), (1, 2), (1, 1), (2, 1),
        ]);
        assert_eq!(s.next_tail(&f, Right), Position::new(1, 2));
        assert_eq!(s.grow(&f, Right), None);
        assert_eq!(s.len(), 8);
    }
}
