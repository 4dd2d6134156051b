use std::collections::VecDeque;

use Direction::*;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: u16,
    pub y: u16,
}

impl Position {
    pub fn new(x: u16, y: u16) -> Self {
        Position { x, y }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right
}

impl Direction {
    pub fn delta(self) -> (i32, i32) {
        match self {
            Up => (0, -1),
            Down => (0, 1),
            Left => (-1, 0),
            Right => (1, 0),
        }
    }

    pub fn is_opposite(self, other: Direction) -> bool {
        matches!((self, other), (Up, Down) | (Down, Up) | (Right, Left) | (Left, Right))
    }
}

/// Size of the playing field in cells. Positions live in `0..width` x `0..height`.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Grid {
    pub width: u16,
    pub height: u16,
}

impl Grid {
    pub fn new(width: u16, height: u16) -> Self {
        Grid { width, height }
    }

    pub fn cells(&self) -> usize {
        self.width as usize * self.height as usize
    }

    pub fn center(&self) -> Position {
        Position::new(self.width / 2, self.height / 2)
    }

    /// One step from `pos` towards `dir`, re-entering from the opposite edge
    /// when it leaves the grid.
    pub fn step(&self, pos: Position, dir: Direction) -> Position {
        let (dx, dy) = dir.delta();
        let x = (pos.x as i32 + dx).rem_euclid(self.width as i32);
        let y = (pos.y as i32 + dy).rem_euclid(self.height as i32);
        Position::new(x as u16, y as u16)
    }
}

/// Body segments, head first.
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    body: VecDeque<Position>,
}

impl Snake {
    pub fn new(head: Position) -> Self {
        Snake { body: VecDeque::from(vec![head]) }
    }

    #[cfg(test)]
    pub fn from_segments(segments: &[Position]) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(Snake { body: segments.iter().copied().collect() })
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    #[cfg(test)]
    pub fn segments(&self) -> impl Iterator<Item = &Position> {
        self.body.iter()
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Puts a new head in front. Unless `grow` is set, the tail segment is
    /// dropped and returned so the length stays the same.
    pub fn advance(&mut self, new_head: Position, grow: bool) -> Option<Position> {
        self.body.push_front(new_head);
        if grow {
            None
        } else {
            self.body.pop_back()
        }
    }
}
