use rand::Rng;

use crate::snake::{Direction, Grid, Position, Snake};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Status {
    Running,
    /// The head ran into the body.
    GameOver,
    /// The snake fills the whole grid, there is nowhere left to put food.
    Cleared,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TickOutcome {
    /// No direction requested yet, nothing moved.
    Idle,
    Moved,
    Ate,
    Crashed,
    Cleared,
    /// The round already ended.
    Halted,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    grid: Grid,
    snake: Snake,
    food: Position,
    score: u32,
    heading: Option<Direction>,
    requested: Option<Direction>,
    status: Status,
}

impl GameState {
    /// One-cell snake at the centre of the grid, standing still.
    pub fn new<R: Rng>(grid: Grid, rng: &mut R) -> Self {
        let snake = Snake::new(grid.center());
        // A 2x2 grid is the smallest allowed, so there is always a free cell here
        let food = place_food(grid, &snake, rng).unwrap_or(grid.center());
        GameState::with_layout(grid, snake, food)
    }

    pub fn with_layout(grid: Grid, snake: Snake, food: Position) -> Self {
        GameState { grid, snake, food, score: 0, heading: None, requested: None, status: Status::Running }
    }

    pub fn snake(&self) -> &Snake {
        &self.snake
    }

    pub fn food(&self) -> Position {
        self.food
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn is_game_over(&self) -> bool {
        self.status == Status::GameOver
    }

    /// Direction the snake moved in on its last tick.
    #[cfg(test)]
    pub fn heading(&self) -> Option<Direction> {
        self.heading
    }

    /// Direction the next tick will move in.
    #[cfg(test)]
    pub fn direction(&self) -> Option<Direction> {
        self.requested
    }

    /// Sets the snake moving in `dir` as of now, so a turn straight back is
    /// refused even before the first tick.
    pub fn launch(&mut self, dir: Direction) {
        self.heading = Some(dir);
        self.requested = Some(dir);
    }

    /// Requests a direction for the next tick. Turning straight back onto the
    /// current heading is ignored. Returns whether the request was taken.
    pub fn steer(&mut self, dir: Direction) -> bool {
        match self.heading {
            Some(heading) if heading.is_opposite(dir) => false,
            _ => {
                self.requested = Some(dir);
                true
            }
        }
    }

    pub fn tick<R: Rng>(&mut self, rng: &mut R) -> TickOutcome {
        if self.status != Status::Running {
            return TickOutcome::Halted;
        }

        let dir = match self.requested {
            Some(dir) => dir,
            None => return TickOutcome::Idle,
        };

        let new_head = self.grid.step(self.snake.head(), dir);
        if self.snake.contains(new_head) {
            self.status = Status::GameOver;
            return TickOutcome::Crashed;
        }

        self.heading = Some(dir);

        if new_head != self.food {
            self.snake.advance(new_head, false);
            return TickOutcome::Moved;
        }

        self.snake.advance(new_head, true);
        self.score += 1;

        match place_food(self.grid, &self.snake, rng) {
            Some(food) => {
                self.food = food;
                TickOutcome::Ate
            }
            None => {
                self.status = Status::Cleared;
                TickOutcome::Cleared
            }
        }
    }
}

/// Picks a uniformly random cell not covered by the snake, or `None` when the
/// snake covers every cell.
pub fn place_food<R: Rng>(grid: Grid, snake: &Snake, rng: &mut R) -> Option<Position> {
    if snake.len() >= grid.cells() {
        return None;
    }

    loop {
        let pos = Position::new(rng.gen_range(0..grid.width), rng.gen_range(0..grid.height));
        if !snake.contains(pos) {
            return Some(pos);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snake::Direction::*;
    use rand::{rngs::StdRng, SeedableRng};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    fn pos(x: u16, y: u16) -> Position {
        Position::new(x, y)
    }

    fn state(grid: Grid, body: &[Position], food: Position) -> GameState {
        GameState::with_layout(grid, Snake::from_segments(body).unwrap(), food)
    }

    #[test]
    fn test_new_state() {
        let state = GameState::new(Grid::new(20, 20), &mut rng());

        assert_eq!(state.snake().head(), pos(10, 10));
        assert_eq!(state.snake().len(), 1);
        assert_eq!(state.score(), 0);
        assert_eq!(state.status(), Status::Running);
        assert_eq!(state.direction(), None);
        assert!(!state.snake().contains(state.food()));
    }

    #[test]
    fn test_idle_until_steered() {
        let mut state = GameState::new(Grid::new(20, 20), &mut rng());
        let before = state.clone();

        assert_eq!(state.tick(&mut rng()), TickOutcome::Idle);
        assert_eq!(state, before);
    }

    #[test]
    fn test_plain_move_keeps_length() {
        let mut state = state(Grid::new(20, 20), &[pos(5, 5), pos(4, 5), pos(3, 5)], pos(15, 15));
        state.steer(Right);

        assert_eq!(state.tick(&mut rng()), TickOutcome::Moved);
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.snake().head(), pos(6, 5));
        assert!(!state.snake().contains(pos(3, 5)));
        assert_eq!(state.score(), 0);
        assert_eq!(state.heading(), Some(Right));
    }

    #[test]
    fn test_wraps_left_edge() {
        let mut state = state(Grid::new(20, 20), &[pos(0, 4)], pos(9, 9));
        state.steer(Left);

        state.tick(&mut rng());

        assert_eq!(state.snake().head(), pos(19, 4));
        assert_eq!(state.status(), Status::Running);
    }

    #[test]
    fn test_wraps_bottom_edge() {
        let mut state = state(Grid::new(20, 20), &[pos(4, 19)], pos(9, 9));
        state.steer(Down);

        state.tick(&mut rng());

        assert_eq!(state.snake().head(), pos(4, 0));
    }

    #[test]
    fn test_eating_grows_and_scores_once() {
        let mut state = state(Grid::new(20, 20), &[pos(5, 5), pos(4, 5)], pos(6, 5));
        state.steer(Right);

        assert_eq!(state.tick(&mut rng()), TickOutcome::Ate);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 3);
        assert!(state.snake().contains(pos(4, 5)));
        assert!(!state.snake().contains(state.food()));

        state.food = pos(15, 15);
        assert_eq!(state.tick(&mut rng()), TickOutcome::Moved);
        assert_eq!(state.snake().len(), 3);
        assert_eq!(state.score(), 1);
    }

    #[test]
    fn test_self_collision_halts_everything() {
        // Head at (5,5) heading up into a loop whose body covers (5,4)
        let body = [pos(5, 5), pos(6, 5), pos(6, 4), pos(5, 4), pos(4, 4)];
        let mut state = state(Grid::new(20, 20), &body, pos(15, 15));
        state.steer(Up);
        let before = state.snake().clone();

        assert_eq!(state.tick(&mut rng()), TickOutcome::Crashed);
        assert!(state.is_game_over());
        assert_eq!(state.snake(), &before);
        assert_eq!(state.score(), 0);

        state.steer(Left);
        assert_eq!(state.tick(&mut rng()), TickOutcome::Halted);
        assert_eq!(state.snake(), &before);
    }

    #[test]
    fn test_moving_into_tail_cell_crashes() {
        let body = [pos(5, 5), pos(5, 6), pos(6, 6), pos(6, 5)];
        let mut state = state(Grid::new(20, 20), &body, pos(15, 15));
        state.steer(Right);

        assert_eq!(state.tick(&mut rng()), TickOutcome::Crashed);
    }

    #[test]
    fn test_reversal_is_ignored() {
        let mut state = state(Grid::new(20, 20), &[pos(5, 5), pos(4, 5)], pos(15, 15));
        state.steer(Right);
        state.tick(&mut rng());

        assert!(!state.steer(Left));
        assert_eq!(state.direction(), Some(Right));

        assert!(state.steer(Up));
        assert_eq!(state.direction(), Some(Up));
    }

    #[test]
    fn test_quick_double_turn_cannot_reverse() {
        let mut state = state(Grid::new(20, 20), &[pos(5, 5), pos(4, 5), pos(3, 5)], pos(15, 15));
        state.steer(Right);
        state.tick(&mut rng());

        // Up then Left before the next tick: Left is still checked against Right
        assert!(state.steer(Up));
        assert!(!state.steer(Left));
        assert_eq!(state.tick(&mut rng()), TickOutcome::Moved);
        assert_eq!(state.snake().head(), pos(6, 4));
    }

    #[test]
    fn test_any_direction_before_first_move() {
        let mut state = GameState::new(Grid::new(20, 20), &mut rng());

        assert!(state.steer(Left));
        assert!(state.steer(Right));
        assert_eq!(state.direction(), Some(Right));
    }

    #[test]
    fn test_reversal_refused_right_after_launch() {
        let mut state = state(Grid::new(20, 20), &[pos(10, 10)], pos(0, 0));
        state.launch(Right);

        assert!(!state.steer(Left));
        assert_eq!(state.direction(), Some(Right));
        assert_eq!(state.tick(&mut rng()), TickOutcome::Moved);
        assert_eq!(state.snake().head(), pos(11, 10));
    }

    #[test]
    fn test_turn_allowed_right_after_launch() {
        let mut state = state(Grid::new(20, 20), &[pos(10, 10)], pos(0, 0));
        state.launch(Right);

        assert!(state.steer(Up));
        state.tick(&mut rng());
        assert_eq!(state.snake().head(), pos(10, 9));
    }

    #[test]
    fn test_length_never_shrinks() {
        let mut rng = rng();
        let mut state = GameState::new(Grid::new(6, 6), &mut rng);
        let turns = [Right, Down, Left, Down, Right, Up, Right, Down, Down, Left];

        for (i, turn) in turns.iter().cycle().take(300).enumerate() {
            if i % 3 == 0 {
                state.steer(*turn);
            }
            let len = state.snake().len();
            let score = state.score();

            match state.tick(&mut rng) {
                TickOutcome::Moved => assert_eq!(state.snake().len(), len),
                TickOutcome::Ate | TickOutcome::Cleared => {
                    assert_eq!(state.snake().len(), len + 1);
                    assert_eq!(state.score(), score + 1);
                }
                TickOutcome::Crashed | TickOutcome::Halted => break,
                TickOutcome::Idle => unreachable!(),
            }

            let mut cells: Vec<_> = state.snake().segments().copied().collect();
            cells.sort_by_key(|p| (p.x, p.y));
            cells.dedup();
            assert_eq!(cells.len(), state.snake().len());
        }
    }

    #[test]
    fn test_food_never_on_snake() {
        let grid = Grid::new(4, 4);
        let body: Vec<Position> = (0..15).map(|i| pos(i % 4, i / 4)).collect();
        let snake = Snake::from_segments(&body).unwrap();
        let mut rng = rng();

        for _ in 0..50 {
            assert_eq!(place_food(grid, &snake, &mut rng), Some(pos(3, 3)));
        }

        let short = Snake::from_segments(&body[..5]).unwrap();
        for _ in 0..200 {
            let food = place_food(grid, &short, &mut rng).unwrap();
            assert!(!short.contains(food));
            assert!(food.x < 4 && food.y < 4);
        }
    }

    #[test]
    fn test_full_board_has_no_food() {
        let grid = Grid::new(2, 2);
        let snake = Snake::from_segments(&[pos(0, 0), pos(1, 0), pos(1, 1), pos(0, 1)]).unwrap();

        assert_eq!(place_food(grid, &snake, &mut rng()), None);
    }

    #[test]
    fn test_filling_the_board_clears() {
        let grid = Grid::new(2, 2);
        let mut state = state(grid, &[pos(0, 1), pos(1, 1), pos(1, 0)], pos(0, 0));
        state.steer(Up);

        assert_eq!(state.tick(&mut rng()), TickOutcome::Cleared);
        assert_eq!(state.status(), Status::Cleared);
        assert_eq!(state.score(), 1);
        assert_eq!(state.snake().len(), 4);
        assert_eq!(state.tick(&mut rng()), TickOutcome::Halted);
    }
}
