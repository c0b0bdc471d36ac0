use connectn::{
    best_move, Board, Cell, Difficulty, GameConfig, Hint, MinimaxStrategy, MoveRequest, Position,
    RandomStrategy, Strategy, Token,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Plays a random game from `seed` and hands every intermediate position
/// (with the side to move) to `visit`.
fn random_positions(seed: u64, mut visit: impl FnMut(&Board, Token)) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut board = Board::new(6, 7, 4);
    let mut token = Token::X;
    loop {
        let columns = board.legal_columns();
        if columns.is_empty() {
            return;
        }
        visit(&board, token);
        let col = columns[rng.random_range(0..columns.len())];
        let row = board.drop(col, token).unwrap();
        if board.is_winning_move(row, col) {
            return;
        }
        token = token.opponent();
    }
}

fn wins_immediately(board: &Board, col: usize, token: Token) -> bool {
    let mut child = board.clone();
    child
        .drop(col, token)
        .is_some_and(|row| child.is_winning_move(row, col))
}

#[test]
fn classic_bottom_row_scenario() {
    let mut board = Board::new(6, 7, 4);
    for col in 0..3 {
        assert_eq!(board.drop(col, Token::X), Some(5));
    }
    assert!(!board.is_winning_move(5, 2));
    assert_eq!(board.drop(3, Token::X), Some(5));
    assert!(board.is_winning_move(5, 3));
    println!("{board}");
}

#[test]
fn drop_then_undo_is_identity_across_games() {
    for seed in 0..20 {
        random_positions(seed, |board, token| {
            let mut scratch = board.clone();
            for col in board.legal_columns() {
                let height = scratch.column_height(col);
                let row = scratch.drop(col, token).unwrap();
                assert_eq!(row, board.rows() - 1 - height);
                assert_eq!(scratch.column_height(col), height + 1);
                assert_eq!(scratch.get(row, col), Cell::Occupied(token));
                scratch.undo(row, col).unwrap();
                assert_eq!(&scratch, board);
            }
        });
    }
}

#[test]
fn shallow_minimax_agrees_with_the_hint() {
    // At depth 2 minimax only sees its own immediate wins and the
    // opponent's immediate replies, which is exactly what the hint checks.
    let mut strategy = MinimaxStrategy::with_depth(2).unwrap();
    for seed in 0..30 {
        random_positions(seed, |board, token| {
            let own_win = board
                .legal_columns()
                .into_iter()
                .find(|&col| wins_immediately(board, col, token));
            let chosen = strategy.choose_move(board, token, token.opponent()).unwrap();

            let mut scratch = board.clone();
            let hint = Hint::new(&mut scratch, token, token.opponent()).unwrap();
            assert_eq!(&scratch, board);

            match (own_win, hint.recommended()) {
                (Some(col), _) => assert_eq!(chosen, col),
                (None, Some(col)) => assert_eq!(chosen, col),
                (None, None) => assert_eq!(Some(chosen), board.legal_columns().first().copied()),
            }
        });
    }
}

#[test]
fn minimax_blocks_where_heuristic_blocks() {
    // Depth 3 ends on the searcher's own ply, so an immediately safe column
    // can never score as a loss.
    let mut hard = MinimaxStrategy::with_depth(3).unwrap();
    let mut medium = Difficulty::Medium.seeded_strategy(9);
    let mut blocks = 0;
    for seed in 100..140 {
        random_positions(seed, |board, token| {
            let opponent = token.opponent();
            let mut scratch = board.clone();
            let hint = Hint::new(&mut scratch, token, opponent).unwrap();
            let col = hard.choose_move(board, token, opponent).unwrap();
            if wins_immediately(board, col, token) || hint.recommended().is_none() {
                return;
            }
            assert!(
                hint.safe_columns().contains(&col),
                "minimax chose unsafe column {col} for {token:?}\n{board}"
            );

            let own_win = board
                .legal_columns()
                .into_iter()
                .any(|c| wins_immediately(board, c, token));
            let threat = board
                .legal_columns()
                .into_iter()
                .find(|&c| wins_immediately(board, c, opponent));
            if let (false, Some(threat)) = (own_win, threat) {
                assert_eq!(col, threat);
                assert_eq!(medium.choose_move(board, token, opponent).unwrap(), threat);
                blocks += 1;
            }
        });
    }
    assert!(blocks > 0, "no blocking positions were generated");
}

#[test]
fn strategies_do_not_touch_the_board() {
    let mut strategies: Vec<Box<dyn Strategy>> = vec![
        Box::new(RandomStrategy::seeded(1)),
        Difficulty::Medium.seeded_strategy(1),
        Box::new(MinimaxStrategy::with_depth(3).unwrap()),
    ];
    random_positions(42, |board, token| {
        let before = board.clone();
        for strategy in strategies.iter_mut() {
            let col = strategy.choose_move(board, token, token.opponent()).unwrap();
            assert!(!board.is_column_full(col), "{} picked full column", strategy.name());
        }
        assert_eq!(board, &before);
    });
}

#[test]
fn wins_when_available_on_wide_board() {
    // Connect-5 on a 7x9 board: X holds columns 4-7 of the bottom row and
    // O has closed column 3, so only column 8 wins.
    let config = GameConfig::new(7, 9, 5);
    let history = "X4O3X5O4X6O5X7O6";
    let position = Position::from_history_str(config, history).unwrap();
    assert_eq!(position.to_move(), Token::X);

    let response = best_move(MoveRequest {
        position: history.to_string(),
        config,
        difficulty: "hard".to_string(),
        seed: None,
    })
    .unwrap();
    assert_eq!(response.column, 8);
    assert_eq!(response.row, 6);
    assert!(response.won);
}
