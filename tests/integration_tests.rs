//! Integration tests for goban
//!
//! End-to-end scenarios driven through `GameSession`: captures, ko, suicide,
//! undo, scoring and the automated player.

use goban::board::{Color, Move, Point};
use goban::capture;
use goban::config::Config;
use goban::error::{MoveError, SessionError};
use goban::group::liberties;
use goban::scoring;
use goban::session::{EventKind, GameSession, GameState, SessionEvent};

// =============================================================================
// Helper functions for setting up test positions
// =============================================================================

fn new_session() -> GameSession {
    GameSession::new(Config {
        seed: Some(2024),
        ..Config::default()
    })
    .unwrap()
}

/// Play a sequence of moves, alternating colors starting with whoever is to
/// move. Panics on an illegal move so broken setups fail loudly.
fn play_all(session: &mut GameSession, moves: &[(usize, usize)]) -> Vec<SessionEvent> {
    moves
        .iter()
        .map(|&(x, y)| {
            session
                .play(x, y)
                .unwrap_or_else(|e| panic!("setup move ({x}, {y}) rejected: {e}"))
        })
        .collect()
}

/// Every stone on the board has at least one liberty.
fn assert_no_dead_groups(session: &GameSession) {
    let grid = session.grid();
    for pt in grid.points() {
        if let Some(color) = grid.get(pt) {
            assert!(
                liberties(grid, pt, color) > 0,
                "{color} stone at {pt} has no liberties\n{grid}"
            );
        }
    }
}

/// Black builds a ko shape around (1,1)/(2,1) and captures at (2,1).
fn ko_position() -> GameSession {
    let mut s = new_session();
    play_all(
        &mut s,
        &[
            (1, 0),   // B
            (2, 0),   // W
            (0, 1),   // B
            (3, 1),   // W
            (1, 2),   // B
            (2, 2),   // W
            (10, 10), // B elsewhere
            (1, 1),   // W
            (2, 1),   // B takes the ko
        ],
    );
    s
}

// =============================================================================
// Basic play
// =============================================================================

#[test]
fn test_first_move_on_empty_board() {
    let mut s = new_session();
    let event = s.play(6, 6).unwrap();

    assert!(event.captured.is_empty());
    assert_eq!(liberties(s.grid(), Point::new(6, 6), Color::Black), 4);
    assert_eq!(s.to_move(), Color::White);
    assert_eq!(s.move_count(), 1);
    assert_eq!(s.history_len(), 1);
    assert_eq!(s.snapshot().last_move, Some(Point::new(6, 6)));
    assert_eq!(event.state, GameState::InProgress(Color::White));
}

#[test]
fn test_out_of_range_rejected_like_illegal() {
    let mut s = new_session();
    assert_eq!(
        s.play(13, 2).unwrap_err(),
        SessionError::IllegalMove(MoveError::OutOfBounds)
    );
    assert_eq!(s.history_len(), 0);
    assert_eq!(s.to_move(), Color::Black);
}

// =============================================================================
// Captures
// =============================================================================

#[test]
fn test_surrounded_stone_removed_by_capture() {
    let mut s = new_session();
    let events = play_all(
        &mut s,
        &[(4, 5), (5, 5), (6, 5), (0, 12), (5, 4), (1, 12), (5, 6)],
    );
    let last = events.last().unwrap();

    assert_eq!(last.captured, vec![Point::new(5, 5)]);
    assert!(s.grid().is_empty_at(Point::new(5, 5)));
    assert_eq!(s.prisoners().black, 1);
    assert_eq!(s.prisoners().white, 0);
    assert_eq!(s.ko_point(), None);
    assert_no_dead_groups(&s);

    // White cannot come back into the hole: it is suicide.
    assert_eq!(
        s.play(5, 5).unwrap_err(),
        SessionError::IllegalMove(MoveError::Suicide)
    );
}

#[test]
fn test_atari_reported() {
    let mut s = new_session();
    let events = play_all(&mut s, &[(4, 5), (5, 5), (6, 5), (0, 12), (5, 4)]);
    assert!(events.last().unwrap().atari);
    assert!(!events[0].atari);
}

#[test]
fn test_two_groups_captured_in_one_move() {
    let mut s = new_session();
    play_all(
        &mut s,
        &[
            (0, 0),
            (0, 1),
            (0, 2),
            (2, 1),
            (2, 0),
            (10, 10),
            (2, 2),
            (10, 11),
            (3, 1),
            (10, 12),
        ],
    );

    let (_, placement) = capture::simulate(s.grid(), Point::new(1, 1), Color::Black);
    assert_eq!(placement.captured.len(), 2);

    let event = s.play(1, 1).unwrap();
    let mut captured = event.captured.clone();
    captured.sort();
    assert_eq!(captured, vec![Point::new(0, 1), Point::new(2, 1)]);
    assert_eq!(s.prisoners().black, 2);
    assert_no_dead_groups(&s);
}

// =============================================================================
// Ko
// =============================================================================

#[test]
fn test_ko_immediate_recapture_rejected() {
    let mut s = ko_position();
    assert_eq!(s.ko_point(), Some(Point::new(1, 1)));
    assert_eq!(s.prisoners().black, 1);

    let before = s.snapshot().clone();
    assert_eq!(
        s.play(1, 1).unwrap_err(),
        SessionError::IllegalMove(MoveError::Ko)
    );
    assert_eq!(s.snapshot(), &before);
}

#[test]
fn test_ko_recapture_allowed_after_exchange() {
    let mut s = ko_position();
    s.play(11, 11).unwrap(); // W ko threat elsewhere
    assert_eq!(s.ko_point(), None);
    s.play(12, 11).unwrap(); // B answers elsewhere

    let event = s.play(1, 1).unwrap(); // W retakes
    assert_eq!(event.captured, vec![Point::new(2, 1)]);
    assert_eq!(s.prisoners().white, 1);
    // Now Black may not retake immediately.
    assert_eq!(s.ko_point(), Some(Point::new(2, 1)));
    assert_eq!(
        s.play(2, 1).unwrap_err(),
        SessionError::IllegalMove(MoveError::Ko)
    );
}

#[test]
fn test_pass_clears_ko() {
    let mut s = ko_position();
    s.pass().unwrap();
    assert_eq!(s.ko_point(), None);
}

// =============================================================================
// Undo
// =============================================================================

#[test]
fn test_play_then_undo_restores_everything() {
    let mut s = ko_position();
    let candidates = [(11, 11), (6, 6), (0, 0), (12, 12), (3, 0)];
    for (x, y) in candidates {
        let before = s.snapshot().clone();
        if s.play(x, y).is_ok() {
            s.undo().unwrap();
            assert_eq!(s.snapshot(), &before, "undo after ({x}, {y})");
        }
    }
}

#[test]
fn test_undo_capture_restores_prisoners_and_stones() {
    let mut s = new_session();
    play_all(&mut s, &[(4, 5), (5, 5), (6, 5), (0, 12), (5, 4), (1, 12)]);
    let before = s.snapshot().clone();

    s.play(5, 6).unwrap();
    assert_eq!(s.prisoners().black, 1);

    let event = s.undo().unwrap();
    assert_eq!(event.kind, EventKind::Undone);
    assert_eq!(s.snapshot(), &before);
    assert_eq!(s.grid().get(Point::new(5, 5)), Some(Color::White));
}

#[test]
fn test_undo_restores_ko_point() {
    let mut s = ko_position();
    let before = s.snapshot().clone();
    s.play(11, 11).unwrap();
    assert_eq!(s.ko_point(), None);
    s.undo().unwrap();
    assert_eq!(s.snapshot(), &before);
    assert_eq!(s.ko_point(), Some(Point::new(1, 1)));
}

// =============================================================================
// End of game and scoring
// =============================================================================

#[test]
fn test_two_passes_score_enclosed_corner() {
    let mut s = new_session();
    play_all(
        &mut s,
        &[
            (2, 0),
            (8, 8),
            (2, 1),
            (8, 9),
            (2, 2),
            (8, 10),
            (1, 2),
            (9, 8),
            (0, 2),
            (10, 8),
        ],
    );
    s.pass().unwrap();
    let event = s.pass().unwrap();

    let GameState::Finished(result) = event.state else {
        panic!("game should be over");
    };
    for (x, y) in [(0, 0), (0, 1), (1, 0), (1, 1)] {
        assert_eq!(result.territory.owner(Point::new(x, y)), Some(Color::Black));
    }
    assert_eq!(result.territory.owner(Point::new(6, 6)), None);
    assert_eq!(result.score.black_area, 4);
    assert_eq!(result.score.black_total, 4.0);
    assert_eq!(
        result.score.white_total,
        result.score.white_area as f32 + 6.5
    );

    // Scoring the same terminal position again gives the same answer.
    let again = scoring::score(s.grid(), s.prisoners(), s.config().komi);
    assert_eq!(&again, s.result().unwrap());
}

#[test]
fn test_finished_session_refuses_moves_until_restart() {
    let mut s = new_session();
    s.pass().unwrap();
    s.pass().unwrap();
    assert_eq!(s.play(3, 3).unwrap_err(), SessionError::GameFinished);

    s.restart();
    assert!(!s.is_finished());
    assert!(s.play(3, 3).is_ok());
}

// =============================================================================
// Automated player
// =============================================================================

#[test]
fn test_self_play_never_leaves_dead_groups() {
    let mut s = new_session();
    for _ in 0..80 {
        if s.is_finished() {
            break;
        }
        s.request_evaluation().unwrap();
        let event = s.wait_evaluation().unwrap();
        for pt in &event.captured {
            assert!(event.grid.is_empty_at(*pt));
        }
        assert_no_dead_groups(&s);
    }
}

#[test]
fn test_automated_player_answers_via_poll() {
    let mut s = new_session();
    s.set_auto_player(Some(Color::White));
    s.play(6, 6).unwrap();

    let event = loop {
        if let Some(event) = s.poll_evaluation() {
            break event;
        }
        std::thread::yield_now();
    };
    match event.kind {
        EventKind::Played(Move { point, color }) => {
            assert_eq!(color, Color::White);
            assert_eq!(s.grid().get(point), Some(Color::White));
        }
        EventKind::Passed(color) => assert_eq!(color, Color::White),
        other => panic!("unexpected event {other:?}"),
    }
    assert_eq!(s.to_move(), Color::Black);
    assert!(s.play(0, 0).is_ok());
}

#[test]
fn test_automated_black_moves_first() {
    let mut s = new_session();
    s.set_auto_player(Some(Color::Black));
    assert!(s.evaluation_pending());
    let event = s.wait_evaluation().unwrap();
    assert!(matches!(
        event.kind,
        EventKind::Played(Move {
            color: Color::Black,
            ..
        })
    ));
    assert_eq!(s.to_move(), Color::White);
}

#[test]
fn test_restart_discards_in_flight_evaluation() {
    let mut s = new_session();
    s.set_auto_player(Some(Color::White));
    s.play(6, 6).unwrap();
    assert!(s.evaluation_pending());

    s.restart();
    assert!(!s.evaluation_pending());
    assert!(s.grid().is_clear());
    assert_eq!(s.poll_evaluation(), None);
    assert_eq!(s.history_len(), 0);
}
