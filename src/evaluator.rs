//! Heuristic move selection for the automated player.
//!
//! This is not a search. A move is picked in stages:
//!
//! 1. During the opening, free star points are taken with some probability.
//! 2. Candidates are the empty points near existing stones (or every empty
//!    point on a sparse board), filtered for legality.
//! 3. Each candidate gets a cheap positional/capture score plus jitter.
//! 4. The top few are verified tactically one ply deep: self-atari, ladders,
//!    liberty-neutral connections and eye filling are penalised.
//! 5. The best verified candidate wins. If all of them are laddered, the best
//!    unverified candidate is used instead.
//!
//! Every stage works on copies of the request's grid.

use std::collections::HashSet;
use std::panic::{self, AssertUnwindSafe};

use fastrand::Rng;
use tracing::{debug, error};

use crate::board::{Color, Grid, Point};
use crate::capture::simulate;
use crate::config::Config;
use crate::constants::{
    ATARI_BONUS, CAPTURE_BONUS, DEFAULT_LINE_BONUS, EDGE_PENALTY, EYE_FILL_PENALTY,
    FOURTH_LINE_BONUS, JITTER, LADDER_PENALTY, PRESSURE_BONUS, SELF_ATARI_PENALTY,
    SHORT_OF_LIBERTIES_PENALTY, THIRD_LINE_BONUS, USELESS_CONNECTION_PENALTY,
};
use crate::group::{adjacent_empty, group, liberties, liberty_points};
use crate::rules::{is_eye, is_legal};

/// Immutable snapshot handed to the evaluator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub grid: Grid,
    pub to_move: Color,
    pub move_count: usize,
    pub ko_point: Option<Point>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub point: Point,
    pub score: f64,
}

/// Result of the one-ply tactical check on a shortlisted candidate.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Verification {
    pub adjustment: f64,
    /// Self-atari with no escape; the candidate is out unless nothing else is left
    pub laddered: bool,
}

/// Pick a move for `request.to_move`, or `None` to pass.
pub fn choose_move(request: &EvaluationRequest, config: &Config, rng: &mut Rng) -> Option<Point> {
    let grid = &request.grid;
    let color = request.to_move;

    if request.move_count < config.opening_moves {
        if let Some(pt) = opening_move(request, config, rng) {
            debug!(%pt, "opening star point");
            return Some(pt);
        }
    }

    let mut candidates: Vec<Candidate> = candidate_points(grid, config)
        .into_iter()
        .filter(|&pt| is_legal(grid, pt, color, request.ko_point))
        .map(|pt| Candidate {
            point: pt,
            score: heuristic_score(grid, pt, color) + rng.f64() * JITTER,
        })
        .collect();
    if candidates.is_empty() {
        debug!(%color, "no legal candidates");
        return None;
    }
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));

    let shortlist: Vec<(Candidate, Verification)> = candidates
        .iter()
        .take(config.shortlist)
        .map(|&c| (c, verify(grid, c.point, color)))
        .collect();

    let choice = select(&shortlist).unwrap_or_else(|| {
        debug!("every shortlisted move is laddered; using best unverified");
        candidates[0]
    });
    debug!(pt = %choice.point, score = choice.score, "chosen");
    Some(choice.point)
}

/// [`choose_move`], but a panic inside the evaluator becomes a pass.
pub fn evaluate_safely(request: &EvaluationRequest, config: &Config, rng: &mut Rng) -> Option<Point> {
    pass_on_panic(|| choose_move(request, config, rng))
}

fn pass_on_panic<F>(f: F) -> Option<Point>
where
    F: FnOnce() -> Option<Point>,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(choice) => choice,
        Err(_) => {
            error!("move evaluation panicked; passing instead");
            None
        }
    }
}

/// Star points at a fixed distance from the edges: 3 on 13x13 and up, 2 below.
/// Boards smaller than 7x7 have none, since the lines would meet.
pub fn star_points(size: usize) -> Vec<Point> {
    if size < 7 {
        return Vec::new();
    }
    let d = if size >= 13 { 3 } else { 2 };
    let lines = [d, size - 1 - d];
    lines
        .iter()
        .flat_map(|&x| lines.iter().map(move |&y| Point::new(x, y)))
        .collect()
}

fn opening_move(request: &EvaluationRequest, config: &Config, rng: &mut Rng) -> Option<Point> {
    star_points(request.grid.size()).into_iter().find(|&pt| {
        is_legal(&request.grid, pt, request.to_move, request.ko_point)
            && rng.f64() < config.opening_accept
    })
}

/// Empty points within `search_radius` (Chebyshev) of any stone. Falls back
/// to every empty point on a clear board or when too few points qualify.
pub fn candidate_points(grid: &Grid, config: &Config) -> Vec<Point> {
    let empty: Vec<Point> = grid.points().filter(|&p| grid.is_empty_at(p)).collect();
    if grid.is_clear() {
        return empty;
    }
    let near: Vec<Point> = empty
        .iter()
        .copied()
        .filter(|&p| has_stone_within(grid, p, config.search_radius))
        .collect();
    if near.len() < config.shortlist {
        empty
    } else {
        near
    }
}

fn has_stone_within(grid: &Grid, p: Point, radius: usize) -> bool {
    let last = grid.size() - 1;
    let (x0, x1) = (p.x.saturating_sub(radius), (p.x + radius).min(last));
    let (y0, y1) = (p.y.saturating_sub(radius), (p.y + radius).min(last));
    (y0..=y1).any(|y| (x0..=x1).any(|x| !grid.is_empty_at(Point::new(x, y))))
}

/// First-pass score without jitter: line preference, captures, and pressure on
/// adjacent opponent groups.
pub fn heuristic_score(grid: &Grid, pt: Point, color: Color) -> f64 {
    let mut score = match grid.edge_distance(pt) {
        0 => EDGE_PENALTY,
        2 => THIRD_LINE_BONUS,
        3 => FOURTH_LINE_BONUS,
        _ => DEFAULT_LINE_BONUS,
    };

    let (after, placement) = simulate(grid, pt, color);
    score += CAPTURE_BONUS * placement.stones_captured() as f64;

    let opp = color.opponent();
    let mut seen: HashSet<Point> = HashSet::new();
    for n in after.neighbors(pt) {
        if after.get(n) != Some(opp) || seen.contains(&n) {
            continue;
        }
        let stones = group(&after, n, opp);
        score += match adjacent_empty(&after, &stones).len() {
            1 => ATARI_BONUS,
            2 => PRESSURE_BONUS,
            _ => 0.0,
        };
        seen.extend(stones);
    }
    score
}

/// One-ply tactical check of playing `color` at `pt`.
pub fn verify(grid: &Grid, pt: Point, color: Color) -> Verification {
    let (after, placement) = simulate(grid, pt, color);
    let mut adjustment = 0.0;
    let mut laddered = false;

    if placement.captured.is_empty() {
        match liberties(&after, pt, color) {
            1 if is_laddered(&after, pt, color) => {
                adjustment += LADDER_PENALTY;
                laddered = true;
            }
            1 => adjustment += SELF_ATARI_PENALTY,
            2 => adjustment += SHORT_OF_LIBERTIES_PENALTY,
            _ => {}
        }
        if is_useless_connection(grid, &after, pt, color) {
            adjustment += USELESS_CONNECTION_PENALTY;
        }
    }
    if is_eye(grid, pt, color) {
        adjustment += EYE_FILL_PENALTY;
    }

    Verification {
        adjustment,
        laddered,
    }
}

/// The group at `pt` (already placed on `after`) cannot get a second liberty
/// by extending into any of its liberties. Checked one move deep.
pub fn is_laddered(after: &Grid, pt: Point, color: Color) -> bool {
    !liberty_points(after, pt, color).into_iter().any(|lib| {
        let (extended, _) = simulate(after, lib, color);
        liberties(&extended, lib, color) > 1
    })
}

/// The move joins existing own groups but ends up with no more liberties than
/// the best of them had before.
fn is_useless_connection(before: &Grid, after: &Grid, pt: Point, color: Color) -> bool {
    let previous_best = before
        .neighbors(pt)
        .filter(|&n| before.get(n) == Some(color))
        .map(|n| liberties(before, n, color))
        .max();
    match previous_best {
        Some(best) => liberties(after, pt, color) <= best,
        None => false,
    }
}

/// Best candidate after tactical adjustment, ignoring laddered ones.
fn select(shortlist: &[(Candidate, Verification)]) -> Option<Candidate> {
    shortlist
        .iter()
        .filter(|(_, v)| !v.laddered)
        .map(|(c, v)| Candidate {
            point: c.point,
            score: c.score + v.adjustment,
        })
        .max_by(|a, b| a.score.total_cmp(&b.score))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_with(size: usize, black: &[(usize, usize)], white: &[(usize, usize)]) -> Grid {
        let mut grid = Grid::new(size);
        for &(x, y) in black {
            grid.set(Point::new(x, y), Some(Color::Black));
        }
        for &(x, y) in white {
            grid.set(Point::new(x, y), Some(Color::White));
        }
        grid
    }

    fn request(grid: Grid, to_move: Color, move_count: usize) -> EvaluationRequest {
        EvaluationRequest {
            grid,
            to_move,
            move_count,
            ko_point: None,
        }
    }

    fn seeded(config: Config) -> (Config, Rng) {
        (config, Rng::with_seed(7))
    }

    #[test]
    fn test_star_points() {
        assert_eq!(
            star_points(13),
            vec![
                Point::new(3, 3),
                Point::new(3, 9),
                Point::new(9, 3),
                Point::new(9, 9)
            ]
        );
        assert!(star_points(9).contains(&Point::new(6, 2)));
    }

    #[test]
    fn test_star_points_small_boards() {
        assert!(star_points(5).is_empty());
        assert!(star_points(6).is_empty());
        let seven = star_points(7);
        let distinct: HashSet<Point> = seven.iter().copied().collect();
        assert_eq!(distinct.len(), 4);
        assert!(seven.iter().all(|p| p.x != 3 && p.y != 3));
    }

    #[test]
    fn test_opening_takes_star_point() {
        let (config, mut rng) = seeded(Config {
            opening_accept: 1.0,
            ..Config::default()
        });
        let req = request(Grid::new(13), Color::Black, 0);
        assert_eq!(choose_move(&req, &config, &mut rng), Some(Point::new(3, 3)));
    }

    #[test]
    fn test_opening_skips_occupied_star_point() {
        let (config, mut rng) = seeded(Config {
            opening_accept: 1.0,
            ..Config::default()
        });
        let req = request(grid_with(13, &[(3, 3)], &[]), Color::White, 1);
        assert_eq!(choose_move(&req, &config, &mut rng), Some(Point::new(3, 9)));
    }

    #[test]
    fn test_without_opening_prefers_third_line() {
        let (config, mut rng) = seeded(Config {
            opening_accept: 0.0,
            ..Config::default()
        });
        let req = request(Grid::new(13), Color::Black, 0);
        let pt = choose_move(&req, &config, &mut rng).unwrap();
        assert_eq!(req.grid.edge_distance(pt), 2);
    }

    #[test]
    fn test_candidates_near_stones() {
        let config = Config::default();
        let grid = grid_with(13, &[(6, 6)], &[]);
        let points = candidate_points(&grid, &config);
        assert_eq!(points.len(), 24);
        assert!(points.iter().all(|p| p.x.abs_diff(6) <= 2 && p.y.abs_diff(6) <= 2));
    }

    #[test]
    fn test_candidates_fall_back_to_whole_board() {
        let config = Config {
            shortlist: 30,
            ..Config::default()
        };
        let grid = grid_with(13, &[(6, 6)], &[]);
        assert_eq!(candidate_points(&grid, &config).len(), 168);
    }

    #[test]
    fn test_takes_capture() {
        let (config, mut rng) = seeded(Config {
            opening_moves: 0,
            ..Config::default()
        });
        // White (6,6) has its last liberty at (6,7).
        let grid = grid_with(13, &[(5, 6), (7, 6), (6, 5)], &[(6, 6)]);
        let req = request(grid, Color::Black, 20);
        assert_eq!(choose_move(&req, &config, &mut rng), Some(Point::new(6, 7)));
    }

    #[test]
    fn test_heuristic_rewards_atari() {
        let grid = grid_with(13, &[(5, 6), (7, 6)], &[(6, 6)]);
        let atari = heuristic_score(&grid, Point::new(6, 5), Color::Black);
        let quiet = heuristic_score(&grid, Point::new(10, 6), Color::Black);
        assert!(atari - quiet >= ATARI_BONUS - 30.0);
    }

    #[test]
    fn test_laddered_self_atari() {
        // Black at (0,0) would have one liberty at (0,1), and extending there
        // runs into White (0,2) and (1,1).
        let grid = grid_with(9, &[], &[(1, 0), (0, 2), (1, 1)]);
        let v = verify(&grid, Point::new(0, 0), Color::Black);
        assert!(v.laddered);
        assert!(v.adjustment <= LADDER_PENALTY);
    }

    #[test]
    fn test_self_atari_with_escape() {
        let grid = grid_with(9, &[], &[(1, 0)]);
        let v = verify(&grid, Point::new(0, 0), Color::Black);
        assert!(!v.laddered);
        assert_eq!(v.adjustment, SELF_ATARI_PENALTY);
    }

    #[test]
    fn test_eye_fill_penalised() {
        let grid = grid_with(9, &[(1, 0), (0, 1)], &[]);
        let v = verify(&grid, Point::new(0, 0), Color::Black);
        assert!(!v.laddered);
        assert_eq!(v.adjustment, USELESS_CONNECTION_PENALTY + EYE_FILL_PENALTY);
    }

    #[test]
    fn test_two_liberties_penalised() {
        let grid = Grid::new(9);
        let v = verify(&grid, Point::new(0, 0), Color::Black);
        assert!(!v.laddered);
        assert_eq!(v.adjustment, SHORT_OF_LIBERTIES_PENALTY);
    }

    #[test]
    fn test_useless_connection_penalised() {
        // Joining (4,4) at (4,5) trades the liberty at (4,5) for nothing.
        let grid = grid_with(9, &[(4, 4)], &[(3, 5), (5, 5), (4, 6)]);
        assert!(!is_eye(&grid, Point::new(4, 5), Color::Black));
        let v = verify(&grid, Point::new(4, 5), Color::Black);
        assert!(!v.laddered);
        assert_eq!(v.adjustment, USELESS_CONNECTION_PENALTY);
    }

    #[test]
    fn test_open_point_not_penalised() {
        let grid = grid_with(9, &[(2, 2)], &[]);
        let v = verify(&grid, Point::new(6, 6), Color::Black);
        assert_eq!(v.adjustment, 0.0);
    }

    #[test]
    fn test_select_skips_laddered() {
        let good = Candidate {
            point: Point::new(1, 1),
            score: 10.0,
        };
        let trap = Candidate {
            point: Point::new(2, 2),
            score: 100.0,
        };
        let ok = Verification {
            adjustment: 0.0,
            laddered: false,
        };
        let bad = Verification {
            adjustment: LADDER_PENALTY,
            laddered: true,
        };
        assert_eq!(select(&[(trap, bad), (good, ok)]).map(|c| c.point), Some(good.point));
        assert_eq!(select(&[(trap, bad)]), None);
    }

    #[test]
    fn test_all_laddered_falls_back_to_best_candidate() {
        // White fills the board except (0,0), (1,0) and (4,4). Black can only
        // play one of the corner pair, and either is a dead self-atari.
        let mut grid = Grid::new(5);
        for p in grid.points().collect::<Vec<_>>() {
            grid.set(p, Some(Color::White));
        }
        for (x, y) in [(0, 0), (1, 0), (4, 4)] {
            grid.set(Point::new(x, y), None);
        }
        let corner = [Point::new(0, 0), Point::new(1, 0)];
        for pt in corner {
            assert!(verify(&grid, pt, Color::Black).laddered);
        }

        let (config, mut rng) = seeded(Config::with_board_size(5));
        let req = request(grid, Color::Black, 50);
        let choice = choose_move(&req, &config, &mut rng);
        assert!(choice.is_some_and(|pt| corner.contains(&pt)));
    }

    #[test]
    fn test_no_legal_move_passes() {
        // Every point is Black except (0,0), which Black cannot fill.
        let mut grid = Grid::new(5);
        for p in grid.points().collect::<Vec<_>>() {
            grid.set(p, Some(Color::Black));
        }
        grid.set(Point::new(0, 0), None);
        let (config, mut rng) = seeded(Config::with_board_size(5));
        let req = request(grid, Color::Black, 50);
        assert_eq!(choose_move(&req, &config, &mut rng), None);
    }

    #[test]
    fn test_respects_ko_point() {
        let (config, mut rng) = seeded(Config {
            opening_moves: 0,
            ..Config::default()
        });
        let grid = grid_with(13, &[(5, 6), (7, 6), (6, 5)], &[(6, 6)]);
        let req = EvaluationRequest {
            ko_point: Some(Point::new(6, 7)),
            ..request(grid, Color::Black, 20)
        };
        assert_ne!(choose_move(&req, &config, &mut rng), Some(Point::new(6, 7)));
    }

    #[test]
    fn test_panic_becomes_pass() {
        assert_eq!(pass_on_panic(|| panic!("boom")), None);
        assert_eq!(pass_on_panic(|| Some(Point::new(1, 2))), Some(Point::new(1, 2)));
    }
}
