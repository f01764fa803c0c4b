use chrono::NaiveDate;

use hoopstate::elo::{EloBook, EloConfig, expected_score, pregame_elos};
use hoopstate::manifest::GameMeta;

fn game(
    game_id: &str,
    day: u32,
    season_id: &str,
    home: u32,
    away: u32,
    pts: Option<(i32, i32)>,
) -> GameMeta {
    GameMeta {
        game_id: game_id.to_string(),
        game_date: NaiveDate::from_ymd_opt(2024, 11, day).expect("valid date"),
        season_id: season_id.to_string(),
        home_team_id: home,
        away_team_id: away,
        pts_home: pts.map(|p| p.0),
        pts_away: pts.map(|p| p.1),
    }
}

#[test]
fn unseen_team_defaults_to_initial_rating() {
    let book = EloBook::default();
    assert_eq!(book.rating_of("2024", 1), 1500.0);
}

#[test]
fn equal_ratings_home_win_opens_gap_of_ten() {
    let mut book = EloBook::default();
    book.record_result("2024", 1, 2, 100, 90);
    // expected = 0.5, so both sides move by K * 0.5 = 10.
    assert_eq!(book.rating_of("2024", 1), 1510.0);
    assert_eq!(book.rating_of("2024", 2), 1490.0);
}

#[test]
fn rating_moves_are_equal_and_opposite() {
    let mut book = EloBook::default();
    book.record_result("2024", 1, 2, 100, 90);
    // Second game between now-unequal teams: away upset win.
    let before_home = book.rating_of("2024", 1);
    let before_away = book.rating_of("2024", 2);
    book.record_result("2024", 1, 2, 95, 105);
    let delta_home = book.rating_of("2024", 1) - before_home;
    let delta_away = book.rating_of("2024", 2) - before_away;
    assert!(delta_home < 0.0);
    assert!((delta_home + delta_away).abs() < 1e-9);
}

#[test]
fn away_win_scales_with_expected_score() {
    let cfg = EloConfig::default();
    let mut book = EloBook::new(cfg);
    book.record_result("2024", 1, 2, 90, 100);
    let expected_home = expected_score(1500.0, 1500.0);
    let want = 1500.0 + cfg.k * (0.0 - expected_home);
    assert!((book.rating_of("2024", 1) - want).abs() < 1e-9);
}

#[test]
fn seasons_are_isolated_rating_namespaces() {
    let mut book = EloBook::default();
    book.record_result("2023", 1, 2, 100, 90);
    assert_ne!(book.rating_of("2023", 1), 1500.0);
    assert_eq!(book.rating_of("2024", 1), 1500.0);
    assert_eq!(book.rating_of("2024", 2), 1500.0);
}

#[test]
fn pregame_elos_reflect_prior_games_in_date_order() {
    let manifest = vec![
        // Listed out of date order on purpose; the fold must sort by date.
        game("g2", 2, "2024", 1, 2, Some((95, 99))),
        game("g1", 1, "2024", 1, 2, Some((100, 90))),
    ];
    let elos = pregame_elos(&manifest, EloConfig::default());
    assert_eq!(elos.len(), 2);
    assert_eq!(elos[0].game_id, "g1");
    assert_eq!(elos[0].home_elo, 1500.0);
    assert_eq!(elos[1].game_id, "g2");
    assert_eq!(elos[1].home_elo, 1510.0);
    assert_eq!(elos[1].away_elo, 1490.0);
}

#[test]
fn pregame_elos_skips_games_without_results() {
    let manifest = vec![
        game("g1", 1, "2024", 1, 2, Some((100, 90))),
        game("g2", 2, "2024", 1, 2, None),
        game("g3", 3, "2024", 1, 2, Some((88, 92))),
    ];
    let elos = pregame_elos(&manifest, EloConfig::default());
    let ids: Vec<&str> = elos.iter().map(|e| e.game_id.as_str()).collect();
    assert_eq!(ids, ["g1", "g3"]);
    // g2 contributed nothing: g3 sees only g1's update.
    assert_eq!(elos[1].home_elo, 1510.0);
}
