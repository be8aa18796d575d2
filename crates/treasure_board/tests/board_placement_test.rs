//! Tests for random treasure placement.

use std::collections::{HashMap, HashSet};

use rand::SeedableRng;
use rand::rngs::StdRng;
use treasure_board::{Board, BoardConfig, BoardInvariants, InvariantSet, Position};

#[test]
fn test_exact_count_for_many_shapes() {
    let mut rng = StdRng::seed_from_u64(2024);

    for rows in 1..=6 {
        for columns in 1..=6 {
            for treasure_count in 0..=rows * columns {
                let config = BoardConfig::new(rows, columns, treasure_count).expect("Valid config");
                let board = Board::generate(config, &mut rng).expect("Board generates");

                let positions: HashSet<Position> =
                    board.treasure_positions().into_iter().collect();
                assert_eq!(positions.len(), treasure_count);
                assert_eq!(board.treasure_count(), treasure_count);
                assert!(BoardInvariants::check_all(&board).is_ok());
            }
        }
    }
}

#[test]
fn test_single_treasure_lands_on_every_tile() {
    let config = BoardConfig::new(2, 2, 1).expect("Valid config");
    let mut rng = StdRng::seed_from_u64(99);
    let mut hits: HashMap<Position, usize> = HashMap::new();

    for _ in 0..4000 {
        let board = Board::generate(config, &mut rng).expect("Board generates");
        let positions = board.treasure_positions();
        assert_eq!(positions.len(), 1);
        *hits.entry(positions[0]).or_default() += 1;
    }

    assert_eq!(hits.len(), 4);
    for (spot, count) in hits {
        assert!(
            (850..=1150).contains(&count),
            "Placement skewed at {spot}: {count} of 4000"
        );
    }
}

#[test]
fn test_deserialized_config_is_validated_at_generation() {
    let config: BoardConfig =
        serde_json::from_str(r#"{"rows": 2, "columns": 2, "treasure_count": 9}"#)
            .expect("Deserializes without validation");
    let mut rng = StdRng::seed_from_u64(1);
    assert!(Board::generate(config, &mut rng).is_err());
}

#[test]
fn test_board_snapshot_round_trips_through_json() {
    let mut board = Board::random(BoardConfig::default()).expect("Board generates");
    board.reveal(9, 9).expect("Corner exists");

    let json = serde_json::to_string(&board).expect("Serializes");
    let decoded: Board = serde_json::from_str(&json).expect("Deserializes");
    assert_eq!(decoded, board);
    assert!(!decoded.find_tile(9, 9).expect("Corner exists").hidden());
}
