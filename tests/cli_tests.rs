use std::time::Duration;

use clap::Parser;

use matrix_rain::cli::{Args, Inputs};
use matrix_rain::core::Engine;
use matrix_rain::types::CharPool;

fn parse(list: &[&str]) -> Args {
    let mut argv = vec!["matrix-rain"];
    argv.extend_from_slice(list);
    Args::try_parse_from(argv).unwrap()
}

#[test]
fn stream_flag_feeds_the_engine() {
    let resolved = parse(&["--stream", "AB", "--seed", "3", "--number-of-streams", "20"])
        .resolve(&Inputs::default())
        .unwrap();
    assert_eq!(resolved.config.pool, CharPool::Source(vec!['A', 'B']));

    let mut engine = Engine::new(resolved.config);
    engine.resize(80, 24);
    assert_eq!(engine.pool().len(), 20);
    for _ in 0..200 {
        engine.tick(Duration::from_millis(25));
    }
    for g in engine.grid().cells() {
        assert!(g.is_blank() || g.character == 'A' || g.character == 'B');
    }
}

#[test]
fn same_seed_same_animation() {
    let run = || {
        let config = parse(&["--ascii", "--seed", "11"])
            .resolve(&Inputs::default())
            .unwrap()
            .config;
        let mut engine = Engine::new(config);
        engine.resize(50, 16);
        for _ in 0..100 {
            engine.tick(Duration::from_millis(10));
        }
        engine
            .grid()
            .cells()
            .iter()
            .map(|g| (g.character, g.color))
            .collect::<Vec<_>>()
    };
    assert_eq!(run(), run());
}

#[test]
fn unknown_flag_is_an_error() {
    assert!(Args::try_parse_from(["matrix-rain", "--rainbow"]).is_err());
}
