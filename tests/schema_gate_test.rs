//! JSON shape of the snapshot and event records consumed by observers and the
//! event log. Renaming a field here breaks downstream readers.

use puyo_chain::core::{Board, EngineConfig, Session, SessionEvent};
use puyo_chain::types::{GameAction, PuyoColor};

fn red_session(bottom: &str) -> Session {
    let mut rows = vec!["......"; 11];
    rows.push(bottom);
    let board = Board::from_ascii(&rows).unwrap();
    let config = EngineConfig {
        palette: vec![PuyoColor::Red],
        ..EngineConfig::default()
    };
    Session::from_board(config, board, 3).unwrap()
}

#[test]
fn snapshot_json_fields() {
    let session = Session::new_default(1);
    let v = serde_json::to_value(session.snapshot()).unwrap();

    for key in [
        "width",
        "height",
        "cells",
        "active",
        "ghost_drop",
        "next",
        "next_next",
        "score",
        "chain_count",
        "last_chain",
        "running",
        "phase",
        "paused",
        "nuisance",
        "seed",
        "piece_id",
        "episode_id",
        "elapsed_secs",
    ] {
        assert!(v.get(key).is_some(), "snapshot missing {}", key);
    }
    assert_eq!(v["phase"], "falling");
    assert_eq!(v["running"], true);
    assert!(v["active"]["pivot"]["color"].is_string());
    assert!(v["nuisance"]["denominations"].as_array().unwrap().is_empty());

    let cell = &v["cells"][0];
    assert!(cell["color"].is_null());
    assert_eq!(cell["popping"], false);
}

#[test]
fn chain_event_json_is_tagged() {
    let mut session = red_session("RR....");
    session.process_input(GameAction::RotateCcw);
    session.process_input(GameAction::HardDrop);
    while session.phase() == puyo_chain::types::Phase::Resolving {
        session.tick(0.1);
    }

    let events = session.take_events();
    let json: Vec<serde_json::Value> = events
        .iter()
        .map(|e| serde_json::to_value(e).unwrap())
        .collect();

    assert_eq!(json[0]["type"], "locked");
    assert_eq!(json[0]["piece_id"], 1);
    assert_eq!(json[0]["cells"].as_array().unwrap().len(), 2);

    let chain = json
        .iter()
        .find(|v| v["type"] == "chain")
        .expect("chain event");
    assert_eq!(chain["chain"], 1);
    assert_eq!(chain["cleared"], 4);
    assert_eq!(chain["increment"], 40);
    assert_eq!(chain["colors"], serde_json::json!(["red"]));
    assert_eq!(chain["groups"], serde_json::json!([4]));
    assert_eq!(chain["nuisance_count"], 0);
}

#[test]
fn game_over_event_json() {
    let event = SessionEvent::GameOver { score: 120, pieces: 9 };
    let v = serde_json::to_value(&event).unwrap();
    assert_eq!(v, serde_json::json!({"type": "game_over", "score": 120, "pieces": 9}));
}

#[test]
fn config_round_trips_through_json() {
    let config = EngineConfig::from_json_str(r#"{"palette": ["red", "purple"], "height": 14}"#)
        .unwrap();
    assert_eq!(config.height, 14);
    assert_eq!(config.width, 6);

    let v = serde_json::to_value(&config).unwrap();
    assert_eq!(v["palette"], serde_json::json!(["red", "purple"]));
    assert_eq!(v["nuisance_target_points"], 70);
}
