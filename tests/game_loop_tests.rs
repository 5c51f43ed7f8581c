mod common;

use common::{approx, arena, game_with_player, quiet_config};
use gridcaster::events::GameEvent;
use gridcaster::levels::default_level;
use gridcaster::snapshot::GameSnapshot;
use gridcaster::{Config, ControlInput, EnemyState, Game, GameStatus};

const DT: f32 = 1.0 / 60.0;

fn idle() -> ControlInput {
    ControlInput::default()
}

#[test]
fn new_game_spawns_configured_enemies() {
    let config = Config::default();
    let count = config.enemies.count;
    let game = Game::new(config, default_level());

    assert_eq!(game.status, GameStatus::Playing);
    assert_eq!(game.enemies.len(), count);
    for enemy in &game.enemies.enemies {
        assert!(game.map.is_valid_spawn(enemy.pose.x, enemy.pose.y, enemy.radius));
    }
    assert_eq!(game.cast_rays().len(), game.config().screen.columns);
}

#[test]
fn walking_forward_moves_along_heading() {
    let mut game = game_with_player(arena(12, 12), 2.5, 5.5, 0.0);
    let input = ControlInput {
        forward: 1.0,
        ..idle()
    };
    for _ in 0..60 {
        game.update(&input, DT);
    }
    let walk = game.config().player.walk_speed;
    assert!(approx(game.player.pose.x, 2.5 + walk, 1e-3), "x = {}", game.player.pose.x);
    assert!(approx(game.player.pose.y, 5.5, 1e-4));
    assert!(approx(game.clock, 1.0, 1e-4));
}

#[test]
fn player_stops_at_walls() {
    let mut game = game_with_player(arena(6, 6), 2.5, 2.5, 0.0);
    let input = ControlInput {
        forward: 1.0,
        run: true,
        ..idle()
    };
    for _ in 0..300 {
        game.update(&input, DT);
    }
    let radius = game.player.radius;
    assert!(game.player.pose.x <= 5.0 - radius);
    assert!(!game.map.check_rect_collision(game.player.pose.x, game.player.pose.y, radius));
}

#[test]
fn shooting_an_enemy_logs_kill_and_prune() {
    let mut game = game_with_player(arena(12, 12), 2.5, 5.5, 0.0);
    let enemy_config = game.config().enemies.clone();
    let id = game.enemies.spawn(7.5, 5.5, &enemy_config);

    let fire = ControlInput {
        fire: true,
        ..idle()
    };
    for _ in 0..30 {
        game.update(&fire, DT);
    }
    assert_eq!(game.enemies.get(id).map(|enemy| enemy.state), Some(EnemyState::Dead));
    assert_eq!(game.weapon.ammo, game.weapon.max_ammo - 2);

    let time_to_prune = (enemy_config.corpse_time / DT).ceil() as usize + 2;
    for _ in 0..time_to_prune {
        game.update(&idle(), DT);
    }
    assert!(game.enemies.get(id).is_none());

    let events: Vec<&GameEvent> = game.events.events().iter().map(|logged| &logged.event).collect();
    assert!(events.contains(&&GameEvent::EnemyStateChanged {
        enemy_id: id,
        from: EnemyState::Idle,
        to: EnemyState::Chase,
    }));
    assert_eq!(
        events.iter().filter(|e| matches!(e, GameEvent::ShotFired { .. })).count(),
        2
    );
    assert!(events.contains(&&GameEvent::EnemyKilled { enemy_id: id }));
    assert!(events.contains(&&GameEvent::EnemiesPruned { ids: vec![id] }));

    // Kill precedes prune
    let kill = events.iter().position(|e| matches!(e, GameEvent::EnemyKilled { .. }));
    let prune = events.iter().position(|e| matches!(e, GameEvent::EnemiesPruned { .. }));
    assert!(kill < prune);
}

#[test]
fn player_death_freezes_until_restart() {
    let mut config = quiet_config();
    config.player.start_x = 2.5;
    config.player.start_y = 5.5;
    config.enemies.attack_damage = 60.0;
    let mut game = Game::new(config, arena(12, 12));
    let enemy_config = game.config().enemies.clone();
    game.enemies.spawn(3.5, 5.5, &enemy_config);

    for _ in 0..(3.0 / DT) as usize {
        game.update(&idle(), DT);
        if game.status == GameStatus::PlayerDead {
            break;
        }
    }
    assert_eq!(game.status, GameStatus::PlayerDead);
    assert_eq!(game.player.health, 0.0);

    let damaged = game
        .events
        .events()
        .iter()
        .filter(|logged| matches!(logged.event, GameEvent::PlayerDamaged { .. }))
        .count();
    assert_eq!(damaged, 2);
    assert_eq!(
        game.events.events().last().map(|logged| &logged.event),
        Some(&GameEvent::PlayerDied)
    );

    let frozen = game.clock;
    let event_count = game.events.events().len();
    for _ in 0..30 {
        game.update(&idle(), DT);
    }
    assert_eq!(game.clock, frozen);
    assert_eq!(game.events.events().len(), event_count);

    game.restart();
    assert_eq!(game.status, GameStatus::Playing);
    assert_eq!(game.player.health, game.player.max_health);
    assert!(game.enemies.is_empty());
    assert_eq!(game.clock, 0.0);
}

#[test]
fn same_seed_same_session() {
    let mut a = Game::new(Config::default(), default_level());
    let mut b = Game::new(Config::default(), default_level());
    let input = ControlInput {
        forward: 0.5,
        strafe: 0.5,
        look_dx: 20.0,
        ..idle()
    };
    for _ in 0..240 {
        a.update(&input, DT);
        b.update(&input, DT);
    }
    assert_eq!(a.snapshot(), b.snapshot());
}

#[test]
fn snapshot_survives_file_round_trip() {
    let mut game = Game::new(Config::default(), default_level());
    for _ in 0..30 {
        game.update(&idle(), DT);
    }
    let snapshot = game.snapshot();
    assert_eq!(snapshot.enemies.len(), game.enemies.len());
    assert_eq!(snapshot.live_enemies().count(), game.enemies.live_count());

    let path = std::env::temp_dir().join("gridcaster_snapshot_test.json");
    let path = path.to_string_lossy().to_string();
    snapshot.save_to_file(&path).unwrap();
    let loaded = GameSnapshot::load_from_file(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert_eq!(loaded, snapshot);
}

#[test]
fn event_log_can_be_saved_as_json() {
    let mut game = game_with_player(arena(12, 12), 2.5, 5.5, 0.0);
    game.update(
        &ControlInput {
            fire: true,
            ..idle()
        },
        DT,
    );

    let path = std::env::temp_dir().join("gridcaster_events_test.json");
    let path = path.to_string_lossy().to_string();
    game.events.save_to_file(&path).unwrap();
    let json = std::fs::read_to_string(&path).unwrap();
    let _ = std::fs::remove_file(&path);
    assert!(json.contains("ShotFired"));
    assert!(json.contains("WallHit"));
}

#[test]
fn map_ascii_marks_player() {
    let game = game_with_player(arena(5, 4), 2.5, 1.5, 0.0);
    assert_eq!(game.map_ascii(), "11111\n1.P.1\n1...1\n11111\n");
}
