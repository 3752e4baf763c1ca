mod common;

use arena_core::environment::{GameMode, Location, TeardownVerdict};
use arena_core::game::{EndReason, Game};
use common::{Host, Spleef, env};
use std::collections::BTreeSet;

fn spleef_with_spawn(host: &mut Host, spawn: Location) {
    host.registry.load_games().unwrap();
    host.registry.create_game(env("spleef_1"), "spleef").unwrap();
    host.registry
        .game_mut(&env("spleef_1"))
        .unwrap()
        .set_spawn_point(Some(spawn));
}

#[test]
fn test_countdown_starts_game_with_occupants_at_spawn() {
    let mut host = Host::new();
    let spawn = Location::new(5.0, 90.0, 5.0);
    spleef_with_spawn(&mut host, spawn);
    let alice = host.join("spleef_1");
    let bob = host.join("spleef_1");
    let elsewhere = host.join("spleef_2");

    host.run_countdown();

    let game = host.registry.game_mut(&env("spleef_1")).unwrap();
    assert!(game.is_running());
    assert_eq!(game.players(), BTreeSet::from([alice, bob]));
    assert_eq!(host.platform.position(alice), Some(spawn));
    assert_eq!(host.platform.position(bob), Some(spawn));
    assert_eq!(host.platform.game_mode(alice), Some(GameMode::Survival));
    assert_ne!(host.platform.position(elsewhere), Some(spawn));
}

#[test]
fn test_game_ends_when_too_few_players_remain() {
    let mut host = Host::new();
    spleef_with_spawn(&mut host, Location::default());
    host.join("spleef_1");
    let bob = host.join("spleef_1");
    host.run_countdown();
    assert!(host.registry.game(&env("spleef_1")).unwrap().is_running());

    host.quit(bob);

    let game = host.registry.game(&env("spleef_1")).unwrap();
    assert!(!game.is_running());
    assert!(!game.has_pending_countdown());
    host.run_countdown();
    assert!(!host.registry.game(&env("spleef_1")).unwrap().is_running());
}

#[test]
fn test_game_ended_normally_loops_into_next_round() {
    let mut host = Host::new();
    spleef_with_spawn(&mut host, Location::default());
    host.join("spleef_1");
    host.join("spleef_1");
    host.run_countdown();

    let game = host.registry.game_mut(&env("spleef_1")).unwrap();
    assert!(game.end_game(EndReason::Ended));
    assert!(game.has_pending_countdown());
    host.run_countdown();

    let game = host.registry.game(&env("spleef_1")).unwrap();
    assert!(game.is_running());
    let spleef = game.as_any().downcast_ref::<Game<Spleef>>().unwrap();
    assert_eq!(spleef.behavior().rounds, 2);
}

#[test]
fn test_command_end_cancels_countdown_for_good() {
    let mut host = Host::new();
    spleef_with_spawn(&mut host, Location::default());
    host.join("spleef_1");

    for _ in 0..5 {
        host.tick();
    }
    assert!(host.registry.game_mut(&env("spleef_1")).unwrap().end_game(EndReason::Command));
    host.run_countdown();

    assert!(!host.registry.game(&env("spleef_1")).unwrap().is_running());
    assert_eq!(host.scheduler.pending_count(), 0);
}

#[test]
fn test_late_arrival_spectates() {
    let mut host = Host::new();
    let spawn = Location::new(1.0, 70.0, 1.0);
    spleef_with_spawn(&mut host, spawn);
    host.join("spleef_1");
    host.join("spleef_1");
    host.run_countdown();

    let late = host.join("spleef_1");

    assert_eq!(host.platform.game_mode(late), Some(GameMode::Spectator));
    assert_eq!(host.platform.position(late), Some(spawn));
    assert!(!host.registry.game_mut(&env("spleef_1")).unwrap().players().contains(&late));
}

#[test]
fn test_world_with_game_cannot_be_unloaded() {
    let mut host = Host::new();
    spleef_with_spawn(&mut host, Location::default());

    assert_eq!(
        host.registry.handle_environment_unload(&env("spleef_1")),
        TeardownVerdict::Refuse
    );
    assert_eq!(
        host.registry.handle_environment_unload(&env("spleef_2")),
        TeardownVerdict::Allow
    );
}

#[test]
fn test_saving_running_game_restores_it_idle() {
    let mut host = Host::new();
    spleef_with_spawn(&mut host, Location::default());
    host.join("spleef_1");
    host.join("spleef_1");
    host.run_countdown();
    host.registry.save_games().unwrap();

    let mut host = host.restart();
    host.registry.load_games().unwrap();

    let game = host.registry.game(&env("spleef_1")).unwrap();
    assert!(!game.is_running());
    assert!(game.has_pending_countdown());
}
