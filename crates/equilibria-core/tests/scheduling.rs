//! Integration tests for the step scheduler.
//!
//! Exercises the public registration API end to end: ordering semantics
//! of the two update modes, periodicity, default seeding, the finalize
//! catch-up pass, and agent cloning.

#![allow(clippy::unwrap_used, clippy::float_cmp)]

use std::cell::RefCell;
use std::num::NonZeroU64;
use std::rc::Rc;

use equilibria_core::{Agent, Environment, Game, GameOptions, Registrations, Value};

type Log = Rc<RefCell<Vec<u64>>>;

fn period(n: u64) -> NonZeroU64 {
    NonZeroU64::new(n).unwrap()
}

/// Named agent that writes its firing step and records it in `log`.
fn recording(name: &str, log: &Log) -> Agent {
    let sink = Rc::clone(log);
    Agent::new(name, move |env: &Environment| {
        sink.borrow_mut().push(env.step());
        Ok(Value::Int(i64::try_from(env.step()).unwrap()))
    })
}

/// `a` writes x + 1; `b` copies x into y.
fn chain(options: GameOptions) -> Game {
    let mut game = Game::with_options("chain", options);
    game.add_constant("x", 10).unwrap();
    game.add_agent(Agent::new("x", |env: &Environment| {
        Ok(Value::Int(env.int("x")? + 1))
    }))
    .unwrap();
    game.add_agent(Agent::new("y", |env: &Environment| env.get("x")))
        .unwrap();
    game
}

#[test]
fn sequential_reader_observes_same_step_write() {
    let mut game = chain(GameOptions::default());
    let env = game.step().unwrap();
    assert_eq!(env.int("x").unwrap(), 11);
    assert_eq!(env.int("y").unwrap(), 11);
}

#[test]
fn independent_reader_observes_pre_step_value() {
    let options = GameOptions {
        independent_update: true,
        ..GameOptions::default()
    };
    let mut game = chain(options);

    let env = game.step().unwrap();
    assert_eq!(env.int("x").unwrap(), 11);
    assert_eq!(env.int("y").unwrap(), 10);

    let env = game.step().unwrap();
    assert_eq!(env.int("x").unwrap(), 12);
    assert_eq!(env.int("y").unwrap(), 11);
}

#[test]
fn agents_fire_on_multiples_of_their_period() {
    let every: Log = Rc::default();
    let fifth: Log = Rc::default();
    let mut game = Game::new("periodic");
    game.add_agent(recording("a", &every)).unwrap();
    game.add_agent(recording("b", &fifth).with_period(period(5)))
        .unwrap();

    for _ in 0..12 {
        game.step().unwrap();
    }

    assert_eq!(*every.borrow(), (0..12).collect::<Vec<_>>());
    assert_eq!(*fifth.borrow(), vec![0, 5, 10]);
}

#[test]
fn default_is_seeded_before_first_step() {
    let mut game = Game::new("seeded");
    game.add_agent(Agent::new("v", |_env: &Environment| Ok(Value::Float(1.0))).with_default(0.5))
        .unwrap();

    assert_eq!(game.step_count(), 0);
    assert_eq!(game.environment().get("v").unwrap(), Value::Float(0.5));
}

#[test]
fn finalize_lets_every_period_fire_again() {
    for n in [0_u64, 1, 3, 10, 17, 29] {
        let logs: Vec<Log> = (0..3).map(|_| Rc::default()).collect();
        let mut game = Game::new("sync");
        for (log, p) in logs.iter().zip([1, 5, 10]) {
            let name = format!("p{p}");
            game.add_agent(recording(&name, log).with_period(period(p)))
                .unwrap();
        }
        assert_eq!(game.max_period(), 10);

        game.run(Some(n)).unwrap();

        assert_eq!(game.step_count(), n + 10);
        for log in &logs {
            let last = *log.borrow().last().unwrap();
            assert!(last >= n, "run({n}): last firing {last} precedes step {n}");
        }
    }
}

#[test]
fn end_to_end_doubling_scenario() {
    let doubler = Agent::new("y", |env: &Environment| Ok(Value::Int(env.int("k")? * 2)))
        .with_default(0);
    let registrations = Registrations::new()
        .agent(doubler)
        .keyword("k", Value::Int(2));
    let mut game =
        Game::from_registrations("g", GameOptions::default(), registrations).unwrap();
    assert_eq!(game.environment().get("y").unwrap(), Value::Int(0));

    let env = game.run(Some(3)).unwrap();
    assert_eq!(env.get("y").unwrap(), Value::Int(4));
    assert_eq!(env.get("k").unwrap(), Value::Int(2));
    assert_eq!(game.step_count(), 4);
    assert_eq!(game.name(), "g");
}

#[test]
fn clone_leaves_original_intact_and_computes_the_same() {
    let original = Agent::new("p", |env: &Environment| Ok(Value::Float(env.float("q")? / 2.0)))
        .with_period(period(3));
    let renamed = original.clone_with(Some("p2"), None);

    assert_eq!(original.name(), Some("p"));
    assert_eq!(original.period(), period(3));
    assert_eq!(renamed.name(), Some("p2"));
    assert_eq!(renamed.period(), period(3));

    let mut env = Environment::new("scratch");
    env.insert("q", 0.5);
    assert_eq!(original.invoke(&env).unwrap(), renamed.invoke(&env).unwrap());
}

#[test]
fn one_policy_serves_several_games() {
    let half = Agent::new("half", |env: &Environment| Ok(Value::Float(env.float("q")? / 2.0)));

    let mut first = Game::new("first");
    first.add_constant("q", 1.0).unwrap();
    first.add_named_agent("p", &half).unwrap();

    let mut second = Game::new("second");
    second.add_constant("q", 3.0).unwrap();
    second.add_named_agent("r", &half).unwrap();

    assert_eq!(first.run(Some(1)).unwrap().float("p").unwrap(), 0.5);
    assert_eq!(second.run(Some(1)).unwrap().float("r").unwrap(), 1.5);
    assert!(!first.environment().contains_key("r"));
    assert_eq!(half.name(), Some("half"));
}
