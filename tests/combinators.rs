use std::sync::{Arc, Mutex};

use desim::Simulation;

#[test]
fn any_of_picks_the_earliest_timeout() {
    let sim = Simulation::new();
    let slow = sim.timeout(10.0);
    let fast = sim.timeout(5.0);
    let out = sim.any_of(&[&slow, &fast]);
    sim.run_until(5.0001);
    assert!(out.processed());
    assert!(!slow.processed());
}

#[test]
fn all_of_waits_for_the_latest_timeout() {
    let sim = Simulation::new();
    let slow = sim.timeout(10.0);
    let fast = sim.timeout(5.0);
    let out = sim.all_of(&[&slow, &fast]);
    sim.run_until(5.0001);
    assert!(!out.processed());
    sim.run_until(10.0001);
    assert!(out.processed());
}

#[test]
fn a_process_can_wait_on_any_of_two_siblings() {
    let sim = Simulation::new();
    let woke_at = Arc::new(Mutex::new(-1.0));
    let recorder = woke_at.clone();

    sim.process(move |proc| {
        let a = proc.timeout(8.0);
        let b = proc.timeout(3.0);
        let first = proc.any_of(&[&a, &b]);
        proc.wait(&first);
        *recorder.lock().unwrap() = proc.now();
    });

    sim.run();
    assert_eq!(*woke_at.lock().unwrap(), 3.0);
}

#[test]
fn a_process_can_wait_on_all_of_two_siblings() {
    let sim = Simulation::new();
    let woke_at = Arc::new(Mutex::new(-1.0));
    let recorder = woke_at.clone();

    sim.process(move |proc| {
        let a = proc.timeout(8.0);
        let b = proc.timeout(3.0);
        let both = proc.all_of(&[&a, &b]);
        proc.wait(&both);
        *recorder.lock().unwrap() = proc.now();
    });

    sim.run();
    assert_eq!(*woke_at.lock().unwrap(), 8.0);
}
