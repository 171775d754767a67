use std::sync::{Arc, Mutex};

use desim::Simulation;

#[test]
fn a_process_can_wait_for_another_process() {
    let sim = Simulation::new();

    let p1 = sim.process(|proc| {
        let ev = proc.timeout(5.0);
        proc.wait(&ev);
    });

    let p2_now = Arc::new(Mutex::new(-1.0));
    let recorder = p2_now.clone();
    let p1_handle = p1.clone();
    sim.process(move |proc| {
        proc.wait(&p1_handle);
        *recorder.lock().unwrap() = proc.now();
    });

    sim.run();

    assert_eq!(*p2_now.lock().unwrap(), 5.0);
    assert!(p1.processed());
}

#[test]
fn an_already_processed_process_is_not_waited_on() {
    let sim = Simulation::new();
    let p1 = sim.process(|_proc| {});
    sim.run();
    assert!(p1.processed());

    let reached = Arc::new(Mutex::new(false));
    let flag = reached.clone();
    sim.process(move |proc| {
        proc.wait(&p1);
        *flag.lock().unwrap() = true;
    });
    sim.run();
    assert!(*reached.lock().unwrap());
}

#[test]
fn abort_propagates_and_stops_the_waiting_process() {
    let sim = Simulation::new();
    let ev = sim.event();
    ev.abort();

    let reached_end = Arc::new(Mutex::new(false));
    let flag = reached_end.clone();
    let handle = sim.process(move |proc| {
        proc.wait(&ev);
        *flag.lock().unwrap() = true;
    });

    sim.run();

    assert!(!*reached_end.lock().unwrap());
    assert!(handle.aborted());
}

#[test]
fn abort_that_happens_while_waiting_also_propagates() {
    let sim = Simulation::new();
    let ev = sim.event();

    let reached_end = Arc::new(Mutex::new(false));
    let flag = reached_end.clone();
    let handle = sim.process(move |proc| {
        proc.wait(&ev);
        *flag.lock().unwrap() = true;
    });

    // Let the process reach its wait before the event is aborted.
    sim.step();
    ev.abort();
    sim.run();

    assert!(!*reached_end.lock().unwrap());
    assert!(handle.aborted());
}
