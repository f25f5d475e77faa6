//! Channel-less chain composition: then, post, post_bulk, nesting and reuse

mod common;

use common::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use tasker_chain::{task, Dispatcher, Placeholder, Step, Task};

#[test]
fn test_then_chain_composes_left_to_right() {
    let dispatcher = Dispatcher::new();
    let observed = Probe::new();
    let sink = observed.clone();

    task(Step::new(|| 10))
        .then(Step::map(|x: i32| x + 5))
        .then(Step::map(|x: i32| x * 2))
        .then(Step::map(move |x: i32| sink.set(x)))
        .submit(&dispatcher);

    assert_eq!(observed.get(), Some(30));
}

#[test]
fn test_submit_future_resolves_with_final_value() {
    let dispatcher = Dispatcher::new();
    let future = task(Step::new(|| String::from("chain")))
        .then(Step::map(|s: String| s.len()))
        .submit_future(&dispatcher);

    assert_eq!(future.wait().unwrap(), 5);
}

#[test]
fn test_void_and_value_steps_mix() {
    let dispatcher = Dispatcher::new();
    let recorder = Recorder::new();

    let first = recorder.clone();
    let second = recorder.clone();
    let third = recorder.clone();
    let future = task(Step::new(move || first.record("void head")))
        .then(Step::map(move |_: ()| {
            second.record("unit parameter");
            Placeholder
        }))
        .then(Step::map(move |_: Placeholder| third.record("placeholder parameter")))
        .then(Step::new(|| 3u8))
        .then(Step::map(|x: u8| x + 1))
        .submit_future(&dispatcher);

    assert_eq!(future.wait().unwrap(), 4);
    assert_eq!(
        recorder.events(),
        vec!["void head", "unit parameter", "placeholder parameter"]
    );
}

#[test]
fn test_nullary_step_drops_carried_value() {
    let dispatcher = Dispatcher::new();
    let future = task(Step::new(|| 99i64))
        .then(Step::new(|| "replaced"))
        .submit_future(&dispatcher);

    assert_eq!(future.wait().unwrap(), "replaced");
}

#[test]
fn test_post_passes_value_through() {
    let dispatcher = Dispatcher::new();
    let recorder = Recorder::new();

    let side = recorder.clone();
    let sink = recorder.clone();
    task(Step::new(|| 7))
        .post(Step::new(move || {
            side.record("side");
            "discarded"
        }))
        .then(Step::map(move |x: i32| sink.record(format!("value {x}"))))
        .submit(&dispatcher);

    assert_eq!(recorder.events(), vec!["side", "value 7"]);
}

#[test]
fn test_post_bulk_runs_in_argument_order_and_keeps_value() {
    let dispatcher = Dispatcher::new();
    let recorder = Recorder::new();

    let (a, b, c, sink) = (
        recorder.clone(),
        recorder.clone(),
        recorder.clone(),
        recorder.clone(),
    );
    task(Step::new(|| 42))
        .post_bulk((
            Step::new(move || a.record("a")),
            Step::new(move || {
                b.record("b");
                1.5f64
            }),
            Step::new(move || c.record("c")),
        ))
        .then(Step::map(move |x: i32| sink.record(x.to_string())))
        .submit(&dispatcher);

    assert_eq!(recorder.events(), vec!["a", "b", "c", "42"]);
}

#[test]
fn test_nested_chain_feeds_outer_chain() {
    let dispatcher = Dispatcher::new();
    let inner = Task::new(Step::map(|x: i32| x * 10)).then(Step::map(|x: i32| x + 1));

    let future = task(Step::new(|| 2))
        .then(&inner)
        .then(Step::map(|x: i32| x - 1))
        .submit_future(&dispatcher);

    assert_eq!(future.wait().unwrap(), 20);
}

#[test]
fn test_nested_chain_with_nullary_head_ignores_outer_value() {
    let dispatcher = Dispatcher::new();
    let inner =
        Task::new(Step::new(|| String::from("fresh"))).then(Step::map(|s: String| s.to_uppercase()));

    let future = task(Step::new(|| 5)).then(inner).submit_future(&dispatcher);

    assert_eq!(future.wait().unwrap(), "FRESH");
}

#[test]
fn test_nested_chain_as_side_step() {
    let dispatcher = Dispatcher::new();
    let recorder = Recorder::new();

    let (first, second) = (recorder.clone(), recorder.clone());
    let side = task(Step::new(move || first.record("side head")))
        .then(Step::new(move || second.record("side tail")));

    let future = task(Step::new(|| 'x'))
        .post(&side)
        .post_bulk(vec![&side, &side])
        .submit_future(&dispatcher);

    assert_eq!(future.wait().unwrap(), 'x');
    assert_eq!(recorder.events().len(), 6);
    assert_eq!(recorder.events()[0], "side head");
    assert_eq!(recorder.events()[1], "side tail");
}

#[test]
fn test_chain_is_reusable() {
    let dispatcher = Dispatcher::new();
    let runs = Arc::new(AtomicUsize::new(0));

    let counter = Arc::clone(&runs);
    let chain = task(Step::new(move || counter.fetch_add(1, Ordering::SeqCst)))
        .then(Step::map(|previous: usize| previous + 1));

    chain.submit(&dispatcher);
    chain.submit(&dispatcher);
    let third = chain.submit_future(&dispatcher);

    assert_eq!(third.wait().unwrap(), 3);
    assert_eq!(runs.load(Ordering::SeqCst), 3);
}

#[test]
fn test_submit_with_typed_input() {
    let dispatcher = Dispatcher::new();
    let triple = Task::new(Step::map(|x: i32| x * 3));

    assert_eq!(triple.submit_future_with(&dispatcher, 4).wait().unwrap(), 12);
    assert_eq!(triple.submit_future_with(&dispatcher, -1).wait().unwrap(), -3);
}

#[test]
fn test_long_channel_less_chain_runs_on_small_stack() {
    let handle = thread::Builder::new()
        .stack_size(128 * 1024)
        .spawn(|| {
            let dispatcher = Dispatcher::new();
            let mut chain = task(Step::new(|| 0u64));
            for _ in 0..20_000 {
                chain = chain.then(Step::map(|x: u64| x + 1));
            }
            chain.submit_future(&dispatcher).wait().unwrap()
        })
        .unwrap();

    assert_eq!(handle.join().unwrap(), 20_000);
}

#[test]
fn test_long_inline_channel_chain_runs_on_small_stack() {
    let handle = thread::Builder::new()
        .stack_size(128 * 1024)
        .spawn(|| {
            let dispatcher = Dispatcher::new();
            let mut chain = task(Step::new(|| 0u64));
            for _ in 0..20_000 {
                chain = chain.then_on(InlineLane, Step::map(|x: u64| x + 1));
            }
            chain.submit_future(&dispatcher).wait().unwrap()
        })
        .unwrap();

    assert_eq!(handle.join().unwrap(), 20_000);
}

#[test]
fn test_deeply_nested_chains_are_spliced() {
    let dispatcher = Dispatcher::new();
    let mut nested = Task::new(Step::map(|x: u32| x + 1));
    for _ in 0..200 {
        nested = Task::new(&nested).then(Step::map(|x: u32| x + 1));
    }

    let future = task(Step::new(|| 0u32)).then(&nested).submit_future(&dispatcher);
    assert_eq!(future.wait().unwrap(), 201);
}
