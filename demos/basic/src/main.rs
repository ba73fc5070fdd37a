use std::thread;

use lasi::Holder;
use lasi::runtime::Shared;

struct AppState {
    greeting: &'static str,
}

static STATE: Holder<AppState> = Holder::new();

fn state() -> Shared<AppState> {
    STATE.get_or_init(|| AppState { greeting: "ready" })
}

fn initializer_a() {
    let state = state();
    println!(
        "initializer A: construction count = {}, state = {}",
        STATE.constructions(),
        state.greeting
    );
}

fn initializer_b() {
    let state = state();
    println!(
        "initializer B: construction count = {}, state = {}",
        STATE.constructions(),
        state.greeting
    );
}

fn main() {
    // Both initializers race to first access; exactly one constructs.
    let a = thread::spawn(initializer_a);
    let b = thread::spawn(initializer_b);
    a.join().unwrap();
    b.join().unwrap();

    println!("total constructions: {}", STATE.constructions());
}
