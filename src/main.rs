use std::io::{stdin, stdout};
use std::sync::{Arc, Mutex};

use corvid::uci::Orchestrator;

fn main() {
    let orchestrator = Orchestrator::new();
    let output = Arc::new(Mutex::new(stdout()));
    orchestrator.run(stdin().lock(), output);
}
