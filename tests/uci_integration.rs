use std::io::Cursor;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use corvid::uci::Orchestrator;

#[test]
fn uci_handshake_and_short_search_produce_bestmove() {
    let script = "uci\nisready\nposition startpos\ngo movetime 50\n";
    let input = Cursor::new(script.as_bytes().to_vec());
    let output = Arc::new(Mutex::new(Vec::new()));

    let orchestrator = Orchestrator::new();
    orchestrator.run(input, Arc::clone(&output));

    // `go` spawns its search on a background thread; give it a moment to
    // finish and write `bestmove` before asserting on the transcript.
    std::thread::sleep(Duration::from_millis(500));

    let text = String::from_utf8(output.lock().unwrap().clone()).unwrap();
    assert!(text.contains("uciok"));
    assert!(text.contains("readyok"));
    assert!(text.contains("bestmove"));
}
