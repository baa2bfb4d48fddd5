//! `medhist` - Past medical history form
//!
//! Keeps a patient's condition list in memory for one session and moves it
//! in and out of dated JSON files on request.

use medhist::run;

fn main() {
    if let Err(e) = run() {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
