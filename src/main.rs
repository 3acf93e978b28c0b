//! KeeBook companion binary.
//!
//! Starts the loopback listener and serves a line-oriented command loop on
//! stdin (`status`, `quit`) until told to exit.

use std::io::{self, BufRead, Write};

use keebook::app::App;
use keebook::services::settings_engine::default_data_dir;

fn main() {
    env_logger::init();

    let data_dir = default_data_dir();
    let mut app = match App::new(&data_dir) {
        Ok(app) => app,
        Err(e) => {
            eprintln!("Failed to initialize KeeBook: {}", e);
            std::process::exit(1);
        }
    };

    let addr = match app.start() {
        Ok(addr) => addr,
        Err(e) => {
            eprintln!("Failed to start listener: {}", e);
            std::process::exit(1);
        }
    };
    println!("KeeBook {} listening on http://{}", env!("CARGO_PKG_VERSION"), addr);
    println!("Commands: status, quit");
    let _ = io::stdout().flush();

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = match line {
            Ok(l) => l,
            Err(_) => break,
        };
        match line.trim() {
            "" => continue,
            "status" => println!("{}", app.status()),
            "quit" | "exit" | "stop" => break,
            other => println!("unknown command '{}'; commands: status, quit", other),
        }
        let _ = io::stdout().flush();
    }

    app.shutdown();
    println!("stopped");
}
