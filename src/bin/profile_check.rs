//! Validates every tray profile in a directory and prints its layout.
//!
//! Usage: `profile_check <profiles-dir>`

use tray_verifier::profile::ProfileStore;
use std::env;

fn main() {
    if let Err(err) = run() {
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let dir = env::args()
        .nth(1)
        .ok_or_else(|| "usage: profile_check <profiles-dir>".to_string())?;

    let mut store = ProfileStore::open(&dir);
    let ids = store.list().map_err(|e| e.to_string())?;
    if ids.is_empty() {
        println!("no profiles in {dir}");
        return Ok(());
    }

    let mut failures = 0usize;
    for id in ids {
        match store.load(&id) {
            Ok(profile) => {
                println!(
                    "{id}: '{}' v{}: {} zone(s), {} part(s)",
                    profile.name,
                    profile.version,
                    profile.items.len(),
                    profile.total_expected()
                );
                for item in &profile.items {
                    let logo = match &item.logo {
                        Some(l) => format!(", logo '{}'", l.0),
                        None => String::new(),
                    };
                    println!("  zone '{}': expects {}{logo}", item.zone, item.expected);
                }
            }
            Err(err) => {
                failures += 1;
                println!("{id}: INVALID: {err}");
            }
        }
    }
    if failures > 0 {
        return Err(format!("{failures} profile(s) failed validation"));
    }
    Ok(())
}
