use chrono::{Duration, Utc};
use grubcall_core::{Config, WindowStatus};

use crate::common::open_session;

pub fn open(minutes: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let duration = match minutes {
        Some(m) => Duration::minutes(i64::from(m)),
        None => config.collection_duration(),
    };
    let mut session = open_session()?;
    let note = session.open_window(Utc::now(), duration)?;
    println!("{note}");
    Ok(())
}

pub fn close() -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    let note = session.close_window()?;
    println!("{note}");
    Ok(())
}

pub fn status() -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session()?;
    let window = session.window();
    match window.status() {
        WindowStatus::Collecting => {
            let remaining = window
                .remaining(Utc::now())
                .map(|d| d.num_minutes().max(0))
                .unwrap_or(0);
            println!(
                "collecting ({} orders, ends in {remaining} minutes)",
                window.entries().len()
            );
        }
        WindowStatus::Idle => println!("idle ({} retained orders)", window.entries().len()),
    }
    Ok(())
}
