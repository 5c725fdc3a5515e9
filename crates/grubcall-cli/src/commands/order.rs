use chrono::Utc;

use crate::common::open_session;

pub fn place(user: &str, name: &str, text: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    let ack = session.submit_order(user, name, text)?;
    println!("{ack}");
    Ok(())
}

pub fn cancel(user: &str) -> Result<(), Box<dyn std::error::Error>> {
    let mut session = open_session()?;
    let ack = session.cancel_order(user)?;
    println!("{ack}");
    Ok(())
}

pub fn summary() -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session()?;
    println!("{}", session.summary(Utc::now()));
    Ok(())
}

pub fn receipt() -> Result<(), Box<dyn std::error::Error>> {
    let session = open_session()?;
    match session.receipt() {
        Some(report) => print!("{report}"),
        None => println!("No orders have been placed yet."),
    }
    Ok(())
}
