use std::sync::Arc;

use grubcall_core::{
    run_daily_open, run_expiry_poll, Config, Notification, Notifier, SchedulerParams,
    SharedSession,
};

use crate::common::open_session;

/// Transport stand-in: prints every notification to stdout.
struct StdoutNotifier;

impl Notifier for StdoutNotifier {
    fn deliver(
        &self,
        note: &Notification,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        println!("{note}");
        Ok(())
    }
}

/// Host the daily open trigger and the expiry poll until killed.
pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;
    let params = SchedulerParams::from_config(&config)?;
    let session: SharedSession = Arc::new(tokio::sync::Mutex::new(open_session()?));
    let notifier: Arc<dyn Notifier> = Arc::new(StdoutNotifier);

    println!(
        "grubcall daemon: opening daily at {} ({}), collecting for {} minutes",
        config.daily_open_local_time,
        config.reference_timezone,
        config.collection_duration_minutes
    );

    let runtime = tokio::runtime::Runtime::new()?;
    runtime.block_on(async move {
        let daily = tokio::spawn(run_daily_open(
            session.clone(),
            notifier.clone(),
            params.clone(),
        ));
        let poll = tokio::spawn(run_expiry_poll(session, notifier, params));
        // Both tasks loop forever; surface whichever ends first.
        let _ = tokio::try_join!(daily, poll);
    });
    Ok(())
}
