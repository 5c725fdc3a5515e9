use grubcall_core::{JsonFileStore, Session};

/// Build a session over the default snapshot location.
pub fn open_session() -> Result<Session, Box<dyn std::error::Error>> {
    let path = JsonFileStore::default_path()?;
    tracing::debug!(path = %path.display(), "opening session");
    let store = JsonFileStore::new(path);
    Ok(Session::restore(Box::new(store)))
}
