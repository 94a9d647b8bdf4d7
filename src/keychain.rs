use keyring::Entry;

use crate::app_error::SyncResult;

const SERVICE: &str = "com.devto-sync.cli";
const USERNAME: &str = "devto-api-key";

pub fn save_api_key(api_key: &str) -> SyncResult<()> {
    write_api_key(&Entry::new(SERVICE, USERNAME)?, api_key)
}

pub fn load_api_key() -> SyncResult<Option<String>> {
    read_api_key(&Entry::new(SERVICE, USERNAME)?)
}

fn write_api_key(entry: &Entry, api_key: &str) -> SyncResult<()> {
    entry.set_password(api_key.trim())?;
    Ok(())
}

fn read_api_key(entry: &Entry) -> SyncResult<Option<String>> {
    match entry.get_password() {
        Ok(v) => {
            let trimmed = v.trim().to_string();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed))
            }
        }
        Err(keyring::Error::NoEntry) => Ok(None),
        Err(e) => Err(e.into()),
    }
}
