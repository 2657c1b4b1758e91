use crate::storage::KeyValueStore;
use chrono::Utc;
use rand::Rng;
use std::sync::{Arc, Mutex};

pub const USER_ID_KEY: &str = "healthvoice_user_id";
pub const USER_NAME_KEY: &str = "healthvoice_user_name";
pub const DEFAULT_DISPLAY_NAME: &str = "Guest";

const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const SUFFIX_LEN: usize = 9;

/// Opaque per-profile identity, standing in for a real login.
#[derive(Clone)]
pub struct UserSession {
    store: Arc<dyn KeyValueStore>,
    // Views fetch concurrently; only one of them may mint the identifier.
    create: Arc<Mutex<()>>,
}

impl UserSession {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            create: Arc::new(Mutex::new(())),
        }
    }

    /// Returns the stored identifier, creating and persisting one on first use.
    pub fn user_id(&self) -> String {
        let _guard = self
            .create
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if let Some(existing) = self.store.get(USER_ID_KEY).filter(|id| !id.is_empty()) {
            return existing;
        }

        let id = generate_user_id(Utc::now().timestamp_millis(), &mut rand::thread_rng());
        self.store.set(USER_ID_KEY, &id);
        tracing::info!(user_id = %id, "created session identifier");
        id
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get(USER_ID_KEY).is_some()
    }

    pub fn display_name(&self) -> Option<String> {
        self.store.get(USER_NAME_KEY)
    }

    pub fn display_name_or_default(&self) -> String {
        self.display_name()
            .unwrap_or_else(|| DEFAULT_DISPLAY_NAME.to_string())
    }

    /// A blank name clears the stored one.
    pub fn set_display_name(&self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.store.remove(USER_NAME_KEY);
        } else {
            self.store.set(USER_NAME_KEY, name);
        }
    }

    pub fn initials(&self) -> String {
        initials(&self.display_name_or_default())
    }

    pub fn clear(&self) {
        self.store.remove(USER_ID_KEY);
        self.store.remove(USER_NAME_KEY);
        tracing::info!("session cleared");
    }
}

pub fn generate_user_id(now_millis: i64, rng: &mut impl Rng) -> String {
    let suffix: String = (0..SUFFIX_LEN)
        .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
        .collect();
    format!("user_{now_millis}_{suffix}")
}

pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .take(2)
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}
