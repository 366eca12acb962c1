use std::path::PathBuf;

/// Runtime settings, read from the environment (and `.env` when present).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// JSON snapshot file. `None` keeps everything in memory.
    pub data_path: Option<PathBuf>,
    /// Chat ids with admin rights.
    pub admin_ids: Vec<i64>,
    /// Chat ids of sellers. They get the same order notifications as admins.
    pub seller_ids: Vec<i64>,
    /// Store actor channel capacity.
    pub store_buffer: usize,
    /// Default log filter when `RUST_LOG` is unset.
    pub log_level: String,
    /// Install `WELCOME10` and `SALE50` into an empty shop.
    pub seed_promos: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_path: None,
            admin_ids: Vec::new(),
            seller_ids: Vec::new(),
            store_buffer: 100,
            log_level: "info".to_string(),
            seed_promos: true,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key/value source. Unset or unparsable values fall back
    /// to the defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            data_path: lookup("SHOP_DATA_PATH")
                .filter(|p| !p.trim().is_empty())
                .map(PathBuf::from),
            admin_ids: lookup("ADMIN_IDS").map(|v| parse_ids(&v)).unwrap_or_default(),
            seller_ids: lookup("SELLER_IDS").map(|v| parse_ids(&v)).unwrap_or_default(),
            store_buffer: lookup("STORE_BUFFER")
                .and_then(|v| v.trim().parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.store_buffer),
            log_level: lookup("LOG_LEVEL").unwrap_or(defaults.log_level),
            seed_promos: lookup("SEED_PROMOS")
                .map(|v| !matches!(v.trim().to_lowercase().as_str(), "0" | "false" | "no"))
                .unwrap_or(defaults.seed_promos),
        }
    }

    /// Everyone who gets staff notifications, admins first, without repeats.
    pub fn staff_ids(&self) -> Vec<i64> {
        let mut staff = Vec::with_capacity(self.admin_ids.len() + self.seller_ids.len());
        for id in self.admin_ids.iter().chain(&self.seller_ids) {
            if !staff.contains(id) {
                staff.push(*id);
            }
        }
        staff
    }
}

fn parse_ids(raw: &str) -> Vec<i64> {
    raw.split(',').filter_map(|part| part.trim().parse().ok()).collect()
}
