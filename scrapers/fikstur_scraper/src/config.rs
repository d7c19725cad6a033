use serde::{Deserialize, Serialize};
use std::{env, path::PathBuf};

pub const DEFAULT_TARGET_URL: &str =
    "https://www.flashscore.com.tr/takim/karaman-fk/vF0VBreO/fikstur/";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Which set of launch flags the headless browser is started with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub enum BrowserMode {
    /// A developer machine or ordinary container.
    #[default]
    Local,
    /// A restricted serverless container (no sandbox, no shared memory, no GPU).
    Serverless,
}

const LOCAL_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-accelerated-2d-canvas",
    "--no-first-run",
    "--no-zygote",
    "--single-process",
    "--disable-gpu",
];

const SERVERLESS_ARGS: &[&str] = &[
    "--no-sandbox",
    "--disable-setuid-sandbox",
    "--disable-dev-shm-usage",
    "--disable-gpu",
    "--no-zygote",
    "--single-process",
    "--use-gl=swiftshader",
    "--hide-scrollbars",
    "--mute-audio",
    "--disable-background-networking",
    "--disable-extensions",
    "--ignore-certificate-errors",
];

impl BrowserMode {
    pub fn launch_args(&self) -> &'static [&'static str] {
        match self {
            BrowserMode::Local => LOCAL_ARGS,
            BrowserMode::Serverless => SERVERLESS_ARGS,
        }
    }

    pub fn window_size(&self) -> Option<(u32, u32)> {
        match self {
            BrowserMode::Local => None,
            BrowserMode::Serverless => Some((1920, 1080)),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct BrowserSettings {
    pub mode: BrowserMode,
    pub executable_path: Option<PathBuf>,
    pub user_agent: String,
    pub navigation_timeout_secs: u64,
    pub settle_delay_ms: u64,
}

impl Default for BrowserSettings {
    fn default() -> Self {
        Self {
            mode: BrowserMode::Local,
            executable_path: None,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36".to_string(),
            navigation_timeout_secs: 30,
            settle_delay_ms: 3000,
        }
    }
}

/// The one team whose fixtures are tracked, and how its venue is labelled.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TeamConfig {
    pub name: String,
    pub home_venue: String,
    pub away_venue: String,
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            name: "Karaman".to_string(),
            home_venue: "Yeni Karaman Stadyumu".to_string(),
            away_venue: "Deplasman".to_string(),
        }
    }
}

impl TeamConfig {
    /// Venue label for a fixture hosted by `home_team`.
    pub fn venue_for(&self, home_team: &str) -> String {
        if home_team.to_lowercase().contains(&self.name.to_lowercase()) {
            self.home_venue.clone()
        } else {
            self.away_venue.clone()
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScraperConfig {
    pub server: ServerConfig,
    pub browser: BrowserSettings,
    pub team: TeamConfig,
    pub target_url: String,
}

impl ScraperConfig {
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(host) = env::var("HOST") {
            config.server.host = host;
        }
        if let Some(port) = parse_var::<u16>("PORT") {
            config.server.port = port;
        }
        if env::var_os("VERCEL").is_some() {
            config.browser.mode = BrowserMode::Serverless;
        }
        if let Ok(path) = env::var("CHROMIUM_EXECUTABLE_PATH") {
            config.browser.executable_path = Some(PathBuf::from(path));
        }
        if let Ok(user_agent) = env::var("SCRAPER_USER_AGENT") {
            config.browser.user_agent = user_agent;
        }
        if let Some(timeout) = parse_var::<u64>("SCRAPER_TIMEOUT_SECS") {
            config.browser.navigation_timeout_secs = timeout;
        }
        if let Some(settle) = parse_var::<u64>("SCRAPER_SETTLE_MS") {
            config.browser.settle_delay_ms = settle;
        }
        if let Ok(url) = env::var("FIKSTUR_URL") {
            config.target_url = url;
        }

        config
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}

// Unparseable values fall back to the default rather than failing startup.
fn parse_var<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = env::var(key).ok()?;
    match raw.trim().parse::<T>() {
        Ok(value) => Some(value),
        Err(_) => {
            tracing::warn!("Ignoring invalid value for {}: {:?}", key, raw);
            None
        }
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            browser: BrowserSettings::default(),
            team: TeamConfig::default(),
            target_url: DEFAULT_TARGET_URL.to_string(),
        }
    }
}
