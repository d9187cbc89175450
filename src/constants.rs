/// Listing page of auctioneers registered with the São Paulo commercial board
pub const DEFAULT_REGISTRY_URL: &str =
    "https://www.jucesponline.sp.gov.br/restrito/Leiloeiro/Leiloeiro/Listar";
pub const DEFAULT_PAGE_PARAM: &str = "page";
pub const DEFAULT_MAX_PAGES: u32 = 10;
pub const DEFAULT_DELAY_SECONDS: f64 = 2.0;
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
pub const DEFAULT_USER_AGENT: &str = "leiloeiros_scraper/0.1 (+registry research)";

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
pub const DEFAULT_RAW_DIR: &str = "data/raw";
pub const DEFAULT_OUTPUT_DIR: &str = "data/processed";
pub const DEFAULT_CSV_FILE: &str = "ranking_leiloeiros.csv";
pub const DEFAULT_JSON_FILE: &str = "ranking_leiloeiros.json";
pub const RAW_FILE_PREFIX: &str = "leiloeiros_";
pub const DEFAULT_TOP_N: usize = 10;

// Environment overrides (a `.env` file is honoured)
pub const ENV_BASE_URL: &str = "LEILOEIROS_BASE_URL";
pub const ENV_MAX_PAGES: &str = "LEILOEIROS_MAX_PAGES";
pub const ENV_DELAY_SECONDS: &str = "LEILOEIROS_DELAY_SECONDS";
pub const ENV_RAW_DIR: &str = "LEILOEIROS_RAW_DIR";
pub const ENV_OUTPUT_DIR: &str = "LEILOEIROS_OUTPUT_DIR";

/// Public webmail providers; an address on one of these is not corporate.
/// Subdomains match too (`mail.uol.com.br` counts as `uol.com.br`).
pub const FREE_MAIL_DOMAINS: &[&str] = &[
    "gmail.com",
    "gmail.com.br",
    "googlemail.com",
    "hotmail.com",
    "hotmail.com.br",
    "outlook.com",
    "outlook.com.br",
    "live.com",
    "msn.com",
    "yahoo.com",
    "yahoo.com.br",
    "ymail.com",
    "aol.com",
    "icloud.com",
    "me.com",
    "protonmail.com",
    "uol.com.br",
    "bol.com.br",
    "terra.com.br",
    "ig.com.br",
    "globo.com",
    "globomail.com",
    "r7.com",
    "zipmail.com.br",
];

/// Brazilian country calling code, stripped during phone normalization
pub const BR_COUNTRY_CODE: &str = "55";
pub const MIN_PHONE_DIGITS: usize = 8;

// Score weights; they sum to 100
pub const SITE_POINTS: u8 = 50;
pub const CORPORATE_EMAIL_POINTS: u8 = 30;
pub const PHONE_POINTS: u8 = 10;
pub const REGISTRATION_POINTS: u8 = 10;
pub const MAX_SCORE: u8 = 100;

// Category thresholds
pub const GIANT_THRESHOLD: u8 = 80;
pub const MID_THRESHOLD: u8 = 40;
