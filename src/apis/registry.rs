use metrics::counter;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

use crate::app::ports::HttpClientPort;
use crate::config::{ExtractorConfig, ListingSelectors};
use crate::error::{Result, ScraperError};
use crate::types::RawRecord;

/// Why pagination ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    MaxPages,
    NoNewRecords,
    Interrupted,
}

/// Records gathered by one extraction plus what happened on the way
#[derive(Debug, Clone)]
pub struct Extraction {
    pub records: Vec<RawRecord>,
    pub pages_visited: u32,
    pub failed_pages: Vec<u32>,
    pub stop_reason: StopReason,
}

struct CompiledSelectors {
    listing: Selector,
    row: Selector,
    name: Selector,
    registration_id: Selector,
    site: Selector,
    email: Selector,
    phone: Selector,
    city: Selector,
    link: Selector,
    mailto: Selector,
}

impl CompiledSelectors {
    fn compile(s: &ListingSelectors) -> Result<Self> {
        Ok(Self {
            listing: parse_selector(&s.listing)?,
            row: parse_selector(&s.row)?,
            name: parse_selector(&s.name)?,
            registration_id: parse_selector(&s.registration_id)?,
            site: parse_selector(&s.site)?,
            email: parse_selector(&s.email)?,
            phone: parse_selector(&s.phone)?,
            city: parse_selector(&s.city)?,
            link: parse_selector("a[href]")?,
            mailto: parse_selector("a[href^='mailto:']")?,
        })
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector)
        .map_err(|e| ScraperError::Config(format!("invalid CSS selector {selector:?}: {e:?}")))
}

/// Crawler for the commercial board's paginated auctioneer listing
pub struct RegistryExtractor {
    http: Arc<dyn HttpClientPort>,
    config: ExtractorConfig,
    selectors: CompiledSelectors,
    stop: Arc<AtomicBool>,
}

impl RegistryExtractor {
    pub fn new(http: Arc<dyn HttpClientPort>, config: ExtractorConfig) -> Result<Self> {
        let selectors = CompiledSelectors::compile(&config.selectors)?;
        Ok(Self {
            http,
            config,
            selectors,
            stop: Arc::new(AtomicBool::new(false)),
        })
    }

    /// Setting the flag ends extraction before the next page is fetched
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        self.stop.clone()
    }

    pub fn page_url(&self, page: u32) -> String {
        let separator = if self.config.base_url.contains('?') { '&' } else { '?' };
        format!(
            "{}{}{}={}",
            self.config.base_url, separator, self.config.page_param, page
        )
    }

    /// Every listing row with a non-empty name. A page without the listing
    /// container is an error, a listing without rows is not.
    pub fn parse_page(&self, html: &str) -> Result<Vec<RawRecord>> {
        let document = Html::parse_document(html);
        let s = &self.selectors;

        if document.select(&s.listing).next().is_none() {
            return Err(ScraperError::Api {
                message: format!(
                    "no listing matches {:?}",
                    self.config.selectors.listing
                ),
            });
        }

        Ok(document
            .select(&s.row)
            .filter_map(|row| {
                let name = cell_text(row, &s.name);
                if name.is_empty() {
                    return None;
                }
                Some(RawRecord {
                    name,
                    registration_id: cell_text(row, &s.registration_id),
                    site: self.site_cell(row),
                    email: self.email_cell(row),
                    phone: cell_text(row, &s.phone),
                    city: cell_text(row, &s.city),
                })
            })
            .collect())
    }

    /// Link target when the cell holds an anchor, else the cell text
    fn site_cell(&self, row: ElementRef<'_>) -> String {
        let Some(cell) = row.select(&self.selectors.site).next() else {
            return String::new();
        };
        cell.select(&self.selectors.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim().to_string())
            .filter(|href| !href.is_empty() && !href.starts_with('#'))
            .unwrap_or_else(|| element_text(cell))
    }

    fn email_cell(&self, row: ElementRef<'_>) -> String {
        let Some(cell) = row.select(&self.selectors.email).next() else {
            return String::new();
        };
        cell.select(&self.selectors.mailto)
            .next()
            .and_then(|a| a.value().attr("href"))
            .map(|href| href.trim_start_matches("mailto:").trim().to_string())
            .unwrap_or_else(|| element_text(cell))
    }

    async fn fetch_page(&self, page: u32) -> Result<Vec<RawRecord>> {
        let url = self.page_url(page);
        debug!("Fetching {}", url);

        let response = self
            .http
            .get(&url)
            .await
            .map_err(|message| ScraperError::Api { message })?;
        if !response.is_success() {
            return Err(ScraperError::Api {
                message: format!("{url} answered with status {}", response.status),
            });
        }

        let body = decode_body(&response.bytes, &response.content_type)?;
        self.parse_page(&body)
    }

    /// Raw records from up to `max_pages` listing pages
    pub async fn fetch(&self, max_pages: u32, delay: Duration) -> Vec<RawRecord> {
        self.fetch_with_report(max_pages, delay).await.records
    }

    /// Walk the listing one page at a time, waiting `delay` between fetches.
    /// Stops at `max_pages`, on a page with no new records, or when the stop
    /// flag is raised. A failing page is logged and skipped.
    #[instrument(skip(self), fields(base_url = %self.config.base_url))]
    pub async fn fetch_with_report(&self, max_pages: u32, delay: Duration) -> Extraction {
        let mut records: Vec<RawRecord> = Vec::new();
        let mut seen: HashSet<(String, String)> = HashSet::new();
        let mut failed_pages = Vec::new();
        let mut pages_visited = 0;
        let mut stop_reason = StopReason::MaxPages;
        let mut page = 1;

        info!("🔍 Extracting up to {} pages", max_pages);

        while page <= max_pages {
            if page > 1 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            if self.stop.load(Ordering::SeqCst) {
                info!("⏹️ Stop requested, ending extraction before page {}", page);
                stop_reason = StopReason::Interrupted;
                break;
            }

            pages_visited += 1;
            match self.fetch_page(page).await {
                Ok(page_records) => {
                    let found = page_records.len();
                    let before = records.len();
                    for record in page_records {
                        let key = (record.name.to_lowercase(), record.registration_id.clone());
                        if seen.insert(key) {
                            records.push(record);
                        }
                    }
                    let new_records = records.len() - before;
                    counter!("leiloeiros_pages_fetched_total").increment(1);

                    if new_records == 0 {
                        info!("⏹️ Page {} had no new records ({} rows), ending pagination", page, found);
                        stop_reason = StopReason::NoNewRecords;
                        break;
                    }
                    info!("✅ Page {}: {} new records", page, new_records);
                }
                Err(e) => {
                    counter!("leiloeiros_pages_failed_total").increment(1);
                    warn!("Skipping page {}: {}", page, e);
                    failed_pages.push(page);
                }
            }
            page += 1;
        }

        info!(
            "📋 Extracted {} records from {} pages ({} failed)",
            records.len(),
            pages_visited,
            failed_pages.len()
        );

        Extraction {
            records,
            pages_visited,
            failed_pages,
            stop_reason,
        }
    }
}

fn cell_text(row: ElementRef<'_>, selector: &Selector) -> String {
    row.select(selector).next().map(element_text).unwrap_or_default()
}

fn element_text(element: ElementRef<'_>) -> String {
    element.text().collect::<Vec<_>>().join(" ").split_whitespace().collect::<Vec<_>>().join(" ")
}

/// `charset` parameter of a Content-Type header, lowercased
fn declared_charset(content_type: &str) -> Option<String> {
    content_type.split(';').skip(1).find_map(|param| {
        let (key, value) = param.split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case("charset")
            .then(|| value.trim().trim_matches('"').to_ascii_lowercase())
    })
}

fn latin1(bytes: &[u8]) -> String {
    bytes.iter().map(|&b| b as char).collect()
}

/// Decode a listing page under its declared charset. Undeclared pages are
/// UTF-8 or Latin-1.
fn decode_body(bytes: &[u8], content_type: &str) -> Result<String> {
    match declared_charset(content_type).as_deref() {
        None => Ok(match std::str::from_utf8(bytes) {
            Ok(text) => text.to_string(),
            Err(_) => latin1(bytes),
        }),
        Some("utf-8" | "utf8") => String::from_utf8(bytes.to_vec()).map_err(|e| ScraperError::Api {
            message: format!("body is not valid utf-8: {e}"),
        }),
        // cp1252 only differs from Latin-1 in 0x80..=0x9F
        Some("iso-8859-1" | "iso8859-1" | "latin1" | "latin-1" | "windows-1252" | "cp1252") => {
            Ok(latin1(bytes))
        }
        Some(other) => Err(ScraperError::Api {
            message: format!("unsupported charset {other:?}"),
        }),
    }
}
