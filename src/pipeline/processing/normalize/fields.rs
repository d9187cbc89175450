//! Per-field cleaning rules. Every function is total: a value that cannot be
//! cleaned comes back as `None` (or an empty name) instead of an error.

use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::Url;
use std::net::IpAddr;

use crate::constants::{BR_COUNTRY_CODE, FREE_MAIL_DOMAINS, MIN_PHONE_DIGITS};

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}$").expect("valid email pattern")
});
static TRAILING_RESIDUE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[\d\s\-./]+$").expect("valid residue pattern"));
static LEADING_NOISE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[_\W]+").expect("valid noise pattern"));

/// Separators seen between several phone numbers crammed into one cell
const PHONE_SEPARATORS: &[char] = &['/', ';', ',', '|'];

fn strip_mailto(value: &str) -> &str {
    let trimmed = value.trim();
    match trimmed.get(..7) {
        Some(prefix) if prefix.eq_ignore_ascii_case("mailto:") => trimmed[7..].trim(),
        _ => trimmed,
    }
}

/// True when the value is shaped like `local@domain.tld`
pub fn is_email_shaped(value: &str) -> bool {
    EMAIL_RE.is_match(strip_mailto(value))
}

/// Canonical email (domain lower-cased) or `None`
pub fn clean_email(value: &str) -> Option<String> {
    let candidate = strip_mailto(value);
    if !EMAIL_RE.is_match(candidate) {
        return None;
    }
    let (local, domain) = candidate.rsplit_once('@')?;
    Some(format!("{}@{}", local, domain.to_ascii_lowercase()))
}

/// An address whose domain is not a public webmail provider
pub fn is_corporate_email(email: &str) -> bool {
    let Some((_, domain)) = email.rsplit_once('@') else {
        return false;
    };
    let domain = domain.to_ascii_lowercase();
    !FREE_MAIL_DOMAINS.iter().any(|free| {
        domain == *free
            || domain
                .strip_suffix(free)
                .is_some_and(|prefix| prefix.ends_with('.'))
    })
}

/// Canonical `scheme://host[:port][/path][?query]` for a usable site, else `None`
///
/// A value without a scheme gets `http://`. Only http(s) URLs whose host is a
/// plausible domain name (not an IP, not a bare word) survive.
pub fn clean_site(value: &str) -> Option<String> {
    let value = value.trim();
    if value.is_empty() {
        return None;
    }

    let candidate = if value.contains("://") {
        value.to_string()
    } else {
        format!("http://{value}")
    };
    let url = Url::parse(&candidate).ok()?;

    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    if !url.username().is_empty() || url.password().is_some() {
        return None;
    }
    let host = url.host_str()?;
    if !is_plausible_domain(host) {
        return None;
    }

    let mut canonical = format!("{}://{}", url.scheme(), host);
    if let Some(port) = url.port() {
        canonical.push_str(&format!(":{port}"));
    }
    if url.path() != "/" {
        canonical.push_str(url.path());
    }
    if let Some(query) = url.query() {
        canonical.push('?');
        canonical.push_str(query);
    }
    Some(canonical)
}

fn is_plausible_domain(host: &str) -> bool {
    if host.starts_with('[') || host.parse::<IpAddr>().is_ok() {
        return false;
    }
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }
    let labels_ok = labels.iter().all(|label| {
        !label.is_empty()
            && label.len() <= 63
            && !label.starts_with('-')
            && !label.ends_with('-')
            && label.chars().all(|c| c.is_ascii_alphanumeric() || c == '-')
    });
    let tld = labels[labels.len() - 1];
    let tld_ok = tld.starts_with("xn--")
        || (tld.len() >= 2 && tld.chars().all(|c| c.is_ascii_alphabetic()));
    labels_ok && tld_ok
}

/// Digits of the first usable phone number in the cell, without country or
/// trunk prefixes; `None` when fewer than the minimum digits remain
pub fn clean_phone(value: &str) -> Option<String> {
    value
        .split(PHONE_SEPARATORS)
        .find_map(normalize_phone_digits)
}

fn normalize_phone_digits(fragment: &str) -> Option<String> {
    let digits: String = fragment.chars().filter(|c| c.is_ascii_digit()).collect();
    let national = match digits.strip_prefix(BR_COUNTRY_CODE) {
        Some(rest) if digits.len() >= 12 => rest,
        _ => digits.as_str(),
    };
    let national = national.trim_start_matches('0');
    (national.len() >= MIN_PHONE_DIGITS).then(|| national.to_string())
}

pub fn clean_registration(value: &str) -> Option<String> {
    non_empty(value.trim())
}

pub fn clean_city(value: &str) -> Option<String> {
    non_empty(&collapse_whitespace(value))
}

/// Name without OCR residue; may come back empty
pub fn clean_name(value: &str) -> String {
    let collapsed = collapse_whitespace(value);
    let without_tail = TRAILING_RESIDUE_RE.replace(&collapsed, "");
    let name = LEADING_NOISE_RE.replace(&without_tail, "").trim().to_string();

    let has_letters = name.chars().any(char::is_alphabetic);
    if has_letters && name == name.to_lowercase() {
        return name.split(' ').map(capitalize).collect::<Vec<_>>().join(" ");
    }
    name
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn collapse_whitespace(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn non_empty(value: &str) -> Option<String> {
    (!value.is_empty()).then(|| value.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_site_adds_scheme_and_canonicalizes() {
        assert_eq!(
            clean_site("www.leiloesA.com.br").as_deref(),
            Some("http://www.leiloesa.com.br")
        );
        assert_eq!(
            clean_site(" https://zukleiloes.com.br/agenda?p=2 ").as_deref(),
            Some("https://zukleiloes.com.br/agenda?p=2")
        );
    }

    #[test]
    fn test_clean_site_rejects_implausible_hosts() {
        for value in [
            "",
            "invalid-no-domain",
            "Não Identificado",
            "http://192.168.0.1",
            "ftp://leiloes.com.br",
            "http://user@leiloes.com.br",
            "www.leiloes .com.br",
            "leiloes.123",
            "-leiloes.com.br",
        ] {
            assert_eq!(clean_site(value), None, "{value:?} should be rejected");
        }
    }

    #[test]
    fn test_email_shape_and_canonical_form() {
        assert!(is_email_shaped("joao@leiloes.com.br"));
        assert!(is_email_shaped("mailto:joao@leiloes.com.br"));
        assert!(!is_email_shaped("www.leiloes.com.br"));

        assert_eq!(
            clean_email(" MAILTO:Contato@LeiloesA.COM.BR ").as_deref(),
            Some("Contato@leiloesa.com.br")
        );
        assert_eq!(clean_email("contato@leiloes"), None);
        assert_eq!(clean_email("sem email"), None);
    }

    #[test]
    fn test_corporate_email_ignores_free_providers() {
        assert!(is_corporate_email("contato@lancejudicial.com.br"));
        assert!(!is_corporate_email("b@gmail.com"));
        assert!(!is_corporate_email("b@GMAIL.COM"));
        assert!(!is_corporate_email("b@mail.uol.com.br"));
        // suffix match is label aligned
        assert!(is_corporate_email("vendas@leiloesgmail.com"));
    }

    #[test]
    fn test_clean_phone_normalizes_prefixes() {
        assert_eq!(clean_phone("(11) 98888-7777").as_deref(), Some("11988887777"));
        assert_eq!(clean_phone("+55 (11) 2548-0002").as_deref(), Some("1125480002"));
        assert_eq!(clean_phone("011 3322-6519").as_deref(), Some("1133226519"));
        assert_eq!(
            clean_phone("(13) 3384-8000 / (13) 3384-8001").as_deref(),
            Some("1333848000")
        );
        assert_eq!(clean_phone("1234-567"), None);
        assert_eq!(clean_phone("null"), None);
    }

    #[test]
    fn test_clean_phone_minimum_length() {
        assert_eq!(clean_phone("3333-4444").as_deref(), Some("33334444"));
        assert_eq!(clean_phone("0 3333-4444").as_deref(), Some("33334444"));
        assert_eq!(clean_phone("333-4444"), None);
        assert_eq!(clean_phone("0333-4444"), None);
    }

    #[test]
    fn test_clean_name_strips_residue() {
        assert_eq!(clean_name("  JOÃO   DA SILVA 1234/ "), "JOÃO DA SILVA");
        assert_eq!(clean_name("__adriano rocha neves"), "Adriano Rocha Neves");
        assert_eq!(clean_name("123 - 45"), "");
    }

    #[test]
    fn test_registration_and_city() {
        assert_eq!(clean_registration("  12345/SP "), Some("12345/SP".to_string()));
        assert_eq!(clean_registration("   "), None);
        assert_eq!(clean_city(" SÃO   PAULO "), Some("SÃO PAULO".to_string()));
    }
}
