pub mod fields;

use crate::types::{NormalizedRecord, RawRecord};

pub use fields::clean_name;

/// Clean every field of a raw record into its canonical form or `None`.
///
/// Never fails. A site cell holding an email address loses it as a site;
/// the address is kept as the email only when the email cell was empty.
pub fn normalize(raw: &RawRecord) -> NormalizedRecord {
    let raw_site = raw.site.trim();
    let raw_email = raw.email.trim();

    let (site, email_source) = if fields::is_email_shaped(raw_site) {
        let email_source = if raw_email.is_empty() { raw_site } else { raw_email };
        (None, email_source)
    } else {
        (fields::clean_site(raw_site), raw_email)
    };

    let email = fields::clean_email(email_source);
    let is_corporate_email = email.as_deref().is_some_and(fields::is_corporate_email);

    NormalizedRecord {
        name: fields::clean_name(&raw.name),
        registration_id: fields::clean_registration(&raw.registration_id),
        site,
        email,
        is_corporate_email,
        phone: fields::clean_phone(&raw.phone),
        city: fields::clean_city(&raw.city),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(name: &str, registration_id: &str, site: &str, email: &str, phone: &str) -> RawRecord {
        RawRecord {
            name: name.to_string(),
            registration_id: registration_id.to_string(),
            site: site.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            city: String::new(),
        }
    }

    #[test]
    fn test_email_in_site_moves_to_empty_email() {
        let normalized = normalize(&raw("Leiloeiro", "", "joao@leiloes.com.br", "", ""));

        assert_eq!(normalized.site, None);
        assert_eq!(normalized.email.as_deref(), Some("joao@leiloes.com.br"));
        assert!(normalized.is_corporate_email);
    }

    #[test]
    fn test_email_in_site_does_not_replace_existing_email() {
        let normalized = normalize(&raw(
            "Leiloeiro",
            "",
            "joao@leiloes.com.br",
            "maria@gmail.com",
            "",
        ));

        assert_eq!(normalized.site, None);
        assert_eq!(normalized.email.as_deref(), Some("maria@gmail.com"));
        assert!(!normalized.is_corporate_email);
    }

    #[test]
    fn test_invalid_email_cell_is_not_backfilled_from_site() {
        let normalized = normalize(&raw("Leiloeiro", "", "joao@leiloes.com.br", "n/a", ""));

        assert_eq!(normalized.site, None);
        assert_eq!(normalized.email, None);
        assert!(!normalized.is_corporate_email);
    }

    #[test]
    fn test_full_record() {
        let normalized = normalize(&raw(
            "Leiloeiro A",
            "12345",
            "www.leiloesA.com.br",
            "contato@leiloesA.com.br",
            "(11) 98888-7777",
        ));

        assert_eq!(normalized.name, "Leiloeiro A");
        assert_eq!(normalized.registration_id.as_deref(), Some("12345"));
        assert!(normalized.site_present());
        assert!(normalized.is_corporate_email);
        assert_eq!(normalized.phone.as_deref(), Some("11988887777"));
    }

    #[test]
    fn test_empty_record_keeps_all_fields_absent() {
        let normalized = normalize(&raw("Leiloeiro B", "", "", "", ""));

        assert_eq!(normalized.registration_id, None);
        assert_eq!(normalized.site, None);
        assert_eq!(normalized.email, None);
        assert!(!normalized.is_corporate_email);
        assert_eq!(normalized.phone, None);
        assert_eq!(normalized.city, None);
    }
}
