use crate::config::RawConfig;
use crate::error::{ConfigError, Result};
use crate::types::{AttributeCode, RequestSpec, SubjectField};

const WWW_PREFIX: &str = "www.";

/// Turns the configured identity and the requested names into a [`RequestSpec`].
///
/// The first name becomes the common name. With `add_www`, each name that
/// does not already start with `www.` gets a `www.` twin appended after the
/// original list.
pub fn resolve(cli_names: Vec<String>, add_www: bool, config: &RawConfig) -> Result<RequestSpec> {
    let identity = config.validate()?;

    let common_name = cli_names
        .first()
        .filter(|name| !name.is_empty())
        .cloned()
        .ok_or(ConfigError::MissingDnsName)?;

    let dns_names = if add_www {
        with_www_variants(cli_names)
    } else {
        cli_names
    };

    let mut subject_fields = vec![
        SubjectField::new(AttributeCode::Country, identity.country),
        SubjectField::new(AttributeCode::CommonName, common_name),
        SubjectField::new(AttributeCode::Organization, identity.organization),
        SubjectField::new(AttributeCode::OrganizationalUnit, identity.orgunit),
        SubjectField::new(AttributeCode::State, identity.state),
        SubjectField::new(AttributeCode::Locality, identity.locality),
    ];
    if let Some(email) = identity.email {
        subject_fields.push(SubjectField::new(AttributeCode::EmailAddress, email));
    }

    log::debug!("Resolved {} DNS name(s): {:?}", dns_names.len(), dns_names);

    RequestSpec::new(dns_names, subject_fields, add_www)
}

fn with_www_variants(mut names: Vec<String>) -> Vec<String> {
    let extra: Vec<String> = names
        .iter()
        .filter(|name| !name.starts_with(WWW_PREFIX))
        .map(|name| format!("{}{}", WWW_PREFIX, name))
        .collect();
    names.extend(extra);
    names
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;

    fn config() -> RawConfig {
        RawConfig {
            country: Some("US".to_string()),
            state: Some("CA".to_string()),
            locality: Some("SF".to_string()),
            organization: Some("Acme".to_string()),
            orgunit: Some("Eng".to_string()),
            email: None,
        }
    }

    fn names(list: &[&str]) -> Vec<String> {
        list.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_common_name_is_first_name() {
        let spec = resolve(names(&["b.com", "a.com"]), false, &config()).unwrap();
        assert_eq!(spec.common_name(), "b.com");
        assert_eq!(spec.dns_names()[0], spec.common_name());
    }

    #[test]
    fn test_subject_field_order() {
        let spec = resolve(names(&["x.com"]), false, &config()).unwrap();
        let fields: Vec<(&str, &str)> = spec
            .subject_fields()
            .iter()
            .map(|f| (f.code.short_name(), f.value.as_str()))
            .collect();
        assert_eq!(
            fields,
            vec![
                ("C", "US"),
                ("CN", "x.com"),
                ("O", "Acme"),
                ("OU", "Eng"),
                ("ST", "CA"),
                ("L", "SF"),
            ]
        );
    }

    #[test]
    fn test_email_appended_last() {
        let mut cfg = config();
        cfg.email = Some("ops@x.com".to_string());
        let spec = resolve(names(&["x.com"]), false, &cfg).unwrap();
        let last = spec.subject_fields().last().unwrap();
        assert_eq!(last.code, AttributeCode::EmailAddress);
        assert_eq!(last.value, "ops@x.com");
        assert_eq!(spec.subject_fields().len(), 7);
    }

    #[test]
    fn test_missing_dns_name() {
        let result = resolve(vec![], false, &config());
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingDnsName))
        ));
    }

    #[test]
    fn test_empty_first_name_rejected() {
        let result = resolve(names(&["", "a.com"]), true, &config());
        assert!(matches!(
            result,
            Err(Error::Config(ConfigError::MissingDnsName))
        ));
    }

    #[test]
    fn test_each_missing_field_is_named() {
        let cases: [(&str, fn(&mut RawConfig)); 5] = [
            ("country", |c: &mut RawConfig| c.country = None),
            ("state", |c: &mut RawConfig| c.state = None),
            ("locality", |c: &mut RawConfig| c.locality = None),
            ("organization", |c: &mut RawConfig| c.organization = None),
            ("orgunit", |c: &mut RawConfig| c.orgunit = None),
        ];

        for (field, clear) in cases {
            let mut cfg = config();
            clear(&mut cfg);
            match resolve(names(&["x.com"]), false, &cfg) {
                Err(Error::Config(ConfigError::MissingField(name))) => assert_eq!(name, field),
                other => panic!("expected missing {}, got {:?}", field, other),
            }
        }
    }

    #[test]
    fn test_add_www() {
        let spec = resolve(names(&["a.com"]), true, &config()).unwrap();
        assert_eq!(spec.dns_names(), names(&["a.com", "www.a.com"]).as_slice());
        assert!(spec.add_www());
    }

    #[test]
    fn test_add_www_skips_prefixed_names() {
        let spec = resolve(names(&["www.a.com"]), true, &config()).unwrap();
        assert_eq!(spec.dns_names(), names(&["www.a.com"]).as_slice());
    }

    #[test]
    fn test_add_www_keeps_relative_order() {
        let spec = resolve(names(&["a.com", "www.b.com", "c.com", "a.com"]), true, &config()).unwrap();
        assert_eq!(
            spec.dns_names(),
            names(&[
                "a.com",
                "www.b.com",
                "c.com",
                "a.com",
                "www.a.com",
                "www.c.com",
                "www.a.com",
            ])
            .as_slice()
        );
        assert_eq!(spec.common_name(), "a.com");
    }

    #[test]
    fn test_without_www_names_unchanged() {
        let input = names(&["a.com", "b.com", "a.com"]);
        let spec = resolve(input.clone(), false, &config()).unwrap();
        assert_eq!(spec.dns_names(), input.as_slice());
    }
}
