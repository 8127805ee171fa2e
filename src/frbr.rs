use serde::Serialize;

use crate::error::{Error, Result};
use crate::registry::Locale;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FrbrUri {
    pub country: String,
    pub locality: Option<String>,
    pub doctype: String,
    pub subtype: Option<String>,
    pub actor: Option<String>,
    pub date: String,
    pub number: String,
    pub language: Option<String>,
    pub expression_date: Option<String>,
}

impl FrbrUri {
    pub fn parse(uri: &str) -> Result<Self> {
        let invalid = || Error::InvalidInput(format!("malformed FRBR URI: {uri}"));

        let mut parts = uri
            .trim()
            .trim_matches('/')
            .split('/')
            .filter(|part| !part.is_empty())
            .collect::<Vec<&str>>();
        if parts.first() == Some(&"akn") {
            parts.remove(0);
        }
        if parts.len() < 4 {
            return Err(invalid());
        }

        let (country, locality) = match parts[0].split_once('-') {
            Some((country, locality)) => (country.to_string(), Some(locality.to_string())),
            None => (parts[0].to_string(), None),
        };
        let doctype = parts[1].to_string();

        let date_index = parts
            .iter()
            .enumerate()
            .skip(2)
            .find(|(_, part)| looks_like_date(part))
            .map(|(index, _)| index)
            .ok_or_else(invalid)?;
        let between = &parts[2..date_index];
        if between.len() > 2 {
            return Err(invalid());
        }
        let subtype = between.first().map(|value| value.to_string());
        let actor = between.get(1).map(|value| value.to_string());

        let date = parts[date_index].to_string();
        let number = parts
            .get(date_index + 1)
            .map(|value| value.to_string())
            .ok_or_else(invalid)?;

        let (language, expression_date) = match parts.get(date_index + 2) {
            Some(expression) => match expression.split_once('@') {
                Some((language, date)) => (
                    Some(language.to_string()),
                    (!date.is_empty()).then(|| date.to_string()),
                ),
                None => (Some(expression.to_string()), None),
            },
            None => (None, None),
        };

        Ok(Self {
            country,
            locality,
            doctype,
            subtype,
            actor,
            date,
            number,
            language,
            expression_date,
        })
    }

    pub fn locale(&self) -> Locale {
        Locale::new(
            Some(self.country.as_str()),
            self.language.as_deref(),
            self.locality.as_deref(),
        )
    }

    pub fn is_debate(&self) -> bool {
        matches!(self.doctype.as_str(), "debate" | "debaterecord")
            || self.subtype.as_deref() == Some("hansard")
    }

    pub fn work_uri(&self) -> String {
        let mut out = format!("/akn/{}", self.country);
        if let Some(locality) = &self.locality {
            out.push('-');
            out.push_str(locality);
        }
        out.push('/');
        out.push_str(&self.doctype);
        for part in [&self.subtype, &self.actor].into_iter().flatten() {
            out.push('/');
            out.push_str(part);
        }
        out.push('/');
        out.push_str(&self.date);
        out.push('/');
        out.push_str(&self.number);
        out
    }
}

fn looks_like_date(value: &str) -> bool {
    let bytes = value.as_bytes();
    bytes.len() >= 4 && bytes[..4].iter().all(u8::is_ascii_digit)
        && value[4..]
            .chars()
            .all(|ch| ch.is_ascii_digit() || ch == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_locality_subtype_and_expression() {
        let uri = FrbrUri::parse("/akn/za-cpt/act/by-law/2009/1/eng@2010-03-01").unwrap();
        assert_eq!(uri.country, "za");
        assert_eq!(uri.locality.as_deref(), Some("cpt"));
        assert_eq!(uri.doctype, "act");
        assert_eq!(uri.subtype.as_deref(), Some("by-law"));
        assert_eq!(uri.date, "2009");
        assert_eq!(uri.number, "1");
        assert_eq!(uri.language.as_deref(), Some("eng"));
        assert_eq!(uri.expression_date.as_deref(), Some("2010-03-01"));
        assert_eq!(uri.work_uri(), "/akn/za-cpt/act/by-law/2009/1");
    }

    #[test]
    fn parses_work_uri_without_prefix() {
        let uri = FrbrUri::parse("za/debaterecord/2021-02-03/12").unwrap();
        assert!(uri.is_debate());
        assert_eq!(uri.language, None);
        assert_eq!(uri.locale().country.as_deref(), Some("za"));
    }

    #[test]
    fn rejects_uri_without_date() {
        assert!(matches!(
            FrbrUri::parse("/akn/za/act/one"),
            Err(Error::InvalidInput(_))
        ));
    }
}
