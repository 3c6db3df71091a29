//! Netscape cookie-jar parsing and serialization.
//!
//! The format is one cookie per line, seven tab-separated fields:
//! `domain, include_subdomains, path, secure, expiry, name, value`.

use std::fs;
use std::path::Path;

use chromiumoxide::cdp::browser_protocol::network::{
    Cookie as CdpCookie, CookieParam, TimeSinceEpoch,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A single browser cookie. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub domain: String,
    pub path: String,
    /// Unix timestamp, absent for session cookies.
    pub expiry: Option<i64>,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        domain: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            domain: domain.into(),
            path: path.into(),
            expiry: None,
        }
    }

    /// Convert into the CDP parameter used to apply this cookie to a page.
    pub fn to_cookie_param(&self) -> Result<CookieParam> {
        let mut builder = CookieParam::builder()
            .name(self.name.as_str())
            .value(self.value.as_str())
            .path(self.path.as_str());
        if !self.domain.is_empty() {
            builder = builder.domain(self.domain.as_str());
        }
        if let Some(expiry) = self.expiry {
            builder = builder.expires(TimeSinceEpoch::new(expiry as f64));
        }
        builder.build().map_err(Error::CookieParse)
    }

    /// Build from a cookie read back out of the browser via CDP.
    pub fn from_cdp(cookie: &CdpCookie) -> Self {
        Self {
            name: cookie.name.clone(),
            value: cookie.value.clone(),
            domain: cookie.domain.clone(),
            path: cookie.path.clone(),
            expiry: (!cookie.session).then_some(cookie.expires as i64),
        }
    }
}

/// Parse Netscape-format cookie lines from raw text.
///
/// Lines with fewer than 6 tab-separated fields (headers, comments, blanks)
/// are skipped. Fields are trimmed. A non-numeric or zero expiry field yields
/// a session cookie. A 6-field line parses with an empty value.
pub fn parse_str(text: &str) -> Vec<Cookie> {
    let mut cookies = Vec::new();
    for line in text.lines() {
        let fields: Vec<&str> = line.split('\t').map(str::trim).collect();
        if fields.len() < 6 || fields[5].is_empty() {
            continue;
        }
        cookies.push(Cookie {
            domain: fields[0].to_string(),
            path: fields[2].to_string(),
            expiry: fields[4].parse::<i64>().ok().filter(|&e| e != 0),
            name: fields[5].to_string(),
            value: fields.get(6).copied().unwrap_or_default().to_string(),
        });
    }
    cookies
}

/// Read and parse a Netscape cookie file.
pub fn parse_file(path: impl AsRef<Path>) -> Result<Vec<Cookie>> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)
        .map_err(|e| Error::CookieParse(format!("{}: {e}", path.display())))?;
    Ok(parse_str(&text))
}

/// Write cookies back out in Netscape format, overwriting the target file.
pub fn save_file(path: impl AsRef<Path>, cookies: &[Cookie]) -> Result<()> {
    let mut out = String::from("# Netscape HTTP Cookie File\n");
    for cookie in cookies {
        let include_subdomains = if cookie.domain.starts_with('.') {
            "TRUE"
        } else {
            "FALSE"
        };
        out.push_str(&format!(
            "{}\t{}\t{}\tFALSE\t{}\t{}\t{}\n",
            cookie.domain,
            include_subdomains,
            cookie.path,
            cookie.expiry.unwrap_or(0),
            cookie.name,
            cookie.value,
        ));
    }
    fs::write(path, out)?;
    Ok(())
}
