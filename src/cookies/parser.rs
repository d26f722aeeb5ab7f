//! Cookie string parser.
//!
//! The raw string is treated as a flat token stream separated by `;`. Each
//! token is `key=value` (or a bare `key`). Attribute tokens (`expires`,
//! `domain`, `path`, `secure`) attach to the most recently started cookie; any
//! other key starts a new cookie and closes the previous one.
//!
//! A real `document.cookie` read only ever contains `name=value` pairs, but
//! attribute-annotated strings (as produced by [`Cookie::serialize`]) parse as
//! well. That is what lets the in-memory host store reuse this parser for
//! incoming writes.
//!
//! ## Quirks
//! - Attribute tokens seen before any cookie name are discarded.
//! - An `expires` or `path` value that does not match its pattern is ignored;
//!   a previously accepted value on the same cookie is kept.
//! - The last cookie in the string is kept unless [`ParseOptions::legacy`] is
//!   used, which reproduces the historic behavior of dropping it.

use lazy_static::lazy_static;
use log::{debug, trace};
use regex::Regex;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::cookies::cookies::HTTP_DATE_TIME;
use crate::cookies::Cookie;

lazy_static! {
    static ref EXPIRES_RE: Regex = Regex::new(
        r"^((?:Mon|Tue|Wed|Thu|Fri|Sat|Sun), \d{2} (?:Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec) \d{4} \d{2}:\d{2}:\d{2}) ([A-Z]{1,3})$"
    )
    .expect("expires pattern must compile");
    static ref PATH_RE: Regex =
        Regex::new(r"^/[A-Za-z0-9\-._~!$&'()*+,=:@%/]*$").expect("path pattern must compile");
}

/// Knobs for [`parse_cookie_string`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseOptions {
    /// Keep the final cookie of the string. When `false`, the last cookie is
    /// dropped because only a following cookie name ever closes a record.
    pub keep_trailing: bool,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self { keep_trailing: true }
    }
}

impl ParseOptions {
    /// Options reproducing the historic parser, which drops the last cookie.
    pub fn legacy() -> Self {
        Self { keep_trailing: false }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Attribute {
    Expires,
    Domain,
    Path,
    Secure,
}

impl Attribute {
    fn from_key(key: &str) -> Option<Self> {
        if key.eq_ignore_ascii_case("expires") {
            Some(Attribute::Expires)
        } else if key.eq_ignore_ascii_case("domain") {
            Some(Attribute::Domain)
        } else if key.eq_ignore_ascii_case("path") {
            Some(Attribute::Path)
        } else if key.eq_ignore_ascii_case("secure") {
            Some(Attribute::Secure)
        } else {
            None
        }
    }
}

/// Parses a raw cookie string into cookies, in the order their names appear.
pub fn parse_cookie_string(raw: &str, options: ParseOptions) -> Vec<Cookie> {
    let mut cookies = Vec::new();
    let mut current = Cookie::default();

    for part in raw.split(';') {
        let (key, value) = match part.split_once('=') {
            Some((key, value)) => (key.trim(), value.trim()),
            None => (part.trim(), ""),
        };

        if key.is_empty() {
            if !value.is_empty() {
                debug!("skipping cookie token without a name: `{}`", part.trim());
            }
            continue;
        }

        let Some(attribute) = Attribute::from_key(key) else {
            if !current.name.is_empty() {
                trace!("parsed cookie `{}`", current.name);
                cookies.push(std::mem::take(&mut current));
            }
            current.name = key.to_string();
            current.value = value.to_string();
            continue;
        };

        if current.name.is_empty() {
            debug!("discarding `{key}` attribute that precedes any cookie name");
            continue;
        }

        match attribute {
            Attribute::Expires => match parse_expires(value) {
                Some(expires) => current.expires = Some(expires),
                None => debug!("ignoring malformed expires `{value}` on cookie `{}`", current.name),
            },
            Attribute::Domain => current.domain = Some(value.to_string()),
            Attribute::Path => {
                if is_valid_path(value) {
                    current.path = Some(value.to_string());
                } else {
                    debug!("ignoring malformed path `{value}` on cookie `{}`", current.name);
                }
            }
            Attribute::Secure => current.secure = true,
        }
    }

    if !current.name.is_empty() {
        if options.keep_trailing {
            trace!("parsed cookie `{}`", current.name);
            cookies.push(current);
        } else {
            debug!("dropping trailing cookie `{}`", current.name);
        }
    }

    cookies
}

/// Returns `true` if `path` is a leading-slash cookie path.
pub fn is_valid_path(path: &str) -> bool {
    PATH_RE.is_match(path)
}

/// Parses `<DayName>, DD <MonName> YYYY HH:MM:SS <TZ>` into a UTC timestamp.
///
/// Returns `None` for anything that does not match, including impossible
/// dates and unknown time zones.
pub fn parse_expires(value: &str) -> Option<OffsetDateTime> {
    let caps = EXPIRES_RE.captures(value)?;

    let offset = zone_offset(&caps[2])?;
    let local = PrimitiveDateTime::parse(&caps[1], HTTP_DATE_TIME).ok()?;

    Some(local.assume_offset(offset).to_offset(UtcOffset::UTC))
}

// RFC 822 zone names.
fn zone_offset(zone: &str) -> Option<UtcOffset> {
    let hours = match zone {
        "GMT" | "UTC" | "UT" | "Z" => 0,
        "EDT" => -4,
        "EST" | "CDT" => -5,
        "CST" | "MDT" => -6,
        "MST" | "PDT" => -7,
        "PST" => -8,
        _ => return None,
    };
    UtcOffset::from_hms(hours, 0, 0).ok()
}
