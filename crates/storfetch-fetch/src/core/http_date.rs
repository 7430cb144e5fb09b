use std::time::SystemTime;

use chrono::{DateTime, NaiveDateTime};

/// `Sunday, 06-Nov-94 08:49:37 GMT`
const RFC_850: &str = "%A, %d-%b-%y %H:%M:%S GMT";
/// `Sun Nov  6 08:49:37 1994`
const ASCTIME: &str = "%a %b %e %H:%M:%S %Y";

/// Parse an HTTP-date in any of the three forms servers send.
///
/// IMF-fixdate (`Sun, 06 Nov 1994 08:49:37 GMT`) is tried first, then the
/// obsolete RFC 850 and asctime forms, which carry no zone and mean GMT.
pub fn parse_http_date(value: &str) -> Option<SystemTime> {
    let value = value.trim();

    if let Ok(time) = DateTime::parse_from_rfc2822(value) {
        return Some(time.into());
    }

    [RFC_850, ASCTIME]
        .into_iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .map(|naive| naive.and_utc().into())
}
