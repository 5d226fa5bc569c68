use chrono::{DateTime, Datelike, Offset, TimeZone, Timelike, Utc};

const DAY_NAMES: [&str; 7] = [
    "Sunday",
    "Monday",
    "Tuesday",
    "Wednesday",
    "Thursday",
    "Friday",
    "Saturday",
];

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Expands strftime-style tokens against a concrete instant. Unknown tokens
// (including dashed ones other than %-I) pass through verbatim, and a stray
// '%' is kept as-is, so the formatter never fails.
pub fn format_timestamp<Tz: TimeZone>(pattern: &str, instant: &DateTime<Tz>) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::with_capacity(pattern.len() * 2);
    let mut i = 0;
    while i < chars.len() {
        let ch = chars[i];
        if ch != '%' {
            out.push(ch);
            i += 1;
            continue;
        }
        let dashed = matches!(chars.get(i + 1), Some('-'));
        let token_at = if dashed { i + 2 } else { i + 1 };
        match chars.get(token_at).copied() {
            Some(token) if token.is_ascii_alphabetic() => {
                match token_text(token, dashed, instant) {
                    Some(text) => out.push_str(&text),
                    None => {
                        out.push('%');
                        if dashed {
                            out.push('-');
                        }
                        out.push(token);
                    }
                }
                i = token_at + 1;
            }
            // Only the '%' is consumed; whatever follows is rescanned.
            _ => {
                out.push('%');
                i += 1;
            }
        }
    }
    out
}

pub fn clock_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format_timestamp("%-I:%M %p", now)
}

pub fn date_line<Tz: TimeZone>(now: &DateTime<Tz>) -> String {
    format_timestamp("%A, %B %e", now)
}

// Looks a cookie up in a raw Cookie header. First exact name match wins,
// the value is percent-decoded.
pub fn read_cookie(header: &str, name: &str) -> Option<String> {
    if header.is_empty() {
        return None;
    }
    let prefix = format!("{name}=");
    for part in header.split(';') {
        let cookie = part.trim();
        if let Some(rest) = cookie.strip_prefix(prefix.as_str()) {
            return Some(percent_decode(rest));
        }
    }
    None
}

fn token_text<Tz: TimeZone>(token: char, dashed: bool, instant: &DateTime<Tz>) -> Option<String> {
    if dashed {
        return match token {
            'I' => Some(hour12(instant).to_string()),
            _ => None,
        };
    }
    let text = match token {
        'a' => DAY_NAMES[day_index(instant)][..3].to_string(),
        'A' => DAY_NAMES[day_index(instant)].to_string(),
        'b' => MONTH_NAMES[instant.month0() as usize][..3].to_string(),
        'B' => MONTH_NAMES[instant.month0() as usize].to_string(),
        'c' => utc_string(instant),
        'C' => instant.year().div_euclid(100).to_string(),
        'd' => format!("{:02}", instant.day()),
        'e' => instant.day().to_string(),
        'F' => {
            let utc = instant.with_timezone(&Utc);
            format!("{:04}-{:02}-{:02}", utc.year(), utc.month(), utc.day())
        }
        'G' => instant.iso_week().year().to_string(),
        'g' => format!("{:02}", instant.iso_week().year().rem_euclid(100)),
        'H' => format!("{:02}", instant.hour()),
        'I' => format!("{:02}", hour12(instant)),
        'j' => format!("{:03}", instant.ordinal()),
        'k' => instant.hour().to_string(),
        'l' => hour12(instant).to_string(),
        'm' => format!("{:02}", instant.month()),
        'M' => format!("{:02}", instant.minute()),
        'p' => meridiem(instant).to_string(),
        'P' => meridiem(instant).to_lowercase(),
        's' => instant.timestamp().to_string(),
        'S' => format!("{:02}", instant.second()),
        'u' => instant.weekday().number_from_monday().to_string(),
        'V' => format!("{:02}", instant.iso_week().week()),
        'w' => instant.weekday().num_days_from_sunday().to_string(),
        'x' => format!("{}/{}/{}", instant.month(), instant.day(), instant.year()),
        'X' => format!(
            "{}:{:02}:{:02} {}",
            hour12(instant),
            instant.minute(),
            instant.second(),
            meridiem(instant)
        ),
        'y' => format!("{:02}", instant.year().rem_euclid(100)),
        'Y' => instant.year().to_string(),
        'z' => {
            let (sign, hours, minutes) = offset_parts(instant);
            format!("{sign}{hours:02}{minutes:02}")
        }
        'Z' => {
            let (sign, hours, minutes) = offset_parts(instant);
            if hours == 0 && minutes == 0 {
                "UTC".to_string()
            } else {
                format!("UTC{sign}{hours:02}:{minutes:02}")
            }
        }
        _ => return None,
    };
    Some(text)
}

fn day_index<Tz: TimeZone>(instant: &DateTime<Tz>) -> usize {
    instant.weekday().num_days_from_sunday() as usize
}

fn hour12<Tz: TimeZone>(instant: &DateTime<Tz>) -> u32 {
    (instant.hour() + 11) % 12 + 1
}

fn meridiem<Tz: TimeZone>(instant: &DateTime<Tz>) -> &'static str {
    if instant.hour() < 12 { "AM" } else { "PM" }
}

fn utc_string<Tz: TimeZone>(instant: &DateTime<Tz>) -> String {
    let utc = instant.with_timezone(&Utc);
    format!(
        "{}, {:02} {} {} {:02}:{:02}:{:02} GMT",
        &DAY_NAMES[utc.weekday().num_days_from_sunday() as usize][..3],
        utc.day(),
        &MONTH_NAMES[utc.month0() as usize][..3],
        utc.year(),
        utc.hour(),
        utc.minute(),
        utc.second()
    )
}

fn offset_parts<Tz: TimeZone>(instant: &DateTime<Tz>) -> (char, i32, i32) {
    let secs = instant.offset().fix().local_minus_utc();
    let sign = if secs < 0 { '-' } else { '+' };
    let secs = secs.abs();
    (sign, secs / 3600, secs % 3600 / 60)
}

// decodeURIComponent, minus the exceptions: '+' stays a plus and malformed
// escapes are kept verbatim instead of failing the whole value.
fn percent_decode(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_digit(bytes[i + 1]), hex_digit(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

fn hex_digit(byte: u8) -> Option<u8> {
    (byte as char).to_digit(16).map(|digit| digit as u8)
}
