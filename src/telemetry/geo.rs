//! Country lookup from a local IP database.
//!
//! Two formats are read, chosen by file extension:
//!
//! - `.mmdb`: a MaxMind GeoIP2 / GeoLite2 country (or city) database.
//! - anything else: a CSV file with one range per line, `start,end,country`,
//!   where `start` and `end` are IPv4 or IPv6 addresses (inclusive) and fields
//!   may be double-quoted. Blank lines and lines starting with `#` are ignored.

use maxminddb::{MaxMindDBError, Reader, geoip2};
use std::fmt;
use std::net::IpAddr;
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GeoError {
    #[error("failed to read geolocation database {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid geolocation database entry at line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("invalid IP address [{0}]")]
    InvalidAddress(String),
    #[error("failed to open MaxMind database {path}: {source}")]
    MaxMindOpen {
        path: String,
        #[source]
        source: MaxMindDBError,
    },
    #[error("MaxMind lookup failed: {0}")]
    MaxMindLookup(#[source] MaxMindDBError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct IpRange {
    start: u128,
    end: u128,
    country: String,
}

enum Source {
    /// Sorted by start address.
    Ranges(Vec<IpRange>),
    MaxMind(Reader<Vec<u8>>),
}

/// Read-only country database.
pub struct CountryDatabase {
    source: Source,
}

impl fmt::Debug for CountryDatabase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.source {
            Source::Ranges(ranges) => f
                .debug_struct("CountryDatabase")
                .field("ranges", &ranges.len())
                .finish(),
            Source::MaxMind(reader) => f
                .debug_struct("CountryDatabase")
                .field("database_type", &reader.metadata.database_type)
                .finish(),
        }
    }
}

impl CountryDatabase {
    pub fn open(path: &Path) -> Result<Self, GeoError> {
        let is_mmdb = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("mmdb"));
        if is_mmdb {
            return Self::open_maxmind(path);
        }
        let content = std::fs::read_to_string(path).map_err(|source| GeoError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn open_maxmind(path: &Path) -> Result<Self, GeoError> {
        let reader = Reader::open_readfile(path).map_err(|source| GeoError::MaxMindOpen {
            path: path.display().to_string(),
            source,
        })?;
        Ok(Self {
            source: Source::MaxMind(reader),
        })
    }

    pub fn parse(content: &str) -> Result<Self, GeoError> {
        let mut ranges = Vec::new();
        for (index, raw) in content.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            let parse_error = |message: String| GeoError::Parse { line: index + 1, message };
            let fields: Vec<&str> = line.split(',').map(|f| f.trim().trim_matches('"')).collect();
            let [start, end, country] = fields.as_slice() else {
                return Err(parse_error(format!("expected 3 fields, found {}", fields.len())));
            };
            let start = parse_address(start).ok_or_else(|| parse_error(format!("bad start address [{start}]")))?;
            let end = parse_address(end).ok_or_else(|| parse_error(format!("bad end address [{end}]")))?;
            if end < start {
                return Err(parse_error("range end precedes its start".to_string()));
            }
            ranges.push(IpRange {
                start,
                end,
                country: country.to_string(),
            });
        }
        ranges.sort_by_key(|r| r.start);
        Ok(Self {
            source: Source::Ranges(ranges),
        })
    }

    /// Short description for logging.
    pub fn describe(&self) -> String {
        match &self.source {
            Source::Ranges(ranges) => format!("{} address ranges", ranges.len()),
            Source::MaxMind(reader) => format!("MaxMind database [{}]", reader.metadata.database_type),
        }
    }

    /// ISO code of the country holding `address`.
    pub fn country(&self, address: IpAddr) -> Result<Option<&str>, GeoError> {
        match &self.source {
            Source::Ranges(ranges) => Ok(range_country(ranges, address)),
            Source::MaxMind(reader) => match reader.lookup::<geoip2::Country>(address) {
                Ok(record) => Ok(record.country.and_then(|c| c.iso_code)),
                Err(MaxMindDBError::AddressNotFoundError(_)) => Ok(None),
                Err(e) => Err(GeoError::MaxMindLookup(e)),
            },
        }
    }

    pub fn country_for(&self, ip: &str) -> Result<Option<&str>, GeoError> {
        let address: IpAddr = ip
            .trim()
            .parse()
            .map_err(|_| GeoError::InvalidAddress(ip.to_string()))?;
        self.country(address)
    }
}

fn range_country(ranges: &[IpRange], address: IpAddr) -> Option<&str> {
    let key = address_key(address);
    let index = ranges.partition_point(|r| r.start <= key);
    let range = ranges.get(index.checked_sub(1)?)?;
    (key <= range.end).then_some(range.country.as_str())
}

fn parse_address(value: &str) -> Option<u128> {
    value.parse::<IpAddr>().ok().map(address_key)
}

/// IPv4 addresses are keyed by their IPv6-mapped form.
fn address_key(address: IpAddr) -> u128 {
    match address {
        IpAddr::V4(v4) => u128::from(v4.to_ipv6_mapped()),
        IpAddr::V6(v6) => u128::from(v6),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# start,end,country
"10.0.0.0","10.0.0.255","BE"
192.168.1.0,192.168.1.127,NL
"2001:db8::","2001:db8::ffff","FR"
"#;

    #[test]
    fn test_lookup() {
        let db = CountryDatabase::parse(SAMPLE).unwrap();
        assert_eq!(db.describe(), "3 address ranges");
        assert_eq!(db.country_for("10.0.0.17").unwrap(), Some("BE"));
        assert_eq!(db.country_for("192.168.1.127").unwrap(), Some("NL"));
        assert_eq!(db.country_for("192.168.1.128").unwrap(), None);
        assert_eq!(db.country_for("2001:db8::1").unwrap(), Some("FR"));
        assert_eq!(db.country_for("8.8.8.8").unwrap(), None);
    }

    #[test]
    fn test_invalid_address() {
        let db = CountryDatabase::parse(SAMPLE).unwrap();
        assert!(matches!(db.country_for("localhost"), Err(GeoError::InvalidAddress(_))));
    }

    #[test]
    fn test_rejects_bad_lines() {
        let err = CountryDatabase::parse("10.0.0.0,10.0.0.1\n").unwrap_err();
        assert!(matches!(err, GeoError::Parse { line: 1, .. }));
        let err = CountryDatabase::parse("10.0.0.9,10.0.0.1,BE\n").unwrap_err();
        assert!(err.to_string().contains("precedes"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            CountryDatabase::open(Path::new("does/not/exist.csv")),
            Err(GeoError::Io { .. })
        ));
        assert!(matches!(
            CountryDatabase::open(Path::new("does/not/exist.mmdb")),
            Err(GeoError::MaxMindOpen { .. })
        ));
    }

    #[test]
    fn test_mmdb_extension_selects_maxmind_reader() {
        let dir = tempfile::tempdir().unwrap();
        // Valid as CSV, not as a MaxMind database.
        let path = dir.path().join("GeoLite2-Country.MMDB");
        std::fs::write(&path, SAMPLE).unwrap();
        let err = CountryDatabase::open(&path).unwrap_err();
        assert!(matches!(err, GeoError::MaxMindOpen { .. }));
        assert!(err.to_string().contains("GeoLite2-Country.MMDB"));

        let csv = dir.path().join("countries.csv");
        std::fs::write(&csv, SAMPLE).unwrap();
        assert!(CountryDatabase::open(&csv).is_ok());
    }
}
