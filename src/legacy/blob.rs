use base64::{engine::general_purpose::STANDARD, Engine as _};
use indexmap::IndexMap;
use thiserror::Error;

/// Value decoded from the legacy serialized-map format.
#[derive(Debug, Clone, PartialEq)]
pub enum BlobValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Map(IndexMap<String, BlobValue>),
}

impl BlobValue {
    /// Scalar rendered as text; maps and nulls have none.
    pub fn as_text(&self) -> Option<String> {
        match self {
            BlobValue::Str(s) => Some(s.clone()),
            BlobValue::Int(i) => Some(i.to_string()),
            BlobValue::Float(f) => Some(f.to_string()),
            BlobValue::Bool(b) => Some(if *b { "1".into() } else { String::new() }),
            BlobValue::Null | BlobValue::Map(_) => None,
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum BlobError {
    #[error("invalid base64: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("unexpected end of data at byte {0}")]
    Eof(usize),
    #[error("unexpected byte {found:?} at {pos}, expected {expected}")]
    Unexpected { pos: usize, found: char, expected: &'static str },
    #[error("invalid number {text:?} at byte {pos}")]
    Number { pos: usize, text: String },
    #[error("map key at byte {0} is not a string or integer")]
    Key(usize),
    #[error("unsupported value type {0:?}")]
    Unsupported(char),
}

/// Decoded provider fields of a donation. Anything that is not a map at the
/// top level, or cannot be decoded at all, is treated as an empty blob.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyBlob {
    fields: IndexMap<String, BlobValue>,
}

impl LegacyBlob {
    pub fn decode(raw: Option<&str>) -> Self {
        let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else { return Self::default() };
        match try_decode(raw) {
            Ok(BlobValue::Map(fields)) => Self { fields },
            Ok(_) => Self::default(),
            Err(err) => {
                tracing::debug!(error = %err, "undecodable donation data, treating as empty");
                Self::default()
            }
        }
    }

    pub fn from_fields(fields: IndexMap<String, BlobValue>) -> Self { Self { fields } }

    pub fn get(&self, key: &str) -> Option<&BlobValue> { self.fields.get(key) }

    /// Non-empty scalar value for `key`.
    pub fn text(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(BlobValue::as_text).filter(|s| !s.trim().is_empty())
    }

    /// Free-text log entries (timestamp key, message) in stored order.
    pub fn log_entries(&self) -> impl Iterator<Item = (&str, String)> {
        let entries = match self.fields.get("log") {
            Some(BlobValue::Map(m)) => Some(m),
            _ => None,
        };
        entries
            .into_iter()
            .flat_map(|m| m.iter())
            .filter_map(|(k, v)| v.as_text().map(|msg| (k.as_str(), msg)))
    }

    pub fn is_empty(&self) -> bool { self.fields.is_empty() }
}

pub fn try_decode(raw: &str) -> Result<BlobValue, BlobError> {
    let bytes = STANDARD.decode(raw)?;
    Parser { input: &bytes, pos: 0 }.value()
}

/// Encodes a map in the legacy format. Used to build fixtures and by
/// tooling that needs to write test rows into a source table.
pub fn encode(fields: &IndexMap<String, BlobValue>) -> String {
    let mut out = String::new();
    write_map(&mut out, fields);
    STANDARD.encode(out.as_bytes())
}

fn write_map(out: &mut String, fields: &IndexMap<String, BlobValue>) {
    out.push_str(&format!("a:{}:{{", fields.len()));
    for (k, v) in fields {
        match k.parse::<i64>() {
            Ok(i) => out.push_str(&format!("i:{};", i)),
            Err(_) => out.push_str(&format!("s:{}:\"{}\";", k.len(), k)),
        }
        write_value(out, v);
    }
    out.push('}');
}

fn write_value(out: &mut String, v: &BlobValue) {
    match v {
        BlobValue::Null => out.push_str("N;"),
        BlobValue::Bool(b) => out.push_str(&format!("b:{};", *b as u8)),
        BlobValue::Int(i) => out.push_str(&format!("i:{};", i)),
        BlobValue::Float(f) => out.push_str(&format!("d:{};", f)),
        BlobValue::Str(s) => out.push_str(&format!("s:{}:\"{}\";", s.len(), s)),
        BlobValue::Map(m) => write_map(out, m),
    }
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn value(&mut self) -> Result<BlobValue, BlobError> {
        let tag = self.next_byte()?;
        match tag {
            b'N' => {
                self.expect(b';', "';'")?;
                Ok(BlobValue::Null)
            }
            b'b' => {
                self.expect(b':', "':'")?;
                let n = self.int_until(b';')?;
                Ok(BlobValue::Bool(n != 0))
            }
            b'i' => {
                self.expect(b':', "':'")?;
                Ok(BlobValue::Int(self.int_until(b';')?))
            }
            b'd' => {
                self.expect(b':', "':'")?;
                let start = self.pos;
                let text = self.token_until(b';')?;
                let f = match text.as_str() {
                    "INF" => f64::INFINITY,
                    "-INF" => f64::NEG_INFINITY,
                    "NAN" => f64::NAN,
                    t => t.parse().map_err(|_| BlobError::Number { pos: start, text: text.clone() })?,
                };
                Ok(BlobValue::Float(f))
            }
            b's' => {
                self.expect(b':', "':'")?;
                Ok(BlobValue::Str(self.string_body()?))
            }
            b'a' => {
                self.expect(b':', "':'")?;
                let len = self.int_until(b':')?;
                self.expect(b'{', "'{'")?;
                let mut map = IndexMap::new();
                for _ in 0..len.max(0) {
                    let key = match self.value()? {
                        BlobValue::Int(i) => i.to_string(),
                        BlobValue::Str(s) => s,
                        _ => return Err(BlobError::Key(self.pos)),
                    };
                    let value = self.value()?;
                    map.insert(key, value);
                }
                self.expect(b'}', "'}'")?;
                Ok(BlobValue::Map(map))
            }
            other => Err(BlobError::Unsupported(other as char)),
        }
    }

    // s:<len>:"<len bytes>";
    fn string_body(&mut self) -> Result<String, BlobError> {
        let len = self.int_until(b':')?;
        let start_pos = self.pos;
        let len = usize::try_from(len).map_err(|_| BlobError::Number { pos: start_pos, text: len.to_string() })?;
        self.expect(b'"', "'\"'")?;
        let end = self.pos.checked_add(len).filter(|e| *e <= self.input.len()).ok_or(BlobError::Eof(self.input.len()))?;
        let s = String::from_utf8_lossy(&self.input[self.pos..end]).into_owned();
        self.pos = end;
        self.expect(b'"', "'\"'")?;
        self.expect(b';', "';'")?;
        Ok(s)
    }

    fn next_byte(&mut self) -> Result<u8, BlobError> {
        let b = *self.input.get(self.pos).ok_or(BlobError::Eof(self.pos))?;
        self.pos += 1;
        Ok(b)
    }

    fn expect(&mut self, want: u8, expected: &'static str) -> Result<(), BlobError> {
        let pos = self.pos;
        let b = self.next_byte()?;
        if b != want {
            return Err(BlobError::Unexpected { pos, found: b as char, expected });
        }
        Ok(())
    }

    fn token_until(&mut self, end: u8) -> Result<String, BlobError> {
        let start = self.pos;
        let rel = self.input[start..].iter().position(|b| *b == end).ok_or(BlobError::Eof(self.input.len()))?;
        self.pos = start + rel + 1;
        Ok(String::from_utf8_lossy(&self.input[start..start + rel]).into_owned())
    }

    fn int_until(&mut self, end: u8) -> Result<i64, BlobError> {
        let start = self.pos;
        let text = self.token_until(end)?;
        text.parse().map_err(|_| BlobError::Number { pos: start, text })
    }
}
