//! Episode file persistence.
//!
//! Quoted-CSV dialect: fields containing a comma, double quote, CR, or LF
//! are wrapped in double quotes with inner quotes doubled (RFC 4180 style).
//! Two header variants are recognized:
//!
//! - v2 (written): `query,response,timestamp_ms,embedding_dim,embedding,metadata`
//!   where `embedding` is a space-separated float field and `metadata` is a
//!   JSON object.
//! - legacy (read only): `query,response,timestamp_ms,embedding_dim` —
//!   embeddings were not saved; they reload as zero vectors of the declared
//!   dimension with `embedding_zero_filled` set.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use tracing::warn;

use engram_core::errors::{EngramResult, EpisodicError};
use engram_core::types::Episode;

const HEADER_V2: &str = "query,response,timestamp_ms,embedding_dim,embedding,metadata";
const HEADER_LEGACY: &str = "query,response,timestamp_ms,embedding_dim";

fn persistence_err(path: &Path, reason: impl Into<String>) -> EpisodicError {
    EpisodicError::Persistence {
        path: path.display().to_string(),
        reason: reason.into(),
    }
}

pub(crate) fn save(episodes: &[Episode], path: &Path) -> EngramResult<()> {
    let mut out = String::new();
    out.push_str(HEADER_V2);
    out.push('\n');
    for episode in episodes {
        let embedding = episode
            .embedding
            .iter()
            .map(|x| x.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let metadata = serde_json::to_string(&episode.metadata)
            .map_err(|e| persistence_err(path, e.to_string()))?;
        out.push_str(&quote(&episode.query));
        out.push(',');
        out.push_str(&quote(&episode.response));
        out.push(',');
        out.push_str(&episode.timestamp_ms.to_string());
        out.push(',');
        out.push_str(&episode.embedding.len().to_string());
        out.push(',');
        out.push_str(&quote(&embedding));
        out.push(',');
        out.push_str(&quote(&metadata));
        out.push('\n');
    }
    fs::write(path, out).map_err(|e| persistence_err(path, e.to_string()).into())
}

pub(crate) fn load(path: &Path) -> EngramResult<Vec<Episode>> {
    let input = fs::read_to_string(path).map_err(|e| persistence_err(path, e.to_string()))?;
    let records = parse_records(&input).map_err(|e| persistence_err(path, e))?;
    let mut rows = records.into_iter();

    let header = rows.next().ok_or_else(|| persistence_err(path, "empty episode file"))?;
    let header_line = header.join(",");
    let legacy = match header_line.as_str() {
        HEADER_V2 => false,
        HEADER_LEGACY => true,
        other => {
            return Err(persistence_err(path, format!("unrecognized header {other:?}")).into())
        }
    };
    if legacy {
        warn!(path = %path.display(), "legacy episode file: embeddings will be zero-filled");
    }

    let mut episodes = Vec::new();
    for (line, row) in rows.enumerate() {
        let episode = if legacy {
            parse_legacy_row(&row)
        } else {
            parse_v2_row(&row)
        }
        .map_err(|e| persistence_err(path, format!("record {}: {e}", line + 1)))?;
        episodes.push(episode);
    }
    Ok(episodes)
}

fn parse_legacy_row(row: &[String]) -> Result<Episode, String> {
    if row.len() != 4 {
        return Err(format!("expected 4 fields, got {}", row.len()));
    }
    let timestamp_ms: u64 = row[2].parse().map_err(|_| "bad timestamp".to_string())?;
    let dim: usize = row[3].parse().map_err(|_| "bad embedding_dim".to_string())?;
    Ok(Episode {
        query: row[0].clone(),
        response: row[1].clone(),
        embedding: vec![0.0; dim],
        timestamp_ms,
        metadata: HashMap::new(),
        embedding_zero_filled: true,
    })
}

fn parse_v2_row(row: &[String]) -> Result<Episode, String> {
    if row.len() != 6 {
        return Err(format!("expected 6 fields, got {}", row.len()));
    }
    let timestamp_ms: u64 = row[2].parse().map_err(|_| "bad timestamp".to_string())?;
    let dim: usize = row[3].parse().map_err(|_| "bad embedding_dim".to_string())?;
    let embedding: Vec<f32> = if row[4].is_empty() {
        Vec::new()
    } else {
        row[4]
            .split(' ')
            .map(|t| t.parse::<f32>().map_err(|_| format!("bad embedding value {t:?}")))
            .collect::<Result<_, _>>()?
    };
    if embedding.len() != dim {
        return Err(format!(
            "embedding length {} does not match declared dim {dim}",
            embedding.len()
        ));
    }
    let metadata: HashMap<String, String> =
        serde_json::from_str(&row[5]).map_err(|e| format!("bad metadata: {e}"))?;
    Ok(Episode {
        query: row[0].clone(),
        response: row[1].clone(),
        embedding,
        timestamp_ms,
        metadata,
        embedding_zero_filled: false,
    })
}

/// Quote a field if it contains a separator, quote, or line break.
fn quote(field: &str) -> String {
    if field.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

/// Parse the whole file into records, honoring quoted fields (which may
/// span lines). Records are separated by LF or CRLF outside quotes.
fn parse_records(input: &str) -> Result<Vec<Vec<String>>, String> {
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' => {
                    if chars.peek() == Some(&'"') {
                        chars.next();
                        field.push('"');
                    } else {
                        in_quotes = false;
                    }
                }
                _ => field.push(c),
            }
            continue;
        }
        match c {
            '"' => {
                if field.is_empty() {
                    in_quotes = true;
                } else {
                    return Err("quote inside unquoted field".to_string());
                }
            }
            ',' => {
                record.push(std::mem::take(&mut field));
            }
            '\r' => {
                // Consumed as part of CRLF; bare CR is not a separator.
                if chars.peek() == Some(&'\n') {
                    continue;
                }
                field.push('\r');
            }
            '\n' => {
                record.push(std::mem::take(&mut field));
                records.push(std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }
    if in_quotes {
        return Err("unterminated quoted field".to_string());
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        records.push(record);
    }
    Ok(records)
}
