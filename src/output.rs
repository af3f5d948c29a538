use crate::{Error, ErrorKind};
use serde::Serialize;
use std::sync::OnceLock;

static QUIET: OnceLock<bool> = OnceLock::new();

pub fn is_quiet() -> bool {
    *QUIET.get_or_init(|| {
        std::env::var("TEA_INVENTORY_QUIET")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false)
    })
}

/// How command results are written to stdout
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    Human,
    Json,
}

impl OutputMode {
    pub fn is_human(&self) -> bool {
        matches!(self, OutputMode::Human)
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    ok: bool,
    command: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorBody>,
}

#[derive(Serialize)]
struct ErrorBody {
    kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    uri: Option<String>,
    message: String,
}

fn kind_name(kind: ErrorKind) -> &'static str {
    match kind {
        ErrorKind::InvalidAddress => "invalid_address",
        ErrorKind::UnsupportedOperation => "unsupported_operation",
        ErrorKind::Validation => "validation",
        ErrorKind::Storage => "storage",
        ErrorKind::Other => "other",
    }
}

/// Write a successful result as a JSON envelope
pub fn emit_success<T: Serialize>(command: &str, data: T) -> serde_json::Result<()> {
    let envelope = Envelope {
        ok: true,
        command,
        data: Some(data),
        error: None,
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}

/// Write a failure as a JSON envelope. Store errors keep their kind and
/// address; anything else is reported as `other`.
pub fn emit_error(command: &str, err: &anyhow::Error) -> serde_json::Result<()> {
    let (kind, uri) = match err.downcast_ref::<Error>() {
        Some(store_err) => (store_err.kind(), store_err.uri().map(str::to_string)),
        None => (ErrorKind::Other, None),
    };
    let envelope: Envelope<'_, ()> = Envelope {
        ok: false,
        command,
        data: None,
        error: Some(ErrorBody {
            kind: kind_name(kind),
            uri,
            message: format!("{:#}", err),
        }),
    };
    println!("{}", serde_json::to_string_pretty(&envelope)?);
    Ok(())
}
