use thiserror::Error;

/// Problems with a single event or query parameter. None of these abort an
/// aggregation: callers skip the event or treat the query as empty.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DataError {
    #[error("event {index} has no {field}")]
    MissingField { field: &'static str, index: u32 },

    #[error("minute range {lo}-{hi} is inverted")]
    InvalidRange { lo: u16, hi: u16 },
}
