use serde::Serialize;

/// Value of the `status` field on every successful response.
pub const STATUS_SUCCESS: &str = "success";

/// Uniform success wrapper: `{status: "success", count?, token?, data}`.
#[derive(Debug, Clone, Serialize)]
#[must_use]
pub struct Envelope<T> {
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    pub data: T,
}

impl<T> Envelope<T> {
    pub fn success(data: T) -> Self {
        Self {
            status: STATUS_SUCCESS,
            count: None,
            token: None,
            data,
        }
    }

    pub fn with_count(mut self, count: usize) -> Self {
        self.count = Some(count);
        self
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }
}
