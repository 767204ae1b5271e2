use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct Meta {
    pub total: Option<i64>,
}

impl Meta {
    pub fn total(total: usize) -> Self {
        Self {
            total: Some(i64::try_from(total).unwrap_or(i64::MAX)),
        }
    }

    pub fn empty() -> Self {
        Self { total: None }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub message: String,
    pub data: Option<T>,
    pub meta: Option<Meta>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn success(message: impl Into<String>, data: T, meta: Option<Meta>) -> Self {
        Self {
            message: message.into(),
            data: Some(data),
            meta,
        }
    }

    pub fn ok(data: T) -> Self {
        Self::success("OK", data, Some(Meta::empty()))
    }
}
