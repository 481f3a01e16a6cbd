//! Error catalog: static definitions shared by every module.

use http::StatusCode;

/// Static error definition from the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrDef {
    pub status: u16,
    pub code: &'static str,
}

impl ErrDef {
    /// HTTP status for this definition, `500` if the catalog entry is malformed.
    #[must_use]
    pub fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

pub const BAD_REQUEST: ErrDef = ErrDef {
    status: 400,
    code: "bad_request",
};

pub const VALIDATION_FAILED: ErrDef = ErrDef {
    status: 400,
    code: "validation_failed",
};

pub const INVALID_ID: ErrDef = ErrDef {
    status: 400,
    code: "invalid_id",
};

pub const UNAUTHORIZED: ErrDef = ErrDef {
    status: 401,
    code: "unauthorized",
};

pub const NOT_FOUND: ErrDef = ErrDef {
    status: 404,
    code: "not_found",
};

pub const CONFLICT: ErrDef = ErrDef {
    status: 409,
    code: "duplicate_field",
};

pub const PAYLOAD_TOO_LARGE: ErrDef = ErrDef {
    status: 413,
    code: "payload_too_large",
};

pub const UNSUPPORTED_MEDIA_TYPE: ErrDef = ErrDef {
    status: 415,
    code: "unsupported_media_type",
};

pub const TOO_MANY_REQUESTS: ErrDef = ErrDef {
    status: 429,
    code: "too_many_requests",
};

pub const INTERNAL: ErrDef = ErrDef {
    status: 500,
    code: "internal_error",
};

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use super::*;

    #[test]
    fn catalog_statuses_are_valid() {
        let defs = [
            BAD_REQUEST,
            VALIDATION_FAILED,
            INVALID_ID,
            UNAUTHORIZED,
            NOT_FOUND,
            CONFLICT,
            PAYLOAD_TOO_LARGE,
            UNSUPPORTED_MEDIA_TYPE,
            TOO_MANY_REQUESTS,
            INTERNAL,
        ];
        for def in defs {
            assert_eq!(def.status_code().as_u16(), def.status, "{}", def.code);
        }
    }

    #[test]
    fn malformed_status_falls_back_to_500() {
        let def = ErrDef {
            status: 42,
            code: "weird",
        };
        assert_eq!(def.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
