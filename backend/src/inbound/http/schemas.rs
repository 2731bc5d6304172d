//! OpenAPI schema definitions for domain types.
//!
//! Domain error types do not derive `ToSchema`; these wrappers mirror their
//! serialised shape for the generated document.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
///
/// Stable machine-readable error kinds returned in API error responses.
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    ValidationError,
    /// Authentication failed or is missing.
    UnauthorizedError,
    /// The resource does not exist or belongs to another user.
    NotFoundError,
    /// A uniqueness or integrity rule would be violated.
    ConflictError,
    /// The data store is unavailable.
    StoreError,
    /// An unexpected error occurred on the server.
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error)]
#[schema(rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error kind.
    #[schema(example = "ValidationError")]
    error: ErrorCodeSchema,
    /// Human-readable message returned to clients.
    #[schema(example = "species must not be empty")]
    message: String,
    /// Correlation identifier echoed in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level details such as `{"field": "species", "code": "empty"}`.
    details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use utoipa::PartialSchema;

    fn schema_to_json<T: PartialSchema>() -> String {
        serde_json::to_string(&T::schema()).expect("schema serialises to JSON")
    }

    #[test]
    fn error_code_schema_lists_every_kind() {
        let schema_json = schema_to_json::<ErrorCodeSchema>();
        for kind in [
            "ValidationError",
            "UnauthorizedError",
            "NotFoundError",
            "ConflictError",
            "StoreError",
            "InternalError",
        ] {
            assert!(schema_json.contains(kind), "missing {kind}");
        }
    }

    #[test]
    fn error_schema_uses_wire_field_names() {
        assert_eq!(ErrorSchema::name(), "crate.domain.Error");
        let schema_json = schema_to_json::<ErrorSchema>();
        assert!(schema_json.contains("\"error\""));
        assert!(schema_json.contains("traceId"));
    }
}
