#[cfg(test)]
mod tests {
    use crate::schemas::ApiDoc;
    use utoipa::openapi::{PathItemType, RefOr, schema::Schema};
    use utoipa::OpenApi;

    fn object_properties(name: &str) -> Vec<String> {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.unwrap();
        match components.schemas.get(name) {
            Some(RefOr::T(Schema::Object(obj))) => obj.properties.keys().cloned().collect(),
            other => panic!("{} should be an object schema, got {:?}", name, other),
        }
    }

    #[test]
    fn test_openapi_schema_generation() {
        let openapi = ApiDoc::openapi();
        assert_eq!(openapi.info.title, "SnapBook API");

        let components = openapi.components.as_ref().unwrap();
        for name in [
            "ErrorResponse",
            "HealthResponse",
            "TokenPair",
            "BookingResponse",
            "JobPostResponse",
            "ProfileResponse",
        ] {
            assert!(components.schemas.contains_key(name), "missing schema {}", name);
        }

        assert!(serde_json::to_string(&openapi).is_ok());
    }

    #[test]
    fn test_error_response_schema_structure() {
        let properties = object_properties("ErrorResponse");
        for field in ["error", "code", "success"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_health_response_schema_structure() {
        let properties = object_properties("HealthResponse");
        for field in ["status", "version", "database"] {
            assert!(properties.iter().any(|p| p == field));
        }
    }

    #[test]
    fn test_booking_paths_are_documented() {
        let openapi = ApiDoc::openapi();
        let paths = &openapi.paths.paths;

        let bookings = paths.get("/api/v1/bookings").unwrap();
        assert!(bookings.operations.contains_key(&PathItemType::Get));
        assert!(bookings.operations.contains_key(&PathItemType::Post));

        let review = paths.get("/api/v1/bookings/{id}/review").unwrap();
        let post = review.operations.get(&PathItemType::Post).unwrap();
        for status in ["200", "400", "403", "404", "409"] {
            assert!(post.responses.responses.contains_key(status));
        }

        let health = paths.get("/health").unwrap();
        let get = health.operations.get(&PathItemType::Get).unwrap();
        assert!(get.responses.responses.contains_key("500"));
        assert!(get.security.is_none());
    }

    #[test]
    fn test_bearer_scheme_is_registered() {
        let openapi = ApiDoc::openapi();
        let components = openapi.components.as_ref().unwrap();
        assert!(components.security_schemes.contains_key("bearer_auth"));

        let json = serde_json::to_string(&openapi).unwrap();
        assert!(!json.contains("crate::schemas::ErrorResponse"));
        assert!(json.contains("\"bearerFormat\":\"JWT\""));
    }
}
