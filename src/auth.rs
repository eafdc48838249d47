//! Bearer token validation for student-facing endpoints
//!
//! Tokens are issued elsewhere; this service only verifies HS256 signatures
//! and reads the caller's identity from the claims.

use actix_web::{dev::Payload, error::ResponseError, http::header::AUTHORIZATION, http::StatusCode, web, FromRequest, HttpRequest, HttpResponse};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};
use std::future::{ready, Ready};
use thiserror::Error;
use crate::models::ErrorResponse;

/// Errors raised while authenticating a request
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("Authorization header required")]
    MissingHeader,

    #[error("Invalid authorization header format. Use 'Bearer <token>'")]
    MalformedHeader,

    #[error("Invalid or expired token: {0}")]
    InvalidToken(#[from] jsonwebtoken::errors::Error),

    #[error("Token verification is not configured")]
    NotConfigured,

    #[error("{0}")]
    Forbidden(String),
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        match self {
            AuthError::MissingHeader | AuthError::MalformedHeader | AuthError::InvalidToken(_) => {
                StatusCode::UNAUTHORIZED
            }
            AuthError::Forbidden(_) => StatusCode::FORBIDDEN,
            AuthError::NotConfigured => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        let error = match self {
            AuthError::Forbidden(_) => "forbidden",
            AuthError::NotConfigured => "internal_error",
            _ => "unauthorized",
        };

        HttpResponse::build(status).json(ErrorResponse::new(error, self.to_string(), status.as_u16()))
    }
}

/// Account type carried in the token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UserType {
    #[serde(rename = "stu")]
    Student,
    #[serde(rename = "fac")]
    Faculty,
}

/// JWT claims as issued by the account service
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(rename = "type")]
    pub user_type: UserType,
    pub exp: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// Verifies HS256 tokens against a shared secret
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str, issuer: Option<&str>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(issuer) = issuer {
            validation.set_issuer(&[issuer]);
        }

        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AuthError> {
        let data = decode::<Claims>(token, &self.key, &self.validation)?;
        Ok(data.claims)
    }
}

/// The caller identified by a valid bearer token
#[derive(Debug, Clone)]
pub struct AuthenticatedUser {
    pub uid: String,
    pub email: String,
    pub name: String,
    pub user_type: UserType,
}

impl AuthenticatedUser {
    /// Reject anyone who is not a student
    pub fn require_student(&self, message: &str) -> Result<(), AuthError> {
        if self.user_type == UserType::Student {
            Ok(())
        } else {
            Err(AuthError::Forbidden(message.to_string()))
        }
    }
}

impl From<Claims> for AuthenticatedUser {
    fn from(claims: Claims) -> Self {
        Self {
            uid: claims.user_id,
            email: claims.email,
            name: claims.name,
            user_type: claims.user_type,
        }
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        ready(authenticate(req))
    }
}

/// Read and verify the bearer token on a request
pub fn authenticate(req: &HttpRequest) -> Result<AuthenticatedUser, AuthError> {
    let verifier = req
        .app_data::<web::Data<JwtVerifier>>()
        .ok_or(AuthError::NotConfigured)?;

    let header = req
        .headers()
        .get(AUTHORIZATION)
        .ok_or(AuthError::MissingHeader)?
        .to_str()
        .map_err(|_| AuthError::MalformedHeader)?;

    let token = header
        .strip_prefix("Bearer ")
        .ok_or(AuthError::MalformedHeader)?;

    let claims = verifier.verify(token.trim()).map_err(|e| {
        tracing::info!("Rejected bearer token on {}: {}", req.path(), e);
        e
    })?;

    Ok(claims.into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret";

    fn token(user_type: UserType, secret: &str) -> String {
        let claims = Claims {
            user_id: "stu1".to_string(),
            email: "stu1@example.edu".to_string(),
            name: "Student One".to_string(),
            user_type,
            exp: (chrono::Utc::now().timestamp() + 3600) as usize,
            iss: Some("feels-like-summer".to_string()),
        };
        encode(&Header::default(), &claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    fn request_with(header: Option<String>) -> HttpRequest {
        let mut req = TestRequest::default()
            .app_data(web::Data::new(JwtVerifier::new(SECRET, Some("feels-like-summer"))));
        if let Some(value) = header {
            req = req.insert_header((AUTHORIZATION, value));
        }
        req.to_http_request()
    }

    #[test]
    fn test_valid_student_token() {
        let req = request_with(Some(format!("Bearer {}", token(UserType::Student, SECRET))));
        let user = authenticate(&req).unwrap();

        assert_eq!(user.uid, "stu1");
        assert_eq!(user.user_type, UserType::Student);
        assert!(user.require_student("students only").is_ok());
    }

    #[test]
    fn test_faculty_is_forbidden() {
        let req = request_with(Some(format!("Bearer {}", token(UserType::Faculty, SECRET))));
        let user = authenticate(&req).unwrap();

        let err = user.require_student("Only students can get recommendations").unwrap_err();
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
        assert_eq!(err.to_string(), "Only students can get recommendations");
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let req = request_with(Some(format!("Bearer {}", token(UserType::Student, "other"))));
        let err = authenticate(&req).unwrap_err();
        assert_eq!(err.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_missing_and_malformed_header() {
        assert!(matches!(authenticate(&request_with(None)), Err(AuthError::MissingHeader)));
        assert!(matches!(
            authenticate(&request_with(Some("Token abc".to_string()))),
            Err(AuthError::MalformedHeader)
        ));
    }

    #[test]
    fn test_missing_verifier() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(authenticate(&req), Err(AuthError::NotConfigured)));
    }
}
