use super::common::{EMAIL, TIMESTAMP, UUID};
use api_contract::schema::{ObjectShape, Primitive, Shape};
use lazy_static::lazy_static;
use regex::Regex;
use std::sync::Arc;

/// Three dot separated base64url segments, the signature may be empty.
const JWT_PATTERN: &str = r"^[A-Za-z0-9_-]+\.[A-Za-z0-9_-]+\.[A-Za-z0-9_-]*$";

lazy_static! {
    static ref JWT: Regex = Regex::new(JWT_PATTERN).unwrap();

    pub static ref USER: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("id", &*UUID)
            .required("email", &*EMAIL)
            .required("name", Primitive::string().non_empty())
            .required("role", Primitive::string().one_of(["admin", "member", "viewer"]))
            .into()
    );

    /// `POST /auth/session`
    pub static ref SESSION: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("token", Primitive::string().pattern(JWT.clone()))
            .optional("refresh_token", Primitive::string().non_empty())
            .required("expires_at", &*TIMESTAMP)
            .required("user", &*USER)
            .into()
    );

    /// `GET /auth/token`
    pub static ref TOKEN_STATUS: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("valid", Shape::boolean())
            .required("user_id", Shape::reference(&UUID).nullable())
            .into()
    );
}
