use api_contract::schema::{Format, ObjectShape, Primitive, Shape};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    pub static ref UUID: Arc<Shape> = Arc::new(Primitive::string().format(Format::Uuid).into());
    pub static ref EMAIL: Arc<Shape> = Arc::new(Primitive::string().format(Format::Email).into());
    pub static ref ISO_DATE: Arc<Shape> = Arc::new(Shape::date());
    /// Epoch milliseconds, which some services send as a number and others
    /// as a numeric string.
    pub static ref TIMESTAMP: Arc<Shape> = Arc::new(Shape::union([
        Shape::integer(),
        Primitive::string().format(Format::Numeric).into(),
    ]));
    /// Contract for endpoints that answer without a body.
    pub static ref EMPTY_BODY: Arc<Shape> = Arc::new(Shape::literal(""));
    pub static ref ERROR_BODY: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("error", Primitive::string().non_empty())
            .optional("message", Shape::string())
            .optional("details", Shape::any())
            .into()
    );
}
