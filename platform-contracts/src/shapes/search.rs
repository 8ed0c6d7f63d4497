use super::common::UUID;
use api_contract::schema::{ObjectShape, Primitive, Shape};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    pub static ref SEARCH_HIT: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("id", &*UUID)
            .required("type", Primitive::string().one_of(["property", "team", "person"]))
            .required("title", Primitive::string().non_empty())
            .required("score", Primitive::number().min(0.0))
            .optional("highlights", Shape::array_of(Shape::string()))
            .into()
    );

    /// `GET /search`
    pub static ref SEARCH_RESULTS: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("query", Shape::string())
            .required("total", Primitive::integer().min(0.0))
            .required("page", Primitive::integer().min(1.0))
            .required("results", Shape::array_of(&*SEARCH_HIT).unique_by("/id"))
            .into()
    );
}
