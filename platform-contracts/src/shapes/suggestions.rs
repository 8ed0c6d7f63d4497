use api_contract::schema::{ObjectShape, Primitive, Shape};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    /// `GET /suggestions?q=`
    pub static ref SUGGESTIONS: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("query", Shape::string())
            .required(
                "suggestions",
                Shape::array_of(
                    ObjectShape::new()
                        .required("text", Primitive::string().non_empty())
                        .required("kind", Primitive::string().one_of(["address", "owner", "team"]))
                        .required("score", Primitive::number().min(0.0).max(1.0)),
                )
                .max_items(10)
                .unique_by("/text"),
            )
            .into()
    );
}
