use super::common::{TIMESTAMP, UUID};
use api_contract::schema::{ObjectShape, Primitive, Shape};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    pub static ref ROW_ERROR: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("row", Primitive::integer().min(1.0))
            .required("message", Primitive::string().non_empty())
            .into()
    );

    /// `POST /imports` and `GET /imports/{id}`
    pub static ref IMPORT_JOB: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("id", &*UUID)
            .required(
                "status",
                Primitive::string().one_of(["queued", "running", "completed", "failed"]),
            )
            .required("created_at", &*TIMESTAMP)
            .required("finished_at", Shape::reference(&TIMESTAMP).nullable())
            .required("rows_total", Primitive::integer().min(0.0))
            .required("rows_failed", Primitive::integer().min(0.0))
            .optional("errors", Shape::array_of(&*ROW_ERROR))
            .into()
    );
}
