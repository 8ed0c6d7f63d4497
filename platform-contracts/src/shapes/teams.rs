use super::common::{ISO_DATE, UUID};
use api_contract::schema::{ObjectShape, Primitive, Shape};
use lazy_static::lazy_static;
use std::sync::Arc;

lazy_static! {
    static ref AFFILIATION_ROLE: Shape =
        Primitive::string().one_of(["owner", "manager", "member"]).into();

    pub static ref TEAM: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("id", &*UUID)
            .required("name", Primitive::string().non_empty().max_length(120))
            .required("created_at", &*ISO_DATE)
            .required("member_count", Primitive::integer().min(0.0))
            .into()
    );

    /// `GET /teams`
    pub static ref TEAM_LIST: Arc<Shape> =
        Arc::new(Shape::array_of(&*TEAM).unique_by("/id").into());

    /// `GET /teams/{id}/affiliations/{id}` embeds the organization.
    pub static ref AFFILIATION: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("id", &*UUID)
            .required("team_id", &*UUID)
            .required("user_id", &*UUID)
            .required("role", AFFILIATION_ROLE.clone())
            .required(
                "organization",
                ObjectShape::new()
                    .required("id", &*UUID)
                    .required("name", Primitive::string().non_empty()),
            )
            .into()
    );

    /// `POST` and `PUT` on affiliations only echo the organization id.
    pub static ref AFFILIATION_WRITE: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("id", &*UUID)
            .required("team_id", &*UUID)
            .required("user_id", &*UUID)
            .required("role", AFFILIATION_ROLE.clone())
            .required("organization_id", &*UUID)
            .into()
    );

    pub static ref ASSIGNMENT: Arc<Shape> = Arc::new(
        ObjectShape::new()
            .required("id", &*UUID)
            .required("team_id", &*UUID)
            .required("property_id", &*UUID)
            .required("assigned_at", &*ISO_DATE)
            .optional("note", Shape::string().nullable())
            .into()
    );
}
