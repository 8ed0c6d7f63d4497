//! Response shapes of the platform's public endpoints, ready to be checked
//! with [`api_contract::validate`] or [`api_contract::HttpResponse::expect_schema`].

pub mod shapes;
