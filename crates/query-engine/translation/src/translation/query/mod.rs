//! Translate the parameters of a list request.

pub mod filtering;
pub mod pagination;
pub mod projection;
pub mod sorting;
pub mod values;

use query_engine_document::document::ast;
use query_engine_metadata::metadata;

use crate::translation::error::Error;
use crate::translation::helpers::{Env, State, Warning};
use crate::translation::params::QueryParams;
pub use pagination::{Page, PaginationInfo};

/// A query ready to run against the store, plus what the translator had to leave out.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPlan {
    pub query: ast::Query,
    pub page: Page,
    pub warnings: Vec<Warning>,
}

/// Translate the request parameters into a query plan.
pub fn translate(
    metadata: &metadata::Metadata,
    params: &QueryParams,
) -> Result<QueryPlan, Error> {
    let env = Env::new(metadata);
    let mut state = State::default();

    let filter = filtering::translate_filter(&env, &mut state, params)?;
    let sort = sorting::translate_sort(&mut state, params);
    let projection = projection::translate_projection(&mut state, params);
    let page = pagination::translate_page(&metadata.pagination, params);

    let query = ast::Query {
        filter,
        projection,
        sort,
        window: page.window(),
    };

    // log and return
    tracing::debug!(
        query_applied = %query.filter.to_document(),
        sort_applied = %query.sort.to_document(),
        skip = query.window.skip,
        limit = page.limit,
        "translated query"
    );

    Ok(QueryPlan {
        query,
        page,
        warnings: state.into_warnings(),
    })
}
