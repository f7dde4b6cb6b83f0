// src/routes.rs
use std::sync::Arc;
use warp::reject::Rejection;
use crate::handlers::rates::{get_ten_year, WindowQuery};
use crate::services::feed::RateFeed;
use log::info;

use std::convert::Infallible;
use warp::{Filter, Reply};
use crate::handlers::error::ApiError;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = warp::http::StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if let Some(query_error) = err.find::<warp::reject::InvalidQuery>() {
        code = warp::http::StatusCode::BAD_REQUEST;
        message = query_error.to_string();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = warp::http::StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else {
        code = warp::http::StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

pub fn routes(feed: Arc<RateFeed>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    info!("Configuring routes...");

    let feed_filter = warp::any().map(move || feed.clone());

    let ten_year_route = warp::path!("api" / "v1" / "treasury" / "ten_year")
        .and(warp::get())
        .and(warp::query::<WindowQuery>())
        .and(feed_filter)
        .and_then(get_ten_year);

    info!("All routes configured successfully.");

    ten_year_route.recover(handle_rejection)
}
