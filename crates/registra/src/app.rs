use std::time::Duration;

use axum::{
    extract::DefaultBodyLimit,
    http::{header, Method},
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    services::ServeDir,
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::{
    handlers::{
        appointments::{
            appointment_graph, bulk_appointments, create_appointment, delete_appointment,
            list_appointments, selective_delete_appointments, update_appointment,
            upload_appointment_attachment,
        },
        employees::{create_employee, delete_employee, list_employees, upload_employees},
        travels::{
            bulk_travels, create_travel, delete_travel, filter_travels, list_travels,
            selective_delete_travels, travel_graph, update_travel, upload_travels,
        },
    },
    state::AppState,
};

/// Create the application router with all routes and middleware.
pub fn create_app(state: AppState) -> Router {
    // CORS configuration for the browser UI
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::CONTENT_TYPE]);

    // Attachment uploads need headroom above the attachment size limit
    let body_limit = DefaultBodyLimit::max(state.max_attachment_bytes + 1024 * 1024);

    Router::new()
        // Employee routes
        .route("/employees", get(list_employees).post(create_employee))
        .route("/employees/upload", post(upload_employees))
        .route("/employees/{id}", axum::routing::delete(delete_employee))
        // Travel routes
        .route("/travels", get(list_travels).post(create_travel))
        .route("/travels/filter", get(filter_travels))
        .route("/travels/graph", get(travel_graph))
        .route("/travels/delete", post(selective_delete_travels))
        .route("/travels/bulk", post(bulk_travels))
        .route("/travels/upload", post(upload_travels))
        .route(
            "/travels/{id}",
            axum::routing::put(update_travel).delete(delete_travel),
        )
        // Appointment routes
        .route(
            "/appointments",
            get(list_appointments).post(create_appointment),
        )
        .route("/appointments/graph", get(appointment_graph))
        .route("/appointments/delete", post(selective_delete_appointments))
        .route("/appointments/bulk", post(bulk_appointments))
        .route(
            "/appointments/{id}",
            axum::routing::put(update_appointment).delete(delete_appointment),
        )
        .route(
            "/appointments/{id}/attachment",
            post(upload_appointment_attachment),
        )
        // Stored attachments are served statically
        .nest_service("/uploads", ServeDir::new(&state.uploads_dir))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(Duration::from_secs(10)))
        .layer(body_limit)
        .with_state(state)
}
