/// Public person pages
///
/// # Endpoints
///
/// - `GET /` - Index page listing every registered person
/// - `GET /person/:id` - Detail page for one person and their vehicles

use axum::{
    extract::{Path, State},
    response::Html,
    Extension,
};
use norktown_shared::auth::middleware::SessionContext;
use norktown_shared::models::{person::Person, vehicle::Vehicle};

use crate::{
    app::AppState,
    error::{AppError, AppResult},
    pages,
    routes::take_flash,
};

/// Index page handler
///
/// Lists all registered people ordered by id.
pub async fn index(
    State(state): State<AppState>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Html<String>> {
    let people = Person::list(&state.db).await?;
    let flash = take_flash(&state, &ctx).await?;

    Ok(pages::index_page(
        &people,
        flash.as_deref(),
        ctx.is_authenticated(),
    ))
}

/// Person detail page handler
///
/// # Errors
///
/// Returns 404 if no person has the requested id.
pub async fn show_person(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Html<String>> {
    let person = Person::find_by_id(&state.db, person_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No person with id {}", person_id)))?;

    let vehicles = Vehicle::list_by_person(&state.db, person.id).await?;

    Ok(pages::person_page(
        &person,
        &vehicles,
        ctx.is_authenticated(),
    ))
}
