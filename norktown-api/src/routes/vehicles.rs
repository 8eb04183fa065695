/// Admin vehicle management
///
/// These routes sit behind the admin guard: only the administrator (person
/// id 1) reaches the handlers, everyone else is stopped with a 403 by the
/// middleware.
///
/// # Endpoints
///
/// - `GET  /edit/:id` - Vehicle form for a person
/// - `POST /edit/:id` - Add a vehicle, enforcing the per-person cap
/// - `GET  /deletevehicle/:vehicle_id/:person_id` - Remove one vehicle

use axum::{
    extract::{Path, State},
    response::{Html, IntoResponse, Redirect, Response},
    Extension, Form,
};
use norktown_shared::auth::middleware::SessionContext;
use norktown_shared::models::person::Person;
use norktown_shared::models::vehicle::{
    CreateVehicle, Vehicle, VehicleColor, VehicleName, MAX_VEHICLES_PER_PERSON,
};
use serde::Deserialize;

use crate::{
    app::AppState,
    error::{AppError, AppResult},
    pages,
    routes::{flash_redirect, take_flash},
};

/// Vehicle form payload
///
/// The selects post the uppercase catalogue names; anything outside the
/// catalogue fails deserialization and is rejected before the handler runs.
#[derive(Debug, Deserialize)]
pub struct VehicleForm {
    /// Body style
    pub name: VehicleName,

    /// Paint color
    pub color: VehicleColor,

    /// Whether the vehicle is up for sale
    pub sale: bool,
}

async fn find_person(state: &AppState, person_id: i64) -> AppResult<Person> {
    Person::find_by_id(&state.db, person_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("No person with id {}", person_id)))
}

/// Vehicle form page handler
pub async fn edit_form(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
    Extension(ctx): Extension<SessionContext>,
) -> AppResult<Html<String>> {
    let person = find_person(&state, person_id).await?;
    let vehicles = Vehicle::list_by_person(&state.db, person.id).await?;
    let flash = take_flash(&state, &ctx).await?;

    Ok(pages::edit_page(&person, &vehicles, flash.as_deref()))
}

/// Add-vehicle handler
///
/// Enforces the application-layer cap: a person may own at most
/// [`MAX_VEHICLES_PER_PERSON`] vehicles. Over the cap nothing is inserted
/// and the form is flashed "Max 3 vehicles". Either way the handler
/// redirects back to the form.
pub async fn add_vehicle(
    State(state): State<AppState>,
    Path(person_id): Path<i64>,
    Extension(ctx): Extension<SessionContext>,
    Form(form): Form<VehicleForm>,
) -> AppResult<Response> {
    let person = find_person(&state, person_id).await?;
    let location = format!("/edit/{}", person.id);

    let owned = Vehicle::count_by_person(&state.db, person.id).await?;
    if owned >= MAX_VEHICLES_PER_PERSON {
        return flash_redirect(&state, &ctx, "Max 3 vehicles", &location).await;
    }

    let vehicle = Vehicle::create(
        &state.db,
        CreateVehicle {
            person_id: person.id,
            name: form.name,
            color: form.color,
            sale: form.sale,
        },
    )
    .await?;

    tracing::info!(
        vehicle_id = vehicle.id,
        person_id = person.id,
        "Added vehicle"
    );

    flash_redirect(&state, &ctx, "Vehicle Successfully Added", &location).await
}

/// Delete-vehicle handler
///
/// Removes exactly the requested vehicle row and redirects back to the
/// owner's edit page. Deleting an already-gone vehicle is a quiet no-op.
pub async fn delete_vehicle(
    State(state): State<AppState>,
    Path((vehicle_id, person_id)): Path<(i64, i64)>,
) -> AppResult<Response> {
    let person = find_person(&state, person_id).await?;

    let deleted = Vehicle::delete(&state.db, vehicle_id).await?;
    if deleted {
        tracing::info!(vehicle_id, person_id = person.id, "Deleted vehicle");
    }

    Ok(Redirect::to(&format!("/edit/{}", person.id)).into_response())
}
