/// Vehicle model and database operations
///
/// Vehicles are child rows owned by a person. The showroom only stocks a
/// fixed catalogue: three body styles and three colors, stored as their
/// uppercase names. The 3-vehicles-per-person cap is an application-layer
/// invariant enforced by the edit form handler, not by the schema.
///
/// # Schema
///
/// ```sql
/// CREATE TABLE vehicle (
///     id        INTEGER PRIMARY KEY AUTOINCREMENT,
///     person_id INTEGER NOT NULL REFERENCES person(id) ON DELETE CASCADE,
///     name      TEXT NOT NULL,
///     color     TEXT NOT NULL,
///     sale      BOOLEAN NOT NULL DEFAULT FALSE
/// );
/// ```

use serde::{Deserialize, Serialize};
use sqlx::SqlitePool;
use std::fmt;

/// Maximum number of vehicles one person may own
pub const MAX_VEHICLES_PER_PERSON: i64 = 3;

/// Body style of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum VehicleName {
    Hatch,
    Sedan,
    Convertible,
}

impl VehicleName {
    /// Every stocked body style, in form-option order
    pub const ALL: [VehicleName; 3] = [
        VehicleName::Hatch,
        VehicleName::Sedan,
        VehicleName::Convertible,
    ];

    /// The uppercase name as stored in the database and posted by the form
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleName::Hatch => "HATCH",
            VehicleName::Sedan => "SEDAN",
            VehicleName::Convertible => "CONVERTIBLE",
        }
    }
}

impl fmt::Display for VehicleName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Paint color of a vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "UPPERCASE")]
#[sqlx(rename_all = "UPPERCASE")]
pub enum VehicleColor {
    Yellow,
    Blue,
    Gray,
}

impl VehicleColor {
    /// Every stocked color, in form-option order
    pub const ALL: [VehicleColor; 3] = [
        VehicleColor::Yellow,
        VehicleColor::Blue,
        VehicleColor::Gray,
    ];

    /// The uppercase name as stored in the database and posted by the form
    pub fn as_str(&self) -> &'static str {
        match self {
            VehicleColor::Yellow => "YELLOW",
            VehicleColor::Blue => "BLUE",
            VehicleColor::Gray => "GRAY",
        }
    }
}

impl fmt::Display for VehicleColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Vehicle model representing one car on a person's record
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Vehicle {
    /// Row id
    pub id: i64,

    /// Owning person
    pub person_id: i64,

    /// Body style
    pub name: VehicleName,

    /// Paint color
    pub color: VehicleColor,

    /// Whether the vehicle is up for sale
    pub sale: bool,
}

/// Input for creating a new vehicle
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateVehicle {
    /// Owning person
    pub person_id: i64,

    /// Body style
    pub name: VehicleName,

    /// Paint color
    pub color: VehicleColor,

    /// Whether the vehicle is up for sale
    pub sale: bool,
}

impl Vehicle {
    /// Creates a new vehicle in the database
    ///
    /// The caller is responsible for enforcing [`MAX_VEHICLES_PER_PERSON`]
    /// before inserting.
    ///
    /// # Errors
    ///
    /// Returns an error if the owning person does not exist (foreign key) or
    /// the database is unreachable.
    pub async fn create(pool: &SqlitePool, data: CreateVehicle) -> Result<Self, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            INSERT INTO vehicle (person_id, name, color, sale)
            VALUES (?, ?, ?, ?)
            RETURNING id, person_id, name, color, sale
            "#,
        )
        .bind(data.person_id)
        .bind(data.name)
        .bind(data.color)
        .bind(data.sale)
        .fetch_one(pool)
        .await?;

        Ok(vehicle)
    }

    /// Finds a vehicle by id
    pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Self>, sqlx::Error> {
        let vehicle = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, person_id, name, color, sale
            FROM vehicle
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(vehicle)
    }

    /// Lists all vehicles owned by a person, ordered by id
    pub async fn list_by_person(
        pool: &SqlitePool,
        person_id: i64,
    ) -> Result<Vec<Self>, sqlx::Error> {
        let vehicles = sqlx::query_as::<_, Vehicle>(
            r#"
            SELECT id, person_id, name, color, sale
            FROM vehicle
            WHERE person_id = ?
            ORDER BY id
            "#,
        )
        .bind(person_id)
        .fetch_all(pool)
        .await?;

        Ok(vehicles)
    }

    /// Counts the vehicles owned by a person
    ///
    /// Used by the edit form handler to enforce the ownership cap.
    pub async fn count_by_person(pool: &SqlitePool, person_id: i64) -> Result<i64, sqlx::Error> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM vehicle WHERE person_id = ?")
            .bind(person_id)
            .fetch_one(pool)
            .await?;

        Ok(count)
    }

    /// Deletes a vehicle by id
    ///
    /// Returns true if a row was deleted.
    pub async fn delete(pool: &SqlitePool, id: i64) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM vehicle WHERE id = ?")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vehicle_name_wire_format() {
        assert_eq!(VehicleName::Hatch.to_string(), "HATCH");
        assert_eq!(VehicleName::Sedan.to_string(), "SEDAN");
        assert_eq!(VehicleName::Convertible.to_string(), "CONVERTIBLE");
    }

    #[test]
    fn test_vehicle_color_wire_format() {
        assert_eq!(VehicleColor::Yellow.to_string(), "YELLOW");
        assert_eq!(VehicleColor::Blue.to_string(), "BLUE");
        assert_eq!(VehicleColor::Gray.to_string(), "GRAY");
    }

    #[test]
    fn test_enums_deserialize_from_form_values() {
        let name: VehicleName = serde_json::from_str("\"CONVERTIBLE\"").unwrap();
        assert_eq!(name, VehicleName::Convertible);

        let color: VehicleColor = serde_json::from_str("\"GRAY\"").unwrap();
        assert_eq!(color, VehicleColor::Gray);

        assert!(serde_json::from_str::<VehicleName>("\"TRUCK\"").is_err());
    }

    #[test]
    fn test_catalogue_is_complete() {
        assert_eq!(VehicleName::ALL.len(), 3);
        assert_eq!(VehicleColor::ALL.len(), 3);
    }
}
