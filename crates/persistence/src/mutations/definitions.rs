// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Shift definition mutations.
//!
//! Only name and description are editable; a definition is deleted only
//! while no booking row references it.

use diesel::SqliteConnection;
use diesel::prelude::*;
use nakki_domain::{
    BilingualText, ShiftDefinition, ShiftDefinitionId, ensure_definition_deletable,
    validate_definition_name,
};
use tracing::info;

use crate::backend::PersistenceBackend;
use crate::data_models::flag;
use crate::diesel_schema::shift_definitions;
use crate::error::PersistenceError;
use crate::queries::shifts::{count_bookings_for_definition, get_definition};

/// Creates a shift definition.
///
/// # Errors
///
/// Returns `PersistenceError::DomainViolation` if the name is blank in both
/// languages.
pub fn create_shift_definition(
    conn: &mut SqliteConnection,
    name: &BilingualText,
    description: &BilingualText,
    active_members_only: bool,
) -> Result<ShiftDefinitionId, PersistenceError> {
    validate_definition_name(name)?;
    diesel::insert_into(shift_definitions::table)
        .values((
            shift_definitions::name_fi.eq(&name.fi),
            shift_definitions::name_en.eq(&name.en),
            shift_definitions::description_fi.eq(&description.fi),
            shift_definitions::description_en.eq(&description.en),
            shift_definitions::active_members_only.eq(flag(active_members_only)),
        ))
        .execute(conn)?;

    let definition_id: i64 = conn.get_last_insert_rowid()?;
    info!(definition_id, active_members_only, "Created shift definition");
    Ok(ShiftDefinitionId::new(definition_id))
}

/// Replaces the name and description of a definition.
///
/// # Errors
///
/// Returns `PersistenceError::NotFound` if the definition does not exist and
/// `PersistenceError::DomainViolation` if the name is blank.
pub fn update_shift_definition_text(
    conn: &mut SqliteConnection,
    definition_id: ShiftDefinitionId,
    name: &BilingualText,
    description: &BilingualText,
) -> Result<(), PersistenceError> {
    validate_definition_name(name)?;
    let updated: usize = diesel::update(
        shift_definitions::table
            .filter(shift_definitions::shift_definition_id.eq(definition_id.value())),
    )
    .set((
        shift_definitions::name_fi.eq(&name.fi),
        shift_definitions::name_en.eq(&name.en),
        shift_definitions::description_fi.eq(&description.fi),
        shift_definitions::description_en.eq(&description.en),
    ))
    .execute(conn)?;
    if updated == 0 {
        return Err(PersistenceError::NotFound(format!(
            "shift definition {definition_id}"
        )));
    }
    info!(definition_id = definition_id.value(), "Updated shift definition text");
    Ok(())
}

/// Deletes a definition that no booking row references.
///
/// # Errors
///
/// Returns `PersistenceError::DomainViolation` wrapping
/// `DomainError::ShiftDefinitionInUse` if rows still reference it.
pub fn delete_shift_definition(
    conn: &mut SqliteConnection,
    definition_id: ShiftDefinitionId,
) -> Result<(), PersistenceError> {
    conn.transaction(|conn| {
        let definition: ShiftDefinition = get_definition(conn, definition_id)?;
        let booking_count: usize = count_bookings_for_definition(conn, definition_id)?;
        ensure_definition_deletable(&definition, booking_count)?;

        diesel::delete(
            shift_definitions::table
                .filter(shift_definitions::shift_definition_id.eq(definition_id.value())),
        )
        .execute(conn)?;
        info!(definition_id = definition_id.value(), "Deleted shift definition");
        Ok(())
    })
}
